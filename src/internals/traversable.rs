// Traversable (list / string) operators.
//
// Lists and byte strings share the same manipulation vocabulary: `len`,
// `at`, `insert`, `concat`, `split`. Strings are indexed, spliced, and
// split at byte offsets, with no encoding assumed, so every i in
// [0, size] is a valid split point. Indexing operators wrap their
// index by the container size; `split` alone does strict bounds checks.

use crate::error::CharmError;
use crate::runner::{int_operand, Runner};
use crate::term::Term;

/// Wrap an index by the container size. Negative indices wrap the same
/// way positive ones do.
fn wrap_index(i: i64, size: usize) -> usize {
    i.rem_euclid(size as i64) as usize
}

impl Runner {
    /// len ( v -- v n ) Size of a list (elements) or string (bytes)
    /// without consuming it. Anything else reports 1.
    pub fn f_len(&mut self) -> Result<(), CharmError> {
        let f1 = self.pop_operand("len")?;
        let n = match &f1 {
            Term::List(items) => items.len() as i64,
            Term::String(s) => s.len() as i64,
            _ => 1,
        };
        self.push_term(f1)?;
        self.push_term(Term::int(n))
    }

    /// at ( v i -- v e ) Wrapped indexing. A list yields a one-element
    /// list holding the chosen element; a string yields the single raw
    /// byte at that offset, as a one-byte string. The inspected
    /// container stays on the stack.
    pub fn f_at(&mut self) -> Result<(), CharmError> {
        let f1 = self.pop_operand("at")?;
        let f2 = self.pop_operand("at")?;
        let i = match f1.as_int() {
            Some(i) => i,
            None => {
                return Err(CharmError::TypeError(
                    "non integer index passed to `at`".to_string(),
                ))
            }
        };
        let out = match &f2 {
            Term::List(items) => {
                if items.is_empty() {
                    return Err(CharmError::IndexOutOfRange(
                        "empty list passed to `at`".to_string(),
                    ));
                }
                Term::list(vec![items[wrap_index(i, items.len())].clone()])
            }
            Term::String(s) => {
                if s.is_empty() {
                    return Err(CharmError::IndexOutOfRange(
                        "empty string passed to `at`".to_string(),
                    ));
                }
                Term::String(vec![s[wrap_index(i, s.len())]])
            }
            _ => {
                return Err(CharmError::TypeError(
                    "neither a list nor a string passed to `at`".to_string(),
                ))
            }
        };
        self.push_term(f2)?;
        self.push_term(out)
    }

    /// insert ( v e i -- v' ) Splice the contents of e into v at the
    /// wrapped index. Lists take lists, strings take strings. An empty
    /// container takes the insertion at position zero.
    pub fn f_insert(&mut self) -> Result<(), CharmError> {
        let f1 = self.pop_operand("insert")?;
        let f2 = self.pop_operand("insert")?;
        let f3 = self.pop_operand("insert")?;
        let i = match f1.as_int() {
            Some(i) => i,
            None => {
                return Err(CharmError::TypeError(
                    "non integer index passed to `insert`".to_string(),
                ))
            }
        };
        match (f3, f2) {
            (Term::List(mut items), Term::List(elems)) => {
                let pos = if items.is_empty() {
                    0
                } else {
                    wrap_index(i, items.len())
                };
                items.splice(pos..pos, elems);
                self.push_term(Term::List(items))
            }
            (Term::String(mut s), Term::String(elem)) => {
                let pos = if s.is_empty() { 0 } else { wrap_index(i, s.len()) };
                s.splice(pos..pos, elem);
                self.push_term(Term::String(s))
            }
            (Term::List(_), _) => Err(CharmError::TypeError(
                "attempted to `insert` a non list into a list".to_string(),
            )),
            (Term::String(_), _) => Err(CharmError::TypeError(
                "attempted to `insert` a non string into a string".to_string(),
            )),
            _ => Err(CharmError::TypeError(
                "neither a list nor a string passed to `insert`".to_string(),
            )),
        }
    }

    /// concat ( a b -- ab ) The second-popped collection followed by
    /// the first-popped; both must be the same variant.
    pub fn f_concat(&mut self) -> Result<(), CharmError> {
        let f1 = self.pop_operand("concat")?;
        let f2 = self.pop_operand("concat")?;
        match (f2, f1) {
            (Term::List(mut low), Term::List(high)) => {
                low.extend(high);
                self.push_term(Term::List(low))
            }
            (Term::String(mut low), Term::String(high)) => {
                low.extend(high);
                self.push_term(Term::String(low))
            }
            _ => Err(CharmError::TypeError(
                "unmatching types passed to `concat`".to_string(),
            )),
        }
    }

    /// split ( v i -- low high ) Split a list or string at i, which
    /// must lie in [0, size]. For strings i is a byte offset.
    pub fn f_split(&mut self) -> Result<(), CharmError> {
        let f1 = self.pop_operand("split")?;
        let f2 = self.pop_operand("split")?;
        let i = match f1.as_int() {
            Some(i) => i,
            None => {
                return Err(CharmError::TypeError(
                    "non integer passed to `split`".to_string(),
                ))
            }
        };
        let size = match &f2 {
            Term::List(items) => items.len(),
            Term::String(s) => s.len(),
            _ => {
                return Err(CharmError::TypeError(
                    "neither a list nor a string passed to `split`".to_string(),
                ))
            }
        };
        if i < 0 || i as usize > size {
            return Err(CharmError::IndexOutOfRange(format!(
                "split index {} outside [0, {}]",
                i, size
            )));
        }
        match f2 {
            Term::List(mut items) => {
                let high = items.split_off(i as usize);
                self.push_term(Term::List(items))?;
                self.push_term(Term::List(high))
            }
            Term::String(mut s) => {
                let high = s.split_off(i as usize);
                self.push_term(Term::String(s))?;
                self.push_term(Term::String(high))
            }
            _ => unreachable!(),
        }
    }

    /// tostring ( t -- s ) Canonical print of any term into a string.
    pub fn f_tostring(&mut self) -> Result<(), CharmError> {
        let f1 = self.pop_operand("tostring")?;
        self.push_term(Term::String(f1.canonical_bytes()))
    }

    /// char ( n -- s ) A one-byte string from a non-negative integer.
    pub fn f_char(&mut self) -> Result<(), CharmError> {
        let f1 = self.pop_operand("char")?;
        let n = int_operand(&f1, "char")?;
        if n < 0 {
            return Err(CharmError::TypeError(
                "negative integer passed to `char`".to_string(),
            ));
        }
        self.push_term(Term::String(vec![n as u8]))
    }

    /// ord ( s -- n ) The first byte of a non-empty string.
    pub fn f_ord(&mut self) -> Result<(), CharmError> {
        let f1 = self.pop_operand("ord")?;
        match f1 {
            Term::String(s) if !s.is_empty() => self.push_term(Term::int(s[0] as i64)),
            Term::String(_) => Err(CharmError::IndexOutOfRange(
                "empty string passed to `ord`".to_string(),
            )),
            _ => Err(CharmError::TypeError(
                "non string passed to `ord`".to_string(),
            )),
        }
    }
}
