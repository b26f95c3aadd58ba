//! The builtin operator table.
//!
//! Every primitive operator gets a name, a function pointer, and a
//! one-line stack-effect string (surfaced by `--builtins`). Operators
//! that have to see the enclosing definition — `i`, `ifthen`, `inline`
//! — register with a context-taking pointer; the rest only receive the
//! runner.
use std::collections::HashMap;

use crate::error::CharmError;
use crate::runner::{Runner, RunnerContext};

pub type PlainFn = fn(&mut Runner) -> Result<(), CharmError>;
pub type ContextFn = fn(&mut Runner, &RunnerContext) -> Result<(), CharmError>;

#[derive(Clone, Copy)]
pub enum BuiltinCode {
    Plain(PlainFn),
    WithContext(ContextFn),
}

pub struct BuiltInFn {
    pub name: &'static str,
    pub code: BuiltinCode,
    pub doc: &'static str,
}

pub struct BuiltinTable {
    entries: Vec<BuiltInFn>,
    index: HashMap<&'static str, usize>,
}

impl BuiltinTable {
    fn add_builtin(&mut self, name: &'static str, code: PlainFn, doc: &'static str) {
        self.index.insert(name, self.entries.len());
        self.entries.push(BuiltInFn {
            name,
            code: BuiltinCode::Plain(code),
            doc,
        });
    }

    fn add_builtin_with_context(&mut self, name: &'static str, code: ContextFn, doc: &'static str) {
        self.index.insert(name, self.entries.len());
        self.entries.push(BuiltInFn {
            name,
            code: BuiltinCode::WithContext(code),
            doc,
        });
    }

    pub fn lookup(&self, name: &str) -> Option<BuiltinCode> {
        self.index.get(name).map(|&i| self.entries[i].code)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuiltInFn> {
        self.entries.iter()
    }

    /// The fixed operator set. Resolution order at a `Defined` term is
    /// builtin first, user definition second, so nothing here can be
    /// shadowed.
    pub fn new() -> BuiltinTable {
        let mut t = BuiltinTable {
            entries: Vec::new(),
            index: HashMap::new(),
        };

        // input / output
        t.add_builtin("p", Runner::f_p, "p ( t -- ) Print the top term in canonical form");
        t.add_builtin(
            "pstring",
            Runner::f_pstring,
            "pstring ( s -- ) Print a string's raw bytes, no quotes",
        );
        t.add_builtin("newline", Runner::f_newline, "newline ( -- ) Print a newline");
        t.add_builtin(
            "getline",
            Runner::f_getline,
            "getline ( -- s ) Read one input line, without its newline",
        );

        // debugging
        t.add_builtin(
            "type",
            Runner::f_type,
            "type ( t -- t s ) Push the variant name of the top term",
        );

        // comparisons
        t.add_builtin(
            "eq",
            Runner::f_eq,
            "eq ( a b -- n ) 1 if a and b are structurally equal, else 0",
        );

        // stack juggling
        t.add_builtin("dup", Runner::f_dup, "dup ( t -- t t ) Duplicate the top term");
        t.add_builtin("pop", Runner::f_pop, "pop ( t -- ) Drop the top term");
        t.add_builtin(
            "swap",
            Runner::f_swap,
            "swap ( j i -- ) Swap the cells at depths i and j, counted from the top",
        );

        // list / string manipulation
        t.add_builtin(
            "len",
            Runner::f_len,
            "len ( v -- v n ) Size of a list or string; 1 for anything else",
        );
        t.add_builtin(
            "at",
            Runner::f_at,
            "at ( v i -- v e ) Index into a list or string, wrapping by its size",
        );
        t.add_builtin(
            "insert",
            Runner::f_insert,
            "insert ( v e i -- v' ) Splice e into v at the wrapped index i",
        );
        t.add_builtin(
            "concat",
            Runner::f_concat,
            "concat ( a b -- ab ) Concatenate two lists or two strings",
        );
        t.add_builtin(
            "split",
            Runner::f_split,
            "split ( v i -- low high ) Split a list or string at index i",
        );

        // string manipulation
        t.add_builtin(
            "tostring",
            Runner::f_tostring,
            "tostring ( t -- s ) Canonical print of any term into a string",
        );
        t.add_builtin(
            "char",
            Runner::f_char,
            "char ( n -- s ) One-byte string from a non-negative integer",
        );
        t.add_builtin(
            "ord",
            Runner::f_ord,
            "ord ( s -- n ) First byte of a non-empty string",
        );

        // control flow
        t.add_builtin_with_context(
            "i",
            Runner::f_i,
            "i ( [body] -- ... ) Execute a list in the current runner",
        );
        t.add_builtin("q", Runner::f_q, "q ( t -- [t] ) Quote the top term into a list");
        t.add_builtin_with_context(
            "ifthen",
            Runner::f_ifthen,
            "ifthen ( [cond] [truthy] [falsy] -- ... ) Run cond, then one branch; tail-call aware",
        );
        t.add_builtin_with_context(
            "inline",
            Runner::f_inline,
            "inline ( [body] -- [body'] ) Replace inline-ready calls with their bodies",
        );

        // boolean ops
        t.add_builtin(
            "xor",
            Runner::f_xor,
            "xor ( a b -- n ) Exclusive or of the truthiness of two integers",
        );

        // arithmetic
        t.add_builtin("+", Runner::f_plus, "+ ( a b -- a+b ) Integer addition");
        t.add_builtin("-", Runner::f_minus, "- ( a b -- a-b ) Integer subtraction");
        t.add_builtin("*", Runner::f_times, "* ( a b -- a*b ) Integer multiplication");
        t.add_builtin(
            "/",
            Runner::f_divide,
            "/ ( a b -- a%b a/b ) Integer division, remainder below the quotient",
        );
        t.add_builtin(
            "abs",
            Runner::f_abs,
            "abs ( n -- |n| ) Absolute value of an integer or float",
        );
        t.add_builtin(
            "toint",
            Runner::f_toint,
            "toint ( n -- i ) Truncate a float to an integer; no-op on integers",
        );

        // stack management
        t.add_builtin(
            "createstack",
            Runner::f_createstack,
            "createstack ( n name -- ) Create a stack with capacity n and switch to it",
        );
        t.add_builtin(
            "getstack",
            Runner::f_getstack,
            "getstack ( -- name ) Push the current stack's name",
        );
        t.add_builtin(
            "switchstack",
            Runner::f_switchstack,
            "switchstack ( name -- ) Make the named stack current",
        );

        // reference getting / setting
        t.add_builtin(
            "getref",
            Runner::f_getref,
            "getref ( name -- t ) Read a reference cell on the current stack",
        );
        t.add_builtin(
            "setref",
            Runner::f_setref,
            "setref ( name t -- ) Bind a reference cell on the current stack",
        );

        t
    }
}

impl Default for BuiltinTable {
    fn default() -> Self {
        BuiltinTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_finds_operators() {
        let t = BuiltinTable::new();
        assert!(t.contains("+"));
        assert!(t.contains("ifthen"));
        assert!(!t.contains("nosuch"));
    }

    #[test]
    fn test_context_takers() {
        let t = BuiltinTable::new();
        for name in ["i", "ifthen", "inline"] {
            assert!(
                matches!(t.lookup(name), Some(BuiltinCode::WithContext(_))),
                "`{}` should take a context",
                name
            );
        }
        assert!(matches!(t.lookup("dup"), Some(BuiltinCode::Plain(_))));
    }

    #[test]
    fn test_every_entry_documents_itself() {
        for b in BuiltinTable::new().iter() {
            assert!(b.doc.starts_with(b.name), "doc of `{}` is off", b.name);
        }
    }
}
