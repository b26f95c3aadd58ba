//////////////////////////////////////////////////////////////////
//! term.rs
//!
//! The Charm value model.
//!
//! A Charm program is a flat sequence of terms, and every operand a
//! program manipulates is a term as well. `Term` is a closed tagged
//! union: adding a variant is a breaking change on purpose, so every
//! operator has to state its behavior for all five cases.
use std::fmt;

/// A Charm number is either a host integer or a host float, never both.
/// Mixed-tag numbers never compare equal, even when the values coincide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharmNumber {
    Int(i64),
    Float(f64),
}

/// A named user definition: `name := body`.
///
/// Bodies never contain another definition; the parser enforces that
/// definitions cannot nest.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub name: String,
    pub body: Vec<Term>,
}

/// One element of a Charm program: a value or an instruction.
///
/// Strings are byte strings: the collection operators index, split,
/// and splice them at arbitrary byte offsets, and no encoding is
/// assumed anywhere in the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Numeric literal.
    Number(CharmNumber),
    /// Byte-string literal.
    String(Vec<u8>),
    /// A quoted program fragment. Inert until activated by `i` or `ifthen`.
    List(Vec<Term>),
    /// Invoke a builtin or user definition by name.
    Defined(String),
    /// Declare-and-bind a user function. Registers itself when executed.
    Definition(Definition),
}

impl Term {
    pub fn int(v: i64) -> Term {
        Term::Number(CharmNumber::Int(v))
    }

    pub fn float(v: f64) -> Term {
        Term::Number(CharmNumber::Float(v))
    }

    pub fn string(s: impl Into<Vec<u8>>) -> Term {
        Term::String(s.into())
    }

    pub fn list(items: Vec<Term>) -> Term {
        Term::List(items)
    }

    /// True iff this term is a number carrying the integer tag.
    pub fn is_int(&self) -> bool {
        matches!(self, Term::Number(CharmNumber::Int(_)))
    }

    /// True iff this term is a number carrying the float tag.
    pub fn is_float(&self) -> bool {
        matches!(self, Term::Number(CharmNumber::Float(_)))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Term::Number(CharmNumber::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// The variant name reported by the `type` operator.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Term::Number(_) => "NUMBER_FUNCTION",
            Term::String(_) => "STRING_FUNCTION",
            Term::List(_) => "LIST_FUNCTION",
            Term::Defined(_) => "DEFINED_FUNCTION",
            Term::Definition(_) => "FUNCTION_DEFINITION",
        }
    }

    /// The canonical printed form, shared by `tostring`, `p`, and the
    /// debug tracing. Strings print with surrounding quotes and their
    /// bytes pass through untouched, which is why this produces bytes
    /// rather than text.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_canonical(&mut out);
        out
    }

    fn write_canonical(&self, out: &mut Vec<u8>) {
        match self {
            Term::Number(CharmNumber::Int(v)) => out.extend_from_slice(v.to_string().as_bytes()),
            Term::Number(CharmNumber::Float(v)) => out.extend_from_slice(v.to_string().as_bytes()),
            Term::String(s) => {
                out.push(b'"');
                out.extend_from_slice(s);
                out.push(b'"');
            }
            Term::List(items) => write_body(out, items),
            Term::Defined(name) => out.extend_from_slice(name.as_bytes()),
            Term::Definition(def) => {
                out.extend_from_slice(def.name.as_bytes());
                out.extend_from_slice(b" := ");
                write_body(out, &def.body);
            }
        }
    }
}

fn write_body(out: &mut Vec<u8>, body: &[Term]) {
    out.extend_from_slice(b"[ ");
    for t in body {
        t.write_canonical(out);
        out.push(b' ');
    }
    out.push(b']');
}

/// Text view of the canonical form, for diagnostics and log lines.
/// Non-UTF-8 string bytes render lossily here; the runtime itself
/// always goes through `canonical_bytes`.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.canonical_bytes()))
    }
}

//////////////////////////////////////////////
/// TESTS
///
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_structural() {
        let a = Term::list(vec![Term::int(1), Term::string("x")]);
        let b = Term::list(vec![Term::int(1), Term::string("x")]);
        assert_eq!(a, b);
        let c = Term::list(vec![Term::int(1), Term::string("y")]);
        assert_ne!(a, c);
    }

    #[test]
    fn test_mixed_numeric_tags_never_equal() {
        assert_ne!(Term::int(1), Term::float(1.0));
        assert_eq!(Term::float(1.0), Term::float(1.0));
    }

    #[test]
    fn test_int_and_float_discrimination() {
        assert!(Term::int(3).is_int());
        assert!(!Term::int(3).is_float());
        assert!(Term::float(3.0).is_float());
        assert!(!Term::string("3").is_int());
    }

    #[test]
    fn test_display_numbers() {
        assert_eq!(Term::int(-7).to_string(), "-7");
        assert_eq!(Term::float(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_display_string_keeps_contents_raw() {
        assert_eq!(Term::string("a \"b\" c").to_string(), "\"a \"b\" c\"");
    }

    #[test]
    fn test_canonical_bytes_pass_through_raw_bytes() {
        let t = Term::string(vec![0xff, 0x00, b'a']);
        assert_eq!(t.canonical_bytes(), vec![b'"', 0xff, 0x00, b'a', b'"']);
    }

    #[test]
    fn test_display_list() {
        let l = Term::list(vec![Term::int(1), Term::int(2), Term::int(3)]);
        assert_eq!(l.to_string(), "[ 1 2 3 ]");
        assert_eq!(Term::list(vec![]).to_string(), "[ ]");
    }

    #[test]
    fn test_display_nested_list() {
        let l = Term::list(vec![Term::int(1), Term::list(vec![Term::string("s")])]);
        assert_eq!(l.to_string(), "[ 1 [ \"s\" ] ]");
    }

    #[test]
    fn test_display_definition() {
        let d = Term::Definition(Definition {
            name: "double".to_string(),
            body: vec![Term::Defined("dup".to_string()), Term::Defined("+".to_string())],
        });
        assert_eq!(d.to_string(), "double := [ dup + ]");
    }

    #[test]
    fn test_variant_names() {
        assert_eq!(Term::int(0).variant_name(), "NUMBER_FUNCTION");
        assert_eq!(Term::string("").variant_name(), "STRING_FUNCTION");
        assert_eq!(Term::list(vec![]).variant_name(), "LIST_FUNCTION");
        assert_eq!(Term::Defined("f".into()).variant_name(), "DEFINED_FUNCTION");
    }
}
