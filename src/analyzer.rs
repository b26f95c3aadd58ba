//////////////////////////////////////////////////////////////////
//! analyzer.rs
//!
//! The function analyzer: the repository of user definitions plus the
//! two static judgements the runner and the control-flow operators
//! rely on — whether a definition may be inlined, and whether it has
//! the syntactic tail-call shape `f := <code> f`.
use std::collections::HashMap;

use log::debug;

use crate::error::CharmError;
use crate::term::{Definition, Term};

pub struct FunctionAnalyzer {
    definitions: HashMap<String, Vec<Term>>,
    /// Only definitions that passed the inlineability check land here.
    inline_definitions: HashMap<String, Vec<Term>>,
}

impl FunctionAnalyzer {
    pub fn new() -> FunctionAnalyzer {
        FunctionAnalyzer {
            definitions: HashMap::new(),
            inline_definitions: HashMap::new(),
        }
    }

    /// Register a definition term. Re-definition overwrites, including
    /// the inline-ready table, so a redefinition that turned recursive
    /// stops being inlined.
    pub fn add_definition(&mut self, term: &Term) -> Result<(), CharmError> {
        let def = match term {
            Term::Definition(def) => def,
            other => {
                return Err(CharmError::ParseContractViolation(format!(
                    "tried to register `{}` as a definition",
                    other
                )))
            }
        };
        debug!("registering definition `{}`", def.name);
        self.definitions.insert(def.name.clone(), def.body.clone());
        if Self::is_inlineable(def) {
            self.inline_definitions
                .insert(def.name.clone(), def.body.clone());
        } else {
            self.inline_definitions.remove(&def.name);
        }
        Ok(())
    }

    /// The body bound to `name`, if any.
    pub fn definition(&self, name: &str) -> Option<&Vec<Term>> {
        self.definitions.get(name)
    }

    /// A definition is inlineable iff its body never references its own
    /// name, directly or inside any nested list. Nested lists are inert
    /// data at runtime, but they may be `i`-invoked later, so they are
    /// inspected (without being inlined themselves).
    pub fn is_inlineable(def: &Definition) -> bool {
        !Self::references(&def.name, &def.body)
    }

    fn references(name: &str, terms: &[Term]) -> bool {
        terms.iter().any(|t| match t {
            Term::Defined(n) => n == name,
            Term::List(items) => Self::references(name, items),
            _ => false,
        })
    }

    /// True iff `name` is registered and safe to substitute for a call.
    pub fn is_inline_ready(&self, name: &str) -> bool {
        self.inline_definitions.contains_key(name)
    }

    /// Append the inline-ready body referenced by `call` to `out`.
    /// Returns false (and appends nothing) when `call` is not a
    /// `Defined` term or its target is not inline-ready. The rewrite is
    /// one level deep: terms of the body are appended as they are.
    pub fn do_inline(&self, out: &mut Vec<Term>, call: &Term) -> bool {
        let name = match call {
            Term::Defined(name) => name,
            _ => return false,
        };
        match self.inline_definitions.get(name) {
            Some(body) => {
                debug!("inlining `{}` ({} terms)", name, body.len());
                out.extend(body.iter().cloned());
                true
            }
            None => false,
        }
    }

    /// The basic, purely syntactic tail-call judgement: the body's last
    /// term is a call to the definition itself. The common conditional
    /// pattern `f := [ cond ] [ ... f ] [ ... f ] ifthen` is not caught
    /// here; `ifthen` detects it dynamically.
    pub fn is_tail_call_recursive(name: &str, body: &[Term]) -> bool {
        matches!(body.last(), Some(Term::Defined(n)) if n == name)
    }
}

impl Default for FunctionAnalyzer {
    fn default() -> Self {
        FunctionAnalyzer::new()
    }
}

//////////////////////////////////////////////
/// TESTS
///
#[cfg(test)]
mod tests {
    use super::*;

    fn def(name: &str, body: Vec<Term>) -> Definition {
        Definition {
            name: name.to_string(),
            body,
        }
    }

    fn call(name: &str) -> Term {
        Term::Defined(name.to_string())
    }

    #[test]
    fn test_add_definition_stores_body() {
        let mut fa = FunctionAnalyzer::new();
        let d = Term::Definition(def("double", vec![call("dup"), call("+")]));
        fa.add_definition(&d).unwrap();
        assert_eq!(fa.definition("double").unwrap().len(), 2);
    }

    #[test]
    fn test_add_definition_rejects_other_terms() {
        let mut fa = FunctionAnalyzer::new();
        assert!(matches!(
            fa.add_definition(&Term::int(1)),
            Err(CharmError::ParseContractViolation(_))
        ));
    }

    #[test]
    fn test_redefinition_overwrites() {
        let mut fa = FunctionAnalyzer::new();
        fa.add_definition(&Term::Definition(def("f", vec![Term::int(1)])))
            .unwrap();
        fa.add_definition(&Term::Definition(def("f", vec![Term::int(2)])))
            .unwrap();
        assert_eq!(fa.definition("f").unwrap(), &vec![Term::int(2)]);
    }

    #[test]
    fn test_direct_self_reference_not_inlineable() {
        let d = def("f", vec![call("dup"), call("f")]);
        assert!(!FunctionAnalyzer::is_inlineable(&d));
    }

    #[test]
    fn test_self_reference_inside_nested_list_not_inlineable() {
        let nested = Term::list(vec![Term::list(vec![call("f")])]);
        let d = def("f", vec![call("dup"), nested]);
        assert!(!FunctionAnalyzer::is_inlineable(&d));
    }

    #[test]
    fn test_plain_body_is_inlineable() {
        let d = def("double", vec![call("dup"), call("+")]);
        assert!(FunctionAnalyzer::is_inlineable(&d));
    }

    #[test]
    fn test_recursive_redefinition_leaves_inline_table() {
        let mut fa = FunctionAnalyzer::new();
        fa.add_definition(&Term::Definition(def("f", vec![call("dup")])))
            .unwrap();
        assert!(fa.is_inline_ready("f"));
        fa.add_definition(&Term::Definition(def("f", vec![call("f")])))
            .unwrap();
        assert!(!fa.is_inline_ready("f"));
    }

    #[test]
    fn test_do_inline_appends_body() {
        let mut fa = FunctionAnalyzer::new();
        fa.add_definition(&Term::Definition(def(
            "double",
            vec![call("dup"), call("+")],
        )))
        .unwrap();
        let mut out = vec![Term::int(5)];
        assert!(fa.do_inline(&mut out, &call("double")));
        assert_eq!(out, vec![Term::int(5), call("dup"), call("+")]);
    }

    #[test]
    fn test_do_inline_refuses_unknown_and_recursive() {
        let mut fa = FunctionAnalyzer::new();
        fa.add_definition(&Term::Definition(def("f", vec![call("f")])))
            .unwrap();
        let mut out = vec![];
        assert!(!fa.do_inline(&mut out, &call("f")));
        assert!(!fa.do_inline(&mut out, &call("nosuch")));
        assert!(!fa.do_inline(&mut out, &Term::int(1)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_tail_call_shape() {
        assert!(FunctionAnalyzer::is_tail_call_recursive(
            "f",
            &[call("dup"), call("f")]
        ));
        assert!(!FunctionAnalyzer::is_tail_call_recursive(
            "f",
            &[call("f"), call("dup")]
        ));
        assert!(!FunctionAnalyzer::is_tail_call_recursive("f", &[]));
        // a trailing self-name inside a list is not a tail call
        assert!(!FunctionAnalyzer::is_tail_call_recursive(
            "f",
            &[Term::list(vec![call("f")])]
        ));
    }
}
