//////////////////////////////////////////////////////////////////
//! parser.rs
//!
//! Line parser for Charm source text.
//!
//! The runtime core only consumes term sequences; this module is the
//! thin collaborator that produces them. One line of source becomes one
//! `Vec<Term>`. Tokens are whitespace-separated, `"…"` delimits a
//! string literal with no escape processing, `[` and `]` delimit lists,
//! and `name := body…` declares a definition whose body runs to the end
//! of the line or to a bare `;`.
use crate::error::CharmError;
use crate::term::{Definition, Term};

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Word(String),
    Str(String),
    LBracket,
    RBracket,
    Assign,
    Semi,
}

fn lex(line: &str) -> Result<Vec<Tok>, CharmError> {
    let mut toks = Vec::new();
    let mut chars = line.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            _ if c.is_whitespace() => {
                chars.next();
            }
            '[' => {
                chars.next();
                toks.push(Tok::LBracket);
            }
            ']' => {
                chars.next();
                toks.push(Tok::RBracket);
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => s.push(c),
                        None => {
                            return Err(CharmError::ParseContractViolation(
                                "unterminated string literal".to_string(),
                            ))
                        }
                    }
                }
                toks.push(Tok::Str(s));
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '[' || c == ']' || c == '"' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                toks.push(match word.as_str() {
                    ":=" => Tok::Assign,
                    ";" => Tok::Semi,
                    _ => Tok::Word(word),
                });
            }
        }
    }
    Ok(toks)
}

fn word_to_term(word: &str) -> Term {
    if let Ok(v) = word.parse::<i64>() {
        return Term::int(v);
    }
    if word.contains('.') {
        if let Ok(v) = word.parse::<f64>() {
            return Term::float(v);
        }
    }
    Term::Defined(word.to_string())
}

struct Parser {
    toks: Vec<Tok>,
    pos: usize,
}

impl Parser {
    fn next(&mut self) -> Option<Tok> {
        let t = self.toks.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn parse_list(&mut self) -> Result<Term, CharmError> {
        let mut items = Vec::new();
        loop {
            match self.next() {
                Some(Tok::RBracket) => return Ok(Term::List(items)),
                Some(Tok::LBracket) => items.push(self.parse_list()?),
                Some(Tok::Word(w)) => items.push(word_to_term(&w)),
                Some(Tok::Str(s)) => items.push(Term::String(s.into_bytes())),
                Some(Tok::Assign) => {
                    return Err(CharmError::ParseContractViolation(
                        "`:=` is not allowed inside a list".to_string(),
                    ))
                }
                Some(Tok::Semi) => {
                    return Err(CharmError::ParseContractViolation(
                        "`;` is not allowed inside a list".to_string(),
                    ))
                }
                None => {
                    return Err(CharmError::ParseContractViolation(
                        "unbalanced `[`".to_string(),
                    ))
                }
            }
        }
    }

    /// Body of a definition: everything up to a bare `;` or the end of
    /// the line. Definitions cannot nest.
    fn parse_body(&mut self, name: &str) -> Result<Vec<Term>, CharmError> {
        let mut body = Vec::new();
        loop {
            match self.next() {
                Some(Tok::Semi) | None => return Ok(body),
                Some(Tok::LBracket) => body.push(self.parse_list()?),
                Some(Tok::Word(w)) => body.push(word_to_term(&w)),
                Some(Tok::Str(s)) => body.push(Term::String(s.into_bytes())),
                Some(Tok::Assign) => {
                    return Err(CharmError::ParseContractViolation(format!(
                        "definition inside the body of `{}`",
                        name
                    )))
                }
                Some(Tok::RBracket) => {
                    return Err(CharmError::ParseContractViolation(
                        "unbalanced `]`".to_string(),
                    ))
                }
            }
        }
    }

    fn parse_line(&mut self) -> Result<Vec<Term>, CharmError> {
        let mut terms = Vec::new();
        loop {
            // `name :=` starts a definition
            if let (Some(Tok::Word(_)), Some(Tok::Assign)) =
                (self.toks.get(self.pos), self.toks.get(self.pos + 1))
            {
                let name = match self.next() {
                    Some(Tok::Word(w)) => w,
                    _ => unreachable!(),
                };
                if !matches!(word_to_term(&name), Term::Defined(_)) {
                    return Err(CharmError::ParseContractViolation(format!(
                        "`{}` cannot name a definition",
                        name
                    )));
                }
                self.next(); // the `:=`
                let body = self.parse_body(&name)?;
                terms.push(Term::Definition(Definition { name, body }));
                continue;
            }
            match self.next() {
                None => return Ok(terms),
                Some(Tok::Semi) => continue,
                Some(Tok::LBracket) => terms.push(self.parse_list()?),
                Some(Tok::Word(w)) => terms.push(word_to_term(&w)),
                Some(Tok::Str(s)) => terms.push(Term::String(s.into_bytes())),
                Some(Tok::Assign) => {
                    return Err(CharmError::ParseContractViolation(
                        "`:=` without a name to bind".to_string(),
                    ))
                }
                Some(Tok::RBracket) => {
                    return Err(CharmError::ParseContractViolation(
                        "unbalanced `]`".to_string(),
                    ))
                }
            }
        }
    }
}

/// Parse one line of source into a term sequence.
pub fn parse_line(line: &str) -> Result<Vec<Term>, CharmError> {
    let mut parser = Parser {
        toks: lex(line)?,
        pos: 0,
    };
    parser.parse_line()
}

//////////////////////////////////////////////
/// TESTS
///
#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str) -> Term {
        Term::Defined(name.to_string())
    }

    #[test]
    fn test_numbers_and_words() {
        let terms = parse_line("3 4 + -2 1.5").unwrap();
        assert_eq!(
            terms,
            vec![
                Term::int(3),
                Term::int(4),
                call("+"),
                Term::int(-2),
                Term::float(1.5)
            ]
        );
    }

    #[test]
    fn test_string_literal_keeps_spaces() {
        let terms = parse_line("\"hello world\" p").unwrap();
        assert_eq!(terms, vec![Term::string("hello world"), call("p")]);
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(
            parse_line("\"oops"),
            Err(CharmError::ParseContractViolation(_))
        ));
    }

    #[test]
    fn test_nested_lists() {
        let terms = parse_line("[ 1 [ 2 3 ] \"s\" ]").unwrap();
        assert_eq!(
            terms,
            vec![Term::list(vec![
                Term::int(1),
                Term::list(vec![Term::int(2), Term::int(3)]),
                Term::string("s"),
            ])]
        );
    }

    #[test]
    fn test_brackets_need_no_spaces() {
        let terms = parse_line("[1 2]").unwrap();
        assert_eq!(terms, vec![Term::list(vec![Term::int(1), Term::int(2)])]);
    }

    #[test]
    fn test_unbalanced_brackets() {
        assert!(parse_line("[ 1 2").is_err());
        assert!(parse_line("1 ]").is_err());
    }

    #[test]
    fn test_definition_runs_to_end_of_line() {
        let terms = parse_line("double := dup +").unwrap();
        assert_eq!(
            terms,
            vec![Term::Definition(Definition {
                name: "double".to_string(),
                body: vec![call("dup"), call("+")],
            })]
        );
    }

    #[test]
    fn test_semicolon_ends_definition() {
        let terms = parse_line("double := dup + ; 5 double").unwrap();
        assert_eq!(terms.len(), 3);
        assert!(matches!(terms[0], Term::Definition(_)));
        assert_eq!(terms[1], Term::int(5));
        assert_eq!(terms[2], call("double"));
    }

    #[test]
    fn test_definition_body_may_hold_lists() {
        let terms = parse_line("f := [ 1 ] [ \"hi\" p ] [ ] ifthen").unwrap();
        match &terms[0] {
            Term::Definition(def) => {
                assert_eq!(def.name, "f");
                assert_eq!(def.body.len(), 4);
                assert_eq!(def.body[3], call("ifthen"));
            }
            other => panic!("expected a definition, got {}", other),
        }
    }

    #[test]
    fn test_definitions_cannot_nest() {
        assert!(matches!(
            parse_line("f := g := dup"),
            Err(CharmError::ParseContractViolation(_))
        ));
        assert!(matches!(
            parse_line("[ f := dup ]"),
            Err(CharmError::ParseContractViolation(_))
        ));
    }

    #[test]
    fn test_numeric_definition_name_rejected() {
        assert!(matches!(
            parse_line("3 := dup"),
            Err(CharmError::ParseContractViolation(_))
        ));
    }

    #[test]
    fn test_empty_line() {
        assert!(parse_line("   ").unwrap().is_empty());
    }
}
