// Control flow: `i`, `ifthen`, `inline`.
//
// These are the operators that re-enter the runner on list bodies, and
// the only ones that read the RunnerContext. `ifthen` is where Charm
// loops come from: when a branch of a conditional ends with a call to
// the enclosing definition, the recursion is rewritten into a local
// loop so idiomatic Charm runs in constant host-stack space.

use log::debug;

use crate::error::CharmError;
use crate::runner::{int_operand, Runner, RunnerContext};
use crate::term::Term;

fn list_operand(t: Term, op: &'static str) -> Result<Vec<Term>, CharmError> {
    match t {
        Term::List(items) => Ok(items),
        _ => Err(CharmError::TypeError(format!("non list passed to `{}`", op))),
    }
}

/// Does this branch end with a call to the enclosing definition?
fn ends_with_call(body: &[Term], name: &str) -> bool {
    matches!(body.last(), Some(Term::Defined(n)) if n == name)
}

impl Runner {
    /// i ( [body] -- ... ) Execute a list in the current runner. The
    /// nested execution starts a fresh frame with no enclosing
    /// definition, so an `ifthen` inside it can never mistake the list
    /// for a tail-call site.
    pub fn f_i(&mut self, _context: &RunnerContext) -> Result<(), CharmError> {
        let f1 = self.pop_operand("i")?;
        let body = list_operand(f1, "i")?;
        self.run_with_context(&body, &RunnerContext::top_level())
    }

    /// inline ( [body] -- [body'] ) Produce a list in which every
    /// immediate `Defined` child that references an inline-ready
    /// definition is replaced by that definition's body. One level
    /// deep: nested lists pass through untouched, since activating
    /// them goes back through `i` anyway.
    pub fn f_inline(&mut self, _context: &RunnerContext) -> Result<(), CharmError> {
        let f1 = self.pop_operand("inline")?;
        let body = list_operand(f1, "inline")?;
        let mut out = Vec::with_capacity(body.len());
        for term in body {
            if matches!(term, Term::Defined(_)) {
                if !self.analyzer.do_inline(&mut out, &term) {
                    out.push(term);
                }
            } else {
                out.push(term);
            }
        }
        self.push_term(Term::List(out))
    }

    /// Evaluate a condition list and pop the resulting integer.
    fn run_condition(
        &mut self,
        cond: &[Term],
        context: &RunnerContext,
    ) -> Result<i64, CharmError> {
        self.run_with_context(cond, context)?;
        let result = self.pop_operand("ifthen")?;
        int_operand(&result, "ifthen").map_err(|_| {
            CharmError::TypeError("`ifthen` condition returned non integer".to_string())
        })
    }

    /// ifthen ( [cond] [truthy] [falsy] -- ... ) Run the condition,
    /// then the truthy branch when it is strictly positive, else the
    /// falsy branch.
    ///
    /// Inside a user definition the operator performs tail-call
    /// elimination. A branch ending with a call to the enclosing
    /// definition is stripped of that call and the conditional becomes
    /// a loop, re-evaluating the condition every iteration. When a
    /// one-sided loop exits because the condition flipped, the opposite
    /// branch runs once and the enclosing definition unwinds: the tail
    /// call was the last thing it would have done.
    pub fn f_ifthen(&mut self, context: &RunnerContext) -> Result<(), CharmError> {
        let falsy = self.pop_operand("ifthen")?;
        let truthy = self.pop_operand("ifthen")?;
        let cond = self.pop_operand("ifthen")?;
        let mut truthy = list_operand(truthy, "ifthen")?;
        let mut falsy = list_operand(falsy, "ifthen")?;

        // A list condition is a program to evaluate; anything else is a
        // one-term program, i.e. the condition value itself. A value
        // condition cannot be re-evaluated, so it never starts a loop.
        let cond = match cond {
            Term::List(items) => items,
            other => {
                let c = int_operand(&other, "ifthen").map_err(|_| {
                    CharmError::TypeError("`ifthen` condition returned non integer".to_string())
                })?;
                return if c > 0 {
                    self.run_with_context(&truthy, context)
                } else {
                    self.run_with_context(&falsy, context)
                };
            }
        };

        if let Some(name) = &context.enclosing {
            let truthy_tail = ends_with_call(&truthy, name);
            let falsy_tail = ends_with_call(&falsy, name);
            if truthy_tail && falsy_tail {
                // both branches loop; only a fatal error gets out
                debug!("engaging truthy/falsy ifthen tail call loop in `{}`", name);
                truthy.pop();
                falsy.pop();
                loop {
                    let c = self.run_condition(&cond, context)?;
                    if c > 0 {
                        self.run_with_context(&truthy, context)?;
                    } else {
                        self.run_with_context(&falsy, context)?;
                    }
                    if self.returning() {
                        return Ok(());
                    }
                }
            }
            if truthy_tail {
                debug!("engaging truthy ifthen tail call loop in `{}`", name);
                truthy.pop();
                loop {
                    let c = self.run_condition(&cond, context)?;
                    if c > 0 {
                        self.run_with_context(&truthy, context)?;
                        if self.returning() {
                            return Ok(());
                        }
                    } else {
                        self.run_with_context(&falsy, context)?;
                        debug!("disengaging truthy ifthen tail call loop");
                        self.request_return();
                        return Ok(());
                    }
                }
            }
            if falsy_tail {
                debug!("engaging falsy ifthen tail call loop in `{}`", name);
                falsy.pop();
                loop {
                    let c = self.run_condition(&cond, context)?;
                    if c > 0 {
                        self.run_with_context(&truthy, context)?;
                        debug!("disengaging falsy ifthen tail call loop");
                        self.request_return();
                        return Ok(());
                    } else {
                        self.run_with_context(&falsy, context)?;
                        if self.returning() {
                            return Ok(());
                        }
                    }
                }
            }
        }

        // no tail call (or no enclosing definition): one shot
        let c = self.run_condition(&cond, context)?;
        if c > 0 {
            self.run_with_context(&truthy, context)
        } else {
            self.run_with_context(&falsy, context)
        }
    }
}
