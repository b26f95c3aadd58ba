//////////////////////////////////////////////////////////////////
//! runner.rs
//!
//! The Charm execution engine.
//!
//! The runner walks a term sequence left to right and dispatches each
//! term against the current stack: literals push a clone of
//! themselves, definitions register with the analyzer, and `Defined`
//! terms resolve to a builtin first, then to a user definition. A
//! `RunnerContext` is threaded through every nested invocation so the
//! control-flow operators can see which user definition encloses them;
//! that is what makes the `ifthen` tail-call elimination possible.
use log::debug;

use crate::analyzer::FunctionAnalyzer;
use crate::error::CharmError;
use crate::internals::builtin::{BuiltinCode, BuiltinTable};
use crate::internals::console::{Console, StdConsole};
use crate::stack::StackRegistry;
use crate::term::{CharmNumber, Term};

/// The execution frame describing who called us: the user definition
/// currently being executed, if any. The analyzer itself travels on
/// the runner, which every operator already holds.
#[derive(Debug, Clone, Default)]
pub struct RunnerContext {
    pub enclosing: Option<String>,
}

impl RunnerContext {
    /// A frame with no enclosing definition, as used for top-level
    /// execution and for lists activated through `i`.
    pub fn top_level() -> RunnerContext {
        RunnerContext { enclosing: None }
    }

    pub fn inside(name: &str) -> RunnerContext {
        RunnerContext {
            enclosing: Some(name.to_string()),
        }
    }
}

pub struct Runner {
    pub stacks: StackRegistry,
    pub analyzer: FunctionAnalyzer,
    pub console: Box<dyn Console>,
    builtins: BuiltinTable,
    /// Set when an `ifthen` tail-call loop completes: the tail call was
    /// the last thing its caller would have done, so every frame up to
    /// the enclosing definition unwinds without running further terms.
    pending_return: bool,
}

impl Runner {
    pub fn new() -> Runner {
        Runner::with_console(Box::new(StdConsole))
    }

    /// Build a runner on an alternative console, used by the tests and
    /// by graphical front-ends.
    pub fn with_console(console: Box<dyn Console>) -> Runner {
        Runner {
            stacks: StackRegistry::new(),
            analyzer: FunctionAnalyzer::new(),
            console,
            builtins: BuiltinTable::new(),
            pending_return: false,
        }
    }

    pub fn builtins(&self) -> &BuiltinTable {
        &self.builtins
    }

    /// Top-level entry point: execute `terms` with no enclosing
    /// definition in context.
    pub fn run(&mut self, terms: &[Term]) -> Result<(), CharmError> {
        self.run_with_context(terms, &RunnerContext::top_level())
    }

    /// Continue execution under a supplied frame. The control-flow
    /// operators re-enter the runner through this.
    pub fn run_with_context(
        &mut self,
        terms: &[Term],
        context: &RunnerContext,
    ) -> Result<(), CharmError> {
        for term in terms {
            match term {
                Term::Number(_) | Term::String(_) | Term::List(_) => {
                    self.stacks.current_mut().push(term.clone())?
                }
                Term::Definition(_) => self.analyzer.add_definition(term)?,
                Term::Defined(name) => self.call(name, context)?,
            }
            if self.pending_return {
                break;
            }
        }
        Ok(())
    }

    /// True once an `ifthen` tail-call loop has asked the enclosing
    /// definition to unwind. Read by the control-flow operators.
    pub fn returning(&self) -> bool {
        self.pending_return
    }

    /// Ask every frame up to the enclosing definition to unwind.
    pub(crate) fn request_return(&mut self) {
        self.pending_return = true;
    }

    /// Resolve a `Defined` term: builtin first, user definition second.
    /// Shadowing a builtin is not supported.
    fn call(&mut self, name: &str, context: &RunnerContext) -> Result<(), CharmError> {
        if let Some(code) = self.builtins.lookup(name) {
            return match code {
                BuiltinCode::Plain(f) => f(self),
                BuiltinCode::WithContext(f) => f(self, context),
            };
        }
        let Some(mut body) = self.analyzer.definition(name).cloned() else {
            return Err(CharmError::UnknownFunction(name.to_string()));
        };
        let frame = RunnerContext::inside(name);
        if FunctionAnalyzer::is_tail_call_recursive(name, &body) {
            // `f := <code> f` runs as a local loop instead of recursing
            // through the host stack. Only a fatal error or an `ifthen`
            // return inside the body leaves it.
            debug!("engaging tail call loop for `{}`", name);
            body.pop();
            loop {
                self.run_with_context(&body, &frame)?;
                if self.pending_return {
                    self.pending_return = false;
                    return Ok(());
                }
            }
        }
        let result = self.run_with_context(&body, &frame);
        // a pending return ends at its enclosing definition
        self.pending_return = false;
        result
    }

    /// Fetch one operand for `op` from the current stack.
    pub fn pop_operand(&mut self, op: &'static str) -> Result<Term, CharmError> {
        self.stacks.current_mut().pop().map_err(|_| {
            CharmError::ArityError(format!("`{}` needs more operands than the stack holds", op))
        })
    }

    /// Fetch two integer operands, returned as (first-popped,
    /// second-popped). The arithmetic operators work only on the
    /// integer tag.
    pub fn pop_int2(&mut self, op: &'static str) -> Result<(i64, i64), CharmError> {
        let f1 = self.pop_operand(op)?;
        let f2 = self.pop_operand(op)?;
        Ok((int_operand(&f1, op)?, int_operand(&f2, op)?))
    }

    pub fn push_term(&mut self, t: Term) -> Result<(), CharmError> {
        self.stacks.current_mut().push(t)
    }
}

impl Default for Runner {
    fn default() -> Self {
        Runner::new()
    }
}

/// The integer payload of `t`, or a TypeError naming the operator.
pub fn int_operand(t: &Term, op: &'static str) -> Result<i64, CharmError> {
    match t {
        Term::Number(CharmNumber::Int(v)) => Ok(*v),
        _ => Err(CharmError::TypeError(format!(
            "non integer passed to `{}`",
            op
        ))),
    }
}
