//! Runtime error types for the Charm interpreter.
//!
//! Every error in this taxonomy is fatal: the language has no exception
//! model, so nothing here ever crosses back into Charm-visible behavior.
//! The binary prints the diagnostic to stderr and exits nonzero.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CharmError {
    /// An operator received an operand of the wrong variant.
    #[error("TypeError: {0}")]
    TypeError(String),

    /// A pop was attempted on an empty stack.
    #[error("StackUnderflow: {0}")]
    StackUnderflow(String),

    /// A push would exceed the stack's capacity.
    #[error("StackOverflow: {0}")]
    StackOverflow(String),

    /// An index fell outside the cells of a stack or collection.
    #[error("IndexOutOfRange: {0}")]
    IndexOutOfRange(String),

    /// A `Defined` term named neither a builtin nor a registered definition.
    #[error("UnknownFunction: nothing named `{0}` is defined")]
    UnknownFunction(String),

    /// `switchstack` named a stack that was never created.
    #[error("UnknownStack: no stack named {0}")]
    UnknownStack(String),

    /// An operator needed more operands than the stack holds.
    #[error("ArityError: {0}")]
    ArityError(String),

    /// The parser or a caller broke a structural contract, e.g. registering
    /// a non-definition term as a definition.
    #[error("ParseContractViolation: {0}")]
    ParseContractViolation(String),

    /// Integer division or modulus by zero.
    #[error("DivisionByZero: {0}")]
    DivisionByZero(String),
}
