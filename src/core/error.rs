//! Error types for the kernel.
//!
//! Canonicalizers never fail for well-formed input. Errors only surface from the
//! explicitly checked entry points (`checked_div`, `checked_pow`) and from
//! visitors that leave the symbolic domain, such as numeric evaluation.

use thiserror::Error;

/// Errors reported by checked arithmetic and numeric evaluation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// Exact or floating division by a zero number
    #[error("division by zero")]
    DivisionByZero,

    /// `0^e` with `e <= 0`
    #[error("zero raised to a non-positive power is undefined")]
    ZeroToNonPositivePower,

    /// The expression contains the indeterminate marker
    #[error("expression is indeterminate")]
    Indeterminate,

    /// Evaluation reached a symbol with no bound value
    #[error("symbol '{0}' has no value")]
    UnboundSymbol(String),

    /// Evaluation or differentiation reached a function it does not know
    #[error("function '{0}' is not supported here")]
    UnknownFunction(String),

    /// A numeric result is not a finite real number
    #[error("result is not a finite real number")]
    NonFinite,
}
