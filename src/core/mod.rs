//! Core types for the canonical-form kernel
//!
//! This module contains the fundamental types:
//! - `Number` - exact and floating numeric values
//! - `Expr` / `ExprKind` - shared expression nodes
//! - `Terms` - base → multiplicity containers backing sums and products
//! - `SymbolContext` - explicit registry of shared symbol nodes
//! - `KernelError` - error type of checked operations

pub(crate) mod error;
pub(crate) mod expr;
pub(crate) mod number;
pub(crate) mod symbol;
pub(crate) mod terms;

pub use error::KernelError;
pub use expr::{Constant, Expr, ExprKind, NodeType, compute_expr_hash, expr_cmp};
pub use number::{ComplexRational, Number};
pub use symbol::{SymbolContext, SymbolKey};
pub use terms::{FactorTerms, Multiplicity, SumTerms, Terms};
