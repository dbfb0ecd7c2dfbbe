//! Canonical-Form Symbolic Algebra Kernel
//!
//! A small core for symbolic algebra: immutable, shared expression trees kept
//! in a canonical form, plus polynomial-style expansion.
//!
//! # Features
//! - Exact integer, rational and complex arithmetic with float promotion
//! - Sums and products stored as flat base → multiplicity maps, so
//!   reordering, regrouping and like-term combination never change structure
//! - Cached structural hashing for fast equality and lookup
//! - A deterministic total order for printing and enumeration
//! - Visitor and transform traits for writing passes over trees
//! - Multinomial expansion of products and integer powers of sums
//! - Explicit symbol contexts instead of global registries
//!
//! # Usage
//!
//! ```
//! use symb_canon::{Expr, SymbolContext};
//!
//! let ctx = SymbolContext::new();
//! let x = ctx.symbol("x");
//! let y = ctx.symbol("y");
//!
//! // Canonicalization happens on construction
//! assert_eq!(&x + &y, &y + &x);
//! assert_eq!(&x * &x, x.pow(&Expr::integer(2)));
//!
//! // Expansion is explicit
//! let e = (&x + &y).pow(&Expr::integer(2)).expand();
//! assert_eq!(e.to_string(), "2*x*y + x^2 + y^2");
//! ```

mod canonical;
mod core;
mod expand;
pub mod visitor;

#[cfg(feature = "parallel")]
pub mod parallel;

#[cfg(test)]
mod tests;

// Re-export key types for easier usage
pub use canonical::{checked_pow, make_power, make_product, make_sum};
pub use core::{
    ComplexRational, Constant, Expr, ExprKind, FactorTerms, KernelError, Multiplicity, NodeType,
    Number, SumTerms, SymbolContext, SymbolKey, Terms, compute_expr_hash, expr_cmp,
};
pub use expand::{Expand, expand, multinomial_coefficients};
pub use visitor::{
    Differentiate, EvalF64, NodeCounter, StrPrinter, Subs, SymbolCollector, Transform, Visitor,
    coeff, count_nodes, dispatch_transform, free_symbols, has_symbol, postorder, walk_expr,
};
