//! Expression nodes and the shared handle that owns them.
//!
//! This module defines:
//! - `Expr` - a cheap, clonable handle onto an immutable node
//! - `ExprKind` - the closed set of node variants
//! - `NodeType` - the variant tag, which also fixes the engine-wide kind order
//!
//! # Architecture
//!
//! ## Shared ownership
//! A node is reference counted and never mutated after construction. Cloning an
//! `Expr` shares the node; the node is freed when its last handle goes away.
//! Deeply nested trees are released iteratively, so dropping never recurses.
//!
//! ## Structural hashing
//! Each node stores the hash of its structure, computed once at construction.
//! Equality rejects on a hash mismatch before comparing structure, and
//! term containers look bases up through the cached value.
//!
//! ## Canonical construction
//! Sum, product and power nodes are produced by the canonicalizers in
//! [`crate::canonical`]. The raw builders in this module only assemble nodes
//! that are already canonical and check that in debug builds.
//!
//! # Usage
//!
//! ```
//! use symb_canon::Expr;
//!
//! let x = Expr::symbol("x");
//! let y = Expr::symbol("y");
//! let e = (&x + &y) * (&x - &y);
//! let two = Expr::integer(2);
//! assert_eq!(e.expand(), x.pow(&two) - y.pow(&two));
//! ```

mod constructors;
mod hash;
mod operators;
mod ordering;

use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::core::number::Number;
use crate::core::terms::{FactorTerms, SumTerms};

pub(crate) use constructors::raise;
pub use hash::compute_expr_hash;
pub use ordering::expr_cmp;

// =============================================================================
// CACHED NODES
// =============================================================================

/// Shared zero, swapped into binary nodes while they are torn down
static DUMMY: LazyLock<Expr> = LazyLock::new(|| Expr::number(Number::zero()));

// =============================================================================
// EXPR - shared handle
// =============================================================================

/// A handle onto an immutable, reference-counted expression node.
///
/// `clone` shares the node, dropping the last handle frees it. Two handles
/// compare equal when their nodes are structurally identical, whether or not
/// they share storage.
#[derive(Clone)]
pub struct Expr(Arc<ExprNode>);

/// Node storage: the variant plus its cached structural hash
pub struct ExprNode {
    hash: u64,
    kind: ExprKind,
}

/// The variants an expression node can take.
///
/// Sum, product and power nodes only ever hold canonical content; build them
/// through [`crate::canonical`] or the operator overloads.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Exact or floating number
    Number(Number),

    /// Named mathematical constant
    Constant(Constant),

    /// Free symbol, identified by name
    Symbol(Arc<str>),

    /// `offset + Σ coefficient·term`
    Sum {
        /// Numeric offset
        offset: Number,
        /// Term → nonzero coefficient
        terms: SumTerms,
    },

    /// `coef · Π base^exponent`
    Product {
        /// Nonzero numeric coefficient
        coef: Number,
        /// Base → nonzero exponent
        factors: FactorTerms,
    },

    /// `base^exp` that could not be simplified further
    Pow(Expr, Expr),

    /// Application of a named function
    Function {
        /// Function name
        name: Arc<str>,
        /// Arguments, in call order
        args: Vec<Expr>,
    },

    /// Result of an undefined operation such as `0^0`
    Indeterminate,
}

/// Mathematical constants that are kept symbolic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Constant {
    /// π
    Pi,
    /// Euler's number
    E,
    /// Euler–Mascheroni constant
    EulerGamma,
}

impl Constant {
    /// Printed name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::E => "E",
            Self::EulerGamma => "EulerGamma",
        }
    }

    /// Floating-point value
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
            Self::E => std::f64::consts::E,
            Self::EulerGamma => 0.577_215_664_901_532_9,
        }
    }
}

/// Variant tag of a node.
///
/// The declaration order is the kind order used by [`expr_cmp`]:
/// numbers sort before constants, then symbols, sums, products, powers,
/// functions, and finally the indeterminate marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeType {
    Number,
    Constant,
    Symbol,
    Sum,
    Product,
    Pow,
    Function,
    Indeterminate,
}

impl ExprKind {
    /// Variant tag
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        match self {
            Self::Number(_) => NodeType::Number,
            Self::Constant(_) => NodeType::Constant,
            Self::Symbol(_) => NodeType::Symbol,
            Self::Sum { .. } => NodeType::Sum,
            Self::Product { .. } => NodeType::Product,
            Self::Pow(..) => NodeType::Pow,
            Self::Function { .. } => NodeType::Function,
            Self::Indeterminate => NodeType::Indeterminate,
        }
    }
}

impl Expr {
    /// Wrap a node kind, computing its structural hash
    pub(crate) fn from_kind(kind: ExprKind) -> Self {
        let hash = compute_expr_hash(&kind);
        Self(Arc::new(ExprNode { hash, kind }))
    }

    /// The node variant
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &ExprKind {
        &self.0.kind
    }

    /// Variant tag of this node
    #[inline]
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.0.kind.node_type()
    }

    /// Cached structural hash
    #[inline]
    #[must_use]
    pub fn structural_hash(&self) -> u64 {
        self.0.hash
    }

    /// True when both handles share one node
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles onto this node
    #[must_use]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl PartialEq for Expr {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.0.hash != other.0.hash {
            return false;
        }
        self.0.kind == other.0.kind
    }
}

impl Eq for Expr {}

impl std::hash::Hash for Expr {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash.hash(state);
    }
}

impl PartialOrd for Expr {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Expr {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        expr_cmp(self, other)
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({self})")
    }
}

// =============================================================================
// DROP IMPLEMENTATION - Iterative drop to prevent stack overflow
// =============================================================================

impl Drop for ExprNode {
    fn drop(&mut self) {
        fn drain_children(kind: &mut ExprKind, queue: &mut Vec<Expr>) {
            match kind {
                ExprKind::Sum { terms, .. } => {
                    queue.extend(std::mem::take(terms).into_iter().map(|(t, _)| t));
                }
                ExprKind::Product { factors, .. } => {
                    for (base, exp) in std::mem::take(factors) {
                        queue.push(base);
                        queue.push(exp);
                    }
                }
                ExprKind::Pow(base, exp) => {
                    queue.push(std::mem::replace(base, DUMMY.clone()));
                    queue.push(std::mem::replace(exp, DUMMY.clone()));
                }
                ExprKind::Function { args, .. } => {
                    queue.extend(std::mem::take(args));
                }
                ExprKind::Number(_)
                | ExprKind::Constant(_)
                | ExprKind::Symbol(_)
                | ExprKind::Indeterminate => {}
            }
        }

        let mut work_queue = Vec::new();
        drain_children(&mut self.kind, &mut work_queue);

        while let Some(child) = work_queue.pop() {
            if let Ok(mut node) = Arc::try_unwrap(child.0) {
                drain_children(&mut node.kind, &mut work_queue);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::panic,
    reason = "Standard test relaxations"
)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_node() {
        let x = Expr::symbol("x");
        let y = x.clone();
        assert!(x.ptr_eq(&y));
        assert_eq!(x.strong_count(), 2);
        drop(y);
        assert_eq!(x.strong_count(), 1);
    }

    #[test]
    fn test_structural_equality_without_sharing() {
        let a = Expr::symbol("x") + Expr::integer(1);
        let b = Expr::integer(1) + Expr::symbol("x");
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
        assert_eq!(a.structural_hash(), b.structural_hash());
    }

    #[test]
    fn test_children_outlive_parent() {
        let x = Expr::symbol("x");
        let pow = x.pow(&Expr::integer(3));
        let ExprKind::Pow(base, _) = pow.kind() else {
            panic!("expected power, got {pow:?}");
        };
        let base = base.clone();
        drop(pow);
        assert_eq!(base, x);
    }

    #[test]
    fn test_deep_chain_drops_without_overflow() {
        let mut e = Expr::symbol("x");
        for i in 0..100_000 {
            e = Expr::function("f", vec![e, Expr::integer(i)]);
        }
        drop(e);
    }
}
