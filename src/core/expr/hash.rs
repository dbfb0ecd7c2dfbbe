//! Structural hashing for expression nodes.
//!
//! The hash is computed once per node from the variant tag and the cached
//! hashes of its children. Sum and product contents are combined with a
//! commutative fold, so the hash does not depend on insertion order.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use super::ExprKind;

/// Compute the structural hash of a node kind
pub fn compute_expr_hash(kind: &ExprKind) -> u64 {
    let mut hasher = FxHasher::default();
    kind.node_type().hash(&mut hasher);
    match kind {
        ExprKind::Number(n) => n.hash(&mut hasher),
        ExprKind::Constant(c) => c.hash(&mut hasher),
        ExprKind::Symbol(name) => name.hash(&mut hasher),
        ExprKind::Sum { offset, terms } => {
            offset.hash(&mut hasher);
            terms.structural_hash().hash(&mut hasher);
        }
        ExprKind::Product { coef, factors } => {
            coef.hash(&mut hasher);
            factors.structural_hash().hash(&mut hasher);
        }
        ExprKind::Pow(base, exp) => {
            base.structural_hash().hash(&mut hasher);
            exp.structural_hash().hash(&mut hasher);
        }
        ExprKind::Function { name, args } => {
            name.hash(&mut hasher);
            for arg in args {
                arg.structural_hash().hash(&mut hasher);
            }
        }
        ExprKind::Indeterminate => {}
    }
    hasher.finish()
}
