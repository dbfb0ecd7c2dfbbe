//! Canonical ordering for expressions.
//!
//! A strict total order used to print and enumerate operands deterministically.
//! It never affects equality. Two nodes compare `Equal` exactly when they are
//! structurally equal.

use std::cmp::Ordering as CmpOrdering;

use super::{Expr, ExprKind};
use crate::core::terms::Terms;

/// Compare expressions for canonical ordering.
///
/// Order: Number < Constant < Symbol < Sum < Product < Pow < Function < Indeterminate.
/// Ties within a kind are broken structurally:
/// - numbers by value, symbols by name
/// - sums and products by entry count, then numeric part, then sorted entries
/// - powers by base, then exponent
/// - functions by name, then arity, then arguments left to right
pub fn expr_cmp(a: &Expr, b: &Expr) -> CmpOrdering {
    use ExprKind::{Constant, Function, Indeterminate, Number, Pow, Product, Sum, Symbol};

    if a.ptr_eq(b) {
        return CmpOrdering::Equal;
    }

    let by_type = a.node_type().cmp(&b.node_type());
    if by_type != CmpOrdering::Equal {
        return by_type;
    }

    match (a.kind(), b.kind()) {
        (Number(x), Number(y)) => x.cmp(y),
        (Constant(x), Constant(y)) => x.cmp(y),
        (Symbol(x), Symbol(y)) => x.as_ref().cmp(y.as_ref()),

        (Sum { offset: o1, terms: t1 }, Sum { offset: o2, terms: t2 }) => t1
            .len()
            .cmp(&t2.len())
            .then_with(|| o1.cmp(o2))
            .then_with(|| cmp_entries(t1, t2, |c1, c2| c1.cmp(c2))),

        (Product { coef: c1, factors: f1 }, Product { coef: c2, factors: f2 }) => f1
            .len()
            .cmp(&f2.len())
            .then_with(|| c1.cmp(c2))
            .then_with(|| cmp_entries(f1, f2, expr_cmp)),

        (Pow(b1, e1), Pow(b2, e2)) => expr_cmp(b1, b2).then_with(|| expr_cmp(e1, e2)),

        (Function { name: n1, args: a1 }, Function { name: n2, args: a2 }) => n1
            .as_ref()
            .cmp(n2.as_ref())
            .then_with(|| a1.len().cmp(&a2.len()))
            .then_with(|| cmp_sequences(a1, a2)),

        (Indeterminate, Indeterminate) => CmpOrdering::Equal,

        // Same node type implies same variant
        _ => CmpOrdering::Equal,
    }
}

/// Lexicographic comparison of two equal-length argument lists
fn cmp_sequences(a: &[Expr], b: &[Expr]) -> CmpOrdering {
    for (x, y) in a.iter().zip(b) {
        match expr_cmp(x, y) {
            CmpOrdering::Equal => {}
            other => return other,
        }
    }
    CmpOrdering::Equal
}

/// Compare two containers of equal size entry by entry, in sorted base order
fn cmp_entries<V, F>(a: &Terms<V>, b: &Terms<V>, cmp_value: F) -> CmpOrdering
where
    V: crate::core::terms::Multiplicity,
    F: Fn(&V, &V) -> CmpOrdering,
{
    for ((base_a, m_a), (base_b, m_b)) in a.sorted().into_iter().zip(b.sorted()) {
        let ord = expr_cmp(base_a, base_b).then_with(|| cmp_value(m_a, m_b));
        if ord != CmpOrdering::Equal {
            return ord;
        }
    }
    CmpOrdering::Equal
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;
    use crate::core::expr::Constant;

    #[test]
    fn test_kind_order() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let ordered = [
            Expr::integer(7),
            Expr::constant(Constant::Pi),
            x.clone(),
            &x + &y,
            &x * &y,
            x.pow(&y),
            Expr::function("sin", vec![x.clone()]),
            Expr::indeterminate(),
        ];
        for pair in ordered.windows(2) {
            assert_eq!(expr_cmp(&pair[0], &pair[1]), CmpOrdering::Less, "{pair:?}");
            assert_eq!(expr_cmp(&pair[1], &pair[0]), CmpOrdering::Greater, "{pair:?}");
        }
    }

    #[test]
    fn test_equal_iff_structurally_equal() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let a = &x * &x + &y;
        let b = &y + x.pow(&Expr::integer(2));
        assert_eq!(expr_cmp(&a, &b), CmpOrdering::Equal);
        let c = &y + x.pow(&Expr::integer(3));
        assert_ne!(expr_cmp(&a, &c), CmpOrdering::Equal);
    }

    #[test]
    fn test_sums_compare_by_size_then_offset() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let z = Expr::symbol("z");
        let small = &x + &y + Expr::integer(5);
        let large = &x + &y + &z;
        assert_eq!(expr_cmp(&small, &large), CmpOrdering::Less);
        let offset_one = &x + &y + Expr::integer(1);
        assert_eq!(expr_cmp(&offset_one, &small), CmpOrdering::Less);
    }

    #[test]
    fn test_sorting_is_deterministic() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let mut v1 = vec![y.clone(), Expr::integer(2), x.pow(&y), x.clone()];
        let mut v2 = vec![x.pow(&y), x.clone(), y.clone(), Expr::integer(2)];
        v1.sort();
        v2.sort();
        assert_eq!(v1, v2);
        assert_eq!(v1[0], Expr::integer(2));
        assert_eq!(v1[1], x);
    }
}
