//! Property-based tests for the canonical form and expansion
//!
//! Uses quickcheck over randomly generated exact expressions in `x`, `y`, `z`.

use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

use crate::{Expr, expr_cmp, make_power, make_product, make_sum};

// ============================================================
// PART 1: EXPRESSION GENERATORS
// ============================================================

/// Random canonical expression with exact coefficients
#[derive(Clone, Debug)]
struct ArbExpr(Expr);

impl Arbitrary for ArbExpr {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = g.size().min(3);
        Self(gen_expr(g, depth))
    }
}

/// Shallower expression, small enough to expand quickly
#[derive(Clone, Debug)]
struct SmallExpr(Expr);

impl Arbitrary for SmallExpr {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = g.size().min(2);
        Self(gen_expr(g, depth))
    }
}

fn gen_leaf(g: &mut Gen) -> Expr {
    match u8::arbitrary(g) % 6 {
        0 => Expr::integer(i64::from(i8::arbitrary(g) % 4)),
        1 => {
            let num = i64::from(i8::arbitrary(g) % 5);
            let den = i64::from(u8::arbitrary(g) % 4) + 1;
            Expr::rational(num, den).unwrap_or_else(|_| Expr::one())
        }
        2 => Expr::symbol("x"),
        3 => Expr::symbol("y"),
        4 => Expr::symbol("z"),
        _ => Expr::pi(),
    }
}

fn gen_expr(g: &mut Gen, depth: usize) -> Expr {
    if depth == 0 {
        return gen_leaf(g);
    }
    match u8::arbitrary(g) % 8 {
        0..=1 => {
            let n = usize::arbitrary(g) % 2 + 2;
            make_sum((0..n).map(|_| gen_expr(g, depth - 1)))
        }
        2..=3 => {
            let n = usize::arbitrary(g) % 2 + 2;
            make_product((0..n).map(|_| gen_expr(g, depth - 1)))
        }
        4 => {
            let exp = Expr::integer(i64::from(u8::arbitrary(g) % 2) + 1);
            make_power(&gen_expr(g, depth - 1), &exp)
        }
        5 => gen_expr(g, depth - 1).sin(),
        _ => gen_leaf(g),
    }
}

fn sample_point() -> FxHashMap<String, f64> {
    [("x", 0.7), ("y", -1.3), ("z", 0.4)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

// ============================================================
// PART 2: CANONICAL FORM PROPERTIES
// ============================================================

#[cfg(test)]
mod canonical_properties {
    use super::*;

    /// Property: operand order never changes a sum or product
    #[test]
    fn test_permutation_invariance() {
        fn prop_permutation(items: Vec<ArbExpr>, rotate: usize) -> bool {
            let forward: Vec<Expr> = items.into_iter().take(6).map(|a| a.0).collect();
            let mut reversed = forward.clone();
            reversed.reverse();
            let mut rotated = forward.clone();
            if !rotated.is_empty() {
                let k = rotate % rotated.len();
                rotated.rotate_left(k);
            }

            let sum = make_sum(forward.clone());
            let product = make_product(forward);
            sum == make_sum(reversed.clone())
                && sum == make_sum(rotated.clone())
                && product == make_product(reversed)
                && product == make_product(rotated)
        }
        QuickCheck::new()
            .tests(300)
            .quickcheck(prop_permutation as fn(Vec<ArbExpr>, usize) -> bool);
    }

    /// Property: grouping never changes a sum or product
    #[test]
    fn test_grouping_invariance() {
        fn prop_grouping(a: ArbExpr, b: ArbExpr, c: ArbExpr) -> bool {
            let (a, b, c) = (a.0, b.0, c.0);
            let flat_sum = make_sum([a.clone(), b.clone(), c.clone()]);
            let flat_product = make_product([a.clone(), b.clone(), c.clone()]);
            make_sum([make_sum([a.clone(), b.clone()]), c.clone()]) == flat_sum
                && make_sum([a.clone(), make_sum([b.clone(), c.clone()])]) == flat_sum
                && make_product([make_product([a.clone(), b.clone()]), c.clone()]) == flat_product
                && make_product([a, make_product([b, c])]) == flat_product
        }
        QuickCheck::new()
            .tests(300)
            .quickcheck(prop_grouping as fn(ArbExpr, ArbExpr, ArbExpr) -> bool);
    }

    /// Property: canonicalizing a canonical expression again changes nothing
    #[test]
    fn test_single_operand_is_fixed_point() {
        fn prop_fixed_point(a: ArbExpr) -> bool {
            let e = a.0;
            make_sum([e.clone()]) == e
                && make_product([e.clone()]) == e
                && &e + Expr::zero() == e
                && &e * Expr::one() == e
                && make_power(&e, &Expr::one()) == e
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(prop_fixed_point as fn(ArbExpr) -> bool);
    }

    /// Property: every constructed node satisfies the canonical invariants
    #[test]
    fn test_generated_expressions_are_canonical() {
        fn prop_canonical(a: ArbExpr) -> bool {
            a.0.is_canonical()
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(prop_canonical as fn(ArbExpr) -> bool);
    }

    /// Property: equal expressions hash equally
    #[test]
    fn test_hash_consistent_with_equality() {
        fn prop_hash(a: ArbExpr, b: ArbExpr) -> bool {
            let ab = &a.0 + &b.0;
            let ba = &b.0 + &a.0;
            ab == ba && ab.structural_hash() == ba.structural_hash()
        }
        QuickCheck::new()
            .tests(300)
            .quickcheck(prop_hash as fn(ArbExpr, ArbExpr) -> bool);
    }
}

// ============================================================
// PART 3: ORDERING PROPERTIES
// ============================================================

#[cfg(test)]
mod ordering_properties {
    use super::*;

    /// Property: the order is antisymmetric and agrees with equality
    #[test]
    fn test_order_antisymmetric() {
        fn prop_antisymmetric(a: ArbExpr, b: ArbExpr) -> bool {
            let ab = expr_cmp(&a.0, &b.0);
            let ba = expr_cmp(&b.0, &a.0);
            ab == ba.reverse() && ((ab == Ordering::Equal) == (a.0 == b.0))
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(prop_antisymmetric as fn(ArbExpr, ArbExpr) -> bool);
    }

    /// Property: the order is transitive
    #[test]
    fn test_order_transitive() {
        fn prop_transitive(a: ArbExpr, b: ArbExpr, c: ArbExpr) -> bool {
            let mut v = [a.0, b.0, c.0];
            v.sort();
            expr_cmp(&v[0], &v[1]) != Ordering::Greater
                && expr_cmp(&v[1], &v[2]) != Ordering::Greater
                && expr_cmp(&v[0], &v[2]) != Ordering::Greater
        }
        QuickCheck::new()
            .tests(300)
            .quickcheck(prop_transitive as fn(ArbExpr, ArbExpr, ArbExpr) -> bool);
    }
}

// ============================================================
// PART 4: EXPANSION PROPERTIES
// ============================================================

#[cfg(test)]
mod expand_properties {
    use super::*;

    /// Property: expanding twice is the same as expanding once
    #[test]
    fn test_expand_idempotent() {
        fn prop_idempotent(a: SmallExpr) -> bool {
            let once = a.0.expand();
            once.expand() == once
        }
        QuickCheck::new()
            .tests(200)
            .quickcheck(prop_idempotent as fn(SmallExpr) -> bool);
    }

    /// Property: expansion preserves the numeric value
    #[test]
    fn test_expand_preserves_value() {
        fn prop_value(a: SmallExpr) -> TestResult {
            let point = sample_point();
            let Ok(before) = a.0.eval_f64(&point) else {
                return TestResult::discard();
            };
            match a.0.expand().eval_f64(&point) {
                Ok(after) => TestResult::from_bool(approx_eq(before, after)),
                Err(_) => TestResult::failed(),
            }
        }
        QuickCheck::new()
            .tests(200)
            .quickcheck(prop_value as fn(SmallExpr) -> TestResult);
    }

    /// Property: expansion distributes over addition
    #[test]
    fn test_expand_additive() {
        fn prop_additive(a: SmallExpr, b: SmallExpr) -> bool {
            (&a.0 + &b.0).expand() == &a.0.expand() + &b.0.expand()
        }
        QuickCheck::new()
            .tests(200)
            .quickcheck(prop_additive as fn(SmallExpr, SmallExpr) -> bool);
    }
}
