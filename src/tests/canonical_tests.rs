use std::cmp::Ordering;

use crate::{Expr, ExprKind, KernelError, Number, checked_pow, expr_cmp, make_power, make_product, make_sum};

fn int(n: i64) -> Expr {
    Expr::integer(n)
}

fn sym(name: &str) -> Expr {
    Expr::symbol(name)
}

// ============================================================
// Degeneracy reductions
// ============================================================

#[test]
fn test_empty_compounds() {
    assert_eq!(make_sum(std::iter::empty()), int(0));
    assert_eq!(make_product(std::iter::empty()), int(1));
}

#[test]
fn test_zero_to_zero_is_indeterminate() {
    let r = make_power(&int(0), &int(0));
    assert!(r.is_indeterminate());
    assert_ne!(r, int(1));
    assert_eq!(checked_pow(&int(0), &int(0)), Err(KernelError::ZeroToNonPositivePower));
}

#[test]
fn test_nonzero_to_zero_is_one() {
    for base in [sym("x"), int(-3), Expr::rational(2, 7).unwrap(), sym("x") + sym("y")] {
        assert_eq!(make_power(&base, &int(0)), int(1), "{base}");
    }
}

#[test]
fn test_singletons_unwrap() {
    let x = sym("x");
    assert_eq!(make_sum([x.clone()]), x);
    assert_eq!(make_product([x.clone()]), x);
    assert_eq!(make_product([int(1), x.clone(), int(1)]), x);
}

// ============================================================
// Flattening and like-term combination
// ============================================================

#[test]
fn test_sum_flattening() {
    let (x, y, z) = (sym("x"), sym("y"), sym("z"));
    let nested = make_sum([make_sum([x.clone(), y.clone()]), z.clone()]);
    assert_eq!(nested, make_sum([x, y, z]));
    let ExprKind::Sum { terms, .. } = nested.kind() else {
        panic!("expected sum, got {nested:?}");
    };
    assert!(terms.iter().all(|(t, _)| !matches!(t.kind(), ExprKind::Sum { .. })));
}

#[test]
fn test_product_flattening() {
    let (x, y, z) = (sym("x"), sym("y"), sym("z"));
    let nested = make_product([make_product([x.clone(), y.clone()]), z.clone()]);
    assert_eq!(nested, make_product([x, y, z]));
    let ExprKind::Product { factors, .. } = nested.kind() else {
        panic!("expected product, got {nested:?}");
    };
    assert!(factors.iter().all(|(b, _)| !matches!(b.kind(), ExprKind::Product { .. })));
}

#[test]
fn test_like_terms_merge_across_forms() {
    let (x, y) = (sym("x"), sym("y"));
    let xy = &x * &y;
    let e = make_sum([xy.clone(), int(2) * &y * &x, -(&x * &y) * int(3)]);
    assert_eq!(e, int(0));
}

#[test]
fn test_zero_absorption() {
    let (x, y) = (sym("x"), sym("y"));
    assert_eq!(make_product([x.clone(), int(0), y.clone()]), int(0));
    assert_eq!(make_product([x.clone() + &y, int(0)]), int(0));
    assert_eq!(make_product([x.sin(), Expr::indeterminate(), int(0)]), int(0));
}

#[test]
fn test_numbers_fold_exactly() {
    let half = Expr::rational(1, 2).unwrap();
    let third = Expr::rational(1, 3).unwrap();
    assert_eq!(make_sum([half.clone(), third.clone()]), Expr::rational(5, 6).unwrap());
    assert_eq!(make_product([half, third, int(6)]), int(1));
}

#[test]
fn test_exact_and_float_stay_distinct() {
    assert_ne!(int(2), Expr::real(2.0));
    let x = sym("x");
    let exact = int(2) * &x;
    let float = Expr::real(2.0) * &x;
    assert_ne!(exact, float);
    assert_eq!(Expr::real(0.5) + Expr::rational(1, 2).unwrap(), Expr::real(1.0));
}

#[test]
fn test_complex_coefficients() {
    let i = Expr::imaginary_unit();
    let x = sym("x");
    assert_eq!(&i * &i, int(-1));
    let e = &i * &x + &i * &x;
    let ExprKind::Product { coef, .. } = e.kind() else {
        panic!("expected product, got {e:?}");
    };
    assert_eq!(*coef, Number::from(2).mul(&Number::imaginary_unit()));
}

// ============================================================
// Powers
// ============================================================

#[test]
fn test_power_combination_soundness() {
    let x = sym("x");
    let x_sq = make_power(&x, &int(2));
    // (x^2)^(1/2) is |x|, not x
    assert_ne!(make_power(&x_sq, &Expr::rational(1, 2).unwrap()), x);
    // (x^(1/2))^2 is x
    let root = make_power(&x, &Expr::rational(1, 2).unwrap());
    assert_eq!(make_power(&root, &int(2)), x);
    // positive numeric base always combines
    let two_x = make_power(&int(2), &x);
    assert_eq!(
        make_power(&two_x, &Expr::rational(1, 2).unwrap()),
        make_power(&int(2), &(Expr::rational(1, 2).unwrap() * &x))
    );
}

#[test]
fn test_power_of_product_distributes_for_integer_exponents() {
    let (x, y) = (sym("x"), sym("y"));
    let p = int(3) * &x * &y;
    assert_eq!(make_power(&p, &int(-1)), Expr::rational(1, 3).unwrap() * x.pow(&int(-1)) * y.pow(&int(-1)));
}

#[test]
fn test_division_identities() {
    let (x, y) = (sym("x"), sym("y"));
    assert_eq!((&x * &y) / &y, x);
    assert_eq!((&x / &y) * &y, x);
    assert_eq!(x.pow(&y) / x.pow(&y), int(1));
}

// ============================================================
// Total order
// ============================================================

#[test]
fn test_order_is_antisymmetric_over_sample() {
    let (x, y) = (sym("x"), sym("y"));
    let sample = vec![
        int(-2),
        int(3),
        Expr::rational(1, 2).unwrap(),
        Expr::real(0.5),
        Expr::imaginary_unit(),
        Expr::pi(),
        Expr::e(),
        x.clone(),
        y.clone(),
        &x + &y,
        &x + int(1),
        &x * &y,
        int(2) * &x * &y,
        x.pow(&y),
        x.pow(&int(3)),
        x.sin(),
        y.sin(),
        Expr::function("f", vec![x.clone(), y.clone()]),
        Expr::indeterminate(),
    ];
    for a in &sample {
        assert_eq!(expr_cmp(a, a), Ordering::Equal);
        for b in &sample {
            if a == b {
                continue;
            }
            let ab = expr_cmp(a, b);
            let ba = expr_cmp(b, a);
            assert_ne!(ab, Ordering::Equal, "{a} vs {b}");
            assert_eq!(ab, ba.reverse(), "{a} vs {b}");
        }
    }
}

#[test]
fn test_order_is_transitive_over_sample() {
    let (x, y, z) = (sym("x"), sym("y"), sym("z"));
    let mut sample = vec![
        &x + &y + &z,
        &x * &z,
        z.pow(&int(2)),
        int(7),
        &x + int(2),
        y.cos(),
        x.clone(),
        int(-1) * &y,
    ];
    sample.sort();
    for w in sample.windows(3) {
        assert_eq!(expr_cmp(&w[0], &w[2]), Ordering::Less);
    }
}
