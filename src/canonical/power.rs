//! Power canonicalization.

use log::trace;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use super::product::make_product;
use crate::core::error::KernelError;
use crate::core::expr::{Expr, ExprKind};
use crate::core::number::Number;

/// Build the canonical form of `base^exp`.
///
/// | input | result |
/// |---|---|
/// | `0^0`, `0^e` with `e < 0` | indeterminate |
/// | `x^0` for `x ≠ 0` | `1` |
/// | `x^1` | `x` |
/// | `1^x` | `1` |
/// | `a^b` for numbers | exact value when representable, else a power node |
/// | `(c·Π bᵢ^eᵢ)^n`, integer `n` | `cⁿ · Π bᵢ^(eᵢ·n)` |
/// | `(b^e)^m`, numeric `m` | `b^(e·m)` when that is sound, else a power node |
///
/// Combining nested exponents is sound when `m` is an integer, when `e` is a
/// real number in `(-1, 1]`, or when `b` is a positive number. Otherwise
/// `(x^2)^(1/2)` would become `x`, which is wrong for negative `x`.
///
/// A power of a sum is left unexpanded.
#[must_use]
pub fn make_power(base: &Expr, exp: &Expr) -> Expr {
    let result = power(base, exp);
    trace!("make_power({base}, {exp}) -> {result}");
    result
}

fn power(base: &Expr, exp: &Expr) -> Expr {
    if base.is_indeterminate() || exp.is_indeterminate() {
        return Expr::indeterminate();
    }

    if let Some(e) = exp.as_number() {
        if e.is_zero() {
            return if base.is_zero() {
                Expr::indeterminate()
            } else if e.is_exact() {
                Expr::one()
            } else {
                Expr::real(1.0)
            };
        }
        if e.is_one() {
            return base.clone();
        }
    }

    if let Some(b) = base.as_number() {
        if b.is_one() {
            return Expr::one();
        }
        return match exp.as_number() {
            Some(e) => match b.checked_pow(e) {
                Ok(Some(value)) => Expr::number(value),
                Ok(None) => match e {
                    Number::Rational(q) => split_rational_power(b, q),
                    _ => None,
                }
                .unwrap_or_else(|| Expr::pow_from_parts(base.clone(), exp.clone())),
                Err(_) => Expr::indeterminate(),
            },
            None => Expr::pow_from_parts(base.clone(), exp.clone()),
        };
    }

    match (base.kind(), exp.kind()) {
        (ExprKind::Product { coef, factors }, ExprKind::Number(n @ Number::Integer(_))) => {
            let Ok(Some(scaled)) = coef.checked_pow(n) else {
                return Expr::pow_from_parts(base.clone(), exp.clone());
            };
            let powered = factors
                .iter()
                .map(|(b, e)| make_power(b, &make_product([e.clone(), exp.clone()])));
            make_product(std::iter::once(Expr::number(scaled)).chain(powered))
        }
        (ExprKind::Pow(inner_base, inner_exp), ExprKind::Number(outer))
            if combines_soundly(inner_base, inner_exp, outer) =>
        {
            make_power(inner_base, &make_product([inner_exp.clone(), exp.clone()]))
        }
        _ => Expr::pow_from_parts(base.clone(), exp.clone()),
    }
}

/// `n^(p/q)` for an exact real base whose power has no exact value.
///
/// The integer part of the exponent is split off, leaving a surd with an
/// exponent in `(0, 1)`: `2^(3/2) = 2·2^(1/2)`. A negative base under a
/// square root gives a power of `I`, and a rational base `a/b` becomes
/// `a^r · b^(1-r) / b`. Returns `None` when the raw power node is already
/// canonical.
fn split_rational_power(base: &Number, exp: &BigRational) -> Option<Expr> {
    if base.is_negative() && *exp.denom() == BigInt::from(2) {
        let unit = Number::imaginary_unit()
            .checked_pow(&Number::Integer(exp.numer().clone()))
            .ok()??;
        let magnitude = make_power(
            &Expr::number(base.neg()),
            &Expr::number(Number::Rational(exp.clone())),
        );
        return Some(make_product([Expr::number(unit), magnitude]));
    }

    let whole = exp.floor().to_integer();
    let frac = exp - BigRational::from_integer(whole.clone());
    let scale = base.checked_pow(&Number::Integer(whole.clone())).ok()??;
    match base {
        Number::Integer(_) if whole.is_zero() => None,
        Number::Integer(_) => {
            let surd = Expr::pow_from_parts(
                Expr::number(base.clone()),
                Expr::number(Number::from_big_rational(frac)),
            );
            Some(make_product([Expr::number(scale), surd]))
        }
        Number::Rational(r) => {
            let numer = Expr::number(Number::Integer(r.numer().clone()));
            let denom = Expr::number(Number::Integer(r.denom().clone()));
            let co_frac = BigRational::one() - &frac;
            Some(make_product([
                Expr::number(scale),
                make_power(&denom, &Expr::integer(-1)),
                make_power(&numer, &Expr::number(Number::from_big_rational(frac))),
                make_power(&denom, &Expr::number(Number::from_big_rational(co_frac))),
            ]))
        }
        _ => None,
    }
}

/// True when `(base^inner)^outer = base^(inner·outer)` holds for every value
/// of the symbols involved
fn combines_soundly(base: &Expr, inner: &Expr, outer: &Number) -> bool {
    if matches!(outer, Number::Integer(_)) {
        return true;
    }
    if base.as_number().is_some_and(Number::is_positive) {
        return true;
    }
    inner
        .as_number()
        .filter(|e| e.is_real())
        .and_then(Number::to_f64)
        .is_some_and(|e| e > -1.0 && e <= 1.0)
}

/// `base^exp`, rejecting undefined numeric powers instead of producing the
/// indeterminate marker.
///
/// # Errors
/// - [`KernelError::ZeroToNonPositivePower`] for `0^e` with numeric `e <= 0`
/// - [`KernelError::Indeterminate`] when an operand is already indeterminate
pub fn checked_pow(base: &Expr, exp: &Expr) -> Result<Expr, KernelError> {
    if base.is_indeterminate() || exp.is_indeterminate() {
        return Err(KernelError::Indeterminate);
    }
    if base.is_zero()
        && let Some(e) = exp.as_number()
        && e.is_real()
        && !e.is_positive()
    {
        return Err(KernelError::ZeroToNonPositivePower);
    }
    Ok(make_power(base, exp))
}
