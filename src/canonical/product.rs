//! Product canonicalization.

use log::trace;

use super::power::make_power;
use super::sum::SumAccumulator;
use crate::core::expr::{Expr, ExprKind};
use crate::core::number::Number;
use crate::core::terms::FactorTerms;

/// Accumulates `coef · Π base^exponent` from operands in any form.
///
/// Bases that can fold into something simpler once their exponent is known
/// (numbers, products, powers) are re-normalized through [`make_power`]; the
/// outcome goes onto a worklist and is multiplied in again.
#[derive(Debug)]
pub(crate) struct ProductAccumulator {
    coef: Number,
    factors: FactorTerms,
    pending: Vec<Expr>,
    indeterminate: bool,
    zero: bool,
}

impl ProductAccumulator {
    pub(crate) fn new() -> Self {
        Self {
            coef: Number::one(),
            factors: FactorTerms::new(),
            pending: Vec::new(),
            indeterminate: false,
            zero: false,
        }
    }

    /// Multiply by `factor`. Returns `false` once an exact zero was seen.
    pub(crate) fn mul(&mut self, factor: &Expr) -> bool {
        self.absorb(factor);
        while !self.zero
            && let Some(next) = self.pending.pop()
        {
            self.absorb(&next);
        }
        !self.zero
    }

    fn absorb(&mut self, factor: &Expr) {
        match factor.kind() {
            ExprKind::Number(n) => {
                if n.is_exact_zero() {
                    self.zero = true;
                } else {
                    self.coef = self.coef.mul(n);
                }
            }
            ExprKind::Indeterminate => self.indeterminate = true,
            ExprKind::Product { coef, factors } => {
                self.coef = self.coef.mul(coef);
                for (base, exp) in factors.iter() {
                    self.fold(base, exp.clone());
                }
            }
            ExprKind::Pow(base, exp) => self.fold(base, exp.clone()),
            _ => self.fold(factor, Expr::one()),
        }
    }

    /// Insert `base^exp`, adding exponents of an existing entry.
    ///
    /// A combined exponent that is a numeric zero, or a numeric exponent on
    /// a base that can fold further, sends the entry back through
    /// [`make_power`].
    fn fold(&mut self, base: &Expr, exp: Expr) {
        self.factors.insert(base.clone(), exp);
        let Some(exp) = self.factors.get(base).filter(|e| e.is_number()).cloned() else {
            return;
        };
        let refolds = exp.is_zero()
            || matches!(
                base.kind(),
                ExprKind::Number(_) | ExprKind::Product { .. } | ExprKind::Pow(..)
            );
        if !refolds {
            return;
        }
        let powered = make_power(base, &exp);
        if let ExprKind::Pow(b, _) = powered.kind()
            && b == base
        {
            return;
        }
        trace!("refold {base}^{exp} -> {powered}");
        self.factors.remove(base);
        self.pending.push(powered);
    }

    /// Collapse into a canonical expression
    pub(crate) fn finish(self) -> Expr {
        if self.zero {
            return Expr::zero();
        }
        if self.indeterminate {
            return Expr::indeterminate();
        }
        if self.coef.is_zero() {
            return Expr::number(self.coef);
        }
        from_parts(self.coef, self.factors)
    }
}

/// Assemble `coef · Π factors`, collapsing the degenerate shapes.
///
/// A numeric coefficient on a lone sum is distributed over it.
fn from_parts(coef: Number, factors: FactorTerms) -> Expr {
    if factors.is_empty() {
        return Expr::number(coef);
    }
    if let Some((base, exp)) = factors.single() {
        if coef.is_one() {
            return crate::core::expr::raise(base, exp);
        }
        if exp.is_one() && matches!(base.kind(), ExprKind::Sum { .. }) {
            let mut acc = SumAccumulator::with_capacity(1);
            acc.add_scaled(&coef, base);
            return acc.finish();
        }
    }
    Expr::product_from_parts(coef, factors)
}

/// `Π factors` with unit coefficient
pub(crate) fn product_of_factors(factors: FactorTerms) -> Expr {
    from_parts(Number::one(), factors)
}

/// `coef · term` for a canonical term carrying no numeric coefficient of its own
pub(crate) fn scale_term(coef: &Number, term: &Expr) -> Expr {
    if coef.is_one() {
        return term.clone();
    }
    let factors = match term.kind() {
        ExprKind::Product { factors, .. } => factors.clone(),
        ExprKind::Pow(base, exp) => {
            let mut f = FactorTerms::with_capacity(1);
            f.insert(base.clone(), exp.clone());
            f
        }
        _ => {
            let mut f = FactorTerms::with_capacity(1);
            f.insert(term.clone(), Expr::one());
            f
        }
    };
    from_parts(coef.clone(), factors)
}

/// Build the canonical product of `factors`.
///
/// - nested products are flattened into one level
/// - numeric operands multiply into the coefficient
/// - equal bases combine by adding exponents; zero exponents vanish
/// - an exact zero factor makes the whole product zero
/// - an empty result is the coefficient, a unit coefficient with one entry
///   is that entry's power
/// - any indeterminate operand (without an exact zero) gives indeterminate
///
/// Multiplication is not distributed over sums, except that a numeric
/// coefficient on a single sum factor scales the sum's terms.
///
/// ```
/// use symb_canon::{Expr, make_product};
///
/// let x = Expr::symbol("x");
/// let p = make_product([x.clone(), Expr::integer(3), x.clone()]);
/// assert_eq!(p, Expr::integer(3) * x.pow(&Expr::integer(2)));
/// ```
pub fn make_product<I: IntoIterator<Item = Expr>>(factors: I) -> Expr {
    let mut acc = ProductAccumulator::new();
    for factor in factors {
        if !acc.mul(&factor) {
            return Expr::zero();
        }
    }
    let result = acc.finish();
    trace!("make_product -> {result}");
    result
}
