//! Expression constructors.
//!
//! Atom constructors, accessors, and the raw builders the canonicalizers use to
//! assemble sum, product and power nodes.

use std::sync::Arc;

use super::{Constant, Expr, ExprKind};
use crate::canonical::{make_power, make_product, make_sum};
use crate::core::error::KernelError;
use crate::core::number::Number;
use crate::core::terms::{FactorTerms, SumTerms};

impl Expr {
    // -------------------------------------------------------------------------
    // Atom constructors
    // -------------------------------------------------------------------------

    /// Create a number expression
    #[must_use]
    pub fn number(n: impl Into<Number>) -> Self {
        Self::from_kind(ExprKind::Number(n.into()))
    }

    /// Create an exact integer
    #[must_use]
    pub fn integer(n: i64) -> Self {
        Self::number(Number::from(n))
    }

    /// Create an exact rational `num/den`, normalized
    ///
    /// # Errors
    /// `DivisionByZero` when `den` is zero.
    pub fn rational(num: i64, den: i64) -> Result<Self, KernelError> {
        Number::rational(num, den).map(Self::number)
    }

    /// Create a floating-point number
    #[must_use]
    pub fn real(x: f64) -> Self {
        Self::number(Number::real(x))
    }

    /// The exact imaginary unit `I`
    #[must_use]
    pub fn imaginary_unit() -> Self {
        Self::number(Number::imaginary_unit())
    }

    /// Exact zero
    #[must_use]
    pub fn zero() -> Self {
        Self::number(Number::zero())
    }

    /// Exact one
    #[must_use]
    pub fn one() -> Self {
        Self::number(Number::one())
    }

    /// Create a symbol
    pub fn symbol(name: impl AsRef<str>) -> Self {
        Self::from_kind(ExprKind::Symbol(Arc::from(name.as_ref())))
    }

    /// Create a named constant
    #[must_use]
    pub fn constant(c: Constant) -> Self {
        Self::from_kind(ExprKind::Constant(c))
    }

    /// π
    #[must_use]
    pub fn pi() -> Self {
        Self::constant(Constant::Pi)
    }

    /// Euler's number
    #[must_use]
    pub fn e() -> Self {
        Self::constant(Constant::E)
    }

    /// The indeterminate marker
    #[must_use]
    pub fn indeterminate() -> Self {
        Self::from_kind(ExprKind::Indeterminate)
    }

    /// Apply a named function to arguments
    pub fn function(name: impl AsRef<str>, args: Vec<Self>) -> Self {
        Self::from_kind(ExprKind::Function {
            name: Arc::from(name.as_ref()),
            args,
        })
    }

    /// `sin(self)`
    #[must_use]
    pub fn sin(&self) -> Self {
        Self::function("sin", vec![self.clone()])
    }

    /// `cos(self)`
    #[must_use]
    pub fn cos(&self) -> Self {
        Self::function("cos", vec![self.clone()])
    }

    /// `tan(self)`
    #[must_use]
    pub fn tan(&self) -> Self {
        Self::function("tan", vec![self.clone()])
    }

    /// `exp(self)`
    #[must_use]
    pub fn exp(&self) -> Self {
        Self::function("exp", vec![self.clone()])
    }

    /// `log(self)`
    #[must_use]
    pub fn log(&self) -> Self {
        Self::function("log", vec![self.clone()])
    }

    // -------------------------------------------------------------------------
    // Canonical compound constructors
    // -------------------------------------------------------------------------

    /// Canonical sum of `terms`
    pub fn sum(terms: impl IntoIterator<Item = Self>) -> Self {
        make_sum(terms)
    }

    /// Canonical product of `factors`
    pub fn product(factors: impl IntoIterator<Item = Self>) -> Self {
        make_product(factors)
    }

    /// Canonical `self^exp`
    #[must_use]
    pub fn pow(&self, exp: &Self) -> Self {
        make_power(self, exp)
    }

    // -------------------------------------------------------------------------
    // Raw builders (input must already be canonical)
    // -------------------------------------------------------------------------

    pub(crate) fn sum_from_parts(offset: Number, terms: SumTerms) -> Self {
        debug_assert!(
            is_canonical_sum(&offset, &terms),
            "non-canonical sum parts: offset {offset}, {} terms",
            terms.len()
        );
        Self::from_kind(ExprKind::Sum { offset, terms })
    }

    pub(crate) fn product_from_parts(coef: Number, factors: FactorTerms) -> Self {
        debug_assert!(
            is_canonical_product(&coef, &factors),
            "non-canonical product parts: coef {coef}, {} factors",
            factors.len()
        );
        Self::from_kind(ExprKind::Product { coef, factors })
    }

    pub(crate) fn pow_from_parts(base: Self, exp: Self) -> Self {
        Self::from_kind(ExprKind::Pow(base, exp))
    }

    // -------------------------------------------------------------------------
    // Accessor methods
    // -------------------------------------------------------------------------

    /// The number held by a numeric node
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self.kind() {
            ExprKind::Number(n) => Some(n),
            _ => None,
        }
    }

    /// The name of a symbol node
    #[inline]
    #[must_use]
    pub fn as_symbol(&self) -> Option<&str> {
        match self.kind() {
            ExprKind::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// True for numeric nodes
    #[inline]
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self.kind(), ExprKind::Number(_))
    }

    /// True for symbol nodes
    #[inline]
    #[must_use]
    pub fn is_symbol(&self) -> bool {
        matches!(self.kind(), ExprKind::Symbol(_))
    }

    /// True for the indeterminate marker
    #[inline]
    #[must_use]
    pub fn is_indeterminate(&self) -> bool {
        matches!(self.kind(), ExprKind::Indeterminate)
    }

    /// True for a numeric zero, exact or floating
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(Number::is_zero)
    }

    /// True for the exact number one
    #[inline]
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(Number::is_one)
    }

    /// True for the exact number minus one
    #[inline]
    #[must_use]
    pub fn is_minus_one(&self) -> bool {
        self.as_number().is_some_and(Number::is_minus_one)
    }

    /// Split into `(coefficient, term)` such that `self = coefficient * term`.
    ///
    /// Numbers give `(n, 1)`, products give their coefficient and the product
    /// of their factors, everything else has coefficient one.
    #[must_use]
    pub fn as_coef_term(&self) -> (Number, Self) {
        match self.kind() {
            ExprKind::Number(n) => (n.clone(), Self::one()),
            ExprKind::Product { coef, factors } => {
                (coef.clone(), crate::canonical::product_of_factors(factors.clone()))
            }
            _ => (Number::one(), self.clone()),
        }
    }

    /// Split into `(base, exponent)` with `self = base^exponent`
    #[must_use]
    pub fn as_base_exp(&self) -> (Self, Self) {
        match self.kind() {
            ExprKind::Pow(base, exp) => (base.clone(), exp.clone()),
            _ => (self.clone(), Self::one()),
        }
    }

    /// Operands of this node, sorted by the canonical order.
    ///
    /// - sum: the offset when nonzero, then each `coefficient·term`
    /// - product: the coefficient when not one, then each `base^exponent`
    /// - power: base and exponent
    /// - function: its arguments, in call order
    /// - atoms: nothing
    #[must_use]
    pub fn args(&self) -> Vec<Self> {
        match self.kind() {
            ExprKind::Sum { offset, terms } => {
                let mut args = Vec::with_capacity(terms.len() + 1);
                if !offset.is_exact_zero() {
                    args.push(Self::number(offset.clone()));
                }
                args.extend(
                    terms
                        .iter()
                        .map(|(term, coef)| crate::canonical::scale_term(coef, term)),
                );
                args.sort_unstable();
                args
            }
            ExprKind::Product { coef, factors } => {
                let mut args = Vec::with_capacity(factors.len() + 1);
                if !coef.is_one() {
                    args.push(Self::number(coef.clone()));
                }
                args.extend(factors.iter().map(|(base, exp)| raise(base, exp)));
                args.sort_unstable();
                args
            }
            ExprKind::Pow(base, exp) => vec![base.clone(), exp.clone()],
            ExprKind::Function { args, .. } => args.clone(),
            ExprKind::Number(_)
            | ExprKind::Constant(_)
            | ExprKind::Symbol(_)
            | ExprKind::Indeterminate => Vec::new(),
        }
    }

    /// True when this node and everything below it satisfies the canonical
    /// form invariants
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        let here = match self.kind() {
            ExprKind::Sum { offset, terms } => is_canonical_sum(offset, terms),
            ExprKind::Product { coef, factors } => is_canonical_product(coef, factors),
            ExprKind::Pow(base, exp) => make_power(base, exp) == *self,
            _ => true,
        };
        here && self.args().iter().all(Self::is_canonical)
    }
}

/// `base^exp` for an entry of a canonical product, without re-normalizing
pub(crate) fn raise(base: &Expr, exp: &Expr) -> Expr {
    if exp.is_one() {
        base.clone()
    } else {
        Expr::pow_from_parts(base.clone(), exp.clone())
    }
}

fn is_canonical_sum(offset: &Number, terms: &SumTerms) -> bool {
    if terms.is_empty() || (terms.len() == 1 && offset.is_exact_zero()) {
        return false;
    }
    terms.iter().all(|(term, coef)| {
        !coef.is_zero()
            && match term.kind() {
                ExprKind::Number(_) | ExprKind::Sum { .. } | ExprKind::Indeterminate => false,
                ExprKind::Product { coef, .. } => coef.is_one(),
                _ => true,
            }
    })
}

fn is_canonical_product(coef: &Number, factors: &FactorTerms) -> bool {
    if factors.is_empty() || coef.is_zero() {
        return false;
    }
    if let Some((base, exp)) = factors.single()
        && (coef.is_one() || (exp.is_one() && matches!(base.kind(), ExprKind::Sum { .. })))
    {
        return false;
    }
    factors.iter().all(|(base, exp)| {
        !exp.is_zero()
            && !base.is_indeterminate()
            && !matches!(
                (base.kind(), exp.kind()),
                (ExprKind::Number(_), ExprKind::Number(Number::Integer(_)))
            )
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;

    #[test]
    fn test_sum_args_are_sorted_coefficient_terms() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let e = Expr::integer(3) + Expr::integer(2) * &y + &x;
        let args = e.args();
        assert_eq!(args, vec![Expr::integer(3), x, Expr::integer(2) * y]);
    }

    #[test]
    fn test_product_args_include_non_unit_coefficient() {
        let x = Expr::symbol("x");
        let e = Expr::integer(5) * x.pow(&Expr::integer(2));
        assert_eq!(e.args(), vec![Expr::integer(5), x.pow(&Expr::integer(2))]);
    }

    #[test]
    fn test_rebuilding_from_args_round_trips() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let s = Expr::integer(1) + &x * &y + x.pow(&y);
        assert_eq!(Expr::sum(s.args()), s);
        let p = Expr::integer(-3) * &x * y.pow(&Expr::integer(2));
        assert_eq!(Expr::product(p.args()), p);
    }

    #[test]
    fn test_coef_term_split() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let (c, t) = (Expr::integer(4) * &x * &y).as_coef_term();
        assert_eq!(c, Number::from(4));
        assert_eq!(t, &x * &y);
        let (c, t) = x.as_coef_term();
        assert!(c.is_one());
        assert_eq!(t, x);
    }

    #[test]
    fn test_canonical_check_accepts_built_expressions() {
        let x = Expr::symbol("x");
        let e = (&x + Expr::integer(1)).pow(&Expr::integer(3)) * Expr::rational(1, 2).unwrap();
        assert!(e.is_canonical());
        assert!(e.expand().is_canonical());
    }

    #[test]
    fn test_rational_zero_denominator() {
        assert_eq!(Expr::rational(1, 0), Err(KernelError::DivisionByZero));
    }
}
