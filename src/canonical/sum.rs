//! Sum canonicalization.

use log::trace;

use super::product::{product_of_factors, scale_term};
use crate::core::expr::{Expr, ExprKind};
use crate::core::number::Number;
use crate::core::terms::SumTerms;

/// Accumulates `offset + Σ coefficient·term` from operands in any form.
///
/// Adding a sum flattens it, adding a number moves it into the offset and
/// adding a product with a numeric coefficient files its remainder under that
/// coefficient.
#[derive(Debug, Default)]
pub(crate) struct SumAccumulator {
    offset: Number,
    terms: SumTerms,
    indeterminate: bool,
}

impl SumAccumulator {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            terms: SumTerms::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Add `term`
    pub(crate) fn add(&mut self, term: &Expr) {
        match term.kind() {
            ExprKind::Number(n) => self.offset = self.offset.add(n),
            ExprKind::Sum { offset, terms } => {
                self.offset = self.offset.add(offset);
                for (t, c) in terms.iter() {
                    self.terms.insert(t.clone(), c.clone());
                }
            }
            _ => self.add_scaled(&Number::one(), term),
        }
    }

    /// Add `coef * term`
    pub(crate) fn add_scaled(&mut self, coef: &Number, term: &Expr) {
        match term.kind() {
            ExprKind::Number(n) => self.offset = self.offset.add(&coef.mul(n)),
            ExprKind::Indeterminate => self.indeterminate = true,
            ExprKind::Sum { offset, terms } => {
                self.offset = self.offset.add(&coef.mul(offset));
                for (t, c) in terms.iter() {
                    self.terms.insert(t.clone(), coef.mul(c));
                }
            }
            ExprKind::Product { coef: inner, factors } if !inner.is_one() => {
                let rest = product_of_factors(factors.clone());
                self.add_scaled(&coef.mul(inner), &rest);
            }
            _ => {
                self.terms.insert(term.clone(), coef.clone());
            }
        }
    }

    /// Collapse into a canonical expression
    pub(crate) fn finish(self) -> Expr {
        if self.indeterminate {
            return Expr::indeterminate();
        }
        if self.terms.is_empty() {
            return Expr::number(self.offset);
        }
        if self.offset.is_exact_zero()
            && let Some((term, coef)) = self.terms.single()
        {
            return if coef.is_one() {
                term.clone()
            } else {
                scale_term(coef, term)
            };
        }
        Expr::sum_from_parts(self.offset, self.terms)
    }
}

/// Build the canonical sum of `terms`.
///
/// - nested sums are flattened into one level
/// - numeric operands accumulate into the offset
/// - equal terms combine by adding coefficients; zero coefficients vanish
/// - an empty result is the offset, a single unit term with zero offset is
///   that term, a single scaled term is a product
/// - any indeterminate operand makes the result indeterminate
///
/// ```
/// use symb_canon::{Expr, make_sum};
///
/// let x = Expr::symbol("x");
/// let s = make_sum([x.clone(), Expr::integer(2), x.clone(), Expr::integer(-2)]);
/// assert_eq!(s, Expr::integer(2) * x);
/// ```
pub fn make_sum<I: IntoIterator<Item = Expr>>(terms: I) -> Expr {
    let terms = terms.into_iter();
    let mut acc = SumAccumulator::with_capacity(terms.size_hint().0);
    for term in terms {
        acc.add(&term);
    }
    let result = acc.finish();
    trace!("make_sum -> {result}");
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, reason = "Standard test relaxations")]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sum_is_zero() {
        assert_eq!(make_sum(std::iter::empty()), Expr::zero());
    }

    #[test]
    fn test_numbers_fold_into_offset() {
        let s = make_sum([Expr::integer(2), Expr::rational(1, 2).unwrap()]);
        assert_eq!(s, Expr::rational(5, 2).unwrap());
    }

    #[test]
    fn test_single_term_collapses() {
        let x = Expr::symbol("x");
        assert_eq!(make_sum([x.clone()]), x);
        assert_eq!(make_sum([x.clone(), Expr::zero()]), x);
    }

    #[test]
    fn test_like_terms_combine() {
        let x = Expr::symbol("x");
        let s = make_sum([x.clone(), x.clone(), x.clone()]);
        let ExprKind::Product { coef, factors } = s.kind() else {
            panic!("expected product, got {s:?}");
        };
        assert_eq!(*coef, Number::from(3));
        assert_eq!(factors.get(&x), Some(&Expr::one()));
    }

    #[test]
    fn test_nested_sums_flatten() {
        let (x, y, z) = (Expr::symbol("x"), Expr::symbol("y"), Expr::symbol("z"));
        let inner = make_sum([x.clone(), y.clone()]);
        let outer = make_sum([inner, z.clone(), Expr::integer(1)]);
        let ExprKind::Sum { offset, terms } = outer.kind() else {
            panic!("expected sum, got {outer:?}");
        };
        assert!(offset.is_one());
        assert_eq!(terms.len(), 3);
        assert!(terms.iter().all(|(t, _)| !matches!(t.kind(), ExprKind::Sum { .. })));
    }

    #[test]
    fn test_scaled_sum_distributes_coefficient() {
        let (x, y) = (Expr::symbol("x"), Expr::symbol("y"));
        let two_s = Expr::integer(2) * make_sum([x.clone(), y.clone()]);
        let total = make_sum([two_s, -Expr::integer(2) * &x]);
        assert_eq!(total, Expr::integer(2) * y);
    }

    #[test]
    fn test_indeterminate_absorbs() {
        let x = Expr::symbol("x");
        assert!(make_sum([x, Expr::indeterminate()]).is_indeterminate());
    }

    #[test]
    fn test_float_offset_is_kept() {
        let x = Expr::symbol("x");
        let s = make_sum([x.clone(), Expr::real(0.0)]);
        assert!(matches!(s.kind(), ExprKind::Sum { .. }));
    }
}
