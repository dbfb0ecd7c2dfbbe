//! Symbolic differentiation.

use super::Visitor;
use super::builtin::has_symbol;
use crate::canonical::{make_power, make_product, make_sum};
use crate::core::expr::{Constant, Expr};
use crate::core::number::Number;
use crate::core::terms::{FactorTerms, SumTerms};

/// Derivative with respect to one symbol.
///
/// Results are canonical but not expanded. Functions outside
/// `sin, cos, tan, exp, log` that depend on the symbol become an opaque
/// `Derivative(f(..), x)` node.
pub struct Differentiate<'a> {
    var: &'a str,
}

impl<'a> Differentiate<'a> {
    #[must_use]
    pub const fn new(var: &'a str) -> Self {
        Self { var }
    }
}

impl Visitor for Differentiate<'_> {
    type Output = Expr;

    fn visit_default(&mut self, _expr: &Expr) -> Expr {
        Expr::zero()
    }

    fn visit_number(&mut self, _expr: &Expr, _value: &Number) -> Expr {
        Expr::zero()
    }

    fn visit_constant(&mut self, _expr: &Expr, _constant: Constant) -> Expr {
        Expr::zero()
    }

    fn visit_symbol(&mut self, _expr: &Expr, name: &str) -> Expr {
        if name == self.var {
            Expr::one()
        } else {
            Expr::zero()
        }
    }

    fn visit_sum(&mut self, _expr: &Expr, _offset: &Number, terms: &SumTerms) -> Expr {
        let parts: Vec<Expr> = terms
            .iter()
            .map(|(term, coef)| make_product([Expr::number(coef.clone()), term.accept(self)]))
            .collect();
        make_sum(parts)
    }

    fn visit_product(&mut self, _expr: &Expr, coef: &Number, factors: &FactorTerms) -> Expr {
        let powers: Vec<Expr> = factors
            .iter()
            .map(|(b, e)| crate::core::expr::raise(b, e))
            .collect();
        let mut parts = Vec::with_capacity(powers.len());
        for (i, factor) in powers.iter().enumerate() {
            let d = factor.accept(self);
            if d.is_zero() {
                continue;
            }
            let others = powers
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, f)| f.clone());
            parts.push(make_product(
                [Expr::number(coef.clone()), d].into_iter().chain(others),
            ));
        }
        make_sum(parts)
    }

    fn visit_pow(&mut self, expr: &Expr, base: &Expr, exp: &Expr) -> Expr {
        let db = base.accept(self);
        let de = exp.accept(self);
        if de.is_zero() {
            // n * b^(n-1) * b'
            let reduced = make_power(base, &make_sum([exp.clone(), Expr::integer(-1)]));
            return make_product([exp.clone(), reduced, db]);
        }
        // b^e * (e' * log(b) + e * b' / b)
        let log_term = make_product([de, base.log()]);
        let ratio = make_product([exp.clone(), db, make_power(base, &Expr::integer(-1))]);
        make_product([expr.clone(), make_sum([log_term, ratio])])
    }

    fn visit_function(&mut self, expr: &Expr, name: &str, args: &[Expr]) -> Expr {
        if !has_symbol(expr, self.var) {
            return Expr::zero();
        }
        let outer = match (name, args) {
            ("sin", [a]) => a.cos(),
            ("cos", [a]) => -a.sin(),
            ("tan", [a]) => make_sum([Expr::one(), make_power(&a.tan(), &Expr::integer(2))]),
            ("exp", [_]) => expr.clone(),
            ("log", [a]) => make_power(a, &Expr::integer(-1)),
            _ => {
                return Expr::function("Derivative", vec![expr.clone(), Expr::symbol(self.var)]);
            }
        };
        make_product([outer, args[0].accept(self)])
    }

    fn visit_indeterminate(&mut self, expr: &Expr) -> Expr {
        expr.clone()
    }
}

impl Expr {
    /// Derivative with respect to the symbol `var`
    #[must_use]
    pub fn diff(&self, var: &str) -> Self {
        self.accept(&mut Differentiate::new(var))
    }
}
