//! Plain-text printing.
//!
//! Sum operands are printed in canonical order and product factors in the order
//! of their bases, so equal expressions always print the same string. Powers
//! bind tighter than products, which bind tighter than sums; parentheses are
//! added only where that precedence needs them.

use std::fmt;

use super::Visitor;
use crate::core::expr::{Constant, Expr, ExprKind, raise};
use crate::core::number::Number;
use crate::core::terms::{FactorTerms, SumTerms};

/// Renders an expression as a string
#[derive(Debug, Default)]
pub struct StrPrinter;

impl StrPrinter {
    fn factor(&mut self, expr: &Expr) -> String {
        let s = expr.accept(self);
        if needs_parens_as_factor(expr) {
            format!("({s})")
        } else {
            s
        }
    }
}

fn needs_parens_as_factor(expr: &Expr) -> bool {
    match expr.kind() {
        ExprKind::Sum { .. } => true,
        ExprKind::Number(n) => matches!(n, Number::Complex(_) | Number::ComplexReal(_)),
        _ => false,
    }
}

fn needs_parens_as_base(expr: &Expr) -> bool {
    match expr.kind() {
        ExprKind::Sum { .. } | ExprKind::Product { .. } | ExprKind::Pow(..) => true,
        ExprKind::Number(n) => n.is_negative() || !matches!(n, Number::Integer(_)),
        _ => false,
    }
}

fn needs_parens_as_exponent(expr: &Expr) -> bool {
    match expr.kind() {
        ExprKind::Number(n) => !matches!(n, Number::Integer(i) if *i >= 0.into()),
        ExprKind::Symbol(_) | ExprKind::Constant(_) | ExprKind::Function { .. } => false,
        _ => true,
    }
}

impl Visitor for StrPrinter {
    type Output = String;

    fn visit_default(&mut self, _expr: &Expr) -> String {
        String::new()
    }

    fn visit_number(&mut self, _expr: &Expr, value: &Number) -> String {
        value.to_string()
    }

    fn visit_constant(&mut self, _expr: &Expr, constant: Constant) -> String {
        constant.name().to_string()
    }

    fn visit_symbol(&mut self, _expr: &Expr, name: &str) -> String {
        name.to_string()
    }

    fn visit_sum(&mut self, expr: &Expr, _offset: &Number, _terms: &SumTerms) -> String {
        let mut out = String::new();
        for (i, arg) in expr.args().iter().enumerate() {
            let s = arg.accept(self);
            match (i, s.strip_prefix('-')) {
                (0, _) => out.push_str(&s),
                (_, Some(rest)) => {
                    out.push_str(" - ");
                    out.push_str(rest);
                }
                (_, None) => {
                    out.push_str(" + ");
                    out.push_str(&s);
                }
            }
        }
        out
    }

    fn visit_product(&mut self, _expr: &Expr, coef: &Number, factors: &FactorTerms) -> String {
        let parts: Vec<String> = factors
            .sorted()
            .into_iter()
            .map(|(base, exp)| self.factor(&raise(base, exp)))
            .collect();
        let body = parts.join("*");
        if coef.is_one() {
            body
        } else if coef.is_minus_one() {
            format!("-{body}")
        } else {
            let c = Expr::number(coef.clone());
            format!("{}*{body}", self.factor(&c))
        }
    }

    fn visit_pow(&mut self, _expr: &Expr, base: &Expr, exp: &Expr) -> String {
        let b = base.accept(self);
        let e = exp.accept(self);
        let b = if needs_parens_as_base(base) { format!("({b})") } else { b };
        let e = if needs_parens_as_exponent(exp) { format!("({e})") } else { e };
        format!("{b}^{e}")
    }

    fn visit_function(&mut self, _expr: &Expr, name: &str, args: &[Expr]) -> String {
        let args: Vec<String> = args.iter().map(|a| a.accept(self)).collect();
        format!("{name}({})", args.join(", "))
    }

    fn visit_indeterminate(&mut self, _expr: &Expr) -> String {
        "nan".to_string()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.accept(&mut StrPrinter))
    }
}
