//! Ready-made visitors: node counting, symbol queries, substitution and
//! coefficient extraction.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use super::{Transform, Visitor, dispatch_transform, walk_expr};
use crate::canonical::{make_product, make_sum};
use crate::core::expr::{Expr, ExprKind};

/// Counts the nodes of a tree, following canonical arguments
#[derive(Debug, Default)]
pub struct NodeCounter {
    pub count: usize,
}

impl Visitor for NodeCounter {
    type Output = ();

    fn visit_default(&mut self, expr: &Expr) {
        self.count += 1;
        for arg in expr.args() {
            arg.accept(self);
        }
    }
}

/// Number of nodes in `expr`
#[must_use]
pub fn count_nodes(expr: &Expr) -> usize {
    let mut counter = NodeCounter::default();
    expr.accept(&mut counter);
    counter.count
}

/// Collects the names of all symbols
#[derive(Debug, Default)]
pub struct SymbolCollector {
    pub symbols: BTreeSet<String>,
}

impl Visitor for SymbolCollector {
    type Output = ();

    fn visit_default(&mut self, expr: &Expr) {
        for arg in expr.args() {
            arg.accept(self);
        }
    }

    fn visit_symbol(&mut self, _expr: &Expr, name: &str) {
        self.symbols.insert(name.to_string());
    }
}

/// Names of the symbols occurring in `expr`, sorted
#[must_use]
pub fn free_symbols(expr: &Expr) -> BTreeSet<String> {
    let mut collector = SymbolCollector::default();
    expr.accept(&mut collector);
    collector.symbols
}

/// True when the symbol `name` occurs in `expr`
#[must_use]
pub fn has_symbol(expr: &Expr, name: &str) -> bool {
    let mut found = false;
    walk_expr(expr, &mut |node| {
        if node.as_symbol() == Some(name) {
            found = true;
        }
        !found
    });
    found
}

/// Replaces subexpressions by structural match.
///
/// A node equal to a key is replaced whole; otherwise its children are
/// substituted and the node is rebuilt canonically. Replacements are not
/// themselves substituted again.
#[derive(Debug, Default)]
pub struct Subs {
    map: FxHashMap<Expr, Expr>,
}

impl Subs {
    /// Create an empty substitution
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `from` by `to`
    #[must_use]
    pub fn with(mut self, from: Expr, to: Expr) -> Self {
        self.map.insert(from, to);
        self
    }
}

impl FromIterator<(Expr, Expr)> for Subs {
    fn from_iter<I: IntoIterator<Item = (Expr, Expr)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

impl Transform for Subs {
    fn apply(&mut self, expr: &Expr) -> Expr {
        match self.map.get(expr) {
            Some(replacement) => replacement.clone(),
            None => dispatch_transform(self, expr),
        }
    }
}

impl Expr {
    /// Substitute `to` for every occurrence of `from`
    #[must_use]
    pub fn subs(&self, from: &Expr, to: &Expr) -> Expr {
        Subs::new().with(from.clone(), to.clone()).apply(self)
    }
}

/// Coefficient of `x^n` in `expr`, read term by term.
///
/// `expr` should be expanded. A term contributes its cofactor when it carries
/// `x` as a factor base with exponent exactly `n`. For `n = 0` the terms
/// without an `x` factor contribute whole.
#[must_use]
pub fn coeff(expr: &Expr, x: &Expr, n: &Expr) -> Expr {
    match expr.kind() {
        ExprKind::Sum { offset, terms } => {
            let mut parts = Vec::with_capacity(terms.len() + 1);
            if n.is_zero() && !offset.is_exact_zero() {
                parts.push(Expr::number(offset.clone()));
            }
            for (term, c) in terms.iter() {
                let part = term_coeff(term, x, n);
                if !part.is_zero() {
                    parts.push(make_product([Expr::number(c.clone()), part]));
                }
            }
            make_sum(parts)
        }
        _ => term_coeff(expr, x, n),
    }
}

fn term_coeff(term: &Expr, x: &Expr, n: &Expr) -> Expr {
    match term.kind() {
        ExprKind::Product { coef, factors } => match factors.get(x) {
            Some(e) if e == n => {
                let rest = factors
                    .iter()
                    .filter(|(b, _)| *b != x)
                    .map(|(b, e)| crate::core::expr::raise(b, e));
                make_product(std::iter::once(Expr::number(coef.clone())).chain(rest))
            }
            Some(_) => Expr::zero(),
            None if n.is_zero() => term.clone(),
            None => Expr::zero(),
        },
        _ => {
            let (base, exp) = term.as_base_exp();
            if base == *x {
                if exp == *n { Expr::one() } else { Expr::zero() }
            } else if n.is_zero() {
                term.clone()
            } else {
                Expr::zero()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;

    #[test]
    fn test_node_counter() {
        let x = Expr::symbol("x");
        let e = &x + x.pow(&Expr::integer(2));
        // sum, x, pow, x, 2
        assert_eq!(count_nodes(&e), 5);
    }

    #[test]
    fn test_free_symbols() {
        let (x, y) = (Expr::symbol("x"), Expr::symbol("y"));
        let e = (&x * &y).sin() + x.pow(&Expr::pi());
        let names: Vec<_> = free_symbols(&e).into_iter().collect();
        assert_eq!(names, vec!["x", "y"]);
        assert!(has_symbol(&e, "y"));
        assert!(!has_symbol(&e, "z"));
    }

    #[test]
    fn test_subs_rebuilds_canonically() {
        let (x, y) = (Expr::symbol("x"), Expr::symbol("y"));
        let e = &x + &y;
        assert_eq!(e.subs(&y, &x), Expr::integer(2) * &x);
        assert_eq!(e.subs(&x, &Expr::integer(-1)).subs(&y, &Expr::integer(1)), Expr::zero());
    }

    #[test]
    fn test_subs_whole_subtree() {
        let (x, y, z) = (Expr::symbol("x"), Expr::symbol("y"), Expr::symbol("z"));
        let inner = &x + &y;
        let e = inner.sin() * &z;
        assert_eq!(e.subs(&inner, &z), z.sin() * &z);
    }

    #[test]
    fn test_simultaneous_subs() {
        let (x, y) = (Expr::symbol("x"), Expr::symbol("y"));
        let mut swap: Subs = [(x.clone(), y.clone()), (y.clone(), x.clone())].into_iter().collect();
        let e = &x - &y;
        assert_eq!(swap.apply(&e), &y - &x);
    }

    #[test]
    fn test_coeff() {
        let (x, y) = (Expr::symbol("x"), Expr::symbol("y"));
        let e = (Expr::integer(3) * &y * x.pow(&Expr::integer(2)) + Expr::integer(5) * &x + Expr::integer(7)).expand();
        assert_eq!(coeff(&e, &x, &Expr::integer(2)), Expr::integer(3) * &y);
        assert_eq!(coeff(&e, &x, &Expr::integer(1)), Expr::integer(5));
        assert_eq!(coeff(&e, &x, &Expr::zero()), Expr::integer(7));
        assert_eq!(coeff(&e, &x, &Expr::integer(3)), Expr::zero());
    }
}
