//! Expression visitors and transforms.
//!
//! Two traits cover the two ways of walking a tree:
//! - [`Visitor`] computes a value from a node. Every per-kind method falls back
//!   to [`Visitor::visit_default`], so a visitor overrides only the kinds it
//!   cares about.
//! - [`Transform`] rebuilds a tree. By default every child is transformed and
//!   the node is reassembled through the canonicalizers, so the result is
//!   always canonical.
//!
//! [`walk_expr`] and [`postorder`] are plain traversals in canonical argument
//! order.

mod builtin;
mod diff;
mod eval;
mod printer;

use crate::canonical::{make_power, make_product, make_sum};
use crate::core::expr::{Constant, Expr, ExprKind};
use crate::core::number::Number;
use crate::core::terms::{FactorTerms, SumTerms};

pub use builtin::{
    NodeCounter, SymbolCollector, Subs, coeff, count_nodes, free_symbols, has_symbol,
};
pub use diff::Differentiate;
pub use eval::EvalF64;
pub use printer::StrPrinter;

/// Computes a value from an expression node.
///
/// ```
/// use symb_canon::{Expr, Visitor};
///
/// struct Depth;
///
/// impl Visitor for Depth {
///     type Output = usize;
///
///     fn visit_default(&mut self, expr: &Expr) -> usize {
///         1 + expr.args().iter().map(|a| a.accept(self)).max().unwrap_or(0)
///     }
/// }
///
/// let x = Expr::symbol("x");
/// assert_eq!(x.accept(&mut Depth), 1);
/// assert_eq!(x.sin().accept(&mut Depth), 2);
/// ```
pub trait Visitor {
    /// Value produced for each node
    type Output;

    /// Fallback for every kind the visitor does not override
    fn visit_default(&mut self, expr: &Expr) -> Self::Output;

    fn visit_number(&mut self, expr: &Expr, _value: &Number) -> Self::Output {
        self.visit_default(expr)
    }

    fn visit_constant(&mut self, expr: &Expr, _constant: Constant) -> Self::Output {
        self.visit_default(expr)
    }

    fn visit_symbol(&mut self, expr: &Expr, _name: &str) -> Self::Output {
        self.visit_default(expr)
    }

    fn visit_sum(&mut self, expr: &Expr, _offset: &Number, _terms: &SumTerms) -> Self::Output {
        self.visit_default(expr)
    }

    fn visit_product(
        &mut self,
        expr: &Expr,
        _coef: &Number,
        _factors: &FactorTerms,
    ) -> Self::Output {
        self.visit_default(expr)
    }

    fn visit_pow(&mut self, expr: &Expr, _base: &Expr, _exp: &Expr) -> Self::Output {
        self.visit_default(expr)
    }

    fn visit_function(&mut self, expr: &Expr, _name: &str, _args: &[Expr]) -> Self::Output {
        self.visit_default(expr)
    }

    fn visit_indeterminate(&mut self, expr: &Expr) -> Self::Output {
        self.visit_default(expr)
    }
}

impl Expr {
    /// Dispatch to the visitor method for this node's kind
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self.kind() {
            ExprKind::Number(n) => visitor.visit_number(self, n),
            ExprKind::Constant(c) => visitor.visit_constant(self, *c),
            ExprKind::Symbol(name) => visitor.visit_symbol(self, name),
            ExprKind::Sum { offset, terms } => visitor.visit_sum(self, offset, terms),
            ExprKind::Product { coef, factors } => visitor.visit_product(self, coef, factors),
            ExprKind::Pow(base, exp) => visitor.visit_pow(self, base, exp),
            ExprKind::Function { name, args } => visitor.visit_function(self, name, args),
            ExprKind::Indeterminate => visitor.visit_indeterminate(self),
        }
    }
}

/// Rebuilds an expression, node by node.
///
/// Override [`Transform::apply`] to intercept nodes before kind dispatch (as
/// substitution does), or one of the per-kind hooks to change how a kind is
/// rebuilt. Call [`dispatch_transform`] from an overridden `apply` to fall back
/// to the per-kind hooks.
pub trait Transform {
    /// Transform `expr`
    fn apply(&mut self, expr: &Expr) -> Expr {
        dispatch_transform(self, expr)
    }

    /// Numbers, constants, symbols and the indeterminate marker
    fn transform_atom(&mut self, expr: &Expr) -> Expr {
        expr.clone()
    }

    fn transform_sum(&mut self, expr: &Expr, _offset: &Number, _terms: &SumTerms) -> Expr {
        let args: Vec<Expr> = expr.args().iter().map(|a| self.apply(a)).collect();
        make_sum(args)
    }

    fn transform_product(&mut self, expr: &Expr, _coef: &Number, _factors: &FactorTerms) -> Expr {
        let args: Vec<Expr> = expr.args().iter().map(|a| self.apply(a)).collect();
        make_product(args)
    }

    fn transform_pow(&mut self, _expr: &Expr, base: &Expr, exp: &Expr) -> Expr {
        let base = self.apply(base);
        let exp = self.apply(exp);
        make_power(&base, &exp)
    }

    fn transform_function(&mut self, _expr: &Expr, name: &str, args: &[Expr]) -> Expr {
        let args = args.iter().map(|a| self.apply(a)).collect();
        Expr::function(name, args)
    }
}

/// Route `expr` to the per-kind hook of `transform`
pub fn dispatch_transform<T: Transform + ?Sized>(transform: &mut T, expr: &Expr) -> Expr {
    expr.accept(&mut TransformDispatch(transform))
}

struct TransformDispatch<'a, T: ?Sized>(&'a mut T);

impl<T: Transform + ?Sized> Visitor for TransformDispatch<'_, T> {
    type Output = Expr;

    fn visit_default(&mut self, expr: &Expr) -> Expr {
        self.0.transform_atom(expr)
    }

    fn visit_sum(&mut self, expr: &Expr, offset: &Number, terms: &SumTerms) -> Expr {
        self.0.transform_sum(expr, offset, terms)
    }

    fn visit_product(&mut self, expr: &Expr, coef: &Number, factors: &FactorTerms) -> Expr {
        self.0.transform_product(expr, coef, factors)
    }

    fn visit_pow(&mut self, expr: &Expr, base: &Expr, exp: &Expr) -> Expr {
        self.0.transform_pow(expr, base, exp)
    }

    fn visit_function(&mut self, expr: &Expr, name: &str, args: &[Expr]) -> Expr {
        self.0.transform_function(expr, name, args)
    }
}

/// Walk an expression tree in pre-order (parent before children).
///
/// `visit` returns `true` to descend into the node's arguments, `false` to
/// skip them.
pub fn walk_expr<F: FnMut(&Expr) -> bool>(expr: &Expr, visit: &mut F) {
    let mut stack = vec![expr.clone()];
    while let Some(node) = stack.pop() {
        if visit(&node) {
            stack.extend(node.args().into_iter().rev());
        }
    }
}

/// Visit every node in post-order (children before parent)
pub fn postorder<F: FnMut(&Expr)>(expr: &Expr, visit: &mut F) {
    let mut stack = vec![(expr.clone(), false)];
    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            visit(&node);
        } else {
            let args = node.args();
            stack.push((node, true));
            stack.extend(args.into_iter().rev().map(|a| (a, false)));
        }
    }
}
