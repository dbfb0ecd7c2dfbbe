//! Algebraic expansion.
//!
//! Distributes products over sums and expands positive integer powers of sums
//! with the multinomial theorem. The result is a canonical sum of monomials,
//! and expanding it again changes nothing.
//!
//! # Usage
//!
//! ```
//! use symb_canon::{Expand, Expr};
//!
//! let x = Expr::symbol("x");
//! let y = Expr::symbol("y");
//! let e = (&x + &y).pow(&Expr::integer(3));
//! let expanded = Expand::new().expand(&e);
//! assert_eq!(expanded.to_string(), "3*x*y^2 + 3*x^2*y + x^3 + y^3");
//! ```

use log::{debug, trace};
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use rustc_hash::FxHashMap;

use crate::canonical::{SumAccumulator, make_power, make_product};
use crate::core::expr::{Expr, ExprKind};
use crate::core::number::Number;
use crate::core::terms::{FactorTerms, SumTerms};
use crate::visitor::Transform;

/// Expansion settings.
///
/// `deep` (the default) also expands function arguments and exponents;
/// shallow expansion leaves them untouched.
#[derive(Debug, Clone, Copy)]
pub struct Expand {
    deep: bool,
}

impl Default for Expand {
    fn default() -> Self {
        Self { deep: true }
    }
}

impl Expand {
    /// Create expansion settings with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand inside function arguments and exponents
    #[must_use]
    pub const fn deep(mut self, deep: bool) -> Self {
        self.deep = deep;
        self
    }

    /// Expand `expr`
    #[must_use]
    pub fn expand(&self, expr: &Expr) -> Expr {
        let result = Expander { deep: self.deep }.apply(expr);
        debug!("expand(deep = {}) -> {} top-level terms", self.deep, result.args().len());
        result
    }
}

/// Expand with default settings
#[must_use]
pub fn expand(expr: &Expr) -> Expr {
    Expand::new().expand(expr)
}

impl Expr {
    /// Expand with default settings
    #[must_use]
    pub fn expand(&self) -> Self {
        expand(self)
    }
}

struct Expander {
    deep: bool,
}

impl Transform for Expander {
    fn transform_sum(&mut self, _expr: &Expr, offset: &Number, terms: &SumTerms) -> Expr {
        let mut acc = SumAccumulator::with_capacity(terms.len());
        acc.add(&Expr::number(offset.clone()));
        for (term, coef) in terms.iter() {
            acc.add_scaled(coef, &self.apply(term));
        }
        acc.finish()
    }

    fn transform_product(&mut self, _expr: &Expr, coef: &Number, factors: &FactorTerms) -> Expr {
        let mut result = Expr::number(coef.clone());
        for (base, exp) in factors.iter() {
            let factor = self.expand_power(base, exp);
            result = expand_mul(&result, &factor);
        }
        result
    }

    fn transform_pow(&mut self, _expr: &Expr, base: &Expr, exp: &Expr) -> Expr {
        self.expand_power(base, exp)
    }

    fn transform_function(&mut self, expr: &Expr, name: &str, args: &[Expr]) -> Expr {
        if !self.deep {
            return expr.clone();
        }
        Expr::function(name, args.iter().map(|a| self.apply(a)).collect())
    }
}

impl Expander {
    /// Expand `base^exp`
    fn expand_power(&mut self, base: &Expr, exp: &Expr) -> Expr {
        let base = self.apply(base);
        let exp = if self.deep { self.apply(exp) } else { exp.clone() };
        let powered = make_power(&base, &exp);
        match powered.kind() {
            ExprKind::Pow(b, e) => match (b.kind(), small_positive_integer(e)) {
                (ExprKind::Sum { offset, terms }, Some(n)) => self.multinomial(offset, terms, n),
                _ => powered.clone(),
            },
            // A power of a product distributed into factors that may need work
            ExprKind::Product { .. } if !base.ptr_eq(&powered) => self.apply(&powered),
            _ => powered.clone(),
        }
    }

    /// `(offset + Σ cᵢ·tᵢ)^n` by the multinomial theorem
    fn multinomial(&mut self, offset: &Number, terms: &SumTerms, n: u32) -> Expr {
        let mut parts: Vec<(Number, Expr)> = Vec::with_capacity(terms.len() + 1);
        if !offset.is_exact_zero() {
            parts.push((offset.clone(), Expr::one()));
        }
        parts.extend(terms.iter().map(|(t, c)| (c.clone(), t.clone())));

        let table = multinomial_coefficients(parts.len(), n);
        debug!(
            "multinomial expansion of {} terms to power {n}: {} monomials",
            parts.len(),
            table.len()
        );

        let mut acc = SumAccumulator::with_capacity(table.len());
        for (powers, k) in table {
            let mut coef = Number::Integer(k);
            let mut factors = Vec::with_capacity(parts.len());
            for ((c, t), &p) in parts.iter().zip(&powers) {
                if p == 0 {
                    continue;
                }
                coef = coef.mul(&c.pow_u32(p));
                factors.push(make_power(t, &Expr::integer(i64::from(p))));
            }
            let mut monomial = make_product(factors);
            if !is_monomial(&monomial) {
                monomial = self.apply(&monomial);
            }
            acc.add_scaled(&coef, &monomial);
        }
        acc.finish()
    }
}

/// Distribute the product of two expanded expressions
fn expand_mul(a: &Expr, b: &Expr) -> Expr {
    match (a.kind(), b.kind()) {
        (ExprKind::Sum { offset: o1, terms: t1 }, ExprKind::Sum { offset: o2, terms: t2 }) => {
            trace!("distributing {} x {} terms", t1.len() + 1, t2.len() + 1);
            let mut acc = SumAccumulator::with_capacity(t1.len() * t2.len());
            acc.add(&Expr::number(o1.mul(o2)));
            for (t, c) in t1.iter() {
                acc.add_scaled(&c.mul(o2), t);
            }
            for (t, c) in t2.iter() {
                acc.add_scaled(&c.mul(o1), t);
            }
            for (ta, ca) in t1.iter() {
                for (tb, cb) in t2.iter() {
                    acc.add_scaled(&ca.mul(cb), &monomial_product(ta, tb));
                }
            }
            acc.finish()
        }
        (ExprKind::Sum { offset, terms }, _) => distribute(offset, terms, b),
        (_, ExprKind::Sum { offset, terms }) => distribute(offset, terms, a),
        _ => {
            let product = make_product([a.clone(), b.clone()]);
            if is_monomial(&product) {
                product
            } else {
                expand(&product)
            }
        }
    }
}

/// `(offset + Σ cᵢ·tᵢ) · m` for a monomial `m`
fn distribute(offset: &Number, terms: &SumTerms, m: &Expr) -> Expr {
    let (m_coef, m_term) = m.as_coef_term();
    let mut acc = SumAccumulator::with_capacity(terms.len() + 1);
    acc.add_scaled(&offset.mul(&m_coef), &m_term);
    for (t, c) in terms.iter() {
        acc.add_scaled(&c.mul(&m_coef), &monomial_product(t, &m_term));
    }
    acc.finish()
}

/// Product of two monomials, re-expanded if combining bases produced a sum
fn monomial_product(a: &Expr, b: &Expr) -> Expr {
    let product = make_product([a.clone(), b.clone()]);
    if is_monomial(&product) {
        product
    } else {
        expand(&product)
    }
}

/// True when `expr` has no sum left to distribute
fn is_monomial(expr: &Expr) -> bool {
    match expr.kind() {
        ExprKind::Sum { .. } => false,
        ExprKind::Pow(base, exp) => !is_distributable_power(base, exp),
        ExprKind::Product { factors, .. } => factors
            .iter()
            .all(|(base, exp)| !is_distributable_power(base, exp)),
        _ => true,
    }
}

fn is_distributable_power(base: &Expr, exp: &Expr) -> bool {
    matches!(base.kind(), ExprKind::Sum { .. }) && small_positive_integer(exp).is_some()
}

/// The exponent as a machine-sized positive integer
fn small_positive_integer(exp: &Expr) -> Option<u32> {
    exp.as_number()?
        .as_integer()?
        .to_u32()
        .filter(|&n| n > 0)
}

/// All multinomial coefficients for `m` terms raised to the power `n`.
///
/// Maps each exponent tuple `(k₁, …, k_m)` with `Σ kᵢ = n` to
/// `n! / (k₁! ⋯ k_m!)`. Tuples are generated in co-lexicographic order, each
/// coefficient derived from previously computed neighbours.
#[must_use]
pub fn multinomial_coefficients(m: usize, n: u32) -> FxHashMap<Vec<u32>, BigInt> {
    let mut table = FxHashMap::default();
    if m == 0 {
        return table;
    }
    let mut t = vec![0u32; m];
    t[0] = n;
    table.insert(t.clone(), BigInt::from(1));
    if n == 0 || m == 1 {
        return table;
    }

    let lookup = |table: &FxHashMap<Vec<u32>, BigInt>, key: &[u32]| -> BigInt {
        table.get(key).cloned().unwrap_or_else(BigInt::zero)
    };

    // j is the leftmost nonzero position
    let mut j = 0;
    while j < m - 1 {
        let tj = t[j];
        if j > 0 {
            t[j] = 0;
            t[0] = tj;
        }
        let (start, mut v) = if tj > 1 {
            t[j + 1] += 1;
            j = 0;
            (1, BigInt::zero())
        } else {
            j += 1;
            let v = lookup(&table, &t);
            t[j] += 1;
            (j + 1, v)
        };
        for k in start..m {
            if t[k] > 0 {
                t[k] -= 1;
                v += lookup(&table, &t);
                t[k] += 1;
            }
        }
        t[0] -= 1;
        let value = v * BigInt::from(tj) / BigInt::from(n - t[0]);
        table.insert(t.clone(), value);
    }
    table
}
