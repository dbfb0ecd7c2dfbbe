//! Floating-point evaluation.

use rustc_hash::FxHashMap;

use super::Visitor;
use crate::core::error::KernelError;
use crate::core::expr::{Constant, Expr};
use crate::core::number::Number;
use crate::core::terms::{FactorTerms, SumTerms};

/// Evaluates an expression to `f64` under symbol bindings
pub struct EvalF64<'a> {
    bindings: &'a FxHashMap<String, f64>,
}

impl<'a> EvalF64<'a> {
    #[must_use]
    pub const fn new(bindings: &'a FxHashMap<String, f64>) -> Self {
        Self { bindings }
    }
}

type EvalResult = Result<f64, KernelError>;

impl Visitor for EvalF64<'_> {
    type Output = EvalResult;

    fn visit_default(&mut self, _expr: &Expr) -> EvalResult {
        Err(KernelError::NonFinite)
    }

    fn visit_number(&mut self, _expr: &Expr, value: &Number) -> EvalResult {
        value.to_f64().ok_or(KernelError::NonFinite)
    }

    fn visit_constant(&mut self, _expr: &Expr, constant: Constant) -> EvalResult {
        Ok(constant.value())
    }

    fn visit_symbol(&mut self, _expr: &Expr, name: &str) -> EvalResult {
        self.bindings
            .get(name)
            .copied()
            .ok_or_else(|| KernelError::UnboundSymbol(name.to_string()))
    }

    fn visit_sum(&mut self, _expr: &Expr, offset: &Number, terms: &SumTerms) -> EvalResult {
        let mut total = offset.to_f64().ok_or(KernelError::NonFinite)?;
        for (term, coef) in terms.iter() {
            let c = coef.to_f64().ok_or(KernelError::NonFinite)?;
            total += c * term.accept(self)?;
        }
        Ok(total)
    }

    fn visit_product(&mut self, _expr: &Expr, coef: &Number, factors: &FactorTerms) -> EvalResult {
        let mut total = coef.to_f64().ok_or(KernelError::NonFinite)?;
        for (base, exp) in factors.iter() {
            total *= base.accept(self)?.powf(exp.accept(self)?);
        }
        Ok(total)
    }

    fn visit_pow(&mut self, _expr: &Expr, base: &Expr, exp: &Expr) -> EvalResult {
        Ok(base.accept(self)?.powf(exp.accept(self)?))
    }

    fn visit_function(&mut self, _expr: &Expr, name: &str, args: &[Expr]) -> EvalResult {
        let [arg] = args else {
            return Err(KernelError::UnknownFunction(name.to_string()));
        };
        let a = arg.accept(self)?;
        match name {
            "sin" => Ok(a.sin()),
            "cos" => Ok(a.cos()),
            "tan" => Ok(a.tan()),
            "exp" => Ok(a.exp()),
            "log" => Ok(a.ln()),
            _ => Err(KernelError::UnknownFunction(name.to_string())),
        }
    }

    fn visit_indeterminate(&mut self, _expr: &Expr) -> EvalResult {
        Err(KernelError::Indeterminate)
    }
}

impl Expr {
    /// Evaluate to a finite `f64`, looking symbols up in `bindings`
    ///
    /// # Errors
    /// - `UnboundSymbol` for a symbol missing from `bindings`
    /// - `UnknownFunction` for a function without a numeric rule
    /// - `Indeterminate` when the tree contains the indeterminate marker
    /// - `NonFinite` for complex values, infinities and NaN
    pub fn eval_f64(&self, bindings: &FxHashMap<String, f64>) -> Result<f64, KernelError> {
        let value = self.accept(&mut EvalF64::new(bindings))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(KernelError::NonFinite)
        }
    }
}
