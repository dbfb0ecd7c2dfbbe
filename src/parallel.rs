//! Parallel batch operations using Rayon
//!
//! Expression nodes are immutable and their reference counts atomic, so whole
//! trees can be shared across worker threads without copying.
//!
//! Enable with the `parallel` feature:
//! ```toml
//! symb_canon = { version = "0.1", features = ["parallel"] }
//! ```

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::core::error::KernelError;
use crate::core::expr::Expr;
use crate::expand::Expand;

/// Expand every expression with default settings, in parallel.
///
/// The output keeps the input order.
#[must_use]
pub fn expand_batch(exprs: &[Expr]) -> Vec<Expr> {
    expand_batch_with(&Expand::new(), exprs)
}

/// Expand every expression with `config`, in parallel
#[must_use]
pub fn expand_batch_with(config: &Expand, exprs: &[Expr]) -> Vec<Expr> {
    log::debug!("expanding {} expressions in parallel", exprs.len());
    exprs.par_iter().map(|e| config.expand(e)).collect()
}

/// Evaluate each expression at each point, in parallel.
///
/// `results[i][p]` is `exprs[i]` evaluated under `points[p]`.
pub fn eval_batch(
    exprs: &[Expr],
    points: &[FxHashMap<String, f64>],
) -> Vec<Vec<Result<f64, KernelError>>> {
    exprs
        .par_iter()
        .map(|expr| points.par_iter().map(|p| expr.eval_f64(p)).collect())
        .collect()
}
