//! Canonicalizers for sums, products and powers.
//!
//! Every compound node is built here. The functions take operands in any form,
//! flatten them, combine like entries and collapse degenerate results, so that
//! two mathematically equal inputs which differ only by reordering,
//! regrouping or like-term combination produce structurally equal nodes.
//!
//! - [`make_sum`]: flattens nested sums, merges numbers into the offset and
//!   adds the coefficients of equal terms
//! - [`make_product`]: flattens nested products, merges numbers into the
//!   coefficient and adds the exponents of equal bases
//! - [`make_power`]: applies the numeric and structural power rules
//!
//! Apart from a numeric coefficient on a single sum, none of these distribute
//! multiplication over addition. That is the job of [`crate::Expand`].

mod power;
mod product;
mod sum;

pub use power::{checked_pow, make_power};
pub use product::make_product;
pub use sum::make_sum;

pub(crate) use product::{product_of_factors, scale_term};
pub(crate) use sum::SumAccumulator;
