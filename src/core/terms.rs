//! Term containers used while flattening sums and products.
//!
//! A container maps a base expression to its multiplicity: a numeric
//! coefficient for sums, an exponent expression for products. Inserting a base
//! that is already present combines the multiplicities (coefficients add,
//! exponents add), and an entry whose multiplicity becomes neutral is removed.
//! Lookups go through the cached structural hash of the base, so combining is
//! O(1) amortized.

use std::collections::hash_map::Entry;
use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHasher};

use crate::canonical::make_sum;
use crate::core::expr::Expr;
use crate::core::number::Number;

/// Multiplicity stored against a base in a [`Terms`] container
pub trait Multiplicity: Clone + PartialEq + Hash {
    /// Combine two multiplicities of the same base
    fn combine(&self, other: &Self) -> Self;

    /// True when the entry carrying this multiplicity should disappear
    fn is_neutral(&self) -> bool;
}

impl Multiplicity for Number {
    fn combine(&self, other: &Self) -> Self {
        self.add(other)
    }

    fn is_neutral(&self) -> bool {
        self.is_zero()
    }
}

impl Multiplicity for Expr {
    fn combine(&self, other: &Self) -> Self {
        make_sum([self.clone(), other.clone()])
    }

    fn is_neutral(&self) -> bool {
        self.as_number().is_some_and(Number::is_exact_zero)
    }
}

/// Base → multiplicity container
#[derive(Debug, Clone)]
pub struct Terms<V> {
    map: FxHashMap<Expr, V>,
}

/// Term → coefficient container of a sum
pub type SumTerms = Terms<Number>;

/// Base → exponent container of a product
pub type FactorTerms = Terms<Expr>;

impl<V> Default for Terms<V> {
    fn default() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }
}

impl<V: Multiplicity> Terms<V> {
    /// Create an empty container
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty container with room for `capacity` bases
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Insert `(base, m)`, combining with an existing entry for `base`.
    ///
    /// Neutral results remove the entry. Returns the multiplicity now stored
    /// for `base`, if any.
    pub fn insert(&mut self, base: Expr, m: V) -> Option<&V> {
        match self.map.entry(base) {
            Entry::Occupied(mut slot) => {
                let combined = slot.get().combine(&m);
                if combined.is_neutral() {
                    slot.remove();
                    None
                } else {
                    *slot.get_mut() = combined;
                    Some(slot.into_mut())
                }
            }
            Entry::Vacant(slot) => {
                if m.is_neutral() {
                    None
                } else {
                    Some(slot.insert(m))
                }
            }
        }
    }

    /// Multiplicity stored for `base`
    #[must_use]
    pub fn get(&self, base: &Expr) -> Option<&V> {
        self.map.get(base)
    }

    /// Remove and return the multiplicity of `base`
    pub fn remove(&mut self, base: &Expr) -> Option<V> {
        self.map.remove(base)
    }

    /// Number of distinct bases
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no base is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate entries in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&Expr, &V)> {
        self.map.iter()
    }

    /// The single entry of a one-element container
    #[must_use]
    pub fn single(&self) -> Option<(&Expr, &V)> {
        if self.map.len() == 1 {
            self.map.iter().next()
        } else {
            None
        }
    }

    /// Entries sorted by the canonical order of their bases
    #[must_use]
    pub fn sorted(&self) -> Vec<(&Expr, &V)> {
        let mut entries: Vec<_> = self.map.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Order-independent hash of all entries
    #[must_use]
    pub fn structural_hash(&self) -> u64 {
        self.map.iter().fold(0u64, |acc, (base, m)| {
            let mut hasher = FxHasher::default();
            base.structural_hash().hash(&mut hasher);
            m.hash(&mut hasher);
            acc.wrapping_add(hasher.finish())
        })
    }
}

impl<V: PartialEq> PartialEq for Terms<V> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<V> IntoIterator for Terms<V> {
    type Item = (Expr, V);
    type IntoIter = std::collections::hash_map::IntoIter<Expr, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Standard test relaxations")]
mod tests {
    use super::*;

    #[test]
    fn test_sum_terms_combine_and_cancel() {
        let x = Expr::symbol("x");
        let mut terms = SumTerms::new();
        terms.insert(x.clone(), Number::from(2));
        assert_eq!(terms.insert(x.clone(), Number::from(3)), Some(&Number::from(5)));
        assert_eq!(terms.insert(x.clone(), Number::from(-5)), None);
        assert!(terms.is_empty());
    }

    #[test]
    fn test_neutral_insert_is_dropped() {
        let mut terms = SumTerms::new();
        assert_eq!(terms.insert(Expr::symbol("x"), Number::zero()), None);
        assert!(terms.is_empty());
    }

    #[test]
    fn test_factor_terms_add_exponents() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let mut factors = FactorTerms::new();
        factors.insert(x.clone(), Expr::integer(2));
        factors.insert(x.clone(), y.clone());
        assert_eq!(factors.get(&x), Some(&make_sum([Expr::integer(2), y])));
        factors.insert(x.clone(), make_sum([Expr::integer(-2), -Expr::symbol("y")]));
        assert!(factors.get(&x).is_none());
    }

    #[test]
    fn test_structural_hash_ignores_insertion_order() {
        let (x, y) = (Expr::symbol("x"), Expr::symbol("y"));
        let mut a = SumTerms::new();
        a.insert(x.clone(), Number::from(1));
        a.insert(y.clone(), Number::from(2));
        let mut b = SumTerms::new();
        b.insert(y, Number::from(2));
        b.insert(x, Number::from(1));
        assert_eq!(a, b);
        assert_eq!(a.structural_hash(), b.structural_hash());
    }
}
