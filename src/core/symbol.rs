//! Symbol contexts.
//!
//! A [`SymbolContext`] hands out one shared node per symbol name, so repeated
//! lookups return handles that compare by pointer. Contexts are explicit
//! values: each is created, used and cleared by its owner. Nothing is global.
//!
//! Symbols created outside a context still compare equal to context symbols of
//! the same name; the context only adds sharing and enumeration.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::core::expr::Expr;

new_key_type! {
    /// Stable key of a symbol inside one context
    pub struct SymbolKey;
}

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Default)]
struct ContextInner {
    name_to_key: FxHashMap<Arc<str>, SymbolKey>,
    symbols: SlotMap<SymbolKey, Expr>,
}

/// A registry of shared symbol nodes.
///
/// Cloning a context shares its registry; [`SymbolContext::new`] creates an
/// independent one.
///
/// ```
/// use symb_canon::SymbolContext;
///
/// let ctx = SymbolContext::new();
/// let a = ctx.symbol("x");
/// let b = ctx.symbol("x");
/// assert!(a.ptr_eq(&b));
/// ```
#[derive(Clone)]
pub struct SymbolContext {
    id: u64,
    inner: Arc<RwLock<ContextInner>>,
}

impl Default for SymbolContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SymbolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolContext")
            .field("id", &self.id)
            .field("len", &self.len())
            .finish()
    }
}

impl SymbolContext {
    /// Create an empty context
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
            inner: Arc::new(RwLock::new(ContextInner::default())),
        }
    }

    /// Unique id of this context
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Get or create the symbol `name`
    ///
    /// # Panics
    /// Panics if the context lock is poisoned.
    pub fn symbol(&self, name: &str) -> Expr {
        if let Some(existing) = self.get(name) {
            return existing;
        }
        let mut inner = self.inner.write().expect("symbol context poisoned");
        // Another handle may have inserted it between the two locks
        if let Some(&key) = inner.name_to_key.get(name)
            && let Some(existing) = inner.symbols.get(key)
        {
            return existing.clone();
        }
        let expr = Expr::symbol(name);
        let key = inner.symbols.insert(expr.clone());
        inner.name_to_key.insert(Arc::from(name), key);
        log::trace!("context {}: new symbol '{name}'", self.id);
        expr
    }

    /// The symbol `name`, if this context has created it
    ///
    /// # Panics
    /// Panics if the context lock is poisoned.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Expr> {
        let inner = self.inner.read().expect("symbol context poisoned");
        let key = inner.name_to_key.get(name)?;
        inner.symbols.get(*key).cloned()
    }

    /// Key of the symbol `name`
    ///
    /// # Panics
    /// Panics if the context lock is poisoned.
    #[must_use]
    pub fn key(&self, name: &str) -> Option<SymbolKey> {
        let inner = self.inner.read().expect("symbol context poisoned");
        inner.name_to_key.get(name).copied()
    }

    /// Symbol stored under `key`
    ///
    /// # Panics
    /// Panics if the context lock is poisoned.
    #[must_use]
    pub fn resolve(&self, key: SymbolKey) -> Option<Expr> {
        let inner = self.inner.read().expect("symbol context poisoned");
        inner.symbols.get(key).cloned()
    }

    /// True when `name` has been created in this context
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.key(name).is_some()
    }

    /// Forget `name`. Handles already given out stay valid.
    ///
    /// # Panics
    /// Panics if the context lock is poisoned.
    pub fn remove(&self, name: &str) -> bool {
        let mut inner = self.inner.write().expect("symbol context poisoned");
        match inner.name_to_key.remove(name) {
            Some(key) => inner.symbols.remove(key).is_some(),
            None => false,
        }
    }

    /// Number of symbols in the context
    ///
    /// # Panics
    /// Panics if the context lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().expect("symbol context poisoned").symbols.len()
    }

    /// True when the context holds no symbols
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Symbol names, sorted
    ///
    /// # Panics
    /// Panics if the context lock is poisoned.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let inner = self.inner.read().expect("symbol context poisoned");
        let mut names: Vec<String> = inner.name_to_key.keys().map(|n| n.to_string()).collect();
        names.sort_unstable();
        names
    }

    /// Drop every symbol. Handles already given out stay valid.
    ///
    /// # Panics
    /// Panics if the context lock is poisoned.
    pub fn clear(&self) {
        let mut inner = self.inner.write().expect("symbol context poisoned");
        log::debug!("context {}: clearing {} symbols", self.id, inner.symbols.len());
        inner.name_to_key.clear();
        inner.symbols.clear();
    }
}
