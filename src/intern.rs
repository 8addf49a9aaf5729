//! Interned strings.
//!
//! The attribute store keeps string values as stable, deduplicated
//! references. Callers' transient text is interned before it is written.

use core::fmt;
use core::ops::Deref;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// A deduplicated, immutable string owned by an [`Interner`].
///
/// Cloning is a reference count bump. Two `Interned` from the same interner
/// with equal text share one allocation.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interned(Arc<str>);

impl Interned {
    /// The text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether both handles share one allocation.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl Default for Interned {
    fn default() -> Self {
        Self(Arc::from(""))
    }
}

impl Deref for Interned {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Interned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Interned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Thread-safe string pool.
#[derive(Default)]
pub struct Interner {
    pool: Mutex<HashSet<Arc<str>>>,
}

impl Interner {
    /// Empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `text`, returning the pooled handle.
    pub fn intern(&self, text: &str) -> Interned {
        let mut pool = self.pool.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = pool.get(text) {
            return Interned(Arc::clone(existing));
        }
        let fresh: Arc<str> = Arc::from(text);
        pool.insert(Arc::clone(&fresh));
        Interned(fresh)
    }

    /// Number of distinct strings held.
    pub fn len(&self) -> usize {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interner({} strings)", self.len())
    }
}
