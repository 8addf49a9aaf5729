//! Attribute store seam and the in-memory process-wide store.
//!
//! The marshaler talks to an [`AttributeStore`] through raw typed slices and
//! never assumes anything about how the store synchronizes. [`MemoryStore`]
//! is the store used by this crate: an explicit service object with an
//! [`init`](MemoryStore::init) / [`shutdown`](MemoryStore::shutdown)
//! lifecycle, passed by reference to whoever needs it.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use log::{info, trace, warn};

use crate::intern::{Interned, Interner};
use crate::typedesc::TypeDesc;
use crate::value::AttrKind;

/// Borrowed attribute payload handed to [`AttributeStore::set_attribute`].
#[derive(Clone, Copy, Debug)]
pub enum AttrData<'a> {
    /// Values of an `INT`-based type.
    Int(&'a [i32]),
    /// Values of a `FLOAT`-based type.
    Float(&'a [f32]),
    /// Values of a `STRING`-based type.
    String(&'a [Interned]),
}

impl AttrData<'_> {
    /// Kind of the payload.
    pub fn kind(&self) -> AttrKind {
        match self {
            Self::Int(_) => AttrKind::Int,
            Self::Float(_) => AttrKind::Float,
            Self::String(_) => AttrKind::String,
        }
    }

    /// Number of base values.
    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::String(v) => v.len(),
        }
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scratch buffer the store fills in [`AttributeStore::get_attribute`].
#[derive(Debug)]
pub enum AttrSlot<'a> {
    /// Destination for an `INT`-based type.
    Int(&'a mut [i32]),
    /// Destination for a `FLOAT`-based type.
    Float(&'a mut [f32]),
    /// Destination for a `STRING`-based type.
    String(&'a mut [Interned]),
}

impl AttrSlot<'_> {
    /// Kind of the slot.
    pub fn kind(&self) -> AttrKind {
        match self {
            Self::Int(_) => AttrKind::Int,
            Self::Float(_) => AttrKind::Float,
            Self::String(_) => AttrKind::String,
        }
    }

    /// Number of base values the slot holds.
    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::String(v) => v.len(),
        }
    }

    /// Whether the slot holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named, typed attribute store.
///
/// Implementations synchronize internally; callers add no locking around
/// these calls.
pub trait AttributeStore {
    /// Intern `text` so it can be stored by reference.
    fn intern(&self, text: &str) -> Interned;

    /// Store `data` as attribute `name` of type `ty`. Returns `false` if the
    /// store refuses the write; nothing is stored in that case.
    fn set_attribute(&self, name: &str, ty: TypeDesc, data: AttrData<'_>) -> bool;

    /// Fill `out` with attribute `name` of type `ty`. Returns `false` if the
    /// attribute is absent or stored with a different type.
    fn get_attribute(&self, name: &str, ty: TypeDesc, out: AttrSlot<'_>) -> bool;

    /// Type attribute `name` is stored with, if present.
    fn type_of(&self, name: &str) -> Option<TypeDesc>;
}

impl<S: AttributeStore + ?Sized> AttributeStore for &S {
    fn intern(&self, text: &str) -> Interned {
        (**self).intern(text)
    }

    fn set_attribute(&self, name: &str, ty: TypeDesc, data: AttrData<'_>) -> bool {
        (**self).set_attribute(name, ty, data)
    }

    fn get_attribute(&self, name: &str, ty: TypeDesc, out: AttrSlot<'_>) -> bool {
        (**self).get_attribute(name, ty, out)
    }

    fn type_of(&self, name: &str) -> Option<TypeDesc> {
        (**self).type_of(name)
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Caps for a [`MemoryStore`]. `None` means unlimited.
///
/// ```
/// use zenstride::StoreConfig;
///
/// let config = StoreConfig::new().with_max_attributes(256).with_max_elements(64);
/// assert_eq!(config.max_attributes, Some(256));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct StoreConfig {
    /// Maximum number of distinct attribute names.
    pub max_attributes: Option<usize>,
    /// Maximum base values in one attribute.
    pub max_elements: Option<usize>,
}

impl StoreConfig {
    /// No caps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of distinct attributes.
    pub fn with_max_attributes(mut self, max: usize) -> Self {
        self.max_attributes = Some(max);
        self
    }

    /// Cap the number of base values per attribute.
    pub fn with_max_elements(mut self, max: usize) -> Self {
        self.max_elements = Some(max);
        self
    }
}

/// What a store held when it was shut down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreStats {
    /// Attributes held, including the built-in ones.
    pub attributes: usize,
    /// Distinct interned strings.
    pub interned: usize,
}

#[derive(Clone, Debug)]
enum Stored {
    Int(Vec<i32>),
    Float(Vec<f32>),
    String(Vec<Interned>),
}

#[derive(Clone, Debug)]
struct Entry {
    ty: TypeDesc,
    data: Stored,
}

/// In-memory attribute store shared by every component of a process.
///
/// Reads take a shared lock, writes an exclusive one. A `"version"` string
/// attribute holding the crate version is registered at init, whatever the
/// caps in [`StoreConfig`]; it counts towards `max_attributes` afterwards.
#[derive(Debug)]
pub struct MemoryStore {
    config: StoreConfig,
    entries: RwLock<HashMap<String, Entry>>,
    strings: Interner,
}

impl MemoryStore {
    /// Create the store.
    pub fn init(config: StoreConfig) -> Self {
        let store = Self {
            config,
            entries: RwLock::new(HashMap::new()),
            strings: Interner::new(),
        };
        // Built-in attributes bypass the caps in `config`.
        let version = store.intern(crate::VERSION);
        store
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                "version".to_owned(),
                Entry {
                    ty: TypeDesc::STRING,
                    data: Stored::String(vec![version]),
                },
            );
        info!("attribute store initialized ({config:?})");
        store
    }

    /// Tear the store down, reporting what it held.
    pub fn shutdown(self) -> StoreStats {
        let stats = StoreStats {
            attributes: self.len(),
            interned: self.strings.len(),
        };
        info!(
            "attribute store shut down ({} attributes, {} interned strings)",
            stats.attributes, stats.interned
        );
        stats
    }

    /// Configuration the store was created with.
    pub fn config(&self) -> StoreConfig {
        self.config
    }

    /// Number of attributes held.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no attributes are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether attribute `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Attribute names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort_unstable();
        names
    }
}

impl AttributeStore for MemoryStore {
    fn intern(&self, text: &str) -> Interned {
        self.strings.intern(text)
    }

    fn type_of(&self, name: &str) -> Option<TypeDesc> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|entry| entry.ty)
    }

    fn set_attribute(&self, name: &str, ty: TypeDesc, data: AttrData<'_>) -> bool {
        if AttrKind::of(ty).ok() != Some(data.kind()) || data.len() != ty.shape() {
            warn!("attribute \"{name}\": payload does not match type {ty}");
            return false;
        }
        if let Some(max) = self.config.max_elements
            && data.len() > max
        {
            warn!(
                "attribute \"{name}\": {} values exceeds limit {max}",
                data.len()
            );
            return false;
        }
        let stored = match data {
            AttrData::Int(v) => Stored::Int(v.to_vec()),
            AttrData::Float(v) => Stored::Float(v.to_vec()),
            AttrData::String(v) => Stored::String(v.to_vec()),
        };
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(max) = self.config.max_attributes
            && !entries.contains_key(name)
            && entries.len() >= max
        {
            warn!("attribute \"{name}\": store already holds {max} attributes");
            return false;
        }
        entries.insert(name.to_owned(), Entry { ty, data: stored });
        trace!("attribute \"{name}\" set as {ty}");
        true
    }

    fn get_attribute(&self, name: &str, ty: TypeDesc, out: AttrSlot<'_>) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = entries.get(name) else {
            trace!("attribute \"{name}\" not found");
            return false;
        };
        if entry.ty != ty {
            trace!("attribute \"{name}\" is {}, requested {ty}", entry.ty);
            return false;
        }
        match (&entry.data, out) {
            (Stored::Int(src), AttrSlot::Int(dst)) if src.len() == dst.len() => {
                dst.copy_from_slice(src)
            }
            (Stored::Float(src), AttrSlot::Float(dst)) if src.len() == dst.len() => {
                dst.copy_from_slice(src)
            }
            (Stored::String(src), AttrSlot::String(dst)) if src.len() == dst.len() => {
                dst.clone_from_slice(src)
            }
            _ => return false,
        }
        true
    }
}
