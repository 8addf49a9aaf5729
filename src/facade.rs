//! Named get/set over a shared attribute store.

use crate::error::AttributeError;
use crate::marshal::{get_typed, read_typed, set_typed, write_typed};
use crate::store::AttributeStore;
use crate::typedesc::TypeDesc;
use crate::value::{TypedValues, Value};

/// Convenience surface over an [`AttributeStore`].
///
/// Holds only a borrow; the store's owner controls its lifetime.
///
/// ```
/// use zenstride::{Attributes, MemoryStore, StoreConfig};
///
/// let store = MemoryStore::init(StoreConfig::new());
/// let attrs = Attributes::new(&store);
/// attrs.attribute_int("threads", 4).unwrap();
/// assert_eq!(attrs.get_int_attribute("threads", 0), 4);
/// assert_eq!(attrs.get_int_attribute("missing", -1), -1);
/// ```
#[derive(Debug)]
pub struct Attributes<'s, S: AttributeStore + ?Sized> {
    store: &'s S,
}

impl<S: AttributeStore + ?Sized> Clone for Attributes<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: AttributeStore + ?Sized> Copy for Attributes<'_, S> {}

impl<'s, S: AttributeStore + ?Sized> Attributes<'s, S> {
    /// Wrap a store.
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &'s S {
        self.store
    }

    /// Set a single integer.
    pub fn attribute_int(&self, name: &str, value: i32) -> Result<(), AttributeError> {
        write_typed(self.store, name, TypeDesc::INT, &TypedValues::Int(vec![value]))
    }

    /// Set a single float.
    pub fn attribute_float(&self, name: &str, value: f32) -> Result<(), AttributeError> {
        write_typed(self.store, name, TypeDesc::FLOAT, &TypedValues::Float(vec![value]))
    }

    /// Set a single string.
    pub fn attribute_str(&self, name: &str, value: &str) -> Result<(), AttributeError> {
        write_typed(
            self.store,
            name,
            TypeDesc::STRING,
            &TypedValues::String(vec![value.to_owned()]),
        )
    }

    /// Set a value of an explicit type.
    pub fn attribute_typed(
        &self,
        name: &str,
        ty: TypeDesc,
        value: &Value,
    ) -> Result<(), AttributeError> {
        set_typed(self.store, name, ty, value)
    }

    /// Read a single integer, or `default` if absent.
    pub fn get_int_attribute(&self, name: &str, default: i32) -> i32 {
        match read_typed(self.store, name, TypeDesc::INT) {
            Some(TypedValues::Int(v)) => v.first().copied().unwrap_or(default),
            _ => default,
        }
    }

    /// Read a single float, or `default` if absent.
    pub fn get_float_attribute(&self, name: &str, default: f32) -> f32 {
        match read_typed(self.store, name, TypeDesc::FLOAT) {
            Some(TypedValues::Float(v)) => v.first().copied().unwrap_or(default),
            _ => default,
        }
    }

    /// Read a single string, or `default` if absent.
    pub fn get_string_attribute(&self, name: &str, default: &str) -> String {
        match read_typed(self.store, name, TypeDesc::STRING) {
            Some(TypedValues::String(mut v)) if !v.is_empty() => v.swap_remove(0),
            _ => default.to_owned(),
        }
    }

    /// Read a value of an explicit type.
    pub fn getattribute(&self, name: &str, ty: TypeDesc) -> Option<Value> {
        get_typed(self.store, name, ty)
    }
}
