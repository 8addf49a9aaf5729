//! Typed attribute marshaling between dynamic values and a store.

use log::debug;

use crate::error::AttributeError;
use crate::intern::Interned;
use crate::store::{AttrData, AttrSlot, AttributeStore};
use crate::typedesc::TypeDesc;
use crate::value::{AttrKind, TypedValues, Value};

/// Write `value` to `store` as attribute `name` of type `ty`.
///
/// The value is validated and converted in full before the store is
/// touched; on any error nothing is written. Strings are interned by the
/// store first.
///
/// # Errors
///
/// See [`TypedValues::from_value`]; additionally
/// [`AttributeError::Rejected`] if the store refuses the write.
pub fn set_typed<S: AttributeStore + ?Sized>(
    store: &S,
    name: &str,
    ty: TypeDesc,
    value: &Value,
) -> Result<(), AttributeError> {
    let typed = TypedValues::from_value(value, ty).inspect_err(|err| {
        debug!("attribute \"{name}\" not set: {err}");
    })?;
    write_typed(store, name, ty, &typed)
}

/// Write already-validated values.
///
/// # Errors
///
/// [`AttributeError::CountMismatch`] if `values` does not have `ty.shape()`
/// entries, [`AttributeError::UnsupportedAttributeType`] if its kind differs
/// from `ty`, and [`AttributeError::Rejected`] if the store refuses.
pub fn write_typed<S: AttributeStore + ?Sized>(
    store: &S,
    name: &str,
    ty: TypeDesc,
    values: &TypedValues,
) -> Result<(), AttributeError> {
    if AttrKind::of(ty)? != values.kind() {
        return Err(AttributeError::UnsupportedAttributeType(ty));
    }
    if values.len() != ty.shape() {
        return Err(AttributeError::CountMismatch {
            ty,
            expected: ty.shape(),
            actual: values.len(),
        });
    }
    let accepted = match values {
        TypedValues::Int(v) => store.set_attribute(name, ty, AttrData::Int(v)),
        TypedValues::Float(v) => store.set_attribute(name, ty, AttrData::Float(v)),
        TypedValues::String(v) => {
            let interned: Vec<Interned> = v.iter().map(|s| store.intern(s)).collect();
            store.set_attribute(name, ty, AttrData::String(&interned))
        }
    };
    if accepted {
        Ok(())
    } else {
        debug!("attribute \"{name}\" rejected by store");
        Err(AttributeError::Rejected {
            name: name.to_owned(),
        })
    }
}

/// Read attribute `name` of type `ty` from `store`.
///
/// Returns a scalar when `ty.shape() == 1`, otherwise a list. `None` if `ty`
/// is unknown or unsupported, or the store has no such attribute of that
/// type.
pub fn get_typed<S: AttributeStore + ?Sized>(store: &S, name: &str, ty: TypeDesc) -> Option<Value> {
    read_typed(store, name, ty).map(TypedValues::into_value)
}

/// Read attribute `name` of type `ty` without converting to a dynamic value.
pub fn read_typed<S: AttributeStore + ?Sized>(
    store: &S,
    name: &str,
    ty: TypeDesc,
) -> Option<TypedValues> {
    if ty.is_unknown() {
        return None;
    }
    let kind = AttrKind::of(ty).ok()?;
    // The scratch buffer is sized from `ty`; only allocate once the store
    // holds a value of exactly that shape.
    if store.type_of(name)? != ty {
        return None;
    }
    let n = ty.shape();
    match kind {
        AttrKind::Int => {
            let mut scratch = vec![0i32; n];
            store
                .get_attribute(name, ty, AttrSlot::Int(&mut scratch))
                .then_some(TypedValues::Int(scratch))
        }
        AttrKind::Float => {
            let mut scratch = vec![0f32; n];
            store
                .get_attribute(name, ty, AttrSlot::Float(&mut scratch))
                .then_some(TypedValues::Float(scratch))
        }
        AttrKind::String => {
            let mut scratch = vec![Interned::default(); n];
            store
                .get_attribute(name, ty, AttrSlot::String(&mut scratch))
                .then(|| TypedValues::String(scratch.iter().map(|s| s.as_str().to_owned()).collect()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::BaseType;
    use crate::store::{MemoryStore, StoreConfig};
    use crate::typedesc::Aggregate;

    fn store() -> MemoryStore {
        MemoryStore::init(StoreConfig::new())
    }

    #[test]
    fn scalar_int_round_trip() {
        let store = store();
        set_typed(&store, "threads", TypeDesc::INT, &Value::Int(8)).unwrap();
        assert_eq!(get_typed(&store, "threads", TypeDesc::INT), Some(Value::Int(8)));
    }

    #[test]
    fn vector_round_trip() {
        let store = store();
        let ty = TypeDesc::with_aggregate(BaseType::Float, Aggregate::Vec3);
        let value = Value::from(vec![0.5f32, 1.0, 2.0]);
        set_typed(&store, "white", ty, &value).unwrap();
        assert_eq!(get_typed(&store, "white", ty), Some(value));
    }

    #[test]
    fn strings_are_interned() {
        let store = store();
        let ty = TypeDesc::STRING.array(2);
        set_typed(&store, "plugins", ty, &vec!["jpeg", "jpeg"].into()).unwrap();
        let shut = store.shutdown();
        // "version" text plus one "jpeg"
        assert_eq!(shut.interned, 2);
    }

    #[test]
    fn count_mismatch_writes_nothing() {
        let store = store();
        let ty = TypeDesc::INT.array(2);
        let err = set_typed(&store, "pair", ty, &vec![1].into()).unwrap_err();
        assert!(matches!(err, AttributeError::CountMismatch { expected: 2, actual: 1, .. }));
        assert!(!store.contains("pair"));
        assert_eq!(get_typed(&store, "pair", ty), None);
    }

    #[test]
    fn unsupported_type_writes_nothing() {
        let store = store();
        let err = set_typed(&store, "d", TypeDesc::DOUBLE, &Value::Float(1.0)).unwrap_err();
        assert_eq!(err, AttributeError::UnsupportedAttributeType(TypeDesc::DOUBLE));
        assert!(!store.contains("d"));
        assert_eq!(get_typed(&store, "d", TypeDesc::DOUBLE), None);
    }

    #[test]
    fn unknown_type_reads_none() {
        let store = store();
        assert_eq!(get_typed(&store, "version", TypeDesc::UNKNOWN), None);
    }

    #[test]
    fn wrong_type_reads_none() {
        let store = store();
        set_typed(&store, "n", TypeDesc::INT, &Value::Int(1)).unwrap();
        assert_eq!(get_typed(&store, "n", TypeDesc::FLOAT), None);
        assert_eq!(get_typed(&store, "n", TypeDesc::INT.array(2)), None);
    }

    #[test]
    fn rejected_write() {
        let store = MemoryStore::init(StoreConfig::new().with_max_attributes(1));
        let err = set_typed(&store, "n", TypeDesc::INT, &Value::Int(1)).unwrap_err();
        assert_eq!(err, AttributeError::Rejected { name: "n".into() });
    }

    #[test]
    fn write_typed_checks_kind() {
        let store = store();
        let err = write_typed(&store, "n", TypeDesc::INT, &TypedValues::Float(vec![1.0])).unwrap_err();
        assert_eq!(err, AttributeError::UnsupportedAttributeType(TypeDesc::INT));
    }

    #[test]
    fn huge_requested_shape_reads_nothing() {
        let store = store();
        set_typed(&store, "matrix", TypeDesc::INT, &Value::Int(3)).unwrap();
        let huge = TypeDesc::with_aggregate(BaseType::Int32, Aggregate::Matrix44).array(u32::MAX);
        assert_eq!(get_typed(&store, "missing", huge), None);
        assert_eq!(get_typed(&store, "matrix", huge), None);
        assert_eq!(read_typed(&store, "matrix", TypeDesc::STRING.array(u32::MAX)), None);
    }
}
