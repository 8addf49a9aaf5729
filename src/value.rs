//! Dynamic attribute values and their validated, typed form.
//!
//! [`Value`] is what callers pass around: a scalar or a flat list whose
//! element kinds are only known at runtime. Before a value reaches the
//! marshaler it is converted into [`TypedValues`], a homogeneous array whose
//! length has been checked against the declared [`TypeDesc`].

use core::fmt;

use crate::error::AttributeError;
use crate::format::BaseType;
use crate::typedesc::TypeDesc;

/// A runtime-typed scalar or flat sequence.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// An integer; narrowed to `i32` when marshaled.
    Int(i64),
    /// A float; narrowed to `f32` when marshaled.
    Float(f64),
    /// Text.
    Str(String),
    /// A flat sequence of scalars.
    List(Vec<Value>),
}

impl Value {
    /// Short kind name for messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(_) => "list",
        }
    }

    /// Number of values: 1 for a scalar, the length for a list.
    pub fn len(&self) -> usize {
        match self {
            Self::List(items) => items.len(),
            _ => 1,
        }
    }

    /// Whether this is an empty list.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::List(items) if items.is_empty())
    }

    /// The scalars of this value, in order.
    pub fn items(&self) -> &[Value] {
        match self {
            Self::List(items) => items,
            scalar => core::slice::from_ref(scalar),
        }
    }

    /// Scalar integer, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Scalar float, if this is one. Integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Scalar string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Attribute base types the marshaler handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttrKind {
    /// 32-bit signed integers.
    Int,
    /// 32-bit floats.
    Float,
    /// Interned strings.
    String,
}

impl AttrKind {
    /// Kind for a type descriptor.
    ///
    /// # Errors
    ///
    /// [`AttributeError::UnsupportedAttributeType`] for any base type other
    /// than 32-bit int, 32-bit float, or string.
    pub fn of(ty: TypeDesc) -> Result<Self, AttributeError> {
        match ty.basetype {
            BaseType::Int32 => Ok(Self::Int),
            BaseType::Float => Ok(Self::Float),
            BaseType::String => Ok(Self::String),
            BaseType::Unknown
            | BaseType::UInt8
            | BaseType::Int8
            | BaseType::UInt16
            | BaseType::Int16
            | BaseType::UInt32
            | BaseType::UInt64
            | BaseType::Int64
            | BaseType::Half
            | BaseType::Double => Err(AttributeError::UnsupportedAttributeType(ty)),
        }
    }
}

/// Homogeneous attribute values, validated against a [`TypeDesc`].
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValues {
    /// Integer values.
    Int(Vec<i32>),
    /// Float values.
    Float(Vec<f32>),
    /// String values, not yet interned.
    String(Vec<String>),
}

impl TypedValues {
    /// Convert and validate a dynamic value for `ty`.
    ///
    /// Integers widen to float; nothing else converts. Integers outside the
    /// `i32` range are rejected rather than truncated.
    ///
    /// # Errors
    ///
    /// - [`AttributeError::UnsupportedAttributeType`] if `ty` is not int,
    ///   float, or string.
    /// - [`AttributeError::ValueKind`] if an item has the wrong kind or is a
    ///   nested list.
    /// - [`AttributeError::CountMismatch`] if the number of items is not
    ///   `ty.shape()`.
    pub fn from_value(value: &Value, ty: TypeDesc) -> Result<Self, AttributeError> {
        let kind = AttrKind::of(ty)?;
        let items = value.items();
        let wrong = |item: &Value| AttributeError::ValueKind {
            ty,
            found: item.kind_name(),
        };
        let typed = match kind {
            AttrKind::Int => Self::Int(
                items
                    .iter()
                    .map(|item| {
                        item.as_int()
                            .and_then(|v| i32::try_from(v).ok())
                            .ok_or_else(|| wrong(item))
                    })
                    .collect::<Result<_, _>>()?,
            ),
            AttrKind::Float => Self::Float(
                items
                    .iter()
                    .map(|item| match item {
                        Value::List(_) | Value::Str(_) => Err(wrong(item)),
                        _ => item.as_float().map(|v| v as f32).ok_or_else(|| wrong(item)),
                    })
                    .collect::<Result<_, _>>()?,
            ),
            AttrKind::String => Self::String(
                items
                    .iter()
                    .map(|item| item.as_str().map(str::to_owned).ok_or_else(|| wrong(item)))
                    .collect::<Result<_, _>>()?,
            ),
        };
        if typed.len() != ty.shape() {
            return Err(AttributeError::CountMismatch {
                ty,
                expected: ty.shape(),
                actual: typed.len(),
            });
        }
        Ok(typed)
    }

    /// Kind of the contained values.
    pub fn kind(&self) -> AttrKind {
        match self {
            Self::Int(_) => AttrKind::Int,
            Self::Float(_) => AttrKind::Float,
            Self::String(_) => AttrKind::String,
        }
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::String(v) => v.len(),
        }
    }

    /// Whether there are no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Back to a dynamic value: a scalar when there is exactly one value,
    /// otherwise a list.
    pub fn into_value(self) -> Value {
        let mut items: Vec<Value> = match self {
            Self::Int(v) => v.into_iter().map(Value::from).collect(),
            Self::Float(v) => v.into_iter().map(Value::from).collect(),
            Self::String(v) => v.into_iter().map(Value::from).collect(),
        };
        if items.len() == 1 {
            items.remove(0)
        } else {
            Value::List(items)
        }
    }
}
