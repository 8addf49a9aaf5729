//! Type descriptors for attribute values.
//!
//! A [`TypeDesc`] is a base type repeated `aggregate` times per element
//! (a 3-vector has aggregate 3), with `arraylen` elements. The flat number of
//! base values it holds is its [`shape`](TypeDesc::shape).

use core::fmt;

use crate::format::BaseType;

/// Repetition count of a base value within one element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Aggregate {
    /// A single value.
    #[default]
    Scalar = 1,
    /// Two values.
    Vec2 = 2,
    /// Three values (vectors, points, colors).
    Vec3 = 3,
    /// Four values.
    Vec4 = 4,
    /// 3x3 matrix.
    Matrix33 = 9,
    /// 4x4 matrix.
    Matrix44 = 16,
}

impl Aggregate {
    /// Number of base values in one element.
    #[inline]
    pub const fn count(self) -> usize {
        self as usize
    }

    /// Aggregate for a component count, if one exists.
    pub const fn from_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(Self::Scalar),
            2 => Some(Self::Vec2),
            3 => Some(Self::Vec3),
            4 => Some(Self::Vec4),
            9 => Some(Self::Matrix33),
            16 => Some(Self::Matrix44),
            _ => None,
        }
    }
}

/// Attribute type: base type, aggregate, and array length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TypeDesc {
    /// Type of each base value.
    pub basetype: BaseType,
    /// Base values per element.
    pub aggregate: Aggregate,
    /// Number of elements; 0 means "not an array" and counts as one.
    pub arraylen: u32,
}

impl TypeDesc {
    /// Unknown type.
    pub const UNKNOWN: Self = Self::new(BaseType::Unknown);
    /// Single 32-bit integer.
    pub const INT: Self = Self::new(BaseType::Int32);
    /// Single 32-bit float.
    pub const FLOAT: Self = Self::new(BaseType::Float);
    /// Single string.
    pub const STRING: Self = Self::new(BaseType::String);
    /// Single byte.
    pub const UINT8: Self = Self::new(BaseType::UInt8);
    /// Single half float.
    pub const HALF: Self = Self::new(BaseType::Half);
    /// Single double.
    pub const DOUBLE: Self = Self::new(BaseType::Double);

    /// Scalar, non-array type of the given base.
    pub const fn new(basetype: BaseType) -> Self {
        Self {
            basetype,
            aggregate: Aggregate::Scalar,
            arraylen: 0,
        }
    }

    /// Non-array type with the given aggregate.
    pub const fn with_aggregate(basetype: BaseType, aggregate: Aggregate) -> Self {
        Self {
            basetype,
            aggregate,
            arraylen: 0,
        }
    }

    /// Same type as an array of `len` elements.
    pub const fn array(self, len: u32) -> Self {
        Self {
            arraylen: len,
            ..self
        }
    }

    /// Whether the base type is unknown.
    #[inline]
    pub const fn is_unknown(&self) -> bool {
        self.basetype.is_unknown()
    }

    /// Number of elements (array length, at least 1).
    #[inline]
    pub const fn num_elements(&self) -> usize {
        if self.arraylen == 0 {
            1
        } else {
            self.arraylen as usize
        }
    }

    /// Flat count of base values: `num_elements * aggregate`.
    #[inline]
    pub const fn shape(&self) -> usize {
        self.num_elements() * self.aggregate.count()
    }

    /// Total byte size of one value of this type.
    #[inline]
    pub const fn size(&self) -> usize {
        self.shape() * self.basetype.size()
    }
}

impl From<BaseType> for TypeDesc {
    fn from(basetype: BaseType) -> Self {
        Self::new(basetype)
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.basetype.name())?;
        if self.aggregate != Aggregate::Scalar {
            write!(f, "x{}", self.aggregate.count())?;
        }
        if self.arraylen > 0 {
            write!(f, "[{}]", self.arraylen)?;
        }
        Ok(())
    }
}
