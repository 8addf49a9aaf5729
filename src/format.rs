//! Element base types and single-character format codes.
//!
//! Buffers handed in by callers describe their element type with a one
//! character code (`'f'` for f32, `'B'` for u8, ...). [`BaseType::from_code`]
//! decodes those codes and [`BaseType::code`] produces them.
//!
//! The two directions are deliberately asymmetric. Decoding can fail and
//! yields [`BaseType::Unknown`], which callers must treat as a hard error.
//! Encoding never fails: any type without a code of its own (including
//! `Unknown`) encodes as `'B'`, so arbitrary pixel memory can always be
//! exposed as a raw byte view.

use core::fmt;

/// Element base type of a pixel channel or attribute component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum BaseType {
    /// No known type. Never valid for addressing.
    #[default]
    Unknown,
    /// 8-bit unsigned integer.
    UInt8,
    /// 8-bit signed integer.
    Int8,
    /// 16-bit unsigned integer.
    UInt16,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit unsigned integer.
    UInt32,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit unsigned integer.
    UInt64,
    /// 64-bit signed integer.
    Int64,
    /// IEEE 754 half-precision float.
    Half,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Interned string reference.
    String,
}

/// Decode table: format code to base type.
///
/// `'c'` (char) is read as signed 8-bit. 64-bit integers decode but have no
/// encoding of their own.
pub const FORMAT_CODES: [(char, BaseType); 12] = [
    ('b', BaseType::Int8),
    ('c', BaseType::Int8),
    ('B', BaseType::UInt8),
    ('h', BaseType::Int16),
    ('H', BaseType::UInt16),
    ('i', BaseType::Int32),
    ('I', BaseType::UInt32),
    ('l', BaseType::Int64),
    ('L', BaseType::UInt64),
    ('f', BaseType::Float),
    ('d', BaseType::Double),
    ('e', BaseType::Half),
];

impl BaseType {
    /// Decode a single-character format code.
    ///
    /// Returns [`BaseType::Unknown`] for unrecognized codes.
    pub fn from_code(code: char) -> Self {
        FORMAT_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map_or(Self::Unknown, |&(_, ty)| ty)
    }

    /// Decode the leading character of a format string such as `"f"`.
    /// Empty strings decode to `Unknown`.
    pub fn from_code_str(code: &str) -> Self {
        code.chars().next().map_or(Self::Unknown, Self::from_code)
    }

    /// Format code for this type. Total: types without a code map to `'B'`.
    pub const fn code(self) -> char {
        match self {
            Self::UInt8 => 'B',
            Self::Int8 => 'b',
            Self::UInt16 => 'H',
            Self::Int16 => 'h',
            Self::UInt32 => 'I',
            Self::Int32 => 'i',
            Self::Float => 'f',
            Self::Double => 'd',
            Self::Half => 'e',
            Self::Unknown | Self::UInt64 | Self::Int64 | Self::String => 'B',
        }
    }

    /// Byte size of one element. `Unknown` is 0 bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::Unknown => 0,
            Self::UInt8 | Self::Int8 => 1,
            Self::UInt16 | Self::Int16 | Self::Half => 2,
            Self::UInt32 | Self::Int32 | Self::Float => 4,
            Self::UInt64 | Self::Int64 | Self::Double => 8,
            Self::String => core::mem::size_of::<usize>(),
        }
    }

    /// Whether this is [`BaseType::Unknown`].
    #[inline]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Whether values of this type can address pixel channels.
    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::Unknown | Self::String)
    }

    /// Whether this is a floating point type.
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Half | Self::Float | Self::Double)
    }

    /// Lowercase type name, as used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::UInt8 => "uint8",
            Self::Int8 => "int8",
            Self::UInt16 => "uint16",
            Self::Int16 => "int16",
            Self::UInt32 => "uint",
            Self::Int32 => "int",
            Self::UInt64 => "uint64",
            Self::Int64 => "int64",
            Self::Half => "half",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
