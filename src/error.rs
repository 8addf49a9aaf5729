//! Error types for layout resolution and attribute marshaling.
//!
//! Nothing here is fatal. Every failure is returned as a value the caller can
//! recover from by fixing the input shape or skipping the attribute.

use thiserror::Error;

use crate::limits::LimitExceeded;
use crate::typedesc::TypeDesc;

/// Why a buffer could not be interpreted as a pixel raster.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LayoutError {
    /// The buffer has no format code, or its code does not decode.
    #[error("unsupported buffer format code {}", describe_code(.code))]
    UnsupportedFormat {
        /// Format code as given by the caller.
        code: Option<char>,
    },

    /// Item size or total element count disagrees with the expected geometry.
    #[error(
        "buffer is wrong size (expected {depth}x{height}x{width}x{channels} elements of \
         {expected_item_size} bytes, got total {actual_elements} elements of {actual_item_size} bytes)"
    )]
    SizeMismatch {
        /// Expected depth.
        depth: u32,
        /// Expected height.
        height: u32,
        /// Expected width.
        width: u32,
        /// Expected channels per pixel.
        channels: u32,
        /// Byte size of the decoded format.
        expected_item_size: usize,
        /// Item size declared by the buffer.
        actual_item_size: usize,
        /// Element count declared by the buffer.
        actual_elements: usize,
    },

    /// The axis layout matches no recognized convention for the
    /// dimensionality class.
    #[error(
        "can't figure out array shape (pixeldims={pixeldims}, ndim={ndim}, shape={shape:?}; \
         expected {expected})"
    )]
    ShapeAmbiguous {
        /// Requested dimensionality class.
        pixeldims: u8,
        /// Number of axes in the buffer.
        ndim: usize,
        /// Axis extents of the buffer.
        shape: Vec<usize>,
        /// Accepted shapes for this class, spelled out for the caller.
        expected: String,
    },

    /// Dimensionality class outside 1..=3.
    #[error("can't figure out array shape (pixeldims={pixeldims}, ndim={ndim}; pixeldims must be 1, 2 or 3)")]
    UnsupportedDimensionality {
        /// Requested dimensionality class.
        pixeldims: u32,
        /// Number of axes in the buffer.
        ndim: usize,
    },

    /// The channel axis is not tightly packed.
    #[error(
        "can't handle buffer with noncontiguous channels (innermost stride {innermost_stride} \
         bytes, element size {element_size} bytes)"
    )]
    NoncontiguousChannels {
        /// Byte stride of the innermost axis.
        innermost_stride: isize,
        /// Byte size of one element.
        element_size: usize,
    },

    /// The resolved addressing reaches outside the borrowed data.
    #[error("buffer data too small: layout addresses {required} bytes, buffer holds {actual}")]
    InsufficientData {
        /// Bytes the layout addresses from the start of the data;
        /// `usize::MAX` when the strides overflow.
        required: usize,
        /// Bytes actually borrowed.
        actual: usize,
    },

    /// A configured [`LayoutLimits`](crate::LayoutLimits) cap was exceeded.
    #[error(transparent)]
    Limit(#[from] LimitExceeded),
}

/// Flat classification of [`LayoutError`] variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum LayoutErrorKind {
    /// [`LayoutError::UnsupportedFormat`].
    UnsupportedFormat,
    /// [`LayoutError::SizeMismatch`].
    SizeMismatch,
    /// [`LayoutError::ShapeAmbiguous`].
    ShapeAmbiguous,
    /// [`LayoutError::UnsupportedDimensionality`].
    UnsupportedDimensionality,
    /// [`LayoutError::NoncontiguousChannels`].
    NoncontiguousChannels,
    /// [`LayoutError::InsufficientData`].
    InsufficientData,
    /// [`LayoutError::Limit`].
    Limit,
}

impl LayoutError {
    /// Classification of this error, for matching without destructuring.
    pub fn kind(&self) -> LayoutErrorKind {
        match self {
            Self::UnsupportedFormat { .. } => LayoutErrorKind::UnsupportedFormat,
            Self::SizeMismatch { .. } => LayoutErrorKind::SizeMismatch,
            Self::ShapeAmbiguous { .. } => LayoutErrorKind::ShapeAmbiguous,
            Self::UnsupportedDimensionality { .. } => LayoutErrorKind::UnsupportedDimensionality,
            Self::NoncontiguousChannels { .. } => LayoutErrorKind::NoncontiguousChannels,
            Self::InsufficientData { .. } => LayoutErrorKind::InsufficientData,
            Self::Limit(_) => LayoutErrorKind::Limit,
        }
    }
}

fn describe_code(code: &Option<char>) -> String {
    match code {
        Some(c) => format!("'{c}'"),
        None => "(none)".to_owned(),
    }
}

/// Why a typed attribute could not be written.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AttributeError {
    /// Base type is not one of int, float, or string.
    #[error("unsupported attribute type {0}")]
    UnsupportedAttributeType(TypeDesc),

    /// Value count does not equal `num_elements * aggregate`.
    #[error("attribute of type {ty} needs {expected} values, got {actual}")]
    CountMismatch {
        /// Declared type.
        ty: TypeDesc,
        /// `ty.shape()`.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// A supplied value cannot convert to the declared base type.
    #[error("cannot convert {found} value to attribute type {ty}")]
    ValueKind {
        /// Declared type.
        ty: TypeDesc,
        /// Kind of the offending value.
        found: &'static str,
    },

    /// The attribute store refused the write.
    #[error("attribute store rejected \"{name}\"")]
    Rejected {
        /// Attribute name.
        name: String,
    },
}
