//! Buffer layout resolution and typed attribute marshaling for image engines.
//!
//! Boundary code that interprets loosely structured external data:
//!
//! - [`resolve`] / [`resolve_pixeldims`] / [`resolve_with_limits`]: read a
//!   caller's strided multi-dimensional buffer ([`BufferDescriptor`]) as a
//!   canonical pixel raster ([`ResolvedLayout`]) with explicit x/y/z byte
//!   strides, accepting the common ways callers lay out pixel and channel axes
//! - [`BaseType::from_code`] / [`BaseType::code`]: single-character element
//!   format codes
//! - [`set_typed`] / [`get_typed`]: convert between a dynamic [`Value`] and
//!   a fixed-shape attribute of a declared [`TypeDesc`] in an
//!   [`AttributeStore`]
//! - [`MemoryStore`] / [`Attributes`]: the process-wide store and its named
//!   get/set surface
//!
//! Nothing here copies pixel data; layouts only borrow the caller's bytes.

#![forbid(unsafe_code)]

mod error;
mod facade;
mod format;
mod intern;
mod layout;
mod limits;
mod marshal;
mod store;
mod typedesc;
mod value;

pub use error::{AttributeError, LayoutError, LayoutErrorKind};
pub use facade::Attributes;
pub use format::{BaseType, FORMAT_CODES};
pub use intern::{Interned, Interner};
pub use layout::{
    BufferDescriptor, Dimensionality, ElementIndex, PixelGeometry, ResolvedLayout, resolve,
    resolve_pixeldims, resolve_with_limits, row_major_strides,
};
pub use limits::{LayoutLimits, LimitExceeded};
pub use marshal::{get_typed, read_typed, set_typed, write_typed};
pub use store::{AttrData, AttrSlot, AttributeStore, MemoryStore, StoreConfig, StoreStats};
pub use typedesc::{Aggregate, TypeDesc};
pub use value::{AttrKind, TypedValues, Value};

// Re-exports for callers walking resolved layouts.
pub use enough::{Stop, StopReason, Unstoppable};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Major component of [`VERSION`].
pub const VERSION_MAJOR: &str = env!("CARGO_PKG_VERSION_MAJOR");
/// Minor component of [`VERSION`].
pub const VERSION_MINOR: &str = env!("CARGO_PKG_VERSION_MINOR");
/// Patch component of [`VERSION`].
pub const VERSION_PATCH: &str = env!("CARGO_PKG_VERSION_PATCH");
