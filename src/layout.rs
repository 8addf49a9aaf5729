//! Buffer layout resolution.
//!
//! Callers hand in arbitrary multi-dimensional buffers (declared shape,
//! per-axis byte strides, element format code, total element count) and say
//! what pixel geometry they expect. [`resolve`] reinterprets the buffer as a
//! canonical raster with explicit x/y/z byte strides, or explains why it
//! can't.
//!
//! Accepted shapes, by dimensionality class:
//!
//! | class      | shape                                   |
//! |------------|-----------------------------------------|
//! | 3 (volume) | `[depth, height, width, channels]`      |
//! |            | `[depth, height, width * channels]`     |
//! | 2 (rect)   | `[height, width, channels]`             |
//! |            | `[height * width, channels]`            |
//! |            | `[height, width * channels]`            |
//! |            | `[height * width * channels]`           |
//! | 1 (span)   | `[width, channels]`                     |
//! |            | `[width * channels]`                    |
//!
//! No pixel data is copied. The resolved layout borrows the caller's bytes
//! for the duration of the borrow and nothing longer.
//!
//! # Example
//!
//! ```
//! use zenstride::{BaseType, BufferDescriptor, PixelGeometry, resolve, row_major_strides};
//!
//! let data = vec![0u8; 2 * 4 * 3 * 4];
//! let shape = [2, 4, 3];
//! let strides = row_major_strides(&shape, 4);
//! let buf = BufferDescriptor::new(Some('f'), 4, &shape, &strides, &data);
//!
//! let layout = resolve(&buf, PixelGeometry::rect(4, 2, 3)).unwrap();
//! assert_eq!(layout.format(), BaseType::Float);
//! assert_eq!(layout.x_stride(), 12);
//! assert_eq!(layout.y_stride(), 48);
//! ```

use core::fmt;

use enough::{Stop, StopReason};
use log::{debug, trace};

use crate::error::LayoutError;
use crate::format::BaseType;
use crate::limits::LayoutLimits;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Caller-supplied description of a multi-dimensional buffer.
///
/// Everything is borrowed; a descriptor lives no longer than the buffer it
/// describes.
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub struct BufferDescriptor<'a> {
    /// Single-character element format code, if the caller supplied one.
    pub format: Option<char>,
    /// Byte size of one element as declared by the caller.
    pub itemsize: usize,
    /// Total number of elements.
    pub len: usize,
    /// Extent of each axis, outermost first.
    pub shape: &'a [usize],
    /// Byte offset between consecutive elements along each axis.
    pub strides: &'a [isize],
    /// The buffer bytes, starting at element `[0, 0, ...]`.
    pub data: &'a [u8],
}

impl<'a> BufferDescriptor<'a> {
    /// Describe a buffer. `len` is the product of `shape`, saturating at
    /// `usize::MAX`.
    pub fn new(
        format: Option<char>,
        itemsize: usize,
        shape: &'a [usize],
        strides: &'a [isize],
        data: &'a [u8],
    ) -> Self {
        Self {
            format,
            itemsize,
            len: shape
                .iter()
                .try_fold(1usize, |acc, &n| acc.checked_mul(n))
                .unwrap_or(usize::MAX),
            shape,
            strides,
            data,
        }
    }

    /// Override the declared total element count.
    pub fn with_len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }

    /// Override the declared item size.
    pub fn with_itemsize(mut self, itemsize: usize) -> Self {
        self.itemsize = itemsize;
        self
    }

    /// Number of axes.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total byte size of the borrowed data.
    #[inline]
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }
}

/// Row-major (C order) byte strides for `shape` with `itemsize`-byte elements.
pub fn row_major_strides(shape: &[usize], itemsize: usize) -> Vec<isize> {
    let mut strides = vec![0isize; shape.len()];
    let mut acc = itemsize as isize;
    for (stride, &extent) in strides.iter_mut().zip(shape).rev() {
        *stride = acc;
        acc *= extent as isize;
    }
    strides
}

/// How many spatial axes the caller means the pixel data to have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Dimensionality {
    /// One scanline span.
    Span = 1,
    /// A 2D rectangle.
    Rect = 2,
    /// A 3D volume.
    Volume = 3,
}

impl Dimensionality {
    /// Map a numeric dimensionality class (1, 2, or 3).
    pub const fn from_pixeldims(pixeldims: u32) -> Option<Self> {
        match pixeldims {
            1 => Some(Self::Span),
            2 => Some(Self::Rect),
            3 => Some(Self::Volume),
            _ => None,
        }
    }

    /// Numeric dimensionality class.
    #[inline]
    pub const fn pixeldims(self) -> u8 {
        self as u8
    }

    /// Accepted buffer shapes for this class, for error messages.
    pub const fn accepted_shapes(self) -> &'static str {
        match self {
            Self::Span => "[width, channels] or [width*channels]",
            Self::Rect => {
                "[height, width, channels], [height*width, channels], \
                 [height, width*channels] or [height*width*channels]"
            }
            Self::Volume => "[depth, height, width, channels] or [depth, height, width*channels]",
        }
    }
}

/// Pixel geometry the caller expects the buffer to hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelGeometry {
    /// Channels per pixel.
    pub channels: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Depth in pixels.
    pub depth: u32,
    /// Dimensionality class.
    pub dims: Dimensionality,
}

impl PixelGeometry {
    /// A single scanline of `width` pixels.
    pub const fn span(width: u32, channels: u32) -> Self {
        Self {
            channels,
            width,
            height: 1,
            depth: 1,
            dims: Dimensionality::Span,
        }
    }

    /// A `width` x `height` rectangle.
    pub const fn rect(width: u32, height: u32, channels: u32) -> Self {
        Self {
            channels,
            width,
            height,
            depth: 1,
            dims: Dimensionality::Rect,
        }
    }

    /// A `width` x `height` x `depth` volume.
    pub const fn volume(width: u32, height: u32, depth: u32, channels: u32) -> Self {
        Self {
            channels,
            width,
            height,
            depth,
            dims: Dimensionality::Volume,
        }
    }

    /// `width * height * depth * channels`, or `None` on overflow.
    pub fn element_count(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.depth as usize)?
            .checked_mul(self.channels as usize)
    }
}

// ---------------------------------------------------------------------------
// ResolvedLayout
// ---------------------------------------------------------------------------

/// Position of one channel value within a resolved layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementIndex {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Volume slice; 0 for spans and rectangles.
    pub z: u32,
    /// Channel within the pixel.
    pub c: u32,
}

/// Canonical raster addressing over a caller's buffer.
///
/// Channel values of one pixel are always adjacent, `element_size()` bytes
/// apart. Every addressed byte lies inside the data slice, which [`resolve`]
/// verifies; strides that would reach before the start of the slice,
/// including any negative stride over more than one pixel, are rejected.
#[derive(Clone, Copy)]
#[non_exhaustive]
pub struct ResolvedLayout<'a> {
    format: BaseType,
    channels: u32,
    width: u32,
    height: u32,
    depth: u32,
    x_stride: isize,
    y_stride: isize,
    z_stride: isize,
    data: &'a [u8],
}

impl<'a> ResolvedLayout<'a> {
    /// Element format.
    #[inline]
    pub fn format(&self) -> BaseType {
        self.format
    }

    /// Byte size of one channel value.
    #[inline]
    pub fn element_size(&self) -> usize {
        self.format.size()
    }

    /// Channels per pixel.
    #[inline]
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Depth in pixels.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Byte offset between horizontally adjacent pixels.
    #[inline]
    pub fn x_stride(&self) -> isize {
        self.x_stride
    }

    /// Byte offset between vertically adjacent pixels.
    #[inline]
    pub fn y_stride(&self) -> isize {
        self.y_stride
    }

    /// Byte offset between adjacent volume slices.
    #[inline]
    pub fn z_stride(&self) -> isize {
        self.z_stride
    }

    /// The borrowed buffer bytes.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Total byte size of the borrowed buffer.
    #[inline]
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    /// Whether pixels, rows and slices are tightly packed in that order.
    pub fn is_contiguous(&self) -> bool {
        let pixel = scale(self.element_size() as isize, self.channels as usize);
        pixel == Some(self.x_stride)
            && pixel.and_then(|p| scale(p, self.width as usize)) == Some(self.y_stride)
            && scale(self.y_stride, self.height as usize) == Some(self.z_stride)
    }

    /// Byte offset of channel `c` of pixel `(x, y, z)`, or `None` if the
    /// index is out of range.
    pub fn offset(&self, x: u32, y: u32, z: u32, c: u32) -> Option<usize> {
        if x >= self.width || y >= self.height || z >= self.depth || c >= self.channels {
            return None;
        }
        // In range by the bounds check done at resolution.
        let off = x as isize * self.x_stride
            + y as isize * self.y_stride
            + z as isize * self.z_stride
            + c as isize * self.element_size() as isize;
        usize::try_from(off).ok()
    }

    /// Bytes of one channel value.
    pub fn element(&self, x: u32, y: u32, z: u32, c: u32) -> Option<&'a [u8]> {
        let start = self.offset(x, y, z, c)?;
        self.data.get(start..start + self.element_size())
    }

    /// Bytes of all channels of one pixel.
    pub fn pixel(&self, x: u32, y: u32, z: u32) -> Option<&'a [u8]> {
        let start = self.offset(x, y, z, 0)?;
        let len = self.element_size() * self.channels as usize;
        self.data.get(start..start + len)
    }

    /// Visit every channel value in z, y, x, c order.
    ///
    /// `stop` is checked once per row.
    pub fn visit_elements<F>(&self, stop: impl Stop, mut f: F) -> Result<(), StopReason>
    where
        F: FnMut(ElementIndex, &'a [u8]),
    {
        for z in 0..self.depth {
            for y in 0..self.height {
                stop.check()?;
                for x in 0..self.width {
                    for c in 0..self.channels {
                        if let Some(bytes) = self.element(x, y, z, c) {
                            f(ElementIndex { x, y, z, c }, bytes);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ResolvedLayout<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ResolvedLayout({}x{}x{}x{} {}, strides x={} y={} z={}, {} bytes)",
            self.depth,
            self.height,
            self.width,
            self.channels,
            self.format,
            self.x_stride,
            self.y_stride,
            self.z_stride,
            self.data.len()
        )
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve `buf` as pixel data with the expected `geometry`.
///
/// # Errors
///
/// - [`LayoutError::UnsupportedFormat`] if the format code is missing or unknown.
/// - [`LayoutError::SizeMismatch`] if the item size disagrees with the format,
///   or the element count disagrees with the geometry. Checked before any
///   shape interpretation.
/// - [`LayoutError::ShapeAmbiguous`] if the axes match no accepted shape.
/// - [`LayoutError::NoncontiguousChannels`] if `channels > 1` and the
///   innermost stride is not one element.
/// - [`LayoutError::InsufficientData`] if the strides address bytes outside
///   `buf.data`.
pub fn resolve<'a>(
    buf: &BufferDescriptor<'a>,
    geometry: PixelGeometry,
) -> Result<ResolvedLayout<'a>, LayoutError> {
    resolve_with_limits(buf, geometry, &LayoutLimits::none())
}

/// Like [`resolve`], with the dimensionality class given as a number.
///
/// Classes outside 1..=3 fail with [`LayoutError::UnsupportedDimensionality`]
/// once the buffer passes the size checks.
pub fn resolve_pixeldims<'a>(
    buf: &BufferDescriptor<'a>,
    channels: u32,
    width: u32,
    height: u32,
    depth: u32,
    pixeldims: u32,
) -> Result<ResolvedLayout<'a>, LayoutError> {
    let result = check_size(buf, channels, width, height, depth).and_then(|_| {
        Dimensionality::from_pixeldims(pixeldims).ok_or(LayoutError::UnsupportedDimensionality {
            pixeldims,
            ndim: buf.ndim(),
        })
    });
    match result {
        Ok(dims) => resolve(
            buf,
            PixelGeometry {
                channels,
                width,
                height,
                depth,
                dims,
            },
        ),
        Err(err) => {
            debug!("buffer layout rejected: {err}");
            Err(err)
        }
    }
}

/// Like [`resolve`], additionally enforcing `limits` before interpreting the
/// shape.
pub fn resolve_with_limits<'a>(
    buf: &BufferDescriptor<'a>,
    geometry: PixelGeometry,
    limits: &LayoutLimits,
) -> Result<ResolvedLayout<'a>, LayoutError> {
    match resolve_inner(buf, geometry, limits) {
        Ok(layout) => {
            trace!("resolved buffer layout: {layout:?}");
            Ok(layout)
        }
        Err(err) => {
            debug!(
                "buffer layout rejected (pixeldims={}, shape={:?}, strides={:?}): {err}",
                geometry.dims.pixeldims(),
                buf.shape,
                buf.strides
            );
            Err(err)
        }
    }
}

fn resolve_inner<'a>(
    buf: &BufferDescriptor<'a>,
    geometry: PixelGeometry,
    limits: &LayoutLimits,
) -> Result<ResolvedLayout<'a>, LayoutError> {
    let PixelGeometry {
        channels,
        width,
        height,
        depth,
        ..
    } = geometry;
    let format = check_size(buf, channels, width, height, depth)?;
    limits.check_geometry(width, height, depth, channels)?;
    limits.check_bytes(buf.data.len() as u64)?;

    let strides = interpret_shape(buf, &geometry);

    // A loosely packed channel axis overrides whatever the shape said.
    let elem = format.size() as isize;
    if channels > 1
        && let Some(&innermost) = buf.strides.last()
        && innermost != elem
    {
        return Err(LayoutError::NoncontiguousChannels {
            innermost_stride: innermost,
            element_size: format.size(),
        });
    }
    let Strides { x, y, z } = strides?;

    let layout = ResolvedLayout {
        format,
        channels,
        width,
        height,
        depth,
        x_stride: x,
        y_stride: y,
        z_stride: z,
        data: buf.data,
    };
    check_bounds(&layout)?;
    Ok(layout)
}

/// Decode the format and verify item size and element count.
fn check_size(
    buf: &BufferDescriptor<'_>,
    channels: u32,
    width: u32,
    height: u32,
    depth: u32,
) -> Result<BaseType, LayoutError> {
    let code = buf.format.ok_or(LayoutError::UnsupportedFormat { code: None })?;
    let format = BaseType::from_code(code);
    if format.is_unknown() {
        return Err(LayoutError::UnsupportedFormat { code: Some(code) });
    }
    let expected = PixelGeometry {
        channels,
        width,
        height,
        depth,
        dims: Dimensionality::Volume,
    }
    .element_count();
    if buf.itemsize != format.size() || expected != Some(buf.len) {
        return Err(LayoutError::SizeMismatch {
            depth,
            height,
            width,
            channels,
            expected_item_size: format.size(),
            actual_item_size: buf.itemsize,
            actual_elements: buf.len,
        });
    }
    Ok(format)
}

struct Strides {
    x: isize,
    y: isize,
    z: isize,
}

impl Strides {
    /// Strides with unset outer axes filled in as a contiguous continuation.
    fn packed(x: isize, width: usize, height: usize) -> Option<Self> {
        let y = scale(x, width)?;
        Some(Self {
            x,
            y,
            z: scale(y, height)?,
        })
    }
}

/// `stride * n`, or `None` if it leaves `isize`.
fn scale(stride: isize, n: usize) -> Option<isize> {
    stride.checked_mul(isize::try_from(n).ok()?)
}

fn interpret_shape(
    buf: &BufferDescriptor<'_>,
    geometry: &PixelGeometry,
) -> Result<Strides, LayoutError> {
    let ambiguous = |expected: String| LayoutError::ShapeAmbiguous {
        pixeldims: geometry.dims.pixeldims(),
        ndim: buf.ndim(),
        shape: buf.shape.to_vec(),
        expected,
    };
    if buf.strides.len() != buf.shape.len() {
        return Err(ambiguous(format!(
            "one stride per axis, got {} strides",
            buf.strides.len()
        )));
    }

    let w = geometry.width as usize;
    let h = geometry.height as usize;
    let d = geometry.depth as usize;
    let c = geometry.channels as usize;
    let st = buf.strides;
    let wc = w.checked_mul(c);
    let hw = h.checked_mul(w);
    let hwc = hw.and_then(|n| n.checked_mul(c));
    // A stride product that leaves `isize` cannot address the borrowed data.
    let overflow = || LayoutError::InsufficientData {
        required: usize::MAX,
        actual: buf.data.len(),
    };

    let strides = match geometry.dims {
        Dimensionality::Volume => match *buf.shape {
            [sd, sh, sw, sc] if sd == d && sh == h && sw == w && sc == c => Some(Strides {
                x: st[2],
                y: st[1],
                z: st[0],
            }),
            [sd, sh, swc] if sd == d && sh == h && Some(swc) == wc => {
                scale(st[2], c).map(|x| Strides {
                    x,
                    y: st[1],
                    z: st[0],
                })
            }
            _ => return Err(ambiguous(geometry.dims.accepted_shapes().to_owned())),
        },
        Dimensionality::Rect => match *buf.shape {
            [sh, sw, sc] if sh == h && sw == w && sc == c => {
                scale(st[0], h).map(|z| Strides {
                    x: st[1],
                    y: st[0],
                    z,
                })
            }
            [shw, sc] if Some(shw) == hw && sc == c => Strides::packed(st[0], w, h),
            [sh, swc] if sh == h && Some(swc) == wc => scale(st[1], c)
                .zip(scale(st[0], h))
                .map(|(x, z)| Strides { x, y: st[0], z }),
            [all] if Some(all) == hwc => {
                scale(st[0], c).and_then(|x| Strides::packed(x, w, h))
            }
            _ => return Err(ambiguous(geometry.dims.accepted_shapes().to_owned())),
        },
        Dimensionality::Span => match *buf.shape {
            [sw, sc] if sw == w && sc == c => Strides::packed(st[0], w, h),
            [swc] if Some(swc) == wc => scale(st[0], c).and_then(|x| Strides::packed(x, w, h)),
            _ => return Err(ambiguous(geometry.dims.accepted_shapes().to_owned())),
        },
    };
    strides.ok_or_else(overflow)
}

/// Verify every addressed byte lies inside the borrowed data.
fn check_bounds(layout: &ResolvedLayout<'_>) -> Result<(), LayoutError> {
    let elem = layout.element_size() as isize;
    let extents = [
        (layout.width, layout.x_stride),
        (layout.height, layout.y_stride),
        (layout.depth, layout.z_stride),
        (layout.channels, elem),
    ];
    if extents.iter().any(|&(n, _)| n == 0) {
        return Ok(());
    }
    let too_small = || LayoutError::InsufficientData {
        required: usize::MAX,
        actual: layout.data.len(),
    };
    let mut lo = 0isize;
    let mut hi = 0isize;
    for (n, stride) in extents {
        let span = (n as isize - 1).checked_mul(stride).ok_or_else(too_small)?;
        if span < 0 {
            lo = lo.checked_add(span).ok_or_else(too_small)?;
        } else {
            hi = hi.checked_add(span).ok_or_else(too_small)?;
        }
    }
    let end = hi.checked_add(elem).ok_or_else(too_small)?;
    if lo < 0 || end as usize > layout.data.len() {
        return Err(LayoutError::InsufficientData {
            required: end.abs_diff(lo.min(0)),
            actual: layout.data.len(),
        });
    }
    Ok(())
}
