//! Geometry limits for buffer layout resolution.
//!
//! [`LayoutLimits`] caps the geometry a caller may ask the resolver to
//! address. [`LimitExceeded`] is returned when a check fails.

use thiserror::Error;

/// Caps applied by [`resolve_with_limits`](crate::resolve_with_limits).
///
/// All fields are optional; `None` means no limit for that dimension.
///
/// # Example
///
/// ```
/// use zenstride::LayoutLimits;
///
/// let limits = LayoutLimits::none()
///     .with_max_width(16384)
///     .with_max_channels(64)
///     .with_max_bytes(1 << 30);
/// assert!(limits.has_any());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct LayoutLimits {
    /// Maximum width in pixels.
    pub max_width: Option<u32>,
    /// Maximum height in pixels.
    pub max_height: Option<u32>,
    /// Maximum depth in pixels.
    pub max_depth: Option<u32>,
    /// Maximum channels per pixel.
    pub max_channels: Option<u32>,
    /// Maximum buffer size in bytes.
    pub max_bytes: Option<u64>,
}

impl LayoutLimits {
    /// No limits (all fields `None`).
    pub fn none() -> Self {
        Self::default()
    }

    /// Set maximum width.
    pub fn with_max_width(mut self, width: u32) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Set maximum height.
    pub fn with_max_height(mut self, height: u32) -> Self {
        self.max_height = Some(height);
        self
    }

    /// Set maximum depth.
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set maximum channel count.
    pub fn with_max_channels(mut self, channels: u32) -> Self {
        self.max_channels = Some(channels);
        self
    }

    /// Set maximum buffer size in bytes.
    pub fn with_max_bytes(mut self, bytes: u64) -> Self {
        self.max_bytes = Some(bytes);
        self
    }

    /// Whether any limits are set.
    pub fn has_any(&self) -> bool {
        self.max_width.is_some()
            || self.max_height.is_some()
            || self.max_depth.is_some()
            || self.max_channels.is_some()
            || self.max_bytes.is_some()
    }

    /// Check pixel geometry against the width, height, depth, and channel caps.
    pub fn check_geometry(
        &self,
        width: u32,
        height: u32,
        depth: u32,
        channels: u32,
    ) -> Result<(), LimitExceeded> {
        if let Some(max) = self.max_width
            && width > max
        {
            return Err(LimitExceeded::Width { actual: width, max });
        }
        if let Some(max) = self.max_height
            && height > max
        {
            return Err(LimitExceeded::Height {
                actual: height,
                max,
            });
        }
        if let Some(max) = self.max_depth
            && depth > max
        {
            return Err(LimitExceeded::Depth { actual: depth, max });
        }
        if let Some(max) = self.max_channels
            && channels > max
        {
            return Err(LimitExceeded::Channels {
                actual: channels,
                max,
            });
        }
        Ok(())
    }

    /// Check a buffer byte size against `max_bytes`.
    pub fn check_bytes(&self, bytes: u64) -> Result<(), LimitExceeded> {
        if let Some(max) = self.max_bytes
            && bytes > max
        {
            return Err(LimitExceeded::Bytes { actual: bytes, max });
        }
        Ok(())
    }
}

/// A layout limit was exceeded.
///
/// Each variant carries the actual value and the limit that was exceeded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LimitExceeded {
    /// Width exceeded `max_width`.
    #[error("width {actual} exceeds limit {max}")]
    Width {
        /// Actual width.
        actual: u32,
        /// Maximum allowed.
        max: u32,
    },
    /// Height exceeded `max_height`.
    #[error("height {actual} exceeds limit {max}")]
    Height {
        /// Actual height.
        actual: u32,
        /// Maximum allowed.
        max: u32,
    },
    /// Depth exceeded `max_depth`.
    #[error("depth {actual} exceeds limit {max}")]
    Depth {
        /// Actual depth.
        actual: u32,
        /// Maximum allowed.
        max: u32,
    },
    /// Channel count exceeded `max_channels`.
    #[error("channel count {actual} exceeds limit {max}")]
    Channels {
        /// Actual channel count.
        actual: u32,
        /// Maximum allowed.
        max: u32,
    },
    /// Buffer size exceeded `max_bytes`.
    #[error("buffer size {actual} bytes exceeds limit {max}")]
    Bytes {
        /// Actual size in bytes.
        actual: u64,
        /// Maximum allowed.
        max: u64,
    },
}
