//! Display rotation
//!
//! Rotation is part of the display description and is applied when writers
//! draw into the [`FrameBuffer`](crate::framebuffer::FrameBuffer): logical
//! coordinates are mapped onto the panel's native (physical) orientation.
//!
//! ## Example
//!
//! ```
//! use epaper_binder::Rotation;
//!
//! // 8x16 panel rotated by 90°: logical (0, 0) is the native top-right pixel
//! assert_eq!(Rotation::Rotate90.to_physical(0, 0, 8, 16), (7, 0));
//! assert_eq!(Rotation::from_degrees(270), Some(Rotation::Rotate270));
//! assert_eq!(Rotation::from_degrees(45), None);
//! ```

/// Display rotation relative to native orientation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

impl Rotation {
    /// Rotation for a whole number of degrees
    ///
    /// Only 0, 90, 180 and 270 are accepted.
    pub const fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            0 => Some(Self::Rotate0),
            90 => Some(Self::Rotate90),
            180 => Some(Self::Rotate180),
            270 => Some(Self::Rotate270),
            _ => None,
        }
    }

    /// Rotation in degrees
    pub const fn degrees(self) -> u32 {
        match self {
            Self::Rotate0 => 0,
            Self::Rotate90 => 90,
            Self::Rotate180 => 180,
            Self::Rotate270 => 270,
        }
    }

    /// Whether width and height swap
    pub const fn is_transposed(self) -> bool {
        matches!(self, Self::Rotate90 | Self::Rotate270)
    }

    /// Logical size for a panel of the given native size
    pub const fn logical_size(self, width: u32, height: u32) -> (u32, u32) {
        if self.is_transposed() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Map logical coordinates to native panel coordinates
    ///
    /// `width` and `height` are the native dimensions. Coordinates must lie
    /// inside the logical area.
    pub const fn to_physical(self, x: u32, y: u32, width: u32, height: u32) -> (u32, u32) {
        match self {
            Self::Rotate0 => (x, y),
            Self::Rotate90 => (width - 1 - y, x),
            Self::Rotate180 => (width - 1 - x, height - 1 - y),
            Self::Rotate270 => (y, height - 1 - x),
        }
    }
}
