//! Display buffer registered on a driver handle
//!
//! A [`FrameBuffer`] is allocated for the bound panel and handed to writers.
//! Black/white panels get one bit plane, three-color panels two: the
//! black/white plane followed by the red plane.
//!
//! | Color | BW plane | RED plane |
//! |-------|----------|-----------|
//! | Black | 0        | 0         |
//! | White | 1        | 0         |
//! | Red   | 1        | 1         |
//!
//! With the `graphics` feature the buffer implements
//! [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget).
//!
//! ## Example
//!
//! ```
//! use epaper_binder::framebuffer::{Color, FrameBuffer};
//! use epaper_binder::{panel, Rotation};
//!
//! let mut fb = FrameBuffer::new(&panel::gdew042z15(), Rotation::Rotate0);
//! fb.set_pixel(0, 0, Color::Red);
//! assert_eq!(fb.pixel(0, 0), Some(Color::Red));
//! assert_eq!(fb.black_plane()[0], 0xFF);
//! assert_eq!(fb.red_plane().map(|plane| plane[0]), Some(0x80));
//! ```

use alloc::vec;
use alloc::vec::Vec;

use crate::panel::{Panel, PanelColors};
use crate::rotation::Rotation;

/// Pixel colors a panel can show
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Color {
    /// Black pixels
    Black,
    /// White pixels
    White,
    /// Red pixels (three-color panels; drawn black elsewhere)
    Red,
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU8;
}

impl Color {
    /// Fill byte for the black/white plane
    pub const fn bw_byte(self) -> u8 {
        match self {
            Self::Black => 0x00,
            Self::White | Self::Red => 0xFF,
        }
    }

    /// Fill byte for the red plane
    pub const fn red_byte(self) -> u8 {
        match self {
            Self::Black | Self::White => 0x00,
            Self::Red => 0xFF,
        }
    }
}

/// Bit-packed pixel buffer for one panel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    colors: PanelColors,
    rotation: Rotation,
    bytes: Vec<u8>,
}

impl FrameBuffer {
    /// Allocate a white buffer sized for `panel`
    pub fn new(panel: &Panel, rotation: Rotation) -> Self {
        let mut fb = Self {
            width: u32::from(panel.width),
            height: u32::from(panel.height),
            colors: panel.colors,
            rotation,
            bytes: vec![0; panel.buffer_size()],
        };
        fb.clear(Color::White);
        fb
    }

    /// Logical width after rotation
    pub const fn width(&self) -> u32 {
        self.rotation.logical_size(self.width, self.height).0
    }

    /// Logical height after rotation
    pub const fn height(&self) -> u32 {
        self.rotation.logical_size(self.width, self.height).1
    }

    /// Rotation applied to writer coordinates
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    fn row_bytes(&self) -> usize {
        self.width.div_ceil(8) as usize
    }

    fn plane_size(&self) -> usize {
        self.row_bytes() * self.height as usize
    }

    /// Locate the byte and mask for a logical pixel
    fn locate(&self, x: u32, y: u32) -> Option<(usize, u8)> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let (px, py) = self.rotation.to_physical(x, y, self.width, self.height);
        let index = py as usize * self.row_bytes() + (px / 8) as usize;
        Some((index, 0x80 >> (px % 8)))
    }

    /// Set one pixel; coordinates outside the buffer are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let Some((index, bit)) = self.locate(x, y) else {
            return;
        };
        let red_index = index + self.plane_size();

        match (color, self.colors) {
            (Color::White, _) => self.bytes[index] |= bit,
            (Color::Black, _) | (Color::Red, PanelColors::BlackWhite) => {
                self.bytes[index] &= !bit;
            }
            (Color::Red, PanelColors::BlackWhiteRed) => self.bytes[index] |= bit,
        }
        if self.colors == PanelColors::BlackWhiteRed {
            if color == Color::Red {
                self.bytes[red_index] |= bit;
            } else {
                self.bytes[red_index] &= !bit;
            }
        }
    }

    /// Read back one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let (index, bit) = self.locate(x, y)?;
        let red = self
            .red_plane()
            .is_some_and(|plane| plane[index] & bit != 0);
        Some(if red {
            Color::Red
        } else if self.bytes[index] & bit != 0 {
            Color::White
        } else {
            Color::Black
        })
    }

    /// Fill the whole buffer with one color
    pub fn clear(&mut self, color: Color) {
        let plane = self.plane_size();
        let bw = match (color, self.colors) {
            (Color::Red, PanelColors::BlackWhite) => Color::Black.bw_byte(),
            _ => color.bw_byte(),
        };
        self.bytes[..plane].fill(bw);
        self.bytes[plane..].fill(color.red_byte());
    }

    /// Black/white plane
    pub fn black_plane(&self) -> &[u8] {
        &self.bytes[..self.plane_size()]
    }

    /// Red plane, for three-color panels
    pub fn red_plane(&self) -> Option<&[u8]> {
        match self.colors {
            PanelColors::BlackWhite => None,
            PanelColors::BlackWhiteRed => Some(&self.bytes[self.plane_size()..]),
        }
    }

    /// Raw buffer as sent to the controller
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(feature = "graphics")]
mod draw {
    use core::convert::Infallible;
    use embedded_graphics_core::{
        draw_target::DrawTarget,
        geometry::{OriginDimensions, Point, Size},
        prelude::Pixel,
    };

    use super::{Color, FrameBuffer};

    impl DrawTarget for FrameBuffer {
        type Color = Color;
        type Error = Infallible;

        fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
        where
            Iter: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(Point { x, y }, color) in pixels {
                let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
                    continue;
                };
                self.set_pixel(x, y, color);
            }
            Ok(())
        }

        fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
            FrameBuffer::clear(self, color);
            Ok(())
        }
    }

    impl OriginDimensions for FrameBuffer {
        fn size(&self) -> Size {
            Size::new(self.width(), self.height())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel;

    #[test]
    fn test_new_buffer_is_white() {
        let fb = FrameBuffer::new(&panel::gdeh029a1(), Rotation::Rotate0);
        assert!(fb.black_plane().iter().all(|byte| *byte == 0xFF));
        assert_eq!(fb.red_plane(), None);
        assert_eq!(fb.as_bytes().len(), 128 / 8 * 296);
    }

    #[test]
    fn test_set_pixel_msb_first() {
        let mut fb = FrameBuffer::new(&panel::gdeh029a1(), Rotation::Rotate0);
        fb.set_pixel(1, 0, Color::Black);
        assert_eq!(fb.black_plane()[0], 0xBF);
        fb.set_pixel(0, 1, Color::Black);
        assert_eq!(fb.black_plane()[16], 0x7F);
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut fb = FrameBuffer::new(&panel::gdeh029a1(), Rotation::Rotate0);
        let before = fb.clone();
        fb.set_pixel(128, 0, Color::Black);
        fb.set_pixel(0, 296, Color::Black);
        assert_eq!(fb, before);
        assert_eq!(fb.pixel(128, 0), None);
    }

    #[test]
    fn test_rotated_dimensions_swap() {
        let fb = FrameBuffer::new(&panel::gdew042m01(), Rotation::Rotate90);
        assert_eq!((fb.width(), fb.height()), (300, 400));
    }

    #[test]
    fn test_rotated_pixel_lands_on_native_position() {
        let mut fb = FrameBuffer::new(&panel::gdeh029a1(), Rotation::Rotate90);
        fb.set_pixel(0, 0, Color::Black);
        // Native (127, 0): last byte of the first row, LSB
        assert_eq!(fb.black_plane()[15], 0xFE);
    }

    #[test]
    fn test_red_on_black_white_panel_is_black() {
        let mut fb = FrameBuffer::new(&panel::gdey075t7(), Rotation::Rotate0);
        fb.set_pixel(0, 0, Color::Red);
        assert_eq!(fb.pixel(0, 0), Some(Color::Black));
        fb.clear(Color::Red);
        assert!(fb.black_plane().iter().all(|byte| *byte == 0x00));
    }

    #[test]
    fn test_three_color_clear_and_overwrite() {
        let mut fb = FrameBuffer::new(&panel::depg0420(), Rotation::Rotate0);
        fb.clear(Color::Red);
        assert_eq!(fb.pixel(10, 10), Some(Color::Red));
        fb.set_pixel(10, 10, Color::Black);
        assert_eq!(fb.pixel(10, 10), Some(Color::Black));
        fb.set_pixel(10, 10, Color::White);
        assert_eq!(fb.pixel(10, 10), Some(Color::White));
    }

    #[test]
    fn test_color_bytes() {
        assert_eq!(Color::Black.bw_byte(), 0x00);
        assert_eq!(Color::White.bw_byte(), 0xFF);
        assert_eq!(Color::Red.bw_byte(), 0xFF);
        assert_eq!(Color::Red.red_byte(), 0xFF);
        assert_eq!(Color::White.red_byte(), 0x00);
    }
}
