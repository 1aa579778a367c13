//! Per-model panel descriptions
//!
//! Each registered model has a zero-argument constructor returning the
//! [`Panel`] the driver is built around: resolution, color planes, busy
//! polarity and the idle timeout used while waiting on BUSY.

use crate::interface::DEFAULT_BUSY_TIMEOUT_MS;

/// Color capability of a panel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelColors {
    /// Black and white, one bit plane
    BlackWhite,
    /// Black, white and red, two bit planes (black plane then red plane)
    BlackWhiteRed,
}

impl PanelColors {
    /// Number of bit planes the frame buffer needs
    pub const fn planes(self) -> usize {
        match self {
            Self::BlackWhite => 1,
            Self::BlackWhiteRed => 2,
        }
    }
}

/// Static description of a panel as produced by a model constructor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Panel {
    /// Model name used in log output
    pub name: &'static str,
    /// Native width in pixels (source outputs)
    pub width: u16,
    /// Native height in pixels (gate outputs)
    pub height: u16,
    /// Color planes
    pub colors: PanelColors,
    /// BUSY is driven low (instead of high) while the controller is busy
    pub busy_inverted: bool,
    /// Longest time to wait for BUSY to release, in milliseconds
    pub idle_timeout_ms: u32,
}

impl Panel {
    const fn new(name: &'static str, width: u16, height: u16, colors: PanelColors) -> Self {
        Self {
            name,
            width,
            height,
            colors,
            busy_inverted: false,
            idle_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    /// Bytes in one bit plane (rows are padded to whole bytes)
    pub const fn plane_size(&self) -> usize {
        (self.width as usize).div_ceil(8) * self.height as usize
    }

    /// Bytes needed for the complete frame buffer
    pub const fn buffer_size(&self) -> usize {
        self.plane_size() * self.colors.planes()
    }
}

/// HINK-E0213A09 2.13"
pub const fn e0213a09() -> Panel {
    Panel::new("E0213A09", 104, 212, PanelColors::BlackWhite)
}

/// Good Display GDEH029A1 2.9"
pub const fn gdeh029a1() -> Panel {
    Panel::new("GDEH029A1", 128, 296, PanelColors::BlackWhite)
}

/// Good Display GDEM029T94 2.9"
pub const fn gdem029t94() -> Panel {
    Panel::new("GDEM029T94", 128, 296, PanelColors::BlackWhite)
}

/// Good Display GDEW029T5D 2.9"
pub const fn gdew029t5d() -> Panel {
    Panel::new("GDEW029T5D", 128, 296, PanelColors::BlackWhite)
}

/// Good Display GDEY029Z95 2.9" three-color
pub const fn gdey029z95() -> Panel {
    Panel::new("GDEY029Z95", 128, 296, PanelColors::BlackWhiteRed)
}

/// Good Display GDEW042M01 4.2"
pub const fn gdew042m01() -> Panel {
    Panel::new("GDEW042M01", 400, 300, PanelColors::BlackWhite)
}

/// Good Display DEPG0420 4.2" three-color
pub const fn depg0420() -> Panel {
    Panel::new("DEPG0420", 400, 300, PanelColors::BlackWhiteRed)
}

/// Good Display GDEW042Z15 4.2" three-color
pub const fn gdew042z15() -> Panel {
    Panel::new("GDEW042Z15", 400, 300, PanelColors::BlackWhiteRed)
}

/// Good Display GDEY075T7 7.5"
pub const fn gdey075t7() -> Panel {
    Panel::new("GDEY075T7", 800, 480, PanelColors::BlackWhite)
}

/// Good Display GDEQ0426T82 4.26"
pub const fn gdeq0426t82() -> Panel {
    Panel {
        busy_inverted: true,
        idle_timeout_ms: 6_000,
        ..Panel::new("GDEQ0426T82", 800, 480, PanelColors::BlackWhite)
    }
}

/// P750057-MF1-A 7.5"
pub const fn p750057_mf1_a() -> Panel {
    Panel::new("P750057-MF1-A", 800, 480, PanelColors::BlackWhiteRed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_size_black_white() {
        let panel = gdey075t7();
        assert_eq!(panel.plane_size(), 800 / 8 * 480);
        assert_eq!(panel.buffer_size(), panel.plane_size());
    }

    #[test]
    fn test_buffer_size_three_color_has_two_planes() {
        let panel = gdew042z15();
        assert_eq!(panel.buffer_size(), 2 * (400 / 8) * 300);
    }

    #[test]
    fn test_plane_size_pads_partial_bytes() {
        let panel = Panel::new("odd", 122, 250, PanelColors::BlackWhite);
        assert_eq!(panel.plane_size(), 16 * 250);
    }

    #[test]
    fn test_gdeq0426t82_busy_inverted() {
        let panel = gdeq0426t82();
        assert!(panel.busy_inverted);
        assert_eq!(panel.idle_timeout_ms, 6_000);
        assert!(!gdeh029a1().busy_inverted);
    }
}
