//! GPIO pin specifications
//!
//! A [`RawPin`] is what the device description provides; resolving it for a
//! role (output or input) yields a validated [`GpioPin`].
//!
//! The panel needs three GPIO pins:
//! - **DC**: Data/Command select (output)
//! - **RST**: Reset (output, active low)
//! - **BUSY**: Busy status (input)

use crate::error::{ConfigError, PinFault};

/// Highest GPIO number accepted in a pin specification
pub const MAX_GPIO_NUMBER: u8 = 48;

/// Electrical mode requested for a pin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PinMode {
    /// Push-pull output
    Output,
    /// Floating input
    Input,
    /// Input with internal pull-up
    InputPullUp,
    /// Input with internal pull-down
    InputPullDown,
}

impl PinMode {
    /// Whether the pin can drive a level
    pub const fn is_output(self) -> bool {
        matches!(self, Self::Output)
    }

    /// Whether the pin can read a level
    pub const fn is_input(self) -> bool {
        !self.is_output()
    }
}

/// Pin specification as written in a device description
///
/// `mode` may be omitted, in which case the role decides it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct RawPin {
    /// GPIO number
    pub number: u8,
    /// Logical level is inverted
    #[cfg_attr(feature = "serde", serde(default))]
    pub inverted: bool,
    /// Requested electrical mode
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode: Option<PinMode>,
}

impl RawPin {
    /// Pin with default mode and no inversion
    pub const fn new(number: u8) -> Self {
        Self {
            number,
            inverted: false,
            mode: None,
        }
    }

    /// Mark the pin as inverted
    #[must_use]
    pub const fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    /// Request an explicit mode
    #[must_use]
    pub const fn with_mode(mut self, mode: PinMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Validate as an output pin
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPin`] if the number is out of range or
    /// the requested mode is an input mode.
    pub fn resolve_output(&self, field: &'static str) -> Result<GpioPin, ConfigError> {
        self.resolve(field, PinMode::Output)
    }

    /// Validate as an input pin
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPin`] if the number is out of range or
    /// the requested mode is an output mode.
    pub fn resolve_input(&self, field: &'static str) -> Result<GpioPin, ConfigError> {
        self.resolve(field, PinMode::Input)
    }

    fn resolve(&self, field: &'static str, role: PinMode) -> Result<GpioPin, ConfigError> {
        let fault = |reason| ConfigError::InvalidPin {
            field,
            number: self.number,
            reason,
        };

        if self.number > MAX_GPIO_NUMBER {
            return Err(fault(PinFault::NumberOutOfRange));
        }
        let mode = self.mode.unwrap_or(role);
        if role.is_output() && !mode.is_output() {
            return Err(fault(PinFault::NotOutputCapable));
        }
        if role.is_input() && !mode.is_input() {
            return Err(fault(PinFault::NotInputCapable));
        }

        Ok(GpioPin {
            number: self.number,
            inverted: self.inverted,
            mode,
        })
    }
}

impl From<u8> for RawPin {
    fn from(number: u8) -> Self {
        Self::new(number)
    }
}

/// Validated GPIO pin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GpioPin {
    /// GPIO number
    pub number: u8,
    /// Logical level is inverted
    pub inverted: bool,
    /// Electrical mode
    pub mode: PinMode,
}

impl core::fmt::Display for GpioPin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "GPIO{}", self.number)?;
        if self.inverted {
            write!(f, " (inverted)")?;
        }
        Ok(())
    }
}
