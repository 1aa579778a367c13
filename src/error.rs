//! Error types for configuration resolving and driver binding
//!
//! This module defines the errors produced while resolving a raw device
//! description ([`ConfigError`]), while binding a resolved configuration to a
//! driver ([`BindError`]), and the umbrella [`Error`] returned by
//! [`configure`](crate::binder::configure).
//!
//! ## Error Types
//!
//! - [`ConfigError`] - Schema and cross-field violations, unknown models
//! - [`BindError`] - Registry/constructor mismatches found at bind time
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//!
//! Advisories are not errors; see [`Advisory`](crate::validate::Advisory).
//!
//! ## Example
//!
//! ```
//! use epaper_binder::{ConfigError, RawConfig, Registry};
//!
//! let result = RawConfig::new().id("epaper").model("gdew999").resolve(&Registry::builtin());
//! assert!(matches!(result, Err(ConfigError::UnknownModel { .. })));
//! ```

use alloc::string::String;
use core::fmt;

use crate::model::CapabilityClass;

/// Errors that can occur while resolving a raw configuration
///
/// The resolver is fail-fast: only the first violated constraint is reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The model identifier is not present in the registry
    UnknownModel {
        /// Model identifier as given
        model: String,
    },
    /// A required field was not provided
    MissingRequiredField {
        /// Name of the missing field
        field: &'static str,
    },
    /// A numeric value lies outside its allowed range
    ///
    /// Bounds are inclusive. Durations are reported in milliseconds, rounded up.
    OutOfRangeValue {
        /// Name of the offending field
        field: &'static str,
        /// Value provided
        value: i64,
        /// Smallest allowed value
        min: i64,
        /// Largest allowed value
        max: i64,
    },
    /// A GPIO specification cannot be used for the requested role
    InvalidPin {
        /// Name of the pin field
        field: &'static str,
        /// GPIO number
        number: u8,
        /// What is wrong with the pin
        reason: PinFault,
    },
    /// A duration string could not be parsed
    InvalidDuration {
        /// Name of the offending field
        field: &'static str,
        /// The text that failed to parse
        value: String,
    },
    /// Both a static page list and a per-frame writer were given
    ConflictingRenderStrategy,
    /// A static page list was given but contains no pages
    EmptyPages,
    /// Two pages share the same identifier
    DuplicatePageId {
        /// The repeated page identifier
        id: String,
    },
}

/// Reason a GPIO specification was rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinFault {
    /// Pin number exceeds [`MAX_GPIO_NUMBER`](crate::pin::MAX_GPIO_NUMBER)
    NumberOutOfRange,
    /// Pin is configured as an input but the role needs an output
    NotOutputCapable,
    /// Pin is configured as an output but the role needs an input
    NotInputCapable,
}

impl fmt::Display for PinFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumberOutOfRange => write!(f, "pin number out of range"),
            Self::NotOutputCapable => write!(f, "pin is not output capable"),
            Self::NotInputCapable => write!(f, "pin is not input capable"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownModel { model } => write!(f, "Unknown model '{model}'"),
            Self::MissingRequiredField { field } => {
                write!(f, "Required field '{field}' is missing")
            }
            Self::OutOfRangeValue {
                field,
                value,
                min,
                max,
            } => write!(
                f,
                "Value {value} for '{field}' is out of range (must be in [{min}, {max}])"
            ),
            Self::InvalidPin {
                field,
                number,
                reason,
            } => write!(f, "Invalid pin GPIO{number} for '{field}': {reason}"),
            Self::InvalidDuration { field, value } => {
                write!(f, "Invalid duration '{value}' for '{field}'")
            }
            Self::ConflictingRenderStrategy => {
                write!(f, "Only one of 'pages' or 'lambda' may be specified")
            }
            Self::EmptyPages => write!(f, "'pages' must contain at least one page"),
            Self::DuplicatePageId { id } => write!(f, "Duplicate page id '{id}'"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Errors that can occur when binding a resolved configuration to a driver
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindError {
    /// The model's capability class has no constructor path
    ///
    /// Only classes [`B`](CapabilityClass::B) and [`C`](CapabilityClass::C)
    /// can be bound.
    UnsupportedCapabilityClass {
        /// Model identifier
        model: &'static str,
        /// Class found in the registry
        class: CapabilityClass,
    },
    /// The configuration names a model the binding registry does not know
    ///
    /// Happens when a configuration resolved against one registry is bound
    /// against another.
    UnknownModel {
        /// Model identifier
        model: &'static str,
    },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedCapabilityClass { model, class } => write!(
                f,
                "Model '{model}' has capability class {class}, which has no driver constructor"
            ),
            Self::UnknownModel { model } => write!(f, "Model '{model}' is not registered"),
        }
    }
}

impl core::error::Error for BindError {}

/// Any error produced by the configure pipeline
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Configuration could not be resolved
    Config(ConfigError),
    /// Configuration could not be bound
    Bind(BindError),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<BindError> for Error {
    fn from(err: BindError) -> Self {
        Self::Bind(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Bind(e) => write!(f, "Bind error: {e}"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Bind(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_out_of_range_message_names_bounds() {
        let err = ConfigError::OutOfRangeValue {
            field: "reset_duration",
            value: 501,
            min: 0,
            max: 500,
        };
        assert_eq!(
            err.to_string(),
            "Value 501 for 'reset_duration' is out of range (must be in [0, 500])"
        );
    }

    #[test]
    fn test_unsupported_class_message() {
        let err = BindError::UnsupportedCapabilityClass {
            model: "legacy",
            class: CapabilityClass::A,
        };
        assert!(err.to_string().contains("capability class a"));
    }

    #[test]
    fn test_error_from_config_error() {
        let err: Error = ConfigError::ConflictingRenderStrategy.into();
        assert_eq!(err, Error::Config(ConfigError::ConflictingRenderStrategy));
        assert!(core::error::Error::source(&err).is_some());
    }
}
