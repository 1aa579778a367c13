//! Capability validation
//!
//! Some options are only honored by certain panel families. Using them on
//! another family is not an error: the configuration is accepted and an
//! [`Advisory`] is produced for the operator.
//!
//! Validation is pure. Advisories are handed to a [`Diagnostics`] sink chosen
//! by the caller; [`LogDiagnostics`] forwards them to the `log` facade.
//!
//! ## Example
//!
//! ```
//! use epaper_binder::validate::{validate_cadence_option, ValidationOutcome};
//! use epaper_binder::Registry;
//!
//! let registry = Registry::builtin();
//! let outcome = validate_cadence_option(&registry, "gdew042z15", true);
//! assert!(matches!(outcome, Ok(ValidationOutcome::OkWithAdvisory(_))));
//!
//! let outcome = validate_cadence_option(&registry, "gdey075t7", true);
//! assert_eq!(outcome, Ok(ValidationOutcome::Ok));
//! ```

use alloc::vec::Vec;
use core::fmt;

use log::warn;

use crate::config::DeviceConfig;
use crate::error::ConfigError;
use crate::model::{CapabilityClass, Registry};

/// Non-fatal finding about an accepted configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advisory {
    /// `full_update_every` was set on a model that does not honor it
    Cadence {
        /// Model the option was set on
        model: &'static str,
        /// Sorted identifiers of the models that honor the option
        supported: Vec<&'static str>,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cadence { model, supported } => {
                write!(
                    f,
                    "The 'full_update_every' option is only officially supported for models: "
                )?;
                for (i, id) in supported.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{id}")?;
                }
                write!(
                    f,
                    ". For model {model}, this setting may not work as expected."
                )
            }
        }
    }
}

/// Result of a validation pass
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Nothing to report
    Ok,
    /// Accepted, with a finding for the operator
    OkWithAdvisory(Advisory),
}

impl ValidationOutcome {
    /// The advisory, if any
    pub const fn advisory(&self) -> Option<&Advisory> {
        match self {
            Self::Ok => None,
            Self::OkWithAdvisory(advisory) => Some(advisory),
        }
    }

    /// Hand the advisory, if any, to `sink`
    pub fn report<D: Diagnostics + ?Sized>(&self, sink: &mut D) {
        if let Some(advisory) = self.advisory() {
            sink.advisory(advisory);
        }
    }
}

/// Receiver for advisories
pub trait Diagnostics {
    /// Record one advisory
    fn advisory(&mut self, advisory: &Advisory);
}

/// Sink that emits advisories as `log` warnings
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn advisory(&mut self, advisory: &Advisory) {
        warn!("{advisory}");
    }
}

impl Diagnostics for Vec<Advisory> {
    fn advisory(&mut self, advisory: &Advisory) {
        self.push(advisory.clone());
    }
}

/// Sink that drops advisories
impl Diagnostics for () {
    fn advisory(&mut self, _advisory: &Advisory) {}
}

/// Check whether a cadence option fits the model's capability class
///
/// Without a cadence option the registry is not consulted.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownModel`] if `has_cadence_option` is set and
/// the model is not registered.
pub fn validate_cadence_option(
    registry: &Registry,
    model_id: &str,
    has_cadence_option: bool,
) -> Result<ValidationOutcome, ConfigError> {
    if !has_cadence_option {
        return Ok(ValidationOutcome::Ok);
    }

    let entry = registry.lookup(model_id)?;
    if entry.class != CapabilityClass::B {
        return Ok(ValidationOutcome::Ok);
    }

    Ok(ValidationOutcome::OkWithAdvisory(Advisory::Cadence {
        model: entry.id,
        supported: registry.model_ids_where(|class| class != CapabilityClass::B),
    }))
}

/// Run all capability checks on a resolved configuration
///
/// # Errors
///
/// Returns [`ConfigError::UnknownModel`] if `config` was resolved against a
/// registry that does not contain its model.
pub fn validate(
    registry: &Registry,
    config: &DeviceConfig,
) -> Result<ValidationOutcome, ConfigError> {
    validate_cadence_option(registry, config.model.id, config.full_update_every.is_some())
}
