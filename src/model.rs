//! Model registry
//!
//! A fixed table mapping model identifiers to their [`CapabilityClass`] and
//! panel constructor. Lookups are case-insensitive.
//!
//! ## Example
//!
//! ```
//! use epaper_binder::{CapabilityClass, Registry};
//!
//! let registry = Registry::builtin();
//! let entry = match registry.lookup("GDEW042Z15") {
//!     Ok(entry) => entry,
//!     Err(_) => return,
//! };
//! assert_eq!(entry.class, CapabilityClass::B);
//! assert_eq!(registry.all_model_ids().len(), 11);
//! ```

use alloc::string::ToString;
use alloc::vec::Vec;
use core::fmt;

use crate::error::ConfigError;
use crate::panel::{self, Panel};

/// Refresh capability tier of a panel family
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CapabilityClass {
    /// Timed full-refresh cadence (legacy, no constructor path)
    A,
    /// Black/white/red panels without cadence control
    B,
    /// Panels with full-refresh cadence control
    C,
}

impl CapabilityClass {
    /// Whether `full_update_every` is honored for this class
    pub const fn supports_cadence(self) -> bool {
        matches!(self, Self::A | Self::C)
    }

    /// Whether a driver can be constructed for this class
    pub const fn is_bindable(self) -> bool {
        matches!(self, Self::B | Self::C)
    }
}

impl fmt::Display for CapabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "a"),
            Self::B => write!(f, "b"),
            Self::C => write!(f, "c"),
        }
    }
}

/// Panel constructor
pub type Constructor = fn() -> Panel;

/// One registered model
#[derive(Clone, Copy, Debug)]
pub struct ModelEntry {
    /// Lower-case model identifier
    pub id: &'static str,
    /// Capability class
    pub class: CapabilityClass,
    /// Zero-argument panel factory
    pub constructor: Constructor,
}

impl ModelEntry {
    /// Create a registry entry
    pub const fn new(id: &'static str, class: CapabilityClass, constructor: Constructor) -> Self {
        Self {
            id,
            class,
            constructor,
        }
    }
}

impl PartialEq for ModelEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.class == other.class
            && core::ptr::fn_addr_eq(self.constructor, other.constructor)
    }
}

impl Eq for ModelEntry {}

/// Built-in model table
pub static MODELS: [ModelEntry; 11] = [
    ModelEntry::new("e0213a09", CapabilityClass::C, panel::e0213a09),
    ModelEntry::new("gdeh029a1", CapabilityClass::C, panel::gdeh029a1),
    ModelEntry::new("gdem029t94", CapabilityClass::C, panel::gdem029t94),
    ModelEntry::new("gdew029t5d", CapabilityClass::C, panel::gdew029t5d),
    ModelEntry::new("gdey029z95", CapabilityClass::C, panel::gdey029z95),
    ModelEntry::new("gdew042m01", CapabilityClass::C, panel::gdew042m01),
    ModelEntry::new("depg0420", CapabilityClass::C, panel::depg0420),
    ModelEntry::new("gdew042z15", CapabilityClass::B, panel::gdew042z15),
    ModelEntry::new("gdey075t7", CapabilityClass::C, panel::gdey075t7),
    ModelEntry::new("gdeq0426t82", CapabilityClass::C, panel::gdeq0426t82),
    ModelEntry::new("p750057-mf1-a", CapabilityClass::C, panel::p750057_mf1_a),
];

/// Read-only model lookup table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Registry {
    entries: &'static [ModelEntry],
}

impl Registry {
    /// Create a registry over a custom table
    ///
    /// Identifiers are expected to be lower-case and unique.
    pub const fn new(entries: &'static [ModelEntry]) -> Self {
        Self { entries }
    }

    /// The registry of all supported panels
    pub const fn builtin() -> Self {
        Self::new(&MODELS)
    }

    /// Find a model by identifier, ignoring ASCII case
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownModel`] if no entry matches.
    pub fn lookup(&self, model_id: &str) -> Result<&'static ModelEntry, ConfigError> {
        self.entries
            .iter()
            .find(|entry| entry.id.eq_ignore_ascii_case(model_id))
            .ok_or_else(|| ConfigError::UnknownModel {
                model: model_id.to_string(),
            })
    }

    /// All model identifiers, sorted lexicographically
    pub fn all_model_ids(&self) -> Vec<&'static str> {
        self.model_ids_where(|_| true)
    }

    /// Sorted identifiers of the models whose class satisfies `pred`
    pub fn model_ids_where<F>(&self, pred: F) -> Vec<&'static str>
    where
        F: Fn(CapabilityClass) -> bool,
    {
        let mut ids: Vec<&'static str> = self
            .entries
            .iter()
            .filter(|entry| pred(entry.class))
            .map(|entry| entry.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate over the entries in table order
    pub fn entries(&self) -> impl Iterator<Item = &'static ModelEntry> {
        self.entries.iter()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
