//! Device description and configuration resolver
//!
//! A [`RawConfig`] is the declarative description of one e-paper device, as
//! written by the user. [`RawConfig::resolve`] checks it against the model
//! registry and the schema, and produces a [`DeviceConfig`] ready for
//! [`bind`](crate::binder::bind).
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. `model` is present and registered
//! 2. `dc_pin` and `reset_pin` are output pins, `busy_pin` is an input pin
//! 3. `full_update_every` is in `[1, 4294967295]`
//! 4. `reset_duration` is at most 500 ms
//! 5. at most one of `pages` and `lambda` is given
//! 6. display options (`update_interval`, `rotation`) and the SPI bus
//!
//! ## Example
//!
//! ```
//! use core::time::Duration;
//! use epaper_binder::{RawConfig, Registry};
//!
//! let config = RawConfig::new()
//!     .id("epaper")
//!     .model("GDEY075T7")
//!     .dc_pin(17)
//!     .reset_pin(16)
//!     .busy_pin(4)
//!     .mosi_pin(23)
//!     .full_update_every(20)
//!     .reset_duration("2ms")
//!     .resolve(&Registry::builtin());
//! let config = match config {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! assert_eq!(config.model.id, "gdey075t7");
//! assert_eq!(config.reset_duration, Some(Duration::from_millis(2)));
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;

use log::trace;

use crate::error::ConfigError;
use crate::framebuffer::FrameBuffer;
use crate::model::{ModelEntry, Registry};
use crate::pin::{GpioPin, RawPin};
use crate::rotation::Rotation;
use crate::time::{self, RawDuration, UpdateInterval};

/// Largest accepted `reset_duration`
pub const MAX_RESET_DURATION: Duration = Duration::from_millis(500);

/// Largest accepted `full_update_every`
pub const MAX_FULL_UPDATE_EVERY: i64 = u32::MAX as i64;

/// Default SPI clock in Hz
pub const DEFAULT_DATA_RATE_HZ: u32 = 1_000_000;

/// Largest accepted SPI clock in Hz
pub const MAX_DATA_RATE_HZ: u32 = 80_000_000;

/// Identifier used when the description does not name the device
pub const DEFAULT_ID: &str = "epaper";

/// Per-frame drawing callback
///
/// Writers are plain function pointers so that configurations stay
/// comparable and `Copy`.
#[derive(Clone, Copy)]
pub struct Writer(fn(&mut FrameBuffer));

impl Writer {
    /// Wrap a drawing function
    pub const fn new(f: fn(&mut FrameBuffer)) -> Self {
        Self(f)
    }

    /// Draw into `buffer`
    pub fn call(&self, buffer: &mut FrameBuffer) {
        (self.0)(buffer);
    }
}

impl PartialEq for Writer {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::fn_addr_eq(self.0, other.0)
    }
}

impl Eq for Writer {}

impl fmt::Debug for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Writer({:p})", self.0)
    }
}

/// One page of a static page list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    /// Page identifier, unique within the list
    pub id: String,
    /// Drawing function for the page
    pub writer: Writer,
}

impl Page {
    /// Create a page
    pub fn new(id: impl Into<String>, writer: fn(&mut FrameBuffer)) -> Self {
        Self {
            id: id.into(),
            writer: Writer::new(writer),
        }
    }
}

/// How the display content is produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderStrategy {
    /// A fixed list of pages, one shown at a time
    StaticPages(Vec<Page>),
    /// One writer called on every frame
    Writer(Writer),
}

/// SPI clock polarity and phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpiMode {
    /// CPOL=0, CPHA=0
    #[default]
    Mode0,
    /// CPOL=0, CPHA=1
    Mode1,
    /// CPOL=1, CPHA=0
    Mode2,
    /// CPOL=1, CPHA=1
    Mode3,
}

impl SpiMode {
    /// Mode from its number (0-3)
    pub const fn from_number(mode: u8) -> Option<Self> {
        match mode {
            0 => Some(Self::Mode0),
            1 => Some(Self::Mode1),
            2 => Some(Self::Mode2),
            3 => Some(Self::Mode3),
            _ => None,
        }
    }
}

/// SPI device parameters as written in a description
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawBus {
    /// Data line (MOSI) GPIO number
    pub mosi_pin: Option<u8>,
    /// Clock line GPIO number
    pub clk_pin: Option<u8>,
    /// Chip select pin
    pub cs_pin: Option<RawPin>,
    /// Clock rate in Hz
    pub data_rate: Option<u32>,
    /// SPI mode number (0-3)
    pub spi_mode: Option<u8>,
}

/// Resolved SPI device parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusConfig {
    /// Data line GPIO
    pub mosi_pin: GpioPin,
    /// Clock line GPIO, owned by the bus
    pub clk_pin: Option<u8>,
    /// Chip select pin, owned by the bus
    pub cs_pin: Option<RawPin>,
    /// Clock rate in Hz
    pub data_rate_hz: u32,
    /// SPI mode
    pub mode: SpiMode,
}

/// Device description before validation
///
/// Fields can be set directly or through the builder methods.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[must_use]
pub struct RawConfig {
    /// Handle identifier
    pub id: Option<String>,
    /// Panel model identifier (case-insensitive)
    pub model: Option<String>,
    /// Data/Command pin
    pub dc_pin: Option<RawPin>,
    /// Reset pin
    pub reset_pin: Option<RawPin>,
    /// Busy pin
    pub busy_pin: Option<RawPin>,
    /// Partial refreshes between forced full refreshes
    ///
    /// Signed so that negative input is reported as out of range.
    pub full_update_every: Option<i64>,
    /// Reset pulse length (bare numbers are milliseconds)
    pub reset_duration: Option<RawDuration>,
    /// Per-frame writer
    #[cfg_attr(feature = "serde", serde(skip))]
    pub lambda: Option<Writer>,
    /// Static page list
    #[cfg_attr(feature = "serde", serde(skip))]
    pub pages: Option<Vec<Page>>,
    /// Polling interval (bare numbers are milliseconds, `"never"` disables)
    pub update_interval: Option<RawDuration>,
    /// Rotation in degrees
    pub rotation: Option<u32>,
    /// Clear the buffer before each frame
    pub auto_clear_enabled: Option<bool>,
    /// SPI device parameters
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub bus: RawBus,
}

/// Validated device configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Handle identifier
    pub id: String,
    /// Registered model
    pub model: &'static ModelEntry,
    /// Data/Command pin
    pub dc_pin: GpioPin,
    /// Reset pin
    pub reset_pin: GpioPin,
    /// Busy pin
    pub busy_pin: GpioPin,
    /// Partial refreshes between forced full refreshes
    pub full_update_every: Option<u32>,
    /// Reset pulse length
    pub reset_duration: Option<Duration>,
    /// Content source
    pub render: Option<RenderStrategy>,
    /// Polling interval
    pub update_interval: UpdateInterval,
    /// Display rotation
    pub rotation: Rotation,
    /// Clear the buffer before each frame
    pub auto_clear: bool,
    /// SPI device parameters
    pub bus: BusConfig,
}

impl RawConfig {
    /// Create an empty description
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the handle identifier
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the panel model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the Data/Command pin
    pub fn dc_pin(mut self, pin: impl Into<RawPin>) -> Self {
        self.dc_pin = Some(pin.into());
        self
    }

    /// Set the reset pin
    pub fn reset_pin(mut self, pin: impl Into<RawPin>) -> Self {
        self.reset_pin = Some(pin.into());
        self
    }

    /// Set the busy pin
    pub fn busy_pin(mut self, pin: impl Into<RawPin>) -> Self {
        self.busy_pin = Some(pin.into());
        self
    }

    /// Set the full refresh cadence
    pub fn full_update_every(mut self, every: i64) -> Self {
        self.full_update_every = Some(every);
        self
    }

    /// Set the reset pulse length
    pub fn reset_duration(mut self, duration: impl Into<RawDuration>) -> Self {
        self.reset_duration = Some(duration.into());
        self
    }

    /// Set the per-frame writer
    pub fn lambda(mut self, writer: fn(&mut FrameBuffer)) -> Self {
        self.lambda = Some(Writer::new(writer));
        self
    }

    /// Append a page to the static page list
    pub fn page(mut self, page: Page) -> Self {
        self.pages.get_or_insert_with(Vec::new).push(page);
        self
    }

    /// Replace the static page list
    pub fn pages(mut self, pages: Vec<Page>) -> Self {
        self.pages = Some(pages);
        self
    }

    /// Set the polling interval
    pub fn update_interval(mut self, interval: impl Into<RawDuration>) -> Self {
        self.update_interval = Some(interval.into());
        self
    }

    /// Set the rotation in degrees
    pub fn rotation(mut self, degrees: u32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    /// Enable or disable clearing before each frame
    pub fn auto_clear(mut self, enabled: bool) -> Self {
        self.auto_clear_enabled = Some(enabled);
        self
    }

    /// Set the SPI data line
    pub fn mosi_pin(mut self, pin: u8) -> Self {
        self.bus.mosi_pin = Some(pin);
        self
    }

    /// Set the SPI clock line
    pub fn clk_pin(mut self, pin: u8) -> Self {
        self.bus.clk_pin = Some(pin);
        self
    }

    /// Set the SPI chip select pin
    pub fn cs_pin(mut self, pin: impl Into<RawPin>) -> Self {
        self.bus.cs_pin = Some(pin.into());
        self
    }

    /// Set the SPI clock rate in Hz
    pub fn data_rate(mut self, hz: u32) -> Self {
        self.bus.data_rate = Some(hz);
        self
    }

    /// Set the SPI mode number
    pub fn spi_mode(mut self, mode: u8) -> Self {
        self.bus.spi_mode = Some(mode);
        self
    }

    /// Validate the description against `registry`
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint:
    /// - [`ConfigError::UnknownModel`] for a missing registry entry
    /// - [`ConfigError::MissingRequiredField`] for `model`, a pin, or `mosi_pin`
    /// - [`ConfigError::InvalidPin`] for a pin unusable in its role
    /// - [`ConfigError::OutOfRangeValue`] for cadence, reset duration,
    ///   rotation, SPI mode or data rate
    /// - [`ConfigError::InvalidDuration`] for unparsable durations
    /// - [`ConfigError::ConflictingRenderStrategy`] when both `pages` and `lambda` are set
    /// - [`ConfigError::EmptyPages`] / [`ConfigError::DuplicatePageId`] for a bad page list
    pub fn resolve(&self, registry: &Registry) -> Result<DeviceConfig, ConfigError> {
        let model_id = self.model.as_deref().ok_or(ConfigError::MissingRequiredField {
            field: "model",
        })?;
        let model = registry.lookup(model_id)?;
        trace!("resolving {} as model {}", self.id.as_deref().unwrap_or(DEFAULT_ID), model.id);

        let dc_pin = required(self.dc_pin, "dc_pin")?.resolve_output("dc_pin")?;
        let reset_pin = required(self.reset_pin, "reset_pin")?.resolve_output("reset_pin")?;
        let busy_pin = required(self.busy_pin, "busy_pin")?.resolve_input("busy_pin")?;

        let full_update_every = self
            .full_update_every
            .map(resolve_full_update_every)
            .transpose()?;

        let reset_duration = self
            .reset_duration
            .as_ref()
            .map(resolve_reset_duration)
            .transpose()?;

        let render = self.resolve_render()?;

        let update_interval = match &self.update_interval {
            Some(raw) => UpdateInterval::resolve(raw)
                .ok_or_else(|| invalid_duration("update_interval", raw))?,
            None => UpdateInterval::default(),
        };

        let rotation = match self.rotation {
            Some(degrees) => Rotation::from_degrees(degrees).ok_or(ConfigError::OutOfRangeValue {
                field: "rotation",
                value: i64::from(degrees),
                min: 0,
                max: 270,
            })?,
            None => Rotation::default(),
        };

        let bus = self.resolve_bus()?;

        Ok(DeviceConfig {
            id: self.id.clone().unwrap_or_else(|| DEFAULT_ID.to_string()),
            model,
            dc_pin,
            reset_pin,
            busy_pin,
            full_update_every,
            reset_duration,
            render,
            update_interval,
            rotation,
            auto_clear: self.auto_clear_enabled.unwrap_or(true),
            bus,
        })
    }

    fn resolve_render(&self) -> Result<Option<RenderStrategy>, ConfigError> {
        match (&self.pages, self.lambda) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingRenderStrategy),
            (Some(pages), None) => {
                if pages.is_empty() {
                    return Err(ConfigError::EmptyPages);
                }
                for (i, page) in pages.iter().enumerate() {
                    if pages[..i].iter().any(|other| other.id == page.id) {
                        return Err(ConfigError::DuplicatePageId {
                            id: page.id.clone(),
                        });
                    }
                }
                Ok(Some(RenderStrategy::StaticPages(pages.clone())))
            }
            (None, Some(writer)) => Ok(Some(RenderStrategy::Writer(writer))),
            (None, None) => Ok(None),
        }
    }

    fn resolve_bus(&self) -> Result<BusConfig, ConfigError> {
        let mosi = self.bus.mosi_pin.ok_or(ConfigError::MissingRequiredField {
            field: "mosi_pin",
        })?;
        let mosi_pin = RawPin::new(mosi).resolve_output("mosi_pin")?;

        let data_rate_hz = self.bus.data_rate.unwrap_or(DEFAULT_DATA_RATE_HZ);
        if data_rate_hz == 0 || data_rate_hz > MAX_DATA_RATE_HZ {
            return Err(ConfigError::OutOfRangeValue {
                field: "data_rate",
                value: i64::from(data_rate_hz),
                min: 1,
                max: i64::from(MAX_DATA_RATE_HZ),
            });
        }

        let mode = match self.bus.spi_mode {
            Some(n) => SpiMode::from_number(n).ok_or(ConfigError::OutOfRangeValue {
                field: "spi_mode",
                value: i64::from(n),
                min: 0,
                max: 3,
            })?,
            None => SpiMode::default(),
        };

        Ok(BusConfig {
            mosi_pin,
            clk_pin: self.bus.clk_pin,
            cs_pin: self.bus.cs_pin,
            data_rate_hz,
            mode,
        })
    }
}

fn required(pin: Option<RawPin>, field: &'static str) -> Result<RawPin, ConfigError> {
    pin.ok_or(ConfigError::MissingRequiredField { field })
}

fn resolve_full_update_every(every: i64) -> Result<u32, ConfigError> {
    u32::try_from(every)
        .ok()
        .filter(|every| *every >= 1)
        .ok_or(ConfigError::OutOfRangeValue {
            field: "full_update_every",
            value: every,
            min: 1,
            max: MAX_FULL_UPDATE_EVERY,
        })
}

fn resolve_reset_duration(raw: &RawDuration) -> Result<Duration, ConfigError> {
    let duration = time::resolve(raw, Duration::from_millis(1))
        .ok_or_else(|| invalid_duration("reset_duration", raw))?;
    if duration > MAX_RESET_DURATION {
        return Err(ConfigError::OutOfRangeValue {
            field: "reset_duration",
            value: millis_rounded_up(duration),
            min: 0,
            max: 500,
        });
    }
    Ok(duration)
}

fn millis_rounded_up(duration: Duration) -> i64 {
    let partial = duration.subsec_nanos() % 1_000_000 != 0;
    let millis = duration.as_millis() + u128::from(partial);
    i64::try_from(millis).unwrap_or(i64::MAX)
}

fn invalid_duration(field: &'static str, raw: &RawDuration) -> ConfigError {
    let value = match raw {
        RawDuration::Value(d) => alloc::format!("{d:?}"),
        RawDuration::Number(n) => n.to_string(),
        RawDuration::Text(text) => text.clone(),
    };
    ConfigError::InvalidDuration { field, value }
}
