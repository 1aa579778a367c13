//! Driver binding
//!
//! [`bind`] turns a resolved [`DeviceConfig`] into a wired [`DriverHandle`]:
//! the panel constructor for the model is called, then the display buffer,
//! bus device, pins, writer, cadence and reset timing are attached in a fixed
//! order. [`configure`] runs the whole pipeline from a [`RawConfig`].
//!
//! The handle is returned by value and nothing is retained by the binder.
//!
//! ## Example
//!
//! ```
//! use epaper_binder::{configure, Attachment, LogDiagnostics, RawConfig, Registry};
//!
//! let raw = RawConfig::new()
//!     .model("gdew042z15")
//!     .dc_pin(17)
//!     .reset_pin(16)
//!     .busy_pin(4)
//!     .mosi_pin(23)
//!     .full_update_every(5);
//!
//! let handle = match configure(&raw, &Registry::builtin(), &mut LogDiagnostics) {
//!     Ok(handle) => handle,
//!     Err(_) => return,
//! };
//! // Three-color panels ignore the cadence
//! assert_eq!(handle.full_update_every(), None);
//! assert!(!handle.attachments().contains(&Attachment::FullUpdateEvery));
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use log::{debug, info};

use crate::config::{BusConfig, DeviceConfig, Page, RawConfig, RenderStrategy, Writer};
use crate::error::{BindError, Error};
use crate::framebuffer::{Color, FrameBuffer};
use crate::interface::{DEFAULT_RESET_DURATION_MS, Interface};
use crate::model::{CapabilityClass, ModelEntry, Registry};
use crate::panel::Panel;
use crate::pin::GpioPin;
use crate::rotation::Rotation;
use crate::time::UpdateInterval;
use crate::validate::{self, Diagnostics};

/// Refreshes between full refreshes when no cadence is attached
pub const DEFAULT_FULL_UPDATE_EVERY: u32 = 30;

/// Kind of refresh the panel should perform next
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RefreshMode {
    /// Full refresh (slow, clears ghosting)
    #[default]
    Full,
    /// Fast partial refresh
    Fast,
}

/// Wiring step applied to a handle, in application order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attachment {
    /// Display buffer, rotation, interval and pages registered
    Display,
    /// SPI device registered
    Bus,
    /// DC pin set
    DcPin,
    /// Writer set
    Writer,
    /// Reset pin set
    ResetPin,
    /// Busy pin set
    BusyPin,
    /// Full refresh cadence set
    FullUpdateEvery,
    /// Reset pulse length set
    ResetDuration,
}

/// Display-level settings registered with the frame buffer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplaySettings {
    /// Rotation applied to writer coordinates
    pub rotation: Rotation,
    /// Polling interval
    pub update_interval: UpdateInterval,
    /// Clear the buffer before each frame
    pub auto_clear: bool,
    /// Static page list (empty when not paged)
    pub pages: Vec<Page>,
}

/// A constructed and wired panel driver
///
/// Owned by the caller once [`bind`] returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverHandle {
    id: String,
    model: &'static str,
    class: CapabilityClass,
    panel: Panel,
    buffer: FrameBuffer,
    update_interval: UpdateInterval,
    auto_clear: bool,
    pages: Vec<Page>,
    page_index: usize,
    bus: Option<BusConfig>,
    dc_pin: Option<GpioPin>,
    reset_pin: Option<GpioPin>,
    busy_pin: Option<GpioPin>,
    writer: Option<Writer>,
    full_update_every: Option<u32>,
    reset_duration: Option<Duration>,
    /// Refreshes since the last full refresh
    at_update: u32,
    attachments: Vec<Attachment>,
}

impl DriverHandle {
    fn new(id: String, entry: &ModelEntry, panel: Panel) -> Self {
        Self {
            id,
            model: entry.id,
            class: entry.class,
            buffer: FrameBuffer::new(&panel, Rotation::Rotate0),
            panel,
            update_interval: UpdateInterval::default(),
            auto_clear: true,
            pages: Vec::new(),
            page_index: 0,
            bus: None,
            dc_pin: None,
            reset_pin: None,
            busy_pin: None,
            writer: None,
            full_update_every: None,
            reset_duration: None,
            at_update: 0,
            attachments: Vec::new(),
        }
    }

    /// Register the display buffer and display-level settings
    pub fn register_display(&mut self, settings: DisplaySettings) {
        self.buffer = FrameBuffer::new(&self.panel, settings.rotation);
        self.update_interval = settings.update_interval;
        self.auto_clear = settings.auto_clear;
        self.pages = settings.pages;
        self.page_index = 0;
        self.attachments.push(Attachment::Display);
    }

    /// Register the SPI device
    pub fn register_bus(&mut self, bus: BusConfig) {
        self.bus = Some(bus);
        self.attachments.push(Attachment::Bus);
    }

    /// Set the Data/Command pin
    pub fn set_dc_pin(&mut self, pin: GpioPin) {
        self.dc_pin = Some(pin);
        self.attachments.push(Attachment::DcPin);
    }

    /// Set the reset pin
    pub fn set_reset_pin(&mut self, pin: GpioPin) {
        self.reset_pin = Some(pin);
        self.attachments.push(Attachment::ResetPin);
    }

    /// Set the busy pin
    pub fn set_busy_pin(&mut self, pin: GpioPin) {
        self.busy_pin = Some(pin);
        self.attachments.push(Attachment::BusyPin);
    }

    /// Set the per-frame writer
    pub fn set_writer(&mut self, writer: Writer) {
        self.writer = Some(writer);
        self.attachments.push(Attachment::Writer);
    }

    /// Set the number of refreshes between full refreshes
    ///
    /// Zero is treated as one (every refresh is full). The counter restarts,
    /// so the next refresh is full.
    pub fn set_full_update_every(&mut self, every: u32) {
        self.full_update_every = Some(every.max(1));
        self.at_update = 0;
        self.attachments.push(Attachment::FullUpdateEvery);
    }

    /// Set how long the reset line is held low
    pub fn set_reset_duration(&mut self, duration: Duration) {
        self.reset_duration = Some(duration);
        self.attachments.push(Attachment::ResetDuration);
    }

    /// Handle identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Model identifier
    pub const fn model(&self) -> &'static str {
        self.model
    }

    /// Capability class of the model
    pub const fn capability_class(&self) -> CapabilityClass {
        self.class
    }

    /// Panel produced by the model constructor
    pub const fn panel(&self) -> &Panel {
        &self.panel
    }

    /// Registered display buffer
    pub const fn frame_buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Mutable access to the display buffer
    pub const fn frame_buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.buffer
    }

    /// Polling interval
    pub const fn update_interval(&self) -> UpdateInterval {
        self.update_interval
    }

    /// Whether the buffer is cleared before each frame
    pub const fn auto_clear(&self) -> bool {
        self.auto_clear
    }

    /// Registered SPI device
    pub const fn bus(&self) -> Option<&BusConfig> {
        self.bus.as_ref()
    }

    /// Data/Command pin
    pub const fn dc_pin(&self) -> Option<GpioPin> {
        self.dc_pin
    }

    /// Reset pin
    pub const fn reset_pin(&self) -> Option<GpioPin> {
        self.reset_pin
    }

    /// Busy pin
    pub const fn busy_pin(&self) -> Option<GpioPin> {
        self.busy_pin
    }

    /// Per-frame writer
    pub const fn writer(&self) -> Option<Writer> {
        self.writer
    }

    /// Attached full refresh cadence
    pub const fn full_update_every(&self) -> Option<u32> {
        self.full_update_every
    }

    /// Attached reset pulse length
    pub const fn reset_duration(&self) -> Option<Duration> {
        self.reset_duration
    }

    /// Wiring steps applied so far, in order
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Decide the next refresh and advance the cadence counter
    ///
    /// A full refresh happens when the counter is zero; the counter wraps at
    /// the attached cadence ([`DEFAULT_FULL_UPDATE_EVERY`] when none is
    /// attached). Models without cadence support always refresh fully.
    pub fn next_refresh(&mut self) -> RefreshMode {
        if !self.class.supports_cadence() {
            return RefreshMode::Full;
        }
        let every = self.full_update_every.unwrap_or(DEFAULT_FULL_UPDATE_EVERY);
        let mode = if self.at_update == 0 {
            RefreshMode::Full
        } else {
            RefreshMode::Fast
        };
        self.at_update = (self.at_update + 1) % every;
        mode
    }

    /// Make the next refresh a full one
    pub const fn force_full_refresh(&mut self) {
        self.at_update = 0;
    }

    /// Draw the next frame into the buffer
    ///
    /// Clears to white first when auto-clear is enabled, then runs the writer
    /// or the current page.
    pub fn render(&mut self) {
        if self.auto_clear {
            self.buffer.clear(Color::White);
        }
        let writer = self
            .writer
            .or_else(|| self.pages.get(self.page_index).map(|page| page.writer));
        if let Some(writer) = writer {
            writer.call(&mut self.buffer);
        }
    }

    /// Identifier of the page shown by [`render`](Self::render)
    pub fn current_page(&self) -> Option<&str> {
        self.pages.get(self.page_index).map(|page| page.id.as_str())
    }

    /// Switch to the page named `id`
    ///
    /// Returns false if there is no such page.
    pub fn show_page(&mut self, id: &str) -> bool {
        match self.pages.iter().position(|page| page.id == id) {
            Some(index) => {
                self.page_index = index;
                true
            }
            None => false,
        }
    }

    /// Advance to the next page, wrapping around
    pub fn next_page(&mut self) {
        if !self.pages.is_empty() {
            self.page_index = (self.page_index + 1) % self.pages.len();
        }
    }

    /// Go back to the previous page, wrapping around
    pub fn previous_page(&mut self) {
        if !self.pages.is_empty() {
            self.page_index = (self.page_index + self.pages.len() - 1) % self.pages.len();
        }
    }

    /// BUSY level meaning "busy", after panel and pin inversion
    pub fn busy_active_high(&self) -> bool {
        let pin_inverted = self.busy_pin.is_some_and(|pin| pin.inverted);
        self.panel.busy_inverted == pin_inverted
    }

    /// Wrap hardware resources in an [`Interface`] configured for this handle
    ///
    /// Busy polarity, reset pulse length and busy timeout come from the
    /// panel and the attached options.
    pub fn interface<SPI, DC, RST, BUSY>(
        &self,
        spi: SPI,
        dc: DC,
        rst: RST,
        busy: BUSY,
    ) -> Interface<SPI, DC, RST, BUSY>
    where
        SPI: SpiDevice,
        DC: OutputPin,
        RST: OutputPin,
        BUSY: InputPin,
    {
        let reset_ms = self.reset_duration.map_or(DEFAULT_RESET_DURATION_MS, |d| {
            u32::try_from(d.as_millis()).unwrap_or(u32::MAX)
        });
        let mut interface = Interface::new(spi, dc, rst, busy);
        interface
            .set_busy_active_high(self.busy_active_high())
            .set_busy_timeout(self.panel.idle_timeout_ms)
            .set_reset_duration_ms(reset_ms);
        interface
    }

    /// Emit the handle's configuration at `info` level
    pub fn log_config(&self) {
        info!("{self}");
    }
}

impl fmt::Display for DriverHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "E-Paper '{}'", self.id)?;
        writeln!(f, "  Model: {}", self.panel.name)?;
        writeln!(f, "  Resolution: {}x{}", self.panel.width, self.panel.height)?;
        if let Some(cs) = self.bus.and_then(|bus| bus.cs_pin) {
            writeln!(f, "  CS Pin: GPIO{}", cs.number)?;
        }
        for (label, pin) in [
            ("Reset Pin", self.reset_pin),
            ("DC Pin", self.dc_pin),
            ("Busy Pin", self.busy_pin),
        ] {
            if let Some(pin) = pin {
                writeln!(f, "  {label}: {pin}")?;
            }
        }
        if let Some(every) = self.full_update_every {
            writeln!(f, "  Full Update Every: {every}")?;
        }
        match self.update_interval.period() {
            Some(period) => write!(f, "  Update Interval: {}ms", period.as_millis()),
            None => write!(f, "  Update Interval: never"),
        }
    }
}

/// Construct and wire the driver for a resolved configuration
///
/// The cadence is only attached for models whose class honors it; for
/// other models it is dropped without error.
///
/// # Errors
///
/// - [`BindError::UnknownModel`] if `registry` does not contain the model
/// - [`BindError::UnsupportedCapabilityClass`] if the class has no
///   constructor path
pub fn bind(registry: &Registry, config: DeviceConfig) -> Result<DriverHandle, BindError> {
    let entry = registry
        .lookup(config.model.id)
        .map_err(|_| BindError::UnknownModel {
            model: config.model.id,
        })?;
    if !entry.class.is_bindable() {
        return Err(BindError::UnsupportedCapabilityClass {
            model: entry.id,
            class: entry.class,
        });
    }

    let panel = (entry.constructor)();
    debug!(
        "binding '{}' to {} ({}x{}, class {})",
        config.id, panel.name, panel.width, panel.height, entry.class
    );

    let (pages, writer) = match config.render {
        Some(RenderStrategy::StaticPages(pages)) => (pages, None),
        Some(RenderStrategy::Writer(writer)) => (Vec::new(), Some(writer)),
        None => (Vec::new(), None),
    };

    let mut handle = DriverHandle::new(config.id, entry, panel);
    handle.register_display(DisplaySettings {
        rotation: config.rotation,
        update_interval: config.update_interval,
        auto_clear: config.auto_clear,
        pages,
    });
    handle.register_bus(config.bus);
    handle.set_dc_pin(config.dc_pin);
    if let Some(writer) = writer {
        handle.set_writer(writer);
    }
    handle.set_reset_pin(config.reset_pin);
    handle.set_busy_pin(config.busy_pin);

    if let Some(every) = config.full_update_every {
        if entry.class.supports_cadence() {
            handle.set_full_update_every(every);
        } else {
            debug!(
                "full_update_every={every} not applied to {} (class {})",
                entry.id, entry.class
            );
        }
    }
    if let Some(duration) = config.reset_duration {
        handle.set_reset_duration(duration);
    }

    Ok(handle)
}

/// Resolve, validate and bind a raw description
///
/// Advisories go to `diagnostics`; they never stop the pipeline.
///
/// # Errors
///
/// Returns the first [`ConfigError`](crate::error::ConfigError) or
/// [`BindError`] encountered.
pub fn configure<D: Diagnostics + ?Sized>(
    raw: &RawConfig,
    registry: &Registry,
    diagnostics: &mut D,
) -> Result<DriverHandle, Error> {
    let config = raw.resolve(registry)?;
    validate::validate(registry, &config)?.report(diagnostics);
    Ok(bind(registry, config)?)
}
