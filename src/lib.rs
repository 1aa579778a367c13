//! E-Paper Panel Configuration and Driver Binding
//!
//! Validates a declarative description of an SPI e-paper panel and binds it to
//! a driver for the selected model.
//!
//! ## Features
//!
//! - `no_std` compatible (requires `alloc`)
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration for the display buffer (with `graphics` feature)
//! - Descriptions loadable through `serde` (with `serde` feature)
//! - Case-insensitive model registry with capability classes
//! - Fail-fast configuration resolving with typed errors
//! - Non-fatal capability advisories routed to a caller-chosen sink
//!
//! ## Pipeline
//!
//! 1. [`RawConfig::resolve`] checks the description and yields a [`DeviceConfig`]
//! 2. [`validate::validate`] produces advisories for options the model ignores
//! 3. [`bind`] calls the model's constructor and wires the [`DriverHandle`]
//!
//! [`configure`] runs all three.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use epaper_binder::{configure, DisplayInterface, LogDiagnostics, RawConfig, Registry};
//!
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! let raw = RawConfig::new()
//!     .id("kitchen")
//!     .model("gdey075t7")
//!     .dc_pin(17)
//!     .reset_pin(16)
//!     .busy_pin(4)
//!     .mosi_pin(23)
//!     .full_update_every(10)
//!     .reset_duration("10ms");
//!
//! let mut handle = match configure(&raw, &Registry::builtin(), &mut LogDiagnostics) {
//!     Ok(handle) => handle,
//!     Err(_) => return,
//! };
//! handle.log_config();
//!
//! let mut interface = handle.interface(MockSpi, MockPin, MockPin, MockPin);
//! interface.reset(&mut delay);
//! let _ = interface.busy_wait(&mut delay);
//!
//! handle.render();
//! let _mode = handle.next_refresh();
//! let _ = interface.send_data(handle.frame_buffer().as_bytes());
//! ```

#![no_std]

extern crate alloc;

/// Driver construction and the bound handle
pub mod binder;
/// Device description and resolver
pub mod config;
/// Error types for resolving and binding
pub mod error;
/// Display buffer handed to writers
pub mod framebuffer;
/// Hardware interface abstraction
pub mod interface;
/// Model registry
pub mod model;
/// Panel geometry and constructors
pub mod panel;
/// GPIO pin descriptions
pub mod pin;
/// Coordinate rotation utilities
pub mod rotation;
/// Duration parsing
pub mod time;
/// Capability advisories
pub mod validate;

pub use binder::{
    Attachment, DEFAULT_FULL_UPDATE_EVERY, DisplaySettings, DriverHandle, RefreshMode, bind,
    configure,
};
pub use config::{
    BusConfig, DeviceConfig, Page, RawBus, RawConfig, RenderStrategy, SpiMode, Writer,
};
pub use error::{BindError, ConfigError, Error, PinFault};
pub use framebuffer::{Color, FrameBuffer};
pub use interface::InterfaceError;
pub use interface::{DEFAULT_BUSY_TIMEOUT_MS, DisplayInterface, Interface};
pub use model::{CapabilityClass, MODELS, ModelEntry, Registry};
pub use panel::{Panel, PanelColors};
pub use pin::{GpioPin, PinMode, RawPin};
pub use rotation::Rotation;
pub use time::{RawDuration, UpdateInterval};
pub use validate::{Advisory, Diagnostics, LogDiagnostics, ValidationOutcome};
