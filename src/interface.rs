//! Hardware interface abstraction
//!
//! The [`DisplayInterface`] trait and the [`Interface`] struct carry a bound
//! [`DriverHandle`](crate::binder::DriverHandle)'s pin wiring onto concrete
//! embedded-hal types. The interface is what the external panel driver
//! talks through; waveform sequencing stays outside this crate.
//!
//! ## Hardware Requirements
//!
//! - SPI bus (MOSI + SCK)
//! - 3 GPIO pins:
//!   - **DC**: Data/Command select (output)
//!   - **RST**: Reset (output, active low)
//!   - **BUSY**: Busy status (input, polarity depends on the panel)
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use epaper_binder::{DisplayInterface, Interface};
//! # use core::convert::Infallible;
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
//! let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! interface.set_reset_duration_ms(50).set_busy_active_high(false);
//!
//! interface.reset(&mut delay);
//! let _ = interface.send_command(0x12);
//! let _ = interface.send_data(&[0xFF, 0x00, 0xFF]);
//! let _ = interface.busy_wait(&mut delay);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for the hardware interface of a panel controller
///
/// Implemented by [`Interface`] for any embedded-hal SPI device and GPIO
/// pins. Implement it yourself for unusual wiring.
pub trait DisplayInterface {
    /// Error type for interface operations
    type Error: Debug;

    /// Send a command byte (DC low)
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error>;

    /// Send data bytes (DC high)
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Pulse the reset line
    ///
    /// Holds RST low for the configured reset duration, then releases it.
    fn reset<D: DelayNs>(&mut self, delay: &mut D);

    /// Wait for the controller to release BUSY
    ///
    /// # Errors
    ///
    /// Returns [`InterfaceError::Timeout`] if BUSY is still asserted after the
    /// timeout period.
    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error>;
}

/// Errors that can occur at the interface level
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
    /// Timeout waiting for busy pin
    Timeout,
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
            Self::Timeout => write!(f, "Timeout waiting for display"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Default timeout for busy-wait in milliseconds
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 30_000;

/// Default time RST is held low, in milliseconds
pub const DEFAULT_RESET_DURATION_MS: u32 = 200;

/// Settle time after releasing RST, in milliseconds
const RESET_SETTLE_MS: u32 = 10;

/// Hardware interface over embedded-hal v1.0 SPI and GPIO traits
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`]
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
/// * `BUSY` - Busy pin implementing [`InputPin`]
pub struct Interface<SPI, DC, RST, BUSY> {
    spi: SPI,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low)
    rst: RST,
    busy: BUSY,
    busy_timeout_ms: u32,
    /// true = BUSY high means busy
    busy_active_high: bool,
    reset_duration_ms: u32,
}

impl<SPI, DC, RST, BUSY> Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    /// Create a new Interface with default timing and active-high BUSY
    pub const fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY) -> Self {
        Self {
            spi,
            dc,
            rst,
            busy,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            busy_active_high: true,
            reset_duration_ms: DEFAULT_RESET_DURATION_MS,
        }
    }

    /// Set the busy-wait timeout in milliseconds
    ///
    /// Set to 0 to disable the timeout.
    pub const fn set_busy_timeout(&mut self, timeout_ms: u32) -> &mut Self {
        self.busy_timeout_ms = timeout_ms;
        self
    }

    /// Busy-wait timeout in milliseconds
    pub const fn busy_timeout(&self) -> u32 {
        self.busy_timeout_ms
    }

    /// Set busy pin polarity
    pub const fn set_busy_active_high(&mut self, active_high: bool) -> &mut Self {
        self.busy_active_high = active_high;
        self
    }

    /// Busy pin polarity (true = active high)
    pub const fn busy_active_high(&self) -> bool {
        self.busy_active_high
    }

    /// Set how long RST is held low during [`reset`](DisplayInterface::reset)
    pub const fn set_reset_duration_ms(&mut self, duration_ms: u32) -> &mut Self {
        self.reset_duration_ms = duration_ms;
        self
    }

    /// Reset pulse length in milliseconds
    pub const fn reset_duration_ms(&self) -> u32 {
        self.reset_duration_ms
    }

    /// Give back the SPI device and pins
    pub fn release(self) -> (SPI, DC, RST, BUSY) {
        (self.spi, self.dc, self.rst, self.busy)
    }
}

impl<SPI, DC, RST, BUSY, PinErr> DisplayInterface for Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.dc.set_low().map_err(InterfaceError::Pin)?;
        self.spi.write(&[command]).map_err(InterfaceError::Spi)?;
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.dc.set_high().map_err(InterfaceError::Pin)?;
        self.spi.write(data).map_err(InterfaceError::Spi)?;
        Ok(())
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) {
        let _ = self.rst.set_low();
        delay.delay_ms(self.reset_duration_ms);
        let _ = self.rst.set_high();
        delay.delay_ms(RESET_SETTLE_MS);
    }

    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        let mut iterations = 0u32;
        let timeout_ms = self.busy_timeout_ms;

        loop {
            let is_busy = if self.busy_active_high {
                self.busy.is_high()
            } else {
                self.busy.is_low()
            }
            .map_err(InterfaceError::Pin)?;

            if !is_busy {
                return Ok(());
            }

            delay.delay_ms(1);
            iterations += 1;
            if timeout_ms > 0 && iterations >= timeout_ms {
                return Err(InterfaceError::Timeout);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use alloc::vec::Vec;
    use embedded_hal::delay::DelayNs;
    use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
    use embedded_hal::spi::{ErrorType as SpiErrorType, Operation, SpiDevice};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MockError;

    impl core::fmt::Display for MockError {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            write!(f, "mock error")
        }
    }

    impl embedded_hal::digital::Error for MockError {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl embedded_hal::spi::Error for MockError {
        fn kind(&self) -> embedded_hal::spi::ErrorKind {
            embedded_hal::spi::ErrorKind::Other
        }
    }

    #[derive(Debug, Default)]
    pub struct MockSpi {
        pub written: Vec<Vec<u8>>,
    }

    impl SpiErrorType for MockSpi {
        type Error = MockError;
    }

    impl SpiDevice for MockSpi {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), MockError> {
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.written.push(bytes.to_vec());
                }
            }
            Ok(())
        }
    }

    /// Output pin recording levels, input pin reporting a fixed level
    #[derive(Debug, Default)]
    pub struct MockPin {
        pub levels: Vec<bool>,
        pub high: bool,
    }

    impl MockPin {
        pub fn reading(high: bool) -> Self {
            Self {
                levels: Vec::new(),
                high,
            }
        }
    }

    impl ErrorType for MockPin {
        type Error = MockError;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), MockError> {
            self.levels.push(false);
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), MockError> {
            self.levels.push(true);
            Ok(())
        }
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, MockError> {
            Ok(self.high)
        }
        fn is_low(&mut self) -> Result<bool, MockError> {
            Ok(!self.high)
        }
    }

    /// Delay that records total milliseconds requested
    #[derive(Debug, Default)]
    pub struct MockDelay {
        pub total_ns: u64,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }
}
