//! UART byte intake from the GPS receiver.

use esp_idf_hal::delay::NON_BLOCK;
use esp_idf_hal::gpio::{self, InputPin, OutputPin};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::uart::{config::Config as UartHwConfig, Uart, UartDriver};
use esp_idf_hal::units::Hertz;

use crate::traits::DataSource;

/// GPS receiver serial link.
///
/// Reads are non-blocking single-byte reads against the driver's receive
/// FIFO, satisfying the non-blocking-read-or-absent contract of
/// [`DataSource`] so the main loop's round-robin never stalls on the UART.
///
/// # Example
///
/// ```ignore
/// use rs_gpstime::hal::esp32::Esp32Serial;
///
/// let peripherals = Peripherals::take()?;
/// let serial = Esp32Serial::new(
///     peripherals.uart1,
///     peripherals.pins.gpio21, // TX (unused by most receivers)
///     peripherals.pins.gpio20, // RX
///     9600,
/// )?;
/// ```
pub struct Esp32Serial<'d> {
    uart: UartDriver<'d>,
}

impl<'d> Esp32Serial<'d> {
    /// Opens the UART at the given baud rate.
    ///
    /// # Errors
    ///
    /// Returns an error if UART initialization fails.
    pub fn new(
        uart: impl Peripheral<P = impl Uart> + 'd,
        tx: impl Peripheral<P = impl OutputPin> + 'd,
        rx: impl Peripheral<P = impl InputPin> + 'd,
        baud_rate: u32,
    ) -> Result<Self, esp_idf_hal::sys::EspError> {
        let config = UartHwConfig::default().baudrate(Hertz(baud_rate));
        let uart = UartDriver::new(
            uart,
            tx,
            rx,
            Option::<gpio::Gpio0>::None,
            Option::<gpio::Gpio1>::None,
            &config,
        )?;
        Ok(Self { uart })
    }
}

impl DataSource for Esp32Serial<'_> {
    fn read_byte(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match self.uart.read(&mut buf, NON_BLOCK) {
            Ok(1) => Some(buf[0]),
            _ => None,
        }
    }
}
