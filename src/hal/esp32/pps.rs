//! PPS input pin wired to the interrupt entry point.

use esp_idf_hal::gpio::{Input, InputPin, InterruptType, OutputPin, PinDriver, Pull};
use esp_idf_hal::peripheral::Peripheral;

use crate::irq;

/// Pulse-per-second GPIO input.
///
/// Configures a pin for rising-edge interrupts and dispatches each edge to
/// [`irq::pps_interrupt`], which reaches the registered [`Discipline`]
/// through the process-wide slot. Call [`irq::enable_interrupts`] before
/// [`arm`](Self::arm), otherwise edges land in a no-op.
///
/// [`Discipline`]: crate::Discipline
pub struct PpsPin<'d, P>
where
    P: InputPin + OutputPin,
{
    pin: PinDriver<'d, P, Input>,
}

impl<'d, P> PpsPin<'d, P>
where
    P: InputPin + OutputPin,
{
    /// Configures the pin as a pulled-down input triggering on rising
    /// edges.
    ///
    /// # Errors
    ///
    /// Returns an error if GPIO initialization fails.
    pub fn new(pin: impl Peripheral<P = P> + 'd) -> Result<Self, esp_idf_hal::sys::EspError> {
        let mut pin = PinDriver::input(pin)?;
        // Defined idle level for an unconnected PPS header.
        pin.set_pull(Pull::Down)?;
        pin.set_interrupt_type(InterruptType::PosEdge)?;
        Ok(Self { pin })
    }

    /// Arms the edge interrupt.
    pub fn arm(&mut self) -> Result<(), esp_idf_hal::sys::EspError> {
        unsafe { self.pin.subscribe(irq::pps_interrupt)? };
        self.pin.enable_interrupt()
    }
}
