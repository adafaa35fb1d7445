//! Traits at the seams between drivers, transports and the assembler.

use crate::error::{ParticulateError, Result};
use crate::sensors::data::PmFrame;

/// Temperature, pressure and humidity source.
///
/// Calls are blocking; callers serialize access.
pub trait EnvironmentalSensor: Send {
    /// Temperature in degrees Celsius.
    fn temperature(&mut self) -> Result<f64>;

    /// Pressure in hectopascals.
    fn pressure(&mut self) -> Result<f64>;

    /// Relative humidity in percent.
    fn humidity(&mut self) -> Result<f64>;
}

/// Particulate matter source with a resettable, stateful read cycle.
pub trait ParticulateSensor: Send {
    /// Read one data frame.
    fn read(&mut self) -> std::result::Result<PmFrame, ParticulateError>;

    /// Reset the sensor and drop any buffered input.
    fn reset(&mut self) -> std::result::Result<(), ParticulateError>;
}

/// Byte transport to a PMS5003.
pub trait ParticulateLink: Send {
    /// Read up to `buffer.len()` bytes. Returns `Ok(0)` when the transport's
    /// own read timeout elapses with nothing available.
    fn read(&mut self, buffer: &mut [u8]) -> std::io::Result<usize>;

    /// Pulse the reset line and discard pending input.
    fn reset(&mut self) -> std::io::Result<()>;
}
