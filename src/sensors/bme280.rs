//! BME280 temperature, pressure and humidity sensor.
//!
//! Wraps the `bme280` driver over any embedded-hal I2C bus. The driver runs
//! the sensor in forced mode, so every accessor takes a fresh measurement.

use crate::error::{ExporterError, Result};
use crate::sensors::traits::EnvironmentalSensor;
use bme280::i2c::BME280;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use tracing::debug;

/// I2C address of the BME280 on the Enviro+ board.
pub const BME280_ADDRESS: u8 = 0x76;

/// One compensated sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Pressure in pascals
    pub pressure: f64,
    /// Relative humidity in percent
    pub humidity: f64,
}

/// BME280 on the primary address of an owned I2C bus.
pub struct Bme280<I2C, D> {
    device: BME280<I2C>,
    delay: D,
}

impl<I2C: I2c, D: DelayNs> Bme280<I2C, D> {
    /// Verify the chip, soft-reset it and load its calibration.
    pub fn new(i2c: I2C, mut delay: D) -> Result<Self> {
        let mut device = BME280::new_primary(i2c);
        device.init(&mut delay).map_err(|e| {
            ExporterError::environmental_error(format!("BME280 initialisation failed: {:?}", e))
        })?;
        debug!("BME280 calibrated at {:#04x}", BME280_ADDRESS);
        Ok(Self { device, delay })
    }

    /// Take one measurement.
    pub fn measure(&mut self) -> Result<Measurement> {
        let sample = self.device.measure(&mut self.delay).map_err(|e| {
            ExporterError::environmental_error(format!("BME280 measurement failed: {:?}", e))
        })?;
        let measurement = Measurement {
            temperature: f64::from(sample.temperature),
            pressure: f64::from(sample.pressure),
            humidity: f64::from(sample.humidity),
        };
        debug!("BME280 measurement: {:?}", measurement);
        Ok(measurement)
    }
}

impl<I2C, D> EnvironmentalSensor for Bme280<I2C, D>
where
    I2C: I2c + Send,
    D: DelayNs + Send,
{
    fn temperature(&mut self) -> Result<f64> {
        Ok(self.measure()?.temperature)
    }

    fn pressure(&mut self) -> Result<f64> {
        Ok(self.measure()?.pressure / 100.0)
    }

    fn humidity(&mut self) -> Result<f64> {
        Ok(self.measure()?.humidity)
    }
}
