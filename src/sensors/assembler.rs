//! Combines one environmental and one particulate sample into a [`Reading`].

use crate::error::Result;
use crate::sensors::data::{PmFrame, PmSize, Reading};
use crate::sensors::traits::{EnvironmentalSensor, ParticulateSensor};
use tracing::{debug, warn};

/// Pulls a fresh sample from both sensors on every call.
pub struct ReadingsAssembler {
    environmental: Box<dyn EnvironmentalSensor>,
    particulate: Box<dyn ParticulateSensor>,
}

impl ReadingsAssembler {
    /// Create an assembler over the two sensors.
    pub fn new(
        environmental: Box<dyn EnvironmentalSensor>,
        particulate: Box<dyn ParticulateSensor>,
    ) -> Self {
        Self {
            environmental,
            particulate,
        }
    }

    /// Read every sensor once and format the result.
    ///
    /// A particulate read timeout is retried once after a sensor reset. Any
    /// other failure, or a failure of the retry, is returned as is.
    pub fn assemble(&mut self) -> Result<Reading> {
        let temperature = self.environmental.temperature()?;
        let pressure = self.environmental.pressure()?;
        let humidity = self.environmental.humidity()?;

        let frame = self.read_particulate()?;

        let reading = Reading::from_raw(
            temperature,
            pressure,
            humidity,
            frame.pm_ug_per_m3(PmSize::Pm2_5),
            frame.pm_ug_per_m3(PmSize::Pm10),
        );
        debug!("Assembled reading: {:?}", reading);
        Ok(reading)
    }

    fn read_particulate(&mut self) -> Result<PmFrame> {
        match self.particulate.read() {
            Ok(frame) => Ok(frame),
            Err(err) if err.is_timeout() => {
                warn!("Particulate sensor read failed ({}), resetting", err);
                self.particulate.reset()?;
                Ok(self.particulate.read()?)
            }
            Err(err) => Err(err.into()),
        }
    }
}
