//! Data structures for sensor readings.

use serde::{Deserialize, Serialize};

/// One assembled set of readings, as served to HTTP clients.
///
/// Every field is a pre-formatted string. The environmental values carry
/// exactly two fraction digits; the particulate values are plain integers.
/// Field order is the serialized key order (`P2` before `P1`), which existing
/// dashboards see but must not depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Temperature in degrees Celsius
    pub temperature: String,
    /// Pressure in pascals
    pub pressure: String,
    /// Relative humidity in percent
    pub humidity: String,
    /// PM2.5 mass concentration in µg/m³
    #[serde(rename = "P2")]
    pub pm2_5: String,
    /// PM10 mass concentration in µg/m³
    #[serde(rename = "P1")]
    pub pm10: String,
}

impl Reading {
    /// Build a reading from raw values.
    ///
    /// `pressure_hpa` is scaled by 100 before formatting.
    pub fn from_raw(
        temperature: f64,
        pressure_hpa: f64,
        humidity: f64,
        pm2_5: u16,
        pm10: u16,
    ) -> Self {
        Self {
            temperature: format!("{:.2}", temperature),
            pressure: format!("{:.2}", pressure_hpa * 100.0),
            humidity: format!("{:.2}", humidity),
            pm2_5: pm2_5.to_string(),
            pm10: pm10.to_string(),
        }
    }
}

/// Particle size bucket for mass concentration lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PmSize {
    /// Particles up to 1.0 µm
    Pm1_0,
    /// Particles up to 2.5 µm
    Pm2_5,
    /// Particles up to 10 µm
    Pm10,
}

/// Number of data words in a PMS5003 frame.
pub const PM_FRAME_WORDS: usize = 13;

/// One decoded PMS5003 data frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PmFrame {
    words: [u16; PM_FRAME_WORDS],
}

impl PmFrame {
    /// Wrap the data words of a frame (length and checksum already stripped).
    pub fn new(words: [u16; PM_FRAME_WORDS]) -> Self {
        Self { words }
    }

    /// Mass concentration in µg/m³ using the factory (CF=1) calibration.
    pub fn pm_ug_per_m3(&self, size: PmSize) -> u16 {
        self.words[Self::offset(size)]
    }

    /// Mass concentration in µg/m³ corrected for the atmospheric environment.
    pub fn pm_ug_per_m3_atmospheric(&self, size: PmSize) -> u16 {
        self.words[3 + Self::offset(size)]
    }

    /// Particles per 0.1 L of air with a diameter above `microns`.
    ///
    /// Returns `None` for sizes the sensor does not report.
    pub fn particles_per_100ml(&self, microns: f32) -> Option<u16> {
        const THRESHOLDS: [f32; 6] = [0.3, 0.5, 1.0, 2.5, 5.0, 10.0];
        THRESHOLDS
            .iter()
            .position(|&t| (t - microns).abs() < f32::EPSILON)
            .map(|index| self.words[6 + index])
    }

    /// Raw data words as they appeared on the wire.
    pub fn words(&self) -> &[u16; PM_FRAME_WORDS] {
        &self.words
    }

    fn offset(size: PmSize) -> usize {
        match size {
            PmSize::Pm1_0 => 0,
            PmSize::Pm2_5 => 1,
            PmSize::Pm10 => 2,
        }
    }
}
