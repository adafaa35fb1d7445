//! Sensor drivers and reading assembly.
//!
//! This module provides the BME280 and PMS5003 drivers, the assembler that
//! turns one sample from each into a [`Reading`], and the context object the
//! web layer uses to request readings.

pub mod assembler;
pub mod bme280;
pub mod context;
pub mod data;
pub mod platform;
pub mod pms5003;
pub mod traits;

// Re-export commonly used items
pub use assembler::ReadingsAssembler;
pub use context::SensorContext;
pub use data::{PmFrame, PmSize, Reading};
pub use traits::{EnvironmentalSensor, ParticulateLink, ParticulateSensor};
