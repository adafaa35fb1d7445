//! # Enviro Exporter - Raspberry Pi Air Quality Endpoint
//!
//! Polls a BME280 (temperature, pressure, humidity) and a PMS5003
//! (particulate matter) on an Enviro+ style sensor board and serves the latest
//! readings as JSON over HTTP, with CORS headers so browser dashboards can
//! fetch them directly.
//!
//! ## Features
//!
//! - **Fresh readings per request**: nothing is cached or stored
//! - **One-shot recovery**: a stalled particulate sensor is reset and read again
//! - **CORS preflight**: `OPTIONS` on any path
//! - **Cross-compilation**: real hardware behind the `hardware` feature,
//!   simulated sensors everywhere else
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use enviro_exporter::{run_until_interrupted, SensorContext, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sensors = SensorContext::open()?;
//!
//!     // Serve on 0.0.0.0:8001 until Ctrl-C
//!     run_until_interrupted(ServerConfig::new(false), sensors).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod sensors;
pub mod web;

// Re-export public API
pub use error::{ExporterError, ParticulateError, Result};
pub use sensors::{
    assembler::ReadingsAssembler,
    context::SensorContext,
    data::{PmFrame, PmSize, Reading},
    traits::{EnvironmentalSensor, ParticulateLink, ParticulateSensor},
};

pub use web::{run_until_interrupted, AddressFamily, HttpExporter, ServerConfig};

/// The web server port
pub const DEFAULT_PORT: u16 = 8001;
