//! Shared sensor context handed to the web layer.

use crate::error::{ExporterError, Result};
use crate::sensors::assembler::ReadingsAssembler;
use crate::sensors::data::Reading;
use std::sync::{Arc, Mutex};

/// Owns the assembler for the lifetime of the process.
///
/// Cloning shares the same sensors. A single mutex serializes read cycles, so
/// two requests never interleave resets and reads on the particulate sensor.
#[derive(Clone)]
pub struct SensorContext {
    assembler: Arc<Mutex<ReadingsAssembler>>,
}

impl SensorContext {
    /// Wrap an assembler.
    pub fn new(assembler: ReadingsAssembler) -> Self {
        Self {
            assembler: Arc::new(Mutex::new(assembler)),
        }
    }

    /// Open the board's sensors.
    pub fn open() -> Result<Self> {
        Ok(Self::new(crate::sensors::platform::open_assembler()?))
    }

    /// Take one reading, blocking the calling thread.
    pub fn read_blocking(&self) -> Result<Reading> {
        // a panic mid-read leaves the drivers usable; keep serving
        let mut assembler = self
            .assembler
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        assembler.assemble()
    }

    /// Take one reading on the blocking thread pool.
    pub async fn read(&self) -> Result<Reading> {
        let context = self.clone();
        tokio::task::spawn_blocking(move || context.read_blocking())
            .await
            .map_err(|e| ExporterError::web_server_error(format!("Sensor task failed: {}", e)))?
    }
}
