//! Error handling for the enviro exporter crate.

use std::time::Duration;

/// A specialized `Result` type for exporter operations.
pub type Result<T> = std::result::Result<T, ExporterError>;

/// The main error type for sensor and web server operations.
#[derive(Debug, thiserror::Error)]
pub enum ExporterError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environmental (BME280) sensor fault
    #[error("Environmental sensor error: {0}")]
    Environmental(String),

    /// Particulate (PMS5003) sensor fault
    #[error("Particulate sensor error: {0}")]
    Particulate(#[from] ParticulateError),

    /// Bus, UART or GPIO access failed (only available with hardware feature)
    #[cfg(feature = "hardware")]
    #[error("Hardware error: {0}")]
    Hardware(String),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),
}

impl ExporterError {
    /// Create a new environmental sensor error
    pub fn environmental_error(msg: impl Into<String>) -> Self {
        Self::Environmental(msg.into())
    }

    /// Create a new hardware error
    #[cfg(feature = "hardware")]
    pub fn hardware_error(msg: impl Into<String>) -> Self {
        Self::Hardware(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }
}

/// Outcome of a failed particulate sensor read.
///
/// Only [`ParticulateError::Timeout`] is recoverable: the assembler resets the
/// sensor and reads once more. Everything else fails the reading outright.
#[derive(Debug, thiserror::Error)]
pub enum ParticulateError {
    /// No start-of-frame arrived before the deadline
    #[error("no start of frame within {0:?}")]
    Timeout(Duration),

    /// The frame was truncated or declared an unexpected length
    #[error("invalid frame: {0}")]
    Frame(String),

    /// The frame checksum did not match its contents
    #[error("checksum mismatch: expected {expected:#06x}, computed {computed:#06x}")]
    Checksum { expected: u16, computed: u16 },

    /// The serial transport failed
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParticulateError {
    /// Whether this error is the read timeout that warrants a reset and retry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
