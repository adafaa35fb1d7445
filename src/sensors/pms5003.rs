//! PMS5003 particulate sensor driver.
//!
//! The sensor streams 32-byte frames in active mode:
//! `0x42 0x4D`, a big-endian length of 28, thirteen big-endian data words and
//! a big-endian checksum over everything before it.

use crate::error::ParticulateError;
use crate::sensors::data::{PmFrame, PM_FRAME_WORDS};
use crate::sensors::traits::{ParticulateLink, ParticulateSensor};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// How long to wait for a start-of-frame before giving up.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

const START_OF_FRAME: [u8; 2] = [0x42, 0x4D];
const FRAME_LENGTH: usize = 2 * PM_FRAME_WORDS + 2;

type PmsResult<T> = std::result::Result<T, ParticulateError>;

/// PMS5003 driver over any byte link.
pub struct Pms5003<L: ParticulateLink> {
    link: L,
    timeout: Duration,
}

impl<L: ParticulateLink> Pms5003<L> {
    /// Create a driver using the default start-of-frame timeout.
    pub fn new(link: L) -> Self {
        Self::with_timeout(link, DEFAULT_READ_TIMEOUT)
    }

    /// Create a driver with a custom start-of-frame timeout.
    pub fn with_timeout(link: L, timeout: Duration) -> Self {
        Self { link, timeout }
    }

    /// Access the underlying link.
    pub fn link(&self) -> &L {
        &self.link
    }

    fn sync(&mut self) -> PmsResult<()> {
        let deadline = Instant::now() + self.timeout;
        let mut previous = 0u8;
        let mut skipped = 0usize;

        loop {
            let mut byte = [0u8; 1];
            if self.fill(&mut byte, deadline)? == 0 {
                return Err(ParticulateError::Timeout(self.timeout));
            }
            if previous == START_OF_FRAME[0] && byte[0] == START_OF_FRAME[1] {
                if skipped > 1 {
                    trace!("Skipped {} bytes before start of frame", skipped - 1);
                }
                return Ok(());
            }
            previous = byte[0];
            skipped += 1;
        }
    }

    /// Read into `buffer` until it is full or `deadline` passes.
    /// Returns the number of bytes read.
    fn fill(&mut self, buffer: &mut [u8], deadline: Instant) -> PmsResult<usize> {
        let mut filled = 0;
        while filled < buffer.len() {
            if Instant::now() >= deadline {
                break;
            }
            filled += self.link.read(&mut buffer[filled..])?;
        }
        Ok(filled)
    }

    fn read_body(&mut self) -> PmsResult<PmFrame> {
        let deadline = Instant::now() + self.timeout;

        let mut length = [0u8; 2];
        let got = self.fill(&mut length, deadline)?;
        if got != length.len() {
            return Err(ParticulateError::Frame(format!(
                "expected 2 length bytes, got {}",
                got
            )));
        }
        let declared = u16::from_be_bytes(length) as usize;
        if declared != FRAME_LENGTH {
            return Err(ParticulateError::Frame(format!(
                "declared length {}, expected {}",
                declared, FRAME_LENGTH
            )));
        }

        let mut body = [0u8; FRAME_LENGTH];
        let got = self.fill(&mut body, deadline)?;
        if got != FRAME_LENGTH {
            return Err(ParticulateError::Frame(format!(
                "expected {} bytes, got {}",
                FRAME_LENGTH, got
            )));
        }

        let (data, trailer) = body.split_at(FRAME_LENGTH - 2);
        let expected = u16::from_be_bytes([trailer[0], trailer[1]]);
        let computed = checksum(&[&START_OF_FRAME[..], &length[..], data]);
        if expected != computed {
            return Err(ParticulateError::Checksum { expected, computed });
        }

        let mut words = [0u16; PM_FRAME_WORDS];
        for (word, chunk) in words.iter_mut().zip(data.chunks_exact(2)) {
            *word = u16::from_be_bytes([chunk[0], chunk[1]]);
        }
        Ok(PmFrame::new(words))
    }
}

/// Wrapping 16-bit sum of every byte in `parts`.
pub fn checksum(parts: &[&[u8]]) -> u16 {
    parts
        .iter()
        .flat_map(|part| part.iter())
        .fold(0u16, |sum, &byte| sum.wrapping_add(byte as u16))
}

/// Encode a complete frame for the given data words.
pub fn encode_frame(words: &[u16; PM_FRAME_WORDS]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(4 + FRAME_LENGTH);
    frame.extend_from_slice(&START_OF_FRAME);
    frame.extend_from_slice(&(FRAME_LENGTH as u16).to_be_bytes());
    for word in words {
        frame.extend_from_slice(&word.to_be_bytes());
    }
    let sum = checksum(&[&frame[..]]);
    frame.extend_from_slice(&sum.to_be_bytes());
    frame
}

impl<L: ParticulateLink> ParticulateSensor for Pms5003<L> {
    fn read(&mut self) -> PmsResult<PmFrame> {
        self.sync()?;
        let frame = self.read_body()?;
        debug!("PMS5003 frame: {:?}", frame.words());
        Ok(frame)
    }

    fn reset(&mut self) -> PmsResult<()> {
        debug!("Resetting PMS5003");
        self.link.reset()?;
        Ok(())
    }
}
