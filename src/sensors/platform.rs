//! Platform bindings for the Enviro+ sensor board.
//!
//! With the `hardware` feature the BME280 is reached over `/dev/i2c-1` and the
//! PMS5003 over the primary UART, using rppal. Without it, simulated devices
//! stand in so the exporter builds and runs on any host.

use crate::error::Result;
use crate::sensors::assembler::ReadingsAssembler;

#[cfg(feature = "hardware")]
mod raspberry_pi {
    use crate::error::{ExporterError, Result};
    use crate::sensors::bme280::{Bme280, BME280_ADDRESS};
    use crate::sensors::pms5003::Pms5003;
    use crate::sensors::traits::{ParticulateLink, ParticulateSensor};
    use embedded_hal::i2c::{ErrorType, I2c as HalI2c, Operation};
    use rppal::gpio::{Gpio, OutputPin};
    use rppal::hal::Delay;
    use rppal::i2c::I2c;
    use rppal::uart::{Parity, Queue, Uart};
    use std::io;
    use std::thread;
    use std::time::Duration;
    use tracing::info;

    const I2C_BUS: u8 = 1;
    const UART_PATH: &str = "/dev/ttyAMA0";
    const UART_BAUD: u32 = 9600;
    const PIN_ENABLE: u8 = 22;
    const PIN_RESET: u8 = 27;
    const UART_POLL: Duration = Duration::from_millis(100);

    /// Exclusive handle on the I2C bus shared by the environmental sensor.
    pub struct SensorBus {
        i2c: I2c,
    }

    impl SensorBus {
        /// Open the bus.
        pub fn open() -> Result<Self> {
            let i2c = I2c::with_bus(I2C_BUS).map_err(|e| {
                ExporterError::hardware_error(format!("Failed to open I2C bus {}: {}", I2C_BUS, e))
            })?;
            Ok(Self { i2c })
        }
    }

    impl ErrorType for SensorBus {
        type Error = rppal::i2c::Error;
    }

    impl HalI2c for SensorBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> std::result::Result<(), Self::Error> {
            HalI2c::transaction(&mut self.i2c, address, operations)
        }
    }

    /// UART plus the enable and reset lines of the PMS5003.
    pub struct PmsSerial {
        uart: Uart,
        reset_pin: OutputPin,
        _enable_pin: OutputPin,
    }

    impl PmsSerial {
        /// Open the UART and drive the enable and reset lines high.
        pub fn open() -> Result<Self> {
            let mut uart = Uart::with_path(UART_PATH, UART_BAUD, Parity::None, 8, 1)
                .map_err(|e| {
                    ExporterError::hardware_error(format!("Failed to open {}: {}", UART_PATH, e))
                })?;
            uart.set_read_mode(0, UART_POLL).map_err(|e| {
                ExporterError::hardware_error(format!("Failed to set UART read mode: {}", e))
            })?;

            let gpio = Gpio::new().map_err(|e| {
                ExporterError::hardware_error(format!("Failed to initialize GPIO: {}", e))
            })?;
            let output = |pin: u8| -> Result<OutputPin> {
                Ok(gpio
                    .get(pin)
                    .map_err(|e| {
                        ExporterError::hardware_error(format!("Failed to access pin {}: {}", pin, e))
                    })?
                    .into_output_high())
            };

            Ok(Self {
                uart,
                reset_pin: output(PIN_RESET)?,
                _enable_pin: output(PIN_ENABLE)?,
            })
        }
    }

    impl ParticulateLink for PmsSerial {
        fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
            self.uart
                .read(buffer)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
        }

        fn reset(&mut self) -> io::Result<()> {
            thread::sleep(Duration::from_millis(100));
            self.reset_pin.set_low();
            self.uart
                .flush(Queue::Input)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            thread::sleep(Duration::from_millis(100));
            self.reset_pin.set_high();
            Ok(())
        }
    }

    /// Open the bus, UART and GPIO and wrap them in drivers.
    pub fn open() -> Result<(Bme280<SensorBus, Delay>, Pms5003<PmsSerial>)> {
        let bme280 = Bme280::new(SensorBus::open()?, Delay::new())?;
        info!("BME280 ready on I2C bus {} at {:#04x}", I2C_BUS, BME280_ADDRESS);

        let mut pms5003 = Pms5003::new(PmsSerial::open()?);
        pms5003.reset()?;
        info!("PMS5003 ready on {}", UART_PATH);

        Ok((bme280, pms5003))
    }
}

#[cfg(not(feature = "hardware"))]
mod simulated {
    use crate::error::Result;
    use crate::sensors::data::PM_FRAME_WORDS;
    use crate::sensors::pms5003::{encode_frame, Pms5003};
    use crate::sensors::traits::{EnvironmentalSensor, ParticulateLink};
    use std::collections::VecDeque;
    use std::io;

    /// Environmental sensor reporting a slowly cycling, plausible climate.
    #[derive(Debug, Default)]
    pub struct SimulatedEnvironment {
        tick: u32,
    }

    impl SimulatedEnvironment {
        pub fn new() -> Self {
            Self::default()
        }

        fn wobble(&mut self, amplitude: f64) -> f64 {
            self.tick = self.tick.wrapping_add(1);
            let phase = (self.tick % 60) as f64 / 60.0 * std::f64::consts::TAU;
            amplitude * phase.sin()
        }
    }

    impl EnvironmentalSensor for SimulatedEnvironment {
        fn temperature(&mut self) -> Result<f64> {
            Ok(21.5 + self.wobble(0.8))
        }

        fn pressure(&mut self) -> Result<f64> {
            Ok(1013.25 + self.wobble(1.5))
        }

        fn humidity(&mut self) -> Result<f64> {
            Ok(45.0 + self.wobble(3.0))
        }
    }

    /// Byte link that produces a well-formed PMS5003 frame per read cycle.
    #[derive(Debug, Default)]
    pub struct SimulatedPmsLink {
        pending: VecDeque<u8>,
        frames: u16,
    }

    impl SimulatedPmsLink {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl ParticulateLink for SimulatedPmsLink {
        fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
            if self.pending.is_empty() {
                self.frames = self.frames.wrapping_add(1);
                let pm = 4 + self.frames % 5;
                let mut words = [0u16; PM_FRAME_WORDS];
                words[..6].copy_from_slice(&[pm / 2, pm, pm + 3, pm / 2, pm, pm + 3]);
                words[6..12].copy_from_slice(&[900, 260, 45, 6, 2, 1]);
                self.pending.extend(encode_frame(&words));
            }

            let count = buffer.len().min(self.pending.len());
            for (slot, byte) in buffer.iter_mut().zip(self.pending.drain(..count)) {
                *slot = byte;
            }
            Ok(count)
        }

        fn reset(&mut self) -> io::Result<()> {
            self.pending.clear();
            Ok(())
        }
    }

    pub fn open() -> Result<(SimulatedEnvironment, Pms5003<SimulatedPmsLink>)> {
        tracing::warn!("Built without the `hardware` feature, serving simulated readings");
        Ok((
            SimulatedEnvironment::new(),
            Pms5003::new(SimulatedPmsLink::new()),
        ))
    }
}

#[cfg(feature = "hardware")]
pub use raspberry_pi::{PmsSerial, SensorBus};

#[cfg(not(feature = "hardware"))]
pub use simulated::{SimulatedEnvironment, SimulatedPmsLink};

/// Open the board's sensors and build an assembler over them.
pub fn open_assembler() -> Result<ReadingsAssembler> {
    #[cfg(feature = "hardware")]
    let (environmental, particulate) = raspberry_pi::open()?;

    #[cfg(not(feature = "hardware"))]
    let (environmental, particulate) = simulated::open()?;

    Ok(ReadingsAssembler::new(
        Box::new(environmental),
        Box::new(particulate),
    ))
}
