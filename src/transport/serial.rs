//! Serial transport implementation

use super::Transport;
use crate::error::Result;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::Read;
use std::time::Duration;

/// Serial transport for UART communication with the IMU
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open a serial port
    ///
    /// # Arguments
    /// * `path` - Serial port path (e.g., "/dev/ttyUSB0")
    /// * `baud_rate` - Baud rate (e.g., 115200)
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            // Short port timeout; the frame synchronizer owns the real
            // deadline and treats a timed-out read as "no bytes yet".
            .timeout(Duration::from_millis(10))
            .open()?;

        log::info!("Opened serial port: {} at {} baud", path, baud_rate);

        Ok(SerialTransport { port })
    }
}

impl Transport for SerialTransport {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        match self.port.read(buffer) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}
