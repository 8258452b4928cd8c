//! Serial port transmitter

use std::io::Write;
use std::time::Duration;

use sandman_hal::uart::{DataBits, Parity, StopBits};
use sandman_hal::{UartConfig, UartTx};
use serialport::SerialPort;
use tracing::info;

/// Write timeout; the micro reads continuously, so a stall means trouble
const WRITE_TIMEOUT: Duration = Duration::from_millis(500);

/// Transmit half of a host serial port
pub struct SerialPortTx {
    port: Box<dyn SerialPort>,
}

impl SerialPortTx {
    /// Open a serial port with the given framing
    pub fn open(path: &str, config: &UartConfig) -> Result<Self, serialport::Error> {
        info!("Opening serial port {} at {} baud", path, config.baudrate);
        let port = serialport::new(path, config.baudrate)
            .data_bits(data_bits(config.data_bits))
            .parity(parity(config.parity))
            .stop_bits(stop_bits(config.stop_bits))
            .timeout(WRITE_TIMEOUT)
            .open()?;
        Ok(Self { port })
    }
}

fn data_bits(bits: DataBits) -> serialport::DataBits {
    match bits {
        DataBits::Seven => serialport::DataBits::Seven,
        DataBits::Eight => serialport::DataBits::Eight,
    }
}

fn parity(parity: Parity) -> serialport::Parity {
    match parity {
        Parity::None => serialport::Parity::None,
        Parity::Even => serialport::Parity::Even,
        Parity::Odd => serialport::Parity::Odd,
    }
}

fn stop_bits(bits: StopBits) -> serialport::StopBits {
    match bits {
        StopBits::One => serialport::StopBits::One,
        StopBits::Two => serialport::StopBits::Two,
    }
}

impl UartTx for SerialPortTx {
    type Error = std::io::Error;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.port.write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.port.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framing_conversion() {
        let config = UartConfig::default();
        assert_eq!(data_bits(config.data_bits), serialport::DataBits::Eight);
        assert_eq!(parity(config.parity), serialport::Parity::None);
        assert_eq!(stop_bits(config.stop_bits), serialport::StopBits::One);
    }

    #[test]
    fn test_open_missing_port_fails() {
        let result = SerialPortTx::open("/dev/sandman-no-such-port", &UartConfig::default());
        assert!(result.is_err());
    }
}
