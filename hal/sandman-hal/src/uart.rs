//! UART serial communication abstractions
//!
//! Command-string actuators talk to a microcontroller over a serial link.
//! Only the transmit half is needed; the micro never answers.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error: core::fmt::Debug;

    /// Write data to the UART
    ///
    /// Blocks until the data has been handed to the port or an error occurs.
    /// Returns the number of bytes actually written, which can be short.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Write a whole string, reporting how many bytes made it out
    fn write_str(&mut self, text: &str) -> Result<usize, Self::Error> {
        let written = self.write(text.as_bytes())?;
        self.flush()?;
        Ok(written)
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl UartConfig {
    /// 8N1 at the given baud rate
    pub fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            ..Self::default()
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingTx {
        sent: Vec<u8>,
        flushes: usize,
    }

    impl UartTx for RecordingTx {
        type Error = ();

        fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
            self.sent.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> Result<(), ()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_write_str_flushes() {
        let mut tx = RecordingTx { sent: Vec::new(), flushes: 0 };
        let written = tx.write_str("bu").unwrap();

        assert_eq!(written, 2);
        assert_eq!(tx.sent, b"bu");
        assert_eq!(tx.flushes, 1);
    }

    #[test]
    fn test_default_is_9600_8n1() {
        let config = UartConfig::default();
        assert_eq!(config.baudrate, 9600);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);

        assert_eq!(UartConfig::with_baudrate(115200).baudrate, 115200);
    }
}
