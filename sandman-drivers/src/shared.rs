//! Shared UART
//!
//! Several command-string actuators usually hang off the same serial port.
//! Each gets a clone of a [`SharedUart`]; writes are serialized by a lock.

use std::sync::{Arc, Mutex};

use sandman_hal::UartTx;

/// Cloneable, lock-protected UART
pub struct SharedUart<U> {
    inner: Arc<Mutex<U>>,
}

impl<U> Clone for SharedUart<U> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<U: UartTx> SharedUart<U> {
    pub fn new(uart: U) -> Self {
        Self {
            inner: Arc::new(Mutex::new(uart)),
        }
    }
}

impl<U: UartTx> UartTx for SharedUart<U> {
    type Error = U::Error;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        let mut uart = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        uart.write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        let mut uart = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        uart.flush()
    }

    fn write_str(&mut self, text: &str) -> Result<usize, Self::Error> {
        // Hold the lock across write and flush so commands never interleave
        let mut uart = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        uart.write_str(text)
    }
}
