//! UART serial transmit abstraction
//!
//! The console only ever writes; there is no receive path.

use core::fmt;

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Wait until the last byte has left the shift register
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Write a UTF-8 string
    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.write_blocking(s.as_bytes())
    }

    /// Write formatted text straight to the UART, so `write!` works
    ///
    /// Returns the first transmit error. A formatting error with no
    /// transmit error behind it is converted into `Self::Error`.
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), Self::Error>
    where
        Self::Error: From<fmt::Error>,
    {
        let mut adapter = FmtAdapter {
            uart: self,
            error: None,
        };
        match fmt::write(&mut adapter, args) {
            Ok(()) => Ok(()),
            Err(e) => Err(adapter.error.take().unwrap_or_else(|| e.into())),
        }
    }
}

/// Forwards `core::fmt` output to a [`UartTx`], keeping the transmit error
struct FmtAdapter<'a, U: UartTx + ?Sized> {
    uart: &'a mut U,
    error: Option<U::Error>,
}

impl<U: UartTx + ?Sized> fmt::Write for FmtAdapter<'_, U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.uart.write_blocking(s.as_bytes()).map_err(|e| {
            self.error = Some(e);
            fmt::Error
        })
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
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
            baudrate: 115200,
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
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}
