//! Console UART for STM32F4
//!
//! Blocking, transmit-only. Used for the boot banner before the dispatch
//! loop starts.

use embassy_stm32::mode::Blocking;
use embassy_stm32::usart::{self, ConfigError as UsartConfigError, Error as UsartError};

use quartz_hal::uart::{DataBits, Parity, StopBits, UartConfig};

/// Error from UART operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartBusError {
    /// Baud rate or frame format not reachable on this peripheral
    Config,
    /// Framing error
    Framing,
    /// Noise error
    Noise,
    /// Overrun error
    Overrun,
    /// Parity error
    Parity,
    /// Buffer too large for a single transfer
    BufferTooLong,
    /// Formatted output could not be rendered
    Format,
    /// Other error
    Other,
}

impl From<UsartError> for UartBusError {
    fn from(e: UsartError) -> Self {
        match e {
            UsartError::Framing => UartBusError::Framing,
            UsartError::Noise => UartBusError::Noise,
            UsartError::Overrun => UartBusError::Overrun,
            UsartError::Parity => UartBusError::Parity,
            UsartError::BufferTooLong => UartBusError::BufferTooLong,
            _ => UartBusError::Other,
        }
    }
}

impl From<UsartConfigError> for UartBusError {
    fn from(_: UsartConfigError) -> Self {
        UartBusError::Config
    }
}

impl From<core::fmt::Error> for UartBusError {
    fn from(_: core::fmt::Error) -> Self {
        UartBusError::Format
    }
}

/// Build an embassy USART configuration
pub fn usart_config(config: &UartConfig) -> usart::Config {
    let mut cfg = usart::Config::default();
    cfg.baudrate = config.baudrate;
    cfg.data_bits = match config.data_bits {
        DataBits::Seven => usart::DataBits::DataBits7,
        DataBits::Eight => usart::DataBits::DataBits8,
        DataBits::Nine => usart::DataBits::DataBits9,
    };
    cfg.parity = match config.parity {
        Parity::None => usart::Parity::ParityNone,
        Parity::Even => usart::Parity::ParityEven,
        Parity::Odd => usart::Parity::ParityOdd,
    };
    cfg.stop_bits = match config.stop_bits {
        StopBits::One => usart::StopBits::STOP1,
        StopBits::Two => usart::StopBits::STOP2,
    };
    cfg
}

/// Blocking console transmitter
pub struct SerialTx {
    tx: usart::UartTx<'static, Blocking>,
}

impl SerialTx {
    /// Wrap an initialized embassy transmitter
    pub fn new(tx: usart::UartTx<'static, Blocking>) -> Self {
        Self { tx }
    }
}

impl quartz_hal::UartTx for SerialTx {
    type Error = UartBusError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.tx.blocking_write(data)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.tx.blocking_flush()?;
        Ok(())
    }
}
