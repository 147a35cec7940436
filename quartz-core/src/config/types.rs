//! Board configuration type definitions
//!
//! The firmware's build script reads these from `quartz.toml`, validates
//! them and compiles the result in as a constant. The same validation runs
//! again at boot before any peripheral is configured.

use super::hardware::{systick_reload, ClockError, ClockPlan, Clocks};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration error
///
/// Always fatal: detected at build time or during bring-up, never in the
/// running loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A periodic task was given a zero period
    ZeroPeriod,
    /// SysTick cannot produce the requested tick rate at this HCLK
    TickRate,
    /// UART baud rate is zero
    Baudrate,
    /// Clock plan is out of range
    Clock(ClockError),
}

impl From<ClockError> for ConfigError {
    fn from(e: ClockError) -> Self {
        ConfigError::Clock(e)
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroPeriod => f.write_str("task period must be greater than zero"),
            ConfigError::TickRate => f.write_str("tick rate is not reachable with SysTick"),
            ConfigError::Baudrate => f.write_str("UART baud rate must be greater than zero"),
            ConfigError::Clock(e) => write!(f, "clock plan: {}", e),
        }
    }
}

/// System tick settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TickConfig {
    /// Tick interrupts per second (1000 for a millisecond counter)
    pub rate_hz: u32,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self { rate_hz: 1000 }
    }
}

/// Heartbeat LED settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeartbeatConfig {
    /// Toggle period in ticks
    pub period_ms: u32,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self { period_ms: 500 }
    }
}

/// Console UART settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UartSettings {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for UartSettings {
    fn default() -> Self {
        Self { baudrate: 115_200 }
    }
}

/// Complete board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    /// Clock tree
    pub clock: ClockPlan,
    /// System tick
    #[cfg_attr(feature = "serde", serde(default))]
    pub tick: TickConfig,
    /// Heartbeat task
    #[cfg_attr(feature = "serde", serde(default))]
    pub heartbeat: HeartbeatConfig,
    /// Console UART
    #[cfg_attr(feature = "serde", serde(default))]
    pub uart: UartSettings,
}

impl BoardConfig {
    /// Check every section and return the clocks the plan produces
    ///
    /// Reports the first problem found.
    pub fn validate(&self) -> Result<Clocks, ConfigError> {
        let clocks = self.clock.validate()?;

        if systick_reload(clocks.hclk, self.tick.rate_hz).is_none() {
            return Err(ConfigError::TickRate);
        }
        if self.heartbeat.period_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if self.uart.baudrate == 0 {
            return Err(ConfigError::Baudrate);
        }

        Ok(clocks)
    }
}
