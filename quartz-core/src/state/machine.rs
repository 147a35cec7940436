//! Startup state machine definition

use super::events::BootEvent;
use crate::config::{ClockError, ConfigError};

/// Startup states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootState {
    /// Out of reset, nothing configured
    Reset,
    /// Clock tree configured
    ClocksConfigured,
    /// System tick running
    TickRunning,
    /// Status LEDs and UART ready
    PeripheralsReady,
    /// Task table built, loop may be entered
    TasksRegistered,
    /// Dispatch loop running
    Running,
    /// Bring-up failed; terminal
    Halted(BootError),
}

/// Reasons bring-up can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootError {
    /// Board configuration rejected
    Config(ConfigError),
    /// Core peripherals were already taken
    CorePeripherals,
    /// System tick could not be started
    TickSource,
    /// Console UART failed to initialize or transmit
    Uart,
    /// Bring-up returned without completing every stage
    Incomplete,
}

impl From<ConfigError> for BootError {
    fn from(e: ConfigError) -> Self {
        BootError::Config(e)
    }
}

impl From<ClockError> for BootError {
    fn from(e: ClockError) -> Self {
        BootError::Config(ConfigError::Clock(e))
    }
}

impl core::fmt::Display for BootError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BootError::Config(e) => write!(f, "configuration error: {}", e),
            BootError::CorePeripherals => f.write_str("core peripherals unavailable"),
            BootError::TickSource => f.write_str("system tick failed to start"),
            BootError::Uart => f.write_str("console UART failed"),
            BootError::Incomplete => f.write_str("bring-up did not complete"),
        }
    }
}

impl BootState {
    /// Check if the dispatch loop may run in this state
    pub fn loop_allowed(&self) -> bool {
        matches!(self, BootState::TasksRegistered | BootState::Running)
    }

    /// Check if this is the halt state
    pub fn is_halted(&self) -> bool {
        matches!(self, BootState::Halted(_))
    }

    /// Failure that caused the halt, if halted
    pub fn error(&self) -> Option<BootError> {
        match self {
            BootState::Halted(e) => Some(*e),
            _ => None,
        }
    }

    /// Process an event and return the next state
    ///
    /// Stages only advance in order. `Halted` absorbs every event.
    pub fn transition(self, event: BootEvent) -> Self {
        use BootEvent as E;
        use BootState as S;

        match (self, event) {
            (S::Halted(_), _) => self,
            (S::Running, E::Failed(_)) => self,
            (_, E::Failed(kind)) => S::Halted(kind),

            (S::Reset, E::ClocksConfigured) => S::ClocksConfigured,
            (S::ClocksConfigured, E::TickStarted) => S::TickRunning,
            (S::TickRunning, E::PeripheralsReady) => S::PeripheralsReady,
            (S::PeripheralsReady, E::TasksRegistered) => S::TasksRegistered,
            (S::TasksRegistered, E::LoopEntered) => S::Running,

            // Default: stay in current state
            _ => self,
        }
    }
}
