//! Startup events

use super::machine::BootError;

/// Events that drive the startup state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootEvent {
    /// Oscillators, PLL and bus clocks are running
    ClocksConfigured,
    /// The system tick interrupt is counting
    TickStarted,
    /// LEDs and UART are initialized
    PeripheralsReady,
    /// Every periodic task has a valid period
    TasksRegistered,
    /// Control has passed to the dispatch loop
    LoopEntered,
    /// A stage failed
    Failed(BootError),
}
