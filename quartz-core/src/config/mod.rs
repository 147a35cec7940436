//! Configuration types
//!
//! Defines the board configuration the firmware is built from, and the
//! checks that decide whether it can be brought up at all.

pub mod hardware;
pub mod types;

pub use hardware::{systick_reload, ClockError, ClockPlan, Clocks, FlashAccess, VoltageScale};
pub use types::{BoardConfig, ConfigError, HeartbeatConfig, TickConfig, UartSettings};
