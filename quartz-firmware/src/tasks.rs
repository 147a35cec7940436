//! Periodic task table
//!
//! Every task runs from the single dispatch loop with exclusive access to
//! the [`Board`]. Actions must return quickly: a slow action delays every
//! task behind it, and the lost time is caught up on the next pass.

use quartz_core::config::{BoardConfig, ConfigError};
use quartz_core::scheduler::Task;
use quartz_core::traits::Millis;
use quartz_hal::OutputPin;

use crate::board::Board;

/// Number of registered tasks
pub const TASK_COUNT: usize = 1;

/// Build the task table, in dispatch order
pub fn table(config: &BoardConfig) -> Result<[Task<Millis, Board>; TASK_COUNT], ConfigError> {
    Ok([Task::new("heartbeat", config.heartbeat.period_ms, heartbeat)?])
}

/// Toggle the heartbeat LED
pub fn heartbeat(board: &mut Board) {
    board.heartbeat_led.toggle();
}
