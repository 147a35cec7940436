//! Board configuration
//!
//! Generated by build.rs from quartz.toml, which has already been
//! validated on the host. Bring-up validates it once more before touching
//! any clock register.

use quartz_core::config::{
    BoardConfig, ClockPlan, HeartbeatConfig, TickConfig, UartSettings, VoltageScale,
};

include!(concat!(env!("OUT_DIR"), "/board_config.rs"));
