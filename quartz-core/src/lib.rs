//! Board-agnostic core logic for the Quartz Arc firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Tick source abstraction and wraparound-safe tick arithmetic
//! - Periodic task accumulators and the cooperative dispatch loop
//! - Startup state machine with an explicit halt state
//! - Board configuration types and clock-plan validation

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod scheduler;
pub mod state;
pub mod traits;
