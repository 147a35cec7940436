//! Quartz Arc Hardware Abstraction Layer
//!
//! This crate defines the peripheral traits the firmware's task actions
//! and bring-up code are written against. Chip-specific crates implement
//! them on top of their vendor HAL.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (quartz-firmware)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  quartz-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            ┌─────────────────┐
//!            │  quartz-hal-    │
//!            │    stm32f4      │
//!            └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Status LEDs and other digital outputs
//!
//! [`gpio::Led`] adapts any infallible embedded-hal output to `OutputPin`.
//! - [`uart::UartTx`] - Serial console transmit

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod gpio;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::{Led, OutputPin};
pub use uart::{UartConfig, UartTx};
