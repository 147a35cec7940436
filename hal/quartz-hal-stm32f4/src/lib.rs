//! STM32F4-specific HAL for the Quartz Arc firmware
//!
//! This crate binds the `quartz-hal` traits and the `quartz-core` tick
//! source to embassy-stm32 and the Cortex-M SysTick. It supports:
//!
//! - STM32F429ZI (STM32F429I Discovery)
//!
//! # Features
//!
//! - `stm32f429zi` - Enable support for the STM32F429ZI
//! - `defmt` - Enable debug formatting support
//!
//! # Modules
//!
//! - [`gpio`] - Status LEDs
//! - [`uart`] - Blocking console transmitter
//! - [`rcc`] - Clock plan to embassy RCC configuration
//! - [`systick`] - Millisecond tick counter

#![no_std]

pub mod gpio;
pub mod rcc;
pub mod systick;
pub mod uart;

// Re-export shared traits from quartz-hal for convenience
pub use quartz_hal::{OutputPin, UartConfig, UartTx};
