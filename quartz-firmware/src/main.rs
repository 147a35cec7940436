//! Quartz Arc - STM32F429I Discovery firmware
//!
//! Brings the board up from reset, then runs a single dispatch loop
//! driven by the SysTick millisecond count. There is no executor and no
//! other interrupt: the loop busy-polls the tick and fires each periodic
//! task whose accumulated time has reached its period.
//!
//! If any bring-up stage fails the loop is never entered. The firmware
//! logs the fault, lights the red LED when it can, and parks the core.

#![no_std]
#![no_main]

use core::convert::Infallible;

use cortex_m_rt::{entry, exception};
use defmt::*;
use {defmt_rtt as _, panic_probe as _};

use quartz_core::state::{launch, BootSequence};
use quartz_hal_stm32f4::systick;
use quartz_hal_stm32f4::OutputPin;

mod board;
mod config;
mod tasks;

use board::Fault;

/// Main entry point
#[entry]
fn main() -> ! {
    info!("Quartz Arc firmware starting...");

    let mut boot = BootSequence::new();
    let never: Infallible = launch(
        &mut boot,
        board::bring_up,
        |app| -> Infallible { app.run() },
        |fault| -> Infallible { halt(fault) },
    );
    match never {}
}

/// Millisecond tick
#[exception]
fn SysTick() {
    systick::on_tick();
}

/// Terminal state after a failed bring-up
fn halt(fault: Fault) -> ! {
    error!("Bring-up failed: {}", fault.error);

    let mut indicator = fault.indicator;
    match indicator.as_mut() {
        Some(led) => led.set_high(),
        None => warn!("No error LED available"),
    }

    loop {
        cortex_m::asm::nop();
    }
}
