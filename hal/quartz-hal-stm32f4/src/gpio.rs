//! Status LEDs
//!
//! The Discovery board's user LEDs are active high on push-pull outputs.

use embassy_stm32::gpio::Output;

pub use quartz_hal::Led;

/// LED on an embassy-stm32 push-pull output
pub type BoardLed = Led<Output<'static>>;
