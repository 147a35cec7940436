//! SysTick millisecond counter
//!
//! The SysTick exception is the only interrupt the firmware enables. Its
//! handler bumps a wrapping 32-bit counter; the dispatch loop reads it
//! with a single load.

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;
use portable_atomic::{AtomicU32, Ordering};

use quartz_core::config::{systick_reload, ConfigError};
use quartz_core::traits::{Millis, TickSource};

/// Ticks since SysTick was started, wrapping at `u32::MAX`
static TICKS: AtomicU32 = AtomicU32::new(0);

/// Advance the counter by one tick
///
/// Call from the `SysTick` exception handler only.
#[inline]
pub fn on_tick() {
    TICKS.fetch_add(1, Ordering::Relaxed);
}

/// Running SysTick counter
pub struct SysTickSource {
    _syst: SYST,
}

impl SysTickSource {
    /// Program SysTick to interrupt `rate_hz` times per second from HCLK
    ///
    /// Fails with [`ConfigError::TickRate`] if the period does not fit the
    /// 24-bit reload register.
    pub fn start(mut syst: SYST, hclk_hz: u32, rate_hz: u32) -> Result<Self, ConfigError> {
        let reload = systick_reload(hclk_hz, rate_hz).ok_or(ConfigError::TickRate)?;

        syst.disable_counter();
        syst.set_clock_source(SystClkSource::Core);
        syst.set_reload(reload);
        syst.clear_current();
        syst.enable_interrupt();
        syst.enable_counter();

        Ok(Self { _syst: syst })
    }
}

impl TickSource for SysTickSource {
    type Count = Millis;

    fn now(&self) -> Millis {
        TICKS.load(Ordering::Relaxed)
    }
}
