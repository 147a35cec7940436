//! Clock plan to embassy RCC configuration
//!
//! The plan is validated first; embassy then performs the register
//! sequence (HSE on, PLL from HSE, flash latency, bus prescalers, switch
//! SYSCLK to PLL P). Embassy always leaves the regulator at scale 1 and the
//! flash accelerator off, so [`apply_voltage_scale`] and
//! [`enable_flash_accelerator`] finish the job after `embassy_stm32::init`.

use embassy_stm32::pac::pwr::vals::Vos;
use embassy_stm32::pac::{FLASH, PWR, RCC};
use embassy_stm32::rcc::{
    AHBPrescaler, APBPrescaler, Hse, HseMode, Pll, PllMul, PllPDiv, PllPreDiv, PllQDiv,
    PllSource, Sysclk,
};
use embassy_stm32::time::Hertz;
use embassy_stm32::Config;

use quartz_core::config::{ClockError, ClockPlan, Clocks, FlashAccess, VoltageScale};

/// Build the embassy init configuration for a clock plan
///
/// Returns the bus frequencies the plan produces alongside the config.
pub fn embassy_config(plan: &ClockPlan) -> Result<(Config, Clocks), ClockError> {
    let clocks = plan.validate()?;

    let mut config = Config::default();
    config.rcc.hse = Some(Hse {
        freq: Hertz(plan.hse_hz),
        mode: HseMode::Oscillator,
    });
    config.rcc.pll_src = PllSource::HSE;
    config.rcc.pll = Some(Pll {
        prediv: PllPreDiv::from_bits(plan.pll_m as u8),
        mul: PllMul::from_bits(plan.pll_n as u16),
        divp: Some(pll_p(plan.pll_p)?),
        divq: Some(PllQDiv::from_bits(plan.pll_q as u8)),
        divr: None,
    });
    config.rcc.sys = Sysclk::PLL1_P;
    config.rcc.ahb_pre = ahb_prescaler(plan.ahb_div)?;
    config.rcc.apb1_pre = apb_prescaler(plan.apb1_div).ok_or(ClockError::Apb1Divider)?;
    config.rcc.apb2_pre = apb_prescaler(plan.apb2_div).ok_or(ClockError::Apb2Divider)?;

    Ok((config, clocks))
}

/// Put the main regulator at `scale`
///
/// VOS only takes effect while the PLL is off, so SYSCLK runs from HSI
/// while the PLL is restarted. Must be called after `embassy_stm32::init`,
/// which leaves HSI enabled and the PWR clock on.
pub fn apply_voltage_scale(scale: VoltageScale) {
    let vos = Vos::from_bits(scale.vos_bits());
    if PWR.cr1().read().vos() == vos {
        return;
    }

    RCC.cfgr().modify(|w| w.set_sw(Sysclk::HSI));
    while RCC.cfgr().read().sws() != Sysclk::HSI {}
    RCC.cr().modify(|w| w.set_pllon(false));
    while RCC.cr().read().pllrdy() {}

    PWR.cr1().modify(|w| w.set_vos(vos));

    RCC.cr().modify(|w| w.set_pllon(true));
    while !RCC.cr().read().pllrdy() {}
    RCC.cfgr().modify(|w| w.set_sw(Sysclk::PLL1_P));
    while RCC.cfgr().read().sws() != Sysclk::PLL1_P {}
}

/// Turn on the prefetch buffer and the flash caches
pub fn enable_flash_accelerator(access: &FlashAccess) {
    FLASH.acr().modify(|w| {
        w.set_prften(access.prefetch);
        w.set_icen(access.instruction_cache);
        w.set_dcen(access.data_cache);
    });
}

fn pll_p(div: u32) -> Result<PllPDiv, ClockError> {
    match div {
        2 => Ok(PllPDiv::DIV2),
        4 => Ok(PllPDiv::DIV4),
        6 => Ok(PllPDiv::DIV6),
        8 => Ok(PllPDiv::DIV8),
        _ => Err(ClockError::PllP),
    }
}

fn ahb_prescaler(div: u32) -> Result<AHBPrescaler, ClockError> {
    match div {
        1 => Ok(AHBPrescaler::DIV1),
        2 => Ok(AHBPrescaler::DIV2),
        4 => Ok(AHBPrescaler::DIV4),
        8 => Ok(AHBPrescaler::DIV8),
        16 => Ok(AHBPrescaler::DIV16),
        64 => Ok(AHBPrescaler::DIV64),
        128 => Ok(AHBPrescaler::DIV128),
        256 => Ok(AHBPrescaler::DIV256),
        512 => Ok(AHBPrescaler::DIV512),
        _ => Err(ClockError::AhbDivider),
    }
}

fn apb_prescaler(div: u32) -> Option<APBPrescaler> {
    match div {
        1 => Some(APBPrescaler::DIV1),
        2 => Some(APBPrescaler::DIV2),
        4 => Some(APBPrescaler::DIV4),
        8 => Some(APBPrescaler::DIV8),
        16 => Some(APBPrescaler::DIV16),
        _ => None,
    }
}
