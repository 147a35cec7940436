//! Clock tree configuration
//!
//! Describes the oscillator, main PLL and bus dividers of an STM32F42x/43x
//! and checks a plan against the datasheet limits before any register is
//! touched.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const MHZ: u32 = 1_000_000;

/// HSE crystal range
const HSE_MIN_HZ: u32 = 4 * MHZ;
const HSE_MAX_HZ: u32 = 26 * MHZ;

/// PLL input (after M) range
const VCO_IN_MIN_HZ: u32 = MHZ;
const VCO_IN_MAX_HZ: u32 = 2 * MHZ;

/// PLL VCO output range
const VCO_OUT_MIN_HZ: u32 = 100 * MHZ;
const VCO_OUT_MAX_HZ: u32 = 432 * MHZ;

/// APB bus limits
const PCLK1_MAX_HZ: u32 = 45 * MHZ;
const PCLK2_MAX_HZ: u32 = 90 * MHZ;

/// Required PLL Q output when USB/SDIO clocking is requested
const PLL48_HZ: u32 = 48 * MHZ;

/// HCLK covered by each flash wait state at 2.7-3.6 V
const FLASH_WAIT_STATE_HZ: u32 = 30 * MHZ;

/// Largest SysTick reload value (24-bit counter)
const SYSTICK_RELOAD_MAX: u32 = 0x00FF_FFFF;

/// Main regulator output voltage scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VoltageScale {
    Scale1,
    Scale2,
    #[default]
    Scale3,
}

impl VoltageScale {
    /// Highest HCLK allowed at this scale (no over-drive)
    pub const fn max_hclk_hz(self) -> u32 {
        match self {
            VoltageScale::Scale1 => 168 * MHZ,
            VoltageScale::Scale2 => 144 * MHZ,
            VoltageScale::Scale3 => 120 * MHZ,
        }
    }

    /// Value of the PWR_CR VOS field selecting this scale
    pub const fn vos_bits(self) -> u8 {
        match self {
            VoltageScale::Scale1 => 0b11,
            VoltageScale::Scale2 => 0b10,
            VoltageScale::Scale3 => 0b01,
        }
    }
}

/// Clock plan rejected by [`ClockPlan::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// HSE frequency outside 4-26 MHz
    HseOutOfRange,
    /// PLL M outside 2-63
    PllM,
    /// PLL N outside 50-432
    PllN,
    /// PLL P not one of 2, 4, 6, 8
    PllP,
    /// PLL Q outside 2-15
    PllQ,
    /// HSE / M outside 1-2 MHz
    VcoInput,
    /// VCO output outside 100-432 MHz
    VcoOutput,
    /// SYSCLK above the limit for the voltage scale
    Sysclk,
    /// AHB divider not a supported power of two
    AhbDivider,
    /// APB1 divider not 1, 2, 4, 8 or 16
    Apb1Divider,
    /// APB2 divider not 1, 2, 4, 8 or 16
    Apb2Divider,
    /// PCLK1 above 45 MHz
    Pclk1,
    /// PCLK2 above 90 MHz
    Pclk2,
    /// PLL Q output is not 48 MHz although USB clocking is required
    UsbClock,
}

impl core::fmt::Display for ClockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            ClockError::HseOutOfRange => "HSE frequency must be 4-26 MHz",
            ClockError::PllM => "PLL M must be 2-63",
            ClockError::PllN => "PLL N must be 50-432",
            ClockError::PllP => "PLL P must be 2, 4, 6 or 8",
            ClockError::PllQ => "PLL Q must be 2-15",
            ClockError::VcoInput => "PLL input (HSE / M) must be 1-2 MHz",
            ClockError::VcoOutput => "PLL VCO output must be 100-432 MHz",
            ClockError::Sysclk => "SYSCLK exceeds the voltage scale limit",
            ClockError::AhbDivider => "AHB divider must be 1, 2, 4, 8, 16, 64, 128, 256 or 512",
            ClockError::Apb1Divider => "APB1 divider must be 1, 2, 4, 8 or 16",
            ClockError::Apb2Divider => "APB2 divider must be 1, 2, 4, 8 or 16",
            ClockError::Pclk1 => "APB1 clock exceeds 45 MHz",
            ClockError::Pclk2 => "APB2 clock exceeds 90 MHz",
            ClockError::UsbClock => "PLL Q output must be exactly 48 MHz for USB",
        };
        f.write_str(msg)
    }
}

/// Oscillator, PLL and bus divider settings
///
/// SYSCLK is always taken from the main PLL P output, fed from HSE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockPlan {
    /// External crystal frequency
    pub hse_hz: u32,
    /// PLL input divider
    pub pll_m: u32,
    /// VCO multiplier
    pub pll_n: u32,
    /// SYSCLK divider
    pub pll_p: u32,
    /// 48 MHz domain divider
    pub pll_q: u32,
    /// SYSCLK to HCLK divider
    pub ahb_div: u32,
    /// HCLK to PCLK1 divider
    pub apb1_div: u32,
    /// HCLK to PCLK2 divider
    pub apb2_div: u32,
    /// Regulator voltage scale
    #[cfg_attr(feature = "serde", serde(default))]
    pub voltage_scale: VoltageScale,
    /// Require the PLL Q output to be exactly 48 MHz
    #[cfg_attr(feature = "serde", serde(default))]
    pub usb_clock: bool,
}

impl ClockPlan {
    /// STM32F429I-DISC1 plan: 8 MHz HSE, 72 MHz SYSCLK, 48 MHz PLL Q
    pub const DISCOVERY: ClockPlan = ClockPlan {
        hse_hz: 8 * MHZ,
        pll_m: 8,
        pll_n: 144,
        pll_p: 2,
        pll_q: 3,
        ahb_div: 1,
        apb1_div: 4,
        apb2_div: 2,
        voltage_scale: VoltageScale::Scale3,
        usb_clock: true,
    };

    /// Check the plan and compute the resulting bus frequencies
    pub fn validate(&self) -> Result<Clocks, ClockError> {
        if !(HSE_MIN_HZ..=HSE_MAX_HZ).contains(&self.hse_hz) {
            return Err(ClockError::HseOutOfRange);
        }
        if !(2..=63).contains(&self.pll_m) {
            return Err(ClockError::PllM);
        }
        if !(50..=432).contains(&self.pll_n) {
            return Err(ClockError::PllN);
        }
        if !matches!(self.pll_p, 2 | 4 | 6 | 8) {
            return Err(ClockError::PllP);
        }
        if !(2..=15).contains(&self.pll_q) {
            return Err(ClockError::PllQ);
        }

        let vco_in = self.hse_hz / self.pll_m;
        if !(VCO_IN_MIN_HZ..=VCO_IN_MAX_HZ).contains(&vco_in) {
            return Err(ClockError::VcoInput);
        }

        // N <= 432 and vco_in <= 2 MHz, so this fits in u32
        let vco_out = vco_in * self.pll_n;
        if !(VCO_OUT_MIN_HZ..=VCO_OUT_MAX_HZ).contains(&vco_out) {
            return Err(ClockError::VcoOutput);
        }

        let sysclk = vco_out / self.pll_p;
        let pll48 = vco_out / self.pll_q;

        if !matches!(self.ahb_div, 1 | 2 | 4 | 8 | 16 | 64 | 128 | 256 | 512) {
            return Err(ClockError::AhbDivider);
        }
        if !matches!(self.apb1_div, 1 | 2 | 4 | 8 | 16) {
            return Err(ClockError::Apb1Divider);
        }
        if !matches!(self.apb2_div, 1 | 2 | 4 | 8 | 16) {
            return Err(ClockError::Apb2Divider);
        }

        let hclk = sysclk / self.ahb_div;
        if sysclk > self.voltage_scale.max_hclk_hz() {
            return Err(ClockError::Sysclk);
        }

        let pclk1 = hclk / self.apb1_div;
        if pclk1 > PCLK1_MAX_HZ {
            return Err(ClockError::Pclk1);
        }
        let pclk2 = hclk / self.apb2_div;
        if pclk2 > PCLK2_MAX_HZ {
            return Err(ClockError::Pclk2);
        }

        if self.usb_clock && pll48 != PLL48_HZ {
            return Err(ClockError::UsbClock);
        }

        Ok(Clocks {
            sysclk,
            hclk,
            pclk1,
            pclk2,
            pll48,
        })
    }
}

impl Default for ClockPlan {
    fn default() -> Self {
        Self::DISCOVERY
    }
}

/// Bus frequencies produced by a valid [`ClockPlan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Clocks {
    /// System clock (Hz)
    pub sysclk: u32,
    /// AHB / core clock (Hz)
    pub hclk: u32,
    /// APB1 peripheral clock (Hz)
    pub pclk1: u32,
    /// APB2 peripheral clock (Hz)
    pub pclk2: u32,
    /// PLL Q output (Hz)
    pub pll48: u32,
}

impl Clocks {
    /// Flash wait states needed at HCLK for a 2.7-3.6 V supply
    pub const fn flash_latency(&self) -> u32 {
        self.hclk.div_ceil(FLASH_WAIT_STATE_HZ).saturating_sub(1)
    }

    /// Flash interface settings for this HCLK
    pub const fn flash_access(&self) -> FlashAccess {
        let wait_states = self.flash_latency();
        FlashAccess {
            wait_states,
            prefetch: wait_states > 0,
            instruction_cache: true,
            data_cache: true,
        }
    }
}

/// Flash access control (FLASH_ACR) settings
///
/// The caches and prefetch buffer make up the ART accelerator; without
/// them every wait state stalls the core on a flash fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlashAccess {
    /// Wait states (LATENCY)
    pub wait_states: u32,
    /// Prefetch buffer (PRFTEN)
    pub prefetch: bool,
    /// Instruction cache (ICEN)
    pub instruction_cache: bool,
    /// Data cache (DCEN)
    pub data_cache: bool,
}

/// SysTick reload value for `rate_hz` interrupts per second
///
/// Fails if the rate is zero or the period does not fit the 24-bit counter.
pub fn systick_reload(hclk_hz: u32, rate_hz: u32) -> Option<u32> {
    if rate_hz == 0 {
        return None;
    }
    let reload = (hclk_hz / rate_hz).checked_sub(1)?;
    if reload == 0 || reload > SYSTICK_RELOAD_MAX {
        return None;
    }
    Some(reload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_plan() {
        let clocks = ClockPlan::DISCOVERY.validate().unwrap();
        assert_eq!(clocks.sysclk, 72 * MHZ);
        assert_eq!(clocks.hclk, 72 * MHZ);
        assert_eq!(clocks.pclk1, 18 * MHZ);
        assert_eq!(clocks.pclk2, 36 * MHZ);
        assert_eq!(clocks.pll48, 48 * MHZ);
        assert_eq!(clocks.flash_latency(), 2);
    }

    #[test]
    fn test_flash_access_enables_accelerator() {
        let access = ClockPlan::DISCOVERY.validate().unwrap().flash_access();
        assert_eq!(
            access,
            FlashAccess {
                wait_states: 2,
                prefetch: true,
                instruction_cache: true,
                data_cache: true,
            }
        );
    }

    #[test]
    fn test_no_prefetch_without_wait_states() {
        // 72 MHz / 4 = 18 MHz HCLK
        let plan = ClockPlan {
            ahb_div: 4,
            apb1_div: 1,
            apb2_div: 1,
            ..ClockPlan::DISCOVERY
        };
        let access = plan.validate().unwrap().flash_access();
        assert_eq!(access.wait_states, 0);
        assert!(!access.prefetch);
        assert!(access.instruction_cache);
        assert!(access.data_cache);
    }

    #[test]
    fn test_vos_encoding() {
        assert_eq!(VoltageScale::Scale1.vos_bits(), 0b11);
        assert_eq!(VoltageScale::Scale2.vos_bits(), 0b10);
        assert_eq!(VoltageScale::Scale3.vos_bits(), 0b01);
        assert_eq!(ClockPlan::DISCOVERY.voltage_scale.vos_bits(), 0b01);
    }

    #[test]
    fn test_full_speed_plan() {
        let plan = ClockPlan {
            pll_m: 4,
            pll_n: 168,
            pll_q: 7,
            voltage_scale: VoltageScale::Scale1,
            ..ClockPlan::DISCOVERY
        };
        let clocks = plan.validate().unwrap();
        assert_eq!(clocks.sysclk, 168 * MHZ);
        assert_eq!(clocks.pclk1, 42 * MHZ);
        assert_eq!(clocks.pclk2, 84 * MHZ);
        assert_eq!(clocks.flash_latency(), 5);
    }

    #[test]
    fn test_sysclk_limited_by_voltage_scale() {
        let plan = ClockPlan {
            pll_m: 4,
            pll_n: 168,
            pll_q: 7,
            ..ClockPlan::DISCOVERY
        };
        assert_eq!(plan.validate(), Err(ClockError::Sysclk));
    }

    #[test]
    fn test_pll_range_errors() {
        let cases = [
            (ClockPlan { hse_hz: 3 * MHZ, ..ClockPlan::DISCOVERY }, ClockError::HseOutOfRange),
            (ClockPlan { pll_m: 1, ..ClockPlan::DISCOVERY }, ClockError::PllM),
            (ClockPlan { pll_n: 49, ..ClockPlan::DISCOVERY }, ClockError::PllN),
            (ClockPlan { pll_p: 3, ..ClockPlan::DISCOVERY }, ClockError::PllP),
            (ClockPlan { pll_q: 16, ..ClockPlan::DISCOVERY }, ClockError::PllQ),
            (ClockPlan { pll_m: 16, ..ClockPlan::DISCOVERY }, ClockError::VcoInput),
            (ClockPlan { pll_n: 60, ..ClockPlan::DISCOVERY }, ClockError::VcoOutput),
        ];

        for (plan, expected) in cases {
            assert_eq!(plan.validate(), Err(expected));
        }
    }

    #[test]
    fn test_bus_divider_errors() {
        let cases = [
            (ClockPlan { ahb_div: 32, ..ClockPlan::DISCOVERY }, ClockError::AhbDivider),
            (ClockPlan { apb1_div: 3, ..ClockPlan::DISCOVERY }, ClockError::Apb1Divider),
            (ClockPlan { apb2_div: 32, ..ClockPlan::DISCOVERY }, ClockError::Apb2Divider),
            (ClockPlan { apb1_div: 1, ..ClockPlan::DISCOVERY }, ClockError::Pclk1),
        ];

        for (plan, expected) in cases {
            assert_eq!(plan.validate(), Err(expected));
        }
    }

    #[test]
    fn test_pclk2_limit() {
        let plan = ClockPlan {
            pll_m: 4,
            pll_n: 168,
            pll_q: 7,
            apb2_div: 1,
            voltage_scale: VoltageScale::Scale1,
            ..ClockPlan::DISCOVERY
        };
        assert_eq!(plan.validate(), Err(ClockError::Pclk2));
    }

    #[test]
    fn test_usb_clock_required() {
        let plan = ClockPlan {
            pll_q: 4,
            ..ClockPlan::DISCOVERY
        };
        assert_eq!(plan.validate(), Err(ClockError::UsbClock));

        let relaxed = ClockPlan {
            usb_clock: false,
            ..plan
        };
        assert_eq!(relaxed.validate().unwrap().pll48, 36 * MHZ);
    }

    #[test]
    fn test_systick_reload() {
        assert_eq!(systick_reload(72 * MHZ, 1000), Some(71_999));
        assert_eq!(systick_reload(168 * MHZ, 1000), Some(167_999));
        assert_eq!(systick_reload(72 * MHZ, 0), None);
        // 72 MHz / 1 Hz needs more than 24 bits
        assert_eq!(systick_reload(72 * MHZ, 1), None);
        assert_eq!(systick_reload(1000, 1000), None);
    }
}
