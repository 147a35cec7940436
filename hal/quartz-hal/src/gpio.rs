//! GPIO output abstraction
//!
//! Status indicators are plain push-pull outputs; this is the only pin
//! capability the firmware needs.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin as DigitalOutput};

/// Digital output pin
///
/// Implementations handle the register access for the specific chip and
/// hide any active-low wiring, so `set_high` always means "on".
pub trait OutputPin {
    /// Drive the output on
    fn set_high(&mut self);

    /// Drive the output off
    fn set_low(&mut self);

    /// Invert the output
    fn toggle(&mut self) {
        if self.is_set_high() {
            self.set_low();
        } else {
            self.set_high();
        }
    }

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently driven on
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently driven off
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

impl<P: OutputPin + ?Sized> OutputPin for &mut P {
    fn set_high(&mut self) {
        (**self).set_high();
    }

    fn set_low(&mut self) {
        (**self).set_low();
    }

    fn toggle(&mut self) {
        (**self).toggle();
    }

    fn is_set_high(&self) -> bool {
        (**self).is_set_high()
    }
}

/// Status LED on an infallible embedded-hal output
///
/// Tracks the logical state, so `is_set_high` never needs a register read.
pub struct Led<P> {
    pin: P,
    on: bool,
}

impl<P> Led<P>
where
    P: DigitalOutput + ErrorType<Error = Infallible>,
{
    /// Take the pin and switch the LED off
    pub fn new(pin: P) -> Self {
        let mut led = Self { pin, on: true };
        led.set_low();
        led
    }

    fn drive(&mut self, on: bool) {
        let result = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.unwrap_or_else(|never| match never {});
        self.on = on;
    }
}

impl<P> OutputPin for Led<P>
where
    P: DigitalOutput + ErrorType<Error = Infallible>,
{
    fn set_high(&mut self) {
        self.drive(true);
    }

    fn set_low(&mut self) {
        self.drive(false);
    }

    fn toggle(&mut self) {
        self.drive(!self.on);
    }

    fn is_set_high(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakePin {
        high: bool,
        writes: u32,
    }

    impl OutputPin for FakePin {
        fn set_high(&mut self) {
            self.high = true;
            self.writes += 1;
        }

        fn set_low(&mut self) {
            self.high = false;
            self.writes += 1;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_default_toggle() {
        let mut pin = FakePin::default();
        pin.toggle();
        assert!(pin.is_set_high());
        pin.toggle();
        assert!(pin.is_set_low());
        assert_eq!(pin.writes, 2);
    }

    #[test]
    fn test_set_state() {
        let mut pin = FakePin::default();
        pin.set_state(true);
        assert!(pin.is_set_high());
        pin.set_state(false);
        assert!(!pin.is_set_high());
    }

    fn pulse<P: OutputPin>(mut pin: P) {
        pin.set_high();
        pin.toggle();
    }

    #[test]
    fn test_through_reference() {
        let mut pin = FakePin::default();
        pulse(&mut pin);
        assert!(pin.is_set_low());
        assert_eq!(pin.writes, 2);
    }

    /// Records the level an embedded-hal driver would put on the wire
    struct WireLevel {
        high: bool,
        writes: u32,
    }

    impl ErrorType for WireLevel {
        type Error = Infallible;
    }

    impl DigitalOutput for WireLevel {
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            self.writes += 1;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_led_starts_off() {
        let led = Led::new(WireLevel {
            high: true,
            writes: 0,
        });
        assert!(led.is_set_low());
        assert!(!led.pin.high);
        assert_eq!(led.pin.writes, 1);
    }

    #[test]
    fn test_led_drives_pin() {
        let mut led = Led::new(WireLevel {
            high: false,
            writes: 0,
        });
        led.set_high();
        assert!(led.is_set_high());
        assert!(led.pin.high);
        led.set_state(false);
        assert!(led.is_set_low());
        assert!(!led.pin.high);
    }

    #[test]
    fn test_led_toggle_tracks_state() {
        let mut led = Led::new(WireLevel {
            high: false,
            writes: 0,
        });
        for expected in [true, false, true] {
            led.toggle();
            assert_eq!(led.is_set_high(), expected);
            assert_eq!(led.pin.high, expected);
        }
        // initial switch-off plus three toggles
        assert_eq!(led.pin.writes, 4);
    }
}
