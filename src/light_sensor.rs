//! Ambient light detection.
//!
//! The sense line sits on the solar cell behind an internal pull-up. In
//! daylight the cell pulls the line low; in the dark the pull-up wins and the
//! line reads high. One sample per wake is all the sensing there is: the
//! wake period is seconds long, so there is nothing to debounce.

use core::convert::Infallible;

use embedded_hal::digital::InputPin;

/// Reads the light sense line with inverted polarity.
pub struct LightSensor<P> {
    /// Sense input, high when dark
    pin: P,
}

impl<P: InputPin<Error = Infallible>> LightSensor<P> {
    /// Creates a sensor on `pin`, which must be configured with a pull-up.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// True when enough ambient light reaches the cell.
    pub fn is_light_present(&mut self) -> bool {
        let Ok(dark) = self.pin.is_high();
        !dark
    }

    /// Returns the sense pin.
    pub fn release(self) -> P {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::ErrorType;

    struct Line(bool);

    impl ErrorType for Line {
        type Error = Infallible;
    }

    impl InputPin for Line {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0)
        }
    }

    #[test]
    fn low_line_means_light() {
        assert!(LightSensor::new(Line(false)).is_light_present());
    }

    #[test]
    fn high_line_means_dark() {
        assert!(!LightSensor::new(Line(true)).is_light_present());
    }
}
