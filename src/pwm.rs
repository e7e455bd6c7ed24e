//! PWM output for the two LED channels.
//!
//! A level of zero does not just set a zero duty cycle: it disables the
//! compare output entirely so the pin is released to a low, non-driving
//! state and no leakage current flows through the output driver.

/// One of the two LED outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// First LED, on the first compare output.
    Led1,
    /// Second LED, on the second compare output.
    Led2,
}

impl Channel {
    /// Both channels, in output order.
    pub const ALL: [Channel; 2] = [Channel::Led1, Channel::Led2];
}

/// Sets channel brightness. Implementations cannot fail.
pub trait PwmOutput {
    /// Sets `channel` to `level` on an 8-bit scale; 0 releases the output.
    fn set(&mut self, channel: Channel, level: u8);

    /// Drives every channel to 0.
    fn blank(&mut self) {
        for channel in Channel::ALL {
            self.set(channel, 0);
        }
    }
}

/// A single hardware PWM compare channel.
///
/// Implement this for the timer channel driving one LED.
pub trait PwmChannel {
    /// Connects the compare output to the pin.
    fn enable(&mut self);

    /// Disconnects the compare output and leaves the pin low and undriven.
    fn disable(&mut self);

    /// Sets the duty cycle, 255 being fully on.
    fn set_duty(&mut self, duty: u8);
}

/// Drives two LEDs from two PWM compare channels.
///
/// Owns both channels and maps [`Channel`] to the right one.
pub struct LedDriver<A, B> {
    /// Compare channel wired to LED1
    led1: A,
    /// Compare channel wired to LED2
    led2: B,
}

impl<A: PwmChannel, B: PwmChannel> LedDriver<A, B> {
    /// Creates a driver from the two compare channels.
    ///
    /// # Arguments
    ///
    /// * `led1` - Compare channel wired to LED1
    /// * `led2` - Compare channel wired to LED2
    pub fn new(led1: A, led2: B) -> Self {
        Self { led1, led2 }
    }

    /// Returns the two channels, LED1 first.
    pub fn release(self) -> (A, B) {
        (self.led1, self.led2)
    }

    fn write(pwm: &mut impl PwmChannel, level: u8) {
        if level == 0 {
            pwm.disable();
        } else {
            pwm.enable();
            pwm.set_duty(level);
        }
    }
}

impl<A: PwmChannel, B: PwmChannel> PwmOutput for LedDriver<A, B> {
    fn set(&mut self, channel: Channel, level: u8) {
        match channel {
            Channel::Led1 => Self::write(&mut self.led1, level),
            Channel::Led2 => Self::write(&mut self.led2, level),
        }
    }
}
