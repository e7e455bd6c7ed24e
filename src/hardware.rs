//! Hardware abstraction and peripheral initialization.
//!
//! This module defines the pin mappings and the one-time peripheral setup
//! for the night light board.
//!
//! # Pin Assignments
//!
//! ## LEDs (TIM2, 8-bit PWM)
//! - **PA0**: TIM2_CH1 - LED1
//! - **PA1**: TIM2_CH2 - LED2
//!
//! ## Sensing
//! - **PA4**: SOLAR_SENSE - Solar cell sense line, internal pull-up (high = dark)
//! - **PA5**: AUX - Internal pull-up, reserved (unused)
//!
//! ## Low Power & RTC
//! - **PC14**: OSC32_IN - 32.768 kHz crystal input
//! - **PC15**: OSC32_OUT - 32.768 kHz crystal output
//!
//! ## Debug (SWD)
//! - **PA13**: SWDIO
//! - **PA14**: SWCLK

use cortex_m::peripheral::SCB;
use embassy_stm32::gpio::{Input, OutputType, Pull};
use embassy_stm32::peripherals::TIM2;
use embassy_stm32::time::Hertz;
use embassy_stm32::timer::low_level::CountingMode;
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm, SimplePwmChannel};
use twinkle::{LedDriver, LightSensor, PwmChannel};

use crate::power::{RtcWakeTimer, StopMode};

/// PWM carrier frequency for both LEDs.
///
/// Fast enough to be flicker free, slow enough to keep the full 8-bit
/// resolution on the 66 kHz MSI clock.
const PWM_FREQUENCY: Hertz = Hertz::hz(250);

/// One TIM2 compare channel driving an LED.
pub struct PwmLed {
    channel: SimplePwmChannel<'static, TIM2>,
}

impl PwmLed {
    fn new(mut channel: SimplePwmChannel<'static, TIM2>) -> Self {
        channel.disable();
        Self { channel }
    }
}

impl PwmChannel for PwmLed {
    fn enable(&mut self) {
        self.channel.enable();
    }

    /// Clears CCxE, so the compare output stops driving the pin and it idles low.
    fn disable(&mut self) {
        self.channel.disable();
    }

    fn set_duty(&mut self, duty: u8) {
        self.channel
            .set_duty_cycle_fraction(u16::from(duty), u16::from(u8::MAX));
    }
}

/// Top-level peripheral container for the night light.
///
/// Owns all hardware the duty cycle needs, already configured.
pub struct Peripherals {
    /// Both LED channels
    pub leds: LedDriver<PwmLed, PwmLed>,
    /// Solar cell sense input
    pub light_sensor: LightSensor<Input<'static>>,
    /// RTC wakeup timer
    pub wake_timer: RtcWakeTimer,
    /// STOP mode entry and ADC power
    pub sleep: StopMode,
    /// Reserved input, held with a pull-up so it does not float
    _aux: Input<'static>,
}

impl Peripherals {
    /// Initializes all peripherals from the STM32 peripheral singleton.
    ///
    /// # Initial States
    ///
    /// - PA0/PA1: TIM2 compare outputs, both disabled (LEDs off)
    /// - PA4: Input, pull-up
    /// - PA5: Input, pull-up
    /// - RTC wakeup: configured by [`RtcWakeTimer::new`], not yet started
    ///
    /// # Arguments
    ///
    /// * `p` - STM32 peripheral singleton from embassy_stm32::init()
    /// * `scb` - Cortex-M system control block, used to select deep sleep
    pub fn new(p: embassy_stm32::Peripherals, scb: SCB) -> Self {
        let pwm = SimplePwm::new(
            p.TIM2,
            Some(PwmPin::new(p.PA0, OutputType::PushPull)),
            Some(PwmPin::new(p.PA1, OutputType::PushPull)),
            None,
            None,
            PWM_FREQUENCY,
            CountingMode::EdgeAlignedUp,
        );
        let channels = pwm.split();

        Self {
            leds: LedDriver::new(PwmLed::new(channels.ch1), PwmLed::new(channels.ch2)),
            light_sensor: LightSensor::new(Input::new(p.PA4, Pull::Up)),
            wake_timer: RtcWakeTimer::new(),
            sleep: StopMode::new(scb),
            _aux: Input::new(p.PA5, Pull::Up),
        }
    }
}
