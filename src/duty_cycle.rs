//! The wake/sense/animate loop.
//!
//! # Cycle
//!
//! ```text
//! wake ─► take flag ─► read light ─┬─ light: interval = LONG
//!                                  └─ dark:  interval = SHORT, play next pattern
//!      ◄─ sleep ◄─ re-arm timer ◄──┘
//! ```
//!
//! All main-loop state lives in [`CycleState`], owned by [`DutyCycle`]. The
//! only thing shared with interrupt context is the wake flag inside the
//! scheduler.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::light_sensor::LightSensor;
use crate::player::{Pattern, PatternPlayer};
use crate::pwm::PwmOutput;
use crate::sequencer::PatternSequencer;
use crate::wake::{SleepControl, WakeInterval, WakeScheduler, WakeTimer};

/// What a wake found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeOutcome {
    /// Daylight: nothing played, long interval armed.
    Light,
    /// Dark: the pattern was played, short interval armed.
    Dark(Pattern),
}

/// Main-loop state. Only the control loop reads or writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleState {
    /// Interval the wake timer is armed with
    pub interval: WakeInterval,
    /// Next pattern to play in the dark
    pub sequencer: PatternSequencer,
}

impl Default for CycleState {
    fn default() -> Self {
        Self {
            interval: WakeInterval::LONG,
            sequencer: PatternSequencer::new(),
        }
    }
}

/// Ties the sensor, player and scheduler into the device's duty cycle.
pub struct DutyCycle<'a, P, O, D, T, S> {
    sensor: LightSensor<P>,
    player: PatternPlayer<O, D>,
    scheduler: WakeScheduler<'a, T, S>,
    state: CycleState,
}

impl<'a, P, O, D, T, S> DutyCycle<'a, P, O, D, T, S>
where
    P: InputPin<Error = Infallible>,
    O: PwmOutput,
    D: DelayNs,
    T: WakeTimer,
    S: SleepControl,
{
    /// Creates the loop in its power-on state: long interval, pattern one next.
    pub fn new(
        sensor: LightSensor<P>,
        player: PatternPlayer<O, D>,
        scheduler: WakeScheduler<'a, T, S>,
    ) -> Self {
        Self::with_state(sensor, player, scheduler, CycleState::default())
    }

    /// Creates the loop from an explicit state.
    pub fn with_state(
        sensor: LightSensor<P>,
        player: PatternPlayer<O, D>,
        scheduler: WakeScheduler<'a, T, S>,
        state: CycleState,
    ) -> Self {
        Self {
            sensor,
            player,
            scheduler,
            state,
        }
    }

    pub fn state(&self) -> &CycleState {
        &self.state
    }

    /// Turns both LEDs off and arms the wake timer with the current interval.
    ///
    /// Call once before the first [`DutyCycle::service`].
    pub fn start(&mut self) {
        #[cfg(feature = "debug-mode")]
        defmt::info!("Starting duty cycle");

        self.player.blank();
        self.scheduler.arm(self.state.interval);
    }

    /// Handles one wake, then sleeps until the next.
    ///
    /// Returns `None` without sleeping when no wake is pending.
    pub fn service(&mut self) -> Option<WakeOutcome> {
        if !self.scheduler.take_wake() {
            return None;
        }

        let outcome = self.on_wake();

        self.scheduler.arm(self.state.interval);
        self.scheduler.sleep_until_wake();

        Some(outcome)
    }

    /// Runs the duty cycle forever.
    pub fn run(&mut self) -> ! {
        self.start();
        loop {
            self.service();
        }
    }

    fn on_wake(&mut self) -> WakeOutcome {
        let light_present = self.sensor.is_light_present();
        self.state.interval = WakeInterval::after_reading(light_present);

        if light_present {
            #[cfg(feature = "debug-mode")]
            defmt::debug!("Light present, skipping show");

            WakeOutcome::Light
        } else {
            let pattern = self.state.sequencer.next_pattern();

            #[cfg(feature = "debug-mode")]
            defmt::info!("Dark, performing {}", pattern);

            self.player.perform(pattern);
            WakeOutcome::Dark(pattern)
        }
    }
}
