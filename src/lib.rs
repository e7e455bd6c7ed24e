//! Core logic for a solar-powered two-channel LED night light.
//!
//! # Overview
//!
//! The device sleeps almost all of the time. A periodic wake timer raises a
//! flag from its interrupt handler; the main loop then:
//! - reads the ambient light sensor,
//! - with light present, stretches the wake interval to 8 seconds and goes
//!   back to sleep,
//! - in the dark, shortens the interval to 4 seconds and plays the next fade
//!   pattern on the LEDs before sleeping again.
//!
//! Everything in this crate is hardware agnostic. The firmware binary
//! implements the small traits at the hardware seams ([`PwmChannel`],
//! [`WakeTimer`], [`SleepControl`]) and hands embedded-hal pins and delays to
//! the generic types here.
//!
//! # Module Organization
//!
//! - [`fade_table`] - Static brightness ramps
//! - [`pwm`] - LED channels and the zero-disables-output PWM write
//! - [`player`] - Pattern definitions and playback
//! - [`sequencer`] - Round-robin pattern selection
//! - [`light_sensor`] - Ambient light input
//! - [`wake`] - Wake intervals, wake flag and the sleep scheduler
//! - [`duty_cycle`] - Main-loop state and control loop

#![cfg_attr(not(test), no_std)]

pub mod duty_cycle;
pub mod fade_table;
pub mod light_sensor;
pub mod player;
pub mod pwm;
pub mod sequencer;
pub mod wake;

pub use duty_cycle::{CycleState, DutyCycle, WakeOutcome};
pub use fade_table::{FADE_IN, FADE_OUT, FADE_OUT_SHORT, FULL_ON, FadeTable};
pub use light_sensor::LightSensor;
pub use player::{Pattern, PatternPlayer, Scale, Segment};
pub use pwm::{Channel, LedDriver, PwmChannel, PwmOutput};
pub use sequencer::PatternSequencer;
pub use wake::{SleepControl, WakeFlag, WakeInterval, WakeScheduler, WakeTimer};
