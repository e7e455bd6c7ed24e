//! Shared test infrastructure for twinkle integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};
use twinkle::{Channel, PwmOutput, SleepControl, WakeFlag, WakeInterval, WakeTimer};

// ============================================================================
// Event Log
// ============================================================================

/// Everything the mocks observe, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Set(Channel, u8),
    Delay(u32),
    Arm(WakeInterval),
    AnalogOff,
    AnalogOn,
    Sleep,
}

/// Event log shared between all mocks of one test
#[derive(Clone, Default)]
pub struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Levels written to `channel`, in order
    pub fn writes_on(&self, channel: Channel) -> Vec<u8> {
        self.0
            .borrow()
            .iter()
            .filter_map(|event| match *event {
                Event::Set(ch, level) if ch == channel => Some(level),
                _ => None,
            })
            .collect()
    }

    /// Every delay requested, in milliseconds
    pub fn delays(&self) -> Vec<u32> {
        self.0
            .borrow()
            .iter()
            .filter_map(|event| match *event {
                Event::Delay(ms) => Some(ms),
                _ => None,
            })
            .collect()
    }

    /// Every interval the wake timer was armed with
    pub fn arms(&self) -> Vec<WakeInterval> {
        self.0
            .borrow()
            .iter()
            .filter_map(|event| match *event {
                Event::Arm(interval) => Some(interval),
                _ => None,
            })
            .collect()
    }
}

// ============================================================================
// Mock PWM and Delay
// ============================================================================

/// PWM output that records every write
pub struct MockPwm {
    log: Log,
}

impl MockPwm {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl PwmOutput for MockPwm {
    fn set(&mut self, channel: Channel, level: u8) {
        self.log.push(Event::Set(channel, level));
    }
}

/// Delay that records the requested wait instead of blocking
pub struct MockDelay {
    log: Log,
}

impl MockDelay {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::Delay(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::Delay(ms));
    }
}

// ============================================================================
// Mock Sense Line
// ============================================================================

/// Sense line replaying scripted readings; the last one repeats forever
pub struct MockSense {
    dark_readings: VecDeque<bool>,
    last: bool,
}

impl MockSense {
    /// Line that always reads dark (high)
    pub fn dark() -> Self {
        Self::script(&[true])
    }

    /// Line that always reads light (low)
    pub fn light() -> Self {
        Self::script(&[false])
    }

    /// Line reading `dark[i]` on the i-th sample
    pub fn script(dark: &[bool]) -> Self {
        Self {
            dark_readings: dark.iter().copied().collect(),
            last: dark.last().copied().unwrap_or(true),
        }
    }
}

impl ErrorType for MockSense {
    type Error = Infallible;
}

impl InputPin for MockSense {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.dark_readings.pop_front().unwrap_or(self.last))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

// ============================================================================
// Mock Wake Hardware
// ============================================================================

/// Wake timer that records each arm
pub struct MockTimer {
    log: Log,
}

impl MockTimer {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl WakeTimer for MockTimer {
    fn start(&mut self, interval: WakeInterval) {
        self.log.push(Event::Arm(interval));
    }
}

/// Sleeper that plays the timer interrupt: after `spurious` unrelated
/// wakeups, each sleep raises the wake flag
pub struct MockSleeper<'a> {
    log: Log,
    flag: &'a WakeFlag,
    spurious: u32,
}

impl<'a> MockSleeper<'a> {
    pub fn new(log: &Log, flag: &'a WakeFlag) -> Self {
        Self::with_spurious_wakes(log, flag, 0)
    }

    pub fn with_spurious_wakes(log: &Log, flag: &'a WakeFlag, spurious: u32) -> Self {
        Self {
            log: log.clone(),
            flag,
            spurious,
        }
    }
}

impl SleepControl for MockSleeper<'_> {
    fn disable_analog(&mut self) {
        self.log.push(Event::AnalogOff);
    }

    fn enable_analog(&mut self) {
        self.log.push(Event::AnalogOn);
    }

    fn sleep(&mut self) {
        self.log.push(Event::Sleep);
        if self.spurious > 0 {
            self.spurious -= 1;
        } else {
            self.flag.signal();
        }
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Levels of a table with every entry halved
pub fn halved(levels: &[u8]) -> Vec<u8> {
    levels.iter().map(|level| level / 2).collect()
}
