//! Wake timer scheduling and low-power sleep.
//!
//! The wake timer fires periodically and its interrupt handler does exactly
//! one thing: raise the [`WakeFlag`]. All decisions happen in the main loop
//! after it wakes up and takes the flag.
//!
//! # Intervals
//!
//! Intervals use the classic watchdog prescaler steps:
//!
//! | index | interval |
//! |-------|----------|
//! | 0     | 16 ms    |
//! | 1     | 32 ms    |
//! | 2     | 64 ms    |
//! | 3     | 128 ms   |
//! | 4     | 250 ms   |
//! | 5     | 500 ms   |
//! | 6     | 1 s      |
//! | 7     | 2 s      |
//! | 8     | 4 s      |
//! | 9     | 8 s      |
//!
//! Anything above index 9 is clamped to 8 seconds.

use embassy_time::Duration;
use portable_atomic::{AtomicBool, Ordering};

/// A supported wake timer period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeInterval {
    Ms16,
    Ms32,
    Ms64,
    Ms128,
    Ms250,
    Ms500,
    S1,
    S2,
    S4,
    S8,
}

impl WakeInterval {
    /// Interval used while there is daylight.
    pub const LONG: Self = WakeInterval::S8;

    /// Interval used in the dark, between light shows.
    pub const SHORT: Self = WakeInterval::S4;

    /// Longest supported interval.
    pub const MAX: Self = WakeInterval::S8;

    /// Interval for a prescaler index, clamping anything past the table.
    pub const fn from_index(index: u8) -> Self {
        match index {
            0 => WakeInterval::Ms16,
            1 => WakeInterval::Ms32,
            2 => WakeInterval::Ms64,
            3 => WakeInterval::Ms128,
            4 => WakeInterval::Ms250,
            5 => WakeInterval::Ms500,
            6 => WakeInterval::S1,
            7 => WakeInterval::S2,
            8 => WakeInterval::S4,
            _ => Self::MAX,
        }
    }

    /// Prescaler index of this interval.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Nominal period.
    pub const fn duration(self) -> Duration {
        Duration::from_millis(match self {
            WakeInterval::Ms16 => 16,
            WakeInterval::Ms32 => 32,
            WakeInterval::Ms64 => 64,
            WakeInterval::Ms128 => 128,
            WakeInterval::Ms250 => 250,
            WakeInterval::Ms500 => 500,
            WakeInterval::S1 => 1_000,
            WakeInterval::S2 => 2_000,
            WakeInterval::S4 => 4_000,
            WakeInterval::S8 => 8_000,
        })
    }

    /// Interval to arm after a wake, given that wake's light reading.
    ///
    /// Depends only on the reading, never on the previous interval.
    pub const fn after_reading(light_present: bool) -> Self {
        if light_present { Self::LONG } else { Self::SHORT }
    }
}

/// Flag raised by the wake timer interrupt and consumed by the main loop.
///
/// Declare it as a `static` so the interrupt handler can reach it.
pub struct WakeFlag {
    raised: AtomicBool,
}

impl WakeFlag {
    /// A flag with no wake pending.
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// A flag that is already raised, so the first cycle runs at power-on.
    pub const fn pending() -> Self {
        Self {
            raised: AtomicBool::new(true),
        }
    }

    /// Raises the flag. This is the whole body of the wake interrupt handler.
    pub fn signal(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// True while a wake is waiting to be taken.
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Clears the flag and reports whether it was raised.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }
}

impl Default for WakeFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Periodic wake timer hardware.
pub trait WakeTimer {
    /// Programs the timer period and enables its interrupt.
    ///
    /// Always called with interrupts masked.
    fn start(&mut self, interval: WakeInterval);
}

/// Low-power sleep hardware.
pub trait SleepControl {
    /// Powers down the analog-to-digital converter.
    fn disable_analog(&mut self);

    /// Powers the analog-to-digital converter back up.
    fn enable_analog(&mut self);

    /// Enters the deepest sleep that keeps the wake timer running.
    ///
    /// Called with interrupts masked; a pending interrupt must still end the
    /// sleep. Returns after any interrupt, not only the wake timer's.
    fn sleep(&mut self);
}

/// Arms the wake timer and sleeps until it fires.
pub struct WakeScheduler<'a, T, S> {
    timer: T,
    sleeper: S,
    flag: &'a WakeFlag,
}

impl<'a, T: WakeTimer, S: SleepControl> WakeScheduler<'a, T, S> {
    /// Creates a scheduler.
    ///
    /// # Arguments
    ///
    /// * `timer` - Wake timer hardware
    /// * `sleeper` - Sleep mode and analog power control
    /// * `flag` - Flag raised by the wake timer interrupt handler
    pub fn new(timer: T, sleeper: S, flag: &'a WakeFlag) -> Self {
        Self {
            timer,
            sleeper,
            flag,
        }
    }

    /// Reprograms the wake timer for `interval`.
    ///
    /// Interrupts stay masked for the whole reconfiguration so a firing
    /// timer cannot observe a half-written setup.
    pub fn arm(&mut self, interval: WakeInterval) {
        #[cfg(feature = "debug-mode")]
        defmt::debug!("Arming wake timer for {}", interval);

        critical_section::with(|_| self.timer.start(interval));
    }

    /// Sleeps until the wake flag is raised.
    ///
    /// The ADC is off for the duration. The flag is only observed here, not
    /// cleared; the main loop takes it with [`WakeScheduler::take_wake`].
    pub fn sleep_until_wake(&mut self) {
        self.sleeper.disable_analog();
        loop {
            let woken = critical_section::with(|_| {
                if self.flag.is_raised() {
                    true
                } else {
                    self.sleeper.sleep();
                    false
                }
            });
            if woken {
                break;
            }
        }
        self.sleeper.enable_analog();
    }

    /// Clears the wake flag, returning whether a wake was pending.
    pub fn take_wake(&self) -> bool {
        self.flag.take()
    }

    /// Returns the timer and sleep hardware.
    pub fn release(self) -> (T, S) {
        (self.timer, self.sleeper)
    }
}
