//! Fade patterns and the player that renders them.
//!
//! A pattern is a fixed list of [`Segment`]s. Each segment walks one fade
//! table, writing every level to the LED and then waiting the segment's step
//! delay. Playback blocks until the pattern is done; nothing can cut it
//! short.

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;

use crate::fade_table::{FADE_IN, FADE_OUT, FADE_OUT_SHORT, FULL_ON, FadeTable};
use crate::pwm::{Channel, PwmOutput};

/// Brightness scaling applied to a segment's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Scale {
    /// Levels as written in the table.
    Full,
    /// Every level halved, rounding down.
    Half,
}

impl Scale {
    /// Applies the scale to one level.
    pub const fn apply(self, level: u8) -> u8 {
        match self {
            Scale::Full => level,
            Scale::Half => level / 2,
        }
    }
}

/// One pass over a fade table at a fixed step rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Levels to walk through
    pub table: FadeTable,
    /// Scaling applied to each level
    pub scale: Scale,
    /// Wait after each level write
    pub step: Duration,
}

impl Segment {
    const fn new(table: FadeTable, scale: Scale, step_ms: u64) -> Self {
        Self {
            table,
            scale,
            step: Duration::from_millis(step_ms),
        }
    }

    /// Levels this segment writes, in order.
    pub fn levels(&self) -> impl Iterator<Item = u8> + '_ {
        self.table
            .levels()
            .iter()
            .map(move |&level| self.scale.apply(level))
    }

    /// Time spent in the segment.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.table.len() as u64 * self.step.as_millis())
    }
}

const PATTERN_ONE: [Segment; 3] = [
    Segment::new(FADE_IN, Scale::Full, 30),
    Segment::new(FULL_ON, Scale::Full, 100),
    Segment::new(FADE_OUT, Scale::Full, 30),
];

// Repeats without a zero write between the two passes.
const PATTERN_TWO: [Segment; 4] = [
    Segment::new(FADE_IN, Scale::Full, 60),
    Segment::new(FADE_OUT, Scale::Full, 10),
    Segment::new(FADE_IN, Scale::Full, 60),
    Segment::new(FADE_OUT, Scale::Full, 10),
];

const PATTERN_THREE: [Segment; 4] = [
    Segment::new(FADE_IN, Scale::Full, 30),
    Segment::new(FADE_OUT_SHORT, Scale::Full, 35),
    Segment::new(FADE_IN, Scale::Half, 20),
    Segment::new(FADE_OUT_SHORT, Scale::Half, 25),
];

/// The four light shows, in the order the sequencer rotates through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pattern {
    /// Fade in, hold at full for 100 ms, long fade out. Plays on LED1.
    One,
    /// Slow fade in with a quick fade out, twice. Plays on LED2.
    Two,
    /// A full swell followed by a half-brightness echo. Plays on LED1.
    Three,
    /// Pattern one on LED2, then on LED1.
    Both,
}

impl Pattern {
    /// Every pattern in rotation order.
    pub const ALL: [Pattern; 4] = [Pattern::One, Pattern::Two, Pattern::Three, Pattern::Both];

    /// Segments played on each channel.
    pub const fn segments(self) -> &'static [Segment] {
        match self {
            Pattern::One | Pattern::Both => &PATTERN_ONE,
            Pattern::Two => &PATTERN_TWO,
            Pattern::Three => &PATTERN_THREE,
        }
    }

    /// Channels the pattern is played on, one after the other.
    pub const fn channels(self) -> &'static [Channel] {
        match self {
            Pattern::One | Pattern::Three => &[Channel::Led1],
            Pattern::Two => &[Channel::Led2],
            Pattern::Both => &[Channel::Led2, Channel::Led1],
        }
    }

    /// Total blocking time of [`PatternPlayer::perform`] for this pattern.
    pub fn duration(self) -> Duration {
        let per_channel: u64 = self
            .segments()
            .iter()
            .map(|segment| segment.duration().as_millis())
            .sum();
        Duration::from_millis(per_channel * self.channels().len() as u64)
    }
}

/// Plays patterns on a PWM output using a blocking delay.
pub struct PatternPlayer<O, D> {
    output: O,
    delay: D,
}

impl<O: PwmOutput, D: DelayNs> PatternPlayer<O, D> {
    /// Creates a player.
    ///
    /// # Arguments
    ///
    /// * `output` - PWM output for both LED channels
    /// * `delay` - Blocking delay used between level writes
    pub fn new(output: O, delay: D) -> Self {
        Self { output, delay }
    }

    /// Plays `pattern` once on every channel it is assigned to.
    pub fn perform(&mut self, pattern: Pattern) {
        for &channel in pattern.channels() {
            self.play(pattern, channel);
        }
    }

    /// Plays the segments of `pattern` on `channel`, then turns it off.
    ///
    /// Blocks for the whole pattern. The final write is always a zero,
    /// whatever level the last segment ended on.
    pub fn play(&mut self, pattern: Pattern, channel: Channel) {
        #[cfg(feature = "debug-mode")]
        defmt::debug!("Playing {} on {}", pattern, channel);

        for segment in pattern.segments() {
            let step_ms = segment.step.as_millis() as u32;
            for level in segment.levels() {
                self.output.set(channel, level);
                self.delay.delay_ms(step_ms);
            }
        }
        self.output.set(channel, 0);
    }

    /// Turns both LEDs off.
    pub fn blank(&mut self) {
        self.output.blank();
    }

    /// Returns the output and delay.
    pub fn release(self) -> (O, D) {
        (self.output, self.delay)
    }
}
