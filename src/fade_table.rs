//! Brightness ramps shared by every pattern.
//!
//! Levels are 8-bit PWM duty values. The ramps are not linear: they follow
//! the eye's response so a fade looks even from start to finish.

/// An ordered, immutable list of PWM levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeTable {
    levels: &'static [u8],
}

impl FadeTable {
    /// Wraps a static list of levels.
    pub const fn new(levels: &'static [u8]) -> Self {
        Self { levels }
    }

    /// The levels in playback order.
    pub const fn levels(&self) -> &'static [u8] {
        self.levels
    }

    /// Number of steps in the ramp.
    pub const fn len(&self) -> usize {
        self.levels.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Short ramp from off towards full brightness, used by every pattern.
pub const FADE_IN: FadeTable = FadeTable::new(&[0, 121, 184, 218, 235, 245]);

/// Long ramp from full brightness down to a dim glow.
pub const FADE_OUT: FadeTable = FadeTable::new(&[
    255, 217, 185, 158, 134, 115, 98, 83, 71, 60, 51, 44, 37, 32, 27, 23, 20,
]);

/// Shorter fade-out that lingers at full brightness before dropping.
pub const FADE_OUT_SHORT: FadeTable =
    FadeTable::new(&[255, 255, 255, 134, 98, 83, 71, 51, 44, 37, 32, 23, 20]);

/// Single full-brightness step, for holding at max between ramps.
pub const FULL_ON: FadeTable = FadeTable::new(&[255]);
