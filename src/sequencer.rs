//! Round-robin pattern selection.
//!
//! Cycles through the patterns so the same show never plays twice in a row:
//! ```text
//! One → Two → Three → Both → (repeat)
//! ```
//! The position lives only in RAM and starts over at `One` after a power
//! loss.

use crate::player::Pattern;

/// Picks the next pattern to play.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PatternSequencer {
    /// Index into [`Pattern::ALL`] of the next pattern, always in `0..4`
    index: u8,
}

impl PatternSequencer {
    /// Creates a sequencer that starts at pattern one.
    pub const fn new() -> Self {
        Self { index: 0 }
    }

    /// Creates a sequencer positioned at `index`, wrapped into range.
    pub const fn starting_at(index: u8) -> Self {
        Self {
            index: index % Pattern::ALL.len() as u8,
        }
    }

    /// Index of the pattern the next call will return.
    pub const fn position(&self) -> u8 {
        self.index
    }

    /// Returns the current pattern and advances to the next one.
    pub fn next_pattern(&mut self) -> Pattern {
        let pattern = match self.index {
            0 => Pattern::One,
            1 => Pattern::Two,
            2 => Pattern::Three,
            _ => Pattern::Both,
        };
        self.index = (self.index + 1) % Pattern::ALL.len() as u8;
        pattern
    }
}

impl Iterator for PatternSequencer {
    type Item = Pattern;

    fn next(&mut self) -> Option<Pattern> {
        Some(self.next_pattern())
    }
}
