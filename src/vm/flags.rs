// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Knobs that control how the [VM](super::VM) schedules cycles

use crate::layout::{FREQUENCY, INSTRUCTIONS_PER_CYCLE};
use std::time::Duration;

/// Represents flags that aid in scheduling, but aren't inherent to the machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Flags {
    /// Set when each cycle should sleep until its wall-clock period has elapsed
    pub pacing: bool,
    /// Number of instructions to run per cycle
    pub ipc: usize,
    /// Target number of cycles per second, when pacing
    pub frequency: u64,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            pacing: false,
            ipc: INSTRUCTIONS_PER_CYCLE,
            frequency: FREQUENCY,
        }
    }
}

impl Flags {
    /// Toggles pacing
    ///
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// let mut flags = Flags::default();
    /// assert_eq!(false, flags.pacing);
    /// flags.pacing();
    /// assert_eq!(true, flags.pacing);
    /// ```
    pub fn pacing(&mut self) {
        self.pacing = !self.pacing
    }

    /// The wall-clock length of one cycle, or [None] if the frequency is zero
    /// # Examples
    /// ```rust
    /// # use chirp_gym::*;
    /// # use std::time::Duration;
    /// let flags = Flags { frequency: 50, ..Default::default() };
    /// assert_eq!(Some(Duration::from_millis(20)), flags.period());
    /// ```
    pub fn period(&self) -> Option<Duration> {
        (self.frequency != 0).then(|| Duration::from_nanos(1_000_000_000 / self.frequency))
    }
}
