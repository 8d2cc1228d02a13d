//! Timestamp handling for audio streams
//!
//! Timestamps count samples per channel, so their time base is the sample
//! rate of the stream they belong to.

use std::fmt;

/// A timestamp in an audio stream, in sample ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    /// Timestamp value in sample ticks
    pub value: i64,
}

impl Timestamp {
    /// Create a new timestamp
    pub fn new(value: i64) -> Self {
        Timestamp { value }
    }

    /// The stream origin
    pub fn zero() -> Self {
        Timestamp { value: 0 }
    }

    /// No timestamp / unknown timestamp
    pub fn none() -> Self {
        Timestamp { value: i64::MIN }
    }

    /// Check if timestamp is valid
    pub fn is_valid(&self) -> bool {
        self.value != i64::MIN
    }

    /// Convert timestamp to seconds at the given sample rate
    pub fn to_seconds(&self, sample_rate: u32) -> f64 {
        if !self.is_valid() || sample_rate == 0 {
            return 0.0;
        }
        self.value as f64 / sample_rate as f64
    }

    /// Convert seconds to a timestamp at the given sample rate
    pub fn from_seconds(seconds: f64, sample_rate: u32) -> Self {
        Timestamp {
            value: (seconds * sample_rate as f64).round() as i64,
        }
    }

    /// Rescale timestamp from one sample rate to another
    pub fn rescale(&self, from_rate: u32, to_rate: u32) -> Self {
        if !self.is_valid() || from_rate == 0 {
            return *self;
        }

        let rescaled = (self.value as i128 * to_rate as i128) / from_rate as i128;
        Timestamp {
            value: rescaled as i64,
        }
    }

    /// Advance by a number of samples per channel, saturating at the ends
    /// of the valid range
    pub fn advance(&self, samples: i64) -> Self {
        if !self.is_valid() {
            return *self;
        }
        Timestamp {
            value: self.value.saturating_add(samples).max(i64::MIN + 1),
        }
    }

    /// Advance by a number of samples per channel, or `None` if the result
    /// leaves the valid range
    pub fn checked_advance(&self, samples: i64) -> Option<Self> {
        if !self.is_valid() {
            return Some(*self);
        }
        self.value
            .checked_add(samples)
            .filter(|&value| value != i64::MIN)
            .map(Timestamp::new)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::zero()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "NOPTS")
        }
    }
}

impl From<i64> for Timestamp {
    fn from(value: i64) -> Self {
        Timestamp::new(value)
    }
}
