//! Frame representation for uncompressed audio

use crate::codec::pcm::{deserialize, PcmBuffer};
use crate::error::{Error, Result};
use crate::format::AudioFormat;
use crate::util::{Buffer, SampleFormat, Timestamp};
use std::fmt;

/// An audio frame
///
/// Samples are stored as one interleaved, little-endian byte buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFrame {
    /// Interleaved audio data
    pub data: Buffer,

    /// Number of samples per channel
    pub nb_samples: usize,

    /// Sample rate
    pub sample_rate: u32,

    /// Number of channels
    pub channels: u16,

    /// Sample format
    pub format: SampleFormat,

    /// Presentation timestamp
    pub pts: Timestamp,

    /// Duration in samples
    pub duration: i64,
}

impl AudioFrame {
    /// Create a new, empty audio frame
    pub fn new(nb_samples: usize, sample_rate: u32, channels: u16, format: SampleFormat) -> Self {
        AudioFrame {
            data: Buffer::empty(),
            nb_samples,
            sample_rate,
            channels,
            format,
            pts: Timestamp::none(),
            duration: 0,
        }
    }

    /// Get total number of samples across all channels
    pub fn total_samples(&self) -> usize {
        self.nb_samples * self.channels as usize
    }

    /// Format of the frame's data
    pub fn audio_format(&self) -> AudioFormat {
        AudioFormat::interleaved(self.sample_rate, self.channels, self.format)
    }

    /// Copy the frame's samples into an interleaved [`PcmBuffer`]
    pub fn to_buffer(&self) -> Result<PcmBuffer> {
        let buffer = deserialize(self.data.as_slice(), self.audio_format(), None)?;
        if buffer.frame_count() != self.nb_samples {
            return Err(Error::bad_argument(format!(
                "frame holds {} samples per channel, expected {}",
                buffer.frame_count(),
                self.nb_samples
            )));
        }
        Ok(buffer)
    }
}

impl fmt::Display for AudioFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AudioFrame(samples={}, {} Hz, {} ch, {}, pts={})",
            self.nb_samples, self.sample_rate, self.channels, self.format, self.pts
        )
    }
}
