//! Audio format description and codec boundary validation

use crate::error::{Error, Result};
use crate::util::{SampleFormat, SampleLayout};
use std::fmt;

/// Sample rates accepted by the Opus codec
pub const SUPPORTED_SAMPLE_RATES: [u32; 5] = [8000, 12000, 16000, 24000, 48000];

/// Maximum channel count accepted by the Opus codec
pub const MAX_CHANNELS: u16 = 2;

/// Description of a PCM stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioFormat {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Sample representation
    pub sample_format: SampleFormat,
    /// Channel arrangement
    pub layout: SampleLayout,
}

impl AudioFormat {
    /// Create a new audio format
    pub fn new(
        sample_rate: u32,
        channels: u16,
        sample_format: SampleFormat,
        layout: SampleLayout,
    ) -> Self {
        AudioFormat {
            sample_rate,
            channels,
            sample_format,
            layout,
        }
    }

    /// Interleaved format with the given representation
    pub fn interleaved(sample_rate: u32, channels: u16, sample_format: SampleFormat) -> Self {
        Self::new(sample_rate, channels, sample_format, SampleLayout::Interleaved)
    }

    /// Planar format with the given representation
    pub fn planar(sample_rate: u32, channels: u16, sample_format: SampleFormat) -> Self {
        Self::new(sample_rate, channels, sample_format, SampleLayout::Planar)
    }

    /// Same format with a different representation
    pub fn with_sample_format(self, sample_format: SampleFormat) -> Self {
        AudioFormat {
            sample_format,
            ..self
        }
    }

    /// Same format with a different layout
    pub fn with_layout(self, layout: SampleLayout) -> Self {
        AudioFormat { layout, ..self }
    }

    /// Get bytes per sample for a single channel
    pub fn bytes_per_sample(&self) -> usize {
        self.sample_format.sample_size()
    }

    /// Get bytes per frame (all channels)
    pub fn bytes_per_frame(&self) -> usize {
        self.bytes_per_sample() * self.channels as usize
    }

    /// Calculate number of whole frames in a byte count
    pub fn frames_from_bytes(&self, bytes: usize) -> usize {
        match self.bytes_per_frame() {
            0 => 0,
            frame_size => bytes / frame_size,
        }
    }

    /// Check whether the codec accepts this format
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check whether the codec accepts this format, naming the offending property
    pub fn validate(&self) -> Result<()> {
        if !self.sample_format.is_codec_supported() {
            return Err(Error::invalid_format(format!(
                "unsupported sample format {}, expected f32 or s16",
                self.sample_format
            )));
        }

        if self.channels == 0 || self.channels > MAX_CHANNELS {
            return Err(Error::invalid_format(format!(
                "invalid channel count {}, Opus supports mono (1) or stereo (2)",
                self.channels
            )));
        }

        if !SUPPORTED_SAMPLE_RATES.contains(&self.sample_rate) {
            return Err(Error::invalid_format(format!(
                "invalid sample rate {}, must be 8000, 12000, 16000, 24000, or 48000 Hz",
                self.sample_rate
            )));
        }

        Ok(())
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        AudioFormat::interleaved(48000, 2, SampleFormat::F32)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz, {} ch, {} {}",
            self.sample_rate, self.channels, self.sample_format, self.layout
        )
    }
}

/// Check whether the codec accepts `format`
pub fn is_valid_format(format: &AudioFormat) -> bool {
    format.is_valid()
}
