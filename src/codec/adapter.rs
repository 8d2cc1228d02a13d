//! Conversion of decoded buffers into media samples

use crate::codec::pcm::{serialize, serialize_quantized, PcmBuffer};
use crate::codec::AudioFrame;
use crate::error::{Error, Result};
use crate::util::{Buffer, SampleFormat, Timestamp};

/// Builds a host media sample from a decoded buffer
pub trait MediaSampleAdapter {
    /// The sample type produced
    type Sample;

    /// Wrap the valid frames of `buffer` in a sample stamped with `pts`
    fn make_sample(&self, buffer: &PcmBuffer, pts: Timestamp) -> Result<Self::Sample>;
}

/// Adapter producing [`AudioFrame`]s
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AudioFrameAdapter {
    quantize: bool,
}

impl AudioFrameAdapter {
    /// Frames keep the buffer's sample representation
    pub fn new() -> Self {
        AudioFrameAdapter { quantize: false }
    }

    /// Frames always carry s16 samples
    pub fn quantized() -> Self {
        AudioFrameAdapter { quantize: true }
    }
}

impl MediaSampleAdapter for AudioFrameAdapter {
    type Sample = AudioFrame;

    fn make_sample(&self, buffer: &PcmBuffer, pts: Timestamp) -> Result<AudioFrame> {
        let (data, format) = if self.quantize {
            (serialize_quantized(buffer), SampleFormat::I16)
        } else {
            (serialize(buffer), buffer.sample_format())
        };
        let data = data.map_err(|e| Error::adapter(format!("cannot build audio frame: {}", e)))?;

        let mut frame = AudioFrame::new(
            buffer.frame_count(),
            buffer.sample_rate(),
            buffer.channels(),
            format,
        );
        frame.data = Buffer::from_vec(data);
        frame.pts = pts;
        frame.duration = buffer.frame_count() as i64;
        Ok(frame)
    }
}
