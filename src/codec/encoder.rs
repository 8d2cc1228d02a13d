//! Encoder trait and factory

use super::AudioFrame;
use crate::error::{Error, Result};
use crate::format::{AudioFormat, Packet};

/// Encoder trait for encoding frames
pub trait Encoder {
    /// Send a frame to the encoder
    fn send_frame(&mut self, frame: &AudioFrame) -> Result<()>;

    /// Receive an encoded packet
    ///
    /// Returns [`Error::TryAgain`] when nothing has been encoded yet.
    fn receive_packet(&mut self) -> Result<Packet>;

    /// Flush the encoder
    fn flush(&mut self) -> Result<()>;
}

/// Create an encoder for the given codec
pub fn create_encoder(codec_id: &str, format: AudioFormat) -> Result<Box<dyn Encoder>> {
    match codec_id {
        #[cfg(feature = "opus-codec")]
        "opus" => {
            use crate::codec::opus::{OpusEncoder, OpusEncoderConfig};
            let config = OpusEncoderConfig {
                format,
                ..Default::default()
            };
            Ok(Box::new(OpusEncoder::with_config(config)?))
        }
        "pcm" | "pcm_s16le" | "pcm_f32le" => {
            use crate::codec::PcmEncoder;
            Ok(Box::new(PcmEncoder::new(format)?))
        }
        _ => Err(Error::unsupported(format!(
            "No encoder available for codec: {}",
            codec_id
        ))),
    }
}
