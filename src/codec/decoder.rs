//! Decoder trait and factory

use super::AudioFrame;
use crate::error::{Error, Result};
use crate::format::{AudioFormat, Packet};

/// Decoder trait for decoding compressed data
pub trait Decoder {
    /// Send a packet to the decoder
    fn send_packet(&mut self, packet: &Packet) -> Result<()>;

    /// Receive a decoded frame
    ///
    /// Returns [`Error::TryAgain`] when no packet is waiting.
    fn receive_frame(&mut self) -> Result<AudioFrame>;

    /// Flush the decoder
    fn flush(&mut self) -> Result<()>;
}

/// Create a decoder for the given codec
pub fn create_decoder(codec_id: &str, format: AudioFormat) -> Result<Box<dyn Decoder>> {
    match codec_id {
        #[cfg(feature = "opus-codec")]
        "opus" => {
            use crate::codec::OpusDecoder;
            Ok(Box::new(OpusDecoder::open(format)?))
        }
        "pcm" | "pcm_s16le" | "pcm_f32le" => {
            use crate::codec::PcmDecoder;
            Ok(Box::new(PcmDecoder::new(format)?))
        }
        _ => Err(Error::unsupported(format!(
            "No decoder available for codec: {}",
            codec_id
        ))),
    }
}
