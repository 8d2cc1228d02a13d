//! Codec context seams
//!
//! The Opus algorithm itself lives behind these traits. A context is an
//! opaque, stateful handle: it is created by `open`, mutated by the calls
//! below, and released exactly once when dropped. Every call reports
//! failure as a raw negative status code (see [`crate::error::status`]).

/// Result of a codec context call; the error is the raw status code
pub type CodecResult<T> = std::result::Result<T, i32>;

/// Opus application type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Application {
    /// Best for voice/speech
    Voip,
    /// Best for music
    #[default]
    Audio,
    /// Low-delay mode
    RestrictedLowDelay,
}

/// Target bitrate of an encoding context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bitrate {
    /// Let the codec choose
    #[default]
    Auto,
    /// Highest bitrate the codec allows
    Max,
    /// Explicit bits per second
    Bits(i32),
}

/// A decoding context
pub trait DecodeContext: Sized {
    /// Allocate and initialize a context
    fn open(sample_rate: u32, channels: u16) -> CodecResult<Self>;

    /// Reinitialize the context in place
    fn reset(&mut self) -> CodecResult<()>;

    /// Decode into interleaved s16 samples.
    ///
    /// `output.len() / channels` is the maximum number of samples per channel.
    /// Returns the number of samples per channel written. An empty `packet`
    /// asks for loss concealment; `fec` asks for the in-band redundancy of
    /// the previous packet instead of this packet's own audio.
    fn decode_i16(&mut self, packet: &[u8], output: &mut [i16], fec: bool) -> CodecResult<usize>;

    /// Decode into interleaved float samples, as [`DecodeContext::decode_i16`]
    fn decode_f32(&mut self, packet: &[u8], output: &mut [f32], fec: bool) -> CodecResult<usize>;

    /// Number of samples per channel `packet` will decode to, without
    /// touching decoder state
    fn probe_sample_count(&self, packet: &[u8]) -> CodecResult<usize>;
}

/// An encoding context
pub trait EncodeContext: Sized {
    /// Allocate and initialize a context
    fn open(sample_rate: u32, channels: u16, application: Application) -> CodecResult<Self>;

    /// Reinitialize the context in place
    fn reset(&mut self) -> CodecResult<()>;

    /// Encode one frame of interleaved s16 samples into `output`.
    ///
    /// Returns the number of bytes written.
    fn encode_i16(&mut self, pcm: &[i16], output: &mut [u8]) -> CodecResult<usize>;

    /// Encode one frame of interleaved float samples into `output`
    fn encode_f32(&mut self, pcm: &[f32], output: &mut [u8]) -> CodecResult<usize>;

    /// Set the target bitrate
    fn set_bitrate(&mut self, bitrate: Bitrate) -> CodecResult<()>;

    /// Enable or disable in-band forward error correction
    fn set_inband_fec(&mut self, enabled: bool) -> CodecResult<()>;

    /// Expected packet loss in percent (0-100)
    fn set_packet_loss_perc(&mut self, percent: i32) -> CodecResult<()>;
}
