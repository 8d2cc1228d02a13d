//! Opus audio codec sessions
//!
//! Opus is a royalty-free, highly versatile audio codec designed for
//! interactive speech and music transmission over the Internet.
//!
//! A session owns one codec context (see [`context`]) and moves PCM between
//! [`crate::codec::pcm::PcmBuffer`]s and the context's interleaved entry
//! points. The libopus-backed contexts are available with the `opus-codec`
//! feature; any other [`DecodeContext`] / [`EncodeContext`] can drive the
//! same sessions.

pub mod context;
pub mod decoder;
pub mod encoder;
#[cfg(feature = "opus-codec")]
pub mod libopus;

pub use context::{Application, Bitrate, CodecResult, DecodeContext, EncodeContext};
pub use decoder::DecoderSession;
pub use encoder::{EncoderSession, OpusEncoderConfig};
#[cfg(feature = "opus-codec")]
pub use libopus::{LibopusDecoder, LibopusEncoder};

/// Decoder session backed by libopus
#[cfg(feature = "opus-codec")]
pub type OpusDecoder = DecoderSession<LibopusDecoder>;

/// Encoder session backed by libopus
#[cfg(feature = "opus-codec")]
pub type OpusEncoder = EncoderSession<LibopusEncoder>;
