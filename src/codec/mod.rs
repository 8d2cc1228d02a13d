//! Codec implementations (encoders and decoders)

pub mod adapter;
pub mod decoder;
pub mod encoder;
pub mod frame;
pub mod opus;
pub mod pcm;

pub use adapter::{AudioFrameAdapter, MediaSampleAdapter};
pub use decoder::{create_decoder, Decoder};
pub use encoder::{create_encoder, Encoder};
pub use frame::AudioFrame;
pub use opus::{
    Application, Bitrate, DecodeContext, DecoderSession, EncodeContext, EncoderSession,
    OpusEncoderConfig,
};
pub use pcm::{PcmBuffer, PcmDecoder, PcmEncoder, PcmKind};

#[cfg(feature = "opus-codec")]
pub use opus::{OpusDecoder, OpusEncoder};
