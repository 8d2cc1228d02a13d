//! Stream descriptions: PCM formats and compressed packets

pub mod audio;
pub mod packet;

pub use audio::{is_valid_format, AudioFormat, MAX_CHANNELS, SUPPORTED_SAMPLE_RATES};
pub use packet::Packet;
