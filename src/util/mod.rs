//! Common utilities and data structures

pub mod buffer;
pub mod samplefmt;
pub mod timestamp;

pub use buffer::Buffer;
pub use samplefmt::{SampleFormat, SampleLayout};
pub use timestamp::Timestamp;
