//! ZVD Opus - PCM marshalling and Opus encode/decode sessions
//!
//! This crate moves audio between structured PCM buffers and an Opus codec
//! context, in both directions.
//!
//! # Architecture
//!
//! - `format`: PCM format descriptions, validation and compressed packets
//! - `codec`: PCM conversion, Opus decoder/encoder sessions, media sample adapters
//! - `util`: Common utilities and data structures
//!
//! # Example
//!
//! ```no_run
//! use zvd_opus::codec::OpusDecoder;
//! use zvd_opus::format::AudioFormat;
//! use zvd_opus::util::SampleFormat;
//!
//! # fn main() -> zvd_opus::Result<()> {
//! let format = AudioFormat::interleaved(48000, 2, SampleFormat::I16);
//! let mut decoder = OpusDecoder::open(format)?;
//! # let packet: Vec<u8> = Vec::new();
//! let buffer = decoder.decode(&packet)?;
//! println!("decoded {} frames", buffer.frame_count());
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod error;
pub mod format;
pub mod util;

pub use error::{Error, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 1;
pub const VERSION_PATCH: u32 = 0;

/// Library configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Enable verbose logging
    pub verbose: bool,
    /// Enable debug output
    pub debug: bool,
}

/// Initialize the library with the given configuration
///
/// Installs a global `tracing` subscriber when logging is requested. Fails
/// with [`Error::Init`] if another subscriber is already installed.
pub fn init(config: Config) -> Result<()> {
    if config.verbose || config.debug {
        let level = if config.debug { "debug" } else { "info" };
        tracing_subscriber::fmt()
            .with_env_filter(level)
            .try_init()
            .map_err(|e| Error::Init(format!("Failed to initialize logging: {}", e)))?;
    }

    Ok(())
}
