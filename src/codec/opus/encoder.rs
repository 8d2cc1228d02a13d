//! Opus encoder session
//!
//! Encodes PCM buffers (f32 or s16, interleaved or planar) to Opus packets.
//! Each call to [`EncoderSession::encode`] must supply exactly one Opus frame
//! duration (2.5, 5, 10, 20, 40 or 60 ms); [`EncoderSession::frame_size`]
//! gives the 20 ms default.

use super::context::{Application, Bitrate, CodecResult, EncodeContext};
use crate::codec::pcm::{encoder::interleaved_samples, PcmBuffer, PcmKind};
use crate::codec::{AudioFrame, Encoder};
use crate::error::{Error, Result};
use crate::format::{AudioFormat, Packet};
use crate::util::{Buffer, Timestamp};
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

/// Largest packet a single encode call can produce
pub const MAX_PACKET_SIZE: usize = 4000;

/// Default frame duration, in milliseconds
pub const DEFAULT_FRAME_MS: usize = 20;

/// Opus encoder configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpusEncoderConfig {
    pub format: AudioFormat,
    pub application: Application,
    pub bitrate: Bitrate,
    /// In-band forward error correction
    pub inband_fec: bool,
    /// Expected packet loss, 0-100
    pub packet_loss_perc: Option<i32>,
}

impl Default for OpusEncoderConfig {
    fn default() -> Self {
        OpusEncoderConfig {
            format: AudioFormat::default(),
            application: Application::Audio,
            bitrate: Bitrate::Auto,
            inband_fec: false,
            packet_loss_perc: None,
        }
    }
}

/// An open Opus encoding session
///
/// Owns one encoding context, released when the session is closed or
/// dropped.
pub struct EncoderSession<C: EncodeContext> {
    context: C,
    config: OpusEncoderConfig,
    frame_size: usize,
    /// Encoded packets waiting to be retrieved
    packet_buffer: VecDeque<Packet>,
    /// Current PTS counter
    pts_counter: i64,
}

impl<C: EncodeContext> EncoderSession<C> {
    /// Open a session for `format` with default settings
    pub fn open(format: AudioFormat, application: Application) -> Result<Self> {
        Self::with_config(OpusEncoderConfig {
            format,
            application,
            ..Default::default()
        })
    }

    /// Open a session with a custom configuration
    pub fn with_config(config: OpusEncoderConfig) -> Result<Self> {
        Self::open_with(config, C::open)
    }

    /// Open a session, creating the context with `open`
    pub fn open_with<F>(config: OpusEncoderConfig, open: F) -> Result<Self>
    where
        F: FnOnce(u32, u16, Application) -> CodecResult<C>,
    {
        config.format.validate()?;

        if let Bitrate::Bits(bits) = config.bitrate {
            if bits <= 0 {
                return Err(Error::bad_argument(format!("invalid bitrate {}", bits)));
            }
        }
        if let Some(perc) = config.packet_loss_perc {
            if !(0..=100).contains(&perc) {
                return Err(Error::bad_argument(format!(
                    "invalid packet loss percentage {}. Must be 0-100",
                    perc
                )));
            }
        }

        let format = config.format;
        let mut context = open(format.sample_rate, format.channels, config.application)
            .map_err(|code| failed("open", code))?;

        if config.bitrate != Bitrate::Auto {
            context
                .set_bitrate(config.bitrate)
                .map_err(|code| failed("set bitrate", code))?;
        }
        if config.inband_fec {
            context
                .set_inband_fec(true)
                .map_err(|code| failed("enable FEC", code))?;
        }
        if let Some(perc) = config.packet_loss_perc {
            context
                .set_packet_loss_perc(perc)
                .map_err(|code| failed("set packet loss", code))?;
        }

        debug!(%format, application = ?config.application, "Opened Opus encoder");
        Ok(EncoderSession {
            context,
            config,
            frame_size: format.sample_rate as usize * DEFAULT_FRAME_MS / 1000,
            packet_buffer: VecDeque::new(),
            pts_counter: 0,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &OpusEncoderConfig {
        &self.config
    }

    /// Get the input format
    pub fn format(&self) -> AudioFormat {
        self.config.format
    }

    /// Samples per channel in a 20 ms frame
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Set target bitrate
    pub fn set_bitrate(&mut self, bitrate: Bitrate) -> Result<()> {
        if let Bitrate::Bits(bits) = bitrate {
            if bits <= 0 {
                return Err(Error::bad_argument(format!("invalid bitrate {}", bits)));
            }
        }
        self.context
            .set_bitrate(bitrate)
            .map_err(|code| failed("set bitrate", code))?;
        self.config.bitrate = bitrate;
        Ok(())
    }

    /// Reinitialize the encoding context in place
    pub fn reset(&mut self) -> Result<()> {
        self.context.reset().map_err(|code| failed("reset", code))?;
        debug!("Reset Opus encoder");
        Ok(())
    }

    /// Encode the valid frames of `buffer` into one Opus packet
    pub fn encode(&mut self, buffer: &PcmBuffer) -> Result<Vec<u8>> {
        let format = self.config.format;
        if buffer.sample_rate() != format.sample_rate || buffer.channels() != format.channels {
            return Err(Error::bad_argument(format!(
                "buffer format {} does not match encoder format {}",
                buffer.format(),
                format
            )));
        }
        if buffer.is_empty() {
            return Err(Error::bad_argument("cannot encode an empty buffer"));
        }

        let mut output = vec![0u8; MAX_PACKET_SIZE];
        let result = match buffer.kind() {
            PcmKind::F32Interleaved | PcmKind::F32Planar => {
                let pcm = interleaved_samples::<f32>(buffer)?;
                self.context.encode_f32(&pcm, &mut output)
            }
            PcmKind::I16Interleaved | PcmKind::I16Planar => {
                let pcm = interleaved_samples::<i16>(buffer)?;
                self.context.encode_i16(&pcm, &mut output)
            }
        };
        let written = result.map_err(|code| failed("encode", code))?;
        if written > MAX_PACKET_SIZE {
            return Err(Error::codec_internal(format!(
                "encoder reported {} bytes for a {} byte packet buffer",
                written, MAX_PACKET_SIZE
            )));
        }

        output.truncate(written);
        trace!(frames = buffer.frame_count(), bytes = written, "Encoded Opus packet");
        Ok(output)
    }

    /// Encode `buffer` into a packet stamped from the running pts counter
    pub fn encode_packet(&mut self, buffer: &PcmBuffer) -> Result<Packet> {
        let data = self.encode(buffer)?;

        let mut packet = Packet::with_pts(Buffer::from_vec(data), Timestamp::new(self.pts_counter));
        packet.duration = buffer.frame_count() as i64;
        self.pts_counter = self.pts_counter.saturating_add(packet.duration);
        Ok(packet)
    }

    /// Close the session, releasing the encoding context
    pub fn close(self) {}
}

impl<C: EncodeContext> Drop for EncoderSession<C> {
    fn drop(&mut self) {
        debug!("Closed Opus encoder");
    }
}

impl<C: EncodeContext> Encoder for EncoderSession<C> {
    fn send_frame(&mut self, frame: &AudioFrame) -> Result<()> {
        let buffer = frame.to_buffer()?;
        let packet = self.encode_packet(&buffer)?;
        self.packet_buffer.push_back(packet);
        Ok(())
    }

    fn receive_packet(&mut self) -> Result<Packet> {
        self.packet_buffer.pop_front().ok_or(Error::TryAgain)
    }

    fn flush(&mut self) -> Result<()> {
        self.packet_buffer.clear();
        self.reset()
    }
}

fn failed(operation: &str, code: i32) -> Error {
    warn!(code, operation, "Opus encoder call failed");
    Error::from_status(code)
}
