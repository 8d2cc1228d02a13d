//! Codec contexts backed by libopus

use super::context::{Application, Bitrate, CodecResult, DecodeContext, EncodeContext};
use crate::error::status;

fn code(e: opus::Error) -> i32 {
    e.code() as i32
}

fn opus_channels(channels: u16) -> CodecResult<opus::Channels> {
    match channels {
        1 => Ok(opus::Channels::Mono),
        2 => Ok(opus::Channels::Stereo),
        _ => Err(status::BAD_ARG),
    }
}

/// libopus decoding context
pub struct LibopusDecoder {
    inner: opus::Decoder,
}

impl DecodeContext for LibopusDecoder {
    fn open(sample_rate: u32, channels: u16) -> CodecResult<Self> {
        let inner = opus::Decoder::new(sample_rate, opus_channels(channels)?).map_err(code)?;
        Ok(LibopusDecoder { inner })
    }

    fn reset(&mut self) -> CodecResult<()> {
        self.inner.reset_state().map_err(code)
    }

    fn decode_i16(&mut self, packet: &[u8], output: &mut [i16], fec: bool) -> CodecResult<usize> {
        self.inner.decode(packet, output, fec).map_err(code)
    }

    fn decode_f32(&mut self, packet: &[u8], output: &mut [f32], fec: bool) -> CodecResult<usize> {
        self.inner.decode_float(packet, output, fec).map_err(code)
    }

    fn probe_sample_count(&self, packet: &[u8]) -> CodecResult<usize> {
        self.inner.get_nb_samples(packet).map_err(code)
    }
}

/// libopus encoding context
pub struct LibopusEncoder {
    inner: opus::Encoder,
}

impl EncodeContext for LibopusEncoder {
    fn open(sample_rate: u32, channels: u16, application: Application) -> CodecResult<Self> {
        let application = match application {
            Application::Voip => opus::Application::Voip,
            Application::Audio => opus::Application::Audio,
            Application::RestrictedLowDelay => opus::Application::LowDelay,
        };
        let inner = opus::Encoder::new(sample_rate, opus_channels(channels)?, application)
            .map_err(code)?;
        Ok(LibopusEncoder { inner })
    }

    fn reset(&mut self) -> CodecResult<()> {
        self.inner.reset_state().map_err(code)
    }

    fn encode_i16(&mut self, pcm: &[i16], output: &mut [u8]) -> CodecResult<usize> {
        self.inner.encode(pcm, output).map_err(code)
    }

    fn encode_f32(&mut self, pcm: &[f32], output: &mut [u8]) -> CodecResult<usize> {
        self.inner.encode_float(pcm, output).map_err(code)
    }

    fn set_bitrate(&mut self, bitrate: Bitrate) -> CodecResult<()> {
        let bitrate = match bitrate {
            Bitrate::Auto => opus::Bitrate::Auto,
            Bitrate::Max => opus::Bitrate::Max,
            Bitrate::Bits(bits) => opus::Bitrate::Bits(bits),
        };
        self.inner.set_bitrate(bitrate).map_err(code)
    }

    fn set_inband_fec(&mut self, enabled: bool) -> CodecResult<()> {
        self.inner.set_inband_fec(enabled).map_err(code)
    }

    fn set_packet_loss_perc(&mut self, percent: i32) -> CodecResult<()> {
        self.inner.set_packet_loss_perc(percent).map_err(code)
    }
}
