//! Opus decoder session

use super::context::{CodecResult, DecodeContext};
use crate::codec::adapter::{AudioFrameAdapter, MediaSampleAdapter};
use crate::codec::pcm::{deinterleave, PcmBuffer, PcmKind, Sample};
use crate::codec::{AudioFrame, Decoder};
use crate::error::{Error, Result};
use crate::format::{AudioFormat, Packet};
use crate::util::Timestamp;
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

/// Longest Opus frame, in milliseconds
pub const MAX_FRAME_MS: usize = 120;

/// Concealment length when a lost packet has no duration, in milliseconds
const CONCEALMENT_MS: usize = 20;

/// An open Opus decoding session
///
/// Owns one decoding context, released when the session is closed or
/// dropped.
pub struct DecoderSession<C: DecodeContext> {
    context: C,
    format: AudioFormat,
    pending: VecDeque<Packet>,
    next_pts: Timestamp,
}

impl<C: DecodeContext> DecoderSession<C> {
    /// Open a session producing buffers of `format`
    pub fn open(format: AudioFormat) -> Result<Self> {
        Self::open_with(format, C::open)
    }

    /// Open a session, creating the context with `open`
    pub fn open_with<F>(format: AudioFormat, open: F) -> Result<Self>
    where
        F: FnOnce(u32, u16) -> CodecResult<C>,
    {
        format.validate()?;

        let context = open(format.sample_rate, format.channels).map_err(|code| {
            warn!(code, "Failed to open Opus decoder");
            Error::from_status(code)
        })?;

        debug!(%format, "Opened Opus decoder");
        Ok(DecoderSession {
            context,
            format,
            pending: VecDeque::new(),
            next_pts: Timestamp::zero(),
        })
    }

    /// Get the output format
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.format.sample_rate
    }

    /// Get the channel count
    pub fn channels(&self) -> u16 {
        self.format.channels
    }

    /// Largest number of samples per channel a single packet can decode to
    pub fn max_frame_size(&self) -> usize {
        self.format.sample_rate as usize * MAX_FRAME_MS / 1000
    }

    /// Reinitialize the decoding context in place
    pub fn reset(&mut self) -> Result<()> {
        let result = self.context.reset();
        self.check("reset", result)?;
        debug!("Reset Opus decoder");
        Ok(())
    }

    /// Decode `packet` into `target`.
    ///
    /// The target's sample rate and channel count must match the session.
    /// On success its frame count is the number of samples per channel
    /// decoded; an empty `packet` produces loss concealment audio for the
    /// target's whole capacity.
    pub fn decode_into(&mut self, packet: &[u8], target: &mut PcmBuffer) -> Result<()> {
        if target.sample_rate() != self.format.sample_rate
            || target.channels() != self.format.channels
        {
            return Err(Error::bad_argument(format!(
                "target format {} does not match decoder format {}",
                target.format(),
                self.format
            )));
        }

        let capacity = target.frame_capacity();
        let frames = match target.kind() {
            PcmKind::I16Interleaved => {
                let output = interleaved_output::<i16>(target)?;
                let result = self.context.decode_i16(packet, output, false);
                self.check("decode", result)?
            }
            PcmKind::F32Interleaved => {
                let output = interleaved_output::<f32>(target)?;
                let result = self.context.decode_f32(packet, output, false);
                self.check("decode", result)?
            }
            PcmKind::I16Planar => self.decode_planar(packet, target, C::decode_i16)?,
            PcmKind::F32Planar => self.decode_planar(packet, target, C::decode_f32)?,
        };

        if frames > capacity {
            return Err(Error::codec_internal(format!(
                "decoded {} samples per channel into a buffer of {}",
                frames, capacity
            )));
        }
        target.set_frame_count(frames)?;

        trace!(bytes = packet.len(), frames, "Decoded Opus packet");
        Ok(())
    }

    /// Decode `packet` into a new buffer of the session format, sized to
    /// exactly the packet's sample count
    pub fn decode(&mut self, packet: &[u8]) -> Result<PcmBuffer> {
        let result = self.context.probe_sample_count(packet);
        let frames = self.check("probe", result)?;

        let mut buffer = PcmBuffer::new(self.format, frames)?;
        self.decode_into(packet, &mut buffer)?;
        Ok(buffer)
    }

    /// Decode `packet` into interleaved s16 bytes.
    ///
    /// `frame_size` is the maximum number of samples per channel. With `fec`
    /// set, the in-band redundancy for the previous (lost) packet is decoded
    /// instead; `frame_size` must then be that packet's duration.
    pub fn decode_fixed(
        &mut self,
        packet: &[u8],
        frame_size: usize,
        fec: bool,
    ) -> Result<Vec<u8>> {
        if frame_size == 0 || frame_size > self.max_frame_size() {
            return Err(Error::bad_argument(format!(
                "frame size {} outside 1..={}",
                frame_size,
                self.max_frame_size()
            )));
        }
        let channels = self.format.channels as usize;

        let mut pcm = vec![0i16; frame_size * channels];
        let result = self.context.decode_i16(packet, &mut pcm, fec);
        let frames = self.check("decode", result)?;
        if frames > frame_size {
            return Err(Error::codec_internal(format!(
                "decoded {} samples per channel into a buffer of {}",
                frames, frame_size
            )));
        }

        let mut bytes = vec![0u8; frames * channels * 2];
        i16::write_le_from(&pcm[..frames * channels], &mut bytes);

        trace!(bytes = packet.len(), frames, fec, "Decoded Opus packet");
        Ok(bytes)
    }

    /// Decode `packet` and hand the result to `adapter`
    pub fn decode_to_sample<A: MediaSampleAdapter>(
        &mut self,
        packet: &[u8],
        adapter: &A,
        pts: Option<Timestamp>,
    ) -> Result<A::Sample> {
        let buffer = self.decode(packet)?;
        adapter.make_sample(&buffer, pts.unwrap_or_default())
    }

    /// Close the session, releasing the decoding context
    pub fn close(self) {}

    fn decode_planar<T, F>(
        &mut self,
        packet: &[u8],
        target: &mut PcmBuffer,
        decode: F,
    ) -> Result<usize>
    where
        T: Sample,
        F: FnOnce(&mut C, &[u8], &mut [T], bool) -> CodecResult<usize>,
    {
        let capacity = target.frame_capacity();
        let mut scratch = vec![T::default(); capacity * target.channels() as usize];

        let result = decode(&mut self.context, packet, &mut scratch, false);
        let frames = self.check("decode", result)?;
        if frames > capacity {
            return Ok(frames);
        }

        let planes = target
            .storage_mut::<T>()
            .ok_or_else(|| Error::codec_internal("target storage does not match its format"))?;
        deinterleave(&scratch, frames, planes);
        Ok(frames)
    }

    fn check<T>(&self, operation: &str, result: CodecResult<T>) -> Result<T> {
        result.map_err(|code| {
            warn!(code, operation, "Opus decoder call failed");
            Error::from_status(code)
        })
    }

    /// Duration to conceal for a lost packet
    fn concealment_frames(&self, packet: &Packet) -> usize {
        if packet.duration > 0 {
            (packet.duration as usize).min(self.max_frame_size())
        } else {
            self.format.sample_rate as usize * CONCEALMENT_MS / 1000
        }
    }
}

impl<C: DecodeContext> Drop for DecoderSession<C> {
    fn drop(&mut self) {
        debug!("Closed Opus decoder");
    }
}

impl<C: DecodeContext> Decoder for DecoderSession<C> {
    fn send_packet(&mut self, packet: &Packet) -> Result<()> {
        self.pending.push_back(packet.clone());
        Ok(())
    }

    fn receive_frame(&mut self) -> Result<AudioFrame> {
        let packet = self.pending.pop_front().ok_or(Error::TryAgain)?;

        let buffer = if packet.is_empty() {
            let mut buffer = PcmBuffer::new(self.format, self.concealment_frames(&packet))?;
            self.decode_into(&[], &mut buffer)?;
            buffer
        } else {
            self.decode(packet.data.as_slice())?
        };

        let pts = if packet.pts.is_valid() {
            packet.pts
        } else {
            self.next_pts
        };
        let frame = AudioFrameAdapter::new().make_sample(&buffer, pts)?;
        self.next_pts = pts
            .checked_advance(frame.duration)
            .ok_or_else(|| Error::bad_argument(format!("pts {} overflows", pts)))?;
        Ok(frame)
    }

    fn flush(&mut self) -> Result<()> {
        self.pending.clear();
        self.next_pts = Timestamp::zero();
        self.reset()
    }
}

/// Interleaved storage of `target`, over its full capacity
fn interleaved_output<T: Sample>(target: &mut PcmBuffer) -> Result<&mut [T]> {
    target
        .storage_mut::<T>()
        .and_then(|planes| planes.first_mut())
        .map(|plane| plane.as_mut_slice())
        .ok_or_else(|| Error::codec_internal("target storage does not match its format"))
}
