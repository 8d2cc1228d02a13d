//! PCM serialization: structured buffers to interleaved little-endian bytes

use super::{quantize, PcmBuffer, PcmKind, Sample};
use crate::codec::{AudioFrame, Encoder};
use crate::error::{Error, Result};
use crate::format::{AudioFormat, Packet};
use crate::util::{Buffer, Timestamp};
use std::borrow::Cow;
use std::collections::VecDeque;

/// Serialize the valid frames of `buffer`.
///
/// The output is interleaved, little-endian, in the buffer's own sample
/// representation, and exactly `frame_count * channels * bytes_per_sample`
/// bytes long.
pub fn serialize(buffer: &PcmBuffer) -> Result<Vec<u8>> {
    check_source(buffer)?;

    let frames = buffer.frame_count();
    let samples = frames * buffer.channels() as usize;
    let mut output = vec![0u8; buffer.byte_len()];

    match buffer.kind() {
        PcmKind::F32Interleaved => {
            f32::write_le_from(interleaved_view::<f32>(buffer, samples)?, &mut output)
        }
        PcmKind::F32Planar => {
            write_planes(planar_view::<f32>(buffer, frames)?, &mut output, |s| s)
        }
        PcmKind::I16Interleaved => {
            i16::write_le_from(interleaved_view::<i16>(buffer, samples)?, &mut output)
        }
        PcmKind::I16Planar => {
            write_planes(planar_view::<i16>(buffer, frames)?, &mut output, |s| s)
        }
    }

    Ok(output)
}

/// Serialize the valid frames of `buffer` as interleaved s16 bytes.
///
/// Float samples are quantized with [`quantize`]; s16 buffers are written
/// unchanged.
pub fn serialize_quantized(buffer: &PcmBuffer) -> Result<Vec<u8>> {
    check_source(buffer)?;

    let frames = buffer.frame_count();
    let samples = frames * buffer.channels() as usize;
    let mut output = vec![0u8; samples * 2];

    match buffer.kind() {
        PcmKind::F32Interleaved => {
            let src = interleaved_view::<f32>(buffer, samples)?;
            for (bytes, &sample) in output.chunks_exact_mut(2).zip(src) {
                quantize(sample).write_le(bytes);
            }
        }
        PcmKind::F32Planar => {
            write_planes(planar_view::<f32>(buffer, frames)?, &mut output, quantize)
        }
        PcmKind::I16Interleaved | PcmKind::I16Planar => return serialize(buffer),
    }

    Ok(output)
}

/// Valid samples of `buffer` in interleaved order, borrowing when the
/// buffer is already interleaved
pub(crate) fn interleaved_samples<T: Sample>(buffer: &PcmBuffer) -> Result<Cow<'_, [T]>> {
    check_source(buffer)?;

    let frames = buffer.frame_count();
    let samples = frames * buffer.channels() as usize;
    if buffer.layout().is_planar() {
        let planes = planar_view::<T>(buffer, frames)?;
        let mut interleaved = vec![T::default(); samples];
        super::interleave(planes, frames, &mut interleaved);
        Ok(Cow::Owned(interleaved))
    } else {
        Ok(Cow::Borrowed(interleaved_view::<T>(buffer, samples)?))
    }
}

fn check_source(buffer: &PcmBuffer) -> Result<()> {
    buffer.format().validate()?;

    if buffer.channels() == 0 {
        return Err(Error::bad_argument("channel count must be positive"));
    }
    if buffer.frame_count() == 0 {
        return Err(Error::bad_argument("frame length must be positive"));
    }
    Ok(())
}

fn unavailable() -> Error {
    Error::bad_argument("channel data unavailable")
}

fn interleaved_view<T: Sample>(buffer: &PcmBuffer, samples: usize) -> Result<&[T]> {
    buffer
        .storage::<T>()
        .and_then(|planes| planes.first())
        .and_then(|plane| plane.get(..samples))
        .ok_or_else(unavailable)
}

fn planar_view<T: Sample>(buffer: &PcmBuffer, frames: usize) -> Result<&[Vec<T>]> {
    let planes = buffer.storage::<T>().ok_or_else(unavailable)?;
    if planes.len() != buffer.channels() as usize || planes.iter().any(|p| p.len() < frames) {
        return Err(unavailable());
    }
    Ok(planes)
}

/// Interleave planes straight into bytes, converting each sample with `map`
fn write_planes<S: Copy, T: Sample>(planes: &[Vec<S>], output: &mut [u8], map: impl Fn(S) -> T) {
    let size = T::FORMAT.sample_size();
    for (frame, out) in output.chunks_exact_mut(size * planes.len()).enumerate() {
        for (bytes, plane) in out.chunks_exact_mut(size).zip(planes) {
            map(plane[frame]).write_le(bytes);
        }
    }
}

/// Raw PCM encoder
///
/// Each frame becomes one packet of interleaved little-endian samples.
pub struct PcmEncoder {
    format: AudioFormat,
    packet_buffer: VecDeque<Packet>,
    pts_counter: i64,
}

impl PcmEncoder {
    /// Create an encoder accepting frames of `format`
    pub fn new(format: AudioFormat) -> Result<Self> {
        format.validate()?;
        Ok(PcmEncoder {
            format,
            packet_buffer: VecDeque::new(),
            pts_counter: 0,
        })
    }

    /// Get the input format
    pub fn format(&self) -> AudioFormat {
        self.format
    }
}

impl Encoder for PcmEncoder {
    fn send_frame(&mut self, frame: &AudioFrame) -> Result<()> {
        if frame.sample_rate != self.format.sample_rate
            || frame.channels != self.format.channels
            || frame.format != self.format.sample_format
        {
            return Err(Error::bad_argument(format!(
                "frame format {} does not match encoder format {}",
                frame.audio_format(),
                self.format
            )));
        }

        let buffer = frame.to_buffer()?;
        let mut packet = Packet::with_pts(
            Buffer::from_vec(serialize(&buffer)?),
            Timestamp::new(self.pts_counter),
        );
        packet.duration = buffer.frame_count() as i64;
        self.pts_counter = self.pts_counter.saturating_add(packet.duration);
        self.packet_buffer.push_back(packet);
        Ok(())
    }

    fn receive_packet(&mut self) -> Result<Packet> {
        self.packet_buffer.pop_front().ok_or(Error::TryAgain)
    }

    fn flush(&mut self) -> Result<()> {
        self.packet_buffer.clear();
        Ok(())
    }
}
