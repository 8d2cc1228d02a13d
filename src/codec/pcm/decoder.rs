//! PCM deserialization: interleaved little-endian bytes to structured buffers

use super::{dequantize, PcmBuffer, PcmKind, Sample};
use crate::codec::adapter::{AudioFrameAdapter, MediaSampleAdapter};
use crate::codec::{AudioFrame, Decoder};
use crate::error::{Error, Result};
use crate::format::{AudioFormat, Packet};
use crate::util::{SampleFormat, Timestamp};
use std::collections::VecDeque;

/// Deserialize interleaved bytes into a buffer of `format`.
///
/// The frame count is `bytes.len() / bytes_per_frame`; trailing bytes that
/// do not make up a whole frame are ignored. With an explicit
/// `frame_capacity` the storage is sized for that many frames while the
/// frame count still reflects the input.
pub fn deserialize(
    bytes: &[u8],
    format: AudioFormat,
    frame_capacity: Option<usize>,
) -> Result<PcmBuffer> {
    format.validate()?;

    let frames = format.frames_from_bytes(bytes.len());
    let src = &bytes[..frames * format.bytes_per_frame()];
    let mut buffer = allocate(format, frames, frame_capacity)?;

    match buffer.kind() {
        PcmKind::F32Interleaved => fill_interleaved::<f32>(&mut buffer, src)?,
        PcmKind::F32Planar => fill_planes::<f32, f32>(&mut buffer, src, frames, |s| s)?,
        PcmKind::I16Interleaved => fill_interleaved::<i16>(&mut buffer, src)?,
        PcmKind::I16Planar => fill_planes::<i16, i16>(&mut buffer, src, frames, |s| s)?,
    }

    buffer.set_frame_count(frames)?;
    Ok(buffer)
}

/// Deserialize interleaved s16 bytes into a buffer of `format`.
///
/// Float targets are filled with [`dequantize`]d samples; s16 targets are
/// the same as [`deserialize`].
pub fn deserialize_dequantized(
    bytes: &[u8],
    format: AudioFormat,
    frame_capacity: Option<usize>,
) -> Result<PcmBuffer> {
    let kind = PcmKind::of(&format)?;
    if kind.sample_format() == SampleFormat::I16 {
        return deserialize(bytes, format, frame_capacity);
    }

    let source = format.with_sample_format(SampleFormat::I16);
    let frames = source.frames_from_bytes(bytes.len());
    let src = &bytes[..frames * source.bytes_per_frame()];
    let mut buffer = allocate(format, frames, frame_capacity)?;

    if kind.layout().is_planar() {
        fill_planes::<i16, f32>(&mut buffer, src, frames, dequantize)?;
    } else {
        let dst = interleaved_target::<f32>(&mut buffer, src.len() / 2)?;
        for (sample, bytes) in dst.iter_mut().zip(src.chunks_exact(2)) {
            *sample = dequantize(i16::read_le(bytes));
        }
    }

    buffer.set_frame_count(frames)?;
    Ok(buffer)
}

fn allocate(
    format: AudioFormat,
    frames: usize,
    frame_capacity: Option<usize>,
) -> Result<PcmBuffer> {
    let capacity = match frame_capacity {
        Some(capacity) if capacity < frames => {
            return Err(Error::bad_argument(format!(
                "frame capacity {} is smaller than the {} frames in the input",
                capacity, frames
            )))
        }
        Some(capacity) => capacity,
        None => frames,
    };
    PcmBuffer::new(format, capacity)
}

fn unavailable() -> Error {
    Error::bad_argument("channel data unavailable")
}

fn interleaved_target<T: Sample>(buffer: &mut PcmBuffer, samples: usize) -> Result<&mut [T]> {
    buffer
        .storage_mut::<T>()
        .and_then(|planes| planes.first_mut())
        .and_then(|plane| plane.get_mut(..samples))
        .ok_or_else(unavailable)
}

fn fill_interleaved<T: Sample>(buffer: &mut PcmBuffer, src: &[u8]) -> Result<()> {
    let dst = interleaved_target::<T>(buffer, src.len() / T::FORMAT.sample_size())?;
    T::read_le_into(src, dst);
    Ok(())
}

/// De-interleave `frames` frames of `S` samples into the planes of `buffer`
fn fill_planes<S: Sample, T: Sample>(
    buffer: &mut PcmBuffer,
    src: &[u8],
    frames: usize,
    map: impl Fn(S) -> T,
) -> Result<()> {
    let channels = buffer.channels() as usize;
    let planes = buffer.storage_mut::<T>().ok_or_else(unavailable)?;
    if planes.len() != channels || planes.iter().any(|p| p.len() < frames) {
        return Err(unavailable());
    }

    let size = S::FORMAT.sample_size();
    for (frame, input) in src.chunks_exact(size * channels).take(frames).enumerate() {
        for (bytes, plane) in input.chunks_exact(size).zip(planes.iter_mut()) {
            plane[frame] = map(S::read_le(bytes));
        }
    }
    Ok(())
}

/// Raw PCM decoder
///
/// Packets carry interleaved little-endian samples in the decoder's sample
/// representation.
pub struct PcmDecoder {
    format: AudioFormat,
    pending: VecDeque<Packet>,
    next_pts: Timestamp,
}

impl PcmDecoder {
    /// Create a decoder producing buffers of `format`
    pub fn new(format: AudioFormat) -> Result<Self> {
        format.validate()?;
        Ok(PcmDecoder {
            format,
            pending: VecDeque::new(),
            next_pts: Timestamp::zero(),
        })
    }

    /// Get the output format
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Decode one packet into a buffer
    pub fn decode_packet(&self, packet: &Packet) -> Result<PcmBuffer> {
        let frame_size = self.format.bytes_per_frame();
        if packet.size() % frame_size != 0 {
            return Err(Error::bad_argument(format!(
                "packet of {} bytes is not a whole number of {}-byte frames",
                packet.size(),
                frame_size
            )));
        }
        deserialize(packet.data.as_slice(), self.format, None)
    }
}

impl Decoder for PcmDecoder {
    fn send_packet(&mut self, packet: &Packet) -> Result<()> {
        self.pending.push_back(packet.clone());
        Ok(())
    }

    fn receive_frame(&mut self) -> Result<AudioFrame> {
        let packet = self.pending.pop_front().ok_or(Error::TryAgain)?;
        let buffer = self.decode_packet(&packet)?;
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
        Ok(())
    }
}
