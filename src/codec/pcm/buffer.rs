//! Structured PCM sample storage

use super::PcmKind;
use crate::error::{Error, Result};
use crate::format::AudioFormat;
use crate::util::{SampleFormat, SampleLayout};
use byteorder::{ByteOrder, LittleEndian};
use std::fmt::Debug;

/// Typed sample storage.
///
/// Interleaved buffers hold a single plane of `capacity * channels` samples,
/// planar buffers one plane of `capacity` samples per channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Planes {
    F32(Vec<Vec<f32>>),
    I16(Vec<Vec<i16>>),
}

/// A sample type the codec boundary understands
pub trait Sample: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Matching sample representation
    const FORMAT: SampleFormat;

    /// Borrow the planes if they hold this sample type
    fn planes(planes: &Planes) -> Option<&[Vec<Self>]>;

    /// Mutably borrow the planes if they hold this sample type
    fn planes_mut(planes: &mut Planes) -> Option<&mut [Vec<Self>]>;

    /// Wrap typed planes
    fn into_planes(planes: Vec<Vec<Self>>) -> Planes;

    /// Decode one little-endian sample
    fn read_le(src: &[u8]) -> Self;

    /// Encode one sample as little-endian
    fn write_le(self, dst: &mut [u8]);

    /// Decode `dst.len()` samples; `src` must be exactly that many samples long
    fn read_le_into(src: &[u8], dst: &mut [Self]);

    /// Encode `src`; `dst` must be exactly `src.len()` samples long
    fn write_le_from(src: &[Self], dst: &mut [u8]);
}

impl Sample for f32 {
    const FORMAT: SampleFormat = SampleFormat::F32;

    fn planes(planes: &Planes) -> Option<&[Vec<f32>]> {
        match planes {
            Planes::F32(planes) => Some(planes),
            Planes::I16(_) => None,
        }
    }

    fn planes_mut(planes: &mut Planes) -> Option<&mut [Vec<f32>]> {
        match planes {
            Planes::F32(planes) => Some(planes),
            Planes::I16(_) => None,
        }
    }

    fn into_planes(planes: Vec<Vec<f32>>) -> Planes {
        Planes::F32(planes)
    }

    fn read_le(src: &[u8]) -> f32 {
        LittleEndian::read_f32(src)
    }

    fn write_le(self, dst: &mut [u8]) {
        LittleEndian::write_f32(dst, self)
    }

    fn read_le_into(src: &[u8], dst: &mut [f32]) {
        LittleEndian::read_f32_into(src, dst)
    }

    fn write_le_from(src: &[f32], dst: &mut [u8]) {
        LittleEndian::write_f32_into(src, dst)
    }
}

impl Sample for i16 {
    const FORMAT: SampleFormat = SampleFormat::I16;

    fn planes(planes: &Planes) -> Option<&[Vec<i16>]> {
        match planes {
            Planes::I16(planes) => Some(planes),
            Planes::F32(_) => None,
        }
    }

    fn planes_mut(planes: &mut Planes) -> Option<&mut [Vec<i16>]> {
        match planes {
            Planes::I16(planes) => Some(planes),
            Planes::F32(_) => None,
        }
    }

    fn into_planes(planes: Vec<Vec<i16>>) -> Planes {
        Planes::I16(planes)
    }

    fn read_le(src: &[u8]) -> i16 {
        LittleEndian::read_i16(src)
    }

    fn write_le(self, dst: &mut [u8]) {
        LittleEndian::write_i16(dst, self)
    }

    fn read_le_into(src: &[u8], dst: &mut [i16]) {
        LittleEndian::read_i16_into(src, dst)
    }

    fn write_le_from(src: &[i16], dst: &mut [u8]) {
        LittleEndian::write_i16_into(src, dst)
    }
}

/// An owned buffer of PCM samples addressed by channel and frame.
///
/// `frame_count` frames are valid out of `frame_capacity` allocated; nothing
/// past `frame_count` is ever read by the converters.
#[derive(Debug, Clone)]
pub struct PcmBuffer {
    format: AudioFormat,
    kind: PcmKind,
    frame_count: usize,
    frame_capacity: usize,
    planes: Planes,
}

impl PcmBuffer {
    /// Allocate a zeroed buffer with room for `frame_capacity` frames.
    ///
    /// The buffer starts out with a frame count of zero.
    pub fn new(format: AudioFormat, frame_capacity: usize) -> Result<Self> {
        let kind = PcmKind::of(&format)?;
        let channels = format.channels as usize;
        let plane_len = match format.layout {
            SampleLayout::Interleaved => frame_capacity.checked_mul(channels),
            SampleLayout::Planar => Some(frame_capacity),
        }
        .ok_or_else(|| {
            Error::bad_argument(format!("frame capacity {} overflows", frame_capacity))
        })?;
        let plane_count = format.layout.plane_count(channels);

        let planes = match kind {
            PcmKind::F32Interleaved | PcmKind::F32Planar => {
                Planes::F32(alloc_planes(plane_count, plane_len)?)
            }
            PcmKind::I16Interleaved | PcmKind::I16Planar => {
                Planes::I16(alloc_planes(plane_count, plane_len)?)
            }
        };

        Ok(PcmBuffer {
            format,
            kind,
            frame_count: 0,
            frame_capacity,
            planes,
        })
    }

    /// Wrap interleaved samples; every sample is a valid frame member
    pub fn from_interleaved<T: Sample>(format: AudioFormat, samples: Vec<T>) -> Result<Self> {
        let kind = PcmKind::of(&format)?;
        check_sample_type::<T>(&format)?;
        if kind.layout() != SampleLayout::Interleaved {
            return Err(Error::bad_argument(format!(
                "interleaved samples given for a {} format",
                format.layout
            )));
        }

        let channels = format.channels as usize;
        if samples.len() % channels != 0 {
            return Err(Error::bad_argument(format!(
                "{} samples do not divide into {} channels",
                samples.len(),
                channels
            )));
        }

        let frames = samples.len() / channels;
        Ok(PcmBuffer {
            format,
            kind,
            frame_count: frames,
            frame_capacity: frames,
            planes: T::into_planes(vec![samples]),
        })
    }

    /// Wrap one sample vector per channel; all channels must be the same length
    pub fn from_planar<T: Sample>(format: AudioFormat, channels: Vec<Vec<T>>) -> Result<Self> {
        let kind = PcmKind::of(&format)?;
        check_sample_type::<T>(&format)?;
        if kind.layout() != SampleLayout::Planar {
            return Err(Error::bad_argument(format!(
                "planar samples given for a {} format",
                format.layout
            )));
        }

        if channels.len() != format.channels as usize {
            return Err(Error::bad_argument(format!(
                "expected {} channel buffers, got {}",
                format.channels,
                channels.len()
            )));
        }

        let frames = channels.first().map_or(0, Vec::len);
        if let Some(ch) = channels.iter().position(|plane| plane.len() != frames) {
            return Err(Error::bad_argument(format!(
                "channel {} has {} samples, expected {}",
                ch,
                channels[ch].len(),
                frames
            )));
        }

        Ok(PcmBuffer {
            format,
            kind,
            frame_count: frames,
            frame_capacity: frames,
            planes: T::into_planes(channels),
        })
    }

    /// Get the buffer format
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Get the conversion kind of this buffer
    pub fn kind(&self) -> PcmKind {
        self.kind
    }

    pub fn sample_rate(&self) -> u32 {
        self.format.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.format.channels
    }

    pub fn sample_format(&self) -> SampleFormat {
        self.format.sample_format
    }

    pub fn layout(&self) -> SampleLayout {
        self.format.layout
    }

    /// Number of valid frames
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Number of frames the storage can hold
    pub fn frame_capacity(&self) -> usize {
        self.frame_capacity
    }

    /// Check if the buffer holds no valid frames
    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    /// Size in bytes of the valid frames once serialized
    pub fn byte_len(&self) -> usize {
        self.frame_count * self.format.bytes_per_frame()
    }

    /// Set the number of valid frames; must not exceed the capacity
    pub fn set_frame_count(&mut self, frame_count: usize) -> Result<()> {
        if frame_count > self.frame_capacity {
            return Err(Error::bad_argument(format!(
                "frame count {} exceeds capacity {}",
                frame_count, self.frame_capacity
            )));
        }
        self.frame_count = frame_count;
        Ok(())
    }

    /// Mark every frame invalid without releasing storage
    pub fn clear(&mut self) {
        self.frame_count = 0;
    }

    /// Number of storage planes
    pub fn plane_count(&self) -> usize {
        match &self.planes {
            Planes::F32(planes) => planes.len(),
            Planes::I16(planes) => planes.len(),
        }
    }

    /// Valid samples of a plane.
    ///
    /// Returns `None` if `T` is not the buffer's sample type or the plane
    /// does not exist.
    pub fn plane<T: Sample>(&self, index: usize) -> Option<&[T]> {
        let len = self.valid_plane_len();
        T::planes(&self.planes)?.get(index)?.get(..len)
    }

    /// Mutable valid samples of a plane
    pub fn plane_mut<T: Sample>(&mut self, index: usize) -> Option<&mut [T]> {
        let len = self.valid_plane_len();
        T::planes_mut(&mut self.planes)?
            .get_mut(index)?
            .get_mut(..len)
    }

    /// Sample of `channel` at `frame`, for either layout
    pub fn sample<T: Sample>(&self, channel: usize, frame: usize) -> Option<T> {
        let channels = self.format.channels as usize;
        if channel >= channels || frame >= self.frame_count {
            return None;
        }
        match self.format.layout {
            SampleLayout::Interleaved => {
                self.plane::<T>(0)?.get(frame * channels + channel).copied()
            }
            SampleLayout::Planar => self.plane::<T>(channel)?.get(frame).copied(),
        }
    }

    /// Full-capacity storage
    pub(crate) fn storage<T: Sample>(&self) -> Option<&[Vec<T>]> {
        T::planes(&self.planes)
    }

    /// Full-capacity mutable storage
    pub(crate) fn storage_mut<T: Sample>(&mut self) -> Option<&mut [Vec<T>]> {
        T::planes_mut(&mut self.planes)
    }

    fn valid_plane_len(&self) -> usize {
        match self.format.layout {
            SampleLayout::Interleaved => self.frame_count * self.format.channels as usize,
            SampleLayout::Planar => self.frame_count,
        }
    }
}

impl PartialEq for PcmBuffer {
    /// Buffers are equal when their formats and valid samples match; spare
    /// capacity is ignored.
    fn eq(&self, other: &Self) -> bool {
        if self.format != other.format || self.frame_count != other.frame_count {
            return false;
        }
        (0..self.plane_count()).all(|index| match self.kind.sample_format() {
            SampleFormat::F32 => self.plane::<f32>(index) == other.plane::<f32>(index),
            _ => self.plane::<i16>(index) == other.plane::<i16>(index),
        })
    }
}

fn check_sample_type<T: Sample>(format: &AudioFormat) -> Result<()> {
    if T::FORMAT != format.sample_format {
        return Err(Error::bad_argument(format!(
            "{} samples given for a {} format",
            T::FORMAT,
            format.sample_format
        )));
    }
    Ok(())
}

fn alloc_planes<T: Sample>(count: usize, len: usize) -> Result<Vec<Vec<T>>> {
    let mut planes = Vec::new();
    planes
        .try_reserve_exact(count)
        .map_err(|e| Error::bad_argument(format!("cannot allocate {} planes: {}", count, e)))?;

    for _ in 0..count {
        let mut plane = Vec::new();
        plane
            .try_reserve_exact(len)
            .map_err(|e| Error::bad_argument(format!("cannot allocate {} samples: {}", len, e)))?;
        plane.resize(len, T::default());
        planes.push(plane);
    }

    Ok(planes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stereo(layout: SampleLayout, sample_format: SampleFormat) -> AudioFormat {
        AudioFormat::new(48000, 2, sample_format, layout)
    }

    #[test]
    fn test_new_buffer_shape() {
        let format = stereo(SampleLayout::Interleaved, SampleFormat::F32);
        let buffer = PcmBuffer::new(format, 480).unwrap();
        assert_eq!(buffer.frame_count(), 0);
        assert_eq!(buffer.frame_capacity(), 480);
        assert_eq!(buffer.plane_count(), 1);
        assert_eq!(buffer.storage::<f32>().unwrap()[0].len(), 960);

        let buffer = PcmBuffer::new(stereo(SampleLayout::Planar, SampleFormat::I16), 480).unwrap();
        assert_eq!(buffer.plane_count(), 2);
        assert!(buffer.storage::<i16>().unwrap().iter().all(|p| p.len() == 480));
        assert!(buffer.storage::<f32>().is_none());
    }

    #[test]
    fn test_new_rejects_invalid_format() {
        let format = AudioFormat::interleaved(44100, 2, SampleFormat::F32);
        assert!(matches!(PcmBuffer::new(format, 10), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_huge_capacity_is_bad_argument() {
        let format = stereo(SampleLayout::Interleaved, SampleFormat::F32);
        assert!(matches!(
            PcmBuffer::new(format, usize::MAX),
            Err(Error::BadArgument(_))
        ));
        assert!(matches!(
            PcmBuffer::new(format, usize::MAX / 4),
            Err(Error::BadArgument(_))
        ));
    }

    #[test]
    fn test_set_frame_count_respects_capacity() {
        let format = stereo(SampleLayout::Planar, SampleFormat::F32);
        let mut buffer = PcmBuffer::new(format, 4).unwrap();
        assert!(buffer.set_frame_count(4).is_ok());
        assert!(matches!(buffer.set_frame_count(5), Err(Error::BadArgument(_))));
        assert_eq!(buffer.frame_count(), 4);
        buffer.clear();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_sample_lookup_both_layouts() {
        let interleaved = PcmBuffer::from_interleaved(
            stereo(SampleLayout::Interleaved, SampleFormat::I16),
            vec![1i16, 4, 2, 5, 3, 6],
        )
        .unwrap();
        let planar = PcmBuffer::from_planar(
            stereo(SampleLayout::Planar, SampleFormat::I16),
            vec![vec![1i16, 2, 3], vec![4, 5, 6]],
        )
        .unwrap();

        for frame in 0..3 {
            for channel in 0..2 {
                assert_eq!(
                    interleaved.sample::<i16>(channel, frame),
                    planar.sample::<i16>(channel, frame)
                );
            }
        }
        assert_eq!(planar.sample::<i16>(1, 2), Some(6));
        assert_eq!(planar.sample::<i16>(2, 0), None);
        assert_eq!(planar.sample::<i16>(0, 3), None);
        assert_eq!(planar.sample::<f32>(0, 0), None);
    }

    #[test]
    fn test_plane_view_hides_spare_capacity() {
        let format = stereo(SampleLayout::Planar, SampleFormat::F32);
        let mut buffer = PcmBuffer::new(format, 8).unwrap();
        buffer.set_frame_count(3).unwrap();
        assert_eq!(buffer.plane::<f32>(0).unwrap().len(), 3);
        buffer.plane_mut::<f32>(1).unwrap().copy_from_slice(&[0.1, 0.2, 0.3]);
        assert_eq!(buffer.sample::<f32>(1, 2), Some(0.3));
        assert_eq!(buffer.byte_len(), 3 * 2 * 4);
    }

    #[test]
    fn test_constructor_mismatches() {
        let planar = stereo(SampleLayout::Planar, SampleFormat::F32);
        assert!(PcmBuffer::from_interleaved(planar, vec![0.0f32; 4]).is_err());
        assert!(PcmBuffer::from_planar(planar, vec![vec![0.0f32; 3]]).is_err());
        assert!(PcmBuffer::from_planar(planar, vec![vec![0.0f32; 3], vec![0.0; 2]]).is_err());
        assert!(PcmBuffer::from_planar(planar, vec![vec![0i16; 3], vec![0; 3]]).is_err());

        let interleaved = stereo(SampleLayout::Interleaved, SampleFormat::F32);
        assert!(PcmBuffer::from_interleaved(interleaved, vec![0.0f32; 3]).is_err());
    }

    #[test]
    fn test_equality_ignores_capacity() {
        let format = stereo(SampleLayout::Planar, SampleFormat::I16);
        let exact = PcmBuffer::from_planar(format, vec![vec![1i16, 2], vec![3, 4]]).unwrap();
        let mut roomy = PcmBuffer::new(format, 16).unwrap();
        roomy.set_frame_count(2).unwrap();
        roomy.plane_mut::<i16>(0).unwrap().copy_from_slice(&[1, 2]);
        roomy.plane_mut::<i16>(1).unwrap().copy_from_slice(&[3, 4]);
        assert_eq!(exact, roomy);
    }
}
