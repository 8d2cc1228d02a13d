//! PCM (Pulse Code Modulation) buffers and conversion
//!
//! This module moves samples between structured [`PcmBuffer`]s and the flat,
//! interleaved little-endian byte layout used at the codec boundary.
//!
//! Conversion is dispatched over [`PcmKind`], the four combinations of sample
//! representation (f32 / s16) and layout (interleaved / planar) the codec
//! accepts. Float samples are quantized to s16 with a symmetric scale of
//! 32767, so `-1.0` maps to `-32767` and never to `-32768`.

pub mod buffer;
pub mod decoder;
pub mod encoder;

pub use buffer::{PcmBuffer, Planes, Sample};
pub use decoder::{deserialize, deserialize_dequantized, PcmDecoder};
pub use encoder::{serialize, serialize_quantized, PcmEncoder};

use crate::error::{Error, Result};
use crate::format::AudioFormat;
use crate::util::{SampleFormat, SampleLayout};

/// Scale between normalized float samples and s16, used in both directions
pub const I16_SCALE: f32 = 32767.0;

/// The sample representation and layout combinations the codec accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PcmKind {
    F32Interleaved,
    F32Planar,
    I16Interleaved,
    I16Planar,
}

impl PcmKind {
    /// Classify a format, validating it first
    pub fn of(format: &AudioFormat) -> Result<Self> {
        format.validate()?;
        match (format.sample_format, format.layout) {
            (SampleFormat::F32, SampleLayout::Interleaved) => Ok(PcmKind::F32Interleaved),
            (SampleFormat::F32, SampleLayout::Planar) => Ok(PcmKind::F32Planar),
            (SampleFormat::I16, SampleLayout::Interleaved) => Ok(PcmKind::I16Interleaved),
            (SampleFormat::I16, SampleLayout::Planar) => Ok(PcmKind::I16Planar),
            (other, _) => Err(Error::invalid_format(format!(
                "unsupported sample format {}",
                other
            ))),
        }
    }

    /// Sample representation of this kind
    pub fn sample_format(&self) -> SampleFormat {
        match self {
            PcmKind::F32Interleaved | PcmKind::F32Planar => SampleFormat::F32,
            PcmKind::I16Interleaved | PcmKind::I16Planar => SampleFormat::I16,
        }
    }

    /// Layout of this kind
    pub fn layout(&self) -> SampleLayout {
        match self {
            PcmKind::F32Interleaved | PcmKind::I16Interleaved => SampleLayout::Interleaved,
            PcmKind::F32Planar | PcmKind::I16Planar => SampleLayout::Planar,
        }
    }
}

/// Quantize a normalized float sample to s16.
///
/// The input is clamped to `[-1.0, 1.0]` and scaled by 32767; the cast
/// truncates toward zero. NaN quantizes to 0.
pub fn quantize(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * I16_SCALE) as i16
}

/// Convert an s16 sample back to a normalized float
pub fn dequantize(sample: i16) -> f32 {
    sample as f32 / I16_SCALE
}

/// Interleave the first `frames` frames of `planes` into `dst`.
///
/// `dst` must hold at least `frames * planes.len()` samples and every plane
/// at least `frames` samples.
pub(crate) fn interleave<T: Copy>(planes: &[Vec<T>], frames: usize, dst: &mut [T]) {
    let channels = planes.len();
    if channels == 0 {
        return;
    }
    for (frame, out) in dst[..frames * channels].chunks_exact_mut(channels).enumerate() {
        for (sample, plane) in out.iter_mut().zip(planes) {
            *sample = plane[frame];
        }
    }
}

/// Split the first `frames` interleaved frames of `src` into `planes`
pub(crate) fn deinterleave<T: Copy>(src: &[T], frames: usize, planes: &mut [Vec<T>]) {
    let channels = planes.len();
    if channels == 0 {
        return;
    }
    for (frame, input) in src[..frames * channels].chunks_exact(channels).enumerate() {
        for (sample, plane) in input.iter().zip(planes.iter_mut()) {
            plane[frame] = *sample;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_bounds() {
        assert_eq!(quantize(1.0), 32767);
        assert_eq!(quantize(-1.0), -32767);
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(4.0), 32767);
        assert_eq!(quantize(-4.0), -32767);
        assert_eq!(quantize(f32::NAN), 0);
    }

    #[test]
    fn test_quantize_truncates_toward_zero() {
        // 0.5 * 32767 = 16383.5
        assert_eq!(quantize(0.5), 16383);
        assert_eq!(quantize(-0.5), -16383);
    }

    #[test]
    fn test_quantize_never_leaves_symmetric_range() {
        let mut x = -2.0f32;
        while x <= 2.0 {
            let q = quantize(x);
            assert!((-32767..=32767).contains(&q), "{} -> {}", x, q);
            x += 0.001;
        }
    }

    #[test]
    fn test_dequantize() {
        assert_eq!(dequantize(32767), 1.0);
        assert_eq!(dequantize(-32767), -1.0);
        assert_eq!(dequantize(0), 0.0);
    }

    #[test]
    fn test_kind_dispatch() {
        let format = AudioFormat::planar(48000, 2, SampleFormat::I16);
        assert_eq!(PcmKind::of(&format).unwrap(), PcmKind::I16Planar);
        assert_eq!(PcmKind::I16Planar.sample_format(), SampleFormat::I16);
        assert_eq!(PcmKind::F32Planar.layout(), SampleLayout::Planar);

        let bad = AudioFormat::interleaved(48000, 2, SampleFormat::F64);
        assert!(matches!(PcmKind::of(&bad), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_interleave_helpers() {
        let planes = vec![vec![1, 2, 3], vec![4, 5, 6]];
        let mut interleaved = vec![0; 6];
        interleave(&planes, 3, &mut interleaved);
        assert_eq!(interleaved, vec![1, 4, 2, 5, 3, 6]);

        let mut back = vec![vec![0; 3], vec![0; 3]];
        deinterleave(&interleaved, 3, &mut back);
        assert_eq!(back, planes);
    }

    #[test]
    fn test_interleave_stops_at_frame_count() {
        let planes = vec![vec![1, 2, 3], vec![4, 5, 6]];
        let mut interleaved = vec![-1; 6];
        interleave(&planes, 2, &mut interleaved);
        assert_eq!(interleaved, vec![1, 4, 2, 5, -1, -1]);
    }
}
