//! Audio sample format definitions

use std::fmt;

/// Audio sample representation
///
/// Every format that can be described is listed here; the Opus boundary only
/// accepts [`SampleFormat::I16`] and [`SampleFormat::F32`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// Unsigned 8-bit
    U8,
    /// Signed 16-bit
    I16,
    /// Signed 32-bit
    I32,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
}

impl SampleFormat {
    /// Get the size in bytes of one sample
    pub fn sample_size(&self) -> usize {
        match self {
            SampleFormat::U8 => 1,
            SampleFormat::I16 => 2,
            SampleFormat::I32 => 4,
            SampleFormat::F32 => 4,
            SampleFormat::F64 => 8,
        }
    }

    /// Check if this is a floating point format
    pub fn is_float(&self) -> bool {
        matches!(self, SampleFormat::F32 | SampleFormat::F64)
    }

    /// Check if the Opus codec accepts this representation
    pub fn is_codec_supported(&self) -> bool {
        matches!(self, SampleFormat::I16 | SampleFormat::F32)
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleFormat::U8 => "u8",
            SampleFormat::I16 => "s16",
            SampleFormat::I32 => "s32",
            SampleFormat::F32 => "f32",
            SampleFormat::F64 => "f64",
        };
        write!(f, "{}", name)
    }
}

/// How channels are arranged in memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleLayout {
    /// All channels of a frame stored next to each other
    #[default]
    Interleaved,
    /// One contiguous region per channel
    Planar,
}

impl SampleLayout {
    /// Check if this is the planar layout
    pub fn is_planar(&self) -> bool {
        matches!(self, SampleLayout::Planar)
    }

    /// Number of storage planes needed for `channels` channels
    pub fn plane_count(&self, channels: usize) -> usize {
        match self {
            SampleLayout::Interleaved => 1,
            SampleLayout::Planar => channels,
        }
    }
}

impl fmt::Display for SampleLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleLayout::Interleaved => write!(f, "interleaved"),
            SampleLayout::Planar => write!(f, "planar"),
        }
    }
}
