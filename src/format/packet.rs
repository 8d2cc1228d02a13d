//! Packet representation for compressed audio data

use crate::util::{Buffer, Timestamp};
use std::fmt;

/// A packet of compressed audio data
///
/// The payload is opaque; the codec context carries all state between packets.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    /// Compressed data
    pub data: Buffer,

    /// Presentation timestamp, in sample ticks
    pub pts: Timestamp,

    /// Duration in samples per channel (0 if unknown)
    pub duration: i64,
}

impl Packet {
    /// Create a new packet
    pub fn new(data: Buffer) -> Self {
        Packet {
            data,
            pts: Timestamp::none(),
            duration: 0,
        }
    }

    /// Create a packet with a presentation timestamp
    pub fn with_pts(data: Buffer, pts: Timestamp) -> Self {
        Packet {
            data,
            pts,
            duration: 0,
        }
    }

    /// Get the size of the packet data
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Check if the packet carries no data (a lost packet)
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Packet(size={}, pts={}, duration={})",
            self.size(),
            self.pts,
            self.duration
        )
    }
}
