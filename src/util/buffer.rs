//! Byte buffers for compressed packets and serialized PCM

use bytes::Bytes;

/// A reference-counted, immutable byte buffer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Buffer {
    data: Bytes,
}

impl Buffer {
    /// Create a new buffer from bytes
    pub fn new(data: Bytes) -> Self {
        Buffer { data }
    }

    /// Create a buffer from a vector
    pub fn from_vec(vec: Vec<u8>) -> Self {
        Buffer {
            data: Bytes::from(vec),
        }
    }

    /// Create a buffer by copying a slice
    pub fn copy_from_slice(data: &[u8]) -> Self {
        Buffer {
            data: Bytes::copy_from_slice(data),
        }
    }

    /// Create an empty buffer
    pub fn empty() -> Self {
        Buffer { data: Bytes::new() }
    }

    /// Get the length of the buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a slice of the buffer data
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Clone the bytes (cheap, reference counted)
    pub fn clone_bytes(&self) -> Bytes {
        self.data.clone()
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(vec: Vec<u8>) -> Self {
        Buffer::from_vec(vec)
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
