//! Error types for zvd-opus

use thiserror::Error;

/// Result type alias for zvd-opus operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for zvd-opus
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Audio format rejected by the codec boundary
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Structural precondition violated
    #[error("Bad argument: {0}")]
    BadArgument(String),

    /// The codec returned a negative status code
    #[error("Codec error {0}: {}", describe(.0))]
    Codec(i32),

    /// The codec broke an invariant the wrapper relies on
    #[error("Codec internal error: {0}")]
    CodecInternal(String),

    /// Media sample container construction failed
    #[error("Adapter error: {0}")]
    Adapter(String),

    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),

    /// Unsupported feature
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Try again later
    #[error("Try again")]
    TryAgain,
}

impl Error {
    /// Create an invalid format error
    pub fn invalid_format<S: Into<String>>(msg: S) -> Self {
        Error::InvalidFormat(msg.into())
    }

    /// Create a bad argument error
    pub fn bad_argument<S: Into<String>>(msg: S) -> Self {
        Error::BadArgument(msg.into())
    }

    /// Create a codec internal error
    pub fn codec_internal<S: Into<String>>(msg: S) -> Self {
        Error::CodecInternal(msg.into())
    }

    /// Create an adapter error
    pub fn adapter<S: Into<String>>(msg: S) -> Self {
        Error::Adapter(msg.into())
    }

    /// Create an unsupported error
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Error::Unsupported(msg.into())
    }

    /// Map a status reported by a codec context.
    ///
    /// Negative values are codec error codes and are kept as-is. Anything else
    /// means the context failed without reporting a code.
    pub fn from_status(status: i32) -> Self {
        if status < 0 {
            Error::Codec(status)
        } else {
            Error::CodecInternal(format!(
                "codec failed with non-error status {}",
                status
            ))
        }
    }

    /// The raw codec status code, if this error came from the codec
    pub fn codec_code(&self) -> Option<i32> {
        match self {
            Error::Codec(code) => Some(*code),
            _ => None,
        }
    }
}

/// Codec status codes (libopus numbering)
pub mod status {
    pub const OK: i32 = 0;
    pub const BAD_ARG: i32 = -1;
    pub const BUFFER_TOO_SMALL: i32 = -2;
    pub const INTERNAL_ERROR: i32 = -3;
    pub const INVALID_PACKET: i32 = -4;
    pub const UNIMPLEMENTED: i32 = -5;
    pub const INVALID_STATE: i32 = -6;
    pub const ALLOC_FAIL: i32 = -7;
}

fn describe(code: &i32) -> &'static str {
    status_message(*code)
}

/// Human readable text for a codec status code
pub fn status_message(code: i32) -> &'static str {
    match code {
        status::OK => "success",
        status::BAD_ARG => "invalid argument",
        status::BUFFER_TOO_SMALL => "buffer too small",
        status::INTERNAL_ERROR => "internal error",
        status::INVALID_PACKET => "corrupted stream",
        status::UNIMPLEMENTED => "request not implemented",
        status::INVALID_STATE => "invalid state",
        status::ALLOC_FAIL => "memory allocation failed",
        _ => "unknown error",
    }
}
