//! Errors produced while decoding protocol messages.
//!
//! Encoding is infallible (it only ever appends to a caller-owned `Vec<u8>`);
//! only decoding a hostile or truncated byte slice can fail.

use thiserror::Error;

/// Decode-time failure for the protocol codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtoError {
    /// A varint ran off the end of the buffer before its terminating byte.
    #[error("truncated varint at offset {offset}")]
    TruncatedVarint {
        /// Byte offset where decoding started.
        offset: usize,
    },

    /// A varint used more than 10 bytes (cannot represent a valid u64).
    #[error("varint too long at offset {offset}")]
    VarintTooLong {
        /// Byte offset where decoding started.
        offset: usize,
    },

    /// A length-delimited field's declared length exceeds the remaining buffer.
    #[error("truncated field: expected {expected} bytes, {actual} remaining")]
    TruncatedField {
        /// Declared field length.
        expected: usize,
        /// Bytes actually remaining.
        actual: usize,
    },

    /// A 32/64-bit fixed-width field ran off the end of the buffer.
    #[error("truncated fixed-width field")]
    TruncatedFixed,

    /// A wire type byte outside the protobuf wire-type range (0,1,2,5).
    #[error("unsupported wire type {0}")]
    UnsupportedWireType(u8),

    /// A length-delimited byte field was expected to be valid UTF-8 and was not.
    #[error("invalid UTF-8 in string field {field}")]
    InvalidUtf8 {
        /// Field number of the offending string field.
        field: u32,
    },
}

/// Result alias for decode operations.
pub type Result<T> = std::result::Result<T, ProtoError>;
