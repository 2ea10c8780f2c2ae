//! Protocol-Buffers-compatible codec for the ESPHome native API message set.
//!
//! This crate is pure and allocation-light by construction: encoding writes
//! into a caller-owned `Vec<u8>`, size calculation never allocates, and
//! decoding borrows from the input slice. It knows nothing about sockets,
//! framing, or encryption — those live in `esphome-frame` and `esphome-core`.

pub mod catalog;
pub mod error;
pub mod messages;
pub mod varint;
pub mod wire;

pub use error::{ProtoError, Result};
pub use wire::{FieldValue, ProtoMessage, WireType};
