//! Plaintext and Noise-encrypted frame helpers for the ESPHome native API.
//!
//! Both helpers share one external contract (`read_packet`,
//! `write_protobuf_packet{,s}`, `can_write_without_blocking`,
//! `frame_header_padding`, `frame_footer_size`, `close`) so the connection
//! state machine in `esphome-core` can stay transport-agnostic. Sockets are
//! driven non-blocking and cooperatively: a would-block on read or write is
//! ordinary and never closes the connection.

pub mod error;
pub mod noise;
pub mod plaintext;
pub mod transport;
mod txqueue;

pub use error::{FrameError, Result};
pub use transport::FrameTransport;
