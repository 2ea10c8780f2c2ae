//! Transport-agnostic connection state machine and entity model for the
//! native API server. Everything here is sans-IO: it never touches a
//! socket, only decoded frames, timestamps, and an [`env::Environment`]
//! collaborator for time and randomness. `esphome-server` is the driver
//! that owns sockets and wires this crate's actions back onto the wire.

pub mod batch;
pub mod connection;
pub mod entity;
pub mod env;
pub mod enumerator;
pub mod error;
pub mod passthrough;

pub use connection::{Connection, ConnectionAction, ConnectionState, DeviceIdentity, EntityCommand};
pub use entity::{object_id_hash, EntityId, EntityInfo, EntityKind, EntitySource, StateValue};
pub use env::Environment;
pub use error::{ConnectionError, Result};
pub use passthrough::{ConnectionId, GlobalSubscriptions, PassThroughChannel};
