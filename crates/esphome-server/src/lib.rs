//! Accept loop, demo entity registry, and production `Environment` for the
//! native API server binary. Split into a library so the accept loop and
//! entity registry are independently testable without spawning the binary.

pub mod entity_registry;
pub mod server;
pub mod system_env;

pub use entity_registry::EntityRegistry;
pub use server::{Server, ServerConfig, ServerError};
pub use system_env::SystemEnv;
