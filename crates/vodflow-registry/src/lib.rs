//! Temporary video registry
//!
//! Holds the short-lived record created between the upload step and the
//! metadata step. Entries are keyed `(user_id, video_id)` and carry a TTL;
//! an expired-but-unswept entry is treated as absent everywhere. The registry
//! entry is the only authoritative record of "upload completed, finalization
//! pending".

mod memory;
mod postgres;
mod registry;
mod sweeper;

pub use memory::InMemoryRegistry;
pub use postgres::PostgresRegistry;
pub use registry::{RegistryError, RegistryResult, TemporaryVideoRegistry};
pub use sweeper::{RegistrySweeper, SweeperHandle};
