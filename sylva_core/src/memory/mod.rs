//! Interaction memory: a bounded, persisted log of exchanges.
//!
//! The log is split into three layers:
//! 1. [`LogState`] - the file contents plus pure operations (append,
//!    truncate, recount, stats)
//! 2. [`LogStore`] - where state lives (`JsonFileStore` on disk,
//!    `MemoryStore` for tests)
//! 3. [`InteractionLog`] - the recovering facade the session talks to
//!
//! Invariants after every completed write:
//! - activity for each subsystem equals the number of retained records
//!   labelled with it
//! - at most `max_entries` records are retained, newest last

mod interaction_log;
mod record;
mod state;
mod store;
mod tag;

pub use interaction_log::*;
pub use record::*;
pub use state::*;
pub use store::*;
pub use tag::*;
