//! CLI command handlers
//!
//! # Modules
//!
//! - `chat`: The interactive prompt loop
//! - `memory`: Viewing, summarizing, exporting and clearing the interaction log
//! - `info`: Subsystem descriptions and archetype listing
//! - `diagnose`: Offline drift simulation
//!
//! Handlers return the process exit code: 0 on success, 1 on failure.

pub mod chat;
pub mod diagnose;
pub mod info;
pub mod memory;
