//! # SYLVA Core
//!
//! The engine behind SYLVA. This crate takes the immutable tables from
//! `sylva_rules`, routes each input to a subsystem, composes a closed
//! symbolic response, and keeps a bounded history of the exchange.
//!
//! ## Core Components
//!
//! - **classifier**: Keyword scoring of free text into MARROW, ROOT or AURA
//! - **composer**: Archetype sentence selection with flavor and closure
//! - **memory**: Persisted interaction log with per-subsystem activity
//! - **rituals**: Command parsing and the fixed `/quiet`, `/pulse`, `/mirror` texts
//! - **safety**: Crisis routing and output guardrails
//! - **diagnostics**: Drift analysis over a simulated journey
//! - **session**: The per-turn loop tying the above together
//!
//! ## Design Philosophy
//!
//! - **Containment over advice**: Every composed response ends in a ritual closure
//! - **Explicit state**: Configuration, catalog, lexicon and randomness are passed in, never looked up
//! - **Recoverable memory**: A damaged log never ends a session

pub mod classifier;
pub mod composer;
pub mod diagnostics;
pub mod error;
pub mod memory;
pub mod random;
pub mod rituals;
pub mod safety;
pub mod session;

pub use classifier::*;
pub use composer::*;
pub use diagnostics::*;
pub use error::*;
pub use memory::*;
pub use random::*;
pub use rituals::*;
pub use safety::*;
pub use session::*;
