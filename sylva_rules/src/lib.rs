//! # SYLVA Rules
//!
//! The symbolic rule book: subsystem definitions, the keyword lexicon, the
//! metaphor catalog and application configuration. This crate holds fixed
//! language and settings only; it makes no random choices and keeps no state.

pub mod catalog;
pub mod config;
pub mod error;
pub mod lexicon;
pub mod subsystem;

pub use catalog::*;
pub use config::*;
pub use error::*;
pub use lexicon::*;
pub use subsystem::*;
