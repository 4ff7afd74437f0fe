//! Metaphor catalog: archetypes, universal sentences and ritual closures.

mod archetype;
mod loader;

pub use archetype::*;
pub use loader::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Subsystem;

/// The only sentences a composed response may end with.
pub const RITUAL_CLOSURES: [&str; 3] = [
    "That's enough for now.",
    "We'll build from that ember.",
    "Let it be named and left.",
];

/// Where a catalog was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogSource {
    File(std::path::PathBuf),
    Embedded,
    Builtin,
}

/// All pre-authored language the composer draws from. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaphorCatalog {
    archetypes: BTreeMap<String, Archetype>,
    universal_responses: Vec<String>,
    ritual_phrases: Vec<String>,
    subsystem_definitions: BTreeMap<String, serde_json::Value>,
    safety_responses: BTreeMap<String, serde_json::Value>,
    source: CatalogSource,
}

impl MetaphorCatalog {
    /// Build a catalog from parts. Callers are expected to provide at least
    /// one archetype and one universal response; [`MetaphorCatalog::validate`]
    /// checks this.
    pub fn new(
        archetypes: impl IntoIterator<Item = Archetype>,
        universal_responses: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            archetypes: archetypes
                .into_iter()
                .map(|a| (a.name.clone(), a))
                .collect(),
            universal_responses: universal_responses.into_iter().collect(),
            ritual_phrases: Vec::new(),
            subsystem_definitions: BTreeMap::new(),
            safety_responses: BTreeMap::new(),
            source: CatalogSource::Builtin,
        }
    }

    /// Minimal catalog used when no data source can be read.
    pub fn minimal() -> Self {
        let ember = Archetype::new("the_ember")
            .with_affinity(Subsystem::Marrow)
            .with_responses([
                "The ember holds steady in the wind.",
                "You carry the ember within you.",
                "The ember knows its own rhythm.",
            ]);

        Self::new(
            [ember],
            [
                "You are here, and that is enough.".to_string(),
                "The moment holds what it holds.".to_string(),
            ],
        )
    }

    /// Check the structural guarantees the composer relies on.
    pub fn validate(&self) -> Result<(), crate::RulesError> {
        if self.archetypes.is_empty() {
            return Err(crate::RulesError::InvalidCatalog(
                "no archetypes defined".to_string(),
            ));
        }
        if self.universal_responses.is_empty() {
            return Err(crate::RulesError::InvalidCatalog(
                "no universal responses defined".to_string(),
            ));
        }
        Ok(())
    }

    /// Archetypes in name order.
    pub fn archetypes(&self) -> impl Iterator<Item = &Archetype> {
        self.archetypes.values()
    }

    /// Look up an archetype by exact name.
    pub fn archetype(&self, name: &str) -> Option<&Archetype> {
        self.archetypes.get(name)
    }

    /// All archetype names, sorted.
    pub fn archetype_names(&self) -> Vec<&str> {
        self.archetypes.keys().map(|k| k.as_str()).collect()
    }

    /// Archetypes whose affinity includes `subsystem`, in name order.
    pub fn archetypes_for(&self, subsystem: Subsystem) -> Vec<&Archetype> {
        self.archetypes
            .values()
            .filter(|a| a.has_affinity(subsystem))
            .collect()
    }

    pub fn universal_responses(&self) -> &[String] {
        &self.universal_responses
    }

    /// The three canonical closures.
    pub fn ritual_closures(&self) -> &'static [&'static str] {
        &RITUAL_CLOSURES
    }

    /// Additional ritual language from the data source. Never used as a closure.
    pub fn ritual_phrases(&self) -> &[String] {
        &self.ritual_phrases
    }

    pub fn subsystem_definition(&self, subsystem: Subsystem) -> Option<&str> {
        self.subsystem_definitions
            .get(subsystem.as_str())
            .and_then(|v| v.as_str())
    }

    pub fn safety_response(&self, key: &str) -> Option<&str> {
        self.safety_responses.get(key).and_then(|v| v.as_str())
    }

    /// Where the catalog was loaded from.
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }
}

/// True when `text`, ignoring trailing whitespace, ends with a canonical closure.
pub fn ends_with_ritual_closure(text: &str) -> bool {
    let trimmed = text.trim_end();
    RITUAL_CLOSURES
        .iter()
        .any(|closure| trimmed.ends_with(closure))
}
