//! Loading the metaphor catalog from a JSON data document.
//!
//! Resolution order is: the configured file, then the document embedded in
//! this crate, then [`MetaphorCatalog::minimal`]. Failures are logged and the
//! next source is tried, so loading itself never fails.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::{Archetype, CatalogSource, MetaphorCatalog, RITUAL_CLOSURES};
use crate::{RulesError, Subsystem};

const EMBEDDED_DOCUMENT: &str = include_str!("../../data/metaphors.json");

/// Archetypes each subsystem prefers, in addition to the subsystem named in
/// the archetype's own entry.
const PREFERRED_ARCHETYPES: [(Subsystem, [&str; 4]); 3] = [
    (
        Subsystem::Marrow,
        ["the_ember", "the_spiral", "the_moon", "the_forest"],
    ),
    (
        Subsystem::Root,
        ["the_mountain", "the_forest", "the_river", "the_tide"],
    ),
    (
        Subsystem::Aura,
        ["the_mask", "the_tide", "the_moon", "the_river"],
    ),
];

#[derive(Debug, Deserialize)]
struct MetaphorDocument {
    #[serde(default)]
    metaphors: BTreeMap<String, MetaphorEntry>,
    #[serde(default)]
    universal_responses: Vec<String>,
    #[serde(default)]
    ritual_closures: Vec<String>,
    #[serde(default)]
    ritual_phrases: Vec<String>,
    #[serde(default)]
    subsystem_definitions: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    safety_responses: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MetaphorEntry {
    #[serde(default)]
    responses: Vec<String>,
    #[serde(default)]
    subsystem: Option<String>,
    #[serde(default)]
    affective_tags: Vec<String>,
}

impl MetaphorCatalog {
    /// Parse a catalog from a JSON data document.
    pub fn from_json_str(json: &str) -> Result<Self, RulesError> {
        let document: MetaphorDocument = serde_json::from_str(json)?;
        let catalog = Self::from_document(document);
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read and parse a catalog file.
    pub fn load(path: &Path) -> Result<Self, RulesError> {
        let content = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut catalog = Self::from_json_str(&content)?;
        catalog.source = CatalogSource::File(path.to_path_buf());
        Ok(catalog)
    }

    /// The catalog document compiled into this crate.
    pub fn embedded() -> Result<Self, RulesError> {
        let mut catalog = Self::from_json_str(EMBEDDED_DOCUMENT)?;
        catalog.source = CatalogSource::Embedded;
        Ok(catalog)
    }

    /// Load from `path` if given, falling back to the embedded document and
    /// finally to the minimal built-in catalog.
    pub fn load_or_fallback(path: Option<&Path>) -> Self {
        if let Some(path) = path {
            match Self::load(path) {
                Ok(catalog) => {
                    log::info!(
                        "[catalog] Loaded {} archetypes from {}",
                        catalog.archetypes.len(),
                        path.display()
                    );
                    return catalog;
                }
                Err(err) => {
                    log::warn!("[catalog] Falling back to embedded metaphors: {}", err);
                }
            }
        }

        match Self::embedded() {
            Ok(catalog) => catalog,
            Err(err) => {
                log::warn!("[catalog] Embedded metaphors unusable, using minimal set: {}", err);
                Self::minimal()
            }
        }
    }

    fn from_document(document: MetaphorDocument) -> Self {
        let archetypes = document
            .metaphors
            .into_iter()
            .map(|(name, entry)| build_archetype(name, entry));

        let mut catalog = Self::new(archetypes, document.universal_responses);

        if !document.ritual_closures.is_empty()
            && !document
                .ritual_closures
                .iter()
                .all(|c| RITUAL_CLOSURES.contains(&c.as_str()))
        {
            log::debug!("[catalog] Non-canonical ritual closures kept as ritual phrases only");
        }

        let mut phrases = Vec::new();
        for phrase in document
            .ritual_closures
            .into_iter()
            .chain(document.ritual_phrases)
        {
            if !RITUAL_CLOSURES.contains(&phrase.as_str()) && !phrases.contains(&phrase) {
                phrases.push(phrase);
            }
        }
        catalog.ritual_phrases = phrases;
        catalog.subsystem_definitions = document.subsystem_definitions;
        catalog.safety_responses = document.safety_responses;
        catalog
    }
}

fn build_archetype(name: String, entry: MetaphorEntry) -> Archetype {
    let mut archetype = Archetype::new(name)
        .with_responses(entry.responses)
        .with_tags(entry.affective_tags);

    if let Some(label) = entry.subsystem.as_deref() {
        match label.parse::<Subsystem>() {
            Ok(subsystem) => archetype = archetype.with_affinity(subsystem),
            Err(err) => log::debug!("[catalog] {} for archetype '{}'", err, archetype.name),
        }
    }

    for (subsystem, names) in PREFERRED_ARCHETYPES {
        if names.contains(&archetype.name.as_str()) {
            archetype = archetype.with_affinity(subsystem);
        }
    }

    archetype
}
