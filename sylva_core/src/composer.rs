//! Response Composer - turns a subsystem into one closed, symbolic sentence.
//!
//! 1. **Archetype**: uniform pick among archetypes affined to the subsystem (all of them if none are)
//! 2. **Sentence**: archetype response with the configured probability, otherwise a universal one
//! 3. **Flavor**: optionally append the subsystem's clause
//! 4. **Closure**: make sure the text ends with exactly one canonical ritual closure

use serde::{Deserialize, Serialize};
use sylva_rules::{
    ends_with_ritual_closure, Archetype, MetaphorCatalog, Subsystem, SylvaConfig, RITUAL_CLOSURES,
};

use crate::random::RandomSource;

/// Probabilities used while composing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposerConfig {
    /// Chance of drawing from the archetype's own responses.
    pub archetype_response_probability: f64,
    /// Chance of appending the subsystem flavor clause.
    pub flavor_clause_probability: f64,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            archetype_response_probability: 0.7,
            flavor_clause_probability: 0.3,
        }
    }
}

impl From<&SylvaConfig> for ComposerConfig {
    fn from(config: &SylvaConfig) -> Self {
        Self {
            archetype_response_probability: config.archetype_response_probability,
            flavor_clause_probability: config.flavor_clause_probability,
        }
    }
}

/// How a response was put together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub subsystem: Subsystem,
    /// Archetype that was drawn, if the catalog had any.
    pub archetype: Option<String>,
    /// True when the sentence came from the universal pool.
    pub universal: bool,
    pub flavored: bool,
    /// Final outward-facing text.
    pub text: String,
}

/// Builds responses from a [`MetaphorCatalog`].
#[derive(Debug, Clone, Default)]
pub struct ResponseComposer {
    config: ComposerConfig,
}

impl ResponseComposer {
    /// Composer with the given probabilities.
    pub fn new(config: ComposerConfig) -> Self {
        Self { config }
    }

    /// Current probabilities.
    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Compose a response for `subsystem`. Never empty, always closed.
    pub fn compose<R: RandomSource>(
        &self,
        subsystem: Subsystem,
        catalog: &MetaphorCatalog,
        rng: &mut R,
    ) -> String {
        self.compose_detailed(subsystem, catalog, rng).text
    }

    /// Like [`ResponseComposer::compose`] but reports every choice made.
    pub fn compose_detailed<R: RandomSource>(
        &self,
        subsystem: Subsystem,
        catalog: &MetaphorCatalog,
        rng: &mut R,
    ) -> Composition {
        let archetype = self.select_archetype(subsystem, catalog, rng);
        let (sentence, universal) = self.select_sentence(archetype, catalog, rng);

        let mut text = sentence.to_string();
        let flavored = rng.chance(self.config.flavor_clause_probability);
        if flavored {
            text.push_str(subsystem.flavor_clause());
        }

        Composition {
            subsystem,
            archetype: archetype.map(|a| a.name.clone()),
            universal,
            flavored,
            text: enforce_ritual_closure(&text, rng),
        }
    }

    fn select_archetype<'c, R: RandomSource>(
        &self,
        subsystem: Subsystem,
        catalog: &'c MetaphorCatalog,
        rng: &mut R,
    ) -> Option<&'c Archetype> {
        let mut candidates = catalog.archetypes_for(subsystem);
        if candidates.is_empty() {
            candidates = catalog.archetypes().collect();
        }
        rng.choose(&candidates).copied()
    }

    /// Returns the sentence and whether it came from the universal pool.
    fn select_sentence<'c, R: RandomSource>(
        &self,
        archetype: Option<&'c Archetype>,
        catalog: &'c MetaphorCatalog,
        rng: &mut R,
    ) -> (&'c str, bool) {
        let own = archetype.map(|a| a.responses.as_slice()).unwrap_or(&[]);
        let universal = catalog.universal_responses();

        let prefer_own = rng.chance(self.config.archetype_response_probability);
        let pick_own = (prefer_own && !own.is_empty()) || universal.is_empty();

        let (pool, from_universal) = if pick_own {
            (own, false)
        } else {
            (universal, true)
        };

        match rng.choose(pool) {
            Some(sentence) => (sentence.as_str(), from_universal),
            None => ("", from_universal),
        }
    }
}

/// Append one canonical closure unless `text` already ends with one.
///
/// Text that already ends with a closure is returned unchanged. Otherwise
/// trailing whitespace is trimmed and a single space plus a uniformly chosen
/// closure is appended.
pub fn enforce_ritual_closure<R: RandomSource>(text: &str, rng: &mut R) -> String {
    if ends_with_ritual_closure(text) {
        return text.to_string();
    }

    let closure = rng.choose(&RITUAL_CLOSURES).copied().unwrap_or(RITUAL_CLOSURES[0]);
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        closure.to_string()
    } else {
        format!("{} {}", trimmed, closure)
    }
}
