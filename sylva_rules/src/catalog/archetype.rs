//! Archetype definitions.

use serde::{Deserialize, Serialize};

use crate::Subsystem;

/// A named symbolic persona with its own pool of candidate sentences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archetype {
    pub name: String,
    /// Candidate sentences. Closures are added by the composer, not here.
    pub responses: Vec<String>,
    /// Subsystems this archetype speaks for, in priority order.
    pub affinity: Vec<Subsystem>,
    #[serde(default)]
    pub affective_tags: Vec<String>,
}

impl Archetype {
    /// Create an archetype with no responses or affinity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: Vec::new(),
            affinity: Vec::new(),
            affective_tags: Vec::new(),
        }
    }

    /// Add a subsystem to the affinity list, keeping it free of duplicates.
    pub fn with_affinity(mut self, subsystem: Subsystem) -> Self {
        if !self.affinity.contains(&subsystem) {
            self.affinity.push(subsystem);
        }
        self
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.responses.push(response.into());
        self
    }

    pub fn with_responses<I, S>(mut self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.responses.extend(responses.into_iter().map(Into::into));
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affective_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// True when the archetype may answer for `subsystem`.
    pub fn has_affinity(&self, subsystem: Subsystem) -> bool {
        self.affinity.contains(&subsystem)
    }

    /// Subsystem this archetype speaks for first, if any.
    pub fn primary_subsystem(&self) -> Option<Subsystem> {
        self.affinity.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_archetype() {
        let archetype = Archetype::new("the_mask");
        assert_eq!(archetype.name, "the_mask");
        assert!(archetype.responses.is_empty());
        assert!(archetype.primary_subsystem().is_none());
    }

    #[test]
    fn test_affinity_keeps_priority_and_skips_duplicates() {
        let archetype = Archetype::new("the_moon")
            .with_affinity(Subsystem::Marrow)
            .with_affinity(Subsystem::Aura)
            .with_affinity(Subsystem::Marrow);

        assert_eq!(archetype.affinity, vec![Subsystem::Marrow, Subsystem::Aura]);
        assert_eq!(archetype.primary_subsystem(), Some(Subsystem::Marrow));
        assert!(archetype.has_affinity(Subsystem::Aura));
        assert!(!archetype.has_affinity(Subsystem::Root));
    }

    #[test]
    fn test_builder_responses() {
        let archetype = Archetype::new("the_river")
            .with_response("The river bends.")
            .with_responses(["The current carries.", "The bed remains."])
            .with_tags(["flow"]);

        assert_eq!(archetype.responses.len(), 3);
        assert_eq!(archetype.affective_tags, vec!["flow".to_string()]);
    }
}
