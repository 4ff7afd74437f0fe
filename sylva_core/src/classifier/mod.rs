//! Subsystem Classifier - routes free text to MARROW, ROOT or AURA.
//!
//! The scoring works as follows:
//! 1. **Normalize**: Lowercase a copy of the input for matching
//! 2. **Primary**: Count distinct primary keywords of each subsystem found as substrings
//! 3. **Emotion**: Every emotion-record keyword found adds one to that record's subsystem
//! 4. **Resolve**: Highest total wins, ties go MARROW > ROOT > AURA, no match grounds to ROOT

mod scores;

pub use scores::*;

use sylva_rules::{Lexicon, Subsystem};

/// Keyword-scoring classifier over an immutable lexicon.
#[derive(Debug, Clone)]
pub struct SubsystemClassifier {
    lexicon: Lexicon,
}

impl SubsystemClassifier {
    /// Create a classifier over the given lexicon.
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Create a classifier over [`Lexicon::builtin`].
    pub fn with_builtin_lexicon() -> Self {
        Self::new(Lexicon::builtin())
    }

    /// The keyword and emotion sets used for scoring.
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Score `text` against both lexicon layers.
    pub fn score(&self, text: &str) -> SubsystemScores {
        let text = text.to_lowercase();
        let mut scores = SubsystemScores::new();

        for subsystem in Subsystem::ALL {
            for keyword in self.lexicon.keywords(subsystem) {
                if text.contains(keyword.as_str()) {
                    scores.add_primary(subsystem, keyword);
                }
            }
        }

        for emotion in self.lexicon.emotions() {
            for keyword in &emotion.keywords {
                if text.contains(keyword.as_str()) {
                    scores.add_emotion(emotion.subsystem, &emotion.name, keyword);
                }
            }
        }

        scores
    }

    /// Classify `text`. Total and deterministic.
    pub fn classify(&self, text: &str) -> Subsystem {
        self.score(text).winner()
    }
}

impl Default for SubsystemClassifier {
    fn default() -> Self {
        Self::with_builtin_lexicon()
    }
}
