//! Per-subsystem keyword scores.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use sylva_rules::Subsystem;

/// Which lexicon layer produced a keyword hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchSource {
    /// The subsystem's own keyword set.
    Primary,
    /// A named emotion record.
    Emotion(String),
}

/// One keyword found in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub keyword: String,
    pub subsystem: Subsystem,
    pub source: MatchSource,
}

/// Scores accumulated while classifying one input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubsystemScores {
    primary: BTreeMap<Subsystem, u32>,
    emotion: BTreeMap<Subsystem, u32>,
    matches: Vec<KeywordMatch>,
}

impl SubsystemScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a primary-lexicon hit.
    pub fn add_primary(&mut self, subsystem: Subsystem, keyword: &str) {
        *self.primary.entry(subsystem).or_default() += 1;
        self.matches.push(KeywordMatch {
            keyword: keyword.to_string(),
            subsystem,
            source: MatchSource::Primary,
        });
    }

    /// Record an emotion-layer hit.
    pub fn add_emotion(&mut self, subsystem: Subsystem, emotion: &str, keyword: &str) {
        *self.emotion.entry(subsystem).or_default() += 1;
        self.matches.push(KeywordMatch {
            keyword: keyword.to_string(),
            subsystem,
            source: MatchSource::Emotion(emotion.to_string()),
        });
    }

    /// Points from primary keywords.
    pub fn primary(&self, subsystem: Subsystem) -> u32 {
        self.primary.get(&subsystem).copied().unwrap_or(0)
    }

    /// Points from emotion words.
    pub fn emotion(&self, subsystem: Subsystem) -> u32 {
        self.emotion.get(&subsystem).copied().unwrap_or(0)
    }

    /// Primary plus emotion score.
    pub fn total(&self, subsystem: Subsystem) -> u32 {
        self.primary(subsystem) + self.emotion(subsystem)
    }

    /// Highest combined score over all subsystems.
    pub fn max_total(&self) -> u32 {
        Subsystem::ALL
            .iter()
            .map(|s| self.total(*s))
            .max()
            .unwrap_or(0)
    }

    /// True when no keyword matched at all.
    pub fn is_empty(&self) -> bool {
        self.max_total() == 0
    }

    /// Highest-scoring subsystem; ties go to the earlier one in
    /// [`Subsystem::ALL`]. No match at all grounds to ROOT.
    pub fn winner(&self) -> Subsystem {
        let max = self.max_total();
        if max == 0 {
            return Subsystem::Root;
        }
        Subsystem::ALL
            .into_iter()
            .find(|s| self.total(*s) == max)
            .unwrap_or(Subsystem::Root)
    }

    /// Every keyword hit, primary keywords before emotion words.
    pub fn matches(&self) -> &[KeywordMatch] {
        &self.matches
    }
}
