//! Keyword lexicon used by the subsystem classifier.
//!
//! Two layers feed the score of each subsystem:
//! - **Primary keywords**: one keyword set per subsystem
//! - **Emotion records**: named emotions with their own keywords, each pinned to one subsystem

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Subsystem;

/// A named emotion mapped onto exactly one subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionRecord {
    pub name: String,
    pub keywords: Vec<String>,
    pub subsystem: Subsystem,
}

impl EmotionRecord {
    /// Create a record. Keywords are lowercased and de-duplicated.
    pub fn new<I, S>(name: impl Into<String>, subsystem: Subsystem, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            keywords: normalize(keywords),
            subsystem,
        }
    }
}

/// Immutable keyword tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lexicon {
    primary: BTreeMap<Subsystem, Vec<String>>,
    emotions: Vec<EmotionRecord>,
}

impl Lexicon {
    /// Create an empty lexicon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the primary keyword set of a subsystem.
    pub fn with_keywords<I, S>(mut self, subsystem: Subsystem, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.primary.insert(subsystem, normalize(keywords));
        self
    }

    /// Add an emotion record.
    pub fn with_emotion(mut self, emotion: EmotionRecord) -> Self {
        self.emotions.push(emotion);
        self
    }

    /// Distinct lowercase primary keywords for a subsystem.
    pub fn keywords(&self, subsystem: Subsystem) -> &[String] {
        self.primary
            .get(&subsystem)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn emotions(&self) -> &[EmotionRecord] {
        &self.emotions
    }

    /// Find an emotion record by name.
    pub fn emotion(&self, name: &str) -> Option<&EmotionRecord> {
        self.emotions.iter().find(|e| e.name == name)
    }

    /// The lexicon SYLVA ships with.
    pub fn builtin() -> Self {
        use Subsystem::{Aura, Marrow, Root};

        let lexicon = Lexicon::new()
            .with_keywords(
                Marrow,
                [
                    "shame", "trauma", "betrayal", "abandoned", "worthless", "broken", "hollow",
                    "empty", "core", "essence", "soul", "deep", "profound", "shattered",
                    "wounded", "raw", "exposed", "vulnerable", "naked",
                ],
            )
            .with_keywords(
                Root,
                [
                    "unstable", "groundless", "floating", "disconnected", "untethered", "safe",
                    "secure", "stable", "grounded", "rooted", "foundation", "basic",
                    "fundamental", "survival", "shelter", "home", "belonging", "steady", "solid",
                    "reliable", "trust", "dependable",
                ],
            )
            .with_keywords(
                Aura,
                [
                    "boundaries", "overwhelmed", "invaded", "crowded", "suffocated", "protected",
                    "shielded", "space", "distance", "buffer", "barrier", "energy", "drained",
                    "recharged", "sensitive", "permeable", "defended", "guarded", "open",
                    "closed", "filtered",
                ],
            );

        let emotions = [
            ("shame", Marrow, &["shame", "humiliated", "disgrace", "worthless"][..]),
            ("betrayal", Marrow, &["betrayed", "deceived", "lied to", "abandoned"][..]),
            ("grief", Marrow, &["grief", "loss", "mourning", "bereaved"][..]),
            ("despair", Marrow, &["despair", "hopeless", "devastated"][..]),
            ("fear", Root, &["fear", "afraid", "scared", "terrified", "panic"][..]),
            ("anxiety", Root, &["anxious", "worried", "nervous", "uneasy"][..]),
            ("insecurity", Root, &["insecure", "uncertain", "unstable"][..]),
            ("safety", Root, &["safe", "secure", "protected", "calm"][..]),
            ("overwhelmed", Aura, &["overwhelmed", "flooded", "too much"][..]),
            ("invaded", Aura, &["invaded", "intruded", "violated"][..]),
            ("drained", Aura, &["drained", "exhausted", "depleted"][..]),
            ("energized", Aura, &["energized", "vibrant", "alive"][..]),
            ("anger", Marrow, &["angry", "rage", "furious", "mad"][..]),
            ("sad", Marrow, &["sad", "depressed", "down", "melancholy"][..]),
            ("tired", Aura, &["tired", "weary", "fatigued"][..]),
            ("confused", Root, &["confused", "lost", "directionless"][..]),
            ("alone", Aura, &["alone", "lonely", "isolated"][..]),
        ];

        emotions
            .into_iter()
            .fold(lexicon, |lexicon, (name, subsystem, keywords)| {
                lexicon.with_emotion(EmotionRecord::new(name, subsystem, keywords.iter()))
            })
    }
}

fn normalize<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for keyword in keywords {
        let keyword = keyword.as_ref().trim().to_lowercase();
        if !keyword.is_empty() && !out.contains(&keyword) {
            out.push(keyword);
        }
    }
    out
}
