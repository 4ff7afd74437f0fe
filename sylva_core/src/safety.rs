//! Safety checks: crisis routing for input and guardrails for output.

use sylva_rules::SylvaConfig;

/// Resource lines shown with every crisis message.
pub const CRISIS_RESOURCES: [&str; 3] = [
    "National Suicide Prevention Lifeline: 988",
    "Crisis Text Line: Text HOME to 741741",
    "International Association for Suicide Prevention: https://www.iasp.info/resources/Crisis_Centres/",
];

/// Reassurance and advice patterns a response must never contain.
/// Matched case-insensitively as substrings.
pub const FORBIDDEN_PHRASES: [&str; 10] = [
    "you can do this",
    "it's going to be okay",
    "i believe in you",
    "you've got this",
    "things will get better",
    "you're strong enough",
    "i'm here for you",
    "you're not alone",
    "it's okay to feel",
    "you're doing great",
];

/// Routes input containing an emergency keyword away from the composer.
#[derive(Debug, Clone)]
pub struct CrisisDetector {
    keywords: Vec<String>,
    message: String,
}

impl CrisisDetector {
    /// Keywords are trimmed and lowercased. Blank ones are dropped.
    pub fn new(keywords: impl IntoIterator<Item = String>, message: impl Into<String>) -> Self {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            message: message.into(),
        }
    }

    /// Emergency keywords and crisis message from the config.
    pub fn from_config(config: &SylvaConfig) -> Self {
        Self::new(
            config.emergency_keywords.iter().cloned(),
            config.crisis_response.clone(),
        )
    }

    /// First emergency keyword contained in `text`, ignoring case.
    pub fn matched_keyword(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.keywords
            .iter()
            .find(|k| lowered.contains(k.as_str()))
            .map(String::as_str)
    }

    /// True when any emergency keyword appears in `text`.
    pub fn is_crisis(&self, text: &str) -> bool {
        self.matched_keyword(text).is_some()
    }

    /// Text shown instead of a symbolic response.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Hotline and emergency lines shown with the message.
    pub fn resources(&self) -> &'static [&'static str] {
        &CRISIS_RESOURCES
    }
}

impl Default for CrisisDetector {
    fn default() -> Self {
        Self::from_config(&SylvaConfig::default())
    }
}

/// Detects advice-giving and simulated empathy in generated text.
///
/// Forbidden and empathy phrases match as substrings. Advice keywords
/// ("try", "just", ...) match only as whole words so that "trying" or
/// "adjust" do not trip them.
#[derive(Debug, Clone)]
pub struct Guardrails {
    phrases: Vec<String>,
    advice_words: Vec<String>,
}

impl Guardrails {
    pub fn new(
        phrases: impl IntoIterator<Item = String>,
        advice_words: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            phrases: lowered(phrases),
            advice_words: lowered(advice_words),
        }
    }

    /// Built-in forbidden phrases plus the config's empathy and advice lists.
    pub fn from_config(config: &SylvaConfig) -> Self {
        let phrases = FORBIDDEN_PHRASES
            .iter()
            .map(|p| p.to_string())
            .chain(config.avoid_empathy_simulation.iter().cloned());
        Self::new(phrases, config.avoid_advice_keywords.iter().cloned())
    }

    /// Every forbidden pattern found in `response`, in rule order, without repeats.
    pub fn forbidden_phrases(&self, response: &str) -> Vec<String> {
        let lowered = response.to_lowercase();
        let words = format!(" {} ", word_text(&lowered));
        let mut found: Vec<String> = Vec::new();

        for phrase in &self.phrases {
            if lowered.contains(phrase.as_str()) && !found.contains(phrase) {
                found.push(phrase.clone());
            }
        }
        for word in &self.advice_words {
            let needle = format!(" {} ", word_text(word));
            if words.contains(&needle) && !found.contains(word) {
                found.push(word.clone());
            }
        }

        found
    }

    /// True when `response` has no forbidden pattern.
    pub fn is_clean(&self, response: &str) -> bool {
        self.forbidden_phrases(response).is_empty()
    }
}

impl Default for Guardrails {
    fn default() -> Self {
        Self::from_config(&SylvaConfig::default())
    }
}

fn lowered(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let item = item.trim().to_lowercase();
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Collapse everything but letters, digits and apostrophes into single spaces.
fn word_text(text: &str) -> String {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
