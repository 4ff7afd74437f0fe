//! Application configuration.
//!
//! Every field has a default, so an empty or partial TOML file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::RulesError;

/// Settings shared by the engine and the CLI. Built once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SylvaConfig {
    /// Location of the interaction log.
    pub memory_file: PathBuf,

    /// Maximum number of interactions retained in the log.
    pub max_memory_entries: usize,

    /// Number of interactions shown by the `memory` command.
    pub default_memory_limit: usize,

    /// Chance of drawing from the archetype's own responses (0.0-1.0).
    pub archetype_response_probability: f64,

    /// Chance of appending the subsystem flavor clause (0.0-1.0).
    pub flavor_clause_probability: f64,

    /// Optional metaphor data file. The embedded document is used when unset.
    pub catalog_path: Option<PathBuf>,

    /// Substrings that route input to the crisis message.
    pub emergency_keywords: Vec<String>,

    pub crisis_response: String,

    /// Advice-giving phrases responses must not contain.
    pub avoid_advice_keywords: Vec<String>,

    /// Simulated-empathy phrases responses must not contain.
    pub avoid_empathy_simulation: Vec<String>,
}

impl Default for SylvaConfig {
    fn default() -> Self {
        Self {
            memory_file: PathBuf::from("memory").join("user_log.json"),
            max_memory_entries: 1000,
            default_memory_limit: 10,
            archetype_response_probability: 0.7,
            flavor_clause_probability: 0.3,
            catalog_path: None,
            emergency_keywords: to_strings(&[
                "suicide",
                "kill myself",
                "want to die",
                "end it all",
                "self-harm",
                "cut myself",
                "overdose",
            ]),
            crisis_response: "If you're in crisis, please reach out to a crisis helpline or \
                              mental health professional. You are not alone, and help is available."
                .to_string(),
            avoid_advice_keywords: to_strings(&[
                "should", "must", "need to", "have to", "ought to", "try", "just", "simply",
                "easily", "quickly",
            ]),
            avoid_empathy_simulation: to_strings(&[
                "I understand",
                "I feel you",
                "I know how you feel",
                "I'm sorry you're going through this",
                "That must be hard",
            ]),
        }
    }
}

impl SylvaConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, RulesError> {
        let config: SylvaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, RulesError> {
        let content = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject values the engine cannot honor.
    pub fn validate(&self) -> Result<(), RulesError> {
        for (name, value) in [
            (
                "archetype_response_probability",
                self.archetype_response_probability,
            ),
            ("flavor_clause_probability", self.flavor_clause_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(RulesError::InvalidConfig(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    name, value
                )));
            }
        }

        if self.max_memory_entries == 0 {
            return Err(RulesError::InvalidConfig(
                "max_memory_entries must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
