//! Subsystem labels as stored in the log file.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sylva_rules::Subsystem;

/// Label a record carries. Canonical labels parse into [`Subsystem`];
/// anything else read from a foreign or damaged file is kept verbatim and
/// never counted toward subsystem activity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubsystemTag {
    Known(Subsystem),
    Other(String),
}

impl SubsystemTag {
    /// The subsystem, unless the label is foreign.
    pub fn known(&self) -> Option<Subsystem> {
        match self {
            SubsystemTag::Known(s) => Some(*s),
            SubsystemTag::Other(_) => None,
        }
    }

    pub fn is(&self, subsystem: Subsystem) -> bool {
        self.known() == Some(subsystem)
    }

    /// The stored label.
    pub fn as_str(&self) -> &str {
        match self {
            SubsystemTag::Known(s) => s.as_str(),
            SubsystemTag::Other(label) => label,
        }
    }

    /// Subsystem glyph, or ❓ for foreign labels.
    pub fn glyph(&self) -> &'static str {
        match self {
            SubsystemTag::Known(s) => s.glyph(),
            SubsystemTag::Other(_) => "❓",
        }
    }
}

impl Default for SubsystemTag {
    fn default() -> Self {
        SubsystemTag::Other("UNKNOWN".to_string())
    }
}

impl From<Subsystem> for SubsystemTag {
    fn from(subsystem: Subsystem) -> Self {
        SubsystemTag::Known(subsystem)
    }
}

impl std::fmt::Display for SubsystemTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SubsystemTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SubsystemTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(label) => match label.as_str() {
                "MARROW" => SubsystemTag::Known(Subsystem::Marrow),
                "ROOT" => SubsystemTag::Known(Subsystem::Root),
                "AURA" => SubsystemTag::Known(Subsystem::Aura),
                _ => SubsystemTag::Other(label),
            },
            serde_json::Value::Null => SubsystemTag::default(),
            other => SubsystemTag::Other(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_labels_parse() {
        let tag: SubsystemTag = serde_json::from_str("\"ROOT\"").unwrap();
        assert_eq!(tag, SubsystemTag::Known(Subsystem::Root));
        assert!(tag.is(Subsystem::Root));
        assert_eq!(serde_json::to_string(&tag).unwrap(), "\"ROOT\"");
    }

    #[test]
    fn test_foreign_labels_are_tolerated() {
        let tag: SubsystemTag = serde_json::from_str("\"EMBER\"").unwrap();
        assert_eq!(tag, SubsystemTag::Other("EMBER".to_string()));
        assert!(tag.known().is_none());
        assert_eq!(tag.glyph(), "❓");

        // Labels are case-sensitive on disk.
        let lower: SubsystemTag = serde_json::from_str("\"marrow\"").unwrap();
        assert!(lower.known().is_none());

        let number: SubsystemTag = serde_json::from_str("7").unwrap();
        assert_eq!(number.as_str(), "7");

        let null: SubsystemTag = serde_json::from_str("null").unwrap();
        assert_eq!(null.as_str(), "UNKNOWN");
    }
}
