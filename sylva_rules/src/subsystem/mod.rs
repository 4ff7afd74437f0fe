//! The three symbolic subsystems and their fixed descriptions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::RulesError;

/// Symbolic category used to route and flavor every response.
///
/// Declaration order is the tie-break priority: MARROW beats ROOT beats AURA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Subsystem {
    /// Deep core: essence, wounds, transformation.
    Marrow,
    /// Grounding: foundation, safety, basic needs.
    Root,
    /// Protective boundary: energy, interface with the world.
    Aura,
}

/// Descriptive text for one subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsystemInfo {
    pub description: &'static str,
    pub focus: &'static str,
    pub approach: &'static str,
}

impl Subsystem {
    /// All subsystems in priority order.
    pub const ALL: [Subsystem; 3] = [Subsystem::Marrow, Subsystem::Root, Subsystem::Aura];

    /// Label used in the log file and on screen.
    pub fn as_str(&self) -> &'static str {
        match self {
            Subsystem::Marrow => "MARROW",
            Subsystem::Root => "ROOT",
            Subsystem::Aura => "AURA",
        }
    }

    /// Short description stored in the log metadata.
    pub fn description(&self) -> &'static str {
        self.info().description
    }

    /// Description, focus and approach for display.
    pub fn info(&self) -> SubsystemInfo {
        match self {
            Subsystem::Marrow => SubsystemInfo {
                description: "Deep core processing - essence, wounds, transformation",
                focus: "Core wounds, trauma, essence, identity, profound change",
                approach: "Deep witnessing, holding space for core truth",
            },
            Subsystem::Root => SubsystemInfo {
                description: "Grounding and stability - foundation, safety, basic needs",
                focus: "Safety, stability, grounding, basic needs, survival, trust",
                approach: "Providing stability, ensuring safety, grounding techniques",
            },
            Subsystem::Aura => SubsystemInfo {
                description: "Protective boundary - energy, interface with world, protection",
                focus: "Boundaries, energy, protection, overwhelm, sensitivity",
                approach: "Boundary work, energy management, protective strategies",
            },
        }
    }

    /// Clause the composer may append to a sentence. Starts with a space.
    pub fn flavor_clause(&self) -> &'static str {
        match self {
            Subsystem::Marrow => " The deep systems recognize this.",
            Subsystem::Root => " The foundation holds steady.",
            Subsystem::Aura => " The boundary honors what is needed.",
        }
    }

    /// Glyph shown next to the label in memory listings.
    pub fn glyph(&self) -> &'static str {
        match self {
            Subsystem::Marrow => "🔥",
            Subsystem::Root => "🌳",
            Subsystem::Aura => "🌙",
        }
    }
}

impl std::fmt::Display for Subsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subsystem {
    type Err = RulesError;

    /// Parses a label case-insensitively, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MARROW" => Ok(Subsystem::Marrow),
            "ROOT" => Ok(Subsystem::Root),
            "AURA" => Ok(Subsystem::Aura),
            other => Err(RulesError::UnknownSubsystem(other.to_string())),
        }
    }
}
