//! Input commands and the fixed ritual responses.
//!
//! Parsing order:
//! 1. `exit` / `quit`, `?`, `memory` (case-insensitive, whole input)
//! 2. empty input
//! 3. `/quiet`, `/pulse`, `/mirror [text]`; any other `/word` is unknown
//! 4. everything else is a message for the classifier

use sylva_rules::Subsystem;

use crate::memory::InteractionRecord;

/// Fixed reply to `/quiet`.
pub const QUIET_RESPONSE: &str = "We'll sit in stillness. You're not required to speak.";

/// Reply to empty input. Not logged.
pub const SILENCE_RESPONSE: &str = "The silence is welcome here too.";

/// Guidance shown for an unrecognised `/command`. Not logged.
pub const UNKNOWN_RITUAL_RESPONSE: &str = "Unknown symbolic command. Type '?' for guidance.";

/// Number of recent records `/pulse` looks at.
pub const PULSE_WINDOW: usize = 5;

const MIRROR_PREFIX: &str = "/mirror";

/// One line of user input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    Memory,
    Empty,
    Quiet,
    Pulse,
    /// Text following `/mirror`, trimmed.
    Mirror(String),
    UnknownRitual(String),
    Message(String),
}

impl Command {
    /// Parse raw input. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            return Command::Exit;
        }
        if input == "?" {
            return Command::Help;
        }
        if input.eq_ignore_ascii_case("memory") {
            return Command::Memory;
        }
        if input.is_empty() {
            return Command::Empty;
        }

        if input.starts_with('/') {
            return Self::parse_ritual(input);
        }

        Command::Message(input.to_string())
    }

    fn parse_ritual(input: &str) -> Self {
        if input.eq_ignore_ascii_case("/quiet") {
            return Command::Quiet;
        }
        if input.eq_ignore_ascii_case("/pulse") {
            return Command::Pulse;
        }
        match input.get(..MIRROR_PREFIX.len()) {
            Some(head) if head.eq_ignore_ascii_case(MIRROR_PREFIX) => {
                Command::Mirror(input[MIRROR_PREFIX.len()..].trim().to_string())
            }
            _ => Command::UnknownRitual(input.to_string()),
        }
    }

    /// Whether the input is one of the slash rituals, known or not.
    pub fn is_ritual(&self) -> bool {
        matches!(
            self,
            Command::Quiet | Command::Pulse | Command::Mirror(_) | Command::UnknownRitual(_)
        )
    }
}

/// `/quiet`: the fixed stillness sentence, tagged AURA.
pub fn quiet_response() -> (String, Subsystem) {
    (QUIET_RESPONSE.to_string(), Subsystem::Aura)
}

/// `/pulse`: a one-line summary of the subsystems in `recent`, tagged ROOT.
///
/// The first matching rule wins:
/// 1. no records
/// 2. no recognised subsystem among them
/// 3. all three present
/// 4. two of them present (MARROW+ROOT, MARROW+AURA, ROOT+AURA)
/// 5. one subsystem seen at least twice
/// 6. anything else
pub fn pulse_response(recent: &[InteractionRecord]) -> (String, Subsystem) {
    (pulse_text(recent).to_string(), Subsystem::Root)
}

fn pulse_text(recent: &[InteractionRecord]) -> &'static str {
    if recent.is_empty() {
        return "The pulse is quiet. No recent patterns to observe.";
    }

    let count = |s: Subsystem| recent.iter().filter(|r| r.subsystem.is(s)).count();
    let marrow = count(Subsystem::Marrow);
    let root = count(Subsystem::Root);
    let aura = count(Subsystem::Aura);

    match (marrow > 0, root > 0, aura > 0) {
        (false, false, false) => "The pulse flows without pattern - early rhythms forming.",
        (true, true, true) => {
            "The pulse shows deep harmony - MARROW, ROOT, and AURA dancing together in sacred rhythm."
        }
        (true, true, false) => {
            "The pulse runs from core to ground - MARROW and ROOT weaving depth and stability."
        }
        (true, false, true) => {
            "The pulse moves from depths to boundaries - MARROW and AURA in protective dialogue."
        }
        (false, true, true) => {
            "The pulse grounds at the edges - ROOT and AURA creating stable sanctuary."
        }
        _ if marrow >= 2 => "The pulse runs deep - MARROW has been active in your recent journey.",
        _ if root >= 2 => {
            "The pulse is steady - ROOT systems have been grounding your experience."
        }
        _ if aura >= 2 => "The pulse holds at the boundary - AURA has been tending your edges.",
        _ => "The pulse carries mixed currents - multiple systems responding to your needs.",
    }
}

/// `/mirror`: the user's words in a fixed frame, tagged AURA.
pub fn mirror_response(text: &str) -> (String, Subsystem) {
    let text = text.trim();
    let response = if text.is_empty() {
        "The mirror reflects emptiness - and that too has meaning.".to_string()
    } else {
        format!(
            "The mirror shows: '{}' - these words carry their own weight.",
            text
        )
    };
    (response, Subsystem::Aura)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::SubsystemTag;
    use chrono::NaiveDate;

    fn records(labels: &[&str]) -> Vec<InteractionRecord> {
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        labels
            .iter()
            .map(|label| {
                let mut record = InteractionRecord::new("in", "out", Subsystem::Root, at);
                record.subsystem = match *label {
                    "MARROW" => SubsystemTag::Known(Subsystem::Marrow),
                    "ROOT" => SubsystemTag::Known(Subsystem::Root),
                    "AURA" => SubsystemTag::Known(Subsystem::Aura),
                    other => SubsystemTag::Other(other.to_string()),
                };
                record
            })
            .collect()
    }

    #[test]
    fn test_parse_control_words() {
        assert_eq!(Command::parse("exit"), Command::Exit);
        assert_eq!(Command::parse("  QUIT "), Command::Exit);
        assert_eq!(Command::parse("?"), Command::Help);
        assert_eq!(Command::parse("Memory"), Command::Memory);
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse(" \t "), Command::Empty);
    }

    #[test]
    fn test_parse_rituals() {
        assert_eq!(Command::parse("/quiet"), Command::Quiet);
        assert_eq!(Command::parse("/QUIET"), Command::Quiet);
        assert_eq!(Command::parse("/pulse"), Command::Pulse);
        assert_eq!(Command::parse("/mirror"), Command::Mirror(String::new()));
        assert_eq!(
            Command::parse("/Mirror   I am tired  "),
            Command::Mirror("I am tired".to_string())
        );
        assert_eq!(
            Command::parse("/dance"),
            Command::UnknownRitual("/dance".to_string())
        );
        assert_eq!(
            Command::parse("/quiet please"),
            Command::UnknownRitual("/quiet please".to_string())
        );
        assert!(Command::parse("/pulse").is_ritual());
    }

    #[test]
    fn test_parse_message() {
        assert_eq!(
            Command::parse("  I feel lost  "),
            Command::Message("I feel lost".to_string())
        );
        assert!(!Command::parse("exit now").is_ritual());
        // Multi-byte input shorter than the mirror prefix.
        assert_eq!(Command::parse("/é"), Command::UnknownRitual("/é".to_string()));
    }

    #[test]
    fn test_quiet_is_exact() {
        let (text, subsystem) = quiet_response();
        assert_eq!(text, "We'll sit in stillness. You're not required to speak.");
        assert_eq!(subsystem, Subsystem::Aura);
    }

    #[test]
    fn test_pulse_rules() {
        let cases: &[(&[&str], &str)] = &[
            (&[], "The pulse is quiet."),
            (&["UNKNOWN", "EMBER"], "without pattern"),
            (&["MARROW", "ROOT", "AURA"], "deep harmony"),
            (&["MARROW", "ROOT", "ROOT"], "from core to ground"),
            (&["AURA", "MARROW"], "from depths to boundaries"),
            (&["ROOT", "AURA", "UNKNOWN"], "grounds at the edges"),
            (&["MARROW", "MARROW"], "runs deep"),
            (&["ROOT", "UNKNOWN", "ROOT"], "is steady"),
            (&["AURA", "AURA", "AURA"], "holds at the boundary"),
            (&["MARROW", "UNKNOWN"], "mixed currents"),
        ];

        for (labels, expected) in cases {
            let (text, subsystem) = pulse_response(&records(labels));
            assert!(text.contains(expected), "{:?} gave {:?}", labels, text);
            assert_eq!(subsystem, Subsystem::Root);
        }
    }

    #[test]
    fn test_mirror_text() {
        assert_eq!(
            mirror_response("").0,
            "The mirror reflects emptiness - and that too has meaning."
        );
        let (text, subsystem) = mirror_response("the weight");
        assert_eq!(
            text,
            "The mirror shows: 'the weight' - these words carry their own weight."
        );
        assert_eq!(subsystem, Subsystem::Aura);
    }
}
