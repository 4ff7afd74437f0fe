//! The conversational engine: one call per line of user input.
//!
//! Each turn goes through:
//! 1. control words (`exit`, `?`, `memory`, empty input), handled without logging
//! 2. the emergency-keyword check, which short-circuits to the crisis message
//! 3. rituals (`/quiet`, `/pulse`, `/mirror`) or classify + compose
//! 4. recording the exchange in the interaction log

use sylva_rules::{MetaphorCatalog, Subsystem, SylvaConfig};

use crate::classifier::SubsystemClassifier;
use crate::composer::{ComposerConfig, ResponseComposer};
use crate::memory::{InteractionLog, JsonFileStore, LogStore};
use crate::random::{RandomSource, StdRandom};
use crate::rituals::{mirror_response, pulse_response, quiet_response, Command, PULSE_WINDOW};
use crate::safety::CrisisDetector;

/// Outcome of one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    Exit,
    Help,
    ShowMemory,
    /// Empty input. Not logged.
    Silence,
    /// Emergency keyword found. Not logged.
    Crisis { message: String },
    /// A logged response.
    Reply { response: String, subsystem: Subsystem },
    /// A `/command` that is not a known ritual. Not logged.
    UnknownRitual { command: String },
}

/// A running SYLVA session over a log store and a random source.
pub struct Sylva<S: LogStore, R: RandomSource> {
    classifier: SubsystemClassifier,
    composer: ResponseComposer,
    catalog: MetaphorCatalog,
    crisis: CrisisDetector,
    log: InteractionLog<S>,
    rng: R,
}

impl Sylva<JsonFileStore, StdRandom> {
    /// Session logging to `config.memory_file` with an entropy-seeded generator.
    pub fn from_config(config: &SylvaConfig, catalog: MetaphorCatalog) -> Self {
        let log = InteractionLog::at_path(&config.memory_file, config.max_memory_entries);
        Self::new(config, catalog, log, StdRandom::from_entropy())
    }
}

impl<S: LogStore, R: RandomSource> Sylva<S, R> {
    /// Session over an open log, with classifier defaults and config-driven composer and crisis check.
    pub fn new(config: &SylvaConfig, catalog: MetaphorCatalog, log: InteractionLog<S>, rng: R) -> Self {
        Self {
            classifier: SubsystemClassifier::default(),
            composer: ResponseComposer::new(ComposerConfig::from(config)),
            catalog,
            crisis: CrisisDetector::from_config(config),
            log,
            rng,
        }
    }

    pub fn with_classifier(mut self, classifier: SubsystemClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn classifier(&self) -> &SubsystemClassifier {
        &self.classifier
    }

    pub fn composer(&self) -> &ResponseComposer {
        &self.composer
    }

    pub fn catalog(&self) -> &MetaphorCatalog {
        &self.catalog
    }

    /// The interaction log this session records to.
    pub fn log(&self) -> &InteractionLog<S> {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut InteractionLog<S> {
        &mut self.log
    }

    /// Handle one line of input.
    pub fn respond(&mut self, input: &str) -> Turn {
        let (response, subsystem) = match Command::parse(input) {
            Command::Exit => return Turn::Exit,
            Command::Help => return Turn::Help,
            Command::Memory => return Turn::ShowMemory,
            Command::Empty => return Turn::Silence,
            _ if self.crisis.is_crisis(input) => {
                log::info!("[sylva] emergency keyword matched, showing crisis resources");
                return Turn::Crisis {
                    message: self.crisis.message().to_string(),
                };
            }
            Command::UnknownRitual(command) => {
                log::debug!("[sylva] unknown ritual {}", command);
                return Turn::UnknownRitual { command };
            }
            Command::Quiet => quiet_response(),
            Command::Pulse => pulse_response(&self.log.recent(PULSE_WINDOW)),
            Command::Mirror(text) => mirror_response(&text),
            Command::Message(text) => {
                let subsystem = self.classifier.classify(&text);
                let response = self.composer.compose(subsystem, &self.catalog, &mut self.rng);
                (response, subsystem)
            }
        };

        log::debug!("[sylva] responding via {}", subsystem);
        self.log.record(input.trim(), &response, subsystem);
        Turn::Reply {
            response,
            subsystem,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::random::ScriptedRandom;
    use crate::rituals::QUIET_RESPONSE;
    use sylva_rules::ends_with_ritual_closure;

    fn session() -> Sylva<MemoryStore, StdRandom> {
        let config = SylvaConfig::default();
        let log = InteractionLog::open(MemoryStore::new(), config.max_memory_entries);
        Sylva::new(
            &config,
            MetaphorCatalog::load_or_fallback(None),
            log,
            StdRandom::seeded(7),
        )
    }

    #[test]
    fn test_control_words_are_not_logged() {
        let mut sylva = session();
        assert_eq!(sylva.respond("exit"), Turn::Exit);
        assert_eq!(sylva.respond("?"), Turn::Help);
        assert_eq!(sylva.respond("MEMORY"), Turn::ShowMemory);
        assert_eq!(sylva.respond("   "), Turn::Silence);
        assert_eq!(sylva.log().interaction_count(), 0);
    }

    #[test]
    fn test_message_is_classified_composed_and_logged() {
        let mut sylva = session();
        let turn = sylva.respond("I feel ashamed and broken inside");

        let Turn::Reply { response, subsystem } = turn else {
            panic!("expected a reply, got {:?}", turn);
        };
        assert_eq!(subsystem, Subsystem::Marrow);
        assert!(ends_with_ritual_closure(&response));

        let last = sylva.log().recent(1);
        assert_eq!(last[0].user_input, "I feel ashamed and broken inside");
        assert_eq!(last[0].response, response);
        assert!(last[0].subsystem.is(Subsystem::Marrow));
    }

    #[test]
    fn test_quiet_is_exact_and_logged_as_aura() {
        let mut sylva = session();
        assert_eq!(
            sylva.respond("/quiet"),
            Turn::Reply {
                response: QUIET_RESPONSE.to_string(),
                subsystem: Subsystem::Aura,
            }
        );
        assert_eq!(sylva.log().activity().get(Subsystem::Aura), 1);
    }

    #[test]
    fn test_crisis_input_is_never_logged() {
        let mut sylva = session();
        let turn = sylva.respond("I want to die");
        assert!(matches!(turn, Turn::Crisis { ref message } if message.contains("crisis")));

        // Crisis wins over rituals too.
        assert!(matches!(sylva.respond("/mirror I want to die"), Turn::Crisis { .. }));
        assert_eq!(sylva.log().interaction_count(), 0);
    }

    #[test]
    fn test_unknown_ritual_is_not_logged() {
        let mut sylva = session();
        assert_eq!(
            sylva.respond("/dance"),
            Turn::UnknownRitual {
                command: "/dance".to_string()
            }
        );
        assert_eq!(sylva.log().interaction_count(), 0);
    }

    #[test]
    fn test_pulse_reads_recent_history() {
        let mut sylva = session();
        let Turn::Reply { response, .. } = sylva.respond("/pulse") else {
            panic!("expected a reply");
        };
        assert_eq!(response, "The pulse is quiet. No recent patterns to observe.");

        sylva.respond("/quiet");
        sylva.respond("/quiet");
        let Turn::Reply { response, subsystem } = sylva.respond("/pulse") else {
            panic!("expected a reply");
        };
        // The first pulse (ROOT) and two quiets (AURA) are in the window.
        assert!(response.contains("ROOT and AURA"), "{}", response);
        assert_eq!(subsystem, Subsystem::Root);
    }

    #[test]
    fn test_mirror_logs_full_input() {
        let mut sylva = session();
        sylva.respond("  /mirror heavy stone  ");
        let last = sylva.log().recent(1);
        assert_eq!(last[0].user_input, "/mirror heavy stone");
        assert_eq!(
            last[0].response,
            "The mirror shows: 'heavy stone' - these words carry their own weight."
        );
    }

    #[test]
    fn test_scripted_reply_is_exact() {
        let config = SylvaConfig::default();
        let log = InteractionLog::open(MemoryStore::new(), 10);
        let catalog = MetaphorCatalog::minimal();
        let rng = ScriptedRandom::new()
            .with_indices([0, 0, 0])
            .with_floats([0.0, 0.99]);
        let mut sylva = Sylva::new(&config, catalog, log, rng);

        let Turn::Reply { response, subsystem } = sylva.respond("nothing to match here") else {
            panic!("expected a reply");
        };
        assert_eq!(subsystem, Subsystem::Root);
        assert_eq!(response, "The ember holds steady in the wind. That's enough for now.");
    }
}
