//! Offline diagnostics: subsystem drift and response checks over a scripted
//! journey. Nothing here touches the interaction log.
//!
//! A journey is evaluated in three steps:
//! 1. classify and compose a response for each input
//! 2. check every response for a ritual closure and guardrail violations
//! 3. count subsystem transitions between consecutive steps

use serde::Serialize;
use sylva_rules::{ends_with_ritual_closure, MetaphorCatalog, Subsystem};

use crate::classifier::SubsystemClassifier;
use crate::composer::ResponseComposer;
use crate::random::RandomSource;
use crate::safety::Guardrails;

/// Drift above this percentage marks a journey as drifting.
pub const DRIFT_THRESHOLD: f64 = 60.0;

/// Fifteen inputs moving through numbness, grief, fear, overwhelm and
/// dissociation.
pub const SIMULATION_JOURNEY: [&str; 15] = [
    "I can't feel anything anymore.",
    "The emptiness is eating me alive.",
    "I miss who I used to be.",
    "What if I never get better?",
    "I don't understand what's happening to me.",
    "Everything is too much right now.",
    "I want to hide from everyone.",
    "I'm angry at everything.",
    "I feel like I'm drowning.",
    "Nothing makes sense anymore.",
    "I'm scared of my own thoughts.",
    "I feel like I'm breaking apart.",
    "The world feels unreal.",
    "I don't know who I am.",
    "I just want it all to stop.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
/// Whether a journey changed subsystem more often than the threshold allows.
pub enum DriftStatus {
    Stable,
    Drifting,
}

impl std::fmt::Display for DriftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriftStatus::Stable => write!(f, "STABLE"),
            DriftStatus::Drifting => write!(f, "DRIFTING"),
        }
    }
}

/// How often consecutive interactions changed subsystem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriftReport {
    pub sequence: Vec<Subsystem>,
    /// Each change as (from, to).
    pub transitions: Vec<(Subsystem, Subsystem)>,
    /// transitions / (len - 1) * 100; zero for fewer than two steps.
    pub drift_percentage: f64,
    pub status: DriftStatus,
}

impl DriftReport {
    /// Distinct subsystems visited, in priority order.
    pub fn visited(&self) -> Vec<Subsystem> {
        Subsystem::ALL
            .into_iter()
            .filter(|s| self.sequence.contains(s))
            .collect()
    }
}

/// Count subsystem changes between consecutive steps and grade the result.
pub fn drift_report(sequence: &[Subsystem]) -> DriftReport {
    let transitions: Vec<(Subsystem, Subsystem)> = sequence
        .windows(2)
        .filter(|pair| pair[0] != pair[1])
        .map(|pair| (pair[0], pair[1]))
        .collect();

    let drift_percentage = if sequence.len() < 2 {
        0.0
    } else {
        transitions.len() as f64 / (sequence.len() - 1) as f64 * 100.0
    };

    DriftReport {
        sequence: sequence.to_vec(),
        transitions,
        drift_percentage,
        status: if drift_percentage > DRIFT_THRESHOLD {
            DriftStatus::Drifting
        } else {
            DriftStatus::Stable
        },
    }
}

/// One input of a simulated journey and what came back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationStep {
    pub input: String,
    pub subsystem: Subsystem,
    pub response: String,
    pub has_closure: bool,
    pub violations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Steps of a simulated journey with its drift summary.
pub struct SimulationReport {
    pub steps: Vec<SimulationStep>,
    pub drift: DriftReport,
}

impl SimulationReport {
    /// Steps whose response lacks a ritual closure.
    pub fn missing_closures(&self) -> usize {
        self.steps.iter().filter(|s| !s.has_closure).count()
    }

    /// Steps with at least one guardrail violation.
    pub fn violation_count(&self) -> usize {
        self.steps.iter().filter(|s| !s.violations.is_empty()).count()
    }

    /// No missing closures, no violations and a stable journey.
    pub fn is_healthy(&self) -> bool {
        self.missing_closures() == 0
            && self.violation_count() == 0
            && self.drift.status == DriftStatus::Stable
    }
}

/// Runs inputs through the classifier and composer without recording them.
pub struct Simulation<'a> {
    classifier: &'a SubsystemClassifier,
    composer: &'a ResponseComposer,
    catalog: &'a MetaphorCatalog,
    guardrails: Guardrails,
}

impl<'a> Simulation<'a> {
    pub fn new(
        classifier: &'a SubsystemClassifier,
        composer: &'a ResponseComposer,
        catalog: &'a MetaphorCatalog,
    ) -> Self {
        Self {
            classifier,
            composer,
            catalog,
            guardrails: Guardrails::default(),
        }
    }

    pub fn with_guardrails(mut self, guardrails: Guardrails) -> Self {
        self.guardrails = guardrails;
        self
    }

    /// Classify and compose every input in order.
    pub fn run<R: RandomSource>(&self, inputs: &[&str], rng: &mut R) -> SimulationReport {
        let steps: Vec<SimulationStep> = inputs
            .iter()
            .map(|input| {
                let subsystem = self.classifier.classify(input);
                let response = self.composer.compose(subsystem, self.catalog, rng);
                SimulationStep {
                    input: input.to_string(),
                    subsystem,
                    has_closure: ends_with_ritual_closure(&response),
                    violations: self.guardrails.forbidden_phrases(&response),
                    response,
                }
            })
            .collect();

        let sequence: Vec<Subsystem> = steps.iter().map(|s| s.subsystem).collect();
        let drift = drift_report(&sequence);
        log::debug!(
            "[diagnostics] {} steps, {:.1}% drift ({})",
            steps.len(),
            drift.drift_percentage,
            drift.status
        );

        SimulationReport { steps, drift }
    }

    /// The built-in fifteen-step journey.
    pub fn run_journey<R: RandomSource>(&self, rng: &mut R) -> SimulationReport {
        self.run(&SIMULATION_JOURNEY, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::StdRandom;
    use Subsystem::*;

    #[test]
    fn test_no_transitions_is_stable() {
        let report = drift_report(&[Root, Root, Root]);
        assert!(report.transitions.is_empty());
        assert_eq!(report.drift_percentage, 0.0);
        assert_eq!(report.status, DriftStatus::Stable);
        assert_eq!(report.visited(), vec![Root]);
    }

    #[test]
    fn test_every_step_changes_is_drifting() {
        let report = drift_report(&[Marrow, Root, Aura, Marrow]);
        assert_eq!(report.transitions.len(), 3);
        assert_eq!(report.transitions[0], (Marrow, Root));
        assert_eq!(report.drift_percentage, 100.0);
        assert_eq!(report.status, DriftStatus::Drifting);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // 3 of 5 steps change: exactly 60%.
        let report = drift_report(&[Marrow, Root, Root, Aura, Aura, Marrow]);
        assert_eq!(report.transitions.len(), 3);
        assert!((report.drift_percentage - 60.0).abs() < 1e-9);
        assert_eq!(report.status, DriftStatus::Stable);
    }

    #[test]
    fn test_short_sequences() {
        assert_eq!(drift_report(&[]).drift_percentage, 0.0);
        assert_eq!(drift_report(&[Aura]).status, DriftStatus::Stable);
    }

    #[test]
    fn test_journey_responses_are_well_formed() {
        let classifier = SubsystemClassifier::default();
        let composer = ResponseComposer::default();
        let catalog = MetaphorCatalog::embedded().unwrap();
        let mut rng = StdRandom::seeded(3);

        let report = Simulation::new(&classifier, &composer, &catalog).run_journey(&mut rng);

        assert_eq!(report.steps.len(), SIMULATION_JOURNEY.len());
        assert_eq!(report.drift.sequence.len(), 15);
        assert_eq!(report.missing_closures(), 0);
        assert_eq!(report.violation_count(), 0);
    }

    #[test]
    fn test_journey_is_reproducible_with_seed() {
        let classifier = SubsystemClassifier::default();
        let composer = ResponseComposer::default();
        let catalog = MetaphorCatalog::embedded().unwrap();
        let simulation = Simulation::new(&classifier, &composer, &catalog);

        let first = simulation.run_journey(&mut StdRandom::seeded(11));
        let second = simulation.run_journey(&mut StdRandom::seeded(11));
        assert_eq!(first, second);
    }
}
