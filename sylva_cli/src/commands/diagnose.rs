//! Offline drift simulation over the built-in journey.
//!
//! Runs the fifteen journey inputs through the classifier and composer
//! without touching the interaction log, then reports drift, missing
//! closures and guardrail violations.
//!
//! Exit code:
//! - 0: every response closed and clean
//! - 1: a response was missing its closure or tripped a guardrail

use sylva_core::{
    Guardrails, RandomSource, ResponseComposer, SimulationReport, Simulation, StdRandom,
    SubsystemClassifier,
};
use sylva_rules::{MetaphorCatalog, SylvaConfig};

use crate::display;

/// Run the journey and print the report, as text or JSON.
pub fn handle_diagnose(
    config: &SylvaConfig,
    catalog: &MetaphorCatalog,
    seed: Option<u64>,
    json: bool,
) -> i32 {
    let report = match seed {
        Some(seed) => simulate(config, catalog, &mut StdRandom::seeded(seed)),
        None => simulate(config, catalog, &mut StdRandom::from_entropy()),
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Could not serialize report: {}", e);
                return 1;
            }
        }
    } else {
        print!("{}", display::diagnosis(&report));
    }

    if report.missing_closures() == 0 && report.violation_count() == 0 {
        0
    } else {
        1
    }
}

/// Run the built-in journey with the configured probabilities and guardrails.
pub fn simulate<R: RandomSource>(
    config: &SylvaConfig,
    catalog: &MetaphorCatalog,
    rng: &mut R,
) -> SimulationReport {
    let classifier = SubsystemClassifier::default();
    let composer = ResponseComposer::new(config.into());
    Simulation::new(&classifier, &composer, catalog)
        .with_guardrails(Guardrails::from_config(config))
        .run_journey(rng)
}
