//! Terminal rendering. Every function returns the text to print so the
//! layout can be tested without a terminal.

use std::fmt::Write;

use sylva_core::{
    ActivityCounts, DriftStatus, InteractionRecord, LogStats, SimulationReport, CRISIS_RESOURCES,
};
use sylva_rules::{MetaphorCatalog, Subsystem};

const BAR_CELLS: usize = 20;

/// Banner shown when a session starts.
pub fn welcome() -> String {
    let rule = "=".repeat(60);
    format!(
        "\n{rule}\n🌙 SYLVA - Symbolic Emotional Wellness Assistant 🌙\n{rule}\n\n\
         You are welcome here. SYLVA speaks in symbols and metaphors.\n\
         Share what you're feeling, or type 'exit' to leave.\n\
         Type '?' for guidance on symbolic interaction.\n"
    )
}

/// Guidance shown for `?`.
pub fn help() -> String {
    let rule = "-".repeat(50);
    let mut out = format!("\n{rule}\nSYLVA Symbolic Interaction Guide:\n{rule}\n");
    for line in [
        "Share your feelings in any way that feels right",
        "SYLVA responds through symbolic metaphors",
        "No advice, no solutions - only symbolic containment",
        "Type 'exit' or 'quit' to leave when ready",
        "Type '?' for this guidance",
        "Type 'memory' to see your interaction history",
    ] {
        let _ = writeln!(out, "• {}", line);
    }
    out.push_str("\nSymbolic Commands:\n");
    out.push_str("• /quiet - Enter stillness together\n");
    out.push_str("• /pulse - View symbolic patterns in recent interactions\n");
    out.push_str("• /mirror - Receive your words in symbolic framing\n");
    out.push_str("\nSubsystems:\n");
    out.push_str("• MARROW - Deep core processing\n");
    out.push_str("• ROOT - Grounding and stability\n");
    out.push_str("• AURA - Protective boundary work\n");
    let _ = writeln!(out, "{rule}");
    out
}

/// Closing text for `exit` and `quit`.
pub fn farewell() -> String {
    format!(
        "\n{}\nThe tide recedes, but the shore remains.\n\
         You are welcome to return when you need symbolic space.\nTake care.\n",
        "-".repeat(50)
    )
}

/// Closing line when the session is interrupted with Ctrl-C.
pub fn interrupted() -> String {
    "\n\nYou choose to leave. That's okay.\n".to_string()
}

/// A logged response, framed with the moon glyph.
pub fn reply(response: &str) -> String {
    format!("\n🌙 SYLVA: {}\n", response)
}

/// The crisis message followed by the resource lines.
pub fn crisis(message: &str) -> String {
    let mut out = format!("\n🚨 Important: {}\n\nCrisis Resources:\n", message);
    for line in CRISIS_RESOURCES {
        let _ = writeln!(out, "• {}", line);
    }
    out.push_str("\nYou matter, and help is available.\n");
    out
}

/// `YYYY-MM-DD HH:MM` for valid timestamps, the raw value otherwise.
fn display_time(record: &InteractionRecord) -> String {
    match record.recorded_at() {
        Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
        None if record.timestamp.is_empty() => "Unknown".to_string(),
        None => record.timestamp.clone(),
    }
}

/// One bar of 20 cells, 5% per cell, rounded down.
pub fn activity_bar(count: u64, total: u64) -> String {
    let filled = if total == 0 {
        0
    } else {
        ((count.min(total) * BAR_CELLS as u64) / total) as usize
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}

/// Activity chart, or nothing when no subsystem has been counted.
pub fn activity_summary(activity: &ActivityCounts) -> String {
    let total = activity.total();
    if total == 0 {
        return String::new();
    }

    let mut out = format!("\n🧠 Subsystem Activity Patterns:\n{}\n", "-".repeat(30));
    for (subsystem, count) in activity.iter() {
        let percentage = count as f64 / total as f64 * 100.0;
        let _ = writeln!(
            out,
            "{} {}: {} {} ({:.1}%)",
            subsystem.glyph(),
            subsystem,
            activity_bar(count, total),
            count,
            percentage
        );
    }
    out
}

/// The `memory` view: the last records, the activity chart and totals.
pub fn memory_view(
    recent: &[InteractionRecord],
    activity: &ActivityCounts,
    total: usize,
    location: &str,
) -> String {
    if recent.is_empty() {
        return "\nNo previous interactions found.\n\
                The memory container awaits your first symbolic exchange.\n"
            .to_string();
    }

    let mut out = format!(
        "\n📖 Recent SYLVA Interactions (last {}):\n{}\n",
        recent.len(),
        "=".repeat(60)
    );
    for (i, record) in recent.iter().enumerate() {
        let _ = writeln!(
            out,
            "\n{}. {} {} {}",
            i + 1,
            display_time(record),
            record.subsystem.glyph(),
            record.subsystem
        );
        let _ = writeln!(out, "   You: {}", record.user_input);
        let _ = writeln!(out, "   SYLVA: {}", record.response);
        let _ = writeln!(out, "{}", "-".repeat(40));
    }

    out.push_str(&activity_summary(activity));
    let _ = write!(
        out,
        "\nTotal interactions: {}\nMemory file: {}\n",
        total, location
    );
    out
}

/// Summary of log statistics with the activity chart.
pub fn stats_view(stats: &LogStats, location: &str) -> String {
    let most_active = stats
        .most_active_subsystem
        .map(|s| format!("{} {}", s.glyph(), s))
        .unwrap_or_else(|| "NONE".to_string());

    let mut out = String::from("\n📊 SYLVA Memory Statistics\n");
    let _ = writeln!(out, "{}", "=".repeat(40));
    let _ = writeln!(out, "Total interactions: {}", stats.total_interactions);
    let _ = writeln!(out, "Unique sessions:    {}", stats.unique_sessions);
    let _ = writeln!(out, "Most active:        {}", most_active);
    let _ = writeln!(out, "Created:            {}", stats.created_date);
    let _ = writeln!(out, "Schema version:     {}", stats.version);
    let _ = writeln!(
        out,
        "Memory file:        {} ({} bytes)",
        location, stats.memory_file_size
    );
    out.push_str(&activity_summary(&stats.subsystem_activity));
    out
}

/// Subsystem descriptions and the archetypes each one draws on.
pub fn subsystem_info(catalog: &MetaphorCatalog) -> String {
    let mut out = String::from("\n🧭 SYLVA Subsystems\n");
    let _ = writeln!(out, "{}", "=".repeat(40));
    for subsystem in Subsystem::ALL {
        let info = subsystem.info();
        let archetypes: Vec<&str> = catalog
            .archetypes_for(subsystem)
            .into_iter()
            .map(|a| a.name.as_str())
            .collect();

        let _ = writeln!(out, "\n{} {}", subsystem.glyph(), subsystem);
        let _ = writeln!(out, "   {}", info.description);
        let _ = writeln!(out, "   Focus:      {}", info.focus);
        let _ = writeln!(out, "   Approach:   {}", info.approach);
        let _ = writeln!(out, "   Archetypes: {}", archetypes.join(", "));
    }
    let _ = writeln!(
        out,
        "\nAll archetypes: {}",
        catalog.archetype_names().join(", ")
    );
    out
}

/// Step-by-step drift simulation report.
pub fn diagnosis(report: &SimulationReport) -> String {
    let mut out = format!("\n🌀 SUBSYSTEM DRIFT SIMULATION\n{}\n", "=".repeat(50));

    let mut previous: Option<Subsystem> = None;
    for (i, step) in report.steps.iter().enumerate() {
        let _ = writeln!(out, "Step {:2}: {}", i + 1, step.input);
        let _ = writeln!(
            out,
            " {} {}: {}",
            step.subsystem.glyph(),
            step.subsystem,
            step.response
        );
        if !step.has_closure {
            out.push_str("    ⚠️ Missing ritual closure\n");
        }
        if !step.violations.is_empty() {
            let _ = writeln!(
                out,
                "    🚫 Forbidden pattern detected: {}",
                step.violations.join(", ")
            );
        }
        if let Some(prev) = previous.filter(|p| *p != step.subsystem) {
            let _ = writeln!(out, "    📈 Drift: {} → {}", prev, step.subsystem);
        }
        previous = Some(step.subsystem);
    }

    let drift = &report.drift;
    let visited: Vec<&str> = drift.visited().iter().map(|s| s.as_str()).collect();
    let symbol = match drift.status {
        DriftStatus::Stable => "✅",
        DriftStatus::Drifting => "⚠️",
    };
    let _ = write!(
        out,
        "\n🔍 DRIFT ANALYSIS\n{}\n\
         Subsystems visited: {}\n\
         Total transitions: {}\n\
         Drift percentage: {:.1}%\n\
         System status: {} {}\n\
         Missing closures: {}\n\
         Guardrail violations: {}\n",
        "-".repeat(25),
        visited.join(", "),
        drift.transitions.len(),
        drift.drift_percentage,
        symbol,
        drift.status,
        report.missing_closures(),
        report.violation_count()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sylva_core::{drift_report, SimulationStep, SubsystemTag};

    fn record(subsystem: Subsystem) -> InteractionRecord {
        let at = NaiveDate::from_ymd_opt(2024, 4, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        InteractionRecord::new("I feel hollow", "The moon is whole. That's enough for now.", subsystem, at)
    }

    #[test]
    fn test_activity_bar_cells() {
        assert_eq!(activity_bar(0, 0), "░".repeat(20));
        assert_eq!(activity_bar(1, 1), "█".repeat(20));
        assert_eq!(activity_bar(1, 4), format!("{}{}", "█".repeat(5), "░".repeat(15)));
        // 1/3 = 33.3% -> 6 cells, rounded down.
        assert_eq!(activity_bar(1, 3).chars().filter(|c| *c == '█').count(), 6);
    }

    #[test]
    fn test_empty_memory_view() {
        let view = memory_view(&[], &ActivityCounts::default(), 0, "log.json");
        assert!(view.contains("No previous interactions found."));
    }

    #[test]
    fn test_memory_view_lists_records() {
        let mut unknown = record(Subsystem::Root);
        unknown.subsystem = SubsystemTag::Other("EMBER".to_string());
        unknown.timestamp = "garbled".to_string();

        let records = vec![record(Subsystem::Marrow), unknown];
        let activity = ActivityCounts::from_records(&records);
        let view = memory_view(&records, &activity, 2, "log.json");

        assert!(view.contains("(last 2)"));
        assert!(view.contains("1. 2024-04-02 09:30 🔥 MARROW"));
        assert!(view.contains("2. garbled ❓ EMBER"));
        assert!(view.contains("   You: I feel hollow"));
        assert!(view.contains("🔥 MARROW: ████████████████████ 1 (100.0%)"));
        assert!(view.contains("Total interactions: 2"));
        assert!(view.contains("Memory file: log.json"));
    }

    #[test]
    fn test_activity_summary_hidden_when_empty() {
        assert!(activity_summary(&ActivityCounts::default()).is_empty());
    }

    #[test]
    fn test_interrupt_farewell() {
        assert_eq!(interrupted().trim(), "You choose to leave. That's okay.");
    }

    #[test]
    fn test_crisis_lists_resources() {
        let text = crisis("Please reach out.");
        assert!(text.contains("🚨 Important: Please reach out."));
        assert!(text.contains("988"));
        assert!(text.contains("741741"));
    }

    #[test]
    fn test_subsystem_info_lists_archetypes() {
        let text = subsystem_info(&MetaphorCatalog::minimal());
        assert!(text.contains("🔥 MARROW"));
        assert!(text.contains("Archetypes: the_ember"));
        assert!(text.contains("All archetypes: the_ember"));
    }

    #[test]
    fn test_diagnosis_marks_drift() {
        let step = |input: &str, subsystem| SimulationStep {
            input: input.to_string(),
            subsystem,
            response: "The tide turns. That's enough for now.".to_string(),
            has_closure: true,
            violations: Vec::new(),
        };
        let steps = vec![step("a", Subsystem::Root), step("b", Subsystem::Aura)];
        let report = SimulationReport {
            drift: drift_report(&[Subsystem::Root, Subsystem::Aura]),
            steps,
        };

        let text = diagnosis(&report);
        assert!(text.contains("📈 Drift: ROOT → AURA"));
        assert!(text.contains("Drift percentage: 100.0%"));
        assert!(text.contains("System status: ⚠️ DRIFTING"));
    }
}
