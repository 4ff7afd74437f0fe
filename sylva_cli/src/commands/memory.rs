//! Interaction log commands: view, stats, patterns, export and clear.

use std::io::{self, BufRead, Write};
use std::path::Path;

use sylva_core::{InteractionLog, LogStore};
use sylva_rules::SylvaConfig;

use crate::display;

fn open_log(config: &SylvaConfig) -> InteractionLog<sylva_core::JsonFileStore> {
    InteractionLog::at_path(&config.memory_file, config.max_memory_entries)
}

/// Print the most recent interactions, `limit` defaulting to the configured count.
pub fn handle_memory(config: &SylvaConfig, limit: Option<usize>) -> i32 {
    let log = open_log(config);
    print!("{}", memory_text(&log, limit.unwrap_or(config.default_memory_limit)));
    0
}

/// Render the memory view for the last `limit` records.
pub fn memory_text<S: LogStore>(log: &InteractionLog<S>, limit: usize) -> String {
    let state = log.snapshot();
    display::memory_view(
        state.recent(limit),
        &state.subsystem_activity,
        state.len(),
        &log.location(),
    )
}

/// Print log statistics.
pub fn handle_stats(config: &SylvaConfig) -> i32 {
    let log = open_log(config);
    print!("{}", display::stats_view(&log.stats(), &log.location()));
    0
}

/// Print the subsystem sequence per day for the last `days` days.
pub fn handle_patterns(config: &SylvaConfig, days: u32) -> i32 {
    let log = open_log(config);
    print!("{}", patterns_text(&log, days));
    0
}

/// Render daily subsystem sequences with glyphs.
pub fn patterns_text<S: LogStore>(log: &InteractionLog<S>, days: u32) -> String {
    let patterns = log.patterns(days);
    if patterns.is_empty() {
        return format!("\nNo interactions in the last {} days.\n", days);
    }

    let mut out = format!("\n🗓️ Subsystem patterns, last {} days:\n", days);
    for (day, tags) in &patterns {
        let glyphs: Vec<&str> = tags.iter().map(|t| t.glyph()).collect();
        let labels: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();
        out.push_str(&format!("{}  {}  {}\n", day, glyphs.join(""), labels.join(" → ")));
    }
    out
}

/// Export the log to `path`.
pub fn handle_export(config: &SylvaConfig, path: &Path) -> i32 {
    let log = open_log(config);
    match log.export(path) {
        Ok(count) => {
            println!("Memory exported to: {} ({} interactions)", path.display(), count);
            println!("The sacred record has been preserved.");
            0
        }
        Err(e) => {
            eprintln!("Export failed: {}", e);
            eprintln!("The memory container could not be transferred.");
            1
        }
    }
}

/// Clear the log, asking on stdin unless `yes` is set.
pub fn handle_clear(config: &SylvaConfig, yes: bool) -> i32 {
    let mut log = open_log(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    match clear_with_confirmation(&mut log, yes, stdin.lock(), &mut stdout) {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("Clearing failed: {}", e);
            1
        }
    }
}

/// Ask before clearing unless `yes` is set. Returns whether the log was cleared.
pub fn clear_with_confirmation<S, I, W>(
    log: &mut InteractionLog<S>,
    yes: bool,
    mut input: I,
    output: &mut W,
) -> io::Result<bool>
where
    S: LogStore,
    I: BufRead,
    W: Write,
{
    if !yes {
        write!(
            output,
            "Are you sure you want to clear all SYLVA memory? \
             The sacred container will be emptied. (yes/no): "
        )?;
        output.flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        let answer = answer.trim().to_lowercase();
        if answer != "yes" && answer != "y" {
            writeln!(output, "Memory clearing cancelled. The container remains.")?;
            return Ok(false);
        }
    }

    log.clear()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    writeln!(
        output,
        "SYLVA memory has been cleared. The container is ready for new symbolic exchanges."
    )?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local};
    use std::io::Cursor;
    use sylva_core::MemoryStore;
    use sylva_rules::Subsystem;
    use tempfile::TempDir;

    fn log_with(count: usize) -> InteractionLog<MemoryStore> {
        let mut log = InteractionLog::open(MemoryStore::new(), 100);
        for i in 0..count {
            log.record(&format!("input {}", i), "reply", Subsystem::Root);
        }
        log
    }

    #[test]
    fn test_memory_text_respects_limit() {
        let log = log_with(4);
        let text = memory_text(&log, 2);
        assert!(text.contains("(last 2)"));
        assert!(text.contains("You: input 3"));
        assert!(!text.contains("You: input 1"));
        assert!(text.contains("Total interactions: 4"));
    }

    #[test]
    fn test_clear_declined() {
        let mut log = log_with(2);
        let mut output = Vec::new();
        let cleared =
            clear_with_confirmation(&mut log, false, Cursor::new("no\n"), &mut output).unwrap();

        assert!(!cleared);
        assert_eq!(log.interaction_count(), 2);
        assert!(String::from_utf8(output).unwrap().contains("cancelled"));
    }

    #[test]
    fn test_clear_confirmed_or_forced() {
        let mut log = log_with(2);
        let mut output = Vec::new();
        assert!(clear_with_confirmation(&mut log, false, Cursor::new("Y\n"), &mut output).unwrap());
        assert_eq!(log.interaction_count(), 0);

        let mut log = log_with(1);
        assert!(clear_with_confirmation(&mut log, true, Cursor::new(""), &mut Vec::new()).unwrap());
        assert_eq!(log.interaction_count(), 0);
    }

    #[test]
    fn test_patterns_text() {
        let mut log = InteractionLog::open(MemoryStore::new(), 100);
        assert!(patterns_text(&log, 7).contains("No interactions"));

        let yesterday = Local::now().naive_local() - Duration::days(1);
        log.record_at("a", "r", Subsystem::Marrow, yesterday);
        log.record_at("b", "r", Subsystem::Aura, yesterday);

        let text = patterns_text(&log, 7);
        assert!(text.contains("🔥🌙"));
        assert!(text.contains("MARROW → AURA"));
    }

    #[test]
    fn test_export_to_file() {
        let dir = TempDir::new().unwrap();
        let config = SylvaConfig {
            memory_file: dir.path().join("log.json"),
            ..SylvaConfig::default()
        };
        let mut log = open_log(&config);
        log.record("hello", "reply", Subsystem::Aura);

        let target = dir.path().join("export.json");
        assert_eq!(handle_export(&config, &target), 0);
        assert!(target.exists());
    }
}
