//! The interactive prompt loop.

use std::io::{self, BufRead, Write};

use sylva_core::{LogStore, RandomSource, Sylva, Turn, SILENCE_RESPONSE, UNKNOWN_RITUAL_RESPONSE};
use sylva_rules::{MetaphorCatalog, SylvaConfig};

use crate::display;

const PROMPT: &str = "\nHow are you feeling?: ";

/// Display settings for one chat session.
#[derive(Debug, Clone, Copy)]
pub struct ChatOptions {
    /// Skip the welcome and farewell banners.
    pub quiet: bool,
    /// Records shown by the `memory` command.
    pub memory_limit: usize,
}

/// Ctrl-C prints the interrupt farewell and exits with status 0.
fn install_interrupt_handler() {
    let result = ctrlc::set_handler(|| {
        let mut stdout = io::stdout();
        let _ = write!(stdout, "{}", display::interrupted());
        let _ = stdout.flush();
        std::process::exit(0);
    });
    if let Err(e) = result {
        log::warn!("[sylva] could not install interrupt handler: {}", e);
    }
}

/// Run the chat loop on stdin/stdout against the configured log file.
pub fn handle_chat(config: &SylvaConfig, catalog: MetaphorCatalog, quiet: bool) -> i32 {
    install_interrupt_handler();
    let mut sylva = Sylva::from_config(config, catalog);
    let options = ChatOptions {
        quiet,
        memory_limit: config.default_memory_limit,
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    match run_chat(&mut sylva, stdin.lock(), &mut stdout, options) {
        Ok(()) => 0,
        Err(e) => {
            log::error!("[sylva] terminal error: {}", e);
            1
        }
    }
}

/// Read lines from `input` until `exit`/`quit` or end of input. Bytes that
/// are not valid UTF-8 are replaced rather than ending the session.
pub fn run_chat<S, R, I, W>(
    sylva: &mut Sylva<S, R>,
    mut input: I,
    output: &mut W,
    options: ChatOptions,
) -> io::Result<()>
where
    S: LogStore,
    R: RandomSource,
    I: BufRead,
    W: Write,
{
    if !options.quiet {
        write!(output, "{}", display::welcome())?;
    }

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let mut buf = Vec::new();
        if input.read_until(b'\n', &mut buf)? == 0 {
            writeln!(output, "\n\nFarewell.")?;
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);

        match sylva.respond(&line) {
            Turn::Exit => {
                if !options.quiet {
                    write!(output, "{}", display::farewell())?;
                }
                return Ok(());
            }
            Turn::Help => write!(output, "{}", display::help())?,
            Turn::ShowMemory => {
                let state = sylva.log().snapshot();
                let view = display::memory_view(
                    state.recent(options.memory_limit),
                    &state.subsystem_activity,
                    state.len(),
                    &sylva.log().location(),
                );
                write!(output, "{}", view)?;
            }
            Turn::Silence => writeln!(output, "{}", SILENCE_RESPONSE)?,
            Turn::Crisis { message } => write!(output, "{}", display::crisis(&message))?,
            Turn::Reply { response, .. } => write!(output, "{}", display::reply(&response))?,
            Turn::UnknownRitual { .. } => writeln!(output, "\n{}", UNKNOWN_RITUAL_RESPONSE)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use sylva_core::{InteractionLog, MemoryStore, StdRandom};

    fn session() -> Sylva<MemoryStore, StdRandom> {
        let config = SylvaConfig::default();
        Sylva::new(
            &config,
            MetaphorCatalog::minimal(),
            InteractionLog::open(MemoryStore::new(), 100),
            StdRandom::seeded(1),
        )
    }

    fn run(sylva: &mut Sylva<MemoryStore, StdRandom>, script: &str, quiet: bool) -> String {
        let mut output = Vec::new();
        let options = ChatOptions {
            quiet,
            memory_limit: 10,
        };
        run_chat(sylva, Cursor::new(script.as_bytes()), &mut output, options).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_exit_with_farewell() {
        let mut sylva = session();
        let output = run(&mut sylva, "exit\n", false);
        assert!(output.contains("SYLVA - Symbolic Emotional Wellness Assistant"));
        assert!(output.contains("The tide recedes, but the shore remains."));
    }

    #[test]
    fn test_quiet_mode_skips_banners() {
        let mut sylva = session();
        let output = run(&mut sylva, "quit\n", true);
        assert!(!output.contains("You are welcome here."));
        assert!(!output.contains("The tide recedes"));
    }

    #[test]
    fn test_end_of_input_says_farewell() {
        let mut sylva = session();
        let output = run(&mut sylva, "/quiet\n", true);
        assert!(output.contains("🌙 SYLVA: We'll sit in stillness. You're not required to speak."));
        assert!(output.trim_end().ends_with("Farewell."));
        assert_eq!(sylva.log().interaction_count(), 1);
    }

    #[test]
    fn test_invalid_utf8_does_not_end_session() {
        let mut sylva = session();
        let mut output = Vec::new();
        let options = ChatOptions {
            quiet: true,
            memory_limit: 10,
        };
        let script: &[u8] = b"caf\xe9 home\nI feel hollow\nexit\n";
        run_chat(&mut sylva, Cursor::new(script), &mut output, options).unwrap();

        let recent = sylva.log().recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].user_input, "caf\u{FFFD} home");
        assert_eq!(recent[1].user_input, "I feel hollow");
    }

    #[test]
    fn test_full_session_transcript() {
        let mut sylva = session();
        let output = run(
            &mut sylva,
            "\n?\nI feel hollow\n/dance\nI want to die\nmemory\nexit\n",
            true,
        );

        assert!(output.contains(SILENCE_RESPONSE));
        assert!(output.contains("SYLVA Symbolic Interaction Guide:"));
        assert!(output.contains(UNKNOWN_RITUAL_RESPONSE));
        assert!(output.contains("Crisis Resources:"));
        assert!(output.contains("(last 1)"));
        assert!(output.contains("You: I feel hollow"));
        assert_eq!(sylva.log().interaction_count(), 1);
    }
}
