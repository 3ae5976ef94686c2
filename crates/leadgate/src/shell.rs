// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `leadgate shell` command implementation.
//!
//! Interactive REPL over one [`LeadQualifier`] session with readline history
//! and colored results.

use colored::{ColoredString, Colorize};
use leadgate_core::LeadgateError;
use leadgate_qualifier::{Action, ClassificationResult, LeadQualifier, QualifierStatus};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

/// One line of shell input.
#[derive(Debug, PartialEq, Eq)]
enum ShellInput<'a> {
    Empty,
    Quit,
    Reset,
    Status,
    Unknown(&'a str),
    Message(&'a str),
}

fn parse_input(line: &str) -> ShellInput<'_> {
    let trimmed = line.trim();
    match trimmed {
        "" => ShellInput::Empty,
        "/quit" | "/exit" => ShellInput::Quit,
        "/reset" => ShellInput::Reset,
        "/status" => ShellInput::Status,
        cmd if cmd.starts_with('/') => ShellInput::Unknown(cmd),
        msg => ShellInput::Message(msg),
    }
}

/// Runs the REPL until `/quit`, Ctrl+C or Ctrl+D.
pub async fn run_shell(
    mut qualifier: LeadQualifier,
    agent_name: &str,
    identifier: Option<String>,
) -> Result<(), LeadgateError> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| LeadgateError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", format!("{agent_name} shell").bold().green());
    println!(
        "Commands: {} {} {}\n",
        "/reset".yellow(),
        "/status".yellow(),
        "/quit".yellow()
    );

    let prompt = format!("{}> ", "customer".cyan());
    loop {
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        };

        match parse_input(&line) {
            ShellInput::Empty => continue,
            ShellInput::Quit => break,
            ShellInput::Reset => {
                qualifier.reset();
                println!("{}", "conversation reset".dimmed());
            }
            ShellInput::Status => println!("{}", format_status(&qualifier.status())),
            ShellInput::Unknown(cmd) => {
                eprintln!("{}: unknown command {cmd}", "error".red());
            }
            ShellInput::Message(message) => {
                let _ = rl.add_history_entry(message);
                match qualifier.process(message, identifier.as_deref()).await {
                    Ok(result) => println!("{}", format_result(&result)),
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
        }
    }

    debug!("shell exited");
    Ok(())
}

fn action_label(action: Action) -> ColoredString {
    let label = action.to_string();
    match action {
        Action::EscalateHuman => label.red().bold(),
        Action::Block => label.magenta().bold(),
        Action::Continue => label.green(),
        Action::Error | Action::Unknown => label.yellow(),
    }
}

/// Multi-line human-readable rendering of a result.
fn format_result(result: &ClassificationResult) -> String {
    let mut lines = vec![
        format!("  {} {}", "intent:".dimmed(), result.intent),
        format!("  {} {}", "action:".dimmed(), action_label(result.action)),
        format!("  {} {}", "priority:".dimmed(), result.priority),
    ];
    if let Some(name) = &result.data.name {
        lines.push(format!("  {} {}", "name:".dimmed(), name));
    }
    lines.push(format!("  {} {}", "tone:".dimmed(), result.data.tone));
    if !result.reasoning.is_empty() {
        lines.push(format!("  {} {}", "reasoning:".dimmed(), result.reasoning));
    }
    if let Some(risk) = &result.risk {
        lines.push(format!("  {} {}", "risk:".dimmed(), risk.yellow()));
    }
    lines.join("\n")
}

fn format_status(status: &QualifierStatus) -> String {
    format!(
        "  off-topic: {}/{}\n  memory: {}/{} turns",
        status.off_topic_count, status.threshold, status.memory_turns, status.memory_capacity
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadgate_qualifier::{Intent, LeadData, Priority, Tone};

    #[test]
    fn parses_commands() {
        assert_eq!(parse_input("  "), ShellInput::Empty);
        assert_eq!(parse_input("/quit"), ShellInput::Quit);
        assert_eq!(parse_input("/exit\n"), ShellInput::Quit);
        assert_eq!(parse_input("/reset"), ShellInput::Reset);
        assert_eq!(parse_input("/status"), ShellInput::Status);
        assert_eq!(parse_input("/salir"), ShellInput::Unknown("/salir"));
        assert_eq!(
            parse_input(" I need an appointment "),
            ShellInput::Message("I need an appointment")
        );
    }

    #[test]
    fn result_shows_optional_fields_only_when_present() {
        let mut result = ClassificationResult {
            intent: Intent::Booking,
            data: LeadData {
                name: Some("Ana".into()),
                channel: "whatsapp".into(),
                tone: Tone::Positive,
            },
            action: Action::Continue,
            priority: Priority::High,
            reasoning: "wants Monday slot".into(),
            ..ClassificationResult::default()
        };
        let text = format_result(&result);
        assert!(text.contains("booking"));
        assert!(text.contains("Ana"));
        assert!(text.contains("high"));
        assert!(!text.contains("risk:"));

        result.data.name = None;
        result.risk = Some("mentions competitor".into());
        let text = format_result(&result);
        assert!(!text.contains("name:"));
        assert!(text.contains("mentions competitor"));
    }

    #[test]
    fn blocked_result_renders_block_action() {
        let text = format_result(&ClassificationResult::blacklisted());
        assert!(text.contains("block"));
        assert!(text.contains("blacklisted user"));
    }

    #[test]
    fn status_line() {
        let text = format_status(&QualifierStatus {
            off_topic_count: 2,
            threshold: 3,
            memory_turns: 4,
            memory_capacity: 6,
        });
        assert!(text.contains("off-topic: 2/3"));
        assert!(text.contains("memory: 4/6 turns"));
    }
}
