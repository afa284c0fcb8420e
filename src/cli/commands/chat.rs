//! Interactive chat command.

use super::ask::{print_turn, UNAVAILABLE_MESSAGE};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::AppsterError;
use crate::orchestrator::Orchestrator;
use console::style;
use std::io::{self, BufRead, Write};

/// What a line of user input asks the session to do.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput<'a> {
    Skip,
    Exit,
    Clear,
    Question(&'a str),
}

fn parse_input(line: &str) -> ChatInput<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ChatInput::Skip;
    }

    let lowered = line.to_lowercase();
    match lowered.as_str() {
        "exit" | "quit" => ChatInput::Exit,
        "clear memory" | "reset" => ChatInput::Clear,
        _ => ChatInput::Question(line),
    }
}

/// Run the interactive chat command.
pub async fn run_chat(settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&e.to_string());
        Output::info("Run 'appster doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let mut orchestrator = Orchestrator::new(&settings)?;
    let assistant = settings.memory.assistant_name.clone();

    println!("\n{}", style(format!("{} Chat", assistant)).bold().cyan());
    println!(
        "{}\n",
        style("Type your questions, 'clear memory' to reset, or 'exit' to quit.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut line = String::new();
        // EOF ends the session like "exit".
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        match parse_input(&line) {
            ChatInput::Skip => continue,
            ChatInput::Exit => break,
            ChatInput::Clear => {
                orchestrator.clear_history();
                Output::info("Conversation memory cleared.");
            }
            ChatInput::Question(question) => {
                let spinner = Output::spinner("Thinking...");
                let result = orchestrator.submit_question(question).await;
                spinner.finish_and_clear();

                match result {
                    Ok(response) => print_turn(&assistant, &response),
                    Err(AppsterError::EmbeddingUnavailable { .. }) => {
                        Output::warning(UNAVAILABLE_MESSAGE)
                    }
                    Err(e) => Output::error(&format!("Error: {}", e)),
                }
            }
        }
    }

    Output::info("Memory saved. Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_commands() {
        assert_eq!(parse_input("   \n"), ChatInput::Skip);
        assert_eq!(parse_input("EXIT\n"), ChatInput::Exit);
        assert_eq!(parse_input("quit"), ChatInput::Exit);
        assert_eq!(parse_input("Clear Memory"), ChatInput::Clear);
        assert_eq!(parse_input("reset"), ChatInput::Clear);
        assert_eq!(
            parse_input("  what is a loop?\n"),
            ChatInput::Question("what is a loop?")
        );
    }
}
