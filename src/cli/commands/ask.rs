//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::AppsterError;
use crate::orchestrator::{Orchestrator, TurnResponse};
use crate::rag::context::format_context_for_display;
use anyhow::Result;

/// Message shown when a question cannot be embedded.
pub(crate) const UNAVAILABLE_MESSAGE: &str =
    "I cannot process this question right now. Please try again in a moment.";

/// Run the ask command.
pub async fn run_ask(question: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&e.to_string());
        Output::info("Run 'appster doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let mut orchestrator = Orchestrator::new(&settings)?;
    let spinner = Output::spinner("Thinking...");
    let result = orchestrator.submit_question(question).await;
    spinner.finish_and_clear();

    match result {
        Ok(response) => {
            print_turn(&settings.memory.assistant_name, &response);
            Ok(())
        }
        Err(AppsterError::EmbeddingUnavailable { .. }) => {
            Output::warning(UNAVAILABLE_MESSAGE);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Failed to answer: {}", e));
            Err(e.into())
        }
    }
}

/// Print an answer and, when context was used, the snippets behind it.
pub(crate) fn print_turn(assistant: &str, response: &TurnResponse) {
    Output::answer(assistant, &response.answer);

    if response.used_context && !response.snippets.is_empty() {
        Output::header("Context");
        for (i, snippet) in response.snippets.iter().enumerate() {
            Output::snippet(i + 1, snippet);
        }
        println!("\n{}\n", format_context_for_display(&response.sources));
    }

    if response.summarized {
        Output::info("Conversation memory was summarized.");
    }
}
