//! Intent classification and prompt assembly.

use crate::config::Prompts;
use std::collections::HashMap;

/// Words that switch a question into question-generation mode.
pub const QUESTION_GENERATION_KEYWORDS: [&str; 4] = ["question", "quiz", "mcq", "interview"];

/// What the user wants out of this prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Produce a numbered list of practice questions.
    QuestionGeneration,
    /// Condense the conversation memory.
    Summarization,
    /// Answer the question using memory and retrieved context.
    GeneralQa,
}

impl Intent {
    /// Classify a question. Rules are tried in order and the first match wins:
    ///
    /// 1. the question contains a question-generation keyword (case-insensitive)
    /// 2. the caller asked for a summary
    /// 3. anything else
    pub fn classify(question: &str, summarize: bool) -> Self {
        let lowered = question.to_lowercase();
        if QUESTION_GENERATION_KEYWORDS
            .iter()
            .any(|keyword| lowered.contains(keyword))
        {
            Intent::QuestionGeneration
        } else if summarize {
            Intent::Summarization
        } else {
            Intent::GeneralQa
        }
    }
}

/// Builds the prompt text for a turn from the configured templates.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    prompts: Prompts,
    assistant_name: String,
}

impl PromptComposer {
    pub fn new(prompts: Prompts, assistant_name: impl Into<String>) -> Self {
        Self {
            prompts,
            assistant_name: assistant_name.into(),
        }
    }

    pub fn assistant_name(&self) -> &str {
        &self.assistant_name
    }

    /// Compose the prompt for one generation call.
    pub fn compose(
        &self,
        memory: &str,
        context: &str,
        question: &str,
        use_context: bool,
        summarize: bool,
    ) -> String {
        let mut vars = HashMap::new();
        vars.insert("assistant_name".to_string(), self.assistant_name.clone());

        match Intent::classify(question, summarize) {
            Intent::QuestionGeneration => {
                vars.insert("question".to_string(), question.to_string());
                self.prompts
                    .render_with_custom(&self.prompts.question_generation, &vars)
            }
            Intent::Summarization => {
                vars.insert("memory".to_string(), memory.to_string());
                self.prompts
                    .render_with_custom(&self.prompts.summarization, &vars)
            }
            Intent::GeneralQa => {
                let memory_section = if memory.trim().is_empty() {
                    String::new()
                } else {
                    self.section(&self.prompts.memory_section, "memory", memory)
                };
                let context_section = if use_context && !context.trim().is_empty() {
                    self.section(&self.prompts.context_section, "context", context)
                } else {
                    String::new()
                };

                vars.insert("memory_section".to_string(), memory_section);
                vars.insert("context_section".to_string(), context_section);
                vars.insert("question".to_string(), question.to_string());
                self.prompts.render_with_custom(&self.prompts.answer, &vars)
            }
        }
    }

    fn section(&self, template: &str, key: &str, value: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert(key.to_string(), value.to_string());
        self.prompts.render_with_custom(template, &vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer() -> PromptComposer {
        PromptComposer::new(Prompts::default(), "AppsterGPT")
    }

    #[test]
    fn test_classify_precedence() {
        assert_eq!(Intent::classify("Give me a QUIZ", false), Intent::QuestionGeneration);
        assert_eq!(Intent::classify("Give me a quiz", true), Intent::QuestionGeneration);
        assert_eq!(Intent::classify("MCQs on loops", false), Intent::QuestionGeneration);
        assert_eq!(Intent::classify("interview prep", false), Intent::QuestionGeneration);
        // Substring match, so "questions" counts
        assert_eq!(Intent::classify("any questions?", false), Intent::QuestionGeneration);
        assert_eq!(Intent::classify("Summarize memory", true), Intent::Summarization);
        assert_eq!(Intent::classify("What is a closure?", false), Intent::GeneralQa);
    }

    #[test]
    fn test_quiz_ignores_flags() {
        let c = composer();
        let with_flags = c.compose("memory text", "context text", "quiz me on rust", true, true);
        let without = c.compose("", "", "quiz me on rust", false, false);

        assert_eq!(with_flags, without);
        assert!(with_flags.contains("10-15"));
        assert!(with_flags.contains("\"quiz me on rust\""));
        assert!(!with_flags.contains("context text"));
    }

    #[test]
    fn test_summarization_embeds_memory_only() {
        let prompt = composer().compose(
            "User: hi\nAppsterGPT: hello",
            "some context",
            "Summarize memory",
            true,
            true,
        );

        assert!(prompt.contains("Conversation:\nUser: hi\nAppsterGPT: hello"));
        assert!(!prompt.contains("some context"));
        assert!(prompt.starts_with("You are AppsterGPT"));
    }

    #[test]
    fn test_general_qa_sections() {
        let c = composer();

        let full = c.compose("User: hi", "Closures capture.", "What is a closure?", true, false);
        assert!(full.contains("Conversation Memory:\nUser: hi"));
        assert!(full.contains("Context:\nClosures capture."));
        assert!(full.contains("Question: What is a closure?"));
        assert!(full.contains("Answer in detail"));

        let no_context = c.compose("User: hi", "Closures capture.", "What is a closure?", false, false);
        assert!(!no_context.contains("Context:"));

        let blank = c.compose("   \n", "  ", "hello", true, false);
        assert!(!blank.contains("Conversation Memory:"));
        assert!(!blank.contains("Context:"));
        assert!(blank.contains("Question: hello"));
    }

    #[test]
    fn test_question_is_verbatim() {
        let prompt = composer().compose("", "", "Why {{memory}} & <tags>?", false, false);
        assert!(prompt.contains("Question: Why {{memory}} & <tags>?"));
    }
}
