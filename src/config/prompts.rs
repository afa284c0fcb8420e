//! Prompt templates for Appster.
//!
//! Prompts can be customized by placing a `prompts.toml` file in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    /// Template used when the user asks for questions, a quiz, MCQs or interview prep.
    pub question_generation: String,
    /// Template used to condense the whole conversation memory.
    pub summarization: String,
    /// General question answering template.
    pub answer: String,
    /// Wraps the memory text inside `answer` when memory is present.
    pub memory_section: String,
    /// Wraps the retrieved context inside `answer` when context is used.
    pub context_section: String,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            question_generation: r#"You are {{assistant_name}}, a professional AI tutor.
Generate 10-15 clear and relevant questions about:
"{{question}}"

Guidelines:
- Mix beginner and advanced levels.
- Use a numbered list.
- Add hints or subtopics in parentheses if useful.

Answer:"#
                .to_string(),

            summarization: r#"You are {{assistant_name}}, a summarization expert.
Your task is to create a concise summary of the conversation below.

Keep only key facts, important context, and user preferences.
Make it natural and readable, like a short memory summary.

Conversation:
{{memory}}

Summary:"#
                .to_string(),

            answer: r#"You are {{assistant_name}}, a highly capable AI assistant.
Use both the retrieved context and conversation memory to give a clear, natural, and structured answer.
{{memory_section}}{{context_section}}
Question: {{question}}

Answer in detail, with examples or bullet points where helpful:"#
                .to_string(),

            memory_section: "\nConversation Memory:\n{{memory}}\n".to_string(),

            context_section: "\nContext:\n{{context}}\n".to_string(),

            variables: HashMap::new(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let prompts_path = custom_path.join("prompts.toml");
            if prompts_path.exists() {
                let content = std::fs::read_to_string(&prompts_path)?;
                prompts = toml::from_str(&content)?;
            }
        }

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substitution is a single left-to-right pass, so placeholders that appear
    /// inside substituted values (user questions, memory) are left untouched.
    /// Unknown placeholders are kept verbatim.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find("{{") {
            result.push_str(&rest[..open]);
            let after = &rest[open + 2..];
            match after.find("}}") {
                Some(close) => {
                    let key = &after[..close];
                    match vars.get(key.trim()) {
                        Some(value) => result.push_str(value),
                        None => {
                            result.push_str("{{");
                            result.push_str(key);
                            result.push_str("}}");
                        }
                    }
                    rest = &after[close + 2..];
                }
                None => {
                    result.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        result.push_str(rest);
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
