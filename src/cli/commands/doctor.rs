//! Doctor command - verify the Ollama server, models and local files.

use crate::cli::Output;
use crate::config::Settings;
use crate::ollama;
use crate::vector_store::load_index;
use console::style;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

/// Run all diagnostic checks. `config_path` is the file given with `--config`, if any.
pub async fn run_doctor(settings: &Settings, config_path: Option<&Path>) -> anyhow::Result<()> {
    Output::header("Appster Doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("Ollama").bold());
    let ollama_checks = check_ollama(settings).await;
    for check in &ollama_checks {
        check.print();
    }
    checks.extend(ollama_checks);
    println!();

    println!("{}", style("Files").bold());
    let file_checks = vec![
        check_index(&settings.index_path()),
        check_memory(&settings.memory_path()),
        check_config_file(config_path),
    ];
    for check in &file_checks {
        check.print();
    }
    checks.extend(file_checks);
    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Appster.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Appster is ready to use.");
    }

    Ok(())
}

/// Reachability of the server and presence of both configured models.
async fn check_ollama(settings: &Settings) -> Vec<CheckResult> {
    let base_url = &settings.ollama.base_url;
    let hint = "Start it with: ollama serve (or set ollama.base_url)";

    let tags = match fetch_tags(base_url).await {
        Ok(tags) => tags,
        Err(e) => return vec![CheckResult::error("Server", &format!("{} ({})", base_url, e), hint)],
    };

    let mut results = vec![CheckResult::ok(
        "Server",
        &format!("{} ({} models)", base_url, tags.models.len()),
    )];
    for (label, model) in [
        ("Embedding model", &settings.embedding.model),
        ("Generation model", &settings.generation.model),
    ] {
        results.push(check_model(label, model, &tags));
    }
    results
}

async fn fetch_tags(base_url: &str) -> anyhow::Result<TagsResponse> {
    let client = ollama::create_client_with_timeout(Duration::from_secs(5))?;
    let response = client
        .get(ollama::endpoint(base_url, "/api/tags"))
        .send()
        .await?
        .error_for_status()?;
    Ok(response.json().await?)
}

/// Ollama lists pulled models with a tag suffix, e.g. `llama3:latest`.
fn check_model(label: &str, model: &str, tags: &TagsResponse) -> CheckResult {
    let pulled = tags.models.iter().any(|m| {
        m.name == model || m.name.split_once(':').is_some_and(|(base, _)| base == model)
    });

    if pulled {
        CheckResult::ok(label, model)
    } else {
        CheckResult::error(
            label,
            &format!("{} not pulled", model),
            &format!("Pull it with: ollama pull {}", model),
        )
    }
}

fn check_index(path: &Path) -> CheckResult {
    if !path.exists() {
        return CheckResult::error(
            "Vector index",
            &format!("{} (missing)", path.display()),
            "Build it with: appster index --dir <transcripts>",
        );
    }

    match load_index(path) {
        Ok(index) => CheckResult::ok(
            "Vector index",
            &format!(
                "{} ({} chunks, dimension {})",
                path.display(),
                index.len(),
                index.dimension()
            ),
        ),
        Err(e) => CheckResult::error("Vector index", &e.to_string(), "Rebuild it with: appster index"),
    }
}

/// The memory file must be creatable and writable; its absence is fine.
fn check_memory(path: &Path) -> CheckResult {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    if !dir.exists() {
        return CheckResult::warning(
            "Memory file",
            &format!("{} (directory will be created)", path.display()),
            "Run: appster init",
        );
    }

    match tempfile::NamedTempFile::new_in(dir) {
        Ok(_) => {
            let state = if path.exists() { "writable" } else { "new session" };
            CheckResult::ok("Memory file", &format!("{} ({})", path.display(), state))
        }
        Err(e) => CheckResult::error(
            "Memory file",
            &format!("{} not writable: {}", dir.display(), e),
            "Set memory.path to a writable location",
        ),
    }
}

fn check_config_file(config_path: Option<&Path>) -> CheckResult {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Settings::default_config_path);
    if config_path.exists() {
        CheckResult::ok("Config file", &config_path.display().to_string())
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: appster init (or appster config edit)",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tags(names: &[&str]) -> TagsResponse {
        TagsResponse {
            models: names
                .iter()
                .map(|n| ModelTag {
                    name: n.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_check_model_matches_tag_suffix() {
        let t = tags(&["llama3:latest", "bge-m3:567m"]);
        assert_eq!(check_model("g", "llama3", &t).status, CheckStatus::Ok);
        assert_eq!(check_model("e", "bge-m3", &t).status, CheckStatus::Ok);
        assert_eq!(check_model("g", "llama3:latest", &t).status, CheckStatus::Ok);
        assert_eq!(check_model("g", "mistral", &t).status, CheckStatus::Error);
    }

    #[test]
    fn test_check_index_and_memory() {
        let dir = tempfile::tempdir().unwrap();

        let missing = check_index(&dir.path().join("embeddings.db"));
        assert_eq!(missing.status, CheckStatus::Error);

        let memory = check_memory(&dir.path().join("chat_history.txt"));
        assert_eq!(memory.status, CheckStatus::Ok);

        let nested = check_memory(&dir.path().join("nope").join("chat_history.txt"));
        assert_eq!(nested.status, CheckStatus::Warning);
    }

    #[test]
    fn test_check_config_file_uses_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let missing = check_config_file(Some(&path));
        assert_eq!(missing.status, CheckStatus::Warning);

        std::fs::write(&path, "").unwrap();
        let found = check_config_file(Some(&path));
        assert_eq!(found.status, CheckStatus::Ok);
        assert_eq!(found.message, path.display().to_string());
    }

    #[tokio::test]
    async fn test_check_ollama_reports_missing_model() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{"name": "bge-m3:latest"}]
            })))
            .mount(&server)
            .await;

        let mut settings = Settings::default();
        settings.ollama.base_url = server.uri();

        let results = check_ollama(&settings).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].status, CheckStatus::Ok);
        assert_eq!(results[1].status, CheckStatus::Ok);
        assert_eq!(results[2].status, CheckStatus::Error);
    }
}
