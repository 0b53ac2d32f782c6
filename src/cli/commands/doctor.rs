//! Doctor command - verify configuration and requirements.

use crate::cli::preflight::check_writable_dir;
use crate::cli::Output;
use crate::config::{LlmSettings, Settings};
use crate::embedding::{Embedder, LocalEmbedder};
use console::style;

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

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Ekko Doctor");
    println!();
    println!("Checking configuration and requirements...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let api_check = check_api_key(&settings.llm);
    api_check.print();
    checks.push(api_check);

    println!();

    println!("{}", style("Directories").bold());
    let dir_checks = vec![
        check_dir("Temp directory", settings.temp_dir().as_path()),
        check_dir("Output directory", settings.output_dir().as_path()),
    ];
    for check in &dir_checks {
        check.print();
    }
    checks.extend(dir_checks);

    println!();

    println!("{}", style("Embedding Model").bold());
    let model_check = check_embedding_model(settings).await;
    model_check.print();
    checks.push(model_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Ekko.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Ekko is ready to use.");
    }

    Ok(())
}

/// Check that the API key environment variable is set.
fn check_api_key(llm: &LlmSettings) -> CheckResult {
    let name = llm.api_key_env.as_str();
    let hint = format!("Set with: export {}='...' (or add it to .env)", name);

    match llm.api_key() {
        Ok(key) => CheckResult::ok(name, &format!("configured ({})", mask_key(&key))),
        Err(_) if std::env::var(name).is_ok() => CheckResult::error(name, "empty", &hint),
        Err(_) => CheckResult::error(name, "not set", &hint),
    }
}

/// Show only the ends of a secret.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn check_dir(name: &str, dir: &std::path::Path) -> CheckResult {
    match check_writable_dir(dir) {
        Ok(()) => CheckResult::ok(name, &dir.display().to_string()),
        Err(e) => CheckResult::error(
            name,
            &e.to_string(),
            "Point general.temp_dir / general.output_dir at a writable location",
        ),
    }
}

async fn check_embedding_model(settings: &Settings) -> CheckResult {
    match LocalEmbedder::load(&settings.embedding, settings.embedding_cache_dir()).await {
        Ok(embedder) => match embedder.embed("ekko doctor").await {
            Ok(vector) => CheckResult::ok(
                embedder.model_name(),
                &format!("loaded ({} dimensions)", vector.len()),
            ),
            Err(e) => CheckResult::error(
                embedder.model_name(),
                &e.to_string(),
                "Delete the model cache and retry",
            ),
        },
        Err(e) => CheckResult::error(
            &settings.embedding.model,
            &e.to_string(),
            "Check embedding.model and network access for the first download",
        ),
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: ekko config init",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("gsk_abcdefghijklmnop1234"), "gsk_...1234");
        assert_eq!(mask_key("short"), "*****");
    }

    #[test]
    fn test_missing_key_is_error() {
        let llm = LlmSettings {
            api_key_env: "EKKO_DOCTOR_KEY_NEVER_SET".to_string(),
            ..Default::default()
        };
        assert_eq!(check_api_key(&llm).status, CheckStatus::Error);
    }

    #[test]
    fn test_writable_dir_ok() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(check_dir("Temp", dir.path()).status, CheckStatus::Ok);
    }
}
