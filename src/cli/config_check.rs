use anyhow::Result;
use std::env;

use crate::config::{Config, Provider};

struct CheckResult {
    passed: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl CheckResult {
    fn new() -> Self {
        Self {
            passed: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn pass(&mut self, msg: impl Into<String>) {
        self.passed.push(msg.into());
    }

    fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }
}

pub fn run(config_path: Option<String>) -> Result<()> {
    let mut results = CheckResult::new();

    // 1. Try to load config
    let config = match Config::load_with_path(config_path.clone()) {
        Ok(config) => {
            let source = config_path.as_deref().unwrap_or("default search path");
            results.pass(format!("Config loaded from {}", source));
            config
        }
        Err(e) => {
            // This is a diagnostic command: a config load failure is
            // reported via print_results(), not propagated as an Err
            // (which would double-print).
            results.error(format!("Failed to load config: {}", e));
            print_results(&results);
            return Ok(());
        }
    };

    // 2. Provider and model (enum-validated at load time)
    results.pass(format!(
        "Provider: {} (model: {})",
        config.llm.provider, config.llm.model
    ));

    // 3. Credential
    check_api_key(&config, &mut results);

    // 4. Provider-specific endpoint settings
    match config.llm.provider {
        Provider::OpenaiCompatible => {
            if config.llm.base_url.is_some() {
                results.pass("Base URL configured");
            } else {
                results.warn(
                    "openai-compatible provider without base_url — will use the default \
                     Hugging Face router",
                );
            }
        }
        Provider::AzureOpenai => {
            if config.llm.base_url.is_none() {
                results.error("azure-openai provider requires base_url (the Azure endpoint)");
            }
            if config.llm.deployment.is_none() {
                results.error("azure-openai provider requires a deployment name");
            }
            if config.llm.base_url.is_some() && config.llm.deployment.is_some() {
                results.pass(format!(
                    "Azure endpoint and deployment configured ({})",
                    config.llm.deployment.as_deref().unwrap_or_default()
                ));
            }
        }
        Provider::Ollama => {
            let endpoint = config
                .llm
                .base_url
                .as_deref()
                .unwrap_or("http://localhost:11434");
            results.pass(format!("Ollama endpoint: {}", endpoint));
        }
    }

    // 5. Scan settings
    results.pass(format!(
        "Scan: extensions=[{}], max_chars={}, max_attempts={}",
        config.scan.extensions.join(", "),
        config.scan.max_chars,
        config.scan.max_attempts
    ));
    if config.scan.extensions.is_empty() {
        results.warn("Extension allow-list is empty — no files will be annotated");
    }
    if config.scan.max_attempts == 0 {
        results.warn("max_attempts is 0 — it is clamped to 1 at runtime");
    }
    if config.scan.max_chars < 200 {
        results.warn(format!(
            "max_chars {} is very small — summaries will see little context",
            config.scan.max_chars
        ));
    }

    print_results(&results);

    if !results.errors.is_empty() {
        anyhow::bail!("{} config error(s) found", results.errors.len());
    }

    Ok(())
}

fn check_api_key(config: &Config, results: &mut CheckResult) {
    if config.llm.provider == Provider::Ollama {
        results.pass("No credential needed for ollama");
        return;
    }
    match &config.llm.api_key_env {
        Some(env_var) if env_var.to_lowercase() == "none" => {
            results.warn("api_key_env is \"none\" — every annotation will use the local fallback");
        }
        Some(env_var) => match env::var(env_var) {
            Ok(v) if !v.trim().is_empty() => {
                results.pass(format!("Credential: {} is set", env_var));
            }
            Ok(_) => {
                results.warn(format!(
                    "Credential: {} is set but empty — every annotation will use the local fallback",
                    env_var
                ));
            }
            Err(_) => {
                results.warn(format!(
                    "Credential: {} is not set — every annotation will use the local fallback",
                    env_var
                ));
            }
        },
        None => {
            results.warn(
                "No api_key_env configured — every annotation will use the local fallback",
            );
        }
    }
}

fn print_results(results: &CheckResult) {
    println!();
    for msg in &results.passed {
        println!("  \u{2713} {}", msg);
    }
    for msg in &results.warnings {
        println!("  ! {}", msg);
    }
    for msg in &results.errors {
        println!("  \u{2717} {}", msg);
    }
    println!();
    println!(
        "{} passed, {} warnings, {} errors",
        results.passed.len(),
        results.warnings.len(),
        results.errors.len()
    );
}
