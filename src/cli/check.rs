use anyhow::Result;
use std::env;

use crate::config::{Config, Provider};
use crate::llm::factory;
use crate::readme::GitHubClient;
use crate::util::preview;

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

/// Verify configuration and credentials. With `live`, also make one
/// authenticated GitHub call and one tiny generation request.
pub async fn run(config_path: Option<String>, live: bool) -> Result<()> {
    let mut results = CheckResult::new();

    let config = match Config::load_with_path(config_path.clone()) {
        Ok(config) => {
            let source = config_path.as_deref().unwrap_or("default search path");
            results.pass(format!("Config loaded from {}", source));
            config
        }
        Err(e) => {
            // Reported through print_results, not propagated.
            results.error(format!("Failed to load config: {:#}", e));
            print_results(&results);
            return Ok(());
        }
    };

    results.pass(format!(
        "Organization: {} (github owner: {})",
        config.organization.name, config.organization.owner
    ));
    if config.organization.projects.is_empty() {
        results.error("No projects configured; app names can never be recognized");
    } else {
        results.pass(format!(
            "{} projects: {}",
            config.organization.projects.len(),
            config.organization.projects.join(", ")
        ));
    }

    results.pass(format!(
        "LLM provider: {} (model: {})",
        config.llm.provider, config.llm.model
    ));
    check_env_var(
        "LLM",
        config.llm.api_key_env.as_deref(),
        config.llm.provider == Provider::OpenAICompatible,
        &mut results,
    );
    if config.llm.provider == Provider::OpenAICompatible && config.llm.base_url.is_none() {
        results.warn(
            "openai-compatible provider without base_url, will use http://localhost:11434/v1",
        );
    }

    check_env_var(
        "GitHub",
        Some(config.github.token_env.as_str()),
        false,
        &mut results,
    );

    if config.cache.disabled {
        results.warn("Caches disabled; every onboarding regenerates its guide");
    } else {
        results.pass(format!(
            "Cache directory: {}",
            config.cache.resolve_dir().display()
        ));
    }

    if live {
        check_github(&config, &mut results).await;
        check_llm(&config, &mut results).await;
    }

    print_results(&results);

    if !results.errors.is_empty() {
        anyhow::bail!("{} check(s) failed", results.errors.len());
    }
    Ok(())
}

fn check_env_var(label: &str, var: Option<&str>, optional: bool, results: &mut CheckResult) {
    let Some(var) = var else {
        results.pass(format!("{}: no credential configured", label));
        return;
    };
    if var.eq_ignore_ascii_case("none") {
        results.pass(format!("{}: no credential needed", label));
        return;
    }
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => results.pass(format!("{}: {} is set", label, var)),
        Ok(_) if optional => results.warn(format!("{}: {} is set but empty", label, var)),
        Ok(_) => results.error(format!("{}: {} is set but empty", label, var)),
        Err(_) if optional => results.warn(format!("{}: {} is not set", label, var)),
        Err(_) => results.error(format!("{}: {} is not set", label, var)),
    }
}

async fn check_github(config: &Config, results: &mut CheckResult) {
    let client = match GitHubClient::from_config(&config.github, &config.organization.owner) {
        Ok(client) => client,
        Err(e) => {
            results.error(format!("GitHub client: {:#}", e));
            return;
        }
    };
    match client.whoami().await {
        Ok(login) => results.pass(format!("GitHub authenticated as {}", login)),
        Err(e) => results.error(format!("GitHub: {:#}", e)),
    }
}

async fn check_llm(config: &Config, results: &mut CheckResult) {
    let client = match factory::create_client(&config.llm, false) {
        Ok(client) => client,
        Err(e) => {
            results.error(format!("LLM client: {:#}", e));
            return;
        }
    };
    match client.complete("Say hi in one short sentence.").await {
        Ok(reply) => results.pass(format!("LLM replied: {}", preview(reply.trim(), 60))),
        Err(e) => results.error(format!("LLM: {:#}", e)),
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
