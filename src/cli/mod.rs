pub mod chat;
pub mod check;
pub mod readme;
pub mod summarize;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::cache::{JsonFileStore, KeyValueStore, MemoryStore};
use crate::config::Config;
use crate::llm::{factory, LlmClient};
use crate::onboarding::followup::FollowupBridge;
use crate::onboarding::{InMemorySessionStore, OnboardingBot, Summarizer};
use crate::readme::{GitHubClient, ReadmeResolver};
use crate::util::secret_from_env;

pub const REPO_MAP_FILE: &str = "repo_map.json";
pub const SUMMARIES_FILE: &str = "summaries.json";

/// Open the repo-map and summary stores (file-backed unless disabled).
pub fn open_stores(
    config: &Config,
    no_cache: bool,
) -> Result<(Arc<dyn KeyValueStore>, Arc<dyn KeyValueStore>)> {
    if no_cache || config.cache.disabled {
        info!("Caches are in-memory only");
        return Ok((Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new())));
    }
    let dir = config.cache.resolve_dir();
    let repo_map = JsonFileStore::open(dir.join(REPO_MAP_FILE))
        .context("failed to open repository map cache")?;
    let summaries = JsonFileStore::open(dir.join(SUMMARIES_FILE))
        .context("failed to open summary cache")?;
    info!(
        "Caches: {} and {}",
        repo_map.path().display(),
        summaries.path().display()
    );
    Ok((Arc::new(repo_map), Arc::new(summaries)))
}

/// GitHub client for the configured organization. Dry runs tolerate a
/// missing token (unauthenticated, rate-limited access).
pub fn build_github(config: &Config, dry_run: bool) -> Result<GitHubClient> {
    if !dry_run {
        return GitHubClient::from_config(&config.github, &config.organization.owner);
    }
    GitHubClient::new(
        secret_from_env(Some(&config.github.token_env), false)?,
        config.organization.owner.clone(),
        config.github.api_base.clone(),
        config.github.timeout_secs,
    )
}

pub fn build_summarizer(
    config: &Config,
    dry_run: bool,
    no_cache: bool,
) -> Result<(Summarizer, Arc<dyn LlmClient>)> {
    let (repo_map, summaries) = open_stores(config, no_cache)?;
    let github = build_github(config, dry_run)?;
    let resolver = ReadmeResolver::new(Arc::new(github), repo_map);
    let llm: Arc<dyn LlmClient> = Arc::from(factory::create_client(&config.llm, dry_run)?);
    let summarizer = Summarizer::new(
        resolver,
        llm.clone(),
        summaries,
        config.organization.name.clone(),
    );
    Ok((summarizer, llm))
}

pub fn build_bot(config: &Config, dry_run: bool, no_cache: bool) -> Result<OnboardingBot> {
    let (summarizer, llm) = build_summarizer(config, dry_run, no_cache)?;
    let followup = FollowupBridge::new(llm, config.organization.name.clone());
    Ok(OnboardingBot::new(
        Arc::new(InMemorySessionStore::new()),
        summarizer,
        followup,
        config.organization.projects.clone(),
        config.organization.name.clone(),
    ))
}
