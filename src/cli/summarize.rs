use anyhow::Result;
use std::str::FromStr;
use tracing::info;

use crate::config::Config;
use crate::onboarding::{Experience, Team};

pub async fn run(
    config_path: Option<String>,
    app: String,
    team: String,
    experience: String,
    dry_run: bool,
    no_cache: bool,
) -> Result<()> {
    let config = Config::load_with_path(config_path)?;
    let team = Team::from_str(&team)?;
    let experience = Experience::from_str(&experience)?;

    let (summarizer, _) = super::build_summarizer(&config, dry_run, no_cache)?;
    let summary = summarizer.summarize(&app, team, experience).await?;

    info!("Guide built from {}", summary.repo);
    println!("{}", summary.text);
    Ok(())
}
