use anyhow::{bail, Result};
use std::str::FromStr;
use std::sync::Arc;

use crate::config::Config;
use crate::onboarding::Team;
use crate::readme::{ReadmeResolver, ResolveError};

pub async fn run(
    config_path: Option<String>,
    app: String,
    team: Option<String>,
    no_cache: bool,
) -> Result<()> {
    let config = Config::load_with_path(config_path)?;
    let team = team.as_deref().map(Team::from_str).transpose()?;

    let (repo_map, _) = super::open_stores(&config, no_cache)?;
    let github = super::build_github(&config, false)?;
    let owner = github.owner().to_string();
    let resolver = ReadmeResolver::new(Arc::new(github), repo_map);

    match resolver.resolve(&app, team).await {
        Ok(resolved) => {
            println!("Resolved {}/{}\n", owner, resolved.repo);
            println!("{}", resolved.content);
            Ok(())
        }
        Err(ResolveError::NotFound { attempted, .. }) => {
            bail!(
                "No README found for {}. Tried: {}",
                app,
                attempted
                    .iter()
                    .map(|r| format!("{}/{}", owner, r))
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        }
    }
}
