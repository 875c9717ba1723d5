use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::github::ReadmeSource;
use crate::cache::KeyValueStore;
use crate::onboarding::vocab::Team;
use crate::util::cache_key;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReadme {
    pub content: String,
    /// Repository that produced the README
    pub repo: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no README found for {app}; tried {}", .attempted.join(", "))]
    NotFound { app: String, attempted: Vec<String> },
}

/// Maps a project (and optional team) to the repository that actually has a
/// README, by trying naming conventions in a fixed order.
pub struct ReadmeResolver {
    source: Arc<dyn ReadmeSource>,
    repo_map: Arc<dyn KeyValueStore>,
}

impl ReadmeResolver {
    pub fn new(source: Arc<dyn ReadmeSource>, repo_map: Arc<dyn KeyValueStore>) -> Self {
        Self { source, repo_map }
    }

    /// Candidate repository names in the order they are tried.
    ///
    /// An engineering team tries `{app}-{team}` then `{app}`. Anything else
    /// tries `{app}` then each engineering suffix.
    pub fn candidates(app: &str, team: Option<Team>) -> Vec<String> {
        let app = app.to_lowercase();
        match team {
            Some(team) if team.is_engineering() => vec![format!("{}-{}", app, team), app],
            _ => std::iter::once(app.clone())
                .chain(
                    Team::SUFFIX_ORDER
                        .iter()
                        .map(|suffix| format!("{}-{}", app, suffix)),
                )
                .collect(),
        }
    }

    pub fn map_key(app: &str, team: Option<Team>) -> String {
        cache_key(&[&app.to_lowercase(), team.map(|t| t.as_str()).unwrap_or("")])
    }

    /// Try the recorded repository first, then the naming candidates in
    /// order. A recorded repository that fails counts as attempted and is
    /// not retried during the candidate walk.
    pub async fn resolve(
        &self,
        app: &str,
        team: Option<Team>,
    ) -> Result<ResolvedReadme, ResolveError> {
        let key = Self::map_key(app, team);
        let mut attempted = Vec::new();

        if let Some(cached) = self.repo_map.get(&key) {
            debug!("Repo map hit: {} -> {}", key, cached);
            match self.source.get_readme(&cached).await {
                Ok(content) => {
                    return Ok(ResolvedReadme {
                        content,
                        repo: cached,
                    })
                }
                Err(e) => {
                    warn!("Cached repo {} failed, re-resolving: {:#}", cached, e);
                    attempted.push(cached);
                }
            }
        }

        for candidate in Self::candidates(app, team) {
            if attempted.contains(&candidate) {
                continue;
            }
            match self.source.get_readme(&candidate).await {
                Ok(content) => {
                    info!("Resolved {} to repository {}", key, candidate);
                    if let Err(e) = self.repo_map.set(&key, &candidate) {
                        warn!("Failed to record repo mapping {}: {:#}", key, e);
                    }
                    return Ok(ResolvedReadme {
                        content,
                        repo: candidate,
                    });
                }
                Err(e) => {
                    debug!("No README in {}: {:#}", candidate, e);
                    attempted.push(candidate);
                }
            }
        }

        warn!("README resolution exhausted for {}: {:?}", key, attempted);
        Err(ResolveError::NotFound {
            app: app.to_string(),
            attempted,
        })
    }
}
