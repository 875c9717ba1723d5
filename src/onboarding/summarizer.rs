use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::vocab::{Experience, Team};
use crate::cache::KeyValueStore;
use crate::llm::LlmClient;
use crate::postprocess::postprocess;
use crate::prompts::compose_summary_prompt;
use crate::readme::{ReadmeResolver, ResolveError};
use crate::util::cache_key;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Slack-formatted guide
    pub text: String,
    pub readme: String,
    pub repo: String,
}

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error(transparent)]
    NotFound(#[from] ResolveError),
    /// The README was found but the generative call failed.
    #[error("{error:#}")]
    Generation { readme: String, error: anyhow::Error },
}

/// README resolution -> prompt -> generation -> Slack formatting, memoized
/// per (app, team, experience).
pub struct Summarizer {
    resolver: ReadmeResolver,
    llm: Arc<dyn LlmClient>,
    summaries: Arc<dyn KeyValueStore>,
    org_name: String,
}

impl Summarizer {
    pub fn new(
        resolver: ReadmeResolver,
        llm: Arc<dyn LlmClient>,
        summaries: Arc<dyn KeyValueStore>,
        org_name: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            llm,
            summaries,
            org_name: org_name.into(),
        }
    }

    pub fn summary_key(app: &str, team: Team, experience: Experience) -> String {
        cache_key(&[&app.to_lowercase(), team.as_str(), experience.as_str()])
    }

    pub async fn summarize(
        &self,
        app: &str,
        team: Team,
        experience: Experience,
    ) -> Result<Summary, SummaryError> {
        let resolved = self.resolver.resolve(app, Some(team)).await?;

        let key = Self::summary_key(app, team, experience);
        if let Some(text) = self.summaries.get(&key) {
            debug!("Summary cache hit for {}", key);
            return Ok(Summary {
                text,
                readme: resolved.content,
                repo: resolved.repo,
            });
        }

        info!(
            "Generating {} guide for {} from {}",
            experience, key, resolved.repo
        );
        let prompt = compose_summary_prompt(
            &self.org_name,
            app,
            team,
            experience,
            &resolved.content,
        );
        let raw = match self.llm.complete(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Generation failed for {}: {:#}", key, e);
                return Err(SummaryError::Generation {
                    readme: resolved.content,
                    error: e,
                });
            }
        };

        let text = postprocess(&raw);
        if let Err(e) = self.summaries.set(&key, &text) {
            warn!("Failed to cache summary {}: {:#}", key, e);
        }

        Ok(Summary {
            text,
            readme: resolved.content,
            repo: resolved.repo,
        })
    }
}
