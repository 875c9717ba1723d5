use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::GitHubConfig;
use crate::util::SecretString;

/// Where README text comes from. `repo` is the bare repository name; the
/// owner is a property of the source.
#[async_trait]
pub trait ReadmeSource: Send + Sync {
    async fn get_readme(&self, repo: &str) -> Result<String>;
}

pub struct GitHubClient {
    token: SecretString,
    owner: String,
    api_base: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: String,
    #[serde(default)]
    encoding: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    login: String,
}

impl GitHubClient {
    pub fn new(
        token: SecretString,
        owner: impl Into<String>,
        api_base: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        Ok(Self {
            token,
            owner: owner.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .user_agent(concat!("onboardbot/", env!("CARGO_PKG_VERSION")))
                .build()
                .context("failed to build HTTP client")?,
        })
    }

    pub fn from_config(config: &GitHubConfig, owner: &str) -> Result<Self> {
        Self::new(
            config.get_token()?,
            owner,
            config.api_base.clone(),
            config.timeout_secs,
        )
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .get(url)
            .header("accept", "application/vnd.github+json")
            .header("x-github-api-version", "2022-11-28");
        if !self.token.is_empty() {
            req = req.header("authorization", format!("Bearer {}", self.token.expose()));
        }
        req
    }

    /// Login of the account the token belongs to.
    pub async fn whoami(&self) -> Result<String> {
        let response = self
            .get(&format!("{}/user", self.api_base))
            .send()
            .await
            .context("Failed to reach GitHub")?;
        if !response.status().is_success() {
            bail!("GitHub authentication failed: {}", response.status());
        }
        let user: UserResponse = response
            .json()
            .await
            .context("Failed to parse GitHub user response")?;
        Ok(user.login)
    }
}

#[async_trait]
impl ReadmeSource for GitHubClient {
    async fn get_readme(&self, repo: &str) -> Result<String> {
        let url = format!("{}/repos/{}/{}/readme", self.api_base, self.owner, repo);
        debug!("Fetching README for {}/{}", self.owner, repo);

        let response = self
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to request README for {}/{}", self.owner, repo))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            bail!(
                "GitHub API error {} for {}/{}: {}",
                status,
                self.owner,
                repo,
                error_text
            );
        }

        let body: ContentResponse = response
            .json()
            .await
            .context("Failed to parse GitHub contents response")?;
        decode_content(&body.content, &body.encoding)
    }
}

/// Decode a contents-API payload. GitHub wraps base64 at 60 columns.
fn decode_content(content: &str, encoding: &str) -> Result<String> {
    if !encoding.is_empty() && encoding != "base64" {
        return Ok(content.to_string());
    }
    let cleaned: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(cleaned)
        .context("README content is not valid base64")?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
