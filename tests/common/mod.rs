//! Shared fixtures: an in-memory README source and a scripted LLM.
#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use onboardbot::cache::MemoryStore;
use onboardbot::config::OrganizationConfig;
use onboardbot::llm::LlmClient;
use onboardbot::onboarding::followup::FollowupBridge;
use onboardbot::onboarding::{InMemorySessionStore, OnboardingBot, Summarizer};
use onboardbot::readme::{ReadmeResolver, ReadmeSource};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const ORG: &str = "Cornell AppDev";

/// Serves READMEs for a fixed set of repositories and records every lookup.
#[derive(Default)]
pub struct FixtureSource {
    readmes: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl FixtureSource {
    pub fn with(repos: &[(&str, &str)]) -> Self {
        Self {
            readmes: repos
                .iter()
                .map(|(r, c)| (r.to_string(), c.to_string()))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReadmeSource for FixtureSource {
    async fn get_readme(&self, repo: &str) -> Result<String> {
        self.calls.lock().unwrap().push(repo.to_string());
        match self.readmes.get(repo) {
            Some(content) => Ok(content.clone()),
            None => bail!("404 Not Found: {}", repo),
        }
    }
}

/// Returns a fixed reply (or fails) and records the prompts it saw.
pub struct ScriptedLlm {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => bail!("Gemini API error 503: model overloaded"),
        }
    }
}

pub fn projects() -> Vec<String> {
    OrganizationConfig::default().projects
}

pub struct Harness {
    pub bot: OnboardingBot,
    pub sessions: Arc<InMemorySessionStore>,
    pub source: Arc<FixtureSource>,
    pub llm: Arc<ScriptedLlm>,
    pub repo_map: Arc<MemoryStore>,
    pub summaries: Arc<MemoryStore>,
}

/// Bot over any README source, with in-memory caches.
pub fn bot_with(
    source: Arc<dyn ReadmeSource>,
    llm: Arc<dyn LlmClient>,
    sessions: Arc<InMemorySessionStore>,
    repo_map: Arc<MemoryStore>,
    summaries: Arc<MemoryStore>,
) -> OnboardingBot {
    let resolver = ReadmeResolver::new(source, repo_map);
    let summarizer = Summarizer::new(resolver, llm.clone(), summaries, ORG);
    let followup = FollowupBridge::new(llm, ORG);
    OnboardingBot::new(sessions, summarizer, followup, projects(), ORG)
}

pub fn harness(source: FixtureSource, llm: ScriptedLlm) -> Harness {
    let sessions = Arc::new(InMemorySessionStore::new());
    let source = Arc::new(source);
    let llm = Arc::new(llm);
    let repo_map = Arc::new(MemoryStore::new());
    let summaries = Arc::new(MemoryStore::new());

    let bot = bot_with(
        source.clone(),
        llm.clone(),
        sessions.clone(),
        repo_map.clone(),
        summaries.clone(),
    );

    Harness {
        bot,
        sessions,
        source,
        llm,
        repo_map,
        summaries,
    }
}
