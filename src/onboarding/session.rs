use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::vocab::{Experience, Team};

/// Position in the onboarding flow. Only moves forward; a restart resets to
/// `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    None,
    AskApp,
    AskTeam,
    AskExperience,
    Onboarded,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::None => "none",
            Phase::AskApp => "ask_app",
            Phase::AskTeam => "ask_team",
            Phase::AskExperience => "ask_experience",
            Phase::Onboarded => "onboarded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub phase: Phase,
    pub app: Option<String>,
    pub team: Option<Team>,
    pub experience: Option<Experience>,
    /// README text the summary was built from; set only once onboarded.
    pub readme: Option<String>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            phase: Phase::None,
            app: None,
            team: None,
            experience: None,
            readme: None,
        }
    }

    /// Clear all slots for a fresh onboarding cycle.
    pub fn reset(&mut self) {
        *self = Self::new(std::mem::take(&mut self.user_id));
    }

    /// The earliest phase whose slot is still missing.
    pub fn next_unmet(&self) -> Phase {
        if self.app.is_none() {
            Phase::AskApp
        } else if self.team.is_none() {
            Phase::AskTeam
        } else if self.experience.is_none() {
            Phase::AskExperience
        } else {
            Phase::Onboarded
        }
    }
}

/// Per-user session persistence. Swappable for a durable backend.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stored session for `user_id`, or a fresh one if the user is unseen.
    async fn load(&self, user_id: &str) -> Result<Session>;
    async fn save(&self, session: &Session) -> Result<()>;
}

/// Process-lifetime session map. Sessions are never evicted.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, user_id: &str) -> Result<Session> {
        Ok(self
            .sessions
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| Session::new(user_id)))
    }

    async fn save(&self, session: &Session) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.user_id.clone(), session.clone());
        Ok(())
    }
}
