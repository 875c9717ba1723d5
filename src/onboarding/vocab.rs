use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Android,
    Ios,
    Backend,
    Frontend,
    Design,
    Marketing,
}

impl Team {
    /// Enumeration order; extraction tries terms in this order.
    pub const ALL: [Team; 6] = [
        Team::Android,
        Team::Ios,
        Team::Backend,
        Team::Frontend,
        Team::Design,
        Team::Marketing,
    ];

    /// Repository suffixes tried after the bare project name when no
    /// engineering team is known.
    pub const SUFFIX_ORDER: [Team; 4] = [Team::Backend, Team::Frontend, Team::Ios, Team::Android];

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Android => "android",
            Team::Ios => "ios",
            Team::Backend => "backend",
            Team::Frontend => "frontend",
            Team::Design => "design",
            Team::Marketing => "marketing",
        }
    }

    /// Human-facing name, e.g. in "You're onboarding to Resell (iOS)".
    pub fn display_name(&self) -> &'static str {
        match self {
            Team::Android => "Android",
            Team::Ios => "iOS",
            Team::Backend => "Backend",
            Team::Frontend => "Frontend",
            Team::Design => "Design",
            Team::Marketing => "Marketing",
        }
    }

    pub fn is_engineering(&self) -> bool {
        matches!(
            self,
            Team::Android | Team::Ios | Team::Backend | Team::Frontend
        )
    }

    /// Substrings that select this team, checked in order.
    pub(crate) fn match_terms(&self) -> &'static [&'static str] {
        match self {
            Team::Android => &["android"],
            Team::Ios => &["ios"],
            Team::Backend => &["backend", "back end", "back-end"],
            Team::Frontend => &["frontend", "front end", "front-end"],
            Team::Design => &["design"],
            Team::Marketing => &["marketing"],
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Team {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        Team::ALL
            .into_iter()
            .find(|t| t.match_terms().contains(&lower.as_str()))
            .ok_or_else(|| anyhow::anyhow!("Unknown team: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Experience {
    Beginner,
    Intermediate,
    Experienced,
}

impl Experience {
    pub const ALL: [Experience; 3] = [
        Experience::Beginner,
        Experience::Intermediate,
        Experience::Experienced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Experience::Beginner => "beginner",
            Experience::Intermediate => "intermediate",
            Experience::Experienced => "experienced",
        }
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Experience {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "new" => Ok(Experience::Beginner),
            "intermediate" | "returning" => Ok(Experience::Intermediate),
            "experienced" | "advanced" | "veteran" => Ok(Experience::Experienced),
            _ => bail!("Unknown experience level: {}", s),
        }
    }
}

/// Ordered phrase table for experience extraction. Multi-word phrases come
/// first so "some experience" is not read as "experienced" or similar.
pub(crate) const EXPERIENCE_PHRASES: &[(&str, Experience)] = &[
    ("no experience", Experience::Beginner),
    ("first time", Experience::Beginner),
    ("just starting", Experience::Beginner),
    ("never done", Experience::Beginner),
    ("some experience", Experience::Intermediate),
    ("a little experience", Experience::Intermediate),
    ("a bit of experience", Experience::Intermediate),
    ("lots of experience", Experience::Experienced),
    ("a lot of experience", Experience::Experienced),
    ("years of experience", Experience::Experienced),
    ("beginner", Experience::Beginner),
    ("newbie", Experience::Beginner),
    ("novice", Experience::Beginner),
    ("new member", Experience::Beginner),
    ("intermediate", Experience::Intermediate),
    ("returning", Experience::Intermediate),
    ("familiar", Experience::Intermediate),
    ("experienced", Experience::Experienced),
    ("veteran", Experience::Experienced),
    ("advanced", Experience::Experienced),
    ("expert", Experience::Experienced),
    ("senior", Experience::Experienced),
];
