//! Slot extraction from free-text messages.
//!
//! Every extractor is an ordered-candidate matcher: lowercase the message,
//! walk the vocabulary in enumeration order, return the first term found as a
//! substring. There is no word-boundary check, so a term inside a longer word
//! still matches ("curious" contains "ios").

use super::vocab::{Experience, Team, EXPERIENCE_PHRASES};

/// Everything extractable from one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub app: Option<String>,
    pub team: Option<Team>,
    pub experience: Option<Experience>,
}

impl Extracted {
    pub fn from_message(text: &str, projects: &[String]) -> Self {
        Self {
            app: extract_app(text, projects),
            team: extract_team(text),
            experience: extract_experience(text),
        }
    }
}

fn first_match<'a, T: Copy>(
    text: &str,
    candidates: impl IntoIterator<Item = (&'a str, T)>,
) -> Option<T> {
    let lower = text.to_lowercase();
    candidates
        .into_iter()
        .find(|(term, _)| !term.is_empty() && lower.contains(&term.to_lowercase()))
        .map(|(_, value)| value)
}

/// Project name from `projects` (returned as listed in the vocabulary).
pub fn extract_app(text: &str, projects: &[String]) -> Option<String> {
    first_match(
        text,
        projects.iter().enumerate().map(|(i, p)| (p.as_str(), i)),
    )
    .map(|i| projects[i].clone())
}

pub fn extract_team(text: &str) -> Option<Team> {
    first_match(
        text,
        Team::ALL
            .iter()
            .flat_map(|team| team.match_terms().iter().map(move |term| (*term, *team))),
    )
}

pub fn extract_experience(text: &str) -> Option<Experience> {
    first_match(text, EXPERIENCE_PHRASES.iter().map(|(p, l)| (*p, *l)))
}
