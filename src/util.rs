//! Small helpers shared across the bot

use std::env;
use std::fmt;

use anyhow::{anyhow, Result};

/// A string wrapper that masks its contents in Debug/Display output.
/// Keeps bearer tokens and API keys out of tracing output.
#[derive(Clone, Default)]
pub struct SecretString(String);

impl SecretString {
    /// Access the raw secret value (for headers, URLs, etc.)
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Read a credential from the environment variable named in config.
///
/// `"none"` (any case) means the backend takes no credential. When `required`
/// is false a missing variable yields an empty secret instead of an error.
pub fn secret_from_env(var: Option<&str>, required: bool) -> Result<SecretString> {
    let Some(var) = var else {
        return Ok(SecretString::default());
    };
    if var.eq_ignore_ascii_case("none") {
        return Ok(SecretString::default());
    }
    match env::var(var) {
        Ok(value) => Ok(value.into()),
        Err(_) if !required => Ok(SecretString::default()),
        Err(_) => Err(anyhow!("API key not found in environment variable: {}", var)),
    }
}

/// Join key parts with `:`, skipping empty parts.
pub fn cache_key(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(":")
}

/// First `max_chars` characters of `text`, for log lines.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push('…');
    }
    out.replace('\n', " ")
}
