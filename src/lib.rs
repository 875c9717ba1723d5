//! onboardbot - conversational onboarding for student developers
//!
//! Walks a new member through choosing an app, a team and an experience
//! level, then builds a chat-formatted onboarding guide from the app's GitHub
//! README with an LLM (Gemini, Anthropic, OpenAI or any OpenAI-compatible
//! endpoint) and answers follow-up questions against the same README.

pub mod cache;
pub mod cli;
pub mod config;
pub mod llm;
pub mod onboarding;
pub mod postprocess;
pub mod prompts;
pub mod readme;
pub mod util;
