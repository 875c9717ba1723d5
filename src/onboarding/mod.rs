//! Slot-filling onboarding dialogue

pub mod dialogue;
pub mod extract;
pub mod followup;
pub mod session;
pub mod summarizer;
pub mod vocab;

pub use dialogue::{advance, OnboardingBot, Turn};
pub use session::{InMemorySessionStore, Phase, Session, SessionStore};
pub use summarizer::{Summarizer, Summary, SummaryError};
pub use vocab::{Experience, Team};
