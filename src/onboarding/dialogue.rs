//! The onboarding conversation.
//!
//! `advance` is the pure state machine over a [`Session`]; `OnboardingBot`
//! wraps it with the session store, README resolution, generation and the
//! follow-up bridge. Every failure on the way out becomes a chat message.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info, warn};

use super::extract::Extracted;
use super::followup::FollowupBridge;
use super::session::{Phase, Session, SessionStore};
use super::summarizer::{Summarizer, SummaryError};
use super::vocab::{Experience, Team};
use crate::prompts::display_app;
use crate::readme::ResolveError;

/// Start onboarding, or mid-flow jump to the first slot still missing.
const TRIGGER_PHRASES: &[&str] = &["onboard", "get started", "start over", "restart"];

/// Clear every slot, even mid-flow. Other triggers keep what is known.
const RESET_PHRASES: &[&str] = &["start over", "restart"];

/// Once onboarded, only these restart; anything else is a follow-up question.
const RESTART_PHRASES: &[&str] = &["onboard me", "start onboarding", "start over", "restart"];

pub const NO_README_TEXT: &str = "No README found or could not fetch repository.";

const NEXT_STEPS: &str = "👉 *Next steps*\n\
• Work through the setup above and get the project running locally\n\
• Ask me anything about the project right here, like \"what environment variables do I need?\" or \"what are the dependencies?\"\n\
• Say hi in your subteam channel and ask your lead for a starter issue";

/// What the caller has to do after a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// Send these messages; the session already holds the new state.
    Reply(Vec<String>),
    /// All slots are filled and the session is `Onboarded`; build the guide.
    Onboard,
    /// The session was already onboarded; route the text to Q&A.
    FollowUp,
}

fn team_list() -> String {
    Team::ALL
        .iter()
        .map(|t| t.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn app_list(projects: &[String]) -> String {
    projects.join(", ")
}

fn prompt_for(phase: Phase, session: &Session, projects: &[String], org: &str) -> String {
    match phase {
        Phase::AskApp => format!(
            "Welcome to {}! 🎉\n\nAvailable apps:\n{}\n\nWhich app would you like to onboard to?",
            org,
            app_list(projects)
        ),
        Phase::AskTeam => format!(
            "Cool, *{}* it is! Which subteam are you on? ({})",
            session.app.as_deref().map(display_app).unwrap_or_default(),
            team_list()
        ),
        Phase::AskExperience => format!(
            "Got it, {}! How much experience do you have? Are you a beginner, intermediate, or experienced?",
            session.team.map(|t| t.display_name()).unwrap_or("welcome aboard")
        ),
        Phase::None | Phase::Onboarded => String::new(),
    }
}

fn reprompt_for(phase: Phase, projects: &[String]) -> String {
    match phase {
        Phase::AskApp => format!(
            "Hmm, I didn't recognize that app. Please pick from:\n{}",
            app_list(projects)
        ),
        Phase::AskTeam => format!(
            "Sorry, I didn't catch your subteam. Please pick one of: {}",
            team_list()
        ),
        Phase::AskExperience => {
            "I didn't quite get that. Are you a beginner, intermediate, or experienced?"
                .to_string()
        }
        Phase::None | Phase::Onboarded => String::new(),
    }
}

/// Fill slots that are still empty. A slot is set at most once per cycle.
fn fill(session: &mut Session, extracted: &Extracted) {
    if session.app.is_none() {
        session.app = extracted.app.clone();
    }
    if session.team.is_none() {
        session.team = extracted.team;
    }
    if session.experience.is_none() {
        session.experience = extracted.experience;
    }
}

fn move_to(session: &mut Session, next: Phase, projects: &[String], org: &str) -> Turn {
    debug!(
        "Session {}: {} -> {}",
        session.user_id,
        session.phase.as_str(),
        next.as_str()
    );
    session.phase = next;
    match next {
        Phase::Onboarded => Turn::Onboard,
        _ => Turn::Reply(vec![prompt_for(next, session, projects, org)]),
    }
}

/// Apply one inbound message to the session.
///
/// Extraction runs over the whole message in every phase, so a message that
/// names project, team and experience at once skips straight to `Onboarded`.
pub fn advance(session: &mut Session, text: &str, projects: &[String], org: &str) -> Turn {
    let lower = text.to_lowercase();

    if session.phase == Phase::Onboarded {
        if !RESTART_PHRASES.iter().any(|p| lower.contains(p)) {
            return Turn::FollowUp;
        }
        info!("Session {} restarting onboarding", session.user_id);
    }

    let extracted = Extracted::from_message(text, projects);
    let triggered = TRIGGER_PHRASES.iter().any(|p| lower.contains(p));
    let reset = RESET_PHRASES.iter().any(|p| lower.contains(p));

    if session.phase == Phase::None || session.phase == Phase::Onboarded || reset {
        session.reset();
    }
    if session.phase == Phase::None || triggered {
        fill(session, &extracted);
        let next = session.next_unmet();
        return move_to(session, next, projects, org);
    }

    let expected_found = match session.phase {
        Phase::AskApp => extracted.app.is_some(),
        Phase::AskTeam => extracted.team.is_some(),
        Phase::AskExperience => extracted.experience.is_some(),
        Phase::None | Phase::Onboarded => true,
    };
    fill(session, &extracted);

    if !expected_found {
        debug!(
            "Session {}: nothing for {} in message",
            session.user_id,
            session.phase.as_str()
        );
        return Turn::Reply(vec![reprompt_for(session.phase, projects)]);
    }

    let next = session.next_unmet();
    move_to(session, next, projects, org)
}

pub struct OnboardingBot {
    sessions: Arc<dyn SessionStore>,
    summarizer: Summarizer,
    followup: FollowupBridge,
    projects: Vec<String>,
    org_name: String,
    user_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl OnboardingBot {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        summarizer: Summarizer,
        followup: FollowupBridge,
        projects: Vec<String>,
        org_name: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            summarizer,
            followup,
            projects,
            org_name: org_name.into(),
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    fn user_lock(&self, user_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .user_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(user_id.to_string()).or_default().clone()
    }

    /// Handle one inbound message and return the outbound messages in order.
    /// Turns for the same user are serialized; this never fails.
    pub async fn handle_message(&self, user_id: &str, text: &str) -> Vec<String> {
        let lock = self.user_lock(user_id);
        let _turn = lock.lock().await;

        match self.run_turn(user_id, text.trim()).await {
            Ok(replies) => replies,
            Err(e) => {
                error!("Turn failed for {}: {:#}", user_id, e);
                vec![format!(
                    "⚠️ Sorry, something went wrong on my end: {}. Please try again.",
                    e
                )]
            }
        }
    }

    async fn run_turn(&self, user_id: &str, text: &str) -> Result<Vec<String>> {
        let mut session = self.sessions.load(user_id).await?;

        let replies = match advance(&mut session, text, &self.projects, &self.org_name) {
            Turn::Reply(replies) => replies,
            Turn::Onboard => self.onboard(&mut session).await,
            Turn::FollowUp => vec![self.answer_followup(&session, text).await],
        };

        self.sessions.save(&session).await?;
        Ok(replies)
    }

    async fn onboard(&self, session: &mut Session) -> Vec<String> {
        let app = session.app.clone().unwrap_or_default();
        let team = session.team.unwrap_or(Team::Backend);
        let experience = session.experience.unwrap_or(Experience::Beginner);
        let shown = display_app(&app);
        info!(
            "Onboarding {} to {} ({}, {})",
            session.user_id, app, team, experience
        );

        let mut replies = vec![
            format!(
                "Got it! You're onboarding to *{} ({})* as {} {} member! 🚀",
                shown,
                team.display_name(),
                if experience == Experience::Beginner { "a" } else { "an" },
                experience
            ),
            format!("Fetching setup info for {} {}...", shown, team.display_name()),
        ];

        match self.summarizer.summarize(&app, team, experience).await {
            Ok(summary) => {
                session.readme = Some(summary.readme);
                let mut text = summary.text;
                if team.is_engineering() {
                    text.push_str("\n\n");
                    text.push_str(NEXT_STEPS);
                }
                replies.push(text);
            }
            Err(SummaryError::NotFound(ResolveError::NotFound { attempted, .. })) => {
                session.readme = Some(NO_README_TEXT.to_string());
                let tried = attempted
                    .iter()
                    .map(|r| format!("`{}`", r))
                    .collect::<Vec<_>>()
                    .join(", ");
                replies.push(format!(
                    "⚠️ I couldn't find a README for *{}*. I tried: {}",
                    shown, tried
                ));
            }
            Err(SummaryError::Generation { readme, error }) => {
                session.readme = Some(readme);
                replies.push(format!(
                    "⚠️ Sorry, I couldn't build your onboarding guide: {:#}",
                    error
                ));
            }
        }
        replies
    }

    async fn answer_followup(&self, session: &Session, question: &str) -> String {
        let app = session.app.as_deref().unwrap_or_default();
        let readme = session.readme.as_deref().unwrap_or(NO_README_TEXT);
        match self
            .followup
            .answer(question, app, session.team, readme)
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Follow-up failed for {}: {:#}", session.user_id, e);
                format!("⚠️ Sorry, I couldn't answer that right now: {:#}", e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrganizationConfig;

    const ORG: &str = "Cornell AppDev";

    fn projects() -> Vec<String> {
        OrganizationConfig::default().projects
    }

    fn session_in(phase: Phase) -> Session {
        let mut session = Session::new("U1");
        session.phase = phase;
        session
    }

    #[test]
    fn test_fast_path_to_onboarded() {
        let mut session = Session::new("U1");
        let turn = advance(
            &mut session,
            "I want to onboard to Resell Backend as a beginner",
            &projects(),
            ORG,
        );
        assert_eq!(turn, Turn::Onboard);
        assert_eq!(session.phase, Phase::Onboarded);
        assert_eq!(session.app.as_deref(), Some("resell"));
        assert_eq!(session.team, Some(Team::Backend));
        assert_eq!(session.experience, Some(Experience::Beginner));
    }

    #[test]
    fn test_first_message_asks_for_app() {
        let mut session = Session::new("U1");
        let turn = advance(&mut session, "hi!", &projects(), ORG);
        assert_eq!(session.phase, Phase::AskApp);
        match turn {
            Turn::Reply(msgs) => {
                assert!(msgs[0].contains("Welcome to Cornell AppDev"));
                assert!(msgs[0].contains("coursegrab"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_trigger_skips_known_slots() {
        let mut session = session_in(Phase::AskExperience);
        session.app = Some("uplift".to_string());
        let turn = advance(&mut session, "onboard me to eatery", &projects(), ORG);
        // Slots are set once per cycle; the missing team is asked next
        assert_eq!(session.app.as_deref(), Some("uplift"));
        assert_eq!(session.team, None);
        assert_eq!(session.phase, Phase::AskTeam);
        assert!(matches!(turn, Turn::Reply(ref m) if m[0].contains("*Uplift*")));
    }

    #[test]
    fn test_trigger_mid_flow_keeps_app_and_fills_team() {
        let mut session = Session::new("U1");
        advance(&mut session, "onboard me", &projects(), ORG);
        advance(&mut session, "resell", &projects(), ORG);
        assert_eq!(session.phase, Phase::AskTeam);

        let turn = advance(
            &mut session,
            "backend, ready to get started",
            &projects(),
            ORG,
        );
        assert_eq!(session.app.as_deref(), Some("resell"));
        assert_eq!(session.team, Some(Team::Backend));
        assert_eq!(session.phase, Phase::AskExperience);
        assert!(matches!(turn, Turn::Reply(ref m) if m[0].starts_with("Got it, Backend!")));
    }

    #[test]
    fn test_start_over_mid_flow_clears_slots() {
        let mut session = session_in(Phase::AskExperience);
        session.app = Some("uplift".to_string());
        session.team = Some(Team::Ios);
        let turn = advance(&mut session, "actually, start over", &projects(), ORG);
        assert_eq!(session, {
            let mut fresh = Session::new("U1");
            fresh.phase = Phase::AskApp;
            fresh
        });
        assert!(matches!(turn, Turn::Reply(ref m) if m[0].contains("Which app")));
    }

    #[test]
    fn test_ask_team_reprompts_without_team() {
        let mut session = session_in(Phase::AskTeam);
        session.app = Some("resell".to_string());
        let turn = advance(&mut session, "not sure yet", &projects(), ORG);
        assert_eq!(session.phase, Phase::AskTeam);
        match turn {
            Turn::Reply(msgs) => {
                for team in ["Android", "iOS", "Backend", "Frontend", "Design", "Marketing"] {
                    assert!(msgs[0].contains(team), "missing {}", team);
                }
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_ask_app_stores_extra_slots_while_reprompting() {
        let mut session = session_in(Phase::AskApp);
        let turn = advance(&mut session, "I'm an android dev", &projects(), ORG);
        assert_eq!(session.phase, Phase::AskApp);
        assert_eq!(session.team, Some(Team::Android));
        assert!(matches!(turn, Turn::Reply(ref m) if m[0].contains("didn't recognize")));

        // Team already known, so naming the app skips straight to experience
        advance(&mut session, "navi please", &projects(), ORG);
        assert_eq!(session.phase, Phase::AskExperience);
    }

    #[test]
    fn test_experience_completes_onboarding() {
        let mut session = session_in(Phase::AskExperience);
        session.app = Some("score".to_string());
        session.team = Some(Team::Ios);
        assert_eq!(
            advance(&mut session, "I'm a veteran", &projects(), ORG),
            Turn::Onboard
        );
        assert_eq!(session.experience, Some(Experience::Experienced));
    }

    #[test]
    fn test_onboarded_routes_followups() {
        let mut session = session_in(Phase::Onboarded);
        session.app = Some("score".to_string());
        session.readme = Some("# Score".to_string());
        assert_eq!(
            advance(&mut session, "how do I get started running it?", &projects(), ORG),
            Turn::FollowUp
        );
        assert_eq!(session.phase, Phase::Onboarded);
        assert_eq!(session.readme.as_deref(), Some("# Score"));
    }

    #[test]
    fn test_onboarded_restart() {
        let mut session = session_in(Phase::Onboarded);
        session.app = Some("score".to_string());
        session.readme = Some("# Score".to_string());
        let turn = advance(&mut session, "start over", &projects(), ORG);
        assert_eq!(session.phase, Phase::AskApp);
        assert_eq!(session.readme, None);
        assert!(matches!(turn, Turn::Reply(_)));
    }
}
