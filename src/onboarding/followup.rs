use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use super::vocab::Team;
use crate::llm::LlmClient;
use crate::postprocess::postprocess;
use crate::prompts::{compose_followup_prompt, DESIGN_RESOURCES_URL};

const DESIGN_LINK_PHRASES: &[&str] = &["figma", "design link", "design file", "mockup", "mock-up"];

/// Answers questions asked after onboarding, grounded in the cached README.
pub struct FollowupBridge {
    llm: Arc<dyn LlmClient>,
    org_name: String,
}

impl FollowupBridge {
    pub fn new(llm: Arc<dyn LlmClient>, org_name: impl Into<String>) -> Self {
        Self {
            llm,
            org_name: org_name.into(),
        }
    }

    pub fn is_design_link_request(question: &str) -> bool {
        let lower = question.to_lowercase();
        DESIGN_LINK_PHRASES.iter().any(|p| lower.contains(p))
    }

    pub async fn answer(
        &self,
        question: &str,
        app: &str,
        team: Option<Team>,
        readme: &str,
    ) -> Result<String> {
        // Answered in code so the link never depends on model output.
        if Self::is_design_link_request(question) {
            debug!("Design link request, answering directly");
            return Ok(postprocess(&format!(
                "🎨 All of our design files live in Figma: {}\nAsk your subteam lead to add you to the {} workspace if you can't open them.",
                DESIGN_RESOURCES_URL, self.org_name
            )));
        }

        let prompt = compose_followup_prompt(&self.org_name, app, team, question, readme);
        let raw = self.llm.complete(&prompt).await?;
        Ok(postprocess(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design_link_detection() {
        assert!(FollowupBridge::is_design_link_request("where's the figma link"));
        assert!(FollowupBridge::is_design_link_request("Can I see the Mockups?"));
        assert!(!FollowupBridge::is_design_link_request(
            "what env vars do I need?"
        ));
    }
}
