// Prompt templates for the onboarding guide and follow-up answers.
// All templates embed the README verbatim; size limits belong to the model.

use crate::onboarding::vocab::{Experience, Team};

/// Shared design workspace, linked from the non-engineering guide and from
/// design-link follow-ups.
pub const DESIGN_RESOURCES_URL: &str = "https://www.figma.com/@cuappdev";

/// "all-in" -> "All-in"
pub fn display_app(app: &str) -> String {
    let mut chars = app.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn tone_instruction(experience: Experience) -> &'static str {
    match experience {
        Experience::Beginner => {
            "The reader is a beginner. Be thorough: explain prerequisites (tool installs, \
accounts, SDKs) before project steps, say what each command does, and link official \
install guides where the README mentions a tool."
        }
        Experience::Intermediate => {
            "The reader has some experience. Skip generic tool installation and focus on \
what is specific to this project: its configuration, scripts and conventions."
        }
        Experience::Experienced => {
            "The reader is experienced. Be concise: list only the requirements and steps \
unique to this project, one line each, no explanations of common tooling."
        }
    }
}

/// Build the onboarding-guide prompt. Engineering teams get the technical
/// template; everyone else gets the role-oriented one.
pub fn compose_summary_prompt(
    org: &str,
    app: &str,
    team: Team,
    experience: Experience,
    readme: &str,
) -> String {
    if team.is_engineering() {
        engineering_prompt(org, app, team, experience, readme)
    } else {
        non_engineering_prompt(org, app, team, experience, readme)
    }
}

fn engineering_prompt(
    org: &str,
    app: &str,
    team: Team,
    experience: Experience,
    readme: &str,
) -> String {
    let app = display_app(app);
    format!(
        r#"You are {org}'s onboarding assistant in Slack.
A new {experience} member just joined the {team} subteam of {app}.
Using only the README below, write their onboarding guide with exactly these sections, in this order:

📘 *About {app}*
🛠️ *Setup Instructions*
⚙️ *Required Configuration*
▶️ *Running the Project*
🔗 *Key Resources*

Formatting rules (Slack, not Markdown):
- Bold with *single asterisks*. Never use **double asterisks** or # headings.
- Wrap every command, file name and environment variable in `backticks`.
- Use • for bullets and `1.` for ordered steps.
- Leave a blank line between sections.
- If the README does not cover a section, say so in one line instead of guessing.

Tone: {tone}

README:
{readme}
"#,
        org = org,
        experience = experience,
        team = team.display_name(),
        app = app,
        tone = tone_instruction(experience),
        readme = readme,
    )
}

fn non_engineering_prompt(
    org: &str,
    app: &str,
    team: Team,
    experience: Experience,
    readme: &str,
) -> String {
    let app = display_app(app);
    format!(
        r#"You are {org}'s onboarding assistant in Slack.
A new {experience} member just joined the {team} subteam of {app}. They will not be writing code.
Write them a warm, encouraging welcome message with exactly these sections, in this order:

👋 *About {app}*
What the app does and who uses it, in plain language.
🎯 *Your Role as a {team} Member*
How the {team} subteam contributes to {app}.
🎨 *Design Resources*
Point them to our Figma: {design_url}
🚀 *Getting Started*
Three or four concrete first steps.

Formatting rules (Slack, not Markdown):
- Bold with *single asterisks*. Never use **double asterisks** or # headings.
- Use • for bullets.
- Leave a blank line between sections.
- Skip setup commands and technical configuration.

README (for background on the app):
{readme}
"#,
        org = org,
        experience = experience,
        team = team.display_name(),
        app = app,
        design_url = DESIGN_RESOURCES_URL,
        readme = readme,
    )
}

/// Build the single-turn prompt for a question asked after onboarding.
/// Special cases are steered by instruction text, not separate code paths.
pub fn compose_followup_prompt(
    org: &str,
    app: &str,
    team: Option<Team>,
    question: &str,
    readme: &str,
) -> String {
    let team = team.map(|t| t.display_name()).unwrap_or("general");
    let app = display_app(app);
    format!(
        r#"You are {org}'s onboarding assistant in Slack, helping a member of the {team} subteam of {app}.
Answer their follow-up question using the README below. Keep it short and practical.

Special cases:
- If they ask for design files, mockups or the Figma link, give them {design_url}.
- If they ask about dependencies, list the packages and tools the README names, as bullets.
- If they ask about environment variables or secrets, list the variable names from the README and tell them to ask their subteam lead for the values; never invent values.
- If they are stuck on setup, ask which step failed and what error they saw, then suggest the most likely fix from the README.
- If the README does not answer it, say so and suggest asking in the subteam channel.

Formatting rules: Slack style, *single asterisks* for bold, `backticks` for commands, • for bullets.

Follow-up question: "{question}"

README:
{readme}
"#,
        org = org,
        team = team,
        app = app,
        design_url = DESIGN_RESOURCES_URL,
        question = question.trim(),
        readme = readme,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const README: &str = "# Resell\n\nRun `npm install` then `npm run dev`.\n";

    #[test]
    fn test_display_app() {
        assert_eq!(display_app("resell"), "Resell");
        assert_eq!(display_app("all-in"), "All-in");
        assert_eq!(display_app(""), "");
    }

    #[test]
    fn test_engineering_template_sections() {
        let prompt = compose_summary_prompt(
            "Cornell AppDev",
            "resell",
            Team::Backend,
            Experience::Beginner,
            README,
        );
        for header in [
            "*About Resell*",
            "*Setup Instructions*",
            "*Required Configuration*",
            "*Running the Project*",
            "*Key Resources*",
        ] {
            assert!(prompt.contains(header), "missing {}", header);
        }
        assert!(prompt.contains("Backend subteam"));
        assert!(prompt.contains("explain prerequisites"));
        assert!(!prompt.contains("Design Resources"));
    }

    #[test]
    fn test_non_engineering_template_sections() {
        let prompt = compose_summary_prompt(
            "Cornell AppDev",
            "eatery",
            Team::Marketing,
            Experience::Intermediate,
            README,
        );
        assert!(prompt.contains("*Your Role as a Marketing Member*"));
        assert!(prompt.contains("*Design Resources*"));
        assert!(prompt.contains(DESIGN_RESOURCES_URL));
        assert!(!prompt.contains("Setup Instructions"));
    }

    #[test]
    fn test_tone_follows_experience() {
        let experienced = compose_summary_prompt(
            "Org",
            "uplift",
            Team::Ios,
            Experience::Experienced,
            README,
        );
        assert!(experienced.contains("Be concise"));

        let intermediate = compose_summary_prompt(
            "Org",
            "uplift",
            Team::Ios,
            Experience::Intermediate,
            README,
        );
        assert!(intermediate.contains("Skip generic tool installation"));
    }

    #[test]
    fn test_readme_embedded_verbatim() {
        let big = "x".repeat(200_000);
        let prompt = compose_summary_prompt("Org", "score", Team::Android, Experience::Beginner, &big);
        assert!(prompt.contains(&big));

        let followup = compose_followup_prompt("Org", "score", None, "what env vars?", README);
        assert!(followup.contains(README));
        assert!(followup.contains("\"what env vars?\""));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let a = compose_summary_prompt("Org", "navi", Team::Frontend, Experience::Beginner, README);
        let b = compose_summary_prompt("Org", "navi", Team::Frontend, Experience::Beginner, README);
        assert_eq!(a, b);
    }
}
