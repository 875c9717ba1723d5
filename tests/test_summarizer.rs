//! Summarizer against file-backed caches and the dry-run model.

mod common;

use common::{FixtureSource, ScriptedLlm, ORG};
use onboardbot::cache::{JsonFileStore, KeyValueStore};
use onboardbot::llm::MockLlmClient;
use onboardbot::onboarding::{Experience, Summarizer, SummaryError, Team};
use onboardbot::readme::ReadmeResolver;
use std::sync::Arc;

fn summarizer_at(
    dir: &std::path::Path,
    source: Arc<FixtureSource>,
    llm: Arc<dyn onboardbot::llm::LlmClient>,
) -> Summarizer {
    let repo_map = JsonFileStore::open(dir.join("repo_map.json")).unwrap();
    let summaries = JsonFileStore::open(dir.join("summaries.json")).unwrap();
    Summarizer::new(
        ReadmeResolver::new(source, Arc::new(repo_map)),
        llm,
        Arc::new(summaries),
        ORG,
    )
}

#[tokio::test]
async fn test_mock_output_is_slack_formatted() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(FixtureSource::with(&[("eatery-ios", "# Eatery iOS")]));
    let summarizer = summarizer_at(dir.path(), source, Arc::new(MockLlmClient::new()));

    let summary = summarizer
        .summarize("eatery", Team::Ios, Experience::Beginner)
        .await
        .unwrap();

    assert_eq!(summary.repo, "eatery-ios");
    assert_eq!(summary.readme, "# Eatery iOS");
    assert!(!summary.text.contains("**"));
    assert!(summary.text.starts_with("📘 *About the Project*"));
    assert!(summary.text.contains("team.\n\n🛠️ *Setup Instructions*"));
    assert!(summary.text.contains("• Copy `.env.template` to `.env`"));
    assert!(!summary.text.contains("\n\n\n"));
}

#[tokio::test]
async fn test_caches_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(FixtureSource::with(&[("score", "# Score")]));

    let first = summarizer_at(
        dir.path(),
        source.clone(),
        Arc::new(ScriptedLlm::replying("**Score** guide")),
    );
    let built = first
        .summarize("score", Team::Design, Experience::Intermediate)
        .await
        .unwrap();
    assert_eq!(built.text, "*Score* guide");

    let repo_map = JsonFileStore::open(dir.path().join("repo_map.json")).unwrap();
    assert_eq!(repo_map.get("score:design").as_deref(), Some("score"));

    // A fresh process with a broken model still serves the cached guide.
    let failing = Arc::new(ScriptedLlm::failing());
    let second = summarizer_at(dir.path(), source.clone(), failing.clone());
    let cached = second
        .summarize("score", Team::Design, Experience::Intermediate)
        .await
        .unwrap();
    assert_eq!(cached.text, "*Score* guide");
    assert_eq!(cached.readme, "# Score");
    assert!(failing.prompts().is_empty());
    assert_eq!(source.calls(), vec!["score", "score"]);
}

#[tokio::test]
async fn test_cache_key_includes_experience() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(FixtureSource::with(&[("navi-frontend", "# Navi")]));
    let llm = Arc::new(ScriptedLlm::replying("guide"));
    let summarizer = summarizer_at(dir.path(), source, llm.clone());

    for experience in Experience::ALL {
        summarizer
            .summarize("navi", Team::Frontend, experience)
            .await
            .unwrap();
    }
    assert_eq!(llm.prompts().len(), 3);
    assert!(llm.prompts()[0].contains("beginner"));
}

#[tokio::test]
async fn test_generation_error_keeps_readme() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(FixtureSource::with(&[("all-in-backend", "# All-in")]));
    let summarizer = summarizer_at(dir.path(), source, Arc::new(ScriptedLlm::failing()));

    match summarizer
        .summarize("all-in", Team::Backend, Experience::Experienced)
        .await
    {
        Err(SummaryError::Generation { readme, error }) => {
            assert_eq!(readme, "# All-in");
            assert!(error.to_string().contains("503"));
        }
        other => panic!("expected generation error, got {:?}", other.map(|s| s.repo)),
    }

    let summaries = JsonFileStore::open(dir.path().join("summaries.json")).unwrap();
    assert!(summaries.get("all-in:backend:experienced").is_none());
}

#[tokio::test]
async fn test_missing_readme_skips_generation() {
    let dir = tempfile::tempdir().unwrap();
    let llm = Arc::new(ScriptedLlm::replying("unused"));
    let summarizer = summarizer_at(dir.path(), Arc::new(FixtureSource::default()), llm.clone());

    let err = summarizer
        .summarize("volume", Team::Marketing, Experience::Beginner)
        .await
        .unwrap_err();
    assert!(matches!(err, SummaryError::NotFound(_)));
    assert!(err.to_string().starts_with("no README found for volume"));
    assert!(llm.prompts().is_empty());
}
