//! Integration tests driving the full story pipeline with a mock model.
//!
//! The mock routes each prompt to a canned reply by matching stage-specific
//! template markers, so the tests exercise the real stages, artifact store,
//! and extraction path without a network backend.

use std::sync::Arc;

use tempfile::TempDir;
use yarnsmith::artifacts::{
    chapter_file_name, script_file_name, ArtifactStore, BACKGROUND_FILE, CHARACTERS_FILE,
};
use yarnsmith::config::RunConfig;
use yarnsmith::context::StoryContext;
use yarnsmith::flow::{Batch, Flow};
use yarnsmith::lm::{ChatModel, Lm, RetryPolicy, TransportError};
use yarnsmith::workflow::{build_story_flow, ChaptersStage};

/// Routes prompts to canned replies by stage-specific template markers.
struct ScriptedModel;

impl ChatModel for ScriptedModel {
    fn complete(&self, prompt: &str) -> Result<String, TransportError> {
        if prompt.contains("design an engaging background story") {
            Ok(concat!(
                "Here is the story:\n",
                "```markdown\n",
                "# Background\n",
                "A lighthouse at the edge of the world.\n",
                "```\n",
                "Let me know if you want changes."
            )
            .to_string())
        } else if prompt.contains("design the key characters") {
            Ok("```markdown\n# Characters\n- Mara, the keeper\n```".to_string())
        } else if prompt.contains("Write chapter") {
            Ok("```markdown\n# Chapter\nSomething happens at the lighthouse.\n```".to_string())
        } else if prompt.contains("Convert the following chapter") {
            Ok("```yarn\ntitle: Start\n---\nMara: Hello.\n===\n```".to_string())
        } else {
            let head: String = prompt.chars().take(80).collect();
            Err(TransportError::Malformed(format!(
                "unexpected prompt: {head}"
            )))
        }
    }
}

/// Always fails, standing in for an unreachable endpoint.
struct DownModel;

impl ChatModel for DownModel {
    fn complete(&self, _prompt: &str) -> Result<String, TransportError> {
        Err(TransportError::Malformed("connection refused".to_string()))
    }
}

fn scripted_lm(require_content: bool) -> Arc<Lm> {
    Arc::new(Lm::new(
        Box::new(ScriptedModel),
        RetryPolicy::default(),
        require_content,
    ))
}

#[test]
fn full_run_produces_all_artifact_categories() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(dir.path()).unwrap();
    let config = RunConfig::default();

    let flow = build_story_flow(
        scripted_lm(true),
        store.clone(),
        &config,
        Some("a lighthouse mystery".to_string()),
    );
    let mut ctx = StoryContext::default();
    flow.run(&mut ctx).unwrap();

    assert_eq!(ctx.requirement.as_deref(), Some("a lighthouse mystery"));

    let background = store.read(BACKGROUND_FILE).unwrap();
    assert!(background.contains("lighthouse at the edge"));
    // Fences and surrounding commentary were stripped.
    assert!(!background.contains("```"));
    assert!(!background.contains("Let me know"));

    let characters = store.read(CHARACTERS_FILE).unwrap();
    assert!(characters.contains("Mara, the keeper"));

    for number in 1..=config.chapter_count {
        let chapter = store.read(&chapter_file_name(number)).unwrap();
        assert!(chapter.contains("Something happens"));

        let script = store
            .read(&script_file_name(&chapter_file_name(number)))
            .unwrap();
        assert!(script.contains("title: Start"));
        assert!(!script.contains("```"));
    }

    assert_eq!(ctx.chapters.len(), 3);
    assert_eq!(ctx.yarn_scripts.len(), 3);
    assert_eq!(ctx.background_story.as_deref(), Some(background.as_str()));
}

#[test]
fn chapter_count_is_configurable() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(dir.path()).unwrap();
    let config = RunConfig {
        chapter_count: 2,
        ..RunConfig::default()
    };

    let flow = build_story_flow(
        scripted_lm(true),
        store.clone(),
        &config,
        Some("a short tale".to_string()),
    );
    let mut ctx = StoryContext::default();
    flow.run(&mut ctx).unwrap();

    assert_eq!(
        store.chapter_files().unwrap(),
        vec!["chapter-01.md", "chapter-02.md"]
    );
    assert_eq!(
        store.script_files().unwrap(),
        vec!["chapter-01.yarn", "chapter-02.yarn"]
    );
}

#[test]
fn missing_characters_artifact_aborts_chapter_generation() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(dir.path()).unwrap();
    store.write(BACKGROUND_FILE, "# Background").unwrap();
    // characters.md deliberately absent: the predecessor stage "never ran".

    let flow = Flow::start(Batch(ChaptersStage::new(scripted_lm(true), store.clone(), 3))).build();
    let mut ctx = StoryContext::default();
    let err = flow.run(&mut ctx).unwrap_err();

    let rendered = format!("{err:#}");
    assert!(rendered.contains("artifact missing: characters.md"));
    assert!(rendered.contains("stage chapters failed"));

    // The abort happened before any chapter was written.
    assert!(store.chapter_files().unwrap().is_empty());
    assert!(ctx.chapters.is_empty());
}

#[test]
fn transport_failure_degrades_to_empty_artifacts_by_default() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(dir.path()).unwrap();
    let config = RunConfig::default();
    let lm = Arc::new(Lm::new(
        Box::new(DownModel),
        RetryPolicy::default(),
        false,
    ));

    let flow = build_story_flow(lm, store.clone(), &config, Some("anything".to_string()));
    let mut ctx = StoryContext::default();
    flow.run(&mut ctx).unwrap();

    // The run completed; every generated artifact exists but is empty.
    assert_eq!(store.read(BACKGROUND_FILE).unwrap(), "");
    assert_eq!(store.read(CHARACTERS_FILE).unwrap(), "");
    assert_eq!(store.chapter_files().unwrap().len(), 3);
}

#[test]
fn strict_mode_turns_transport_failure_into_a_run_error() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(dir.path()).unwrap();
    let config = RunConfig::default();
    let lm = Arc::new(Lm::new(Box::new(DownModel), RetryPolicy::default(), true));

    let flow = build_story_flow(lm, store.clone(), &config, Some("anything".to_string()));
    let mut ctx = StoryContext::default();
    let err = flow.run(&mut ctx).unwrap_err();

    // The first model-backed stage is where the run stops.
    assert!(format!("{err:#}").contains("stage background failed"));
    assert!(store.chapter_files().unwrap().is_empty());
}
