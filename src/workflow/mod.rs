//! Pipeline stages and run orchestration for the story workflow.
//!
//! Each stage is one node in a straight-line flow mirroring the generation
//! order: requirement, background story, character sheets, chapters, yarn
//! scripts, summary. Stages carry their own collaborators (model handle,
//! artifact store) so the flow engine stays free of domain knowledge.

mod background;
mod chapters;
mod characters;
mod requirement;
mod scripts;
mod summary;

pub use background::BackgroundStage;
pub use chapters::ChaptersStage;
pub use characters::CharactersStage;
pub use requirement::RequirementStage;
pub use scripts::ScriptsStage;
pub use summary::SummaryStage;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::artifacts::ArtifactStore;
use crate::cli::RunArgs;
use crate::config::RunConfig;
use crate::context::StoryContext;
use crate::flow::{Batch, Flow};
use crate::lm::{DeepSeekClient, Lm, RetryPolicy};

/// Assemble the six-stage story flow.
pub fn build_story_flow(
    lm: Arc<Lm>,
    store: ArtifactStore,
    config: &RunConfig,
    requirement: Option<String>,
) -> Flow<StoryContext> {
    Flow::start(RequirementStage::new(requirement))
        .then(BackgroundStage::new(Arc::clone(&lm), store.clone()))
        .then(CharactersStage::new(Arc::clone(&lm), store.clone()))
        .then(Batch(ChaptersStage::new(
            Arc::clone(&lm),
            store.clone(),
            config.chapter_count,
        )))
        .then(Batch(ScriptsStage::new(Arc::clone(&lm), store.clone())))
        .then(SummaryStage::new(store))
        .build()
}

/// Execute one full story run from parsed CLI arguments.
pub fn run_story(args: &RunArgs) -> Result<()> {
    let mut config = RunConfig::load(args.config.as_deref())?;
    if let Some(chapters) = args.chapters {
        config.chapter_count = chapters;
    }
    if args.strict {
        config.require_content = true;
    }
    config.apply_env();
    config.validate()?;

    let store = ArtifactStore::open(&args.out_dir)?;
    let client = DeepSeekClient::from_env(&config).context("configure chat transport")?;
    let lm = Arc::new(Lm::new(
        Box::new(client),
        RetryPolicy {
            max_retries: config.max_retries,
            ..RetryPolicy::default()
        },
        config.require_content,
    ));

    println!("===== yarnsmith story pipeline =====");
    println!("Describe the game you want; the pipeline designs the story and");
    println!(
        "writes the Yarn Spinner scripts into {}.",
        store.root().display()
    );
    println!("====================================");
    println!();

    let flow = build_story_flow(lm, store, &config, args.requirement.clone());
    let mut ctx = StoryContext::default();
    flow.run(&mut ctx)
}
