//! Stage 6: report what the run produced.

use anyhow::Result;

use crate::artifacts::{ArtifactStore, BACKGROUND_FILE, CHARACTERS_FILE};
use crate::context::StoryContext;
use crate::flow::{Action, Node};

pub struct SummaryStage {
    store: ArtifactStore,
}

/// Names of everything the run wrote, grouped by artifact category.
#[derive(Debug, Clone)]
pub struct RunArtifacts {
    requirement: String,
    background: String,
    characters: String,
    chapters: Vec<String>,
    yarn_scripts: Vec<String>,
}

impl SummaryStage {
    pub fn new(store: ArtifactStore) -> Self {
        Self { store }
    }
}

impl Node<StoryContext> for SummaryStage {
    type Prep = RunArtifacts;
    type Out = RunArtifacts;

    fn name(&self) -> &str {
        "summary"
    }

    fn prep(&self, ctx: &StoryContext) -> Result<RunArtifacts> {
        Ok(RunArtifacts {
            requirement: ctx.requirement.clone().unwrap_or_default(),
            background: BACKGROUND_FILE.to_string(),
            characters: CHARACTERS_FILE.to_string(),
            chapters: self.store.chapter_files()?,
            yarn_scripts: self.store.script_files()?,
        })
    }

    fn exec(&self, prep: &RunArtifacts) -> Result<RunArtifacts> {
        Ok(prep.clone())
    }

    fn post(
        &self,
        _ctx: &mut StoryContext,
        _prep: RunArtifacts,
        artifacts: RunArtifacts,
    ) -> Result<Action> {
        println!();
        println!("===== story generation complete =====");
        println!("requirement:      {}", artifacts.requirement);
        println!("background story: {}", artifacts.background);
        println!("character sheets: {}", artifacts.characters);
        println!("chapters:         {}", artifacts.chapters.join(", "));
        println!("yarn scripts:     {}", artifacts.yarn_scripts.join(", "));
        println!("=====================================");
        Ok(Action::Continue)
    }
}
