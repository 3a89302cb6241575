//! Stage 2: generate the background story.

use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::artifacts::{ArtifactStore, BACKGROUND_FILE};
use crate::context::StoryContext;
use crate::extract::extract_tagged_blocks;
use crate::flow::{Action, Node};
use crate::lm::Lm;

const PROMPT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/background_story.md"
));

pub struct BackgroundStage {
    lm: Arc<Lm>,
    store: ArtifactStore,
}

impl BackgroundStage {
    pub fn new(lm: Arc<Lm>, store: ArtifactStore) -> Self {
        Self { lm, store }
    }
}

impl Node<StoryContext> for BackgroundStage {
    type Prep = String;
    type Out = String;

    fn name(&self) -> &str {
        "background"
    }

    fn prep(&self, ctx: &StoryContext) -> Result<String> {
        ctx.requirement
            .clone()
            .ok_or_else(|| anyhow!("no requirement captured before the background stage"))
    }

    fn exec(&self, requirement: &String) -> Result<String> {
        let prompt = PROMPT.replace("{requirement}", requirement);
        self.lm.complete(&prompt)
    }

    fn post(&self, ctx: &mut StoryContext, _requirement: String, reply: String) -> Result<Action> {
        let story = extract_tagged_blocks(&reply, "markdown");
        self.store.write(BACKGROUND_FILE, &story)?;
        ctx.background_story = Some(story);
        println!("background story saved to {BACKGROUND_FILE}");
        Ok(Action::Continue)
    }
}
