//! Stage 3: design the character sheets.

use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::artifacts::{ArtifactStore, BACKGROUND_FILE, CHARACTERS_FILE};
use crate::context::StoryContext;
use crate::extract::extract_tagged_blocks;
use crate::flow::{Action, Node};
use crate::lm::Lm;

const PROMPT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/characters.md"
));

pub struct CharactersStage {
    lm: Arc<Lm>,
    store: ArtifactStore,
}

/// What `exec` needs: the background story re-read from its artifact (so
/// this stage sees exactly what later consumers will) plus the requirement.
pub struct CharactersInput {
    background_story: String,
    requirement: String,
}

impl CharactersStage {
    pub fn new(lm: Arc<Lm>, store: ArtifactStore) -> Self {
        Self { lm, store }
    }
}

impl Node<StoryContext> for CharactersStage {
    type Prep = CharactersInput;
    type Out = String;

    fn name(&self) -> &str {
        "characters"
    }

    fn prep(&self, ctx: &StoryContext) -> Result<CharactersInput> {
        let background_story = self.store.read(BACKGROUND_FILE)?;
        let requirement = ctx
            .requirement
            .clone()
            .ok_or_else(|| anyhow!("no requirement captured before the characters stage"))?;
        Ok(CharactersInput {
            background_story,
            requirement,
        })
    }

    fn exec(&self, input: &CharactersInput) -> Result<String> {
        let prompt = PROMPT
            .replace("{background_story}", &input.background_story)
            .replace("{requirement}", &input.requirement);
        self.lm.complete(&prompt)
    }

    fn post(&self, ctx: &mut StoryContext, _input: CharactersInput, reply: String) -> Result<Action> {
        let characters = extract_tagged_blocks(&reply, "markdown");
        self.store.write(CHARACTERS_FILE, &characters)?;
        ctx.characters = Some(characters);
        println!("character sheets saved to {CHARACTERS_FILE}");
        Ok(Action::Continue)
    }
}
