//! Stage 5: convert each chapter into a Yarn Spinner script.
//!
//! A batch stage over the chapter artifacts present in the store, in name
//! order, so the scripts line up with the chapters even if the chapter
//! count changed between runs.

use std::sync::Arc;

use anyhow::Result;

use crate::artifacts::{script_file_name, ArtifactStore, BACKGROUND_FILE, CHARACTERS_FILE};
use crate::context::StoryContext;
use crate::extract::extract_tagged_blocks;
use crate::flow::{Action, BatchNode};
use crate::lm::Lm;

const PROMPT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/yarn_script.md"
));
const YARN_SYNTAX: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/yarn_syntax.md"
));

pub struct ScriptsStage {
    lm: Arc<Lm>,
    store: ArtifactStore,
}

impl ScriptsStage {
    pub fn new(lm: Arc<Lm>, store: ArtifactStore) -> Self {
        Self { lm, store }
    }
}

impl BatchNode<StoryContext> for ScriptsStage {
    type Item = String;
    type Out = (String, String);

    fn name(&self) -> &str {
        "scripts"
    }

    fn prep(&self, _ctx: &StoryContext) -> Result<Vec<String>> {
        self.store.chapter_files()
    }

    fn exec_one(&self, chapter_file: &String) -> Result<(String, String)> {
        let chapter = self.store.read(chapter_file)?;
        let background_story = self.store.read(BACKGROUND_FILE)?;
        let characters = self.store.read(CHARACTERS_FILE)?;
        let prompt = PROMPT
            .replace("{chapter}", &chapter)
            .replace("{background_story}", &background_story)
            .replace("{characters}", &characters)
            .replace("{yarn_syntax}", YARN_SYNTAX);
        let reply = self.lm.complete(&prompt)?;
        Ok((chapter_file.clone(), reply))
    }

    fn post(
        &self,
        ctx: &mut StoryContext,
        _items: Vec<String>,
        outs: Vec<(String, String)>,
    ) -> Result<Action> {
        for (chapter_file, reply) in outs {
            let script = extract_tagged_blocks(&reply, "yarn");
            let file = script_file_name(&chapter_file);
            self.store.write(&file, &script)?;
            ctx.yarn_scripts.insert(file, script);
        }
        println!("{} yarn script(s) saved", ctx.yarn_scripts.len());
        Ok(Action::Continue)
    }
}
