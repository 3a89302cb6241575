//! Stage 4: write the numbered story chapters.
//!
//! A batch stage: one item per chapter number. Each item re-reads the
//! background and character artifacts so a missing predecessor output is a
//! hard failure before any chapter file is written.

use std::sync::Arc;

use anyhow::Result;

use crate::artifacts::{chapter_file_name, ArtifactStore, BACKGROUND_FILE, CHARACTERS_FILE};
use crate::context::StoryContext;
use crate::extract::extract_tagged_blocks;
use crate::flow::{Action, BatchNode};
use crate::lm::Lm;

const PROMPT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/chapter.md"));

pub struct ChaptersStage {
    lm: Arc<Lm>,
    store: ArtifactStore,
    chapter_count: usize,
}

impl ChaptersStage {
    pub fn new(lm: Arc<Lm>, store: ArtifactStore, chapter_count: usize) -> Self {
        Self {
            lm,
            store,
            chapter_count,
        }
    }

    fn position_note(&self, chapter: usize) -> &'static str {
        if chapter == 1 {
            "This is the opening chapter: introduce the setting and the main characters."
        } else if chapter == self.chapter_count {
            "This is the final chapter: resolve the conflict and give the story a fitting ending."
        } else {
            "This is a middle chapter: develop the conflict and move the plot forward."
        }
    }
}

impl BatchNode<StoryContext> for ChaptersStage {
    type Item = usize;
    type Out = (usize, String);

    fn name(&self) -> &str {
        "chapters"
    }

    fn prep(&self, _ctx: &StoryContext) -> Result<Vec<usize>> {
        Ok((1..=self.chapter_count).collect())
    }

    fn exec_one(&self, chapter: &usize) -> Result<(usize, String)> {
        let background_story = self.store.read(BACKGROUND_FILE)?;
        let characters = self.store.read(CHARACTERS_FILE)?;
        let prompt = PROMPT
            .replace("{chapter_number}", &chapter.to_string())
            .replace("{chapter_count}", &self.chapter_count.to_string())
            .replace("{position_note}", self.position_note(*chapter))
            .replace("{background_story}", &background_story)
            .replace("{characters}", &characters);
        let reply = self.lm.complete(&prompt)?;
        Ok((*chapter, reply))
    }

    fn post(
        &self,
        ctx: &mut StoryContext,
        _items: Vec<usize>,
        outs: Vec<(usize, String)>,
    ) -> Result<Action> {
        for (chapter, reply) in outs {
            let text = extract_tagged_blocks(&reply, "markdown");
            let file = chapter_file_name(chapter);
            self.store.write(&file, &text)?;
            ctx.chapters.insert(file, text);
        }
        println!("{} chapter(s) saved", ctx.chapters.len());
        Ok(Action::Continue)
    }
}
