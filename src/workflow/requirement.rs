//! Stage 1: capture the free-text game requirement.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use crate::context::StoryContext;
use crate::flow::{Action, Node};

/// Takes the requirement from the CLI flag when given, otherwise prompts
/// interactively on stdin.
pub struct RequirementStage {
    provided: Option<String>,
}

impl RequirementStage {
    pub fn new(provided: Option<String>) -> Self {
        Self { provided }
    }

    fn prompt_for_requirement(&self) -> Result<String> {
        print!("Describe the game requirement: ");
        io::stdout().flush().context("flush requirement prompt")?;
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("read requirement from stdin")?;
        Ok(line.trim().to_string())
    }
}

impl Node<StoryContext> for RequirementStage {
    type Prep = ();
    type Out = String;

    fn name(&self) -> &str {
        "requirement"
    }

    fn prep(&self, _ctx: &StoryContext) -> Result<()> {
        Ok(())
    }

    fn exec(&self, _prep: &()) -> Result<String> {
        match &self.provided {
            Some(text) => Ok(text.clone()),
            None => self.prompt_for_requirement(),
        }
    }

    fn post(&self, ctx: &mut StoryContext, _prep: (), requirement: String) -> Result<Action> {
        ctx.requirement = Some(requirement);
        Ok(Action::Continue)
    }
}
