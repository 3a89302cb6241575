//! Mutable run state threaded through the pipeline.

use std::collections::BTreeMap;

/// Everything the stages share during one run.
///
/// One field per established key. Only `post` phases write here; the value
/// lives for a single run and is dropped at the end. Anything a later stage
/// must see verbatim goes through the artifact store instead.
#[derive(Debug, Default)]
pub struct StoryContext {
    /// Free-text game requirement captured from the user.
    pub requirement: Option<String>,
    /// Generated background story, post-extraction.
    pub background_story: Option<String>,
    /// Generated character sheets, post-extraction.
    pub characters: Option<String>,
    /// Chapter artifact name -> chapter text.
    pub chapters: BTreeMap<String, String>,
    /// Yarn script artifact name -> script text.
    pub yarn_scripts: BTreeMap<String, String>,
}
