//! Durable artifact store for pipeline outputs.
//!
//! Artifacts are the contract between stages: a producing stage's `post`
//! writes a named UTF-8 file here and the consuming stage reads it back,
//! never re-deriving the content from in-memory state. Writes fully replace
//! whatever an earlier run left behind.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

/// Artifact name of the background story.
pub const BACKGROUND_FILE: &str = "background-story.md";
/// Artifact name of the character sheets.
pub const CHARACTERS_FILE: &str = "characters.md";

const CHAPTER_PREFIX: &str = "chapter-";
const CHAPTER_EXT: &str = ".md";
const SCRIPT_EXT: &str = ".yarn";

/// Scoped read/write access to named text files under one root.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("create output directory {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Write `name`, fully replacing any earlier content.
    pub fn write(&self, name: &str, content: &str) -> Result<()> {
        let path = self.path(name);
        fs::write(&path, content).with_context(|| format!("write artifact {}", path.display()))
    }

    /// Read `name`, failing with a clear message when a predecessor stage
    /// has not produced it.
    pub fn read(&self, name: &str) -> Result<String> {
        let path = self.path(name);
        if !path.is_file() {
            return Err(anyhow!(
                "artifact missing: {name} (expected at {})",
                path.display()
            ));
        }
        fs::read_to_string(&path).with_context(|| format!("read artifact {}", path.display()))
    }

    /// Chapter artifacts present in the store, in name order.
    pub fn chapter_files(&self) -> Result<Vec<String>> {
        self.files_with(CHAPTER_PREFIX, CHAPTER_EXT)
    }

    /// Yarn script artifacts present in the store, in name order.
    pub fn script_files(&self) -> Result<Vec<String>> {
        self.files_with(CHAPTER_PREFIX, SCRIPT_EXT)
    }

    fn files_with(&self, prefix: &str, ext: &str) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("list output directory {}", self.root.display()))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry
                .with_context(|| format!("list output directory {}", self.root.display()))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with(prefix) && name.ends_with(ext) {
                files.push(name.to_string());
            }
        }
        files.sort();
        Ok(files)
    }
}

/// `chapter-03.md` style artifact name for a 1-based chapter number.
pub fn chapter_file_name(number: usize) -> String {
    format!("{CHAPTER_PREFIX}{number:02}{CHAPTER_EXT}")
}

/// Matching `.yarn` artifact name for a chapter file.
pub fn script_file_name(chapter_file: &str) -> String {
    match chapter_file.strip_suffix(CHAPTER_EXT) {
        Some(stem) => format!("{stem}{SCRIPT_EXT}"),
        None => format!("{chapter_file}{SCRIPT_EXT}"),
    }
}
