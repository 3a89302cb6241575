//! Fenced-block extraction for model replies.
//!
//! Models tend to wrap payloads in commentary. Stages keep only the fenced
//! blocks tagged for them and fall back to the raw reply when no tagged
//! block is present, so a well-behaved reply and a chatty one normalize to
//! the same artifact.

use regex::Regex;

/// Extract every fenced block marked with `tag` from `raw`, joining the
/// block bodies with one blank line in source order. Returns `raw`
/// unchanged when no tagged block exists.
pub fn extract_tagged_blocks(raw: &str, tag: &str) -> String {
    let pattern = format!(r"(?s)```{}\s+(.*?)```", regex::escape(tag));
    let fence = Regex::new(&pattern).expect("escaped tag always forms a valid pattern");
    let blocks: Vec<&str> = fence
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .map(|body| body.as_str().trim_end_matches('\n'))
        .collect();
    if blocks.is_empty() {
        raw.to_string()
    } else {
        blocks.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_block_yields_its_body_without_fences() {
        let raw = "Here you go:\n```markdown\n# Title\n\nBody text.\n```\nHope that helps!";
        assert_eq!(extract_tagged_blocks(raw, "markdown"), "# Title\n\nBody text.");
    }

    #[test]
    fn no_block_passes_raw_text_through() {
        let raw = "plain reply with no fences";
        assert_eq!(extract_tagged_blocks(raw, "markdown"), raw);
    }

    #[test]
    fn two_blocks_join_with_one_blank_line_in_source_order() {
        let raw = "```markdown\nfirst\n```\nsome chatter\n```markdown\nsecond\n```";
        assert_eq!(extract_tagged_blocks(raw, "markdown"), "first\n\nsecond");
    }

    #[test]
    fn other_tags_do_not_match() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_tagged_blocks(raw, "markdown"), raw);
        assert_eq!(extract_tagged_blocks(raw, "json"), "{\"a\": 1}");
    }

    #[test]
    fn yarn_blocks_extract_like_markdown_ones() {
        let raw = "Sure:\n```yarn\ntitle: Start\n---\nMara: Hello.\n===\n```";
        assert_eq!(
            extract_tagged_blocks(raw, "yarn"),
            "title: Start\n---\nMara: Hello.\n==="
        );
    }
}
