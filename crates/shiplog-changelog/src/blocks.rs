//! Fenced `changes` block extraction
//!
//! Pull-request bodies are GitHub-flavored Markdown; changelog entries are
//! staged in fenced code blocks tagged `changes`. Extraction rides on the
//! Markdown tokenizer: blocks inside HTML comments never surface as code
//! block events, and fence-matching leniency (unbalanced backtick counts)
//! is whatever the tokenizer itself tolerates. The extractor only filters
//! by language tag.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

/// Language tag marking a changelog block
const CHANGES_TAG: &str = "changes";

/// Extract the raw contents of all fenced `changes` blocks from a
/// pull-request body, in document order, without deduplication.
///
/// A body with no qualifying blocks yields an empty vector; a pull request
/// may legitimately carry no changelog.
pub fn parse_change_blocks(body: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;

    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info)))
                if info.trim() == CHANGES_TAG =>
            {
                current = Some(String::new());
            }
            Event::Text(text) => {
                if let Some(buf) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(mut buf) = current.take() {
                    if buf.ends_with('\n') {
                        buf.pop();
                    }
                    blocks.push(buf);
                }
            }
            _ => {}
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(content: &str, tag: &str) -> String {
        format!("```{}\n{}\n```", tag, content)
    }

    #[test]
    fn empty_body_yields_nothing() {
        assert!(parse_change_blocks("").is_empty());
    }

    #[test]
    fn parses_single_block() {
        let input = block("section: one", "changes");
        assert_eq!(parse_change_blocks(&input), vec!["section: one"]);
    }

    #[test]
    fn parses_blocks_in_document_order() {
        let input = [
            block("section: one", "changes"),
            block("section: two", "changes"),
        ]
        .join("\n");

        assert_eq!(
            parse_change_blocks(&input),
            vec!["section: one", "section: two"]
        );
    }

    #[test]
    fn ignores_non_changes_blocks() {
        let input = [
            block("nothing", ""),
            String::new(),
            block("yaml", "yaml"),
            block("section: one", "changes"),
            block("shell", "shell"),
            String::new(),
            block("section: two", "changes"),
            block("nothing2", ""),
        ]
        .join("\n");

        assert_eq!(
            parse_change_blocks(&input),
            vec!["section: one", "section: two"]
        );
    }

    #[test]
    fn tolerates_longer_closing_fence() {
        let input = "```changes\nsection: one\n````";
        assert_eq!(parse_change_blocks(input), vec!["section: one"]);
    }

    #[test]
    fn ignores_blocks_inside_html_comments() {
        let input = [
            block("section: one", "changes"),
            "<!--".to_string(),
            block("section: hidden", "changes"),
            "-->".to_string(),
            block("section: two", "changes"),
        ]
        .join("\n");

        assert_eq!(
            parse_change_blocks(&input),
            vec!["section: one", "section: two"]
        );
    }

    #[test]
    fn keeps_empty_block() {
        let input = "```changes\n```";
        assert_eq!(parse_change_blocks(input), vec![""]);
    }

    #[test]
    fn preserves_multi_document_content() {
        let body = "intro text\n\n```changes\nsection: dhctl\ntype: feature\n---\nsection: deckhouse\ntype: feature\n```\n\ntrailing text";
        let blocks = parse_change_blocks(body);
        assert_eq!(blocks.len(), 1);
        assert_eq!(
            blocks[0],
            "section: dhctl\ntype: feature\n---\nsection: deckhouse\ntype: feature"
        );
    }

    #[test]
    fn extraction_is_idempotent() {
        let input = [
            block("section: one", "changes"),
            block("section: two", "changes"),
        ]
        .join("\n");

        assert_eq!(parse_change_blocks(&input), parse_change_blocks(&input));
    }
}
