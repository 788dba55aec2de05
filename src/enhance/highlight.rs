//! Syntax highlighting capability backed by syntect
//!
//! Rewrites a code element's content into inline-styled spans so the print
//! document needs no stylesheet for code. Syntax and theme sets load once
//! at first use; the text content of the element is preserved exactly.

use kuchiki::NodeRef;
use std::sync::LazyLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::error::{ExportError, ExportResult};
use crate::utils::dom::fragment_nodes;

use super::CodeHighlighter;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Syntect-backed implementation of the highlighting capability.
#[derive(Debug)]
pub struct SyntectHighlighter {
    theme: Theme,
}

impl SyntectHighlighter {
    /// Load the named theme from the bundled theme set.
    ///
    /// # Errors
    ///
    /// `CapabilityUnavailable` when the theme does not exist; acquiring the
    /// highlighter is one of the pipeline's ordered capability steps.
    pub fn new(theme_name: &str) -> ExportResult<Self> {
        let theme = THEME_SET
            .themes
            .get(theme_name)
            .ok_or_else(|| {
                ExportError::capability(
                    "syntax-highlighter",
                    format!(
                        "theme '{theme_name}' not found (available: {})",
                        THEME_SET
                            .themes
                            .keys()
                            .cloned()
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                )
            })?
            .clone();
        Ok(Self { theme })
    }
}

impl CodeHighlighter for SyntectHighlighter {
    fn highlight(&self, code: &NodeRef, language: Option<&str>) -> ExportResult<()> {
        let text = code.text_contents();
        if text.trim().is_empty() {
            return Ok(());
        }

        let syntax = language
            .and_then(|lang| SYNTAX_SET.find_syntax_by_token(lang))
            .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut rendered = String::new();
        for line in LinesWithEndings::from(&text) {
            let regions = highlighter
                .highlight_line(line, &SYNTAX_SET)
                .map_err(|e| ExportError::capability("syntax-highlighter", e))?;
            let html = styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)
                .map_err(|e| ExportError::capability("syntax-highlighter", e))?;
            rendered.push_str(&html);
        }

        // Swap the element's content for the styled spans, in place
        let old_children: Vec<NodeRef> = code.children().collect();
        for child in old_children {
            child.detach();
        }
        for node in fragment_nodes(&rendered) {
            code.append(node);
        }

        log::trace!(
            "Highlighted code block ({} bytes, language {:?})",
            text.len(),
            language
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::dom::{fragment_element, serialize_node};

    #[test]
    fn test_unknown_theme_is_capability_unavailable() {
        let err = SyntectHighlighter::new("no-such-theme").unwrap_err();
        assert!(matches!(err, ExportError::CapabilityUnavailable { .. }));
    }

    #[test]
    fn test_highlight_preserves_text_content() {
        let pre = fragment_element("<pre><code>fn main() {\n    println!(\"hi\");\n}\n</code></pre>")
            .unwrap();
        let code = pre.select_first("code").unwrap().as_node().clone();
        let before = code.text_contents();

        let highlighter = SyntectHighlighter::new("InspiredGitHub").unwrap();
        highlighter.highlight(&code, Some("rust")).unwrap();

        assert_eq!(code.text_contents(), before);
    }

    #[test]
    fn test_highlight_produces_styled_spans() {
        let pre = fragment_element("<pre><code>let x = 1;\n</code></pre>").unwrap();
        let code = pre.select_first("code").unwrap().as_node().clone();

        let highlighter = SyntectHighlighter::new("InspiredGitHub").unwrap();
        highlighter.highlight(&code, Some("rust")).unwrap();

        let html = serialize_node(&code).unwrap();
        assert!(html.contains("<span style=\"color:"));
    }

    #[test]
    fn test_no_language_falls_back_to_plain_text() {
        let pre = fragment_element("<pre><code>just words here\n</code></pre>").unwrap();
        let code = pre.select_first("code").unwrap().as_node().clone();

        let highlighter = SyntectHighlighter::new("InspiredGitHub").unwrap();
        highlighter.highlight(&code, None).unwrap();

        assert_eq!(code.text_contents(), "just words here\n");
    }

    #[test]
    fn test_empty_code_untouched() {
        let pre = fragment_element("<pre><code></code></pre>").unwrap();
        let code = pre.select_first("code").unwrap().as_node().clone();

        let highlighter = SyntectHighlighter::new("InspiredGitHub").unwrap();
        highlighter.highlight(&code, Some("rust")).unwrap();

        assert_eq!(code.children().count(), 0);
    }
}
