//! Language detection for code blocks
//!
//! Detection order for a `pre > code` block:
//! 1. a "language label" element immediately preceding the code block (the
//!    conversation UI renders one above each fence); its text, lower-cased,
//!    is the tag
//! 2. CSS class hints already on the element (`language-rust`, `lang-rust`,
//!    `hljs-rust`, `brush:rust`)
//! 3. heuristic pattern matching on the code content
//!
//! Detection failure is non-fatal: highlighting proceeds without a hint.

use kuchiki::NodeRef;

/// Upper bound on a plausible label; anything longer is prose, not a tag.
const MAX_LABEL_LEN: usize = 30;

/// Detect the language for one code element.
pub fn language_for_code_block(code: &NodeRef) -> Option<String> {
    if let Some(lang) = label_language(code) {
        return Some(lang);
    }
    if let Some(element) = code.as_element() {
        let attrs = element.attributes.borrow();
        if let Some(class) = attrs.get("class")
            && let Some(lang) = extract_language_from_class(class)
        {
            return Some(lang);
        }
    }
    infer_language_from_content(&code.text_contents())
}

/// Read the language label element immediately preceding the code block.
///
/// Checked at two levels: the code element's own preceding sibling (label
/// rendered inside the fence container), then the enclosing `pre`'s
/// preceding sibling. Whitespace-only text nodes between label and block
/// are skipped.
fn label_language(code: &NodeRef) -> Option<String> {
    if let Some(label) = preceding_element(code)
        && let Some(lang) = usable_label_text(&label)
    {
        return Some(lang);
    }

    let parent = code.parent()?;
    let parent_is_pre = parent
        .as_element()
        .is_some_and(|el| el.name.local.as_ref() == "pre");
    if parent_is_pre
        && let Some(label) = preceding_element(&parent)
        && let Some(lang) = usable_label_text(&label)
    {
        return Some(lang);
    }
    None
}

fn preceding_element(node: &NodeRef) -> Option<NodeRef> {
    let mut current = node.previous_sibling();
    while let Some(sibling) = current {
        if sibling.as_element().is_some() {
            return Some(sibling);
        }
        // skip whitespace-only text between label and block
        if let Some(text) = sibling.as_text()
            && !text.borrow().trim().is_empty()
        {
            return None;
        }
        current = sibling.previous_sibling();
    }
    None
}

fn usable_label_text(label: &NodeRef) -> Option<String> {
    let text = label.text_contents();
    let text = text.trim();
    if text.is_empty() || text.len() > MAX_LABEL_LEN || text.contains(char::is_whitespace) {
        return None;
    }
    Some(text.to_lowercase())
}

/// Extract language from CSS class patterns
///
/// Supports: "language-rust", "lang-rust", "hljs-rust", "brush:rust"
pub fn extract_language_from_class(class: &str) -> Option<String> {
    for part in class.split_whitespace() {
        // Pattern: "language-rust" or "lang-rust"
        if let Some(lang) = part.strip_prefix("language-") {
            return Some(lang.to_string());
        }
        if let Some(lang) = part.strip_prefix("lang-") {
            return Some(lang.to_string());
        }
        // Pattern: "hljs-rust" (highlight.js)
        if let Some(lang) = part.strip_prefix("hljs-") {
            return Some(lang.to_string());
        }
        // Pattern: "brush:rust" (SyntaxHighlighter)
        if let Some(lang) = part.strip_prefix("brush:") {
            return Some(lang.trim().to_string());
        }
    }
    None
}

/// Infer programming language from code content using heuristic patterns
///
/// Fallback when neither a label nor a class hint names the language.
/// Checked in priority order; plain-text outputs first so logs and panics
/// are not misread as code.
pub fn infer_language_from_content(code: &str) -> Option<String> {
    let code = code.trim();

    // Need reasonable code sample for reliable detection
    if code.len() < 10 {
        return None;
    }

    let lower = code.to_lowercase();

    // Plain text outputs (panic, backtrace, logs)
    if code.contains("panicked at")
        || code.contains("stack backtrace:")
        || lower.contains("traceback")
        || code.contains("error:")
        || code.contains("warning:")
    {
        return Some("text".to_string());
    }

    // JSON
    if ((code.starts_with('{') && code.ends_with('}'))
        || (code.starts_with('[') && code.ends_with(']')))
        && (code.contains("\":") || code.contains("\": "))
    {
        return Some("json".to_string());
    }

    // Rust
    if code.contains("fn ")
        && (code.contains("let ") || code.contains("->") || code.contains("#[") || code.contains("::"))
    {
        return Some("rust".to_string());
    }

    // Python
    if (code.contains("def ") || code.contains("import "))
        && code.contains(':')
        && !code.contains(';')
    {
        return Some("python".to_string());
    }

    // JavaScript / TypeScript
    if code.contains("function ")
        || code.contains("const ")
        || code.contains("=>")
        || code.contains("console.log")
    {
        return Some("javascript".to_string());
    }

    // Shell commands
    if code.lines().all(|l| {
        let l = l.trim();
        l.is_empty() || l.starts_with('$') || l.starts_with('#')
    }) || code.starts_with("cargo ")
        || code.starts_with("npm ")
        || code.starts_with("git ")
    {
        return Some("bash".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::dom::fragment_element;

    #[test]
    fn test_label_preceding_code_inside_pre() {
        let pre = fragment_element("<pre><div>Python</div><code>print(1)</code></pre>").unwrap();
        let code = pre.select_first("code").unwrap();
        assert_eq!(
            language_for_code_block(code.as_node()),
            Some("python".to_string())
        );
    }

    #[test]
    fn test_label_preceding_pre() {
        let wrapper =
            fragment_element("<div><span>Rust</span><pre><code>fn main() {}</code></pre></div>")
                .unwrap();
        let code = wrapper.select_first("code").unwrap();
        assert_eq!(
            language_for_code_block(code.as_node()),
            Some("rust".to_string())
        );
    }

    #[test]
    fn test_prose_label_rejected() {
        let pre =
            fragment_element("<pre><div>This is just a sentence</div><code>x</code></pre>").unwrap();
        let code = pre.select_first("code").unwrap();
        // label unusable, content too short: no hint at all
        assert_eq!(language_for_code_block(code.as_node()), None);
    }

    #[test]
    fn test_class_hint_fallback() {
        let pre = fragment_element(r#"<pre><code class="language-go">x := 1</code></pre>"#).unwrap();
        let code = pre.select_first("code").unwrap();
        assert_eq!(language_for_code_block(code.as_node()), Some("go".to_string()));
    }

    #[test]
    fn test_extract_language_from_class_patterns() {
        assert_eq!(extract_language_from_class("language-rust"), Some("rust".into()));
        assert_eq!(extract_language_from_class("lang-py other"), Some("py".into()));
        assert_eq!(extract_language_from_class("hljs-js"), Some("js".into()));
        assert_eq!(extract_language_from_class("brush:ruby"), Some("ruby".into()));
        assert_eq!(extract_language_from_class("plain classes"), None);
    }

    #[test]
    fn test_infer_rust() {
        let code = "fn add(a: u32, b: u32) -> u32 { a + b }";
        assert_eq!(infer_language_from_content(code), Some("rust".into()));
    }

    #[test]
    fn test_infer_python() {
        let code = "import os\ndef main():\n    print(os.name)";
        assert_eq!(infer_language_from_content(code), Some("python".into()));
    }

    #[test]
    fn test_infer_panic_output_is_text() {
        let code = "thread 'main' panicked at src/main.rs:3:5";
        assert_eq!(infer_language_from_content(code), Some("text".into()));
    }

    #[test]
    fn test_infer_too_short_is_none() {
        assert_eq!(infer_language_from_content("x = 1"), None);
    }
}
