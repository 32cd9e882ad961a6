//! Cleanup for model output that should be markdown but arrives wrapped.
//!
//! Writer models routinely return markdown inside a JSON envelope, inside
//! code fences, or with JSON-escaped newlines. Saved files go through
//! `extract_markdown` so the viewer always renders proper markdown.

/// Strip a leading/trailing ``` fence (with optional language tag) from the
/// text. Returns the inner content, or the input unchanged if it is not
/// fenced.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let Some(start) = trimmed.find('\n') else {
        return trimmed;
    };
    let Some(end) = trimmed.rfind("```") else {
        return trimmed;
    };
    if end <= start {
        return trimmed;
    }
    trimmed[start + 1..end].trim()
}

/// Recover clean markdown from a raw model response or a previously saved
/// file. Handles, in order:
/// 1. a JSON envelope (`{"documentation": "..."}` or a bare JSON string)
/// 2. code fences around the whole document
/// 3. escaped `\n` / `\t` / `\"` sequences left by JSON-encoding markdown
pub fn extract_markdown(content: &str) -> String {
    let mut text = content.trim().to_string();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
        match value {
            serde_json::Value::String(s) => text = s,
            serde_json::Value::Object(map) => {
                if let Some(serde_json::Value::String(s)) = map.get("documentation") {
                    text = s.clone();
                }
            }
            _ => {}
        }
    }

    let text = strip_code_fences(&text).to_string();

    if looks_escaped(&text) {
        unescape(&text)
    } else {
        text
    }
}

/// Heuristic: the text carries literal backslash-n sequences but almost no
/// real newlines, so it was JSON-escaped at some point.
fn looks_escaped(text: &str) -> bool {
    let literal = text.matches("\\n").count();
    let real = text.matches('\n').count();
    literal > 2 && literal > real
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            Some('t') => {
                chars.next();
                out.push('\t');
            }
            Some('"') => {
                chars.next();
                out.push('"');
            }
            Some('\\') => {
                chars.next();
                out.push('\\');
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let input = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(input), "{\"a\": 1}");
    }

    #[test]
    fn strips_plain_fence() {
        let input = "```\n# Title\n\nBody\n```";
        assert_eq!(strip_code_fences(input), "# Title\n\nBody");
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fences("  # Title  "), "# Title");
    }

    #[test]
    fn ignores_unterminated_fence() {
        let input = "```json\n{\"a\": 1}";
        assert_eq!(strip_code_fences(input), input);
    }

    #[test]
    fn extracts_from_documentation_envelope() {
        let input = r##"{"documentation": "# App\n\nDoes things."}"##;
        assert_eq!(extract_markdown(input), "# App\n\nDoes things.");
    }

    #[test]
    fn extracts_from_bare_json_string() {
        let input = r##""# App\n\nBody""##;
        assert_eq!(extract_markdown(input), "# App\n\nBody");
    }

    #[test]
    fn unescapes_literal_newlines() {
        let input = r"# App\n\n## Usage\n\nRun it\n\nDone";
        let out = extract_markdown(input);
        assert!(out.contains("# App\n"));
        assert!(!out.contains("\\n"));
    }

    #[test]
    fn passes_clean_markdown_through() {
        let input = "# App\n\nAlready fine.";
        assert_eq!(extract_markdown(input), input);
    }

    #[test]
    fn fenced_markdown_inside_envelope() {
        let input = r#"{"documentation": "```\n# App\n```"}"#;
        assert_eq!(extract_markdown(input), "# App");
    }
}
