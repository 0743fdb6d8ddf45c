use regex::Regex;
use serde_json::Value;

/// Recover a structured value from free-form model output.
///
/// Strategies, each attempted only when the previous one fails:
/// 1. parse the trimmed text directly;
/// 2. strip wrapper artifacts (code fences, leading labels like
///    "Here's the JSON:") and parse the cleaned text;
/// 3. parse the substring between the first `{` and the last `}` of the
///    cleaned text.
///
/// Returns `None` for empty input or when every strategy fails. Partial or
/// corrupted structures are never repaired; callers fall back instead.
pub fn recover_structure(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    let cleaned = strip_wrappers(trimmed);
    if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
        return Some(value);
    }

    // Last resort: slice between the outermost braces. Cheapest strategies
    // run first because this one can capture nested-but-wrong braces.
    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&cleaned[start..=end]).ok()
}

/// Remove code-fence markers and a leading prose label ("Analysis:",
/// "Here's the JSON:") that models commonly wrap payloads in.
fn strip_wrappers(text: &str) -> String {
    let fences = Regex::new(r"(?i)```(?:json)?").unwrap();
    let cleaned = fences.replace_all(text, "");
    let cleaned = cleaned.trim();

    // A short label ending in a colon before the first brace/bracket.
    let label = Regex::new(r#"(?s)^[^{}\[\]"]{0,80}?:\s*"#).unwrap();
    label.replace(cleaned, "").trim().to_string()
}
