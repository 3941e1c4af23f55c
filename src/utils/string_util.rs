pub trait StripCodeBlock {
    fn strip_code_block(&self) -> &str;
}

impl StripCodeBlock for str {
    /// Removes a surrounding markdown fence (```json ... ```) if present.
    fn strip_code_block(&self) -> &str {
        let trimmed = self.trim();
        if trimmed.starts_with("```")
            && let Some(pos) = trimmed.find('\n')
        {
            let inner = &trimmed[pos + 1..];
            if let Some(inner) = inner.trim_end().strip_suffix("```") {
                return inner.trim();
            }
        }
        trimmed
    }
}

/// Slice from the first `{` to the last `}`, for replies with chatter around the JSON.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
