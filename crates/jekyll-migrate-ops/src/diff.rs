use similar::TextDiff;

/// Unified diff between the original and converted document, `None` when identical.
pub fn build_unified_diff(original: &str, converted: &str, path: &str) -> Option<String> {
    if original == converted {
        return None;
    }

    let diff = TextDiff::from_lines(original, converted);
    let header_old = format!("a/{path}");
    let header_new = format!("b/{path}");

    Some(
        diff.unified_diff()
            .context_radius(2)
            .header(&header_old, &header_new)
            .to_string(),
    )
}
