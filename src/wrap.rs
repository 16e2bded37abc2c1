/// Break free text into lines of at most `width` characters without
/// splitting words. A single word longer than `width` is cut hard at the
/// width boundary, so the loop terminates on any input. Joining the result
/// with single spaces reproduces the input with whitespace runs collapsed.
pub fn break_into_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut lines = Vec::new();
    let mut rest = normalized.as_str();
    while rest.chars().count() > width {
        // byte offset of the first character past the limit
        let limit = rest
            .char_indices()
            .nth(width)
            .map(|(i, _)| i)
            .unwrap_or_else(|| rest.len());
        let head = &rest[..limit];

        if rest[limit..].starts_with(' ') {
            // the prefix ends exactly on a word boundary
            lines.push(head.to_string());
            rest = &rest[limit + 1..];
        } else if let Some(space) = head.rfind(' ') {
            lines.push(rest[..space].to_string());
            rest = &rest[space + 1..];
        } else {
            lines.push(head.to_string());
            rest = &rest[limit..];
        }
    }
    lines.push(rest.to_string());
    lines
}
