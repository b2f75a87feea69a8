//! Line splitting/joining that round-trips exactly on the original content.
//!
//! `split_lines` followed by `join_lines` with the `trailing_newline` flag it
//! recorded must be the identity on the input. This matters beyond symmetry:
//! the Locator's EOF suffix match indexes against the *same* line array the
//! committer walks, so an off-by-one here (e.g. a phantom empty final line
//! from a naive `split('\n')`) would make EOF-anchored hunks match one
//! position too early.

/// Splits `content` on `\n` into owned lines, dropping the single trailing
/// empty element that a content ending in `\n` would otherwise produce.
pub fn split_lines(content: &str) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();
    if lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

/// Whether `content` ends with `\n`, i.e. whether `split_lines(content)`
/// dropped a trailing empty element.
pub fn ends_with_newline(content: &str) -> bool {
    content.ends_with('\n')
}

/// Inverse of `split_lines`: rejoins `lines` with `\n`, appending a final
/// `\n` iff `trailing_newline` is set.
pub fn join_lines(lines: &[String], trailing_newline: bool) -> String {
    let mut joined = lines.join("\n");
    if trailing_newline {
        joined.push('\n');
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_trailing_newline() {
        let content = "a\nb\nc\n";
        let lines = split_lines(content);
        assert_eq!(lines, vec!["a", "b", "c"]);
        assert_eq!(join_lines(&lines, ends_with_newline(content)), content);
    }

    #[test]
    fn round_trips_no_trailing_newline() {
        let content = "a\nb\nc";
        let lines = split_lines(content);
        assert_eq!(lines, vec!["a", "b", "c"]);
        assert_eq!(join_lines(&lines, ends_with_newline(content)), content);
    }

    #[test]
    fn round_trips_empty() {
        let content = "";
        let lines = split_lines(content);
        assert!(lines.is_empty());
        assert_eq!(join_lines(&lines, ends_with_newline(content)), content);
    }

    #[test]
    fn round_trips_lone_newline() {
        let content = "\n";
        let lines = split_lines(content);
        assert_eq!(lines, vec![""]);
        assert_eq!(join_lines(&lines, ends_with_newline(content)), content);
    }
}
