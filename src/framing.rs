//! Outer sentinel validation and the raw, non-failing pre-parse scans.

use crate::error::DiffError;

pub const BEGIN_PATCH_MARKER: &str = "*** Begin Patch";
pub const END_PATCH_MARKER: &str = "*** End Patch";
pub const ADD_FILE_MARKER: &str = "*** Add File: ";
pub const DELETE_FILE_MARKER: &str = "*** Delete File: ";
pub const UPDATE_FILE_MARKER: &str = "*** Update File: ";
pub const MOVE_TO_MARKER: &str = "*** Move to: ";
pub const EOF_MARKER: &str = "*** End of File";
pub const CHANGE_CONTEXT_MARKER: &str = "@@ ";
pub const EMPTY_CHANGE_CONTEXT_MARKER: &str = "@@";
pub const HUNK_TERMINATOR: &str = "***";

/// Splits on `\n`, preserving empty lines and any trailing `\r`. Normalization
/// for sentinel/prefix recognition happens at each comparison site via
/// [`strip_cr`], not here.
pub fn raw_lines(patch_text: &str) -> Vec<&str> {
    patch_text.split('\n').collect()
}

/// Drops a single trailing `\r`, tolerating `\r\n` line endings without
/// altering how lines are split.
pub fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

/// Validates the outer frame and returns the raw line sequence on success.
///
/// A body too short to contain both sentinels, or whose first line does not
/// start with `*** Begin Patch`, is a `Framing` error. A body whose last
/// line is not exactly `*** End Patch` is `UnexpectedEOF`: the input ran
/// out before the closing marker rather than being malformed up front.
pub fn validate_framing(patch_text: &str) -> Result<Vec<&str>, DiffError> {
    let lines = raw_lines(patch_text);
    if lines.len() < 2 {
        return Err(DiffError::Framing(
            "patch body is too short to contain both sentinels".to_string(),
        ));
    }
    let first = strip_cr(lines[0]);
    if !first.starts_with(BEGIN_PATCH_MARKER) {
        return Err(DiffError::Framing(format!(
            "expected first line to start with '{BEGIN_PATCH_MARKER}', found {first:?}"
        )));
    }
    let last = strip_cr(lines[lines.len() - 1]);
    if last != END_PATCH_MARKER {
        return Err(DiffError::UnexpectedEOF);
    }
    Ok(lines)
}

/// Paths an `Update`/`Delete` action will need read from, in document order.
/// Never fails: malformed bodies simply contribute no matches.
pub fn files_needed(patch_text: &str) -> Vec<String> {
    raw_lines(patch_text)
        .into_iter()
        .filter_map(|line| {
            let line = strip_cr(line);
            line.strip_prefix(UPDATE_FILE_MARKER)
                .or_else(|| line.strip_prefix(DELETE_FILE_MARKER))
                .map(str::to_string)
        })
        .collect()
}

/// Paths an `Add` action will create, in document order. Never fails.
pub fn files_added(patch_text: &str) -> Vec<String> {
    raw_lines(patch_text)
        .into_iter()
        .filter_map(|line| strip_cr(line).strip_prefix(ADD_FILE_MARKER).map(str::to_string))
        .collect()
}
