//! The single failure mode of the engine.
//!
//! Every fallible operation in this crate returns `Result<_, DiffError>`. Each
//! variant corresponds to one reason category; the `Display` impl leads with
//! the category name so a caller inspecting only the rendered message can
//! still discriminate them.

use thiserror::Error;

/// The engine's only error type.
///
/// Parsing, locating, and committing are fatal-on-first-error: there is no
/// partial `Patch`, `Commit`, or output file mapping on failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    #[error("Framing: {0}")]
    Framing(String),

    #[error("UnknownLine: line {line_number}: {line}")]
    UnknownLine { line_number: usize, line: String },

    #[error("DuplicateAction: path {path} appears more than once in patch")]
    DuplicateAction { path: String },

    #[error("MissingFile: {path} not found in input file collection")]
    MissingFile { path: String },

    #[error("FileExists: {path} already present in input file collection")]
    FileExists { path: String },

    #[error("BadAddLine: line {line_number} in add-file body does not start with '+': {line}")]
    BadAddLine { line_number: usize, line: String },

    #[error("BadSectionLine: line {line_number} does not start with ' ', '+', or '-': {line}")]
    BadSectionLine { line_number: usize, line: String },

    /// The Locator could not find `context` (optionally as an EOF-anchored
    /// suffix) anywhere in the target file from the current cursor onward.
    #[error("InvalidContext: path {path}: no match for context (eof={eof}): {context:?}")]
    InvalidContext {
        path: String,
        context: Vec<String>,
        eof: bool,
    },

    #[error(
        "OverlappingChunks: path {path}: chunk at {orig_index} regresses past cursor {cursor}"
    )]
    OverlappingChunks {
        path: String,
        orig_index: usize,
        cursor: usize,
    },

    #[error("RangeExceeded: path {path}: orig_index {orig_index} exceeds {len} lines")]
    RangeExceeded {
        path: String,
        orig_index: usize,
        len: usize,
    },

    #[error("EmptySection: path {path}: hunk header has no body")]
    EmptySection { path: String },

    #[error("UnexpectedEOF: input ends before closing '*** End Patch'")]
    UnexpectedEOF,

    #[error("MoveCollision: move destination {path} collides with another output path")]
    MoveCollision { path: String },
}
