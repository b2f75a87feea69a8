//! Applies human-readable, line-number-free patches to an in-memory
//! collection of text files.
//!
//! Patches are a sequence of per-file actions (add, delete, update, move)
//! whose update hunks are anchored by quoted context rather than line
//! numbers, with tolerant ("fuzzy") matching that accommodates
//! trailing-whitespace and leading/trailing-whitespace drift. This is meant
//! to consume patches produced by language models, for which line numbers
//! are unreliable but quoted context is usually accurate.
//!
//! Control flow is strictly acyclic and the whole engine is pure: framing →
//! parser (invoking the locator per hunk) → committer → applier.

mod commit;
mod error;
mod framing;
mod lines;
mod locator;
mod model;
mod parser;

/// The LLM-facing patch synthesizer. Not part of the engine's own public
/// API surface (`process_patch` and friends never call into it); it exists
/// so the `partial-edit` binary has something to drive the engine with.
pub mod synthesize;

pub use commit::{apply_commit, patch_to_commit};
pub use error::DiffError;
pub use framing::{files_added, files_needed};
pub use model::{Chunk, Commit, FileChange, FileMap, Patch, PatchAction};
pub use parser::text_to_patch;

/// Validates, parses, commits, and applies `patch_text` against `files_in`
/// in one call, returning the resulting file mapping. Any failure at any
/// stage surfaces as a single `DiffError` with no partial side effects; the
/// input mapping is never mutated.
pub fn process_patch(patch_text: &str, files_in: &FileMap) -> Result<FileMap, DiffError> {
    let (patch, _fuzz) = text_to_patch(patch_text, files_in)?;
    let commit = patch_to_commit(&patch, files_in)?;
    Ok(apply_commit(&commit))
}
