//! Data model: the parsed `Patch`, its per-file `PatchAction`s, and the
//! resolved `Commit` that the applier materializes into a file mapping.

use std::collections::HashMap;

use indexmap::IndexMap;

/// A file path to file content mapping. Keys are matched by exact string
/// equality; no path normalization is performed anywhere in this crate.
pub type FileMap = HashMap<String, String>;

/// A single contiguous edit inside an `Update` action.
///
/// `orig_index` is rebased by the Locator to be absolute within the target
/// file's line array before the chunk is stored here; it is never relative
/// to a hunk's local `old` sequence once parsing of that hunk completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub orig_index: usize,
    pub del_lines: Vec<String>,
    pub ins_lines: Vec<String>,
}

/// One file-level operation within a patch.
///
/// `move_path` is only representable on `Update`, matching the data model's
/// rule that the field is meaningless elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchAction {
    Add {
        new_file: String,
    },
    Delete,
    Update {
        chunks: Vec<Chunk>,
        move_path: Option<String>,
    },
}

/// An ordered mapping from file path to `PatchAction`. A path appears at most
/// once; the parser rejects duplicates as `DiffError::DuplicateAction`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    pub actions: IndexMap<String, PatchAction>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The commit-level view of a single path's change: resolved content rather
/// than chunks, ready for materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Add {
        new_content: String,
    },
    Delete {
        old_content: String,
    },
    Update {
        old_content: String,
        new_content: String,
        move_path: Option<String>,
    },
}

/// An ordered mapping from path to `FileChange`, structurally isomorphic to
/// the `Patch` it was derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
    pub changes: IndexMap<String, FileChange>,
}

impl Commit {
    pub fn new() -> Self {
        Self::default()
    }
}
