//! Committer and applier: resolves a parsed `Patch` against the original
//! file collection into a `Commit`, then materializes the `Commit` into the
//! output file mapping.

use std::collections::HashSet;

use crate::error::DiffError;
use crate::lines::{ends_with_newline, join_lines, split_lines};
use crate::model::{Commit, FileChange, FileMap, Patch, PatchAction};

/// Resolves every action in `patch` against `files`, producing a `Commit`.
///
/// Chunk overlap and range checks (invariants 3 and 4) are enforced here,
/// during content synthesis, rather than during parsing, since they depend
/// on walking a single `Update`'s chunks in order against the original file.
/// Move-destination collisions (invariant 5) are checked once the full set
/// of output paths is known.
pub fn patch_to_commit(patch: &Patch, files: &FileMap) -> Result<Commit, DiffError> {
    check_move_collisions(patch)?;

    let mut commit = Commit::new();
    for (path, action) in &patch.actions {
        let change = match action {
            PatchAction::Add { new_file } => FileChange::Add {
                new_content: new_file.clone(),
            },
            PatchAction::Delete => {
                let old_content = files
                    .get(path)
                    .ok_or_else(|| DiffError::MissingFile { path: path.clone() })?
                    .clone();
                FileChange::Delete { old_content }
            }
            PatchAction::Update { chunks, move_path } => {
                let old_content = files
                    .get(path)
                    .ok_or_else(|| DiffError::MissingFile { path: path.clone() })?
                    .clone();
                let new_content = synthesize_update(path, &old_content, chunks)?;
                FileChange::Update {
                    old_content,
                    new_content,
                    move_path: move_path.clone(),
                }
            }
        };
        commit.changes.insert(path.clone(), change);
    }
    Ok(commit)
}

fn synthesize_update(
    path: &str,
    old_content: &str,
    chunks: &[crate::model::Chunk],
) -> Result<String, DiffError> {
    let trailing_newline = ends_with_newline(old_content);
    let orig_lines = split_lines(old_content);

    let mut new_lines: Vec<String> = Vec::new();
    let mut cursor = 0usize;
    for chunk in chunks {
        if chunk.orig_index > orig_lines.len() {
            return Err(DiffError::RangeExceeded {
                path: path.to_string(),
                orig_index: chunk.orig_index,
                len: orig_lines.len(),
            });
        }
        if cursor > chunk.orig_index {
            return Err(DiffError::OverlappingChunks {
                path: path.to_string(),
                orig_index: chunk.orig_index,
                cursor,
            });
        }
        new_lines.extend_from_slice(&orig_lines[cursor..chunk.orig_index]);
        new_lines.extend(chunk.ins_lines.iter().cloned());
        cursor = chunk.orig_index + chunk.del_lines.len();
    }
    new_lines.extend_from_slice(&orig_lines[cursor..]);

    Ok(join_lines(&new_lines, trailing_newline))
}

/// Each action contributes at most one path to the final output mapping:
/// its own path, unless it's a `Delete` (no output) or an `Update` with a
/// `move_path` (output under the new path instead). Two actions landing on
/// the same output path is a collision regardless of which actions they are.
fn check_move_collisions(patch: &Patch) -> Result<(), DiffError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for (path, action) in &patch.actions {
        let output_path = match action {
            PatchAction::Delete => continue,
            PatchAction::Update { move_path: Some(dest), .. } => dest.as_str(),
            PatchAction::Add { .. } | PatchAction::Update { .. } => path.as_str(),
        };
        if !seen.insert(output_path) {
            return Err(DiffError::MoveCollision {
                path: output_path.to_string(),
            });
        }
    }
    Ok(())
}

/// Materializes `commit` into a fresh file mapping containing only the
/// paths affected by the patch: `Delete`d paths are absent, `Update`s with a
/// `move_path` are written under the new path only.
pub fn apply_commit(commit: &Commit) -> FileMap {
    let mut out = FileMap::new();
    for (path, change) in &commit.changes {
        match change {
            FileChange::Add { new_content } => {
                out.insert(path.clone(), new_content.clone());
            }
            FileChange::Delete { .. } => {}
            FileChange::Update {
                new_content,
                move_path,
                ..
            } => {
                let dest = move_path.clone().unwrap_or_else(|| path.clone());
                out.insert(dest, new_content.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Chunk;
    use std::collections::HashMap;

    #[test]
    fn update_synthesizes_replacement() {
        let patch = Patch {
            actions: [(
                "f.ts".to_string(),
                PatchAction::Update {
                    chunks: vec![Chunk {
                        orig_index: 1,
                        del_lines: vec!["b".to_string()],
                        ins_lines: vec!["B".to_string()],
                    }],
                    move_path: None,
                },
            )]
            .into_iter()
            .collect(),
        };
        let files: FileMap = HashMap::from([("f.ts".to_string(), "a\nb\nc\n".to_string())]);
        let commit = patch_to_commit(&patch, &files).expect("should commit");
        let out = apply_commit(&commit);
        assert_eq!(out.get("f.ts"), Some(&"a\nB\nc\n".to_string()));
    }

    #[test]
    fn overlapping_chunks_are_rejected() {
        let patch = Patch {
            actions: [(
                "f.ts".to_string(),
                PatchAction::Update {
                    chunks: vec![
                        Chunk {
                            orig_index: 2,
                            del_lines: vec!["b".to_string(), "c".to_string()],
                            ins_lines: vec![],
                        },
                        Chunk {
                            orig_index: 2,
                            del_lines: vec![],
                            ins_lines: vec!["X".to_string()],
                        },
                    ],
                    move_path: None,
                },
            )]
            .into_iter()
            .collect(),
        };
        let files: FileMap = HashMap::from([("f.ts".to_string(), "a\nb\nc\nd\n".to_string())]);
        assert_matches::assert_matches!(
            patch_to_commit(&patch, &files),
            Err(DiffError::OverlappingChunks { .. })
        );
    }

    #[test]
    fn move_destination_collision_is_rejected() {
        let patch = Patch {
            actions: [
                (
                    "old.ts".to_string(),
                    PatchAction::Update {
                        chunks: vec![],
                        move_path: Some("shared.ts".to_string()),
                    },
                ),
                (
                    "shared.ts".to_string(),
                    PatchAction::Add {
                        new_file: "fresh".to_string(),
                    },
                ),
            ]
            .into_iter()
            .collect(),
        };
        let files: FileMap = HashMap::from([("old.ts".to_string(), "v\n".to_string())]);
        assert_matches::assert_matches!(
            patch_to_commit(&patch, &files),
            Err(DiffError::MoveCollision { .. })
        );
    }
}
