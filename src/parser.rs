//! Recursive-descent recognizer over the patch line stream.
//!
//! Grammar (see `spec.md` §4.2 for the authoritative prose):
//!
//! ```text
//! Patch      := "*** Begin Patch" Action* "*** End Patch"
//! Action     := Update | Delete | Add
//! Update     := "*** Update File: " Path ("*** Move to: " Path)? Hunk+
//! Delete     := "*** Delete File: " Path
//! Add        := "*** Add File: " Path AddLine+
//! Hunk       := ("@@ " Anchor)? ("@@")? SectionLine+
//! SectionLine:= " " Text | "-" Text | "+" Text
//! AddLine    := "+" Text
//! ```

use crate::error::DiffError;
use crate::framing::{
    self, ADD_FILE_MARKER, CHANGE_CONTEXT_MARKER, DELETE_FILE_MARKER, EMPTY_CHANGE_CONTEXT_MARKER,
    EOF_MARKER, HUNK_TERMINATOR, MOVE_TO_MARKER, UPDATE_FILE_MARKER, strip_cr,
};
use crate::lines::split_lines;
use crate::locator::locate;
use crate::model::{Chunk, FileMap, Patch, PatchAction};

/// Parses `patch_text` against the current `files`, returning the resulting
/// `Patch` and the total fuzz accumulated across every resolved hunk.
pub fn text_to_patch(patch_text: &str, files: &FileMap) -> Result<(Patch, u64), DiffError> {
    let lines = framing::validate_framing(patch_text)?;
    let mut cursor = Cursor {
        lines: &lines,
        index: 1,
        end: lines.len() - 1,
    };
    let mut patch = Patch::new();
    let mut total_fuzz = 0u64;

    while cursor.index < cursor.end {
        let line = strip_cr(cursor.lines[cursor.index]);
        if let Some(path) = line.strip_prefix(UPDATE_FILE_MARKER) {
            let path = path.to_string();
            cursor.index += 1;
            parse_update(&mut cursor, &path, files, &mut patch, &mut total_fuzz)?;
        } else if let Some(path) = line.strip_prefix(DELETE_FILE_MARKER) {
            let path = path.to_string();
            cursor.index += 1;
            parse_delete(&path, files, &mut patch)?;
        } else if let Some(path) = line.strip_prefix(ADD_FILE_MARKER) {
            let path = path.to_string();
            cursor.index += 1;
            parse_add(&mut cursor, &path, files, &mut patch)?;
        } else {
            return Err(DiffError::UnknownLine {
                line_number: cursor.index + 1,
                line: line.to_string(),
            });
        }
    }

    Ok((patch, total_fuzz))
}

struct Cursor<'a> {
    lines: &'a [&'a str],
    index: usize,
    end: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<&str> {
        if self.index < self.end {
            Some(strip_cr(self.lines[self.index]))
        } else {
            None
        }
    }
}

fn insert_action(patch: &mut Patch, path: String, action: PatchAction) -> Result<(), DiffError> {
    if patch.actions.contains_key(&path) {
        return Err(DiffError::DuplicateAction { path });
    }
    patch.actions.insert(path, action);
    Ok(())
}

fn parse_delete(path: &str, files: &FileMap, patch: &mut Patch) -> Result<(), DiffError> {
    if !files.contains_key(path) {
        return Err(DiffError::MissingFile {
            path: path.to_string(),
        });
    }
    insert_action(patch, path.to_string(), PatchAction::Delete)
}

fn is_action_header(line: &str) -> bool {
    line.starts_with(UPDATE_FILE_MARKER)
        || line.starts_with(DELETE_FILE_MARKER)
        || line.starts_with(ADD_FILE_MARKER)
}

fn parse_add(cursor: &mut Cursor<'_>, path: &str, files: &FileMap, patch: &mut Patch) -> Result<(), DiffError> {
    if files.contains_key(path) {
        return Err(DiffError::FileExists {
            path: path.to_string(),
        });
    }
    let mut new_lines = Vec::new();
    while let Some(line) = cursor.peek() {
        if is_action_header(line) {
            break;
        }
        match line.strip_prefix('+') {
            Some(payload) => new_lines.push(payload.to_string()),
            None => {
                return Err(DiffError::BadAddLine {
                    line_number: cursor.index + 1,
                    line: line.to_string(),
                });
            }
        }
        cursor.index += 1;
    }
    let new_file = new_lines.join("\n");
    insert_action(patch, path.to_string(), PatchAction::Add { new_file })
}

enum SectionLine {
    Keep(String),
    Add(String),
    Delete(String),
}

fn classify_section_line(raw: &str, line_number: usize) -> Result<SectionLine, DiffError> {
    let mut chars = raw.chars();
    let Some(first) = chars.next() else {
        // An empty raw line is normalized to the marker-only line " " (a
        // keep-line with an empty payload), not a payload of " " itself.
        return Ok(SectionLine::Keep(String::new()));
    };
    let rest = &raw[first.len_utf8()..];
    match first {
        ' ' => Ok(SectionLine::Keep(rest.to_string())),
        '+' => Ok(SectionLine::Add(rest.to_string())),
        '-' => Ok(SectionLine::Delete(rest.to_string())),
        _ => Err(DiffError::BadSectionLine {
            line_number,
            line: raw.to_string(),
        }),
    }
}

/// True for any line that ends a hunk's section body without being consumed
/// as part of it: a new hunk header, or a top-level action/patch boundary.
fn terminates_section(line: &str) -> bool {
    line.starts_with(CHANGE_CONTEXT_MARKER)
        || line == EMPTY_CHANGE_CONTEXT_MARKER
        || line == framing::END_PATCH_MARKER
        || is_action_header(line)
}

fn parse_update(
    cursor: &mut Cursor<'_>,
    path: &str,
    files: &FileMap,
    patch: &mut Patch,
    total_fuzz: &mut u64,
) -> Result<(), DiffError> {
    let original = files.get(path).ok_or_else(|| DiffError::MissingFile {
        path: path.to_string(),
    })?;
    let file_lines = split_lines(original);

    let move_path = match cursor.peek().and_then(|line| line.strip_prefix(MOVE_TO_MARKER)) {
        Some(dest) => {
            let dest = dest.to_string();
            cursor.index += 1;
            Some(dest)
        }
        None => None,
    };

    let mut chunks = Vec::new();
    let mut file_cursor = 0usize;
    let mut saw_hunk = false;

    loop {
        let Some(line) = cursor.peek() else { break };
        if is_action_header(line) {
            break;
        }

        let mut anchor_fuzz = 0u64;
        if let Some(anchor) = line.strip_prefix(CHANGE_CONTEXT_MARKER) {
            let anchor = anchor.to_string();
            cursor.index += 1;
            file_cursor = resolve_anchor(&file_lines, &anchor, file_cursor, path, &mut anchor_fuzz)?;
        } else if line == EMPTY_CHANGE_CONTEXT_MARKER {
            cursor.index += 1;
        }

        let hunk_fuzz = parse_hunk_body(cursor, path, &file_lines, file_cursor, &mut chunks)?;
        *total_fuzz += anchor_fuzz + hunk_fuzz.0;
        file_cursor = hunk_fuzz.1;
        saw_hunk = true;
    }

    if !saw_hunk {
        return Err(DiffError::EmptySection {
            path: path.to_string(),
        });
    }

    insert_action(
        patch,
        path.to_string(),
        PatchAction::Update { chunks, move_path },
    )
}

/// Advances `file_cursor` to the line after the first match of `anchor`,
/// searching forward only (anchors before the current cursor are ignored).
/// Tries an exact line match first, then a fully-trimmed match (+1 fuzz).
fn resolve_anchor(
    file_lines: &[String],
    anchor: &str,
    file_cursor: usize,
    path: &str,
    fuzz_out: &mut u64,
) -> Result<usize, DiffError> {
    if let Some(pos) = (file_cursor..file_lines.len()).find(|&i| file_lines[i] == anchor) {
        return Ok(pos + 1);
    }
    if let Some(pos) = (file_cursor..file_lines.len()).find(|&i| file_lines[i].trim() == anchor.trim()) {
        *fuzz_out += 1;
        return Ok(pos + 1);
    }
    Err(DiffError::InvalidContext {
        path: path.to_string(),
        context: vec![anchor.to_string()],
        eof: false,
    })
}

/// Parses one hunk's section lines, rebases its chunks against `file_lines`
/// via the Locator, and appends them to `chunks`. Returns `(fuzz, new
/// file_cursor)`.
fn parse_hunk_body(
    cursor: &mut Cursor<'_>,
    path: &str,
    file_lines: &[String],
    file_cursor: usize,
    chunks: &mut Vec<Chunk>,
) -> Result<(u64, usize), DiffError> {
    let mut old_lines: Vec<String> = Vec::new();
    let mut local_chunks: Vec<Chunk> = Vec::new();
    let mut pending_del: Vec<String> = Vec::new();
    let mut pending_ins: Vec<String> = Vec::new();
    let mut pending_start: Option<usize> = None;
    let mut eof = false;
    let mut saw_line = false;

    loop {
        let Some(line) = cursor.peek() else { break };
        if line == EOF_MARKER {
            eof = true;
            cursor.index += 1;
            break;
        }
        if line == HUNK_TERMINATOR {
            cursor.index += 1;
            break;
        }
        if terminates_section(line) {
            break;
        }

        saw_line = true;
        match classify_section_line(line, cursor.index + 1)? {
            SectionLine::Keep(text) => {
                if !pending_del.is_empty() || !pending_ins.is_empty() {
                    local_chunks.push(Chunk {
                        orig_index: pending_start.unwrap_or_else(|| unreachable!("pending run without a start")),
                        del_lines: std::mem::take(&mut pending_del),
                        ins_lines: std::mem::take(&mut pending_ins),
                    });
                    pending_start = None;
                }
                old_lines.push(text);
            }
            SectionLine::Delete(text) => {
                if pending_start.is_none() {
                    pending_start = Some(old_lines.len());
                }
                pending_del.push(text.clone());
                old_lines.push(text);
            }
            SectionLine::Add(text) => {
                if pending_start.is_none() {
                    pending_start = Some(old_lines.len());
                }
                pending_ins.push(text);
            }
        }
        cursor.index += 1;
    }

    if !saw_line {
        return Err(DiffError::EmptySection {
            path: path.to_string(),
        });
    }
    if !pending_del.is_empty() || !pending_ins.is_empty() {
        local_chunks.push(Chunk {
            orig_index: pending_start.unwrap_or_else(|| unreachable!("pending run without a start")),
            del_lines: pending_del,
            ins_lines: pending_ins,
        });
    }

    let (pos, fuzz) = locate(file_lines, &old_lines, file_cursor, eof).ok_or_else(|| DiffError::InvalidContext {
        path: path.to_string(),
        context: old_lines.clone(),
        eof,
    })?;

    for mut chunk in local_chunks {
        chunk.orig_index += pos;
        chunks.push(chunk);
    }

    Ok((fuzz, pos + old_lines.len()))
}
