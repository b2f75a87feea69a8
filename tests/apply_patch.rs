//! Black-box coverage of the public `contextpatch` API: the lettered
//! end-to-end scenarios and the quantified invariants.

use std::collections::HashMap;

use contextpatch::{
    Chunk, DiffError, FileMap, Patch, PatchAction, apply_commit, files_added, files_needed,
    patch_to_commit, process_patch, text_to_patch,
};
use pretty_assertions::assert_eq;

fn files(pairs: &[(&str, &str)]) -> FileMap {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<HashMap<_, _>>()
}

// --- A-G: literal end-to-end scenarios -------------------------------------

#[test]
fn scenario_a_simple_update() {
    let text = "*** Begin Patch\n*** Update File: f.ts\n a\n-b\n+B\n c\n*** End Patch";
    let fs = files(&[("f.ts", "a\nb\nc\n")]);
    let out = process_patch(text, &fs).expect("patch should apply");
    assert_eq!(out, files(&[("f.ts", "a\nB\nc\n")]));
}

#[test]
fn scenario_b_add_file() {
    let text = "*** Begin Patch\n*** Add File: new.ts\n+x\n+y\n*** End Patch";
    let out = process_patch(text, &FileMap::new()).expect("patch should apply");
    assert_eq!(out, files(&[("new.ts", "x\ny")]));
}

#[test]
fn scenario_c_delete_file() {
    let text = "*** Begin Patch\n*** Delete File: d.ts\n*** End Patch";
    let fs = files(&[("d.ts", "k")]);
    let out = process_patch(text, &fs).expect("patch should apply");
    assert!(!out.contains_key("d.ts"));
}

#[test]
fn scenario_d_move() {
    let text = "*** Begin Patch\n*** Update File: old.ts\n*** Move to: new.ts\n v\n*** End Patch";
    let fs = files(&[("old.ts", "v\n")]);
    let out = process_patch(text, &fs).expect("patch should apply");
    assert!(!out.contains_key("old.ts"));
    assert_eq!(out.get("new.ts"), Some(&"v\n".to_string()));
}

#[test]
fn scenario_e_fuzzy_context_costs_one_hundred() {
    // Patch keep-line payload has a three-space indent; the file line it
    // must anchor to has only a two-space indent. Tier 1 and 2 both fail on
    // the leading-whitespace mismatch; tier 3 (full trim) succeeds at cost 100.
    let text = "*** Begin Patch\n*** Update File: s.ts\n    name: \"Section 25\",\n-  x: 1,\n+  x: 2,\n*** End Patch";
    let fs = files(&[("s.ts", "  name: \"Section 25\",\n  x: 1,\n")]);
    let (_, fuzz) = text_to_patch(text, &fs).expect("patch should parse");
    assert_eq!(fuzz, 100);
}

#[test]
fn scenario_f_not_found_is_invalid_context() {
    let text = "*** Begin Patch\n*** Update File: f.ts\n-absent\n*** End Patch";
    let fs = files(&[("f.ts", "present\n")]);
    let err = process_patch(text, &fs).expect_err("context is absent");
    assert_matches::assert_matches!(err, DiffError::InvalidContext { .. });
}

#[test]
fn scenario_g_overlapping_chunks_at_commit_time() {
    let mut patch = Patch::new();
    patch.actions.insert(
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
    );
    let fs = files(&[("f.ts", "a\nb\nc\nd\n")]);
    let err = patch_to_commit(&patch, &fs).expect_err("second chunk regresses past cursor");
    assert_matches::assert_matches!(err, DiffError::OverlappingChunks { .. });
}

// --- Quantified invariants ---------------------------------------------------

#[test]
fn invariant_framing_never_returns_partial_output() {
    let fs = files(&[("f.ts", "a\n")]);
    // A malformed body fails outright rather than returning a partial map.
    assert!(process_patch("not a patch", &fs).is_err());
    assert!(process_patch("*** Begin Patch\n*** End Patch", &fs).is_ok());
}

#[test]
fn invariant_path_disjointness() {
    let text = concat!(
        "*** Begin Patch\n",
        "*** Delete File: gone.ts\n",
        "*** Add File: fresh.ts\n",
        "+hi\n",
        "*** Update File: renamed.ts\n",
        "*** Move to: renamed2.ts\n",
        " keep\n",
        "*** End Patch",
    );
    let fs = files(&[("gone.ts", "x"), ("renamed.ts", "keep\n")]);
    let out = process_patch(text, &fs).expect("patch should apply");
    let mut output_paths: Vec<&str> = out.keys().map(String::as_str).collect();
    output_paths.sort_unstable();
    assert_eq!(output_paths, vec!["fresh.ts", "renamed2.ts"]);
}

#[test]
fn invariant_identity_on_empty_patch() {
    let fs = files(&[("f.ts", "a\n")]);
    let out = process_patch("*** Begin Patch\n*** End Patch", &fs).expect("patch should apply");
    assert!(out.is_empty());
}

#[test]
fn invariant_exact_context_contributes_zero_fuzz() {
    let text = "*** Begin Patch\n*** Update File: f.ts\n a\n-b\n+B\n*** End Patch";
    let fs = files(&[("f.ts", "a\nb\n")]);
    let (_, fuzz) = text_to_patch(text, &fs).expect("patch should parse");
    assert_eq!(fuzz, 0);
}

#[test]
fn invariant_monotone_offsets() {
    let text = "*** Begin Patch\n*** Update File: f.ts\n a\n-b\n+B\n c\n-d\n+D\n*** End Patch";
    let fs = files(&[("f.ts", "a\nb\nc\nd\n")]);
    let (patch, _) = text_to_patch(text, &fs).expect("patch should parse");
    let PatchAction::Update { chunks, .. } = patch.actions.get("f.ts").expect("action present") else {
        panic!("expected an update action");
    };
    for pair in chunks.windows(2) {
        assert!(pair[1].orig_index >= pair[0].orig_index + pair[0].del_lines.len());
    }
}

#[test]
fn invariant_cr_tolerance() {
    let with_cr = "*** Begin Patch\r\n*** Update File: f.ts\r\n a\r\n-b\r\n+B\r\n*** End Patch\r\n";
    let without_cr = "*** Begin Patch\n*** Update File: f.ts\n a\n-b\n+B\n*** End Patch\n";
    let fs = files(&[("f.ts", "a\nb\n")]);
    let out_cr = process_patch(with_cr, &fs).expect("crlf patch should apply");
    let out_no_cr = process_patch(without_cr, &fs).expect("lf patch should apply");
    assert_eq!(out_cr, out_no_cr);
}

#[test]
fn invariant_blank_line_tolerance() {
    let text = "*** Begin Patch\n*** Update File: f.ts\n a\n\n-b\n+B\n*** End Patch";
    let fs = files(&[("f.ts", "a\n\nb\n")]);
    let out = process_patch(text, &fs).expect("blank context line should match");
    assert_eq!(out.get("f.ts"), Some(&"a\n\nB\n".to_string()));
}

// --- Additional API surface --------------------------------------------------

#[test]
fn files_needed_and_files_added_never_fail() {
    let text = concat!(
        "*** Begin Patch\n",
        "*** Update File: a.ts\n",
        "*** Delete File: b.ts\n",
        "*** Add File: c.ts\n",
        "+hi\n",
        "*** End Patch",
    );
    assert_eq!(files_needed(text), vec!["a.ts".to_string(), "b.ts".to_string()]);
    assert_eq!(files_added(text), vec!["c.ts".to_string()]);
}

#[test]
fn apply_commit_omits_deleted_paths_and_writes_moved_ones() {
    let text = "*** Begin Patch\n*** Update File: a.ts\n*** Move to: b.ts\n v\n*** End Patch";
    let fs = files(&[("a.ts", "v\n")]);
    let (patch, _) = text_to_patch(text, &fs).expect("patch should parse");
    let commit = patch_to_commit(&patch, &fs).expect("commit should resolve");
    let out = apply_commit(&commit);
    assert!(!out.contains_key("a.ts"));
    assert_eq!(out.get("b.ts"), Some(&"v\n".to_string()));
}
