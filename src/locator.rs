//! Fuzzy context matching.
//!
//! Given a file's line array and a hunk's context lines, find the position at
//! which the context matches under a tiered equality ladder, from exact
//! equality down to whitespace-trimmed equality, tracking how much fuzz the
//! match cost. `*** End of File`-anchored hunks get a suffix-first strategy
//! with a large fallback penalty so a misanchored EOF hunk is still
//! observable in the total fuzz rather than silently accepted or rejected.

/// Fuzz contributed by a tier-1 (exact) match.
pub const FUZZ_EXACT: u64 = 0;
/// Fuzz contributed by a tier-2 (trailing-whitespace-insensitive) match.
pub const FUZZ_RSTRIP: u64 = 1;
/// Fuzz contributed by a tier-3 (fully-trimmed) match.
pub const FUZZ_TRIM: u64 = 100;
/// Penalty added when an EOF-anchored context only matched via the forward
/// fallback search rather than as a literal suffix of the file.
pub const FUZZ_EOF_FALLBACK: u64 = 10_000;

const TIERS: [u64; 3] = [FUZZ_EXACT, FUZZ_RSTRIP, FUZZ_TRIM];

/// Finds `context` in `lines`, returning `(position, fuzz)`.
///
/// An empty `context` matches at `start` with zero fuzz. If `eof` is set,
/// the context is first checked as a literal suffix of `lines` under the
/// three-tier ladder; only if that fails does the locator fall back to a
/// forward scan from `start`, adding `FUZZ_EOF_FALLBACK` to whatever tier
/// the fallback matched under. Without `eof`, the forward scan from `start`
/// is the only strategy.
pub fn locate(lines: &[String], context: &[String], start: usize, eof: bool) -> Option<(usize, u64)> {
    if context.is_empty() {
        return Some((start, 0));
    }
    if context.len() > lines.len() {
        return None;
    }

    if eof {
        let suffix_pos = lines.len() - context.len();
        for (tier_idx, &fuzz) in TIERS.iter().enumerate() {
            if matches_at(lines, context, suffix_pos, tier_idx) {
                return Some((suffix_pos, fuzz));
            }
        }
        return forward_scan(lines, context, start).map(|(pos, fuzz)| (pos, fuzz + FUZZ_EOF_FALLBACK));
    }

    forward_scan(lines, context, start)
}

fn forward_scan(lines: &[String], context: &[String], start: usize) -> Option<(usize, u64)> {
    let last_start = lines.len() - context.len();
    for (tier_idx, &fuzz) in TIERS.iter().enumerate() {
        if start > last_start {
            continue;
        }
        for pos in start..=last_start {
            if matches_at(lines, context, pos, tier_idx) {
                return Some((pos, fuzz));
            }
        }
    }
    None
}

/// `tier_idx` is 0 (exact), 1 (rstrip), or 2 (full trim), indexing `TIERS`.
fn matches_at(lines: &[String], context: &[String], pos: usize, tier_idx: usize) -> bool {
    if pos + context.len() > lines.len() {
        return false;
    }
    context.iter().enumerate().all(|(offset, want)| {
        let have = &lines[pos + offset];
        match tier_idx {
            0 => have == want,
            1 => have.trim_end() == want.trim_end(),
            2 => have.trim() == want.trim(),
            _ => unreachable!("only three tiers are defined"),
        }
    })
}
