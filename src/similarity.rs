//! String similarity for history suggestions.
//!
//! The base measure is the matching-characters ratio `2·M / (|a| + |b|)`,
//! where `M` is the number of characters the two strings have in common
//! in order (from [`similar`]'s character diff). It is 1.0 for identical
//! strings and 0.0 for strings with nothing in common.
//!
//! A plain ratio punishes a short query against a longer history entry
//! that starts with it (`"python"` vs `"python tutorial"` is only 0.57), so
//! [`score`] also aligns the shorter string against every equal-length
//! window of the longer one and keeps the better of the two, with the
//! window score discounted. Window alignment only applies when the shorter
//! string is long enough, and covers enough of the longer one, that a
//! window match means something: a one-letter query is contained in most
//! history entries.

use similar::TextDiff;

/// Length ratio at which window alignment starts to count.
const PARTIAL_MIN_LENGTH_RATIO: f64 = 1.5;

/// Length ratio beyond which window alignment no longer counts.
const PARTIAL_MAX_LENGTH_RATIO: f64 = 4.0;

/// Shortest string, in characters, that window alignment applies to.
const PARTIAL_MIN_CHARS: usize = 3;

const PARTIAL_WEIGHT: f64 = 0.9;

/// Matching-characters ratio of `a` and `b`, in `[0, 1]`.
pub fn ratio(a: &str, b: &str) -> f64 {
    f64::from(TextDiff::from_chars(a, b).ratio())
}

/// Best [`ratio`] of the shorter string against any equal-length window of the longer.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let short_len = short.chars().count();
    if short_len == 0 {
        return ratio(short, long);
    }

    let mut bounds: Vec<usize> = long.char_indices().map(|(i, _)| i).collect();
    bounds.push(long.len());
    let windows = bounds.len() - short_len;

    let mut best = 0.0_f64;
    for start in 0..windows {
        let window = &long[bounds[start]..bounds[start + short_len]];
        best = best.max(ratio(short, window));
        if best >= 1.0 {
            break;
        }
    }
    best
}

/// Similarity of `a` and `b` used to rank history suggestions, in `[0, 1]`.
pub fn score(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let full = ratio(a, b);
    let (len_a, len_b) = (a.chars().count(), b.chars().count());
    let (short_len, long_len) = (len_a.min(len_b), len_a.max(len_b));
    if short_len < PARTIAL_MIN_CHARS {
        return full;
    }

    let length_ratio = long_len as f64 / short_len as f64;
    if !(PARTIAL_MIN_LENGTH_RATIO..=PARTIAL_MAX_LENGTH_RATIO).contains(&length_ratio) {
        return full;
    }

    full.max(partial_ratio(a, b) * PARTIAL_WEIGHT)
}
