//! Fuzzy string similarity on a 0-100 scale
//!
//! `ratio` is the normalized indel similarity `2 * LCS / (|a| + |b|)`.
//! `partial_ratio` slides the shorter string over the longer one (including
//! windows hanging off either edge) and keeps the best `ratio`, so a short
//! string that occurs almost verbatim inside a longer one scores close to 100.

/// Normalized indel similarity of two strings, 100 meaning identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Best [`ratio`] of the shorter string against any alignment in the longer one.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (needle, haystack) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let best = best_alignment(needle, haystack);

    // Equal lengths have no natural needle, try both ways
    if a.len() == b.len() && best < 100.0 {
        return best.max(best_alignment(haystack, needle));
    }
    best
}

fn best_alignment(needle: &[char], haystack: &[char]) -> f64 {
    let n = needle.len();
    let h = haystack.len();
    let mut best = 0.0f64;

    // Partial windows entering from the left edge
    for end in 1..n {
        best = best.max(ratio_chars(needle, &haystack[..end]));
    }

    for start in 0..=(h - n) {
        best = best.max(ratio_chars(needle, &haystack[start..start + n]));
        if best >= 100.0 {
            return 100.0;
        }
    }

    // Partial windows leaving through the right edge
    for start in (h - n + 1)..h {
        best = best.max(ratio_chars(needle, &haystack[start..]));
    }

    best
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// Length of the longest common subsequence
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
