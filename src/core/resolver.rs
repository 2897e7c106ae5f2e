//! Fuzzy identifier resolver
//!
//! Nearest-match lookup used when a supplied item identifier does not
//! resolve against the catalog. The result is only ever surfaced as a
//! "did you mean ...?" suggestion; it is never auto-selected.

/// Levenshtein edit distance between two strings
///
/// Classic O(n*m) dynamic program over two rows; substitution, insertion,
/// and deletion each cost 1. Operates on Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;

        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            let insertion = current[j] + 1;
            let deletion = previous[j + 1] + 1;
            current[j + 1] = substitution.min(insertion).min(deletion);
        }

        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// The candidate closest to `target` by edit distance
///
/// Ties are broken by first encounter in the candidate enumeration, so a
/// stable candidate order gives a stable suggestion. Returns `None` for an
/// empty candidate set.
pub fn closest<'a>(target: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;

    for candidate in candidates {
        let distance = levenshtein(target, candidate);
        // Strict comparison keeps the first-encountered candidate on ties
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }

    best.map(|(candidate, _)| candidate)
}
