//! Typo-tolerant string comparison for product lookup.
//!
//! Optimal string alignment distance (edits plus adjacent transpositions),
//! with a budget scaled to the reference length so short names never match
//! loosely.

/// Edit distance between two strings: insertions, deletions, substitutions
/// and adjacent transpositions, each costing 1.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let cols = b.len() + 1;
    let mut prev_prev: Vec<usize> = vec![0; cols];
    let mut prev: Vec<usize> = (0..cols).collect();
    let mut curr: Vec<usize> = vec![0; cols];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut d = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                d = d.min(prev_prev[j - 2] + 1);
            }
            curr[j] = d;
        }
        std::mem::swap(&mut prev_prev, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Typo budget for a reference of `len` characters.
pub fn max_distance_for(len: usize) -> usize {
    match len {
        0..=3 => 0,
        4..=5 => 1,
        _ => 2,
    }
}

/// True when `candidate` is within the typo budget of `reference`.
///
/// The budget comes from the reference side, so a short user token cannot
/// drift onto a long substance name and vice versa.
pub fn within_typo_distance(candidate: &str, reference: &str) -> bool {
    let bound = max_distance_for(reference.chars().count());
    if bound == 0 {
        return false;
    }
    let candidate_len = candidate.chars().count();
    let reference_len = reference.chars().count();
    if candidate_len.abs_diff(reference_len) > bound {
        return false;
    }
    edit_distance(candidate, reference) <= bound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_have_zero_distance() {
        assert_eq!(edit_distance("millepertuis", "millepertuis"), 0);
        assert_eq!(edit_distance("", ""), 0);
    }

    #[test]
    fn test_empty_side_counts_other_side() {
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", ""), 3);
    }

    #[test]
    fn test_single_edits() {
        assert_eq!(edit_distance("spiruline", "spirulines"), 1);
        assert_eq!(edit_distance("spiruline", "spirulin"), 1);
        assert_eq!(edit_distance("spiruline", "spiraline"), 1);
    }

    #[test]
    fn test_dropped_letter_in_long_name() {
        assert_eq!(edit_distance("milepertuis", "millepertuis"), 1);
    }

    #[test]
    fn test_adjacent_transposition_costs_one() {
        assert_eq!(edit_distance("millepetruis", "millepertuis"), 1);
        assert_eq!(edit_distance("cahrbon", "charbon"), 1);
    }

    #[test]
    fn test_budget_scales_with_length() {
        assert_eq!(max_distance_for(3), 0);
        assert_eq!(max_distance_for(4), 1);
        assert_eq!(max_distance_for(5), 1);
        assert_eq!(max_distance_for(6), 2);
        assert_eq!(max_distance_for(12), 2);
    }

    #[test]
    fn test_short_references_never_fuzzy_match() {
        // Zero budget: short names only ever match exactly, elsewhere.
        assert!(!within_typo_distance("diu", "diu"));
        assert!(!within_typo_distance("dia", "diu"));
        assert!(!within_typo_distance("yaz", "yz"));
    }

    #[test]
    fn test_typo_within_budget_matches() {
        assert!(within_typo_distance("milepertuis", "millepertuis"));
        assert!(within_typo_distance("milepertui", "millepertuis"));
        assert!(within_typo_distance("spirulina", "spiruline"));
    }

    #[test]
    fn test_typo_outside_budget_rejected() {
        assert!(!within_typo_distance("milleperle", "millepertuis"));
        assert!(!within_typo_distance("vitamine", "millepertuis"));
    }

    #[test]
    fn test_length_gap_short_circuits() {
        assert!(!within_typo_distance("mille", "millepertuis"));
    }
}
