//! Similarity metrics for rename matching
//!
//! - Jaccard similarity (set overlap)
//! - Levenshtein edit distance (Wagner-Fischer)

use std::collections::HashSet;
use std::hash::Hash;

/// Jaccard similarity coefficient
///
/// J(A, B) = |A ∩ B| / |A ∪ B|
///
/// Returns a value in [0.0, 1.0] where 1.0 means identical sets and 0.0
/// means completely disjoint sets.
pub fn jaccard_similarity<T>(set_a: &HashSet<T>, set_b: &HashSet<T>) -> f64
where
    T: Eq + Hash,
{
    if set_a.is_empty() && set_b.is_empty() {
        return 1.0; // Both empty = identical
    }

    let intersection_size = set_a.intersection(set_b).count();
    let union_size = set_a.union(set_b).count();

    if union_size == 0 {
        return 0.0;
    }

    intersection_size as f64 / union_size as f64
}

/// Levenshtein edit distance (Wagner-Fischer algorithm)
///
/// Returns the minimum number of single-character edits (insertions,
/// deletions, substitutions) required to change one string into another.
///
/// Time complexity: O(m * n), space O(min(m, n)).
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    // Use two rows for space optimization
    let mut prev_row: Vec<usize> = (0..=len2).collect();
    let mut curr_row: Vec<usize> = vec![0; len2 + 1];

    for i in 1..=len1 {
        curr_row[0] = i;

        for j in 1..=len2 {
            let cost = if s1_chars[i - 1] == s2_chars[j - 1] {
                0
            } else {
                1
            };

            curr_row[j] = std::cmp::min(
                std::cmp::min(curr_row[j - 1] + 1, prev_row[j] + 1),
                prev_row[j - 1] + cost,
            );
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len2]
}

/// Normalized Levenshtein similarity: `1.0 - distance / max_length`,
/// in [0.0, 1.0].
pub fn normalized_levenshtein_similarity(s1: &str, s2: &str) -> f64 {
    let max_len = s1.chars().count().max(s2.chars().count());

    if max_len == 0 {
        return 1.0; // Both empty
    }

    let distance = levenshtein_distance(s1, s2);
    1.0 - (distance as f64 / max_len as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jaccard_identical() {
        let set_a: HashSet<i32> = vec![1, 2, 3].into_iter().collect();
        let set_b: HashSet<i32> = vec![1, 2, 3].into_iter().collect();

        assert_eq!(jaccard_similarity(&set_a, &set_b), 1.0);
    }

    #[test]
    fn test_jaccard_disjoint() {
        let set_a: HashSet<i32> = vec![1, 2, 3].into_iter().collect();
        let set_b: HashSet<i32> = vec![4, 5, 6].into_iter().collect();

        assert_eq!(jaccard_similarity(&set_a, &set_b), 0.0);
    }

    #[test]
    fn test_jaccard_partial() {
        let set_a: HashSet<i32> = vec![1, 2, 3].into_iter().collect();
        let set_b: HashSet<i32> = vec![2, 3, 4].into_iter().collect();

        // Intersection: {2, 3} = 2, union: {1, 2, 3, 4} = 4
        assert_eq!(jaccard_similarity(&set_a, &set_b), 0.5);
    }

    #[test]
    fn test_jaccard_empty() {
        let set_a: HashSet<i32> = HashSet::new();
        let set_b: HashSet<i32> = HashSet::new();

        assert_eq!(jaccard_similarity(&set_a, &set_b), 1.0);
    }

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein_distance("hello", "hello"), 0);
        assert_eq!(levenshtein_distance("hello", "hellow"), 1);
        assert_eq!(levenshtein_distance("hello", "hell"), 1);
        assert_eq!(levenshtein_distance("hello", "hallo"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("hello", ""), 5);
        assert_eq!(levenshtein_distance("", "world"), 5);
    }

    #[test]
    fn test_levenshtein_symmetry() {
        assert_eq!(
            levenshtein_distance("getCount", "getTotal"),
            levenshtein_distance("getTotal", "getCount")
        );
    }

    #[test]
    fn test_normalized_levenshtein() {
        assert_eq!(normalized_levenshtein_similarity("hello", "hello"), 1.0);
        assert_eq!(normalized_levenshtein_similarity("", ""), 1.0);

        // "hello" vs "hell" = distance 1, max_len 5, similarity = 0.8
        assert_eq!(normalized_levenshtein_similarity("hello", "hell"), 0.8);
    }

    #[test]
    fn test_normalized_levenshtein_unicode() {
        // Char-based, not byte-based: one substitution out of four.
        assert_eq!(normalized_levenshtein_similarity("café", "cafe"), 0.75);
    }
}
