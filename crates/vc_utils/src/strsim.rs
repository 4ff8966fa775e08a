//! Bounded string distance.

use alloc::vec::Vec;

/// Case-insensitive Levenshtein distance between `a` and `b`, bounded by `max`.
///
/// Returns `None` as soon as the distance is known to exceed `max`,
/// so comparing against long unrelated names stays cheap.
///
/// Letters are compared after Unicode lowercase folding.
///
/// # Examples
///
/// ```
/// use vc_utils::strsim::folded_distance;
///
/// assert_eq!(folded_distance("mystring", "myString", 2), Some(0));
/// assert_eq!(folded_distance("ag", "age", 2), Some(1));
/// assert_eq!(folded_distance("ag", "spouse", 2), None);
/// ```
pub fn folded_distance(a: &str, b: &str, max: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().flat_map(char::to_lowercase).collect();
    let b: Vec<char> = b.chars().flat_map(char::to_lowercase).collect();

    if a.len().abs_diff(b.len()) > max {
        return None;
    }
    if b.is_empty() {
        return Some(a.len());
    }

    // Two DP rows: distances between `a[..i]` and `b[..j]`.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = alloc::vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        let mut row_min = curr[0];

        for j in 1..=b.len() {
            let cost = usize::from(ca != b[j - 1]);
            let d = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
            curr[j] = d;
            row_min = row_min.min(d);
        }

        if row_min > max {
            return None;
        }
        core::mem::swap(&mut prev, &mut curr);
    }

    let distance = prev[b.len()];
    (distance <= max).then_some(distance)
}
