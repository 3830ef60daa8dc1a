//! Merge-based set operations on ascending, duplicate-free index lists.

use std::cmp::Ordering;

/// a ∩ b
pub fn intersect_sorted(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut result = Vec::with_capacity(a.len().min(b.len()));
    let mut l = 0;
    let mut r = 0;
    while l < a.len() && r < b.len() {
        match a[l].cmp(&b[r]) {
            Ordering::Less => l += 1,
            Ordering::Greater => r += 1,
            Ordering::Equal => {
                result.push(a[l]);
                l += 1;
                r += 1;
            }
        }
    }
    result
}

/// a ∪ b
pub fn union_sorted(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut result = Vec::with_capacity(a.len() + b.len());
    let mut l = 0;
    let mut r = 0;
    while l < a.len() && r < b.len() {
        match a[l].cmp(&b[r]) {
            Ordering::Less => {
                result.push(a[l]);
                l += 1;
            }
            Ordering::Greater => {
                result.push(b[r]);
                r += 1;
            }
            Ordering::Equal => {
                result.push(a[l]);
                l += 1;
                r += 1;
            }
        }
    }
    result.extend_from_slice(&a[l..]);
    result.extend_from_slice(&b[r..]);
    result
}

/// a \ b
pub fn difference_sorted(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut result = Vec::with_capacity(a.len());
    let mut r = 0;
    for &idx in a {
        while r < b.len() && b[r] < idx {
            r += 1;
        }
        if r < b.len() && b[r] == idx {
            continue;
        }
        result.push(idx);
    }
    result
}

/// Score descending, key ascending on ties. NaN scores are dropped.
pub fn sort_by_score_desc<K: Ord>(list: &mut Vec<(K, f64)>) {
    list.retain(|(_, s)| !s.is_nan());
    list.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
}
