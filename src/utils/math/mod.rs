//! Sparse vector arithmetic over `term -> weight` maps.

use std::hash::Hash;

use indexmap::IndexMap;
use num::Float;

/// Σ(a_i^2)
#[inline]
pub fn norm_sq<K, N>(vec: &IndexMap<K, N>) -> N
where
    N: Float,
{
    vec.values().fold(N::zero(), |acc, &w| acc + w * w)
}

/// ||a|| = sqrt(Σ(a_i^2))
#[inline]
pub fn l2_norm<K, N>(vec: &IndexMap<K, N>) -> N
where
    N: Float,
{
    norm_sq(vec).sqrt()
}

/// Σ(a_i * b_i) over the keys of `driver` only.
/// Keys missing from `other` contribute nothing.
#[inline]
pub fn sparse_dot<K, N>(driver: &IndexMap<K, N>, other: &IndexMap<K, N>) -> N
where
    K: Hash + Eq,
    N: Float,
{
    driver.iter().fold(N::zero(), |acc, (key, &w)| {
        match other.get(key) {
            Some(&o) => acc + w * o,
            None => acc,
        }
    })
}
