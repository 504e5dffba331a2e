use std::{cmp::Ordering, collections::HashMap, hash::Hash};

pub fn norm_1<K: Eq + Hash>(v: &HashMap<K, f64, ahash::RandomState>) -> f64 {
    v.values().map(|x| x.abs()).sum()
}

/// `Σ |a[i] - b[i]|`.
pub fn distance_1(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

/// `f64` under IEEE total ordering, usable as a sort key.
#[derive(Debug, Clone, Copy)]
pub struct FullOrdFloat(pub f64);

impl PartialOrd for FullOrdFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for FullOrdFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
impl PartialEq for FullOrdFloat {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for FullOrdFloat {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance() {
        assert_eq!(distance_1(&[0.5, 0.5], &[0.25, 0.75]), 0.5);
        assert_eq!(distance_1(&[], &[]), 0.0);
    }

    #[test]
    fn norm() {
        let v: HashMap<_, _, ahash::RandomState> = [(1, 0.25), (2, -0.5)].into_iter().collect();
        assert_eq!(norm_1(&v), 0.75);
    }

    #[test]
    fn full_ord() {
        let mut xs = vec![FullOrdFloat(0.3), FullOrdFloat(-1.0), FullOrdFloat(0.1)];
        xs.sort();
        let xs: Vec<_> = xs.into_iter().map(|x| x.0).collect();
        assert_eq!(xs, vec![-1.0, 0.1, 0.3]);
    }
}
