use crate::policy::LessThan;

#[derive(Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Copy)]
/// A range bounded inclusively below and above (`start..=end`).
///
/// Whether a key lies inside the range is decided by the tree's ordering
/// policy, not by `Ord`: the `RangeInclusive` `start..=end` contains every
/// key `x` with `!less(x, start)` and `!less(end, x)`.
pub struct RangeInclusive<K> {
    /// The lower bound of the range (inclusive).
    pub start: K,
    /// The upper bound of the range (inclusive).
    pub end: K,
}

/// Shorthand to construct a new `RangeInclusive`.
pub fn range<K>(start: K, end: K) -> RangeInclusive<K> {
    RangeInclusive { start, end }
}

impl<K> RangeInclusive<K> {
    /// Borrow the bounds ordered so that the first does not exceed the second
    /// under `less`. Inverted bounds are swapped, never rejected.
    pub fn normalized<L: LessThan<K> + ?Sized>(&self, less: &L) -> (&K, &K) {
        if less.less(&self.end, &self.start) {
            (&self.end, &self.start)
        } else {
            (&self.start, &self.end)
        }
    }

    /// Returns true if `key` lies within the range under `less`.
    ///
    /// Expects normalized bounds.
    pub fn contains<L: LessThan<K> + ?Sized>(&self, key: &K, less: &L) -> bool {
        !less.less(key, &self.start) && !less.less(&self.end, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Natural, Reversed};

    #[test]
    fn normalize_swaps_inverted_bounds() {
        assert_eq!(range(5, 1).normalized(&Natural), (&1, &5));
        assert_eq!(range(1, 5).normalized(&Natural), (&1, &5));
        assert_eq!(range(1, 5).normalized(&Reversed(Natural)), (&5, &1));
    }

    #[test]
    fn contains_is_inclusive() {
        let r = range(2, 4);
        assert!(!r.contains(&1, &Natural));
        assert!(r.contains(&2, &Natural));
        assert!(r.contains(&4, &Natural));
        assert!(!r.contains(&5, &Natural));
    }
}
