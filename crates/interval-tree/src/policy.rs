//! Ordering and collision policies.
//!
//! Both are one-method traits with blanket implementations for plain
//! closures, so a tree can be built from `|a, b| a < b` just as easily as
//! from one of the strategy types below.

use std::cmp::Ordering;

use serde::Deserialize;

/// A strict less-than predicate over keys.
///
/// The tree trusts the predicate to be a strict weak order. A predicate that
/// is not transitive or not irreflexive leaves the tree in an unspecified
/// (but memory safe) shape.
pub trait LessThan<K: ?Sized> {
    fn less(&self, a: &K, b: &K) -> bool;
}

impl<K: ?Sized, F> LessThan<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

/// Two keys are equivalent when neither is less than the other.
#[inline]
pub fn equivalent<K: ?Sized, L: LessThan<K> + ?Sized>(less: &L, a: &K, b: &K) -> bool {
    !less.less(a, b) && !less.less(b, a)
}

/// Turn a less-than predicate into a three-way comparison of `a` against `b`.
///
/// `less(a, b)` is asked first, so a predicate that claims both directions
/// resolves to `Less`.
#[inline]
pub fn compare<K: ?Sized, L: LessThan<K> + ?Sized>(less: &L, a: &K, b: &K) -> Ordering {
    if less.less(a, b) {
        Ordering::Less
    } else if less.less(b, a) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Orders keys by their `Ord` implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> LessThan<K> for Natural {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }
}

/// Inverts another ordering.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Reversed<L>(pub L);

impl<K: ?Sized, L: LessThan<K>> LessThan<K> for Reversed<L> {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self.0.less(b, a)
    }
}

/// Merges a newly inserted value into the values already stored under an
/// equivalent key.
///
/// The key is only lent out, so a handler cannot reorder the tree; it is free
/// to rewrite `values` in any way, including leaving it empty.
pub trait CollisionHandler<K, V> {
    fn combine(&self, key: &K, values: &mut Vec<V>, value: V);
}

impl<K, V, F> CollisionHandler<K, V> for F
where
    F: Fn(&K, &mut Vec<V>, V),
{
    #[inline]
    fn combine(&self, key: &K, values: &mut Vec<V>, value: V) {
        self(key, values, value)
    }
}

/// Last insert wins: the stored values are replaced by the new value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Replace;

impl<K, V> CollisionHandler<K, V> for Replace {
    fn combine(&self, _key: &K, values: &mut Vec<V>, value: V) {
        values.clear();
        values.push(value);
    }
}

/// Every insert is kept, in arrival order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Append;

impl<K, V> CollisionHandler<K, V> for Append {
    fn combine(&self, _key: &K, values: &mut Vec<V>, value: V) {
        values.push(value);
    }
}

/// One of the pre-built collision handlers, chosen at runtime.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all(deserialize = "lowercase"))]
pub enum Collision {
    #[serde(alias = "overwrite", alias = "unique")]
    Replace,
    #[serde(alias = "duplicates")]
    Append,
}

impl Default for Collision {
    fn default() -> Self {
        Collision::Append
    }
}

impl<K, V> CollisionHandler<K, V> for Collision {
    fn combine(&self, key: &K, values: &mut Vec<V>, value: V) {
        match self {
            Collision::Replace => Replace.combine(key, values, value),
            Collision::Append => Append.combine(key, values, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_policies() {
        let less = |a: &i32, b: &i32| a > b;
        assert!(less.less(&3, &2));
        assert!(equivalent(&less, &4, &4));
        assert_eq!(compare(&less, &3, &2), Ordering::Less);
        assert_eq!(compare(&less, &2, &3), Ordering::Greater);

        let keep_first = |_: &i32, values: &mut Vec<u8>, value: u8| {
            if values.is_empty() {
                values.push(value);
            }
        };
        let mut values = vec![1];
        keep_first.combine(&0, &mut values, 2);
        assert_eq!(values, [1]);
    }

    #[test]
    fn reversed_inverts() {
        assert!(Natural.less(&1, &2));
        assert!(Reversed(Natural).less(&2, &1));
        assert!(!Reversed(Natural).less(&1, &1));
    }

    #[test]
    fn builtin_collisions() {
        let mut values = vec!['a'];
        Append.combine(&0, &mut values, 'b');
        assert_eq!(values, ['a', 'b']);
        Replace.combine(&0, &mut values, 'c');
        assert_eq!(values, ['c']);
        Collision::Append.combine(&0, &mut values, 'd');
        Collision::Replace.combine(&0, &mut values, 'e');
        assert_eq!(values, ['e']);
    }
}
