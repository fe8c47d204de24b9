use std::fmt;

use parking_lot::RwLock;
use tracing::trace;

use crate::config::TreeConfig;
use crate::node::{height, Link, Node};
use crate::policy::{Append, Collision, CollisionHandler, LessThan, Natural, Replace};
use crate::range::RangeInclusive;

/// A single (key, value) pair produced by a range search.
///
/// Keys holding several values show up once per value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Entry { key, value }
    }
}

impl<K, V> From<Entry<K, V>> for (K, V) {
    fn from(entry: Entry<K, V>) -> Self {
        (entry.key, entry.value)
    }
}

/// A balanced search tree guarded by a single reader/writer lock.
///
/// Keys are ordered by `L` and values inserted under an already present key
/// are merged by `C`. Every operation takes `&self`: mutations hold the write
/// lock for their whole duration, queries share the read lock and hand back
/// owned copies.
pub struct IntervalTree<K, V, L = Natural, C = Append> {
    root: RwLock<Link<K, V>>,
    less: L,
    collision: C,
}

impl<K: Ord, V> Default for IntervalTree<K, V, Natural, Append> {
    fn default() -> Self {
        IntervalTree::new(Natural, Append)
    }
}

impl<K: fmt::Debug, V: fmt::Debug, L, C> fmt::Debug for IntervalTree<K, V, L, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("IntervalTree")
            .field("root", &*self.root.read())
            .finish_non_exhaustive()
    }
}

impl<K, V, L, C> IntervalTree<K, V, L, C>
where
    L: LessThan<K>,
    C: CollisionHandler<K, V>,
{
    /// Construct a new empty tree ordered by `less`, merging colliding
    /// inserts with `collision`.
    /// # Examples
    /// ```
    /// use sync_interval_tree::{IntervalTree, Replace};
    ///
    /// let t = IntervalTree::new(|a: &u64, b: &u64| a < b, Replace);
    /// t.insert(2, "two");
    /// assert_eq!(t.get(&2), Some(vec!["two"]));
    /// ```
    pub fn new(less: L, collision: C) -> Self {
        IntervalTree {
            root: RwLock::new(None),
            less,
            collision,
        }
    }
}

impl<K, V, L: LessThan<K>> IntervalTree<K, V, L, Replace> {
    /// A tree holding at most one value per key; the latest insert wins.
    /// # Examples
    /// ```
    /// use sync_interval_tree::IntervalTree;
    ///
    /// let t = IntervalTree::unique(|a: &u64, b: &u64| a < b);
    /// t.insert(2, 25);
    /// t.insert(2, 30);
    /// assert_eq!(t.get(&2), Some(vec![30]));
    /// ```
    pub fn unique(less: L) -> Self {
        IntervalTree::new(less, Replace)
    }
}

impl<K, V, L: LessThan<K>> IntervalTree<K, V, L, Append> {
    /// A tree keeping every value inserted under a key, in arrival order.
    /// # Examples
    /// ```
    /// use sync_interval_tree::IntervalTree;
    ///
    /// let t = IntervalTree::duplicates(|a: &u64, b: &u64| a < b);
    /// t.insert(2, 25);
    /// t.insert(2, 30);
    /// assert_eq!(t.get(&2), Some(vec![25, 30]));
    /// ```
    pub fn duplicates(less: L) -> Self {
        IntervalTree::new(less, Append)
    }
}

impl<K, V, L: LessThan<K>> IntervalTree<K, V, L, Collision> {
    /// A tree whose collision policy is taken from `config`.
    pub fn from_config(less: L, config: &TreeConfig) -> Self {
        IntervalTree::new(less, config.collision)
    }
}

impl<K, V, L, C> IntervalTree<K, V, L, C> {
    /// This function will return true if the tree is empty, false otherwise.
    pub fn is_empty(&self) -> bool {
        self.root.read().is_none()
    }

    /// This function will return the height of the tree. An empty tree has height 0, one with only
    /// one element has height 1 etc.
    /// # Examples
    /// ```
    /// let t = sync_interval_tree::IntervalTree::<u64, i32>::default();
    /// assert_eq!(t.height(), 0);
    /// t.insert(2, 3);
    /// assert_eq!(t.height(), 1);
    /// ```
    pub fn height(&self) -> usize {
        height(&*self.root.read()) as usize
    }

    /// Number of distinct keys stored. Walks the whole tree.
    pub fn len(&self) -> usize {
        self.root.read().as_ref().map_or(0, |root| root.len())
    }

    /// Drop every key and value.
    pub fn clear(&self) {
        *self.root.write() = None;
    }

    #[cfg(test)]
    pub(crate) fn is_avl(&self) -> bool
    where
        L: LessThan<K>,
    {
        crate::node::tests::is_avl_tree(&*self.root.read(), &self.less)
    }
}

impl<K, V, L, C> IntervalTree<K, V, L, C>
where
    K: Clone,
    L: LessThan<K>,
    C: CollisionHandler<K, V>,
{
    /// This function will insert the key,value pair into the tree. If an equivalent key is already
    /// part of the tree, the collision policy decides what becomes of its values.
    /// # Examples
    /// ```
    /// use sync_interval_tree::{Entry, IntervalTree};
    ///
    /// let t = IntervalTree::unique(|a: &i32, b: &i32| a < b);
    /// for (k, v) in [(1, 'A'), (3, 'B'), (5, 'C'), (7, 'D')] {
    ///     t.insert(k, v);
    /// }
    /// assert_eq!(
    ///     t.search(&1, &5),
    ///     vec![Entry::new(1, 'A'), Entry::new(3, 'B'), Entry::new(5, 'C')],
    /// );
    /// ```
    pub fn insert(&self, key: K, value: V) {
        let mut guard = self.root.write();
        let root = &mut *guard;
        if root.is_none() {
            *root = Some(Box::new(Node::new(key, value)));
        } else {
            Node::insert_into(root, &key, value, &self.less, &self.collision);
        }
        trace!(height = height(root), "insert");
    }

    /// This function will remove the key and all its values from the tree, doing nothing if the
    /// key is not part of the tree.
    /// # Examples
    /// ```
    /// use sync_interval_tree::IntervalTree;
    ///
    /// let t = IntervalTree::unique(|a: &u64, b: &u64| a < b);
    /// t.insert(2, 25);
    /// t.delete(&2);
    /// assert!(t.is_empty());
    /// // deleting nonexistant keys doesn't do anything
    /// t.delete(&3);
    /// assert!(t.is_empty());
    /// ```
    pub fn delete(&self, key: &K) {
        let mut guard = self.root.write();
        let root = &mut *guard;
        Node::delete_from(root, key, &self.less);
        trace!(height = height(root), "delete");
    }
}

impl<K, V, L, C> IntervalTree<K, V, L, C>
where
    K: Clone,
    V: Clone,
    L: LessThan<K>,
{
    /// This function will return every (key, value) pair whose key lies between the two bounds,
    /// both inclusive, in ascending order of the tree's ordering. Values sharing a key come out in
    /// the order their collision policy stored them. Inverted bounds are swapped.
    /// # Examples
    /// ```
    /// use sync_interval_tree::{Entry, IntervalTree};
    ///
    /// let t = IntervalTree::unique(|a: &i32, b: &i32| a > b);
    /// for (k, v) in [(7, 'D'), (5, 'C'), (3, 'B'), (1, 'A')] {
    ///     t.insert(k, v);
    /// }
    /// assert_eq!(
    ///     t.search(&3, &8),
    ///     vec![Entry::new(7, 'D'), Entry::new(5, 'C'), Entry::new(3, 'B')],
    /// );
    /// ```
    pub fn search(&self, start: &K, end: &K) -> Vec<Entry<K, V>> {
        let (start, end) = if self.less.less(end, start) {
            (end, start)
        } else {
            (start, end)
        };
        let mut results = Vec::new();
        if let Some(ref root) = *self.root.read() {
            root.search(start, end, &self.less, &mut |key: &K, value: &V| {
                results.push(Entry::new(key.clone(), value.clone()))
            });
        }
        trace!(results = results.len(), "search");
        results
    }

    /// Same as [`search`](Self::search) with the bounds taken from `range`.
    pub fn search_range(&self, range: &RangeInclusive<K>) -> Vec<Entry<K, V>> {
        let (start, end) = range.normalized(&self.less);
        self.search(start, end)
    }

    /// This function will return a copy of the values stored under the given key or None if the
    /// key is not known.
    pub fn get(&self, key: &K) -> Option<Vec<V>> {
        let root = self.root.read();
        root.as_ref()
            .and_then(|node| node.get(key, &self.less))
            .map(|values| values.to_vec())
    }

    /// This function will return true if the tree contains the given key, false otherwise
    /// # Examples
    /// ```
    /// let t = sync_interval_tree::IntervalTree::<u64, i32>::default();
    /// t.insert(2, 25);
    /// assert!(!t.contains(&3));
    /// assert!(t.contains(&2));
    /// ```
    pub fn contains(&self, key: &K) -> bool {
        let root = self.root.read();
        root.as_ref().map_or(false, |node| node.get(key, &self.less).is_some())
    }

    /// This function will return the smallest key in the tree with its values, or None if the
    /// tree is empty.
    /// # Examples
    /// ```
    /// let t = sync_interval_tree::IntervalTree::<u64, u64>::default();
    /// t.insert(2, 25);
    /// t.insert(3, 50);
    /// assert_eq!(t.min(), Some((2, vec![25])));
    /// ```
    pub fn min(&self) -> Option<(K, Vec<V>)> {
        let root = self.root.read();
        root.as_ref().map(|n| {
            let (key, values) = n.min_entry();
            (key.clone(), values.to_vec())
        })
    }

    /// This function will return the biggest key in the tree with its values, or None if the tree
    /// is empty.
    pub fn max(&self) -> Option<(K, Vec<V>)> {
        let root = self.root.read();
        root.as_ref().map(|n| {
            let (key, values) = n.max_entry();
            (key.clone(), values.to_vec())
        })
    }
}
