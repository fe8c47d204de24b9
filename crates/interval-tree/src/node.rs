use std::cmp::{self, Ordering};

use tracing::trace;

use crate::policy::{compare, CollisionHandler, LessThan};

pub type Link<K, V> = Option<Box<Node<K, V>>>;

/// A restructuring picked while the subtree is still linked into the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rotation {
    Left,
    Right,
    LeftRight,
    RightLeft,
}

#[derive(Debug, Clone)]
pub struct Node<K, V> {
    pub key: K,
    pub values: Vec<V>,
    height: u32,
    pub left: Link<K, V>,
    pub right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Node {
            key,
            values: vec![value],
            height: 1,
            left: None,
            right: None,
        }
    }

    fn balance_factor(&self) -> i32 {
        let l = height(&self.left);
        let r = height(&self.right);
        (l as i32) - (r as i32)
    }

    /// update the cached height of this node. To call this function make sure that the cached
    /// heights of both children are up to date.
    fn update_height(&mut self) {
        self.height = cmp::max(height(&self.left), height(&self.right)) + 1;
    }

    ///returns the minimal key,values pair within this tree
    pub fn min_entry(&self) -> (&K, &[V]) {
        self.left.as_ref().map_or((&self.key, &self.values), |n| n.min_entry())
    }

    ///returns the maximal key,values pair within this tree
    pub fn max_entry(&self) -> (&K, &[V]) {
        self.right.as_ref().map_or((&self.key, &self.values), |n| n.max_entry())
    }

    /// Number of distinct keys in this tree.
    pub fn len(&self) -> usize {
        1 + self.left.as_ref().map_or(0, |n| n.len()) + self.right.as_ref().map_or(0, |n| n.len())
    }

    /// Perform a single right rotation on this (sub) tree
    fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        trace!(height = self.height, "rotate right");
        let mut new_root = self.left.take().expect("AVL broken");
        self.left = new_root.right.take();
        self.update_height();
        new_root.right = Some(self);
        new_root.update_height();
        new_root
    }

    /// Perform a single left rotation on this (sub) tree
    fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        trace!(height = self.height, "rotate left");
        let mut new_root = self.right.take().expect("AVL broken");
        self.right = new_root.left.take();
        self.update_height();
        new_root.left = Some(self);
        new_root.update_height();
        new_root
    }

    /// Left rotation of the left child, then right rotation of this node.
    fn rotate_left_right(mut self: Box<Self>) -> Box<Self> {
        let left = self.left.take().expect("AVL broken");
        self.left = Some(left.rotate_left());
        self.rotate_right()
    }

    /// Right rotation of the right child, then left rotation of this node.
    fn rotate_right_left(mut self: Box<Self>) -> Box<Self> {
        let right = self.right.take().expect("AVL broken");
        self.right = Some(right.rotate_right());
        self.rotate_left()
    }

    fn rotate(self: Box<Self>, rotation: Rotation) -> Box<Self> {
        match rotation {
            Rotation::Left => self.rotate_left(),
            Rotation::Right => self.rotate_right(),
            Rotation::LeftRight => self.rotate_left_right(),
            Rotation::RightLeft => self.rotate_right_left(),
        }
    }

    /// Apply `rotation` to the subtree held by `link`. No caller code runs while the subtree is
    /// detached.
    fn rotate_link(link: &mut Link<K, V>, rotation: Rotation) {
        if let Some(node) = link.take() {
            *link = Some(node.rotate(rotation));
        }
    }

    /// The rotation that restores balance here after an insert of `key` below this node.
    ///
    /// The case is picked by where `key` sits relative to the heavy child: only one key was added
    /// along this path, so it identifies which grandchild grew.
    fn rotation_after_insert<L>(&self, key: &K, less: &L) -> Option<Rotation>
    where
        L: LessThan<K> + ?Sized,
    {
        let balance = self.balance_factor();
        if balance > 1 {
            match compare(less, key, &self.left.as_ref()?.key) {
                Ordering::Less => Some(Rotation::Right),
                Ordering::Greater => Some(Rotation::LeftRight),
                // only reachable with an ordering that is not a strict weak order
                Ordering::Equal => None,
            }
        } else if balance < -1 {
            match compare(less, key, &self.right.as_ref()?.key) {
                Ordering::Greater => Some(Rotation::Left),
                Ordering::Less => Some(Rotation::RightLeft),
                // only reachable with an ordering that is not a strict weak order
                Ordering::Equal => None,
            }
        } else {
            None
        }
    }

    /// The rotation that restores balance here after a removal below this node.
    ///
    /// No key marks the path here, so the heavy child's own balance factor picks the case. A
    /// perfectly balanced heavy child takes the single rotation.
    fn rotation_after_delete(&self) -> Option<Rotation> {
        let balance = self.balance_factor();
        if balance > 1 {
            if balance_factor(&self.left) >= 0 {
                Some(Rotation::Right)
            } else {
                Some(Rotation::LeftRight)
            }
        } else if balance < -1 {
            if balance_factor(&self.right) <= 0 {
                Some(Rotation::Left)
            } else {
                Some(Rotation::RightLeft)
            }
        } else {
            None
        }
    }

    fn rebalance_deleted(self: Box<Self>) -> Box<Self> {
        match self.rotation_after_delete() {
            Some(rotation) => self.rotate(rotation),
            None => self,
        }
    }

    /// Inserts `value` under `key` into the tree held by `link`. An equivalent key already present
    /// is merged with `collision` and the shape of the tree is left untouched.
    ///
    /// `less`, `collision` and `K::clone` are only called while every node is linked in, so if one
    /// of them panics the tree keeps all of its nodes.
    pub fn insert_into<L, C>(link: &mut Link<K, V>, key: &K, value: V, less: &L, collision: &C)
    where
        K: Clone,
        L: LessThan<K> + ?Sized,
        C: CollisionHandler<K, V> + ?Sized,
    {
        let node = match link {
            Some(node) => node,
            None => {
                *link = Some(Box::new(Node::new(key.clone(), value)));
                return;
            }
        };
        match compare(less, key, &node.key) {
            Ordering::Less => Node::insert_into(&mut node.left, key, value, less, collision),
            Ordering::Greater => Node::insert_into(&mut node.right, key, value, less, collision),
            Ordering::Equal => {
                collision.combine(&node.key, &mut node.values, value);
                return;
            }
        }
        node.update_height();
        if let Some(rotation) = node.rotation_after_insert(key, less) {
            Node::rotate_link(link, rotation);
        }
    }

    /// Finds the minimal node below this one and returns a new (optional) tree where that node has
    /// been unlinked, together with the node itself as tuple (new_tree, min). Every level passed
    /// through is rebalanced as after a removal.
    fn take_min(mut self: Box<Self>) -> (Link<K, V>, Box<Self>) {
        match self.left.take() {
            Some(left) => {
                let (rest, min) = left.take_min();
                self.left = rest;
                self.update_height();
                (Some(self.rebalance_deleted()), min)
            }
            None => (self.right.take(), self),
        }
    }

    /// Return the tree below this node with this node removed. A node with two children takes over
    /// the key and values of its in-order successor, which is then unlinked from the right subtree.
    fn delete_root(mut self: Box<Self>) -> Link<K, V> {
        match (self.left.take(), self.right.take()) {
            (None, None) => None,
            (Some(l), None) => Some(l),
            (None, Some(r)) => Some(r),
            (Some(l), Some(r)) => {
                let (rest, successor) = r.take_min();
                let Node { key, values, .. } = *successor;
                self.key = key;
                self.values = values;
                self.left = Some(l);
                self.right = rest;
                self.update_height();
                Some(self.rebalance_deleted())
            }
        }
    }

    /// Will delete `key` and all its values from the tree held by `link`, leaving `None` behind if
    /// the tree becomes empty. A key that is not present leaves the tree as it was.
    ///
    /// Comparisons all happen before anything is unlinked, as in [`Node::insert_into`].
    pub fn delete_from<L>(link: &mut Link<K, V>, key: &K, less: &L)
    where
        L: LessThan<K> + ?Sized,
    {
        let node = match link {
            Some(node) => node,
            None => return,
        };
        match compare(less, key, &node.key) {
            Ordering::Less => Node::delete_from(&mut node.left, key, less),
            Ordering::Greater => Node::delete_from(&mut node.right, key, less),
            Ordering::Equal => {
                if let Some(found) = link.take() {
                    *link = found.delete_root();
                }
                return;
            }
        }
        node.update_height();
        if let Some(rotation) = node.rotation_after_delete() {
            Node::rotate_link(link, rotation);
        }
    }

    /// Calls `emit` for every (key, value) pair whose key lies in `start..=end`, in ascending key
    /// order. Subtrees that lie entirely outside the range are never entered.
    pub fn search<L, F>(&self, start: &K, end: &K, less: &L, emit: &mut F)
    where
        L: LessThan<K> + ?Sized,
        F: FnMut(&K, &V),
    {
        if less.less(end, &self.key) {
            if let Some(ref left) = self.left {
                left.search(start, end, less, emit);
            }
        } else if less.less(&self.key, start) {
            if let Some(ref right) = self.right {
                right.search(start, end, less, emit);
            }
        } else {
            if let Some(ref left) = self.left {
                left.search(start, end, less, emit);
            }
            for value in &self.values {
                emit(&self.key, value);
            }
            if let Some(ref right) = self.right {
                right.search(start, end, less, emit);
            }
        }
    }

    /// returns a read only reference to the values stored under key in this tree
    pub fn get<L>(&self, key: &K, less: &L) -> Option<&[V]>
    where
        L: LessThan<K> + ?Sized,
    {
        match compare(less, key, &self.key) {
            Ordering::Equal => Some(&self.values),
            Ordering::Less => self.left.as_ref().and_then(|succ| succ.get(key, less)),
            Ordering::Greater => self.right.as_ref().and_then(|succ| succ.get(key, less)),
        }
    }
}

pub fn height<K, V>(node: &Link<K, V>) -> u32 {
    node.as_ref().map_or(0, |succ| succ.height)
}

fn balance_factor<K, V>(node: &Link<K, V>) -> i32 {
    node.as_ref().map_or(0, |succ| succ.balance_factor())
}
