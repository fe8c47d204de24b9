//! A thread-safe, height-balanced [AVL tree] keyed by a caller-supplied
//! ordering, with pluggable handling of key collisions and inclusive range
//! queries.
//!
//! ```
//! use sync_interval_tree::{Entry, IntervalTree};
//!
//! let tree = IntervalTree::duplicates(|a: &i32, b: &i32| a < b);
//! tree.insert(1, "A");
//! tree.insert(3, "B");
//! tree.insert(1, "C");
//! assert_eq!(
//!     tree.search(&0, &2),
//!     vec![Entry::new(1, "A"), Entry::new(1, "C")],
//! );
//! ```
//!
//! [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree
#![forbid(unsafe_code)]

pub mod config;
mod node;
mod policy;
mod range;
mod tree;

pub use config::TreeConfig;
pub use policy::{equivalent, Append, Collision, CollisionHandler, LessThan, Natural, Replace, Reversed};
pub use range::{range, RangeInclusive};
pub use tree::{Entry, IntervalTree};

#[cfg(test)]
mod proptests;
