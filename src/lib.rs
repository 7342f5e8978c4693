//! # ordhash-rs
//!
//! Two in-memory indexes for record sets loaded once and queried many times:
//!
//! - [`AvlTree`]: a height-balanced binary search tree ordered by a
//!   comparator supplied at construction. Insert, delete and exact-match
//!   lookup run in O(log n); [`AvlTree::traverse_ascending`] lists every key
//!   in order.
//! - [`HashIndex`]: a separate-chaining hash table keyed by integers or
//!   strings, doubling its bucket array whenever the load factor passes
//!   0.75.
//!
//! Neither structure does I/O or locking. [`load`] decodes JSON record sets
//! for bulk loading.
//!
//! ## Example
//!
//! ```rust
//! use ordhash_rs::{AvlTree, HashIndex};
//!
//! let mut tree = AvlTree::natural();
//! tree.bulk_load([10, 20, 30, 40, 50, 25]);
//! assert_eq!(tree.traverse_ascending(), vec![&10, &20, &25, &30, &40, &50]);
//!
//! let mut index: HashIndex<u32, &str> = HashIndex::new();
//! index.put(7, "seven");
//! assert_eq!(index.get(&7), Some(&"seven"));
//! assert_eq!(index.get(&8), None);
//! ```

#![forbid(unsafe_code)]

pub mod avl;
pub mod config;
pub mod error;
pub mod hash;
pub mod key;
pub mod load;

pub use avl::{AvlTree, NaturalOrder};
pub use config::{HashIndexConfig, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, MIN_LOAD_FACTOR};
pub use error::{Error, Result};
pub use hash::HashIndex;
pub use key::IndexKey;

#[cfg(test)]
mod proptests;
