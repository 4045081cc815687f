//! chain-table: a single-threaded, separate-chaining hash table built on a
//! generic singly-linked list and a detachable list cursor.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small key-value container whose behavior is fully determined
//!   by caller-supplied equality and hash capabilities, so it works for any
//!   key type without requiring `Hash`/`Eq` impls.
//! - Layers:
//!   - LinkedList<T>: ordered singly-linked sequence with head/tail
//!     tracking and an injected equality function.
//!   - ListCursor: a cursor over one LinkedList that is resolved against the
//!     list on every call and detects structural changes explicitly.
//!   - HashTable<K, V>: buckets of ascending-hash chains with prime-stepped
//!     growth; `keys()`/`values()` materialize LinkedLists.
//!
//! Constraints
//! - Single-threaded: the injected capabilities are `Rc<dyn Fn>`, so
//!   neither container is `Send`/`Sync`.
//! - Keys must hash to a strictly positive `i64`; anything else is
//!   rejected with `TableError::InvalidKey`.
//! - Keys are unique; inserting an existing key replaces its value.
//! - Within a bucket, entries are sorted by hash; lookups stop at the first
//!   larger hash.
//!
//! Storage
//! - Both containers keep their nodes in a `SlotMap` and link them by
//!   generational key. A key to a removed node never resolves again, so no
//!   path can read a freed node, and no `unsafe` is needed.
//! - Each table entry stores the hash computed at insert. Chain ordering,
//!   lookups and growth use the stored hash; the hash capability runs once
//!   per keyed call.
//!
//! Growth
//! - Before an insert, the table grows when one more entry would push
//!   `len / no_buckets` past the load factor (default 14.0 over 17
//!   buckets). The bucket count steps through `config::BUCKET_PRIMES`; every
//!   chain is rebuilt in one pass. Past the last prime the table keeps its
//!   size and refuses new keys with `TableError::CapacityExhausted`.
//!
//! Ownership
//! - Containers own what they store and drop it on remove/clear/drop unless
//!   it is handed back to the caller. Shared payloads are expressed with
//!   `Rc` (see `Elem::Str`/`Elem::Ptr`), so `keys()`/`values()` snapshots
//!   share payloads instead of copying them.
//!
//! Snapshots and cursors
//! - `keys()`/`values()` are independent lists; later table changes do not
//!   reach them. A `ListCursor` reports `CursorError::Stale` after any
//!   structural change to its list until it is reset.

pub mod config;
pub mod cursor;
pub mod elem;
pub mod error;
pub mod hash_table;
mod hash_table_proptest;
pub mod linked_list;
pub mod sort;

// Public surface
pub use config::{TableConfig, BUCKET_PRIMES};
pub use cursor::ListCursor;
pub use elem::{elem_eq, elem_hash, int_hash, string_knr_hash, Elem};
pub use error::{CursorError, ListError, TableError};
pub use hash_table::{HashFn, HashTable};
pub use linked_list::{EqFn, LinkedList};
pub use sort::sort_keys;
