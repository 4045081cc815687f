//! LinkedList: ordered singly-linked sequence with injected equality.
//!
//! Links live in a `SlotMap` and point forward by generational key, so a
//! key to a removed link can never resolve to a different element later.
//! Every structural change bumps the list's generation; `ListCursor`
//! compares generations to report staleness instead of reading freed links.

use crate::cursor::{Iter, ListCursor};
use crate::error::ListError;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use log::trace;
use slotmap::{DefaultKey, SlotMap};
use std::rc::Rc;

/// Equality capability supplied at construction.
pub type EqFn<T> = Rc<dyn Fn(&T, &T) -> bool>;

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
pub(crate) struct Link<T> {
    pub(crate) value: T,
    pub(crate) next: Option<DefaultKey>,
}

pub struct LinkedList<T> {
    links: SlotMap<DefaultKey, Link<T>>,
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
    eq: EqFn<T>,
    id: u64,
    generation: u64,
}

impl<T> LinkedList<T> {
    pub fn new<F>(eq: F) -> Self
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        Self::with_eq(Rc::new(eq))
    }

    /// Build a list sharing an existing equality capability.
    pub fn with_eq(eq: EqFn<T>) -> Self {
        Self {
            links: SlotMap::with_key(),
            head: None,
            tail: None,
            eq,
            id: NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed),
            generation: 0,
        }
    }

    pub fn eq_fn(&self) -> &EqFn<T> {
        &self.eq
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn head_key(&self) -> Option<DefaultKey> {
        self.head
    }

    pub(crate) fn link(&self, k: DefaultKey) -> Option<&Link<T>> {
        self.links.get(k)
    }

    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Key of the link at `index`, walking from the head.
    fn key_at(&self, index: usize) -> Option<DefaultKey> {
        let mut cur = self.head;
        for _ in 0..index {
            cur = self.links.get(cur?)?.next;
        }
        cur
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn append(&mut self, value: T) {
        let key = self.links.insert(Link { value, next: None });
        match self.tail {
            Some(tail) => self.links[tail].next = Some(key),
            None => self.head = Some(key),
        }
        self.tail = Some(key);
        self.touch();
    }

    pub fn prepend(&mut self, value: T) {
        let key = self.links.insert(Link {
            value,
            next: self.head,
        });
        if self.tail.is_none() {
            self.tail = Some(key);
        }
        self.head = Some(key);
        self.touch();
    }

    /// Insert so that `value` ends up at `index`; valid for `0..=len`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), ListError> {
        let len = self.len();
        if index > len {
            return Err(ListError::InvalidIndex { index, len });
        }
        if index == 0 {
            self.prepend(value);
            return Ok(());
        }
        if index == len {
            self.append(value);
            return Ok(());
        }
        let prev = self
            .key_at(index - 1)
            .ok_or(ListError::InvalidIndex { index, len })?;
        let next = self.links[prev].next;
        let key = self.links.insert(Link { value, next });
        self.links[prev].next = Some(key);
        self.touch();
        Ok(())
    }

    /// Unlink and return the value at `index`; valid for `0..len`.
    pub fn remove(&mut self, index: usize) -> Result<T, ListError> {
        let len = self.len();
        let invalid = ListError::InvalidIndex { index, len };
        if index >= len {
            return Err(invalid);
        }
        let prev = if index == 0 {
            None
        } else {
            Some(self.key_at(index - 1).ok_or(invalid)?)
        };
        let target = match prev {
            Some(p) => self.links[p].next,
            None => self.head,
        }
        .ok_or(invalid)?;

        let link = self.links.remove(target).ok_or(invalid)?;
        match prev {
            Some(p) => self.links[p].next = link.next,
            None => self.head = link.next,
        }
        if self.tail == Some(target) {
            self.tail = prev;
        }
        self.touch();
        Ok(link.value)
    }

    pub fn pop_front(&mut self) -> Option<T> {
        self.remove(0).ok()
    }

    /// Remove every element, head first. Values are dropped in list order.
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        trace!("clearing list {} with {} links", self.id, self.len());
        while self.pop_front().is_some() {}
    }

    /// Element at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.key_at(index).map(|k| &self.links[k].value)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let k = self.key_at(index)?;
        self.links.get_mut(k).map(|l| &mut l.value)
    }

    pub fn front(&self) -> Option<&T> {
        self.head.map(|k| &self.links[k].value)
    }

    pub fn back(&self) -> Option<&T> {
        self.tail.map(|k| &self.links[k].value)
    }

    /// Membership test using the list's equality capability.
    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|v| (self.eq)(v, value))
    }

    pub fn all<P>(&self, pred: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().all(pred)
    }

    pub fn any<P>(&self, pred: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().any(pred)
    }

    /// Run `f` on every element in place, head to tail. Not a structural
    /// change: outstanding cursors stay valid.
    pub fn apply_to_all<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut T),
    {
        let mut cur = self.head;
        while let Some(k) = cur {
            let link = &mut self.links[k];
            f(&mut link.value);
            cur = link.next;
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    pub fn cursor(&self) -> ListCursor {
        ListCursor::new(self)
    }
}

impl<T: PartialEq + 'static> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new(|a: &T, b: &T| a == b)
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.append(v);
        }
    }
}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn list_of(values: &[i32]) -> LinkedList<i32> {
        let mut l = LinkedList::default();
        l.extend(values.iter().copied());
        l
    }

    fn to_vec(l: &LinkedList<i32>) -> Vec<i32> {
        l.iter().copied().collect()
    }

    /// Invariant: An empty list rejects `remove(0)`; one append then remove restores emptiness.
    #[test]
    fn empty_list_remove_and_restore() {
        let mut l: LinkedList<i32> = LinkedList::default();
        assert!(l.is_empty());
        assert_eq!(l.remove(0), Err(ListError::InvalidIndex { index: 0, len: 0 }));

        l.append(7);
        assert_eq!(l.remove(0), Ok(7));
        assert!(l.is_empty());
        assert!(l.front().is_none());
        assert!(l.back().is_none());
    }

    /// Invariant: `append` lands at `len-1`, `prepend` at `0`.
    #[test]
    fn append_and_prepend_positions() {
        let mut l = LinkedList::default();
        l.append(2);
        l.append(3);
        l.prepend(1);
        assert_eq!(l.get(l.len() - 1), Some(&3));
        assert_eq!(l.get(0), Some(&1));
        assert_eq!(l.front(), Some(&1));
        assert_eq!(l.back(), Some(&3));
        assert_eq!(to_vec(&l), vec![1, 2, 3]);
    }

    /// Invariant: `get` past the end returns `None` instead of reading garbage.
    #[test]
    fn get_out_of_range_is_none() {
        let l = list_of(&[1, 2]);
        assert_eq!(l.get(2), None);
        assert_eq!(l.get(usize::MAX), None);
        let empty: LinkedList<i32> = LinkedList::default();
        assert_eq!(empty.get(0), None);
    }

    /// Invariant: `insert` accepts `0..=len` and places the value at exactly that index.
    #[test]
    fn insert_positions_and_bounds() {
        let mut l = list_of(&[1, 3]);
        l.insert(1, 2).unwrap();
        l.insert(0, 0).unwrap();
        l.insert(4, 4).unwrap();
        assert_eq!(to_vec(&l), vec![0, 1, 2, 3, 4]);
        assert_eq!(l.back(), Some(&4));
        assert_eq!(
            l.insert(6, 9),
            Err(ListError::InvalidIndex { index: 6, len: 5 })
        );
        assert_eq!(l.len(), 5);
    }

    /// Invariant: `remove(i)` shrinks by one and keeps the relative order of the rest,
    /// including the tail pointer when the last element goes.
    #[test]
    fn remove_middle_and_tail() {
        let mut l = list_of(&[1, 2, 3, 4]);
        assert_eq!(l.remove(1), Ok(2));
        assert_eq!(to_vec(&l), vec![1, 3, 4]);
        assert_eq!(l.remove(2), Ok(4));
        assert_eq!(l.back(), Some(&3));
        l.append(5);
        assert_eq!(to_vec(&l), vec![1, 3, 5]);
        assert_eq!(l.remove(3), Err(ListError::InvalidIndex { index: 3, len: 3 }));
    }

    /// Invariant: `contains` consults the injected equality, including the last element.
    #[test]
    fn contains_uses_injected_eq() {
        let mut l = LinkedList::new(|a: &String, b: &String| a.eq_ignore_ascii_case(b));
        l.append("Shelf".to_string());
        l.append("Bin".to_string());
        assert!(l.contains(&"shelf".to_string()));
        assert!(l.contains(&"BIN".to_string()));
        assert!(!l.contains(&"crate".to_string()));
    }

    /// Invariant: `all`/`any` short-circuit on their defining condition.
    #[test]
    fn all_any_short_circuit() {
        let l = list_of(&[2, 4, 5, 6]);
        let calls = Cell::new(0);
        assert!(!l.all(|v| {
            calls.set(calls.get() + 1);
            v % 2 == 0
        }));
        assert_eq!(calls.get(), 3);

        calls.set(0);
        assert!(l.any(|v| {
            calls.set(calls.get() + 1);
            *v == 4
        }));
        assert_eq!(calls.get(), 2);

        let empty: LinkedList<i32> = LinkedList::default();
        assert!(empty.all(|_| false));
        assert!(!empty.any(|_| true));
    }

    #[test]
    fn apply_to_all_mutates_in_place() {
        let mut l = list_of(&[1, 2, 3]);
        l.apply_to_all(|v| *v *= 10);
        assert_eq!(to_vec(&l), vec![10, 20, 30]);
    }

    /// Invariant: `clear` drops every stored value exactly once and leaves an empty list.
    #[test]
    fn clear_releases_values() {
        let payload = Rc::new(());
        let mut l: LinkedList<Rc<()>> = LinkedList::new(|a: &Rc<()>, b: &Rc<()>| Rc::ptr_eq(a, b));
        for _ in 0..5 {
            l.append(payload.clone());
        }
        assert_eq!(Rc::strong_count(&payload), 6);
        l.clear();
        assert!(l.is_empty());
        assert_eq!(Rc::strong_count(&payload), 1);
        l.append(payload.clone());
        assert_eq!(l.len(), 1);
    }

    /// Invariant: Structural changes bump the generation; in-place mutation does not.
    #[test]
    fn generation_tracks_structure_only() {
        let mut l = list_of(&[1]);
        let g0 = l.generation();
        l.apply_to_all(|v| *v += 1);
        assert_eq!(l.generation(), g0);
        if let Some(v) = l.get_mut(0) {
            *v += 1;
        }
        assert_eq!(l.generation(), g0);
        l.prepend(0);
        assert_ne!(l.generation(), g0);
    }

    #[test]
    fn debug_lists_elements() {
        let l = list_of(&[1, 2]);
        assert_eq!(format!("{:?}", l), "[1, 2]");
    }
}
