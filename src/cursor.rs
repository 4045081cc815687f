//! Cursors and borrowing iterators over `LinkedList`.
//!
//! `ListCursor` does not borrow the list it walks. It records the list's
//! identity, the generation it was positioned at and the key of its current
//! link, and takes the list as an argument on every call (the same shape as
//! a slot handle resolved against its map). A structural change to the list
//! after positioning makes every call report `CursorError::Stale` until the
//! cursor is `reset`.

use crate::error::CursorError;
use crate::linked_list::{Link, LinkedList};
use slotmap::DefaultKey;

#[derive(Debug, Clone)]
pub struct ListCursor {
    list_id: u64,
    generation: u64,
    current: Option<DefaultKey>,
}

impl ListCursor {
    pub(crate) fn new<T>(list: &LinkedList<T>) -> Self {
        Self {
            list_id: list.id(),
            generation: list.generation(),
            current: list.head_key(),
        }
    }

    fn check<T>(&self, list: &LinkedList<T>) -> Result<(), CursorError> {
        if self.list_id != list.id() {
            return Err(CursorError::ForeignList);
        }
        if self.generation != list.generation() {
            return Err(CursorError::Stale);
        }
        Ok(())
    }

    fn current_link<'a, T>(&self, list: &'a LinkedList<T>) -> Option<&'a Link<T>> {
        self.current.and_then(|k| list.link(k))
    }

    /// Whether a following element exists.
    pub fn has_next<T>(&self, list: &LinkedList<T>) -> Result<bool, CursorError> {
        self.check(list)?;
        Ok(self
            .current_link(list)
            .map_or(false, |link| link.next.is_some()))
    }

    /// Step to the following element and return it. On `Exhausted` the
    /// cursor stays where it was.
    pub fn next<'a, T>(&mut self, list: &'a LinkedList<T>) -> Result<&'a T, CursorError> {
        self.check(list)?;
        let next = self
            .current_link(list)
            .and_then(|link| link.next)
            .ok_or(CursorError::Exhausted)?;
        let link = list.link(next).ok_or(CursorError::Exhausted)?;
        self.current = Some(next);
        Ok(&link.value)
    }

    /// Element under the cursor; `NoCurrent` on an empty list.
    pub fn current<'a, T>(&self, list: &'a LinkedList<T>) -> Result<&'a T, CursorError> {
        self.check(list)?;
        self.current_link(list)
            .map(|link| &link.value)
            .ok_or(CursorError::NoCurrent)
    }

    /// Move back to the head and adopt the list's current generation, which
    /// also revives a stale cursor.
    pub fn reset<T>(&mut self, list: &LinkedList<T>) -> Result<(), CursorError> {
        if self.list_id != list.id() {
            return Err(CursorError::ForeignList);
        }
        self.generation = list.generation();
        self.current = list.head_key();
        Ok(())
    }
}

/// Borrowing iterator over a `LinkedList`, head to tail.
pub struct Iter<'a, T> {
    list: &'a LinkedList<T>,
    next: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(list: &'a LinkedList<T>) -> Self {
        Self {
            list,
            next: list.head_key(),
            remaining: list.len(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let list = self.list;
        let link = list.link(self.next?)?;
        self.next = link.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&link.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
