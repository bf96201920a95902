extern crate alloc;

use core::fmt;
use core::iter::FusedIterator;
use core::mem;
use slab::Slab;

/// A stable reference to a live entry in a [`List`].
///
/// Handles are slab keys. They stay valid until the entry they name is
/// removed; after that the key may be handed out again, so the cache never
/// keeps a handle past the removal of its entry.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Handle(usize);

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.0)
    }
}

/// A node in the doubly linked list.
///
/// `prev` points toward the front (most recently used) and `next` toward the
/// back (least recently used).
pub(crate) struct Entry<T> {
    val: T,
    prev: Option<Handle>,
    next: Option<Handle>,
}

/// A doubly linked list whose nodes live in a [`Slab`].
///
/// The slab owns storage and slot reuse; this type only keeps the links
/// between its entries. The front of the list is the most recently added or
/// promoted entry.
pub(crate) struct List<T> {
    nodes: Slab<Entry<T>>,
    head: Option<Handle>,
    tail: Option<Handle>,
}

impl<T> List<T> {
    /// Creates an empty list with room for `cap` entries before reallocating.
    pub(crate) fn with_capacity(cap: usize) -> List<T> {
        List {
            nodes: Slab::with_capacity(cap),
            head: None,
            tail: None,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub(crate) fn head(&self) -> Option<Handle> {
        self.head
    }

    #[inline]
    pub(crate) fn tail(&self) -> Option<Handle> {
        self.tail
    }

    /// Number of entries the list can hold without reallocating.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Upper bound on the number of entries the slab could ever address.
    pub(crate) fn max_len() -> usize {
        isize::MAX as usize / mem::size_of::<Entry<T>>().max(1)
    }

    /// Makes sure the next `additional` calls to [`List::add`] won't reallocate.
    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    fn entry(&self, handle: Handle) -> Option<&Entry<T>> {
        self.nodes.get(handle.0)
    }

    fn set_prev(&mut self, handle: Handle, prev: Option<Handle>) {
        debug_assert!(self.nodes.contains(handle.0), "relinking a vacant slot");
        if let Some(entry) = self.nodes.get_mut(handle.0) {
            entry.prev = prev;
        }
    }

    fn set_next(&mut self, handle: Handle, next: Option<Handle>) {
        debug_assert!(self.nodes.contains(handle.0), "relinking a vacant slot");
        if let Some(entry) = self.nodes.get_mut(handle.0) {
            entry.next = next;
        }
    }

    /// Links an already detached node in at the front.
    fn attach(&mut self, handle: Handle) {
        let old_head = self.head;
        if let Some(entry) = self.nodes.get_mut(handle.0) {
            entry.prev = None;
            entry.next = old_head;
        }
        if let Some(old_head) = old_head {
            self.set_prev(old_head, Some(handle));
        }
        self.head = Some(handle);
        if self.tail.is_none() {
            self.tail = Some(handle);
        }
    }

    /// Unlinks a node, leaving its own links stale. The node stays stored.
    fn detach(&mut self, handle: Handle) {
        let (prev, next) = match self.entry(handle) {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };
        match (prev, next) {
            (Some(prev), Some(next)) => {
                self.set_next(prev, Some(next));
                self.set_prev(next, Some(prev));
            }
            (None, Some(next)) => {
                self.head = Some(next);
                self.set_prev(next, None);
            }
            (Some(prev), None) => {
                self.tail = Some(prev);
                self.set_next(prev, None);
            }
            (None, None) => {
                self.head = None;
                self.tail = None;
            }
        }
    }

    /// Adds a value to the front of the list and returns its handle.
    pub(crate) fn add(&mut self, v: T) -> Handle {
        let handle = Handle(self.nodes.insert(Entry {
            val: v,
            prev: None,
            next: None,
        }));
        self.attach(handle);
        handle
    }

    /// Moves a node to the front of the list.
    ///
    /// A node that is already at the front is left where it is. Unknown handles
    /// are ignored.
    pub(crate) fn move_to_front(&mut self, handle: Handle) {
        let (prev, next) = match self.entry(handle) {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };
        match (prev, next) {
            // Already the head.
            (None, Some(_)) => {}
            // Only entry: just make sure both ends agree.
            (None, None) => {
                if self.tail.is_none() {
                    self.tail = Some(handle);
                }
                self.head = Some(handle);
            }
            (Some(prev), Some(next)) => {
                self.set_next(prev, Some(next));
                self.set_prev(next, Some(prev));
                self.attach(handle);
            }
            (Some(prev), None) => {
                self.set_next(prev, None);
                self.tail = Some(prev);
                self.attach(handle);
            }
        }
    }

    /// Unlinks the node and frees its slot, returning the stored value.
    pub(crate) fn remove(&mut self, handle: Handle) -> Option<T> {
        self.entry(handle)?;
        self.detach(handle);
        self.nodes.try_remove(handle.0).map(|entry| entry.val)
    }

    /// Removes the front (most recently used) node.
    pub(crate) fn remove_first(&mut self) -> Option<T> {
        let head = self.head?;
        self.remove(head)
    }

    /// Removes the back (least recently used) node.
    pub(crate) fn remove_last(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(tail)
    }

    pub(crate) fn get_value(&self, handle: Handle) -> Option<&T> {
        self.entry(handle).map(|entry| &entry.val)
    }

    pub(crate) fn get_value_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.nodes.get_mut(handle.0).map(|entry| &mut entry.val)
    }

    /// Drops every entry. The slab keeps its allocation for reuse.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Walks the list front to back without reordering anything.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.len(),
        }
    }
}

impl<T> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("capacity", &self.nodes.capacity())
            .field("length", &self.nodes.len())
            .finish()
    }
}

/// Borrowing iterator over a [`List`], front to back.
pub(crate) struct Iter<'a, T> {
    list: &'a List<T>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.list.entry(self.front?)?;
        self.front = entry.next;
        self.remaining -= 1;
        Some(&entry.val)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.list.entry(self.back?)?;
        self.back = entry.prev;
        self.remaining -= 1;
        Some(&entry.val)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            list: self.list,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    /// Checks every structural invariant of the list by walking it both ways.
    fn assert_well_formed<T>(list: &List<T>) {
        assert_eq!(list.head.is_none(), list.tail.is_none());
        assert_eq!(list.head.is_none(), list.len() == 0);

        let mut steps = 0;
        let mut prev = None;
        let mut cursor = list.head;
        while let Some(handle) = cursor {
            let entry = list.entry(handle).expect("linked handle must be occupied");
            assert_eq!(entry.prev, prev, "back link of {handle:?} is broken");
            prev = Some(handle);
            cursor = entry.next;
            steps += 1;
            assert!(steps <= list.len(), "cycle detected");
        }
        assert_eq!(steps, list.len());
        assert_eq!(prev, list.tail);
    }

    fn values<T: Copy>(list: &List<T>) -> vec::Vec<T> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_construct() {
        let list = List::<u32>::with_capacity(3);
        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
        assert!(list.head().is_none());
        assert!(list.tail().is_none());
        assert!(list.capacity() >= 3);
        assert_well_formed(&list);
    }

    #[test]
    fn test_add_items() {
        let mut list = List::with_capacity(2);
        let node1 = list.add(10);
        let node2 = list.add(20);
        assert_eq!(list.len(), 2);
        assert_ne!(node1, node2);
        assert_eq!(list.head(), Some(node2));
        assert_eq!(list.tail(), Some(node1));
        assert_eq!(values(&list), vec![20, 10]);
        assert_well_formed(&list);
    }

    #[test]
    fn test_get_value() {
        let mut list = List::with_capacity(3);
        let node = list.add(String::from("test"));
        assert_eq!(list.get_value(node).unwrap(), "test");

        list.get_value_mut(node).unwrap().push_str("_modified");
        assert_eq!(list.get_value(node).unwrap(), "test_modified");
    }

    #[test]
    fn test_remove_first_and_last() {
        let mut list = List::with_capacity(3);
        assert!(list.remove_first().is_none());
        assert!(list.remove_last().is_none());

        list.add(10);
        list.add(20);
        list.add(30);

        assert_eq!(list.remove_first(), Some(30));
        assert_well_formed(&list);
        assert_eq!(list.remove_last(), Some(10));
        assert_well_formed(&list);
        assert_eq!(list.remove_first(), Some(20));
        assert_well_formed(&list);
        assert!(list.is_empty());
    }

    #[test]
    fn test_move_to_front_middle() {
        let mut list = List::with_capacity(3);
        list.add(10);
        let middle = list.add(20);
        list.add(30);

        list.move_to_front(middle);
        assert_eq!(values(&list), vec![20, 30, 10]);
        assert_eq!(list.head(), Some(middle));
        assert_well_formed(&list);
    }

    #[test]
    fn test_move_to_front_tail() {
        let mut list = List::with_capacity(3);
        let tail = list.add(10);
        let middle = list.add(20);
        list.add(30);

        list.move_to_front(tail);
        assert_eq!(values(&list), vec![10, 30, 20]);
        assert_eq!(list.tail(), Some(middle));
        assert_well_formed(&list);
    }

    #[test]
    fn test_move_to_front_head_is_noop() {
        let mut list = List::with_capacity(3);
        list.add(10);
        let head = list.add(20);

        list.move_to_front(head);
        assert_eq!(values(&list), vec![20, 10]);
        assert_well_formed(&list);
    }

    #[test]
    fn test_move_to_front_lone_entry() {
        let mut list = List::with_capacity(1);
        let only = list.add(10);

        list.move_to_front(only);
        assert_eq!(list.head(), Some(only));
        assert_eq!(list.tail(), Some(only));
        assert_well_formed(&list);
    }

    #[test]
    fn test_move_to_front_two_entries() {
        let mut list = List::with_capacity(2);
        let first = list.add(1);
        let second = list.add(2);

        list.move_to_front(first);
        assert_eq!(list.head(), Some(first));
        assert_eq!(list.tail(), Some(second));
        assert_well_formed(&list);

        list.move_to_front(second);
        assert_eq!(values(&list), vec![2, 1]);
        assert_well_formed(&list);
    }

    #[test]
    fn test_remove_each_position() {
        // middle
        let mut list = List::with_capacity(3);
        list.add(1);
        let mid = list.add(2);
        list.add(3);
        assert_eq!(list.remove(mid), Some(2));
        assert_eq!(values(&list), vec![3, 1]);
        assert_well_formed(&list);

        // head
        let head = list.head().unwrap();
        assert_eq!(list.remove(head), Some(3));
        assert_eq!(values(&list), vec![1]);
        assert_well_formed(&list);

        // lone
        let lone = list.head().unwrap();
        assert_eq!(list.remove(lone), Some(1));
        assert!(list.head().is_none());
        assert!(list.tail().is_none());
        assert_well_formed(&list);

        // tail
        let tail = list.add(4);
        list.add(5);
        assert_eq!(list.remove(tail), Some(4));
        assert_eq!(values(&list), vec![5]);
        assert_well_formed(&list);
    }

    #[test]
    fn test_removed_handle_is_rejected() {
        let mut list = List::with_capacity(2);
        let node = list.add(1);
        list.add(2);
        assert_eq!(list.remove(node), Some(1));
        assert_eq!(list.remove(node), None);
        assert!(list.get_value(node).is_none());
        list.move_to_front(node);
        assert_eq!(values(&list), vec![2]);
        assert_well_formed(&list);
    }

    #[test]
    fn test_slots_are_reused() {
        let mut list = List::with_capacity(2);
        let a = list.add(1);
        list.add(2);
        list.remove(a);
        let c = list.add(3);
        assert_eq!(c, a);
        assert_eq!(list.len(), 2);
        assert_eq!(values(&list), vec![3, 2]);
        assert_well_formed(&list);
    }

    #[test]
    fn test_reserve_counts_vacant_slots() {
        let mut list = List::with_capacity(0);
        list.add(1);
        let b = list.add(2);
        list.remove(b);
        list.reserve(1);
        let before = list.capacity();
        list.add(3);
        assert_eq!(list.capacity(), before);

        list.reserve(4);
        let before = list.capacity();
        for i in 0..4 {
            list.add(i);
        }
        assert_eq!(list.capacity(), before);
    }

    #[test]
    fn test_clear() {
        let mut list = List::with_capacity(3);
        list.add(10);
        list.add(20);
        list.add(30);
        list.clear();
        assert!(list.is_empty());
        assert_well_formed(&list);

        list.add(40);
        assert_eq!(values(&list), vec![40]);
        assert_well_formed(&list);
    }

    #[test]
    fn test_iter_both_ends() {
        let mut list = List::with_capacity(4);
        for i in 1..=4 {
            list.add(i);
        }
        let mut iter = list.iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(&4));
        assert_eq!(iter.next_back(), Some(&1));
        assert_eq!(iter.next(), Some(&3));
        assert_eq!(iter.next_back(), Some(&2));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);

        let reversed: vec::Vec<_> = list.iter().rev().copied().collect();
        assert_eq!(reversed, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_random_operations_keep_list_well_formed() {
        // Deterministic pseudo-random walk over every primitive.
        let mut list = List::with_capacity(8);
        let mut live: vec::Vec<Handle> = vec::Vec::new();
        let mut seed: u32 = 0x2545_f491;
        for step in 0..2_000u32 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            match seed % 5 {
                0 | 1 => live.push(list.add(step)),
                2 if !live.is_empty() => {
                    let h = live[(seed as usize / 5) % live.len()];
                    list.move_to_front(h);
                }
                3 if !live.is_empty() => {
                    let i = (seed as usize / 5) % live.len();
                    let h = live.swap_remove(i);
                    assert!(list.remove(h).is_some());
                }
                4 => {
                    if let Some(tail) = list.tail() {
                        live.retain(|h| *h != tail);
                        assert!(list.remove_last().is_some());
                    }
                }
                _ => {}
            }
            assert_well_formed(&list);
            assert_eq!(list.len(), live.len());
        }
    }
}
