//! Intrusive doubly linked recency list used by [`LruPolicy`](crate::LruPolicy).
//!
//! Nodes are heap-allocated and addressed by raw pointer so the owning map can
//! jump straight to a node and relink it in O(1). Head and tail sentinels
//! remove the empty-list special cases from every splice.
//!
//! ```text
//!   head ⇄ most recent ⇄ ... ⇄ least recent ⇄ tail
//! ```

extern crate alloc;

use alloc::boxed::Box;
use core::fmt;
use core::mem;
use core::ptr::{self, NonNull};

/// A node in the recency list.
pub struct Node<T> {
    /// Uninitialized only in the two sentinels.
    val: mem::MaybeUninit<T>,
    prev: *mut Node<T>,
    next: *mut Node<T>,
}

impl<T> Node<T> {
    fn new(val: T) -> Self {
        Node {
            val: mem::MaybeUninit::new(val),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    fn new_sentinel() -> Self {
        Node {
            val: mem::MaybeUninit::uninit(),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Returns the stored value.
    ///
    /// # Safety
    ///
    /// Must not be called on a sentinel.
    pub unsafe fn value(&self) -> &T {
        self.val.assume_init_ref()
    }

    /// Moves the stored value out of a detached node.
    ///
    /// # Safety
    ///
    /// Must not be called on a sentinel.
    pub unsafe fn into_value(self: Box<Self>) -> T {
        let node = *self;
        node.val.assume_init()
    }
}

/// Unbounded doubly linked list with O(1) splice operations.
///
/// Capacity is the caller's concern: the cache façade bounds residency by
/// total size, not entry count.
pub struct List<T> {
    len: usize,
    head: *mut Node<T>,
    tail: *mut Node<T>,
}

impl<T> List<T> {
    /// Creates an empty list.
    pub fn new() -> List<T> {
        let head = Box::into_raw(Box::new(Node::new_sentinel()));
        let tail = Box::into_raw(Box::new(Node::new_sentinel()));

        // SAFETY: head and tail are freshly allocated and valid
        unsafe {
            (*head).next = tail;
            (*tail).prev = head;
        }

        List { len: 0, head, tail }
    }

    /// Returns the number of values in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Links `val` in as the most recent node and returns its address.
    ///
    /// The pointer stays valid until the node is removed or the list dropped.
    pub fn push_front(&mut self, val: T) -> *mut Node<T> {
        // SAFETY: Box::into_raw never returns null
        let node = unsafe { NonNull::new_unchecked(Box::into_raw(Box::new(Node::new(val)))) };
        // SAFETY: node is newly allocated and not linked anywhere
        unsafe { self.attach_front(node.as_ptr()) };
        self.len += 1;
        node.as_ptr()
    }

    /// Unlinks the least recent node.
    pub fn pop_back(&mut self) -> Option<Box<Node<T>>> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is non-empty so tail.prev is a value node
        unsafe {
            let last = (*self.tail).prev;
            self.detach(last);
            self.len -= 1;
            Some(Box::from_raw(last))
        }
    }

    /// Unlinks `node` and hands ownership back to the caller.
    ///
    /// # Safety
    ///
    /// `node` must be a value node currently linked into this list.
    pub unsafe fn remove(&mut self, node: *mut Node<T>) -> Box<Node<T>> {
        debug_assert!(!node.is_null() && node != self.head && node != self.tail);
        self.detach(node);
        self.len -= 1;
        Box::from_raw(node)
    }

    /// Relinks `node` as the most recent node.
    ///
    /// # Safety
    ///
    /// `node` must be a value node currently linked into this list.
    pub unsafe fn move_to_front(&mut self, node: *mut Node<T>) {
        if (*self.head).next == node {
            return;
        }
        self.detach(node);
        self.attach_front(node);
    }

    /// Drops every value in the list.
    pub fn clear(&mut self) {
        while let Some(node) = self.pop_back() {
            // SAFETY: pop_back never yields a sentinel
            drop(unsafe { node.into_value() });
        }
    }

    /// # Safety
    ///
    /// `node` must be linked into this list.
    unsafe fn detach(&mut self, node: *mut Node<T>) {
        (*(*node).prev).next = (*node).next;
        (*(*node).next).prev = (*node).prev;
    }

    /// # Safety
    ///
    /// `node` must be valid and not linked into any list.
    unsafe fn attach_front(&mut self, node: *mut Node<T>) {
        (*node).next = (*self.head).next;
        (*node).prev = self.head;
        (*self.head).next = node;
        (*(*node).next).prev = node;
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        List::new()
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        self.clear();

        // SAFETY: the sentinels were allocated in `new` and are freed only here
        unsafe {
            drop(Box::from_raw(self.head));
            drop(Box::from_raw(self.tail));
        }
    }
}

impl<T> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List").field("len", &self.len).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;

    fn drain_back(list: &mut List<u32>) -> alloc::vec::Vec<u32> {
        let mut out = alloc::vec::Vec::new();
        while let Some(node) = list.pop_back() {
            out.push(unsafe { node.into_value() });
        }
        out
    }

    #[test]
    fn test_push_front_and_pop_back_order() {
        let mut list = List::new();
        assert!(list.pop_back().is_none());

        list.push_front(10);
        list.push_front(20);
        list.push_front(30);
        assert_eq!(list.len(), 3);

        assert_eq!(drain_back(&mut list), [10, 20, 30]);
        assert!(list.is_empty());
    }

    #[test]
    fn test_move_to_front() {
        let mut list = List::new();
        let oldest = list.push_front(10);
        list.push_front(20);
        let newest = list.push_front(30);

        unsafe {
            list.move_to_front(oldest);
            list.move_to_front(newest);
        }
        assert_eq!(list.len(), 3);
        assert_eq!(drain_back(&mut list), [20, 10, 30]);
    }

    #[test]
    fn test_remove_middle_node() {
        let mut list = List::new();
        list.push_front(10);
        let middle = list.push_front(20);
        list.push_front(30);

        let node = unsafe { list.remove(middle) };
        assert_eq!(unsafe { node.into_value() }, 20);
        assert_eq!(list.len(), 2);
        assert_eq!(drain_back(&mut list), [10, 30]);
    }

    #[test]
    fn test_clear_and_drop_release_values() {
        let tracker = Rc::new(());
        let mut list = List::new();
        for _ in 0..4 {
            list.push_front(Rc::clone(&tracker));
        }
        assert_eq!(Rc::strong_count(&tracker), 5);

        list.clear();
        assert_eq!(Rc::strong_count(&tracker), 1);
        assert!(list.is_empty());

        list.push_front(Rc::clone(&tracker));
        drop(list);
        assert_eq!(Rc::strong_count(&tracker), 1);
    }
}
