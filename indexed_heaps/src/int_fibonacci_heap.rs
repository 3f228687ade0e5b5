use std::hash::{BuildHasher, Hash};

use crate::errors::{BuildError, DuplicateElementError, MergeError};
use crate::fibonacci_heap::FibonacciHeap;
use crate::forest::{FibForest, ForestIter, NodeRef, OwnerIndex};
use crate::polarity::{Polarity, Priority};

/// A Fibonacci heap whose elements are `usize` values drawn from a fixed
/// domain `[0, domain)`.
///
/// The element→node index is a dense array instead of a hash map, so every
/// lookup is a direct slot access with no hashing at all. The trade is that
/// the domain is fixed at construction and the index always occupies
/// `domain` slots.
///
/// Elements are validated the way slice indexing is: offering or changing
/// an element outside the domain panics. Read-only queries treat an
/// out-of-domain element as simply not present.
#[derive(Clone, Debug)]
pub struct IntFibonacciHeap<P: Priority> {
    forest: FibForest<P>,
    index: Vec<Option<NodeRef>>,
}

impl<P: Priority> IntFibonacciHeap<P> {
    /// Creates an empty heap over the element domain `[0, domain)`.
    /// A zero domain is rejected.
    pub fn new(polarity: Polarity, domain: usize) -> Result<Self, BuildError> {
        if domain == 0 {
            return Err(BuildError::ZeroDomain);
        }
        Ok(Self {
            forest: FibForest::with_capacity(polarity, 0),
            index: vec![None; domain],
        })
    }

    /// Builds a heap from `(element, priority)` pairs by repeated O(1)
    /// insertion. The seed must be non-empty, free of duplicates, and
    /// within the domain.
    pub fn from_seed<I>(polarity: Polarity, domain: usize, items: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = (usize, P)>,
    {
        let mut result = Self::new(polarity, domain)?;
        for (element, priority) in items {
            if !result.offer(element, priority) {
                return Err(BuildError::DuplicateSeedElement);
            }
        }
        if result.is_empty() {
            return Err(BuildError::EmptySeed);
        }
        Ok(result)
    }

    /// Number of representable elements; offered elements must be below it.
    #[inline(always)]
    pub fn domain(&self) -> usize {
        self.index.len()
    }

    /// Inserts the element as a new root. Returns false without touching
    /// the heap if the element is already present. Amortized O(1).
    ///
    /// Panics if `element >= domain()`.
    pub fn offer(&mut self, element: usize, priority: P) -> bool {
        if self.index[element].is_some() {
            return false;
        }
        let node = self.forest.insert(OwnerIndex(element), priority);
        self.index[element] = Some(node);
        true
    }

    /// Strict form of [`offer`](Self::offer): a duplicate element is an
    /// error instead of a silent no-op.
    pub fn add(&mut self, element: usize, priority: P) -> Result<(), DuplicateElementError> {
        if self.offer(element, priority) {
            Ok(())
        } else {
            Err(DuplicateElementError)
        }
    }

    /// Removes and returns the extreme entry, consolidating the root list.
    /// Amortized O(log n).
    pub fn poll(&mut self) -> Option<(usize, P)> {
        let (owner, priority) = self.forest.extract_top()?;
        self.index[owner.0] = None;
        Some((owner.0, priority))
    }

    #[inline(always)]
    pub fn poll_element(&mut self) -> Option<usize> {
        self.poll().map(|(element, _)| element)
    }

    /// Polls the extreme entry, then inserts the given one, in one step.
    ///
    /// Rejected without touching the heap when `element` duplicates a
    /// present element other than the one being polled.
    /// Panics if `element >= domain()`.
    pub fn poll_then_add(
        &mut self,
        element: usize,
        priority: P,
    ) -> Result<Option<(usize, P)>, DuplicateElementError> {
        if let Some(node) = self.index[element] {
            if self.forest.top() != Some(node) {
                return Err(DuplicateElementError);
            }
        }
        let polled = self.poll();
        let inserted = self.offer(element, priority);
        debug_assert!(inserted, "Element cannot be present after the poll");
        Ok(polled)
    }

    /// The extreme entry without removing it. O(1).
    pub fn peek(&self) -> Option<(usize, &P)> {
        let top = self.forest.top()?;
        Some((self.forest.owner(top).0, self.forest.priority(top)))
    }

    #[inline(always)]
    pub fn peek_element(&self) -> Option<usize> {
        self.peek().map(|(element, _)| element)
    }

    #[inline(always)]
    pub fn peek_priority(&self) -> Option<&P> {
        self.peek().map(|(_, priority)| priority)
    }

    /// The priority of a present element. O(1), no hashing.
    pub fn get_priority(&self, element: usize) -> Option<&P> {
        let node = (*self.index.get(element)?)?;
        Some(self.forest.priority(node))
    }

    /// The priority of an element, or the worst representable priority for
    /// this orientation when the element is absent.
    pub fn priority_or_worst(&self, element: usize) -> P {
        match self.get_priority(element) {
            Some(&priority) => priority,
            None => self.forest.polarity().worst(),
        }
    }

    #[inline(always)]
    pub fn contains(&self, element: usize) -> bool {
        matches!(self.index.get(element), Some(Some(_)))
    }

    pub fn contains_entry(&self, element: usize, priority: &P) -> bool {
        self.get_priority(element) == Some(priority)
    }

    pub fn contains_all<I: IntoIterator<Item = usize>>(&self, elements: I) -> bool {
        elements.into_iter().all(|element| self.contains(element))
    }

    /// Sets the priority of an element, inserting it when absent.
    /// Returns true if the heap changed; an equal priority is a no-op
    /// returning false.
    ///
    /// Panics if `element >= domain()`.
    pub fn change(&mut self, element: usize, priority: P) -> bool {
        match self.index[element] {
            None => self.offer(element, priority),
            Some(node) => {
                let old = *self.forest.priority(node);
                if old == priority {
                    false
                } else if self.forest.polarity().prefers(&priority, &old) {
                    self.forest.promote(node, priority);
                    true
                } else {
                    self.forest.demote(node, priority);
                    true
                }
            }
        }
    }

    /// Improves the priority of a present element. Amortized O(1).
    /// Returns false without mutation when the element is absent or the new
    /// priority is not strictly better.
    pub fn promote(&mut self, element: usize, priority: P) -> bool {
        let node = match self.index.get(element) {
            Some(&Some(node)) => node,
            _ => return false,
        };
        if !self
            .forest
            .polarity()
            .prefers(&priority, self.forest.priority(node))
        {
            return false;
        }
        self.forest.promote(node, priority);
        true
    }

    /// Worsens the priority of a present element.
    /// Returns false without mutation when the element is absent or the new
    /// priority is not strictly worse.
    pub fn demote(&mut self, element: usize, priority: P) -> bool {
        let node = match self.index.get(element) {
            Some(&Some(node)) => node,
            _ => return false,
        };
        if !self
            .forest
            .polarity()
            .prefers(self.forest.priority(node), &priority)
        {
            return false;
        }
        self.forest.demote(node, priority);
        true
    }

    /// Removes an element from any position, returning its priority.
    /// Amortized O(log n); `None` when absent.
    pub fn remove(&mut self, element: usize) -> Option<P> {
        let node = (*self.index.get(element)?)?;
        let (owner, priority) = self.forest.delete(node);
        debug_assert_eq!(owner.0, element, "Owner tag out of sync");
        self.index[element] = None;
        Some(priority)
    }

    /// Removes the element only if it is present with exactly this
    /// priority.
    pub fn remove_entry(&mut self, element: usize, priority: &P) -> bool {
        if !self.contains_entry(element, priority) {
            return false;
        }
        self.remove(element).is_some()
    }

    /// Moves every entry of `other` into this heap, leaving `other` empty.
    ///
    /// Root lists are spliced in O(1); the O(n) cost is re-registering the
    /// transferred elements in this heap's index. Polarity, element
    /// disjointness, and domain fit are checked before either heap is
    /// touched.
    pub fn merge(&mut self, other: &mut Self) -> Result<bool, MergeError> {
        if self.polarity() != other.polarity() {
            return Err(MergeError::PolarityMismatch);
        }
        for (element, _) in other.iter() {
            if element >= self.domain() {
                return Err(MergeError::DomainExceeded);
            }
            if self.contains(element) {
                return Err(MergeError::DuplicateElement);
            }
        }
        if other.is_empty() {
            return Ok(false);
        }
        let (forest, index) = other.take_parts();
        let remap = self.forest.absorb(forest);
        // Owner tags are the element values themselves, so only the node
        // handles need re-pointing.
        for (element, node) in index
            .into_iter()
            .enumerate()
            .filter_map(|(element, slot)| slot.map(|node| (element, node)))
        {
            let new_node = remap[node.as_usize()].expect("Live nodes survive the transfer");
            self.index[element] = Some(new_node);
        }
        Ok(true)
    }

    /// Moves every entry of a hash-indexed heap over `usize` elements into
    /// this heap, leaving it empty. Same contract as [`merge`](Self::merge).
    pub fn merge_from_hashed<S: BuildHasher>(
        &mut self,
        other: &mut FibonacciHeap<usize, P, S>,
    ) -> Result<bool, MergeError> {
        if self.polarity() != other.polarity() {
            return Err(MergeError::PolarityMismatch);
        }
        for (&element, _) in other.iter() {
            if element >= self.domain() {
                return Err(MergeError::DomainExceeded);
            }
            if self.contains(element) {
                return Err(MergeError::DuplicateElement);
            }
        }
        if other.is_empty() {
            return Ok(false);
        }
        let (forest, entries) = other.take_parts();
        let remap = self.forest.absorb(forest);
        for (element, node) in entries {
            let new_node = remap[node.as_usize()].expect("Live nodes survive the transfer");
            self.forest.set_owner(new_node, OwnerIndex(element));
            self.index[element] = Some(new_node);
        }
        Ok(true)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.forest.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.forest.is_empty()
    }

    /// Removes every entry. The domain is unchanged.
    pub fn clear(&mut self) {
        self.forest.clear();
        for slot in self.index.iter_mut() {
            *slot = None;
        }
    }

    #[inline(always)]
    pub fn polarity(&self) -> Polarity {
        self.forest.polarity()
    }

    /// Lazy iterator over `(element, &priority)` in forest order: the root
    /// list starting at the extreme, each tree pre-order.
    #[inline(always)]
    pub fn iter(&self) -> IntFibonacciHeapBorrowIter<P> {
        IntFibonacciHeapBorrowIter {
            forest_iter: self.forest.iter(),
        }
    }

    /// Takes the forest and index out, leaving this heap empty with the
    /// same polarity and domain.
    pub(crate) fn take_parts(&mut self) -> (FibForest<P>, Vec<Option<NodeRef>>) {
        let polarity = self.forest.polarity();
        let domain = self.domain();
        let forest = std::mem::replace(&mut self.forest, FibForest::with_capacity(polarity, 0));
        let index = std::mem::replace(&mut self.index, vec![None; domain]);
        (forest, index)
    }
}

impl<P: Priority> PartialEq for IntFibonacciHeap<P> {
    /// Structural equality: same polarity, domain, length, and the same
    /// `(element, priority)` sequence in forest order.
    fn eq(&self, other: &Self) -> bool {
        self.polarity() == other.polarity()
            && self.domain() == other.domain()
            && self.len() == other.len()
            && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<P: Priority> Eq for IntFibonacciHeap<P> {}

impl<P: Priority + Hash> Hash for IntFibonacciHeap<P> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.polarity().hash(state);
        self.domain().hash(state);
        self.len().hash(state);
        for (element, priority) in self.iter() {
            element.hash(state);
            priority.hash(state);
        }
    }
}

/// Borrowing iterator in forest order.
pub struct IntFibonacciHeapBorrowIter<'a, P: Priority> {
    forest_iter: ForestIter<'a, P>,
}

impl<'a, P: Priority> Iterator for IntFibonacciHeapBorrowIter<'a, P> {
    type Item = (usize, &'a P);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (owner, priority) = self.forest_iter.next()?;
        Some((owner.0, priority))
    }
}

/// Consuming iterator draining entries in extreme-first order.
pub struct IntFibonacciHeapIntoIter<P: Priority> {
    heap: IntFibonacciHeap<P>,
}

impl<P: Priority> Iterator for IntFibonacciHeapIntoIter<P> {
    type Item = (usize, P);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.heap.poll()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.heap.len();
        (len, Some(len))
    }
}

impl<P: Priority> IntoIterator for IntFibonacciHeap<P> {
    type Item = (usize, P);
    type IntoIter = IntFibonacciHeapIntoIter<P>;

    /// Drains the heap in extreme-first order.
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntFibonacciHeapIntoIter { heap: self }
    }
}
