use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

use crate::errors::{BuildError, DuplicateElementError, MergeError};
use crate::forest::{FibForest, ForestIter, NodeRef, OwnerIndex};
use crate::int_fibonacci_heap::IntFibonacciHeap;
use crate::mediator::{Mediator, MediatorEntry, MediatorIndex};
use crate::polarity::{Polarity, Priority};

/// A Fibonacci heap over unique elements with an element→node index.
///
/// Same contract as [`IndexedBinaryHeap`](crate::IndexedBinaryHeap) with a
/// different cost profile: `offer` and `promote` are amortized O(1) and
/// `merge` splices root lists instead of rebuilding, at the price of a
/// lazier structure that pays O(log n) amortized on `poll`.
///
/// Nodes live in an arena indexed by integer handles, so the classic
/// pointer surgery is plain index bookkeeping and removed nodes recycle
/// their slots through a free list.
pub struct FibonacciHeap<T: Hash + Eq, P: Priority, S: BuildHasher = RandomState> {
    forest: FibForest<P>,
    mediator: Mediator<T, NodeRef, S>,
}

impl<T: Hash + Eq, P: Priority> FibonacciHeap<T, P, RandomState> {
    /// Creates an empty heap with the given orientation.
    #[inline(always)]
    pub fn new(polarity: Polarity) -> Self {
        Self::with_hasher(polarity, RandomState::default())
    }

    /// Creates an empty heap that polls the smallest priority first.
    #[inline(always)]
    pub fn new_min() -> Self {
        Self::new(Polarity::Min)
    }

    /// Creates an empty heap that polls the largest priority first.
    #[inline(always)]
    pub fn new_max() -> Self {
        Self::new(Polarity::Max)
    }

    /// Creates an empty heap with arena space preallocated for `capacity`
    /// nodes. A zero capacity request is rejected.
    #[inline(always)]
    pub fn with_capacity(polarity: Polarity, capacity: usize) -> Result<Self, BuildError> {
        Self::with_capacity_and_hasher(polarity, capacity, RandomState::default())
    }

    /// Builds a heap from `(element, priority)` pairs by repeated O(1)
    /// insertion. The seed must be non-empty and free of duplicates.
    #[inline(always)]
    pub fn from_seed<I>(polarity: Polarity, items: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = (T, P)>,
    {
        Self::from_seed_with_hasher(polarity, items, RandomState::default())
    }
}

impl<T: Hash + Eq, P: Priority, S: BuildHasher> FibonacciHeap<T, P, S> {
    #[inline(always)]
    pub fn with_hasher(polarity: Polarity, hasher: S) -> Self {
        Self {
            forest: FibForest::with_capacity(polarity, 0),
            mediator: Mediator::with_capacity_and_hasher(0, hasher),
        }
    }

    pub fn with_capacity_and_hasher(
        polarity: Polarity,
        capacity: usize,
        hasher: S,
    ) -> Result<Self, BuildError> {
        if capacity == 0 {
            return Err(BuildError::ZeroCapacity);
        }
        Ok(Self {
            forest: FibForest::with_capacity(polarity, capacity),
            mediator: Mediator::with_capacity_and_hasher(capacity, hasher),
        })
    }

    pub fn from_seed_with_hasher<I>(
        polarity: Polarity,
        items: I,
        hasher: S,
    ) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = (T, P)>,
    {
        let mut result = Self::with_hasher(polarity, hasher);
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

    /// Inserts the element as a new root. Returns false without touching
    /// the heap if the element is already present. Amortized O(1).
    pub fn offer(&mut self, element: T, priority: P) -> bool {
        match self.mediator.entry(element) {
            MediatorEntry::Occupied(..) => false,
            MediatorEntry::Vacant(entry) => {
                let mediator_index = entry.index();
                let node = self.forest.insert(OwnerIndex(mediator_index.0), priority);
                entry.insert(node);
                true
            }
        }
    }

    /// Strict form of [`offer`](Self::offer): a duplicate element is an
    /// error instead of a silent no-op.
    pub fn add(&mut self, element: T, priority: P) -> Result<(), DuplicateElementError> {
        if self.offer(element, priority) {
            Ok(())
        } else {
            Err(DuplicateElementError)
        }
    }

    /// Removes and returns the extreme entry, consolidating the root list.
    /// Amortized O(log n).
    pub fn poll(&mut self) -> Option<(T, P)> {
        let (owner, priority) = self.forest.extract_top()?;
        let element = self.unregister(MediatorIndex(owner.0));
        Some((element, priority))
    }

    #[inline(always)]
    pub fn poll_element(&mut self) -> Option<T> {
        self.poll().map(|(element, _)| element)
    }

    /// Polls the extreme entry, then inserts the given one, in one step.
    ///
    /// Rejected without touching the heap when `element` duplicates a
    /// present element other than the one being polled.
    pub fn poll_then_add(
        &mut self,
        element: T,
        priority: P,
    ) -> Result<Option<(T, P)>, DuplicateElementError> {
        if let Some((mediator_index, _, _)) = self.mediator.get_full(&element) {
            let top = self
                .forest
                .top()
                .map(|node| MediatorIndex(self.forest.owner(node).0));
            if top != Some(mediator_index) {
                return Err(DuplicateElementError);
            }
        }
        let polled = self.poll();
        let inserted = self.offer(element, priority);
        debug_assert!(inserted, "Element cannot be present after the poll");
        Ok(polled)
    }

    /// The extreme entry without removing it. O(1).
    pub fn peek(&self) -> Option<(&T, &P)> {
        let top = self.forest.top()?;
        let owner = self.forest.owner(top);
        let (element, _) = self.mediator.get_index(MediatorIndex(owner.0));
        Some((element, self.forest.priority(top)))
    }

    #[inline(always)]
    pub fn peek_element(&self) -> Option<&T> {
        self.peek().map(|(element, _)| element)
    }

    #[inline(always)]
    pub fn peek_priority(&self) -> Option<&P> {
        self.peek().map(|(_, priority)| priority)
    }

    /// The priority of a present element. O(1).
    pub fn get_priority<Q>(&self, element: &Q) -> Option<&P>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let node = self.mediator.get(element)?;
        Some(self.forest.priority(node))
    }

    /// The priority of an element, or the worst representable priority for
    /// this orientation when the element is absent.
    pub fn priority_or_worst<Q>(&self, element: &Q) -> P
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.get_priority(element) {
            Some(&priority) => priority,
            None => self.forest.polarity().worst(),
        }
    }

    #[inline(always)]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.mediator.get(element).is_some()
    }

    pub fn contains_entry<Q>(&self, element: &Q, priority: &P) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_priority(element) == Some(priority)
    }

    pub fn contains_all<'a, Q, I>(&self, elements: I) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
        I: IntoIterator<Item = &'a Q>,
    {
        elements.into_iter().all(|element| self.contains(element))
    }

    /// Sets the priority of an element, inserting it when absent.
    ///
    /// Returns true if the heap changed; an equal priority is a no-op
    /// returning false. An improvement is amortized O(1), a worsening
    /// restructures the node's subtree.
    pub fn change(&mut self, element: T, priority: P) -> bool {
        match self.mediator.entry(element) {
            MediatorEntry::Vacant(entry) => {
                let mediator_index = entry.index();
                let node = self.forest.insert(OwnerIndex(mediator_index.0), priority);
                entry.insert(node);
                true
            }
            MediatorEntry::Occupied(_, node) => {
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
    pub fn promote<Q>(&mut self, element: &Q, priority: P) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let node = match self.mediator.get(element) {
            Some(node) => node,
            None => return false,
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
    pub fn demote<Q>(&mut self, element: &Q, priority: P) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let node = match self.mediator.get(element) {
            Some(node) => node,
            None => return false,
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
    pub fn remove<Q>(&mut self, element: &Q) -> Option<P>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (mediator_index, _, node) = self.mediator.get_full(element)?;
        let (owner, priority) = self.forest.delete(node);
        debug_assert_eq!(owner.0, mediator_index.0, "Owner tag out of sync");
        self.unregister(mediator_index);
        Some(priority)
    }

    /// Removes the element only if it is present with exactly this
    /// priority.
    pub fn remove_entry<Q>(&mut self, element: &Q, priority: &P) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if !self.contains_entry(element, priority) {
            return false;
        }
        self.remove(element).is_some()
    }

    /// Moves every entry of `other` into this heap, leaving `other` empty.
    ///
    /// Root lists are spliced in O(1); the O(n) cost is re-registering the
    /// transferred elements in this heap's index. Polarity and element
    /// disjointness are checked before either heap is touched.
    pub fn merge(&mut self, other: &mut Self) -> Result<bool, MergeError> {
        if self.polarity() != other.polarity() {
            return Err(MergeError::PolarityMismatch);
        }
        for (element, _) in other.mediator.iter() {
            if self.mediator.get(element).is_some() {
                return Err(MergeError::DuplicateElement);
            }
        }
        if other.is_empty() {
            return Ok(false);
        }
        let (forest, entries) = other.take_parts();
        let remap = self.forest.absorb(forest);
        self.mediator.reserve(entries.len());
        for (element, node) in entries {
            let new_node = remap[node.as_usize()].expect("Live nodes survive the transfer");
            self.register(element, new_node);
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

    /// Removes every entry. Keeps allocated capacity of the index.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.forest.clear();
        self.mediator.clear();
    }

    #[inline(always)]
    pub fn polarity(&self) -> Polarity {
        self.forest.polarity()
    }

    /// Lazy iterator over `(&element, &priority)` in forest order: the
    /// root list starting at the extreme, each tree pre-order.
    #[inline(always)]
    pub fn iter(&self) -> FibonacciHeapBorrowIter<T, P, S> {
        FibonacciHeapBorrowIter {
            forest_iter: self.forest.iter(),
            mediator: &self.mediator,
        }
    }

    pub(crate) fn take_parts(&mut self) -> (FibForest<P>, Vec<(T, NodeRef)>) {
        let polarity = self.forest.polarity();
        let forest = std::mem::replace(&mut self.forest, FibForest::with_capacity(polarity, 0));
        let entries = self.mediator.drain().collect();
        (forest, entries)
    }

    fn register(&mut self, element: T, node: NodeRef) {
        match self.mediator.entry(element) {
            MediatorEntry::Vacant(entry) => {
                let mediator_index = entry.index();
                entry.insert(node);
                self.forest.set_owner(node, OwnerIndex(mediator_index.0));
            }
            MediatorEntry::Occupied(..) => {
                unreachable!("Element collisions are checked before any mutation")
            }
        }
    }

    /// Removes the mediator entry whose node was just deleted, then
    /// re-tags the node of the entry displaced by `swap_remove_index`.
    fn unregister(&mut self, mediator_index: MediatorIndex) -> T {
        let (element, _) = self.mediator.swap_remove_index(mediator_index);
        if mediator_index.0 < self.mediator.len() {
            let (_, moved_node) = self.mediator.get_index(mediator_index);
            self.forest.set_owner(moved_node, OwnerIndex(mediator_index.0));
        }
        element
    }
}

impl<P: Priority, S: BuildHasher> FibonacciHeap<usize, P, S> {
    /// Moves every entry of a bounded-integer-domain heap into this heap,
    /// leaving it empty. Same contract as [`merge`](Self::merge); the two
    /// forests are spliced, only the index entries are rebuilt.
    pub fn merge_from_int(&mut self, other: &mut IntFibonacciHeap<P>) -> Result<bool, MergeError> {
        if self.polarity() != other.polarity() {
            return Err(MergeError::PolarityMismatch);
        }
        for (element, _) in other.iter() {
            if self.mediator.get(&element).is_some() {
                return Err(MergeError::DuplicateElement);
            }
        }
        if other.is_empty() {
            return Ok(false);
        }
        let transferred = other.len();
        let (forest, index) = other.take_parts();
        let remap = self.forest.absorb(forest);
        self.mediator.reserve(transferred);
        for (element, node) in index
            .into_iter()
            .enumerate()
            .filter_map(|(element, slot)| slot.map(|node| (element, node)))
        {
            let new_node = remap[node.as_usize()].expect("Live nodes survive the transfer");
            self.register(element, new_node);
        }
        Ok(true)
    }
}

impl<T: Hash + Eq + Clone, P: Priority, S: BuildHasher + Clone> Clone for FibonacciHeap<T, P, S> {
    fn clone(&self) -> Self {
        Self {
            forest: self.forest.clone(),
            mediator: self.mediator.clone(),
        }
    }
}

impl<T: Hash + Eq, P: Priority, S: BuildHasher> PartialEq for FibonacciHeap<T, P, S> {
    /// Structural equality: same polarity, same length, and the same
    /// `(element, priority)` sequence in forest order. Heaps holding the
    /// same entries in differently shaped forests compare unequal.
    fn eq(&self, other: &Self) -> bool {
        self.polarity() == other.polarity()
            && self.len() == other.len()
            && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Hash + Eq, P: Priority, S: BuildHasher> Eq for FibonacciHeap<T, P, S> {}

impl<T: Hash + Eq, P: Priority + Hash, S: BuildHasher> Hash for FibonacciHeap<T, P, S> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.polarity().hash(state);
        self.len().hash(state);
        for (element, priority) in self.iter() {
            element.hash(state);
            priority.hash(state);
        }
    }
}

impl<T: Hash + Eq + Debug, P: Priority, S: BuildHasher> Debug for FibonacciHeap<T, P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Borrowing iterator in forest order.
pub struct FibonacciHeapBorrowIter<'a, T: 'a + Hash + Eq, P: Priority, S: BuildHasher> {
    forest_iter: ForestIter<'a, P>,
    mediator: &'a Mediator<T, NodeRef, S>,
}

impl<'a, T: 'a + Hash + Eq, P: Priority, S: BuildHasher> Iterator
    for FibonacciHeapBorrowIter<'a, T, P, S>
{
    type Item = (&'a T, &'a P);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (owner, priority) = self.forest_iter.next()?;
        let (element, _) = self.mediator.get_index(MediatorIndex(owner.0));
        Some((element, priority))
    }
}

/// Consuming iterator draining entries in extreme-first order.
pub struct FibonacciHeapIntoIter<T: Hash + Eq, P: Priority, S: BuildHasher> {
    heap: FibonacciHeap<T, P, S>,
}

impl<T: Hash + Eq, P: Priority, S: BuildHasher> Iterator for FibonacciHeapIntoIter<T, P, S> {
    type Item = (T, P);

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

impl<T: Hash + Eq, P: Priority, S: BuildHasher> IntoIterator for FibonacciHeap<T, P, S> {
    type Item = (T, P);
    type IntoIter = FibonacciHeapIntoIter<T, P, S>;

    /// Drains the heap in extreme-first order.
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        FibonacciHeapIntoIter { heap: self }
    }
}
