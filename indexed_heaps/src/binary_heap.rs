use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

use crate::binary_core::{BinaryCore, BinaryCoreIter, HeapPos};
use crate::errors::{BuildError, DuplicateElementError, MergeError};
use crate::mediator::{Mediator, MediatorEntry, MediatorIndex};
use crate::polarity::{Polarity, Priority};

/// An array-based binary heap over unique elements with an element→position
/// index.
///
/// Every element is present at most once; membership tests and priority
/// lookups are O(1) through the index, and the priority of any present
/// element can be changed in place in O(log n).
///
/// The orientation is fixed at construction: a `Polarity::Min` heap polls
/// the smallest priority first, a `Polarity::Max` heap the largest.
///
/// ```
/// use indexed_heaps::{IndexedBinaryHeap, Polarity};
///
/// let mut heap = IndexedBinaryHeap::new(Polarity::Min);
/// assert!(heap.offer("walk dog", 3));
/// assert!(heap.offer("water plants", 5));
/// assert!(heap.offer("pay rent", 1));
/// // A second offer of a present element changes nothing.
/// assert!(!heap.offer("pay rent", 100));
///
/// assert_eq!(heap.poll(), Some(("pay rent", 1)));
/// assert!(heap.change("walk dog", 7));
/// assert_eq!(heap.poll(), Some(("water plants", 5)));
/// assert_eq!(heap.poll(), Some(("walk dog", 7)));
/// assert_eq!(heap.poll(), None);
/// ```
pub struct IndexedBinaryHeap<T: Hash + Eq, P: Priority, S: BuildHasher = RandomState> {
    heap: BinaryCore<P>,
    mediator: Mediator<T, HeapPos, S>,
}

impl<T: Hash + Eq, P: Priority> IndexedBinaryHeap<T, P, RandomState> {
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

    /// Creates an empty heap with space preallocated for `capacity`
    /// entries. A zero capacity request is rejected.
    #[inline(always)]
    pub fn with_capacity(polarity: Polarity, capacity: usize) -> Result<Self, BuildError> {
        Self::with_capacity_and_hasher(polarity, capacity, RandomState::default())
    }

    /// Builds a heap from `(element, priority)` pairs by bulk heapify.
    /// The seed must be non-empty and free of duplicate elements; otherwise
    /// nothing is built.
    #[inline(always)]
    pub fn from_seed<I>(polarity: Polarity, items: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = (T, P)>,
    {
        Self::from_seed_with_hasher(polarity, items, RandomState::default())
    }
}

impl<T: Hash + Eq, P: Priority, S: BuildHasher> IndexedBinaryHeap<T, P, S> {
    /// Creates an empty heap with the given orientation and hasher.
    #[inline(always)]
    pub fn with_hasher(polarity: Polarity, hasher: S) -> Self {
        Self {
            heap: BinaryCore::with_capacity(polarity, 0),
            mediator: Mediator::with_capacity_and_hasher(0, hasher),
        }
    }

    /// Creates an empty heap with preallocated space and the given hasher.
    /// A zero capacity request is rejected.
    pub fn with_capacity_and_hasher(
        polarity: Polarity,
        capacity: usize,
        hasher: S,
    ) -> Result<Self, BuildError> {
        if capacity == 0 {
            return Err(BuildError::ZeroCapacity);
        }
        Ok(Self {
            heap: BinaryCore::with_capacity(polarity, capacity),
            mediator: Mediator::with_capacity_and_hasher(capacity, hasher),
        })
    }

    /// Builds a heap from `(element, priority)` pairs by bulk heapify,
    /// O(n) instead of n sifted pushes.
    pub fn from_seed_with_hasher<I>(
        polarity: Polarity,
        items: I,
        hasher: S,
    ) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = (T, P)>,
    {
        let items = items.into_iter();
        let (lower_bound, _) = items.size_hint();
        let mut result = Self {
            heap: BinaryCore::with_capacity(polarity, lower_bound),
            mediator: Mediator::with_capacity_and_hasher(lower_bound, hasher),
        };
        for (element, priority) in items {
            match result.mediator.entry(element) {
                MediatorEntry::Occupied(..) => return Err(BuildError::DuplicateSeedElement),
                MediatorEntry::Vacant(entry) => {
                    let mediator_index = entry.index();
                    let position = result.heap.push_unordered(mediator_index, priority);
                    entry.insert(position);
                }
            }
        }
        if result.heap.is_empty() {
            return Err(BuildError::EmptySeed);
        }
        let (heap, mediator) = (&mut result.heap, &mut result.mediator);
        heap.rebuild(|key, pos| {
            *mediator.get_index_mut(key) = pos;
        });
        Ok(result)
    }

    /// Inserts the element with the given priority.
    /// Returns false without touching the heap if the element is already
    /// present. O(log n).
    pub fn offer(&mut self, element: T, priority: P) -> bool {
        match self.mediator.entry(element) {
            MediatorEntry::Occupied(..) => false,
            MediatorEntry::Vacant(entry) => {
                let mediator_index = entry.index();
                // The handler rewrites this with the post-sift position.
                entry.insert(HeapPos(self.heap.len()));
                let (heap, mediator) = (&mut self.heap, &mut self.mediator);
                heap.push(mediator_index, priority, |key, pos| {
                    *mediator.get_index_mut(key) = pos;
                });
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

    /// Removes and returns the extreme entry. O(log n).
    pub fn poll(&mut self) -> Option<(T, P)> {
        let (heap, mediator) = (&mut self.heap, &mut self.mediator);
        let (mediator_index, priority) = heap.pop(|key, pos| {
            *mediator.get_index_mut(key) = pos;
        })?;
        let (element, _) = self.mediator.swap_remove_index(mediator_index);
        self.repair_displaced(mediator_index);
        Some((element, priority))
    }

    /// Removes the extreme entry and returns its element alone.
    #[inline(always)]
    pub fn poll_element(&mut self) -> Option<T> {
        self.poll().map(|(element, _)| element)
    }

    /// Polls the extreme entry, then inserts the given one, in one step.
    ///
    /// Rejected without touching the heap when `element` duplicates a
    /// present element other than the one being polled; re-offering the
    /// polled element itself is allowed.
    pub fn poll_then_add(
        &mut self,
        element: T,
        priority: P,
    ) -> Result<Option<(T, P)>, DuplicateElementError> {
        if let Some((mediator_index, _, _)) = self.mediator.get_full(&element) {
            let top = self.heap.peek().map(|(index, _)| index);
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
        let (mediator_index, priority) = self.heap.peek()?;
        let (element, _) = self.mediator.get_index(mediator_index);
        Some((element, priority))
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
        let position = self.mediator.get(element)?;
        let (_, priority) = self
            .heap
            .look_into(position)
            .expect("All mediator positions must be valid");
        Some(priority)
    }

    /// The priority of an element, or the worst representable priority for
    /// this orientation when the element is absent. An absent element
    /// therefore never beats a present one in comparisons.
    pub fn priority_or_worst<Q>(&self, element: &Q) -> P
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.get_priority(element) {
            Some(&priority) => priority,
            None => self.heap.polarity().worst(),
        }
    }

    /// O(1) membership test.
    #[inline(always)]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.mediator.get(element).is_some()
    }

    /// True if the element is present with exactly this priority.
    pub fn contains_entry<Q>(&self, element: &Q, priority: &P) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_priority(element) == Some(priority)
    }

    /// True if every element of the iterator is present.
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
    /// Returns true if the heap changed: the element was inserted, or its
    /// priority differed and was updated in place. An equal priority is a
    /// no-op returning false.
    pub fn change(&mut self, element: T, priority: P) -> bool {
        match self.mediator.entry(element) {
            MediatorEntry::Vacant(entry) => {
                let mediator_index = entry.index();
                entry.insert(HeapPos(self.heap.len()));
                let (heap, mediator) = (&mut self.heap, &mut self.mediator);
                heap.push(mediator_index, priority, |key, pos| {
                    *mediator.get_index_mut(key) = pos;
                });
                true
            }
            MediatorEntry::Occupied(_, position) => {
                let (_, &old) = self
                    .heap
                    .look_into(position)
                    .expect("All mediator positions must be valid");
                if old == priority {
                    return false;
                }
                self.set_priority_internal(position, priority);
                true
            }
        }
    }

    /// Improves the priority of a present element.
    /// Returns false without mutation when the element is absent or the new
    /// priority is not strictly better.
    pub fn promote<Q>(&mut self, element: &Q, priority: P) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = match self.mediator.get(element) {
            Some(position) => position,
            None => return false,
        };
        let (_, &old) = self
            .heap
            .look_into(position)
            .expect("All mediator positions must be valid");
        if !self.heap.polarity().prefers(&priority, &old) {
            return false;
        }
        self.set_priority_internal(position, priority);
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
        let position = match self.mediator.get(element) {
            Some(position) => position,
            None => return false,
        };
        let (_, &old) = self
            .heap
            .look_into(position)
            .expect("All mediator positions must be valid");
        if !self.heap.polarity().prefers(&old, &priority) {
            return false;
        }
        self.set_priority_internal(position, priority);
        true
    }

    /// Removes an element from any position, returning its priority.
    /// O(log n); `None` when absent.
    pub fn remove<Q>(&mut self, element: &Q) -> Option<P>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (mediator_index, _, _) = self.mediator.get_full(element)?;
        let (_, priority) = self.remove_internal(mediator_index);
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
    /// The polarities must match and the element sets must be disjoint;
    /// both are checked before either heap is touched, so an error leaves
    /// both heaps unchanged. Returns whether `other` had any entries.
    /// O(n + m) via bulk heapify of the combined array.
    pub fn merge(&mut self, other: &mut Self) -> Result<bool, MergeError> {
        if self.heap.polarity() != other.heap.polarity() {
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
        self.heap.reserve(other.len());
        self.mediator.reserve(other.len());
        let other_heap = &other.heap;
        for (element, position) in other.mediator.drain() {
            let (_, &priority) = other_heap
                .look_into(position)
                .expect("All mediator positions must be valid");
            match self.mediator.entry(element) {
                MediatorEntry::Vacant(entry) => {
                    let mediator_index = entry.index();
                    let new_position = self.heap.push_unordered(mediator_index, priority);
                    entry.insert(new_position);
                }
                MediatorEntry::Occupied(..) => {
                    unreachable!("Element collisions are checked before any mutation")
                }
            }
        }
        other.heap.clear();
        let (heap, mediator) = (&mut self.heap, &mut self.mediator);
        heap.rebuild(|key, pos| {
            *mediator.get_index_mut(key) = pos;
        });
        Ok(true)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Removes every entry. Keeps allocated capacity.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.heap.clear();
        self.mediator.clear();
    }

    #[inline(always)]
    pub fn polarity(&self) -> Polarity {
        self.heap.polarity()
    }

    /// Number of entries the heap array can hold without reallocating.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }

    /// Grows capacity to at least `total` entries. Never shrinks and never
    /// touches the stored entries.
    pub fn ensure_capacity(&mut self, total: usize) {
        if total > self.heap.capacity() {
            let additional = total - self.heap.len();
            self.heap.reserve(additional);
            self.mediator.reserve(additional);
        }
    }

    /// Reserves space for at least `additional` further entries.
    pub fn reserve(&mut self, additional: usize) {
        self.heap.reserve(additional);
        self.mediator.reserve(additional);
    }

    /// Drops excess capacity.
    pub fn shrink_to_fit(&mut self) {
        self.heap.shrink_to_fit();
        self.mediator.shrink_to_fit();
    }

    /// Lazy iterator over `(&element, &priority)` in heap-array order,
    /// which is unsorted apart from the extreme entry coming first.
    #[inline(always)]
    pub fn iter(&self) -> IndexedBinaryHeapBorrowIter<T, P, S> {
        IndexedBinaryHeapBorrowIter {
            heap_iter: self.heap.iter(),
            mediator: &self.mediator,
        }
    }

    fn set_priority_internal(&mut self, position: HeapPos, priority: P) -> P {
        let (heap, mediator) = (&mut self.heap, &mut self.mediator);
        heap.change_priority(position, priority, |key, pos| {
            *mediator.get_index_mut(key) = pos;
        })
    }

    fn remove_internal(&mut self, mediator_index: MediatorIndex) -> (T, P) {
        let (_, position) = self.mediator.get_index(mediator_index);
        let (heap, mediator) = (&mut self.heap, &mut self.mediator);
        let (removed_index, priority) = heap
            .remove(position, |key, pos| {
                *mediator.get_index_mut(key) = pos;
            })
            .expect("All mediator positions must be valid");
        debug_assert_eq!(removed_index, mediator_index);
        let (element, _) = self.mediator.swap_remove_index(mediator_index);
        self.repair_displaced(mediator_index);
        (element, priority)
    }

    /// After `swap_remove_index` moved the last mediator entry into the
    /// freed slot, the heap entry of the moved element still carries the
    /// old mediator index and must be re-pointed.
    fn repair_displaced(&mut self, mediator_index: MediatorIndex) {
        if mediator_index.0 < self.mediator.len() {
            let (_, position) = self.mediator.get_index(mediator_index);
            self.heap.change_key(mediator_index, position);
        }
    }
}

impl<T: Hash + Eq + Clone, P: Priority, S: BuildHasher + Clone> Clone
    for IndexedBinaryHeap<T, P, S>
{
    fn clone(&self) -> Self {
        Self {
            heap: self.heap.clone(),
            mediator: self.mediator.clone(),
        }
    }
}

impl<T: Hash + Eq, P: Priority, S: BuildHasher> PartialEq for IndexedBinaryHeap<T, P, S> {
    /// Structural equality: same polarity, same length, and the same
    /// `(element, priority)` sequence in heap-array order. Heaps holding
    /// the same entries in different shapes compare unequal.
    fn eq(&self, other: &Self) -> bool {
        self.polarity() == other.polarity()
            && self.len() == other.len()
            && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Hash + Eq, P: Priority, S: BuildHasher> Eq for IndexedBinaryHeap<T, P, S> {}

impl<T: Hash + Eq, P: Priority + Hash, S: BuildHasher> Hash for IndexedBinaryHeap<T, P, S> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.polarity().hash(state);
        self.len().hash(state);
        for (element, priority) in self.iter() {
            element.hash(state);
            priority.hash(state);
        }
    }
}

impl<T: Hash + Eq + Debug, P: Priority, S: BuildHasher> Debug for IndexedBinaryHeap<T, P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Borrowing iterator in heap-array order.
pub struct IndexedBinaryHeapBorrowIter<'a, T: 'a + Hash + Eq, P: Priority, S: BuildHasher> {
    heap_iter: BinaryCoreIter<'a, P>,
    mediator: &'a Mediator<T, HeapPos, S>,
}

impl<'a, T: 'a + Hash + Eq, P: Priority, S: BuildHasher> Iterator
    for IndexedBinaryHeapBorrowIter<'a, T, P, S>
{
    type Item = (&'a T, &'a P);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (_, mediator_index, priority) = self.heap_iter.next()?;
        let (element, _) = self.mediator.get_index(mediator_index);
        Some((element, priority))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.heap_iter.size_hint()
    }
}

/// Consuming iterator draining entries in extreme-first order.
pub struct IndexedBinaryHeapIntoIter<T: Hash + Eq, P: Priority, S: BuildHasher> {
    heap: IndexedBinaryHeap<T, P, S>,
}

impl<T: Hash + Eq, P: Priority, S: BuildHasher> Iterator for IndexedBinaryHeapIntoIter<T, P, S> {
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

impl<T: Hash + Eq, P: Priority, S: BuildHasher> IntoIterator for IndexedBinaryHeap<T, P, S> {
    type Item = (T, P);
    type IntoIter = IndexedBinaryHeapIntoIter<T, P, S>;

    /// Drains the heap in extreme-first order.
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IndexedBinaryHeapIntoIter { heap: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_index_consistent<T: Hash + Eq + Clone + Debug, P: Priority>(
        heap: &IndexedBinaryHeap<T, P>,
    ) {
        assert_eq!(heap.len(), heap.mediator.len());
        for (element, priority) in heap.iter() {
            assert_eq!(heap.get_priority(element), Some(priority));
        }
    }

    #[test]
    fn test_offer_poll_min() {
        let mut heap = IndexedBinaryHeap::new_min();
        let items = [("a", 5), ("b", 3), ("c", 8), ("d", 1), ("e", 6)];
        for (element, priority) in items {
            assert!(heap.offer(element, priority));
        }
        assert_index_consistent(&heap);
        assert_eq!(heap.poll(), Some(("d", 1)));
        assert_eq!(heap.poll(), Some(("b", 3)));
        assert_eq!(heap.poll(), Some(("a", 5)));
        assert_eq!(heap.poll(), Some(("e", 6)));
        assert_eq!(heap.poll(), Some(("c", 8)));
        assert_eq!(heap.poll(), None);
    }

    #[test]
    fn test_offer_poll_max() {
        let mut heap = IndexedBinaryHeap::new_max();
        for (element, priority) in [("a", 5), ("b", 3), ("c", 8)] {
            assert!(heap.offer(element, priority));
        }
        assert_eq!(heap.poll(), Some(("c", 8)));
        assert_eq!(heap.poll(), Some(("a", 5)));
        assert_eq!(heap.poll(), Some(("b", 3)));
    }

    #[test]
    fn test_duplicate_rejection() {
        let mut heap = IndexedBinaryHeap::new_min();
        assert!(heap.offer("a", 1));
        assert!(!heap.offer("a", 5));
        assert_eq!(heap.get_priority("a"), Some(&1));
        assert_eq!(heap.add("a", 9), Err(DuplicateElementError));
        assert_eq!(heap.add("b", 2), Ok(()));
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn test_poll_then_add() {
        let mut heap = IndexedBinaryHeap::new_min();
        heap.offer("a", 1);
        heap.offer("b", 2);
        // Colliding with a non-extreme element leaves the heap untouched.
        assert_eq!(heap.poll_then_add("b", 0), Err(DuplicateElementError));
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.get_priority("b"), Some(&2));
        // Re-offering the polled element itself is fine.
        assert_eq!(heap.poll_then_add("a", 9), Ok(Some(("a", 1))));
        assert_eq!(heap.get_priority("a"), Some(&9));
        // New element: polls the extreme and inserts.
        assert_eq!(heap.poll_then_add("c", 4), Ok(Some(("b", 2))));
        assert_eq!(heap.len(), 2);
        // On an empty heap nothing is polled, the insert still happens.
        heap.clear();
        assert_eq!(heap.poll_then_add("z", 7), Ok(None));
        assert_eq!(heap.peek(), Some((&"z", &7)));
    }

    #[test]
    fn test_peek_accessors() {
        let mut heap = IndexedBinaryHeap::new_min();
        assert_eq!(heap.peek(), None);
        assert_eq!(heap.peek_element(), None);
        assert_eq!(heap.peek_priority(), None);
        heap.offer("a", 3);
        heap.offer("b", 1);
        assert_eq!(heap.peek(), Some((&"b", &1)));
        assert_eq!(heap.peek_element(), Some(&"b"));
        assert_eq!(heap.peek_priority(), Some(&1));
        assert_eq!(heap.len(), 2, "Peek must not remove");
    }

    #[test]
    fn test_priority_or_worst_sentinel() {
        let mut min_heap = IndexedBinaryHeap::<&str, i32>::new_min();
        min_heap.offer("a", 10);
        assert_eq!(min_heap.priority_or_worst("a"), 10);
        assert_eq!(min_heap.priority_or_worst("nope"), i32::MAX);

        let mut max_heap = IndexedBinaryHeap::<&str, i32>::new_max();
        max_heap.offer("a", 10);
        assert_eq!(max_heap.priority_or_worst("nope"), i32::MIN);
    }

    #[test]
    fn test_contains_family() {
        let mut heap = IndexedBinaryHeap::new_min();
        heap.offer("a", 1);
        heap.offer("b", 2);
        assert!(heap.contains("a"));
        assert!(!heap.contains("c"));
        assert!(heap.contains_entry("a", &1));
        assert!(!heap.contains_entry("a", &2));
        assert!(heap.contains_all(["a", "b"].iter()));
        assert!(!heap.contains_all(["a", "c"].iter()));
    }

    #[test]
    fn test_change_inserts_updates_and_skips_equal() {
        let mut heap = IndexedBinaryHeap::new_min();
        assert!(heap.change("a", 5), "Absent element must be inserted");
        assert!(heap.contains("a"));
        assert!(heap.change("a", 2), "Different priority must update");
        assert_eq!(heap.get_priority("a"), Some(&2));
        assert!(!heap.change("a", 2), "Equal priority must be a no-op");
        assert_index_consistent(&heap);
    }

    #[test]
    fn test_promote_demote_direction_rules() {
        let mut heap = IndexedBinaryHeap::new_min();
        heap.offer("a", 10);
        assert!(!heap.promote("missing", 1));
        assert!(!heap.demote("missing", 100));
        // In a min heap promote means decrease.
        assert!(!heap.promote("a", 10), "Equal is not an improvement");
        assert!(!heap.promote("a", 15), "Worsening is not a promote");
        assert!(heap.promote("a", 5));
        assert_eq!(heap.get_priority("a"), Some(&5));
        assert!(!heap.demote("a", 5));
        assert!(!heap.demote("a", 3));
        assert!(heap.demote("a", 50));
        assert_eq!(heap.get_priority("a"), Some(&50));

        let mut heap = IndexedBinaryHeap::new_max();
        heap.offer("a", 10);
        // In a max heap promote means increase.
        assert!(heap.promote("a", 20));
        assert!(heap.demote("a", 5));
        assert_eq!(heap.get_priority("a"), Some(&5));
    }

    #[test]
    fn test_remove_and_displaced_entry_repair() {
        let mut heap = IndexedBinaryHeap::new_min();
        let items = [
            ("a", 2),
            ("b", 4),
            ("c", 1),
            ("d", 11),
            ("e", 7),
            ("f", 13),
            ("g", 17),
        ];
        for (element, priority) in items {
            heap.offer(element, priority);
        }
        assert_eq!(heap.remove("d"), Some(11));
        assert_eq!(heap.len(), 6);
        assert!(!heap.contains("d"));
        assert_index_consistent(&heap);
        // Every survivor still resolves through the index after the
        // mediator displacement.
        for (element, priority) in items {
            if element != "d" {
                assert_eq!(heap.get_priority(element), Some(&priority));
            }
        }
        let drained: Vec<_> = heap.into_iter().collect();
        assert_eq!(
            drained,
            [("c", 1), ("a", 2), ("b", 4), ("e", 7), ("f", 13), ("g", 17)]
        );
    }

    #[test]
    fn test_remove_absent_and_remove_entry() {
        let mut heap = IndexedBinaryHeap::new_min();
        heap.offer("a", 1);
        assert_eq!(heap.remove("b"), None);
        assert!(!heap.remove_entry("a", &2), "Priority mismatch keeps entry");
        assert!(heap.contains("a"));
        assert!(heap.remove_entry("a", &1));
        assert!(heap.is_empty());
    }

    #[test]
    fn test_merge() {
        let mut left = IndexedBinaryHeap::new_min();
        for (element, priority) in [("a", 1), ("c", 5), ("e", 9)] {
            left.offer(element, priority);
        }
        let mut right = IndexedBinaryHeap::new_min();
        for (element, priority) in [("b", 2), ("d", 6), ("f", 0)] {
            right.offer(element, priority);
        }
        assert_eq!(left.merge(&mut right), Ok(true));
        assert!(right.is_empty());
        assert_eq!(left.len(), 6);
        assert_index_consistent(&left);
        let drained: Vec<_> = left.into_iter().collect();
        assert_eq!(
            drained,
            [("f", 0), ("a", 1), ("b", 2), ("c", 5), ("d", 6), ("e", 9)]
        );
    }

    #[test]
    fn test_merge_errors_leave_both_untouched() {
        let mut min_heap = IndexedBinaryHeap::new_min();
        min_heap.offer("a", 1);
        let mut max_heap = IndexedBinaryHeap::new_max();
        max_heap.offer("b", 2);
        assert_eq!(
            min_heap.merge(&mut max_heap),
            Err(MergeError::PolarityMismatch)
        );
        assert_eq!(max_heap.len(), 1);

        let mut other = IndexedBinaryHeap::new_min();
        other.offer("a", 99);
        other.offer("z", 3);
        assert_eq!(min_heap.merge(&mut other), Err(MergeError::DuplicateElement));
        assert_eq!(min_heap.get_priority("a"), Some(&1));
        assert_eq!(other.len(), 2);
    }

    #[test]
    fn test_merge_empty_argument() {
        let mut heap = IndexedBinaryHeap::new_min();
        heap.offer("a", 1);
        let mut empty = IndexedBinaryHeap::new_min();
        assert_eq!(heap.merge(&mut empty), Ok(false));
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_from_seed() {
        let heap =
            IndexedBinaryHeap::from_seed(Polarity::Min, [("a", 3), ("b", 1), ("c", 2)]).unwrap();
        assert_index_consistent(&heap);
        let drained: Vec<_> = heap.into_iter().collect();
        assert_eq!(drained, [("b", 1), ("c", 2), ("a", 3)]);

        let empty: Result<IndexedBinaryHeap<&str, i32>, _> =
            IndexedBinaryHeap::from_seed(Polarity::Min, []);
        assert_eq!(empty.err(), Some(BuildError::EmptySeed));

        let duplicated = IndexedBinaryHeap::from_seed(Polarity::Min, [("a", 1), ("a", 2)]);
        assert_eq!(duplicated.err(), Some(BuildError::DuplicateSeedElement));
    }

    #[test]
    fn test_capacity_management() {
        assert_eq!(
            IndexedBinaryHeap::<&str, i32>::with_capacity(Polarity::Min, 0).err(),
            Some(BuildError::ZeroCapacity)
        );
        let mut heap = IndexedBinaryHeap::<&str, i32>::with_capacity(Polarity::Min, 8).unwrap();
        assert!(heap.capacity() >= 8);
        heap.offer("a", 1);
        heap.ensure_capacity(100);
        assert!(heap.capacity() >= 100);
        let before = heap.capacity();
        heap.ensure_capacity(10);
        assert_eq!(heap.capacity(), before, "Ensure never shrinks");
        heap.shrink_to_fit();
        assert!(heap.capacity() <= before);
        assert_eq!(heap.get_priority("a"), Some(&1));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut heap = IndexedBinaryHeap::new_min();
        for (element, priority) in [("a", 3), ("b", 1), ("c", 2)] {
            heap.offer(element, priority);
        }
        let mut copy = heap.clone();
        assert_eq!(heap, copy);
        copy.change("a", 0);
        copy.poll();
        assert_ne!(heap, copy);
        assert_eq!(heap.get_priority("a"), Some(&3));
        assert_eq!(heap.len(), 3);
    }

    #[test]
    fn test_structural_equality_and_hash() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hasher;

        let build = |order: &[(&'static str, i32)]| {
            let mut heap = IndexedBinaryHeap::new_min();
            for &(element, priority) in order {
                heap.offer(element, priority);
            }
            heap
        };
        let a = build(&[("x", 1), ("y", 2), ("z", 3)]);
        let b = build(&[("x", 1), ("y", 2), ("z", 3)]);
        assert_eq!(a, b);

        let hash_of = |heap: &IndexedBinaryHeap<&str, i32>| {
            let mut hasher = DefaultHasher::new();
            heap.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash_of(&a), hash_of(&b));

        // Same entries inserted in a different order give a different
        // array layout, which is a different structure.
        let c = build(&[("z", 3), ("y", 2), ("x", 1)]);
        assert_ne!(a, c);

        let mut min_heap = IndexedBinaryHeap::<&str, i32>::new_min();
        let mut max_heap = IndexedBinaryHeap::<&str, i32>::new_max();
        min_heap.offer("a", 1);
        max_heap.offer("a", 1);
        assert_ne!(min_heap, max_heap, "Polarity is part of the structure");
    }

    #[test]
    fn test_iter_array_order_starts_at_extreme() {
        let mut heap = IndexedBinaryHeap::new_min();
        for (element, priority) in [("a", 5), ("b", 3), ("c", 8), ("d", 1)] {
            heap.offer(element, priority);
        }
        let seen: Vec<_> = heap.iter().collect();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], (&"d", &1), "Array order starts at the extreme");
    }

    #[test]
    fn test_heavy_mixed_operations() {
        use rand::{Rng, SeedableRng};
        use rand_chacha::ChaCha8Rng;

        let mut rng = ChaCha8Rng::seed_from_u64(0x1234_5678);
        let mut heap = IndexedBinaryHeap::new_min();
        let mut model = std::collections::HashMap::<u32, i64>::new();
        for _ in 0..2000 {
            let element = rng.gen_range(0..300u32);
            match rng.gen_range(0..5) {
                0 => {
                    let priority = rng.gen_range(-1000..1000);
                    assert_eq!(heap.offer(element, priority), !model.contains_key(&element));
                    model.entry(element).or_insert(priority);
                }
                1 => {
                    let priority = rng.gen_range(-1000..1000);
                    let changed = heap.change(element, priority);
                    let was = model.insert(element, priority);
                    assert_eq!(changed, was != Some(priority));
                }
                2 => {
                    assert_eq!(heap.remove(&element), model.remove(&element));
                }
                3 => {
                    if let Some((element, priority)) = heap.poll() {
                        let best = model.values().min().copied().unwrap();
                        assert_eq!(priority, best, "Poll must return the best priority");
                        assert_eq!(model.remove(&element), Some(priority));
                    } else {
                        assert!(model.is_empty());
                    }
                }
                _ => {
                    assert_eq!(heap.get_priority(&element), model.get(&element));
                }
            }
            assert_eq!(heap.len(), model.len());
        }
        let mut expected: Vec<i64> = model.values().copied().collect();
        expected.sort_unstable();
        let mut drained: Vec<i64> = heap.into_iter().map(|(_, p)| p).collect();
        assert_eq!(drained.len(), expected.len());
        let sorted = {
            let mut copy = drained.clone();
            copy.sort_unstable();
            copy
        };
        assert_eq!(sorted, drained, "Drain order must be sorted for min heap");
        drained.sort_unstable();
        assert_eq!(drained, expected);
    }
}
