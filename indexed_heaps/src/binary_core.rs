use std::fmt::Debug;
use std::vec::Vec;

use crate::mediator::MediatorIndex;
use crate::polarity::{Polarity, Priority};

/// Position of an entry inside the heap array.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub(crate) struct HeapPos(pub(crate) usize);

impl HeapPos {
    #[inline(always)]
    pub(crate) fn as_usize(self) -> usize {
        self.0
    }
}

#[derive(Copy, Clone)]
pub(crate) struct HeapEntry<P: Priority> {
    key: MediatorIndex,
    priority: P,
}

/// Array-based sift engine beneath `IndexedBinaryHeap`.
///
/// Knows nothing about elements: each slot carries a `MediatorIndex` back
/// into the element index, and every slot move is reported to a
/// `change_handler` closure so the caller can keep that index consistent.
///
/// Tie-breaking is deterministic: comparisons are strict, so entries with
/// equal priorities never swap, and sift-down prefers the earlier child on
/// equal priorities.
pub(crate) struct BinaryCore<P: Priority> {
    slots: Vec<HeapEntry<P>>,
    polarity: Polarity,
}

impl<P: Priority> BinaryCore<P> {
    #[inline(always)]
    pub(crate) fn with_capacity(polarity: Polarity, capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            polarity,
        }
    }

    #[inline(always)]
    pub(crate) fn polarity(&self) -> Polarity {
        self.polarity
    }

    #[inline(always)]
    pub(crate) fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    #[inline(always)]
    pub(crate) fn shrink_to_fit(&mut self) {
        self.slots.shrink_to_fit();
    }

    /// Puts key and priority in the heap, sifting it to its final position.
    /// Calls `change_handler` for every slot move of old values.
    #[inline(always)]
    pub(crate) fn push<TChangeHandler: FnMut(MediatorIndex, HeapPos)>(
        &mut self,
        key: MediatorIndex,
        priority: P,
        change_handler: TChangeHandler,
    ) {
        self.slots.push(HeapEntry { key, priority });
        self.sift_up(HeapPos(self.slots.len() - 1), change_handler);
    }

    /// Appends an entry without restoring heap order.
    /// Used during bulk construction; `rebuild` must run before any
    /// order-sensitive operation.
    #[inline(always)]
    pub(crate) fn push_unordered(&mut self, key: MediatorIndex, priority: P) -> HeapPos {
        self.slots.push(HeapEntry { key, priority });
        HeapPos(self.slots.len() - 1)
    }

    /// Restores the heap invariant over the whole array (Floyd heapify).
    /// Time complexity - O(n) swaps and change_handler calls.
    pub(crate) fn rebuild<TChangeHandler: FnMut(MediatorIndex, HeapPos)>(
        &mut self,
        mut change_handler: TChangeHandler,
    ) {
        let sift_start = std::cmp::min(self.slots.len() / 2 + 2, self.slots.len());
        for pos in (0..sift_start).rev().map(HeapPos) {
            self.sift_down(pos, &mut change_handler);
        }
    }

    /// Removes the entry with the best priority.
    /// Time complexity - O(log n) swaps and change_handler calls.
    #[inline(always)]
    pub(crate) fn pop<TChangeHandler: FnMut(MediatorIndex, HeapPos)>(
        &mut self,
        change_handler: TChangeHandler,
    ) -> Option<(MediatorIndex, P)> {
        self.remove(HeapPos(0), change_handler)
    }

    #[inline(always)]
    pub(crate) fn peek(&self) -> Option<(MediatorIndex, &P)> {
        self.look_into(HeapPos(0))
    }

    /// Removes the entry at `position` and returns it.
    ///
    /// The last slot takes its place and then sifts in whichever single
    /// direction the heap invariant requires; removal never percolates both
    /// ways.
    pub(crate) fn remove<TChangeHandler: FnMut(MediatorIndex, HeapPos)>(
        &mut self,
        position: HeapPos,
        change_handler: TChangeHandler,
    ) -> Option<(MediatorIndex, P)> {
        if position.0 >= self.slots.len() {
            return None;
        }
        if position.0 == self.slots.len() - 1 {
            let result = self.slots.pop().expect("Checked by position bound");
            return Some((result.key, result.priority));
        }
        let last = self.slots.len() - 1;
        self.slots.swap(position.0, last);
        let result = self.slots.pop().expect("Checked by position bound");
        let parent = HeapPos(position.0.saturating_sub(1) / 2);
        if position.0 > 0
            && self.polarity.prefers(
                &self.slots[position.0].priority,
                &self.slots[parent.0].priority,
            )
        {
            self.sift_up(position, change_handler);
        } else {
            self.sift_down(position, change_handler);
        }
        Some((result.key, result.priority))
    }

    #[inline(always)]
    pub(crate) fn look_into(&self, position: HeapPos) -> Option<(MediatorIndex, &P)> {
        let entry = self.slots.get(position.0)?;
        Some((entry.key, &entry.priority))
    }

    /// Changes the priority of a heap entry, sifting only in the direction
    /// the change requires. Returns the old priority.
    pub(crate) fn change_priority<TChangeHandler: FnMut(MediatorIndex, HeapPos)>(
        &mut self,
        position: HeapPos,
        updated: P,
        change_handler: TChangeHandler,
    ) -> P {
        debug_assert!(
            position.0 < self.slots.len(),
            "Out of index during changing priority"
        );

        let old = std::mem::replace(&mut self.slots[position.0].priority, updated);
        if self.polarity.prefers(&updated, &old) {
            self.sift_up(position, change_handler);
        } else if self.polarity.prefers(&old, &updated) {
            self.sift_down(position, change_handler);
        }
        old
    }

    /// Changes the key of an entry and returns the old key.
    /// Used when the mediator displaces an entry during removal.
    pub(crate) fn change_key(&mut self, key: MediatorIndex, position: HeapPos) -> MediatorIndex {
        debug_assert!(
            position.0 < self.slots.len(),
            "Out of index during changing key"
        );
        std::mem::replace(&mut self.slots[position.0].key, key)
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline(always)]
    pub(crate) fn clear(&mut self) {
        self.slots.clear()
    }

    #[inline(always)]
    pub(crate) fn iter(&self) -> BinaryCoreIter<P> {
        BinaryCoreIter {
            inner: self.slots.iter(),
            pos: 0,
        }
    }

    fn sift_up<TChangeHandler: FnMut(MediatorIndex, HeapPos)>(
        &mut self,
        position: HeapPos,
        mut change_handler: TChangeHandler,
    ) {
        debug_assert!(position.0 < self.slots.len(), "Out of index in sift_up");
        let mut position = position.0;
        while position > 0 {
            let parent_pos = (position - 1) / 2;
            if self.polarity.prefers(
                &self.slots[position].priority,
                &self.slots[parent_pos].priority,
            ) {
                self.slots.swap(parent_pos, position);
                change_handler(self.slots[position].key, HeapPos(position));
                position = parent_pos;
            } else {
                break;
            }
        }
        change_handler(self.slots[position].key, HeapPos(position));
    }

    fn sift_down<TChangeHandler: FnMut(MediatorIndex, HeapPos)>(
        &mut self,
        position: HeapPos,
        mut change_handler: TChangeHandler,
    ) {
        debug_assert!(position.0 < self.slots.len(), "Out of index in sift_down");
        let mut position = position.0;
        loop {
            let best_child = {
                let child1 = position * 2 + 1;
                let child2 = child1 + 1;
                if child1 >= self.slots.len() {
                    break;
                }
                if child2 < self.slots.len()
                    && self
                        .polarity
                        .prefers(&self.slots[child2].priority, &self.slots[child1].priority)
                {
                    child2
                } else {
                    child1
                }
            };

            if self.polarity.prefers(
                &self.slots[best_child].priority,
                &self.slots[position].priority,
            ) {
                self.slots.swap(position, best_child);
                change_handler(self.slots[position].key, HeapPos(position));
                position = best_child;
            } else {
                break;
            }
        }
        change_handler(self.slots[position].key, HeapPos(position));
    }
}

// Default implementations

impl<P: Priority> Clone for BinaryCore<P> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            polarity: self.polarity,
        }
    }
}

impl<P: Priority> Debug for HeapEntry<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(
            f,
            "{{key: {:?}, priority: {:?}}}",
            &self.key, &self.priority
        )
    }
}

impl<P: Priority> Debug for BinaryCore<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.slots.fmt(f)
    }
}

pub(crate) struct BinaryCoreIter<'a, P: Priority> {
    inner: std::slice::Iter<'a, HeapEntry<P>>,
    pos: usize,
}

impl<'a, P: Priority> Iterator for BinaryCoreIter<'a, P> {
    type Item = (HeapPos, MediatorIndex, &'a P);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next()?;
        let pos = HeapPos(self.pos);
        self.pos += 1;
        Some((pos, entry.key, &entry.priority))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
