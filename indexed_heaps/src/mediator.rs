use indexmap::map::{IndexMap, VacantEntry as IMVacantEntry};
use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};

/// Wrapper around a position inside the mediator map.
/// Used to avoid mixing it up with heap positions or node handles,
/// and to make sure the `Mediator` is indexed only with `MediatorIndex`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub(crate) struct MediatorIndex(pub(crate) usize);

/// Element index shared by the hash-keyed engines: maps an element to its
/// current structural location (`TPos` is a heap position for the binary
/// engine and an arena node handle for the Fibonacci engine).
///
/// This is a wrapper over an indexmap that uses `MediatorIndex` as index.
/// It also centralizes the checking for panics: all positional accesses go
/// through `expect` with the index-consistency invariant.
#[derive(Clone, Debug)]
pub(crate) struct Mediator<TKey: Hash + Eq, TPos: Copy, S: BuildHasher> {
    map: IndexMap<TKey, TPos, S>,
}

#[inline(always)]
fn with_copied_pos<'a, T, TPos: Copy>((k, &p): (&'a T, &TPos)) -> (&'a T, TPos) {
    (k, p)
}

pub(crate) struct VacantEntry<'a, TKey: 'a + Hash + Eq, TPos: Copy>(
    IMVacantEntry<'a, TKey, TPos>,
);

pub(crate) enum MediatorEntry<'a, TKey: 'a + Hash + Eq, TPos: Copy> {
    Vacant(VacantEntry<'a, TKey, TPos>),
    Occupied(MediatorIndex, TPos),
}

impl<TKey, TPos, S> Mediator<TKey, TPos, S>
where
    TKey: Hash + Eq,
    TPos: Copy,
    S: BuildHasher,
{
    #[inline(always)]
    pub(crate) fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            map: IndexMap::with_capacity_and_hasher(capacity, hasher),
        }
    }

    #[inline(always)]
    pub(crate) fn reserve(&mut self, additional: usize) {
        self.map.reserve(additional)
    }

    #[inline(always)]
    pub(crate) fn shrink_to_fit(&mut self) {
        self.map.shrink_to_fit()
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline(always)]
    pub(crate) fn clear(&mut self) {
        self.map.clear()
    }

    #[inline(always)]
    pub(crate) fn get_index(&self, MediatorIndex(position): MediatorIndex) -> (&TKey, TPos) {
        self.map
            .get_index(position)
            .map(with_copied_pos)
            .expect("All mediator indexes must be valid")
    }

    #[inline(always)]
    pub(crate) fn get_index_mut(&mut self, MediatorIndex(position): MediatorIndex) -> &mut TPos {
        self.map
            .get_index_mut(position)
            .expect("All mediator indexes must be valid")
            .1
    }

    #[inline(always)]
    pub(crate) fn entry(&mut self, key: TKey) -> MediatorEntry<TKey, TPos> {
        match self.map.entry(key) {
            indexmap::map::Entry::Occupied(v) => {
                MediatorEntry::Occupied(MediatorIndex(v.index()), *v.get())
            }
            indexmap::map::Entry::Vacant(v) => MediatorEntry::Vacant(VacantEntry(v)),
        }
    }

    #[inline(always)]
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<TPos>
    where
        TKey: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).copied()
    }

    #[inline(always)]
    pub(crate) fn get_full<'a, Q>(&'a self, key: &Q) -> Option<(MediatorIndex, &'a TKey, TPos)>
    where
        TKey: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map
            .get_full(key)
            .map(|(idx, key, &pos)| (MediatorIndex(idx), key, pos))
    }

    /// Removes the entry at `index` by swapping the last map entry into its
    /// place. The caller must re-point the displaced entry's location
    /// afterwards, if any entry was displaced.
    #[inline(always)]
    pub(crate) fn swap_remove_index(
        &mut self,
        MediatorIndex(index): MediatorIndex,
    ) -> (TKey, TPos) {
        self.map
            .swap_remove_index(index)
            .expect("All mediator indexes must be valid")
    }

    #[inline(always)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&TKey, TPos)> {
        self.map.iter().map(with_copied_pos)
    }

    #[inline(always)]
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (TKey, TPos)> + '_ {
        self.map.drain(..)
    }
}

impl<'a, TKey: 'a + Hash + Eq, TPos: Copy> VacantEntry<'a, TKey, TPos> {
    #[inline(always)]
    pub(crate) fn insert(self, value: TPos) {
        self.0.insert(value);
    }

    #[inline(always)]
    pub(crate) fn index(&self) -> MediatorIndex {
        MediatorIndex(self.0.index())
    }
}
