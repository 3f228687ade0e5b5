use std::fmt::Display;

/// Error returned by the strict insertion methods (`add`, `poll_then_add`)
/// when the element is already present in the heap.
///
/// The non-strict `offer` reports the same situation as a `false` return
/// instead.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Default)]
pub struct DuplicateElementError;

impl Display for DuplicateElementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "Element is already present in the heap")
    }
}

impl std::error::Error for DuplicateElementError {}

/// Error returned by checked constructors.
///
/// A heap is never created in a partially-built state: when a constructor
/// returns an error, nothing was allocated on behalf of the caller.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub enum BuildError {
    /// Requested initial capacity was zero.
    ZeroCapacity,
    /// Requested element domain for the integer-indexed heap was zero.
    ZeroDomain,
    /// Seed collection contained no entries.
    EmptySeed,
    /// Seed collection contained the same element twice.
    DuplicateSeedElement,
}

impl Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            BuildError::ZeroCapacity => write!(f, "Initial capacity must be positive"),
            BuildError::ZeroDomain => write!(f, "Element domain must be positive"),
            BuildError::EmptySeed => write!(f, "Seed collection must be non-empty"),
            BuildError::DuplicateSeedElement => {
                write!(f, "Seed collection must not contain duplicate elements")
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Error returned by `merge` before either heap is mutated.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub enum MergeError {
    /// The two heaps were constructed with different polarities.
    PolarityMismatch,
    /// Both heaps contain the same element; merging would violate
    /// element uniqueness.
    DuplicateElement,
    /// An element of the argument heap does not fit the receiver's domain
    /// (integer-indexed heaps only).
    DomainExceeded,
}

impl Display for MergeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            MergeError::PolarityMismatch => {
                write!(f, "Cannot merge heaps with different polarities")
            }
            MergeError::DuplicateElement => {
                write!(f, "Cannot merge heaps that share an element")
            }
            MergeError::DomainExceeded => {
                write!(f, "Merged element does not fit the receiving heap's domain")
            }
        }
    }
}

impl std::error::Error for MergeError {}
