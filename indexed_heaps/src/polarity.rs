use std::fmt::Debug;

/// Whether "extreme" means the minimal or the maximal priority.
///
/// The orientation is fixed when a heap is constructed and every ordering
/// decision inside the engines routes through [`Polarity::prefers`], so the
/// sift and cut routines themselves are orientation-agnostic.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Polarity {
    /// The extreme entry is the one with the smallest priority.
    Min,
    /// The extreme entry is the one with the largest priority.
    Max,
}

impl Polarity {
    /// Returns true if `candidate` is strictly better than `incumbent`
    /// under this orientation.
    ///
    /// Strictness is what makes tie-breaking deterministic: entries with
    /// equal priorities are never reordered by any engine.
    #[inline(always)]
    pub fn prefers<P: Priority>(self, candidate: &P, incumbent: &P) -> bool {
        match self {
            Polarity::Min => candidate < incumbent,
            Polarity::Max => candidate > incumbent,
        }
    }

    /// The worst representable priority under this orientation:
    /// the upper bound for a min heap, the lower bound for a max heap.
    #[inline(always)]
    pub fn worst<P: Priority>(self) -> P {
        match self {
            Polarity::Min => P::UPPER,
            Polarity::Max => P::LOWER,
        }
    }

    /// The best representable priority under this orientation.
    #[inline(always)]
    pub fn best<P: Priority>(self) -> P {
        match self {
            Polarity::Min => P::LOWER,
            Polarity::Max => P::UPPER,
        }
    }
}

/// Totally-ordered numeric priority with known representable bounds.
///
/// The bounds serve as the "worse than anything present" sentinel returned
/// by absent-element priority lookups. Implemented for the primitive integer
/// types; one priority type is chosen per heap instance at compile time.
pub trait Priority: Copy + Ord + Debug {
    /// Smallest representable value.
    const LOWER: Self;
    /// Largest representable value.
    const UPPER: Self;
}

macro_rules! impl_priority_for_int {
    ($($t:ty),*) => {
        $(
            impl Priority for $t {
                const LOWER: Self = <$t>::MIN;
                const UPPER: Self = <$t>::MAX;
            }
        )*
    };
}

impl_priority_for_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
