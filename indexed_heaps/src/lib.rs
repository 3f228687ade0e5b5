//! Priority queues with an element index.
//!
//! Every element is present at most once, membership testing and priority
//! lookup are O(1), and the priority of any present element can be changed
//! in place — the operation graph algorithms call decrease-key. Each queue
//! is built with a fixed [`Polarity`]: `Min` heaps poll the smallest
//! priority first, `Max` heaps the largest.
//!
//! Three engines share one contract:
//!
//! - [`IndexedBinaryHeap`] — array binary heap plus a hash index. Compact
//!   and cache-friendly; the default choice.
//! - [`FibonacciHeap`] — Fibonacci heap plus a hash index. Amortized O(1)
//!   insert and promote, and `merge` splices root lists instead of
//!   rebuilding.
//! - [`IntFibonacciHeap`] — Fibonacci heap over a bounded `usize` element
//!   domain with a dense array index, no hashing at all.
//!
//! The classic use is Dijkstra-style search, where `change` doubles as
//! relax:
//!
//! ```
//! use indexed_heaps::{IndexedBinaryHeap, Polarity};
//!
//! // Shortest distances from node 0 over a small weighted digraph.
//! let edges: &[&[(usize, u64)]] = &[
//!     &[(1, 4), (2, 1)],
//!     &[(3, 3)],
//!     &[(1, 1), (3, 8)],
//!     &[],
//! ];
//! let mut dist = vec![u64::MAX; edges.len()];
//! let mut queue = IndexedBinaryHeap::new(Polarity::Min);
//! dist[0] = 0;
//! queue.offer(0usize, 0u64);
//! while let Some((node, cost)) = queue.poll() {
//!     for &(next, weight) in edges[node] {
//!         let relaxed = cost + weight;
//!         if relaxed < dist[next] {
//!             dist[next] = relaxed;
//!             // Inserts unseen nodes, improves queued ones in place.
//!             queue.change(next, relaxed);
//!         }
//!     }
//! }
//! assert_eq!(dist, [0, 2, 1, 5]);
//! ```

mod binary_core;
mod binary_heap;
mod errors;
mod fibonacci_heap;
mod forest;
mod int_fibonacci_heap;
mod mediator;
mod polarity;

pub use crate::binary_heap::{
    IndexedBinaryHeap, IndexedBinaryHeapBorrowIter, IndexedBinaryHeapIntoIter,
};
pub use crate::errors::{BuildError, DuplicateElementError, MergeError};
pub use crate::fibonacci_heap::{FibonacciHeap, FibonacciHeapBorrowIter, FibonacciHeapIntoIter};
pub use crate::int_fibonacci_heap::{
    IntFibonacciHeap, IntFibonacciHeapBorrowIter, IntFibonacciHeapIntoIter,
};
pub use crate::polarity::{Polarity, Priority};
