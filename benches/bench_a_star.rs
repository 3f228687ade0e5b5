use std::collections::HashMap;
use std::ops::Index;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use indexed_heaps::{FibonacciHeap, IndexedBinaryHeap, Polarity};

#[derive(Eq, PartialEq, Debug, Hash, Copy, Clone, Ord, PartialOrd)]
struct Position {
    row: usize,
    column: usize,
}

struct Field {
    rows: usize,
    columns: usize,
    costs: Box<[u32]>,
}

impl Index<Position> for Field {
    type Output = u32;

    fn index(&self, index: Position) -> &Self::Output {
        &self.costs[self.columns * index.row + index.column]
    }
}

const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

fn neighbors(pos: Position, field: &Field) -> impl Iterator<Item = Position> + '_ {
    NEIGHBOR_OFFSETS.iter().filter_map(move |&(dr, dc)| {
        let row = pos.row as isize + dr;
        let column = pos.column as isize + dc;
        if row >= 0 && column >= 0 && (row as usize) < field.rows && (column as usize) < field.columns
        {
            Some(Position {
                row: row as usize,
                column: column as usize,
            })
        } else {
            None
        }
    })
}

fn heuristic(pos: Position, target: Position) -> u64 {
    ((target.row as i64 - pos.row as i64).abs() + (target.column as i64 - pos.column as i64).abs())
        as u64
}

/// Estimated total cost in the high bits, real cost so far in the low bits:
/// one integer priority that prefers lower totals and breaks ties towards
/// lower real cost.
#[inline]
fn pack_cost(total: u64, real: u64) -> u64 {
    debug_assert!(total < (1 << 32) && real < (1 << 32));
    (total << 32) | real
}

#[inline]
fn real_cost(packed: u64) -> u64 {
    packed & 0xFFFF_FFFF
}

fn restore_path(
    start: Position,
    end: Position,
    parents: &HashMap<Position, Position>,
) -> Vec<Position> {
    let mut result = vec![end];
    let mut current = end;
    while current != start {
        current = parents[&current];
        result.push(current);
    }
    result.reverse();
    result
}

mod std_a_star {
    use super::*;
    use std::cmp::Reverse;
    use std::collections::{BinaryHeap, HashSet};

    /// Baseline without decrease-key: relaxed nodes are re-pushed and
    /// stale copies skipped on pop.
    pub(crate) fn find_path(
        start: Position,
        target: Position,
        field: &Field,
    ) -> Option<Vec<Position>> {
        if start == target {
            return Some(vec![start]);
        }
        let mut parents: HashMap<Position, Position> = HashMap::new();
        let mut closed: HashSet<Position> = HashSet::new();
        let mut best_total: HashMap<Position, u64> = HashMap::new();
        let mut open: BinaryHeap<Reverse<(u64, Position)>> = BinaryHeap::new();
        open.push(Reverse((pack_cost(heuristic(start, target), 0), start)));
        while let Some(Reverse((packed, current))) = open.pop() {
            if current == target {
                return Some(restore_path(start, current, &parents));
            }
            if !closed.insert(current) {
                continue;
            }
            let current_real = real_cost(packed);
            for next in neighbors(current, field).filter(|next| !closed.contains(next)) {
                let real = current_real + field[next] as u64;
                let total = real + heuristic(next, target);
                if best_total.get(&next).map_or(true, |&old| old > total) {
                    best_total.insert(next, total);
                    parents.insert(next, current);
                    open.push(Reverse((pack_cost(total, real), next)));
                }
            }
        }
        None
    }
}

mod indexed_a_star {
    use super::*;

    /// One queue entry per open node; relaxation is an in-place promote.
    pub(crate) fn find_path(
        start: Position,
        target: Position,
        field: &Field,
    ) -> Option<Vec<Position>> {
        if start == target {
            return Some(vec![start]);
        }
        let mut parents: HashMap<Position, Position> = HashMap::new();
        let mut closed: std::collections::HashSet<Position> = std::collections::HashSet::new();
        let mut open = IndexedBinaryHeap::new(Polarity::Min);
        open.offer(start, pack_cost(heuristic(start, target), 0));
        while let Some((current, packed)) = open.poll() {
            if current == target {
                return Some(restore_path(start, current, &parents));
            }
            closed.insert(current);
            let current_real = real_cost(packed);
            for next in neighbors(current, field).filter(|next| !closed.contains(next)) {
                let real = current_real + field[next] as u64;
                let total = real + heuristic(next, target);
                let packed = pack_cost(total, real);
                if !open.contains(&next) {
                    parents.insert(next, current);
                    open.offer(next, packed);
                } else if open.promote(&next, packed) {
                    parents.insert(next, current);
                }
            }
        }
        None
    }
}

mod fibonacci_a_star {
    use super::*;

    pub(crate) fn find_path(
        start: Position,
        target: Position,
        field: &Field,
    ) -> Option<Vec<Position>> {
        if start == target {
            return Some(vec![start]);
        }
        let mut parents: HashMap<Position, Position> = HashMap::new();
        let mut closed: std::collections::HashSet<Position> = std::collections::HashSet::new();
        let mut open = FibonacciHeap::new(Polarity::Min);
        open.offer(start, pack_cost(heuristic(start, target), 0));
        while let Some((current, packed)) = open.poll() {
            if current == target {
                return Some(restore_path(start, current, &parents));
            }
            closed.insert(current);
            let current_real = real_cost(packed);
            for next in neighbors(current, field).filter(|next| !closed.contains(next)) {
                let real = current_real + field[next] as u64;
                let total = real + heuristic(next, target);
                let packed = pack_cost(total, real);
                if !open.contains(&next) {
                    parents.insert(next, current);
                    open.offer(next, packed);
                } else if open.promote(&next, packed) {
                    parents.insert(next, current);
                }
            }
        }
        None
    }
}

fn generate_field(size: usize) -> Field {
    const SEED: u64 = 546579634698731;
    use rand::prelude::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let dist = rand::distributions::Uniform::new_inclusive(1u32, 10u32);
    let vec: Vec<u32> = (0..size * size).map(|_| rng.sample(dist)).collect();
    Field {
        columns: size,
        rows: size,
        costs: vec.into(),
    }
}

fn find_path_benchmark(c: &mut Criterion) {
    let field = generate_field(100);
    let mut group = c.benchmark_group("a_star");
    for &end in &[1, 5, 10, 25, 45, 49, 99] {
        let start = Position { row: 0, column: 0 };
        let stop_at = Position {
            row: end,
            column: end,
        };
        group.bench_with_input(
            BenchmarkId::new("std_binary_heap", end),
            &(start, stop_at, &field),
            |b, &i| b.iter(|| std_a_star::find_path(i.0, i.1, i.2)),
        );
        group.bench_with_input(
            BenchmarkId::new("indexed_binary", end),
            &(start, stop_at, &field),
            |b, &i| b.iter(|| indexed_a_star::find_path(i.0, i.1, i.2)),
        );
        group.bench_with_input(
            BenchmarkId::new("fibonacci", end),
            &(start, stop_at, &field),
            |b, &i| b.iter(|| fibonacci_a_star::find_path(i.0, i.1, i.2)),
        );
    }

    const BIG_SIZE: usize = 500;
    let field_ones = Field {
        columns: BIG_SIZE,
        rows: BIG_SIZE,
        costs: vec![1; BIG_SIZE * BIG_SIZE].into_boxed_slice(),
    };
    let start = Position { row: 0, column: 0 };
    let stop_at = Position {
        row: BIG_SIZE - 1,
        column: BIG_SIZE - 1,
    };
    group.bench_with_input(
        BenchmarkId::new("std_binary_heap_ones", BIG_SIZE),
        &(),
        |b, _| b.iter(|| std_a_star::find_path(start, stop_at, &field_ones)),
    );
    group.bench_with_input(
        BenchmarkId::new("indexed_binary_ones", BIG_SIZE),
        &(),
        |b, _| b.iter(|| indexed_a_star::find_path(start, stop_at, &field_ones)),
    );
    group.bench_with_input(
        BenchmarkId::new("fibonacci_ones", BIG_SIZE),
        &(),
        |b, _| b.iter(|| fibonacci_a_star::find_path(start, stop_at, &field_ones)),
    );

    group.finish();
}

criterion_group!(benches, find_path_benchmark);
criterion_main!(benches);
