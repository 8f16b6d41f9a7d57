//! # Pair Priority Queue

use core::cmp::Ordering;

use dary_heap::OctonaryHeap;

use crate::corpus::index::PairCountMap;
use crate::corpus::symbol_table::SymbolTable;
use crate::types::{CountType, Pair, TokenType};

/// A candidate merge recorded in the heap.
///
/// Entries are never updated in place; pushing records a new candidate and
/// a popped candidate is *stale* when its count no longer matches the live
/// pair count.
#[derive(Debug, Eq)]
pub struct MergeCandidate<T: TokenType, C: CountType> {
    /// The recorded occurrence count.
    pub count: C,

    /// The pair to merge.
    pub pair: Pair<T>,
}

impl<T: TokenType, C: CountType> MergeCandidate<T, C> {
    /// The heap key.
    ///
    /// Max-heap by count; the pair-id order only keeps the order total. The
    /// byte-lexicographic selection tie-break is applied over the whole
    /// top-count group in [`PairQueue::pop_best`], not here.
    pub fn heap_key(&self) -> (C, Pair<T>) {
        (self.count, self.pair)
    }
}

impl<T: TokenType, C: CountType> PartialEq for MergeCandidate<T, C> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.heap_key() == other.heap_key()
    }
}

impl<T: TokenType, C: CountType> PartialOrd for MergeCandidate<T, C> {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: TokenType, C: CountType> Ord for MergeCandidate<T, C> {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.heap_key().cmp(&other.heap_key())
    }
}

/// Max-priority queue over merge candidates with lazy invalidation.
///
/// There is no decrease-key: every count change pushes a fresh candidate and
/// outdated ones are discarded when popped.
#[derive(Debug)]
pub struct PairQueue<T: TokenType, C: CountType> {
    heap: OctonaryHeap<MergeCandidate<T, C>>,
}

impl<T: TokenType, C: CountType> PairQueue<T, C> {
    /// Create a queue with room for `capacity` candidates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: OctonaryHeap::with_capacity(capacity),
        }
    }

    /// Record a candidate; zero counts are dropped.
    ///
    /// ## Arguments
    /// * `pair` - the candidate pair.
    /// * `count` - the pair's live count at push time.
    pub fn push(
        &mut self,
        pair: Pair<T>,
        count: C,
    ) {
        if count > C::zero() {
            self.heap.push(MergeCandidate { count, pair });
        }
    }

    /// The number of recorded candidates, stale entries included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Is the queue empty?
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Pop the best live candidate.
    ///
    /// Pops the entire top-count group, discarding stale entries. Among the
    /// live ties the byte-lexicographically greatest pair wins (first bytes,
    /// then second bytes); the unchosen live ties are re-pushed unchanged.
    /// If a whole group was stale, the next group is tried.
    ///
    /// ## Arguments
    /// * `live` - the live pair counts to validate candidates against.
    /// * `symbols` - the symbol table, for the byte-wise tie-break.
    ///
    /// ## Returns
    /// The selected ``(pair, count)``, or `None` when the queue drains.
    pub fn pop_best(
        &mut self,
        live: &PairCountMap<T, C>,
        symbols: &SymbolTable<T>,
    ) -> Option<(Pair<T>, C)> {
        let zero = C::zero();

        loop {
            let top = self.heap.pop()?;
            let top_live = live.get(&top.pair).copied().unwrap_or(zero);
            if top.count != top_live {
                // Stale; discard.
                continue;
            }

            let mut group = vec![top.pair];
            while self.heap.peek().is_some_and(|peek| peek.count == top.count) {
                let Some(tied) = self.heap.pop() else {
                    break;
                };
                let tied_live = live.get(&tied.pair).copied().unwrap_or(zero);
                if tied.count == tied_live {
                    group.push(tied.pair);
                }
            }

            let mut best = group[0];
            for &pair in &group[1..] {
                if symbols.cmp_pairs(pair, best) == Ordering::Greater {
                    best = pair;
                }
            }

            for &pair in &group {
                if pair != best {
                    self.push(pair, top.count);
                }
            }

            return Some((best, top.count));
        }
    }
}
