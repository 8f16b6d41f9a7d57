//! # Pair Statistics Index

use crate::corpus::pretoken::PretokenBuf;
use crate::corpus::symbol_table::SymbolTable;
use crate::types::{CommonHashMap, CommonHashSet, CountType, Pair, TokenType};
use crate::{PairmillError, PmResult};

/// A map from [`Pair`] to its occurrence count.
///
/// ``sum(adjacencies(pair, spans[i]) * counts[i]) for all i``
pub type PairCountMap<T, C> = CommonHashMap<Pair<T>, C>;

/// A map from [`Pair`] to the indices of pretokens that may contain it.
pub type PairIndexMap<T> = CommonHashMap<Pair<T>, CommonHashSet<usize>>;

/// Mutable index of every distinct pretoken plus global pair statistics.
///
/// Holds, per pretoken: the current symbol sequence, the occurrence count,
/// and the original bytes (stable key, kept for diagnostics). Holds,
/// globally: the live pair counts and the pair-to-pretoken membership index.
///
/// The membership index is one-directionally sound: every pretoken
/// containing a live pair is indexed under it, but an indexed pretoken may
/// no longer contain the pair. Stale members cost one wasted scan in
/// [`Self::merge_pair`] and are dropped with the pair's entry.
#[derive(Debug, Clone)]
pub struct CorpusIndex<T: TokenType, C: CountType> {
    spans: Vec<PretokenBuf<T>>,
    counts: Vec<C>,
    keys: Vec<Vec<u8>>,
    pair_counts: PairCountMap<T, C>,
    pair_index: PairIndexMap<T>,
}

impl<T: TokenType, C: CountType> CorpusIndex<T, C> {
    /// Build an index from a pretoken count table.
    ///
    /// Each pretoken's sequence is seeded with its single-byte symbols, and
    /// both pair maps are populated from the adjacent windows of every
    /// sequence of length >= 2.
    ///
    /// ## Arguments
    /// * `pretoken_counts` - ``(pretoken bytes, count)`` entries; zero
    ///   counts and empty pretokens are skipped.
    pub fn from_counts<I, B>(pretoken_counts: I) -> Self
    where
        I: IntoIterator<Item = (B, C)>,
        B: AsRef<[u8]>,
    {
        let zero = C::zero();

        let mut index = Self {
            spans: Vec::new(),
            counts: Vec::new(),
            keys: Vec::new(),
            pair_counts: PairCountMap::default(),
            pair_index: PairIndexMap::default(),
        };

        for (key, count) in pretoken_counts {
            let bytes = key.as_ref();
            if count == zero || bytes.is_empty() {
                continue;
            }

            let span: PretokenBuf<T> = PretokenBuf::from_bytes(bytes);
            let idx = index.spans.len();

            for pair in span.pairs() {
                *index.pair_counts.entry(pair).or_default() += count;
                index.pair_index.entry(pair).or_default().insert(idx);
            }

            index.spans.push(span);
            index.counts.push(count);
            index.keys.push(bytes.to_vec());
        }

        index
    }

    /// The number of distinct pretokens.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Is the corpus empty?
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The live pair counts.
    pub fn pair_counts(&self) -> &PairCountMap<T, C> {
        &self.pair_counts
    }

    /// The live count of one pair.
    pub fn pair_count(
        &self,
        pair: Pair<T>,
    ) -> C {
        self.pair_counts.get(&pair).copied().unwrap_or_default()
    }

    /// The pretoken indices that may contain `pair`.
    ///
    /// May include stale members; callers must confirm containment.
    pub fn pretokens_with(
        &self,
        pair: Pair<T>,
    ) -> impl Iterator<Item = usize> + '_ {
        self.pair_index.get(&pair).into_iter().flatten().copied()
    }

    /// One pretoken's current symbol sequence.
    pub fn span(
        &self,
        idx: usize,
    ) -> &PretokenBuf<T> {
        &self.spans[idx]
    }

    /// One pretoken's occurrence count.
    pub fn count(
        &self,
        idx: usize,
    ) -> C {
        self.counts[idx]
    }

    /// One pretoken's original bytes.
    pub fn key(
        &self,
        idx: usize,
    ) -> &[u8] {
        &self.keys[idx]
    }

    /// Merge `pair -> new_symbol` across every indexed pretoken.
    ///
    /// Rewrites each member sequence in place, accumulates every adjacency
    /// delta scaled by the pretoken's count, then applies the batch to the
    /// live pair counts with underflow checks. Pairs that gained an
    /// adjacency involving `new_symbol` are added to the membership index;
    /// the merged pair's own entries are retired, since a merged pair can
    /// never re-form (new adjacencies always involve the new symbol).
    ///
    /// ## Arguments
    /// * `pair` - the pair being merged; its live count must be the selected
    ///   count.
    /// * `new_symbol` - the interned replacement symbol.
    /// * `symbols` - the symbol table, for diagnostics.
    ///
    /// ## Returns
    /// Every pair whose live count changed, with its new live count; or an
    /// [`PairmillError::InvariantViolation`] if the accounting broke.
    pub fn merge_pair(
        &mut self,
        pair: Pair<T>,
        new_symbol: T,
        symbols: &SymbolTable<T>,
    ) -> PmResult<Vec<(Pair<T>, C)>> {
        let Some(members) = self.pair_index.remove(&pair) else {
            if self.pair_counts.contains_key(&pair) {
                return Err(PairmillError::InvariantViolation(format!(
                    "pair {} is live but indexed under no pretoken",
                    symbols.describe_pair(pair),
                )));
            }
            return Ok(Vec::new());
        };
        let mut members: Vec<usize> = members.into_iter().collect();
        members.sort_unstable();

        let mut deltas: CommonHashMap<Pair<T>, i64> = CommonHashMap::default();
        let mut gained: PairIndexMap<T> = PairIndexMap::default();

        for idx in members {
            let weight = count_to_i64(self.counts[idx])?;
            let before = self.spans[idx].len();

            let matched = self.spans[idx].merge_pair_cb(pair, new_symbol, &mut |p, d| {
                *deltas.entry(p).or_default() += i64::from(d) * weight;
                if d > 0 {
                    gained.entry(p).or_default().insert(idx);
                }
            });

            // Stale members match nothing; that is fine. A claimed match
            // that fails to shorten the sequence is not.
            if matched > 0 && self.spans[idx].len() + matched != before {
                return Err(PairmillError::InvariantViolation(format!(
                    "rewrite of pretoken {:?} claimed {matched} matches of {} \
                     but length went {before} -> {}",
                    String::from_utf8_lossy(&self.keys[idx]),
                    symbols.describe_pair(pair),
                    self.spans[idx].len(),
                )));
            }
        }

        let zero = C::zero();
        let mut changed = Vec::with_capacity(deltas.len());

        for (p, delta) in deltas {
            if delta == 0 {
                continue;
            }
            let old = count_to_i64(self.pair_count(p))?;
            let live = old + delta;
            if live < 0 {
                return Err(PairmillError::InvariantViolation(format!(
                    "pair count for {} fell to {live} while merging {}",
                    symbols.describe_pair(p),
                    symbols.describe_pair(pair),
                )));
            }

            let live = C::from_i64(live).ok_or_else(|| {
                PairmillError::InvariantViolation(format!(
                    "pair count for {} no longer fits the count type",
                    symbols.describe_pair(p),
                ))
            })?;

            if live == zero {
                self.pair_counts.remove(&p);
            } else {
                self.pair_counts.insert(p, live);
            }
            changed.push((p, live));
        }

        for (p, set) in gained {
            self.pair_index.entry(p).or_default().extend(set);
        }

        // Every adjacency of the merged pair was consumed or broken.
        if self.pair_counts.contains_key(&pair) {
            return Err(PairmillError::InvariantViolation(format!(
                "merged pair {} still has live occurrences",
                symbols.describe_pair(pair),
            )));
        }

        Ok(changed)
    }

    /// Recompute the pair counts from scratch.
    ///
    /// The incremental counts must stay equal to this at every step; tests
    /// assert it after each merge.
    pub fn recount(&self) -> PairCountMap<T, C> {
        let zero = C::zero();
        let mut counts = PairCountMap::default();
        for (idx, span) in self.spans.iter().enumerate() {
            let count = self.counts[idx];
            if count != zero {
                for pair in span.pairs() {
                    *counts.entry(pair).or_default() += count;
                }
            }
        }
        counts
    }
}

fn count_to_i64<C: CountType>(count: C) -> PmResult<i64> {
    count.to_i64().ok_or_else(|| {
        PairmillError::InvariantViolation("count exceeds the i64 delta range".to_string())
    })
}
