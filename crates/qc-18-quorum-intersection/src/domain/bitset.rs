//! Word-packed node-index set
//!
//! Every set the checker manipulates (slice members, closures, SCCs,
//! candidate quorums) is a `BitSet` over dense node indices.
//!
//! INVARIANTS:
//! - The backing `BitVec` always holds a whole number of `u64` words, so
//!   there are no dead bits past the logical end.
//! - Set algebra between sets of different lengths treats the shorter
//!   operand as zero-extended.

use std::fmt;

use bitvec::prelude::*;

const WORD_BITS: usize = u64::BITS as usize;

/// Dynamic set of node indices backed by packed `u64` words.
#[derive(Clone, Default)]
pub struct BitSet {
    bits: BitVec<u64, Lsb0>,
}

impl BitSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set with room for `nbits` indices.
    pub fn with_capacity(nbits: usize) -> Self {
        let words = nbits.div_ceil(WORD_BITS);
        Self {
            bits: BitVec::repeat(false, words * WORD_BITS),
        }
    }

    /// Create a set holding exactly the given indices.
    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        indices.into_iter().collect()
    }

    fn words(&self) -> &[u64] {
        self.bits.as_raw_slice()
    }

    fn words_mut(&mut self) -> &mut [u64] {
        self.bits.as_raw_mut_slice()
    }

    fn word_count(&self) -> usize {
        self.bits.len() / WORD_BITS
    }

    /// Grow (by doubling) until `nbits` indices fit.
    fn reserve_bits(&mut self, nbits: usize) {
        let needed = nbits.div_ceil(WORD_BITS);
        let current = self.word_count();
        if needed > current {
            let target = needed.max(current * 2);
            self.bits.resize(target * WORD_BITS, false);
        }
    }

    /// Add `index` to the set.
    pub fn set(&mut self, index: usize) {
        self.reserve_bits(index + 1);
        self.bits.set(index, true);
    }

    /// Remove `index` from the set. Removing an absent index is a no-op.
    pub fn unset(&mut self, index: usize) {
        if index < self.bits.len() {
            self.bits.set(index, false);
        }
    }

    /// Whether `index` is in the set.
    pub fn get(&self, index: usize) -> bool {
        index < self.bits.len() && self.bits[index]
    }

    /// Population count.
    pub fn count(&self) -> usize {
        self.words().iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words().iter().all(|&w| w == 0)
    }

    /// Lowest set index.
    pub fn min(&self) -> Option<usize> {
        self.bits.first_one()
    }

    /// Highest set index.
    pub fn max(&self) -> Option<usize> {
        self.bits.last_one()
    }

    /// Remove every index.
    pub fn clear(&mut self) {
        self.words_mut().fill(0);
    }

    /// In-place union. Grows the receiver if `other` is longer.
    pub fn union_with(&mut self, other: &BitSet) {
        self.reserve_bits(other.bits.len());
        for (mine, theirs) in self.words_mut().iter_mut().zip(other.words()) {
            *mine |= *theirs;
        }
    }

    /// In-place intersection.
    pub fn intersect_with(&mut self, other: &BitSet) {
        let shared = other.word_count();
        for (i, mine) in self.words_mut().iter_mut().enumerate() {
            *mine &= if i < shared { other.words()[i] } else { 0 };
        }
    }

    /// In-place difference (`self \ other`).
    pub fn difference_with(&mut self, other: &BitSet) {
        for (mine, theirs) in self.words_mut().iter_mut().zip(other.words()) {
            *mine &= !*theirs;
        }
    }

    /// In-place symmetric difference. Grows the receiver if `other` is longer.
    pub fn symmetric_difference_with(&mut self, other: &BitSet) {
        self.reserve_bits(other.bits.len());
        for (mine, theirs) in self.words_mut().iter_mut().zip(other.words()) {
            *mine ^= *theirs;
        }
    }

    pub fn union(&self, other: &BitSet) -> BitSet {
        let mut out = self.clone();
        out.union_with(other);
        out
    }

    pub fn intersection(&self, other: &BitSet) -> BitSet {
        let mut out = self.clone();
        out.intersect_with(other);
        out
    }

    pub fn difference(&self, other: &BitSet) -> BitSet {
        let mut out = self.clone();
        out.difference_with(other);
        out
    }

    /// `|self ∩ other|` without allocating.
    pub fn intersection_count(&self, other: &BitSet) -> usize {
        self.words()
            .iter()
            .zip(other.words())
            .map(|(a, b)| (a & b).count_ones() as usize)
            .sum()
    }

    /// `|self ∪ other|` without allocating.
    pub fn union_count(&self, other: &BitSet) -> usize {
        let (longer, shorter) = if self.word_count() >= other.word_count() {
            (self.words(), other.words())
        } else {
            (other.words(), self.words())
        };
        longer
            .iter()
            .enumerate()
            .map(|(i, a)| (a | shorter.get(i).copied().unwrap_or(0)).count_ones() as usize)
            .sum()
    }

    /// `|self \ other|` without allocating.
    pub fn difference_count(&self, other: &BitSet) -> usize {
        self.words()
            .iter()
            .enumerate()
            .map(|(i, a)| (a & !other.words().get(i).copied().unwrap_or(0)).count_ones() as usize)
            .sum()
    }

    /// Whether every index of `self` is also in `other`.
    pub fn is_subset_of(&self, other: &BitSet) -> bool {
        self.words()
            .iter()
            .enumerate()
            .all(|(i, a)| a & !other.words().get(i).copied().unwrap_or(0) == 0)
    }

    /// First set index at or after `from`.
    ///
    /// Calling again with the returned index plus one pages through the set
    /// without skipping or repeating an index.
    pub fn next_set_bit(&self, from: usize) -> Option<usize> {
        if from >= self.bits.len() {
            return None;
        }
        self.bits[from..].first_one().map(|offset| from + offset)
    }

    /// Batch form of [`next_set_bit`](Self::next_set_bit).
    ///
    /// Fills `out` with successive set indices starting at `from` and
    /// returns how many were written. Resume at `out[written - 1] + 1`.
    pub fn next_set_bits(&self, from: usize, out: &mut [usize]) -> usize {
        let mut written = 0;
        let mut cursor = from;
        while written < out.len() {
            match self.next_set_bit(cursor) {
                Some(index) => {
                    out[written] = index;
                    written += 1;
                    cursor = index + 1;
                }
                None => break,
            }
        }
        written
    }

    /// Ascending iterator over the set indices.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Release trailing all-zero words.
    pub fn shrink_to_fit(&mut self) {
        let used = self
            .words()
            .iter()
            .rposition(|&w| w != 0)
            .map_or(0, |last| last + 1);
        self.bits.truncate(used * WORD_BITS);
        self.bits.shrink_to_fit();
    }

    /// Number of indices the set can hold without growing.
    pub fn capacity_bits(&self) -> usize {
        self.bits.len()
    }
}

impl PartialEq for BitSet {
    fn eq(&self, other: &Self) -> bool {
        let (longer, shorter) = if self.word_count() >= other.word_count() {
            (self.words(), other.words())
        } else {
            (other.words(), self.words())
        };
        longer
            .iter()
            .enumerate()
            .all(|(i, a)| *a == shorter.get(i).copied().unwrap_or(0))
    }
}

impl Eq for BitSet {}

impl FromIterator<usize> for BitSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = BitSet::new();
        for index in iter {
            set.set(index);
        }
        set
    }
}

impl fmt::Display for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (n, index) in self.iter().enumerate() {
            if n > 0 {
                write!(f, ",")?;
            }
            write!(f, "{index}")?;
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitSet{self}")
    }
}
