//! Growable bit array of wheel-eligible integers, and the resumable sieve that fills it.
//!
//! A store covers whole wheel cycles starting from its origin. Bit `i` of the store
//! represents the i-th wheel-eligible integer after the origin, and is set iff that
//! integer is prime. One cycle takes 5760 bits, exactly 90 words.

use crate::error::{Error, Result};
use crate::tables::{wheel, CYCLE, FIRST_SIEVED_PRIME, WHEEL_SIZE};
use crate::traits::SieveIndex;
use bitvec::prelude::*;
use std::marker::PhantomData;

const WORDS_PER_CYCLE: u64 = (WHEEL_SIZE / 64) as u64;

pub struct SieveStore<I: SieveIndex> {
    label: &'static str,
    bits: BitVec<u64, Lsb0>,
    origin: u64,
    bound: u64,
    ceiling: u64,
    _index: PhantomData<I>,
}

impl<I: SieveIndex> SieveStore<I> {
    /// Create an empty store for the integers in `(origin, ceiling]`. Both ends must be
    /// multiples of the wheel cycle.
    pub fn new(label: &'static str, origin: u64, ceiling: u64) -> Self {
        debug_assert!(origin % CYCLE == 0 && ceiling % CYCLE == 0);
        SieveStore {
            label,
            bits: BitVec::new(),
            origin,
            bound: origin,
            ceiling,
            _index: PhantomData,
        }
    }

    /// Every integer not greater than this is represented (the high-water mark)
    #[inline]
    pub fn bound(&self) -> u64 {
        self.bound
    }

    #[inline]
    pub fn origin(&self) -> u64 {
        self.origin
    }

    #[inline]
    pub fn ceiling(&self) -> u64 {
        self.ceiling
    }

    /// Whether the store is saturated up to its ceiling
    #[inline]
    pub fn is_full(&self) -> bool {
        self.bound == self.ceiling
    }

    #[inline]
    fn origin_index(&self) -> u64 {
        self.origin / CYCLE * WHEEL_SIZE as u64
    }

    /// Bit index of an eligible integer inside the store
    #[inline]
    fn local_index(&self, n: u64) -> Option<I> {
        if n <= self.origin || n > self.bound {
            return None;
        }
        let global = wheel().index_of(n)?;
        I::from_bits(global - self.origin_index())
    }

    /// Look up a covered integer. Returns None if `n` is outside the store or not eligible.
    #[inline]
    pub fn get(&self, n: u64) -> Option<bool> {
        self.local_index(n).map(|i| self.bits[i.to_usize()])
    }

    /// Count of store bits representing integers not greater than `n`
    fn span(&self, n: u64) -> usize {
        if n <= self.origin {
            return 0;
        }
        let n = n.min(self.bound);
        (wheel().count_eligible(n) - self.origin_index()) as usize
    }

    /// Count the primes in `(origin, n]`, limited to the covered part of the store
    pub fn count_up_to(&self, n: u64) -> u64 {
        self.bits[..self.span(n)].count_ones() as u64
    }

    /// Iterate over the stored primes in `[start, bound]` in increasing order
    pub fn primes_from(&self, start: u64) -> impl Iterator<Item = u64> + '_ {
        let skip = self.span(start.saturating_sub(1));
        let base = self.origin_index() + skip as u64;
        self.bits[skip..]
            .iter_ones()
            .map(move |i| wheel().value_at(base + i as u64))
    }

    /// Iterate over all stored primes
    pub fn primes(&self) -> impl Iterator<Item = u64> + '_ {
        self.primes_from(self.origin)
    }

    /// Drop the contents, returning the store to its empty state
    pub fn clear(&mut self) {
        self.bits = BitVec::new();
        self.bound = self.origin;
    }

    /// Make room for all integers up to `requested` rounded up to whole cycles. The new
    /// bits are set. Returns the previous bound, or None if nothing had to grow.
    fn grow(&mut self, requested: u64) -> Result<Option<u64>> {
        if requested <= self.bound {
            return Ok(None);
        }
        if requested > self.ceiling {
            return Err(Error::LimitExceeded {
                requested,
                limit: self.ceiling,
            });
        }

        let cycles = (requested - self.origin + CYCLE - 1) / CYCLE;
        let new_bound = self.origin + cycles * CYCLE;
        let bit_count = cycles * WHEEL_SIZE as u64;
        if bit_count > I::MAX_BITS {
            return Err(Error::LimitExceeded {
                requested,
                limit: self.origin + I::MAX_BITS / WHEEL_SIZE as u64 * CYCLE,
            });
        }

        let words = cycles * WORDS_PER_CYCLE;
        let mut storage = std::mem::take(&mut self.bits).into_vec();
        let extra = (words as usize).saturating_sub(storage.len());
        if storage.try_reserve_exact(extra).is_err() {
            tracing::warn!(store = self.label, requested, words, "sieve allocation failed");
            self.bits = BitVec::from_vec(storage);
            return Err(Error::AllocationFailed { requested, words });
        }
        storage.resize(words as usize, u64::MAX);
        self.bits = BitVec::from_vec(storage);

        let previous = self.bound;
        if previous == 0 {
            // the first bit of a store starting at zero is the integer 1
            self.bits.set(0, false);
        }
        self.bound = new_bound;
        tracing::debug!(store = self.label, from = previous, to = new_bound, bits = bit_count, "sieve extended");
        Ok(Some(previous))
    }

    /// Mark composite every eligible multiple of `p` in `[max(from, p²), self.bound)`
    fn mark_multiples(&mut self, p: u64, from: u64) {
        let w = wheel();
        let start = from.max(p * p);
        let origin_index = self.origin_index();
        for m in w.cursor_from((start + p - 1) / p) {
            let s = match p.checked_mul(m) {
                Some(s) if s < self.bound => s,
                _ => break,
            };
            if let Some(global) = w.index_of(s) {
                self.bits.set((global - origin_index) as usize, false);
            }
        }
    }

    /// Extend the store to cover `requested`, sieving with its own primes. Only valid for
    /// a store starting at zero.
    pub fn extend(&mut self, requested: u64) -> Result<()> {
        debug_assert_eq!(self.origin, 0);
        let previous = match self.grow(requested)? {
            Some(previous) => previous,
            None => return Ok(()),
        };

        // walk the store itself: a prime below sqrt(bound) is final before it is read
        let w = wheel();
        let mut cursor = w.index_of(FIRST_SIEVED_PRIME).unwrap_or(1) as usize;
        while let Some(offset) = self.bits[cursor..].first_one() {
            let index = cursor + offset;
            let p = w.value_at(index as u64);
            if p * p >= self.bound {
                break;
            }
            self.mark_multiples(p, previous);
            cursor = index + 1;
        }
        Ok(())
    }

    /// Extend the store to cover `requested`, sieving with primes from a store below it.
    /// `sieving_primes` must yield, in increasing order, every prime from 17 up to the
    /// square root of the new bound.
    pub fn extend_with<P: Iterator<Item = u64>>(
        &mut self,
        requested: u64,
        sieving_primes: P,
    ) -> Result<()> {
        let previous = match self.grow(requested)? {
            Some(previous) => previous,
            None => return Ok(()),
        };
        let bound = self.bound;
        for p in sieving_primes.take_while(|&p| p.checked_mul(p).map_or(false, |sq| sq < bound)) {
            self.mark_multiples(p, previous);
        }
        Ok(())
    }
}
