//! Precomputed constants and the mod 30030 wheel shared by every sieve.

use once_cell::sync::Lazy;

/// Primes factored out by the wheel. They are never represented in a sieve store.
pub const BASE_PRIMES: [u64; 6] = [2, 3, 5, 7, 11, 13];

/// Length of one wheel cycle, 2·3·5·7·11·13
pub const CYCLE: u64 = 30030;

/// Count of integers in one cycle that are coprime to all base primes
pub const WHEEL_SIZE: usize = 5760;

/// The smallest prime stored in a sieve
pub const FIRST_SIEVED_PRIME: u64 = 17;

/// Largest integer addressed by the primary store (142857 whole cycles).
///
/// Stepping a sieving prime past this value still fits in 32 bits, which is why
/// the cutoff is not 2^32 - 1.
pub const PRIMARY_CEILING: u64 = 142_857 * CYCLE;

/// Largest integer addressed by the extended store. Every prime needed to sieve
/// up to this bound lies in the primary store.
pub const EXTENDED_CEILING: u64 = PRIMARY_CEILING * PRIMARY_CEILING;

/// Number of primes not greater than [PRIMARY_CEILING]
pub const PRIMES_BELOW_PRIMARY_CEILING: u64 = 203_056_267;

/// π(n) for n < 17
pub const SMALL_PRIME_PI: [u8; 17] = [0, 0, 1, 2, 2, 3, 3, 4, 4, 4, 4, 5, 5, 6, 6, 6, 6];

const NOT_ELIGIBLE: u16 = u16::MAX;

/// Residues modulo [CYCLE] that are coprime to the base primes, with the inverse
/// lookup and the distance to the next residue.
pub struct WheelTable {
    residues: [u16; WHEEL_SIZE],
    positions: [u16; CYCLE as usize],
    gaps: [u8; WHEEL_SIZE],
}

static WHEEL: Lazy<WheelTable> = Lazy::new(WheelTable::build);

/// The process-wide wheel table, built on first use
#[inline]
pub fn wheel() -> &'static WheelTable {
    &WHEEL
}

impl WheelTable {
    fn build() -> Self {
        let mut residues = [0u16; WHEEL_SIZE];
        let mut positions = [NOT_ELIGIBLE; CYCLE as usize];
        let mut gaps = [0u8; WHEEL_SIZE];

        let eligible = (1..CYCLE).filter(|r| BASE_PRIMES.iter().all(|p| r % p != 0));
        for (i, r) in eligible.enumerate() {
            residues[i] = r as u16;
            positions[r as usize] = i as u16;
        }
        for i in 0..WHEEL_SIZE - 1 {
            gaps[i] = (residues[i + 1] - residues[i]) as u8;
        }
        // 30029 -> 30031
        gaps[WHEEL_SIZE - 1] = (CYCLE + 1 - residues[WHEEL_SIZE - 1] as u64) as u8;

        WheelTable {
            residues,
            positions,
            gaps,
        }
    }

    /// The i-th eligible residue in increasing order
    #[inline]
    pub fn residue(&self, i: usize) -> u64 {
        self.residues[i] as u64
    }

    /// Distance from the i-th residue to the next eligible integer
    #[inline]
    pub fn gap(&self, i: usize) -> u64 {
        self.gaps[i] as u64
    }

    /// Position of residue `r` (< 30030) in the wheel, None if it shares a factor with the base primes
    #[inline]
    pub fn position(&self, r: u64) -> Option<usize> {
        match self.positions[r as usize] {
            NOT_ELIGIBLE => None,
            i => Some(i as usize),
        }
    }

    /// Whether `n` is coprime to all base primes
    #[inline]
    pub fn is_eligible(&self, n: u64) -> bool {
        self.positions[(n % CYCLE) as usize] != NOT_ELIGIBLE
    }

    /// Logical bit index of an eligible integer, counted from zero
    #[inline]
    pub fn index_of(&self, n: u64) -> Option<u64> {
        self.position(n % CYCLE)
            .map(|i| n / CYCLE * WHEEL_SIZE as u64 + i as u64)
    }

    /// Inverse of [WheelTable::index_of]
    #[inline]
    pub fn value_at(&self, index: u64) -> u64 {
        let size = WHEEL_SIZE as u64;
        index / size * CYCLE + self.residue((index % size) as usize)
    }

    /// Count of eligible integers in `[0, n]`, which equals the index one past the
    /// largest eligible integer not greater than n.
    pub fn count_eligible(&self, n: u64) -> u64 {
        let r = n % CYCLE;
        let partial = self.residues.partition_point(|&x| x as u64 <= r);
        n / CYCLE * WHEEL_SIZE as u64 + partial as u64
    }

    /// Iterate over the eligible integers not smaller than `start`
    pub fn cursor_from(&'static self, start: u64) -> WheelCursor {
        let r = start % CYCLE;
        let base = start - r;
        let i = self.residues.partition_point(|&x| (x as u64) < r);
        let (value, position) = if i == WHEEL_SIZE {
            (base.checked_add(CYCLE + 1), 0)
        } else {
            (base.checked_add(self.residue(i)), i)
        };
        WheelCursor {
            table: self,
            value,
            position,
        }
    }

    /// Iterate over candidate divisors 17, 19, 23, ... as used by wheel trial division
    pub fn candidates(&'static self) -> WheelCursor {
        WheelCursor {
            table: self,
            value: Some(FIRST_SIEVED_PRIME),
            position: 1,
        }
    }
}

/// Walks eligible integers upward by the gap table. Ends at the top of the u64 range.
#[derive(Clone)]
pub struct WheelCursor {
    table: &'static WheelTable,
    value: Option<u64>,
    position: usize,
}

impl WheelCursor {
    /// Position of the next yielded value in the wheel
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }
}

impl Iterator for WheelCursor {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        let current = self.value?;
        self.value = current.checked_add(self.table.gap(self.position));
        self.position += 1;
        if self.position == WHEEL_SIZE {
            self.position = 0;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_layout_test() {
        let w = wheel();
        assert_eq!(w.residue(0), 1);
        assert_eq!(w.residue(1), 17);
        assert_eq!(w.residue(WHEEL_SIZE - 1), 30029);
        assert_eq!(w.gap(WHEEL_SIZE - 1), 2);

        let mut max_gap = 0;
        for i in 0..WHEEL_SIZE {
            let next = if i == WHEEL_SIZE - 1 { CYCLE + 1 } else { w.residue(i + 1) };
            assert_eq!(w.gap(i), next - w.residue(i));
            assert_eq!(w.position(w.residue(i)), Some(i));
            max_gap = max_gap.max(w.gap(i));
        }
        assert_eq!(max_gap, 22);

        let eligible = (0..CYCLE).filter(|&r| w.position(r).is_some()).count();
        assert_eq!(eligible, WHEEL_SIZE);
        assert_eq!(w.position(0), None);
        assert_eq!(w.position(323), Some(w.count_eligible(322) as usize));
        assert!(!w.is_eligible(30030 * 7 + 26));
    }

    #[test]
    fn index_roundtrip_test() {
        let w = wheel();
        for n in [1u64, 17, 30031, 4_289_995_709, 1_000_000_007] {
            let idx = w.index_of(n).unwrap();
            assert_eq!(w.value_at(idx), n);
            assert_eq!(w.count_eligible(n), idx + 1);
        }
        assert_eq!(w.index_of(30030 * 5 + 1), Some(5 * WHEEL_SIZE as u64));
        assert_eq!(w.index_of(91), None);
        assert_eq!(w.count_eligible(PRIMARY_CEILING), 142_857 * WHEEL_SIZE as u64);
    }

    #[test]
    fn cursor_test() {
        let w = wheel();
        let first: Vec<u64> = w.candidates().take(6).collect();
        assert_eq!(first, [17, 19, 23, 29, 31, 37]);

        let wrap: Vec<u64> = w.cursor_from(30012).take(4).collect();
        assert_eq!(wrap, [30013, 30029, 30031, 30047]);
        let exact: Vec<u64> = w.cursor_from(30031).take(2).collect();
        assert_eq!(exact, [30031, 30047]);

        // the cursor agrees with a plain filter
        let filtered: Vec<u64> = (100_000..200_000).filter(|&n| w.is_eligible(n)).collect();
        let walked: Vec<u64> = w.cursor_from(100_000).take_while(|&n| n < 200_000).collect();
        assert_eq!(filtered, walked);

        assert_eq!(w.cursor_from(u64::MAX - 3).count(), 0);
    }
}
