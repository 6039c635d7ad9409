//! WheelSieve is the amortized prime cache that backs every query.
//!
//! It keeps two [SieveStore]s: the primary one addresses integers up to
//! [PRIMARY_CEILING] with a 32 bit index, the extended one continues from there with
//! a 64 bit index. Both grow on demand and never shrink, so a long run of queries pays
//! for sieving to the largest bound only once.

use crate::error::{Error, Result};
use crate::factor::{into_factors, push_residual, strip_base_primes, trial_division};
use crate::nt_funcs::{nth_prime_upper_bound, prime_pi_upper_bound};
use crate::store::SieveStore;
use crate::tables::{
    wheel, BASE_PRIMES, CYCLE, EXTENDED_CEILING, FIRST_SIEVED_PRIME, PRIMARY_CEILING,
    PRIMES_BELOW_PRIMARY_CEILING, SMALL_PRIME_PI,
};
use crate::traits::{FactorizationConfig, Precondition, SieveConfig, SieveInt};
use std::collections::BTreeMap;

/// Smallest step by which factorization grows the sieve when it runs out of primes
const MIN_EXTENSION: u64 = 64 * CYCLE;

pub struct WheelSieve {
    primary: SieveStore<u32>,
    extended: SieveStore<u64>,
    /// Where the extended store takes over, and the count of primes up to there
    split: u64,
    primes_below_split: u64,
    max_bound: u64,
}

/// Allocate room for `count` values, reporting failure instead of aborting
fn try_vec<T>(count: usize, requested: u64) -> Result<Vec<T>> {
    let mut result = Vec::new();
    if result.try_reserve_exact(count).is_err() {
        let bytes = (count as u64).saturating_mul(std::mem::size_of::<T>() as u64);
        let words = bytes / 8 + (bytes % 8 != 0) as u64;
        tracing::warn!(count, requested, "prime list allocation failed");
        return Err(Error::AllocationFailed { requested, words });
    }
    Ok(result)
}

impl Default for WheelSieve {
    fn default() -> Self {
        Self::new()
    }
}

impl WheelSieve {
    /// Create an empty sieve. Nothing is sieved until a query needs it.
    pub fn new() -> Self {
        WheelSieve {
            primary: SieveStore::new("primary", 0, PRIMARY_CEILING),
            extended: SieveStore::new("extended", PRIMARY_CEILING, EXTENDED_CEILING),
            split: PRIMARY_CEILING,
            primes_below_split: PRIMES_BELOW_PRIMARY_CEILING,
            max_bound: EXTENDED_CEILING,
        }
    }

    /// A sieve whose primary store ends at `split` instead, so that crossing into the
    /// extended store is cheap to exercise
    #[cfg(test)]
    fn with_split(split: u64) -> Self {
        let mut primary = SieveStore::new("primary", 0, split);
        primary.extend(split).unwrap();
        let primes_below_split = BASE_PRIMES.len() as u64 + primary.count_up_to(split);
        primary.clear();
        WheelSieve {
            primary,
            extended: SieveStore::new("extended", split, split * split),
            split,
            primes_below_split,
            max_bound: split * split,
        }
    }

    /// Create a sieve with a bound limit, and sieve up to the initial bound right away
    pub fn with_config(config: SieveConfig) -> Result<Self> {
        let mut sieve = Self::new();
        sieve.max_bound = config.max_bound.min(EXTENDED_CEILING);
        sieve.ensure_coverage(config.initial_bound)?;
        Ok(sieve)
    }

    /// All integers not greater than this bound are covered
    pub fn bound(&self) -> u64 {
        if self.primary.is_full() {
            self.extended.bound()
        } else {
            self.primary.bound()
        }
    }

    /// Sieve up to at least `target`, and return a token proving the coverage.
    ///
    /// Repeated calls are cheap when the bound is already covered. Growing in many small
    /// steps costs more than one call with the final bound.
    pub fn ensure_coverage<T: SieveInt>(&mut self, target: T) -> Result<Coverage<'_>> {
        let n = target.to_query()?;
        if n > self.max_bound {
            return Err(Error::LimitExceeded {
                requested: n,
                limit: self.max_bound,
            });
        }

        if n <= self.split {
            self.primary.extend(n)?;
        } else {
            self.primary.extend(self.split)?;
            self.extended.extend_with(n, self.primary.primes())?;
        }
        Ok(self.covered())
    }

    /// Token for the coverage reached so far
    pub fn covered(&self) -> Coverage<'_> {
        Coverage {
            sieve: self,
            bound: self.bound(),
        }
    }

    /// Release the sieve memory. Later queries sieve again from scratch.
    pub fn clear(&mut self) {
        self.primary.clear();
        self.extended.clear();
    }

    /// Whether `n` is a prime known to the sieve, without extending it
    pub fn contains(&self, n: u64) -> bool {
        BASE_PRIMES.contains(&n) || self.lookup(n).unwrap_or(false)
    }

    /// Iterate over all primes in the covered range, base primes included
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        BASE_PRIMES
            .iter()
            .copied()
            .chain(self.primes_from(FIRST_SIEVED_PRIME))
    }

    fn lookup(&self, n: u64) -> Option<bool> {
        if n <= self.split {
            self.primary.get(n)
        } else {
            self.extended.get(n)
        }
    }

    /// Covered primes from `start` on, skipping the base primes
    fn primes_from(&self, start: u64) -> impl Iterator<Item = u64> + '_ {
        self.primary
            .primes_from(start)
            .chain(self.extended.primes_from(start))
    }

    /// Return whether target is a prime, sieving up to it if necessary
    pub fn is_prime<T: SieveInt>(&mut self, target: T) -> Result<bool> {
        self.is_prime_with(target, Precondition::NONE)
    }

    /// Primality test that skips the base prime checks ruled out by `hints`
    pub fn is_prime_with<T: SieveInt>(&mut self, target: T, hints: Precondition) -> Result<bool> {
        let n = target.to_query()?;
        if let Some(decided) = hints.resolve(n) {
            return Ok(decided);
        }
        self.ensure_coverage(n)?.lookup(n)
    }

    /// Factorize target with primes from the sieve, returning each prime factor with
    /// its exponent in increasing order
    pub fn factors<T: SieveInt>(&mut self, target: T) -> Result<BTreeMap<T, usize>> {
        self.factors_with(target, FactorizationConfig::default())
    }

    /// Factorize target, choosing candidate divisors as configured.
    ///
    /// Primes already in the sieve are tried first. The sieve then grows in doubling
    /// steps toward the square root of the unfactored part, so a number with small
    /// factors never causes a large sieve. Past `config.sieve_limit` the candidates come
    /// from the wheel instead.
    pub fn factors_with<T: SieveInt>(
        &mut self,
        target: T,
        config: FactorizationConfig,
    ) -> Result<BTreeMap<T, usize>> {
        let n = target.to_query()?;
        if n == 0 {
            return Err(Error::FactorZero);
        }

        let mut result = BTreeMap::new();
        let mut residual = strip_base_primes(n, &mut result);
        let limit = config.sieve_limit.unwrap_or(u64::MAX).min(self.max_bound);
        let mut next = FIRST_SIEVED_PRIME;

        loop {
            let covered = self.bound().min(limit);
            if next <= covered {
                let primes = self.primes_from(next).take_while(|&p| p <= covered);
                match trial_division(primes, residual, &mut result) {
                    Ok(r) => {
                        push_residual(r, &mut result);
                        return into_factors(result);
                    }
                    Err(r) => residual = r,
                }
                next = covered + 1;
            }

            let root = num_integer::sqrt(residual);
            if root < next {
                // no untested prime is small enough to divide it
                push_residual(residual, &mut result);
                return into_factors(result);
            }
            if covered >= limit {
                break;
            }
            let step = self.bound().saturating_mul(2).max(MIN_EXTENSION);
            let target = root.min(step).min(limit);
            tracing::trace!(residual, target, "factorization extends the sieve");
            self.ensure_coverage(target)?;
        }

        tracing::trace!(residual, next, "factorization falls back to the wheel");
        let residual = match trial_division(wheel().cursor_from(next), residual, &mut result) {
            Ok(r) | Err(r) => r,
        };
        push_residual(residual, &mut result);
        into_factors(result)
    }

    /// Count the primes not greater than target
    pub fn count_primes_up_to<T: SieveInt>(&mut self, target: T) -> Result<u64> {
        let n = target.to_query()?;
        self.ensure_coverage(n)?.count_primes_up_to(n)
    }

    /// Returns all primes not greater than target, in increasing order
    pub fn primes_up_to<T: SieveInt>(&mut self, target: T) -> Result<Vec<T>> {
        let n = target.to_query()?;
        self.ensure_coverage(n)?.primes_up_to(target)
    }

    /// Returns the first `count` primes, counting from 2.
    ///
    /// Fails with [Error::TooManyPrimes] if the last of them does not fit in `T`. Types
    /// of 32 bits or less only take primes from the primary store, that is at most the
    /// first 203 056 267 primes.
    pub fn first_primes<T: SieveInt>(&mut self, count: usize) -> Result<Vec<T>> {
        let mut type_max = T::max_value().to_query()?;
        if type_max <= u32::MAX as u64 {
            type_max = type_max.min(self.split);
        }
        let ceiling = type_max.min(self.max_bound);
        let estimate = nth_prime_upper_bound(count as u64);
        let max_bound = self.max_bound;
        let short = |bound: u64| {
            if type_max <= max_bound {
                Error::TooManyPrimes(count as u64)
            } else {
                Error::LimitExceeded {
                    requested: estimate.max(bound.saturating_add(1)),
                    limit: max_bound,
                }
            }
        };

        let available = prime_pi_upper_bound(ceiling);
        if available < count as u64 {
            return Err(short(ceiling));
        }
        let mut result = try_vec(count, estimate)?;
        for &p in BASE_PRIMES.iter().take(count) {
            result.push(T::from_query(p)?);
        }
        if count <= BASE_PRIMES.len() {
            return Ok(result);
        }

        let mut bound = estimate.min(ceiling);
        let mut next = FIRST_SIEVED_PRIME;
        loop {
            let coverage = self.ensure_coverage(bound)?;
            for p in coverage.sieve.primes_from(next).take_while(|&p| p <= bound) {
                result.push(T::from_query(p)?);
                if result.len() == count {
                    return Ok(result);
                }
            }

            // the estimate fell short, keep doubling
            if bound >= ceiling {
                return Err(short(bound));
            }
            tracing::debug!(count, bound, "prime count estimate fell short");
            next = bound + 1;
            bound = bound.saturating_mul(2).min(ceiling);
        }
    }
}

/// Proof that a [WheelSieve] covers every integer up to [Coverage::bound].
///
/// The queries here never extend the sieve, which makes them the fastest way to run
/// many queries below a known bound. A query beyond the bound fails with
/// [Error::NotCovered].
#[derive(Clone, Copy)]
pub struct Coverage<'a> {
    sieve: &'a WheelSieve,
    bound: u64,
}

impl<'a> Coverage<'a> {
    #[inline]
    pub fn bound(&self) -> u64 {
        self.bound
    }

    #[inline]
    fn check(&self, n: u64) -> Result<()> {
        if n > self.bound {
            Err(Error::NotCovered {
                requested: n,
                covered: self.bound,
            })
        } else {
            Ok(())
        }
    }

    /// Read the stored bit of a covered integer coprime to the base primes
    fn lookup(&self, n: u64) -> Result<bool> {
        self.check(n)?;
        // integers sharing a factor with the wheel are not stored, and are not prime
        Ok(self.sieve.lookup(n).unwrap_or(false))
    }

    pub fn is_prime<T: SieveInt>(&self, target: T) -> Result<bool> {
        self.is_prime_with(target, Precondition::NONE)
    }

    pub fn is_prime_with<T: SieveInt>(&self, target: T, hints: Precondition) -> Result<bool> {
        let n = target.to_query()?;
        match hints.resolve(n) {
            Some(decided) => Ok(decided),
            None => self.lookup(n),
        }
    }

    /// Factorize with covered primes only. Fails if the bound is below the square root of
    /// the part left after dividing out all covered primes.
    pub fn factors<T: SieveInt>(&self, target: T) -> Result<BTreeMap<T, usize>> {
        let n = target.to_query()?;
        if n == 0 {
            return Err(Error::FactorZero);
        }

        let mut result = BTreeMap::new();
        let residual = strip_base_primes(n, &mut result);
        let primes = self.sieve.primes_from(FIRST_SIEVED_PRIME);
        let residual = match trial_division(primes, residual, &mut result) {
            Ok(r) => r,
            Err(r) => {
                let root = num_integer::sqrt(r);
                if root > self.bound {
                    return Err(Error::NotCovered {
                        requested: root,
                        covered: self.bound,
                    });
                }
                r
            }
        };
        push_residual(residual, &mut result);
        into_factors(result)
    }

    pub fn count_primes_up_to<T: SieveInt>(&self, target: T) -> Result<u64> {
        let n = target.to_query()?;
        self.check(n)?;
        Ok(if n < FIRST_SIEVED_PRIME {
            SMALL_PRIME_PI[n as usize] as u64
        } else if n <= self.sieve.split {
            BASE_PRIMES.len() as u64 + self.sieve.primary.count_up_to(n)
        } else {
            self.sieve.primes_below_split + self.sieve.extended.count_up_to(n)
        })
    }

    pub fn primes_up_to<T: SieveInt>(&self, target: T) -> Result<Vec<T>> {
        let n = target.to_query()?;
        self.check(n)?;
        let estimate = usize::try_from(prime_pi_upper_bound(n)).unwrap_or(usize::MAX);
        let mut result = try_vec(estimate, n)?;
        for p in self.primes().take_while(|&p| p <= n) {
            result.push(T::from_query(p)?);
        }
        Ok(result)
    }

    /// Iterate over all covered primes, base primes included
    pub fn primes(&self) -> impl Iterator<Item = u64> + 'a {
        self.sieve.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::nt_funcs::{factors_wheel, is_prime_wheel};
    use rand::random;

    const PRIME50: [u64; 15] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47];
    const PRIME100: [u64; 25] = [
        2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83,
        89, 97,
    ];

    fn naive_is_prime(n: u64) -> bool {
        n > 1 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
    }

    #[test]
    fn prime_generation_test() {
        let mut pb = WheelSieve::new();
        assert_eq!(pb.primes_up_to(50u64).unwrap(), PRIME50);
        assert_eq!(pb.primes_up_to(100u64).unwrap(), PRIME100);
        assert_eq!(pb.primes_up_to(47u32).unwrap().last(), Some(&47));
        assert_eq!(pb.primes_up_to(1u64).unwrap(), Vec::<u64>::new());
        assert_eq!(pb.primes_up_to(12u16).unwrap(), [2, 3, 5, 7, 11]);

        for (n, pi) in [(100u64, 25usize), (1000, 168), (10000, 1229), (1_000_000, 78498)] {
            let primes = pb.primes_up_to(n).unwrap();
            assert_eq!(primes.len(), pi);
            assert!(primes.windows(2).all(|w| w[0] < w[1]));
            assert!(primes.iter().all(|&p| p <= n));
        }
        let primes = pb.primes_up_to(10000u64).unwrap();
        assert!(primes.iter().all(|&p| naive_is_prime(p)));
    }

    #[test]
    fn prime_assertion_test() {
        let mut pb = WheelSieve::new();
        for x in 0..100u64 {
            assert_eq!(PRIME100.contains(&x), pb.is_prime(x).unwrap(), "is_prime on {}", x);
        }
        for x in 2..=10000u64 {
            assert_eq!(naive_is_prime(x), pb.is_prime(x).unwrap(), "is_prime on {}", x);
        }
        for p in BASE_PRIMES {
            assert_eq!(pb.is_prime(p), Ok(true));
        }

        assert_eq!(pb.is_prime(1_000_003u32), Ok(true));
        assert_eq!(pb.is_prime(1_000_001u64), Ok(false)); // 101 * 9901
        assert_eq!(pb.is_prime(999_983i64), Ok(true));
        assert_eq!(pb.is_prime(-5i32), Err(Error::Negative(-5)));

        // even numbers are decided before any sieving
        let mut empty = WheelSieve::new();
        assert_eq!(empty.is_prime(u64::MAX - 1), Ok(false));
        assert_eq!(empty.is_prime(3u64.pow(40)), Ok(false));
        assert_eq!(empty.bound(), 0);
    }

    #[test]
    fn precondition_test() {
        let mut pb = WheelSieve::new();
        let coprime = Precondition::coprime();
        for x in (1..5000u64).filter(|&x| wheel().is_eligible(x)) {
            assert_eq!(pb.is_prime_with(x, coprime), Ok(naive_is_prime(x)));
        }

        let odd = Precondition::NONE.not_divisible_by(2).not_equal_to(3);
        for x in (1..5000u64).step_by(2).filter(|&x| x != 3) {
            assert_eq!(pb.is_prime_with(x, odd), Ok(naive_is_prime(x)), "hinted test on {}", x);
        }
    }

    #[test]
    fn coverage_token_test() {
        let mut pb = WheelSieve::new();
        let bound = {
            let coverage = pb.ensure_coverage(100_000u32).unwrap();
            assert!(coverage.bound() >= 100_000);
            assert_eq!(coverage.bound() % CYCLE, 0);
            assert_eq!(coverage.is_prime(99_991u32), Ok(true));
            assert_eq!(coverage.is_prime(99_993u32), Ok(false));
            assert_eq!(coverage.count_primes_up_to(100_000u32), Ok(9592));
            assert_eq!(coverage.primes_up_to(100u64).unwrap(), PRIME100);

            let beyond = coverage.bound() + 1;
            let err = coverage.is_prime(beyond).unwrap_err();
            assert_eq!(err, Error::NotCovered { requested: beyond, covered: coverage.bound() });
            assert_eq!(err.kind(), ErrorKind::PreconditionViolation);
            assert!(coverage.count_primes_up_to(beyond).is_err());

            // the base prime checks still answer without coverage
            assert_eq!(coverage.is_prime(beyond * 2), Ok(false));
            coverage.bound()
        };

        // a factorization whose cofactor needs more primes than covered
        let big = 1_000_000_007u64 * 998_244_353;
        let err = pb.covered().factors(big).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PreconditionViolation);
        let fac = pb.covered().factors(2u64 * 99_991 * 99_991).unwrap();
        assert_eq!(fac, BTreeMap::from_iter([(2, 1), (99_991, 2)]));

        // idempotent
        assert_eq!(pb.ensure_coverage(50u32).unwrap().bound(), bound);
        assert_eq!(pb.ensure_coverage(bound).unwrap().bound(), bound);
        assert_eq!(pb.bound(), bound);
    }

    #[test]
    fn monotone_growth_test() {
        let mut stepwise = WheelSieve::new();
        for bound in [10u64, 1000, 200_000, 30_030, 500_000] {
            stepwise.ensure_coverage(bound).unwrap();
        }
        let mut oneshot = WheelSieve::new();
        oneshot.ensure_coverage(500_000u64).unwrap();

        let a: Vec<u64> = stepwise.iter().collect();
        let b: Vec<u64> = oneshot.iter().collect();
        assert_eq!(a, b);
        assert!(stepwise.contains(499_979));
        assert!(!stepwise.contains(499_981));
        assert!(!stepwise.contains(1_000_003)); // not covered yet

        stepwise.clear();
        assert_eq!(stepwise.bound(), 0);
        assert!(!stepwise.contains(17));
        assert!(stepwise.contains(13));
        assert_eq!(stepwise.is_prime(499_979u64), Ok(true));
    }

    #[test]
    fn factorization_test() {
        let mut pb = WheelSieve::new();
        let fac123456789 = BTreeMap::from_iter([(3, 2), (3803, 1), (3607, 1)]);
        let fac = pb.factors(123456789u64).unwrap();
        assert_eq!(fac, fac123456789);

        assert_eq!(pb.factors(1u64), Ok(BTreeMap::new()));
        assert_eq!(pb.factors(0u64), Err(Error::FactorZero));
        assert_eq!(pb.factors(0u64).unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(pb.factors(-30i32), Err(Error::Negative(-30)));

        for n in 1..=10000u64 {
            let fac = pb.factors(n).unwrap();
            let mut prod = 1;
            for (&p, &exp) in &fac {
                assert!(exp > 0);
                assert!(naive_is_prime(p));
                prod *= p.pow(exp as u32);
            }
            assert_eq!(prod, n, "factorization of {}", n);
            let keys: Vec<u64> = fac.keys().copied().collect();
            assert!(keys.windows(2).all(|w| w[0] < w[1]));
        }

        // small factors do not cause a large sieve
        let mut small = WheelSieve::new();
        let fac = small.factors(u64::MAX).unwrap();
        assert_eq!(fac, factors_wheel(u64::MAX).unwrap());
        assert!(small.bound() <= MIN_EXTENSION);

        let fac1_17 = BTreeMap::from_iter([(2071723u64, 1), (5363222357, 1)]);
        assert_eq!(pb.factors(11111111111111111u64), Ok(fac1_17));
        assert_eq!(pb.factors(4_294_967_291u32), Ok(BTreeMap::from_iter([(4_294_967_291u32, 1)])));
    }

    #[test]
    fn factorization_config_test() {
        let mut pb = WheelSieve::new();
        let n = 999_983u64 * 1_000_003;
        let expected = BTreeMap::from_iter([(999_983u64, 1), (1_000_003, 1)]);

        assert_eq!(pb.factors_with(n, FactorizationConfig::wheel()), Ok(expected.clone()));
        assert_eq!(pb.bound(), 0);

        let hybrid = FactorizationConfig { sieve_limit: Some(10_000) };
        assert_eq!(pb.factors_with(n, hybrid), Ok(expected.clone()));
        assert_eq!(pb.bound(), CYCLE);

        assert_eq!(pb.factors(n), Ok(expected));
        assert!(pb.bound() >= 999_983);
    }

    #[test]
    fn random_factorization_test() {
        let mut pb = WheelSieve::new();
        for _ in 0..50 {
            let x = 1_000_000_000 + random::<u64>() % 9_000_000_000;
            let fac = pb.factors(x).unwrap();
            let mut prod = 1u64;
            for (&p, &exp) in &fac {
                assert_eq!(is_prime_wheel(p), Ok(true), "factor {} of {} is not prime", p, x);
                if p < 1_000_000 {
                    assert_eq!(pb.is_prime(p), Ok(true));
                }
                prod *= p.pow(exp as u32);
            }
            assert_eq!(x, prod, "factorization check failed! ({} != {})", x, prod);
        }
    }

    #[test]
    fn counting_test() {
        let mut pb = WheelSieve::new();
        let small = [0u64, 0, 1, 2, 2, 3, 3, 4, 4, 4, 4, 5, 5, 6, 6, 6, 6, 7, 7, 8];
        for (n, &pi) in small.iter().enumerate() {
            assert_eq!(pb.count_primes_up_to(n as u64), Ok(pi), "pi({})", n);
        }
        for n in [100u64, 1000, 10000, 30030, 30031, 65536, 1_000_000, 10_000_000] {
            let count = pb.count_primes_up_to(n).unwrap();
            assert_eq!(count, pb.primes_up_to(n).unwrap().len() as u64, "pi({})", n);
        }
        assert_eq!(pb.count_primes_up_to(10_000_000u64), Ok(664_579));
        assert_eq!(pb.count_primes_up_to(-1i64), Err(Error::Negative(-1)));
    }

    #[test]
    fn first_primes_test() {
        let mut pb = WheelSieve::new();
        assert_eq!(pb.first_primes::<u64>(0).unwrap(), Vec::<u64>::new());
        assert_eq!(pb.first_primes::<u64>(1).unwrap(), [2]);
        assert_eq!(pb.first_primes::<u64>(6).unwrap().last(), Some(&13));
        assert_eq!(pb.first_primes::<u32>(7).unwrap().last(), Some(&17));
        assert_eq!(pb.first_primes::<u64>(25).unwrap(), PRIME100);

        for (k, p) in [(100usize, 541u64), (10000, 104729), (1_000_000, 15_485_863)] {
            let primes = pb.first_primes::<u64>(k).unwrap();
            assert_eq!(primes.len(), k);
            assert_eq!(primes.last(), Some(&p));
            assert!(primes.windows(2).all(|w| w[0] < w[1]));
        }

        // 6542 primes fit in u16, the next one is 65537
        assert_eq!(pb.first_primes::<u16>(6542).unwrap().last(), Some(&65521));
        assert_eq!(pb.first_primes::<u16>(6543), Err(Error::TooManyPrimes(6543)));
    }

    #[test]
    fn resource_limit_test() {
        let config = SieveConfig { max_bound: 1_000_000, initial_bound: 1000 };
        let mut pb = WheelSieve::with_config(config).unwrap();
        assert_eq!(pb.bound(), CYCLE);

        let err = pb.ensure_coverage(2_000_000u64).err().unwrap();
        assert_eq!(err, Error::LimitExceeded { requested: 2_000_000, limit: 1_000_000 });
        assert_eq!(err.kind(), ErrorKind::ResourceExhaustion);
        assert_eq!(pb.is_prime(1_000_003u64).unwrap_err().kind(), ErrorKind::ResourceExhaustion);
        assert_eq!(pb.bound(), CYCLE);

        // factorization falls back to the wheel at the limit
        let n = 1_000_003u64 * 1_000_033;
        let fac = pb.factors(n).unwrap();
        assert_eq!(fac, BTreeMap::from_iter([(1_000_003, 1), (1_000_033, 1)]));
        assert!(pb.bound() <= 1_000_000 + CYCLE);

        assert!(matches!(
            pb.first_primes::<u64>(100_000),
            Err(Error::LimitExceeded { limit: 1_000_000, .. })
        ));

        let mut unlimited = WheelSieve::new();
        assert_eq!(
            unlimited.ensure_coverage(u64::MAX).err().map(|e| e.kind()),
            Some(ErrorKind::ResourceExhaustion)
        );
    }

    #[test]
    fn allocation_failure_test() {
        let mut pb = WheelSieve::new();
        let err = pb.first_primes::<u64>(1usize << 50).unwrap_err();
        assert!(matches!(err, Error::AllocationFailed { .. }));
        assert_eq!(err.kind(), ErrorKind::ResourceExhaustion);
        assert_eq!(pb.bound(), 0);

        // the sieve stays usable
        assert_eq!(pb.first_primes::<u64>(100).unwrap().last(), Some(&541));
    }

    #[test]
    fn store_crossing_test() {
        let split = 20 * CYCLE;
        let mut pb = WheelSieve::with_split(split);
        let mut reference = WheelSieve::new();
        reference.ensure_coverage(3 * split).unwrap();

        let below = reference.count_primes_up_to(split).unwrap();
        assert_eq!(pb.count_primes_up_to(split), Ok(below));
        assert_eq!(pb.bound(), split);

        for n in split - 1000..=split + 1000 {
            assert_eq!(pb.is_prime(n), reference.is_prime(n), "is_prime on {}", n);
        }
        assert!(pb.bound() > split);
        for n in [split + 1, split + 12345, 2 * split, 3 * split] {
            assert_eq!(pb.count_primes_up_to(n), reference.count_primes_up_to(n), "pi({})", n);
        }
        assert_eq!(pb.primes_up_to(2 * split), reference.primes_up_to(2 * split));

        let a: Vec<u64> = pb.iter().collect();
        let b: Vec<u64> = reference.iter().take_while(|&p| p <= pb.bound()).collect();
        assert_eq!(a, b);

        let k = below as usize + 5;
        let primes = pb.first_primes::<u64>(k).unwrap();
        assert_eq!(primes, reference.first_primes::<u64>(k).unwrap());
        assert!(primes[k - 1] > split);

        // 32 bit results stay in the primary store
        assert_eq!(pb.first_primes::<u32>(below as usize).unwrap().len(), below as usize);
        assert_eq!(pb.first_primes::<u32>(k), Err(Error::TooManyPrimes(k as u64)));

        let n = 1_000_003u64 * 1_000_033;
        let fac = pb.factors(n).unwrap();
        assert_eq!(fac, BTreeMap::from_iter([(1_000_003, 1), (1_000_033, 1)]));
    }

    #[test]
    #[ignore = "sieves past the primary store, needs about 100MB and a minute"]
    fn extended_store_test() {
        let mut pb = WheelSieve::new();
        assert_eq!(pb.count_primes_up_to(PRIMARY_CEILING), Ok(PRIMES_BELOW_PRIMARY_CEILING));
        assert_eq!(pb.is_prime(4_289_995_733u64), Ok(true));
        assert_eq!(pb.count_primes_up_to(4_289_995_733u64), Ok(PRIMES_BELOW_PRIMARY_CEILING + 1));
        assert!(pb.bound() > PRIMARY_CEILING);

        let p = 4_294_967_291u64;
        assert_eq!(pb.is_prime(p), Ok(true));
        assert_eq!(pb.is_prime(4_294_967_297u64), Ok(false)); // 641 * 6700417

        let primes: Vec<u64> = pb.iter().skip_while(|&x| x < PRIMARY_CEILING - 10).take(3).collect();
        assert_eq!(primes.len(), 3);
        assert!(primes.iter().all(|&x| is_prime_wheel(x) == Ok(true)));
        assert!(primes[0] < PRIMARY_CEILING && primes[2] > PRIMARY_CEILING);

        let big = 4_294_967_291u64 * 4_294_967_279;
        assert_eq!(pb.factors(big), Ok(BTreeMap::from_iter([(4_294_967_279u64, 1), (p, 1)])));
    }
}
