//! Trial division shared by the sieve-backed and the wheel-backed factorization.

use crate::error::Result;
use crate::tables::BASE_PRIMES;
use crate::traits::SieveInt;
use std::collections::BTreeMap;

/// Divide out the base primes 2, 3, 5, 7, 11 and 13, recording their exponents.
/// Returns the residual, which is coprime to all of them.
pub fn strip_base_primes(target: u64, result: &mut BTreeMap<u64, usize>) -> u64 {
    debug_assert!(target > 0);
    let f2 = target.trailing_zeros();
    if f2 > 0 {
        result.insert(2, f2 as usize);
    }
    let mut residual = target >> f2;
    for &p in &BASE_PRIMES[1..] {
        let mut exp = 0;
        while residual % p == 0 {
            residual /= p;
            exp += 1;
        }
        if exp > 0 {
            result.insert(p, exp);
        }
    }
    residual
}

/// Find factors by trial division with increasing candidates, merging them into `result`.
///
/// The candidates need not all be prime, but every prime below a composite candidate must
/// come before it. Returns `Ok(residual)` once the target is fully factored, where the
/// residual is 1 or the last prime factor (not yet recorded), or `Err(residual)` if the
/// candidates ran out first.
pub fn trial_division<I: Iterator<Item = u64>>(
    candidates: I,
    target: u64,
    result: &mut BTreeMap<u64, usize>,
) -> Result<u64, u64> {
    let mut residual = target;
    for p in candidates {
        // p * p > residual, without overflow
        if p > residual / p {
            return Ok(residual);
        }
        let mut exp = 0;
        while residual % p == 0 {
            residual /= p;
            exp += 1;
        }
        if exp > 0 {
            *result.entry(p).or_insert(0) += exp;
        }
    }
    if residual == 1 {
        Ok(residual)
    } else {
        Err(residual)
    }
}

/// Record the residual returned by a successful [trial_division]
#[inline]
pub fn push_residual(residual: u64, result: &mut BTreeMap<u64, usize>) {
    if residual > 1 {
        *result.entry(residual).or_insert(0) += 1;
    }
}

/// Convert a factorization into the caller's integer type
pub fn into_factors<T: SieveInt>(factors: BTreeMap<u64, usize>) -> Result<BTreeMap<T, usize>> {
    debug_assert!(factors.len() <= T::MAX_FACTORS);
    factors
        .into_iter()
        .map(|(p, exp)| Ok((T::from_query(p)?, exp)))
        .collect()
}
