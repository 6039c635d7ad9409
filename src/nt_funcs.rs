//! Standalone number theoretic functions that can be used without a sieve.
//!
//! Wheel trial division only divides by integers coprime to 2, 3, 5, 7, 11 and 13, so it
//! needs no memory besides the shared wheel table. It is the better choice for a handful
//! of queries; repeated queries are faster with a [crate::WheelSieve].

use crate::error::{Error, Result};
use crate::factor::{into_factors, push_residual, strip_base_primes, trial_division};
use crate::tables::{wheel, BASE_PRIMES, SMALL_PRIME_PI};
use crate::traits::{Precondition, SieveInt};
use std::collections::BTreeMap;

/// Test primality by wheel trial division
pub fn is_prime_wheel<T: SieveInt>(target: T) -> Result<bool> {
    is_prime_wheel_with(target, Precondition::NONE)
}

/// Test primality by wheel trial division, skipping the checks ruled out by `hints`
pub fn is_prime_wheel_with<T: SieveInt>(target: T, hints: Precondition) -> Result<bool> {
    Ok(is_prime_wheel64(target.to_query()?, hints))
}

pub(crate) fn is_prime_wheel64(n: u64, hints: Precondition) -> bool {
    if let Some(decided) = hints.resolve(n) {
        return decided;
    }
    wheel()
        .candidates()
        .take_while(|&p| p <= n / p)
        .all(|p| n % p != 0)
}

/// Factorize by wheel trial division. The result maps each prime factor to its exponent.
pub fn factors_wheel<T: SieveInt>(target: T) -> Result<BTreeMap<T, usize>> {
    let n = target.to_query()?;
    if n == 0 {
        return Err(Error::FactorZero);
    }

    let mut result = BTreeMap::new();
    let residual = strip_base_primes(n, &mut result);
    // the candidates only run out past 2^64, far beyond any square root
    let residual = match trial_division(wheel().candidates(), residual, &mut result) {
        Ok(r) | Err(r) => r,
    };
    push_residual(residual, &mut result);
    into_factors(result)
}

/// An upper bound of π(n), the count of primes not greater than n.
///
/// Uses Dusart's bound n/(ln n - 1.1) from 60184 on, and Rosser and Schoenfeld's
/// 1.25506·n/ln n below it.
pub fn prime_pi_upper_bound(n: u64) -> u64 {
    if n < 17 {
        return SMALL_PRIME_PI[n as usize] as u64;
    }
    let x = n as f64;
    let estimate = if n >= 60184 {
        x / (x.ln() - 1.1)
    } else {
        1.25506 * x / x.ln()
    };
    estimate.ceil() as u64
}

/// An upper bound of the k-th prime (counting 2 as the first), k·ln(k·ln k) for k ≥ 6.
/// Returns 0 for k = 0.
pub fn nth_prime_upper_bound(k: u64) -> u64 {
    if k == 0 {
        return 0;
    }
    if k <= BASE_PRIMES.len() as u64 {
        return BASE_PRIMES[k as usize - 1];
    }
    let x = k as f64;
    (x * (x * x.ln()).ln()).ceil() as u64
}
