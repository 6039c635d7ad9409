use crate::error::Result;
use crate::tables::{BASE_PRIMES, EXTENDED_CEILING};
use num_traits::{FromPrimitive, PrimInt, ToPrimitive};
use std::fmt::Debug;

/// Integer types accepted by the queries. Values are converted to u64 at the boundary,
/// negative values of signed types are rejected rather than reinterpreted.
pub trait SieveInt: PrimInt + FromPrimitive + ToPrimitive + Debug {
    /// Maximum count of distinct primes dividing a value of this type
    const MAX_FACTORS: usize;

    /// Convert into the unsigned query domain
    fn to_query(self) -> Result<u64>;

    /// Convert a query result back, failing if it does not fit
    fn from_query(value: u64) -> Result<Self>;
}

/// Width of the bit index used by a sieve store
pub trait SieveIndex: Copy + Debug {
    /// Largest bit count addressable with this width
    const MAX_BITS: u64;

    fn from_bits(bits: u64) -> Option<Self>;
    fn to_usize(self) -> usize;
}

/// Facts the caller already knows about a number before testing it.
///
/// A base prime marked as "not dividing" is also known not to be equal to the number.
/// The hints are trusted: they skip the corresponding checks, and a false hint gives a
/// wrong answer (debug builds assert them).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Precondition {
    not_divisible: u8,
    not_equal: u8,
    not_one: bool,
}

const ALL_BASE: u8 = (1 << BASE_PRIMES.len()) - 1;

impl Precondition {
    /// Nothing is known about the number
    pub const NONE: Precondition = Precondition {
        not_divisible: 0,
        not_equal: 0,
        not_one: false,
    };

    /// The number is coprime to 2, 3, 5, 7, 11 and 13
    pub fn coprime() -> Self {
        Precondition {
            not_divisible: ALL_BASE,
            not_equal: ALL_BASE,
            not_one: false,
        }
    }

    /// The number is none of 2, 3, 5, 7, 11 and 13 (it may still be divisible by them)
    pub fn not_base_prime() -> Self {
        Precondition {
            not_equal: ALL_BASE,
            ..Self::NONE
        }
    }

    /// The number is neither divisible by nor equal to `p`, which must be a base prime
    pub fn not_divisible_by(mut self, p: u64) -> Self {
        let bit = base_bit(p);
        self.not_divisible |= bit;
        self.not_equal |= bit;
        self
    }

    /// The number is not equal to `p`, which must be a base prime
    pub fn not_equal_to(mut self, p: u64) -> Self {
        self.not_equal |= base_bit(p);
        self
    }

    /// The number is not 1
    pub fn not_one(mut self) -> Self {
        self.not_one = true;
        self
    }

    /// Decide primality from the base primes alone. Returns None if `n` is coprime to
    /// all of them and greater than 1, in which case a sieve or a wheel has to answer.
    pub(crate) fn resolve(&self, n: u64) -> Option<bool> {
        for (i, &p) in BASE_PRIMES.iter().enumerate() {
            let bit = 1u8 << i;
            if self.not_divisible & bit != 0 {
                debug_assert!(n % p != 0, "{} is divisible by {}", n, p);
                continue;
            }
            if n % p == 0 {
                debug_assert!(self.not_equal & bit == 0 || n != p, "{} equals {}", n, p);
                return Some(n == p && self.not_equal & bit == 0);
            }
        }
        if n < 2 {
            debug_assert!(!self.not_one || n != 1, "the number is 1");
            if !self.not_one {
                return Some(false);
            }
        }
        None
    }
}

fn base_bit(p: u64) -> u8 {
    match BASE_PRIMES.iter().position(|&b| b == p) {
        Some(i) => 1 << i,
        None => panic!("{} is not one of the wheel base primes", p),
    }
}

/// Controls how trial division chooses its candidate divisors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FactorizationConfig {
    /// The sieve is extended at most to this bound, candidates above it are produced
    /// by the wheel. `Some(0)` skips the sieve entirely, None never falls back to the wheel.
    pub sieve_limit: Option<u64>,
}

impl Default for FactorizationConfig {
    fn default() -> Self {
        FactorizationConfig { sieve_limit: None }
    }
}

impl FactorizationConfig {
    /// Configuration for pure wheel trial division, leaving the sieve untouched
    pub fn wheel() -> Self {
        FactorizationConfig {
            sieve_limit: Some(0),
        }
    }
}

/// Construction options of a [crate::WheelSieve]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SieveConfig {
    /// Requests to sieve beyond this bound fail with a resource exhaustion error
    pub max_bound: u64,

    /// Bound sieved right away at construction
    pub initial_bound: u64,
}

impl Default for SieveConfig {
    fn default() -> Self {
        SieveConfig {
            max_bound: EXTENDED_CEILING,
            initial_bound: 0,
        }
    }
}
