//! This crate provides prime queries backed by a segmented sieve of Eratosthenes on a
//! mod 30030 wheel, together with memoryless alternatives based on wheel trial division.
//!
//! The sieve only stores integers coprime to 2, 3, 5, 7, 11 and 13 (5760 of every 30030),
//! grows on demand and never shrinks.
//!
//! # Usage
//! ```
//! use wheel_sieve::WheelSieve;
//!
//! let mut sieve = WheelSieve::new();
//! assert_eq!(sieve.is_prime(1_000_003u64), Ok(true));
//! assert_eq!(sieve.count_primes_up_to(1000u32), Ok(168));
//!
//! let fac = sieve.factors(360u32).unwrap();
//! assert_eq!(fac.into_iter().collect::<Vec<_>>(), [(2, 3), (3, 2), (5, 1)]);
//! ```
//!
//! After [WheelSieve::ensure_coverage], the returned [Coverage] answers queries below its
//! bound without touching the sieve:
//! ```
//! use wheel_sieve::{Error, WheelSieve};
//!
//! let mut sieve = WheelSieve::new();
//! let covered = sieve.ensure_coverage(100_000u32).unwrap();
//! assert_eq!(covered.is_prime(99_991u32), Ok(true));
//! assert!(matches!(covered.is_prime(10_000_019u64), Err(Error::NotCovered { .. })));
//! ```
//!
//! Negative values of signed types are rejected with [Error::Negative].

mod buffer;
mod error;
mod factor;
mod integer;
mod store;
mod tables;
mod traits;

pub mod nt_funcs;

pub use buffer::{Coverage, WheelSieve};
pub use error::{Error, ErrorKind, Result};
pub use nt_funcs::{factors_wheel, is_prime_wheel, is_prime_wheel_with};
pub use traits::{FactorizationConfig, Precondition, SieveConfig, SieveIndex, SieveInt};

pub mod detail {
    pub use super::store::SieveStore;
    pub use super::tables::{
        wheel, WheelCursor, WheelTable, BASE_PRIMES, CYCLE, EXTENDED_CEILING, PRIMARY_CEILING,
        PRIMES_BELOW_PRIMARY_CEILING, WHEEL_SIZE,
    };
}
