//! Count primes below increasing powers of ten, logging how the sieve grows.
//!
//! Run with `RUST_LOG=wheel_sieve=debug` to see every extension.

use tracing_subscriber::EnvFilter;
use wheel_sieve::{SieveConfig, WheelSieve};

fn main() -> wheel_sieve::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let limit: u64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1_000_000_000);
    let mut sieve = WheelSieve::with_config(SieveConfig {
        max_bound: limit,
        ..SieveConfig::default()
    })?;

    let mut n = 10u64;
    while n <= limit {
        println!("π({}) = {}", n, sieve.count_primes_up_to(n)?);
        n = match n.checked_mul(10) {
            Some(next) => next,
            None => break,
        };
    }

    let primes = sieve.first_primes::<u32>(10)?;
    println!("first primes: {:?}", primes);
    println!("sieved up to {}", sieve.bound());
    Ok(())
}
