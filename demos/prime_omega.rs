use wheel_sieve::WheelSieve;

/// Calculate the (small) prime omega function ω(n) on the target
/// Reference: <https://en.wikipedia.org/wiki/Prime_omega_function>
fn prime_omega(sieve: &mut WheelSieve, target: u64) -> wheel_sieve::Result<usize> {
    Ok(sieve.factors(target)?.len())
}

/// Calculate the (big) prime omega function Ω(n) on the target
/// Reference: <https://en.wikipedia.org/wiki/Prime_omega_function>
#[allow(non_snake_case)]
fn prime_Omega(sieve: &mut WheelSieve, target: u64) -> wheel_sieve::Result<usize> {
    Ok(sieve.factors(target)?.into_values().sum())
}

fn main() -> wheel_sieve::Result<()> {
    let mut sieve = WheelSieve::new();
    println!("Prime omega of numbers from 10 to 99:");
    for i in 10..100 {
        println!(
            "{}: ω={}, Ω={}",
            i,
            prime_omega(&mut sieve, i)?,
            prime_Omega(&mut sieve, i)?
        );
    }
    Ok(())
}
