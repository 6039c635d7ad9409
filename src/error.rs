use thiserror::Error;

/// Broad classification of an [Error]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The argument is outside the domain of the query
    InvalidInput,
    /// A covered query was asked about a number beyond the proven coverage
    PreconditionViolation,
    /// The sieve cannot grow to the requested bound
    ResourceExhaustion,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("cannot factor zero, every integer divides it")]
    FactorZero,

    #[error("negative input {0} is outside the unsigned domain")]
    Negative(i64),

    #[error("value {0} does not fit in the requested integer type")]
    OutOfRange(u64),

    #[error("the first {0} primes do not fit in the requested integer type")]
    TooManyPrimes(u64),

    #[error("{requested} is beyond the covered bound {covered}")]
    NotCovered { requested: u64, covered: u64 },

    #[error("sieving to {requested} exceeds the limit {limit}")]
    LimitExceeded { requested: u64, limit: u64 },

    #[error("failed to allocate {words} words to sieve up to {requested}")]
    AllocationFailed { requested: u64, words: u64 },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FactorZero
            | Error::Negative(_)
            | Error::OutOfRange(_)
            | Error::TooManyPrimes(_) => ErrorKind::InvalidInput,
            Error::NotCovered { .. } => ErrorKind::PreconditionViolation,
            Error::LimitExceeded { .. } | Error::AllocationFailed { .. } => {
                ErrorKind::ResourceExhaustion
            }
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
