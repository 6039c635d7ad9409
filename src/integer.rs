//! Backend implementations for primitive integers

use crate::error::{Error, Result};
use crate::traits::{SieveIndex, SieveInt};
use num_traits::{FromPrimitive, ToPrimitive};

macro_rules! impl_sieveint_prim {
    ($($T:ty => $F:expr),*) => {$(
        impl SieveInt for $T {
            const MAX_FACTORS: usize = $F;

            #[inline]
            fn to_query(self) -> Result<u64> {
                match ToPrimitive::to_u64(&self) {
                    Some(v) => Ok(v),
                    None => Err(Error::Negative(self.to_i64().unwrap_or(i64::MIN))),
                }
            }

            #[inline]
            fn from_query(value: u64) -> Result<Self> {
                <$T as FromPrimitive>::from_u64(value).ok_or(Error::OutOfRange(value))
            }
        }
    )*}
}

// the bounds are the longest prefixes of 2, 3, 5, 7, ... whose product fits the type
impl_sieveint_prim!(u16 => 6, u32 => 9, u64 => 15, i32 => 9, i64 => 15);

macro_rules! impl_sieveindex_prim {
    ($($T:ty => $M:expr),*) => {$(
        impl SieveIndex for $T {
            const MAX_BITS: u64 = $M;

            #[inline]
            fn from_bits(bits: u64) -> Option<Self> {
                <$T>::try_from(bits).ok()
            }

            #[inline]
            fn to_usize(self) -> usize {
                self as usize
            }
        }
    )*}
}
impl_sieveindex_prim!(u32 => u32::MAX as u64, u64 => isize::MAX as u64);
