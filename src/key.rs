//! Hash codes for [`HashIndex`](crate::HashIndex) keys.
//!
//! Hash codes are 32-bit signed integers. Numeric keys hash to their own
//! value; strings use the `h * 31 + c` polynomial over UTF-16 code units,
//! wrapping at every step.

/// A key that can be placed in a [`HashIndex`](crate::HashIndex).
///
/// Equal keys must produce equal hash codes. A type that breaks this is a
/// caller contract violation: lookups may miss, but nothing unsafe happens.
pub trait IndexKey: Eq {
    fn hash_code(&self) -> i32;
}

macro_rules! impl_numeric_key {
    ($($t:ty),* $(,)?) => {
        $(
            impl IndexKey for $t {
                /// The key's own value, truncated to 32 bits.
                #[inline]
                fn hash_code(&self) -> i32 {
                    *self as i32
                }
            }
        )*
    };
}

impl_numeric_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl IndexKey for str {
    #[inline]
    fn hash_code(&self) -> i32 {
        string_hash(self)
    }
}

impl IndexKey for String {
    #[inline]
    fn hash_code(&self) -> i32 {
        string_hash(self)
    }
}

impl<T: IndexKey + ?Sized> IndexKey for &T {
    #[inline]
    fn hash_code(&self) -> i32 {
        (**self).hash_code()
    }
}

/// Polynomial string hash with 32-bit wraparound.
pub fn string_hash(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |hash, unit| {
        // (hash << 5) - hash == hash * 31
        (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit))
    })
}

/// Bucket for `hash` in a table of `capacity` buckets.
///
/// Uses the unsigned magnitude, so `i32::MIN` maps to `2^31 % capacity`
/// instead of staying negative.
#[inline]
pub fn bucket_index(hash: i32, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    hash.unsigned_abs() as usize % capacity
}
