//! Sizes and bit masks of the M-20 machine word.
//!
//! A word carries 45 bits: mantissa in bits 1..36, a 7-bit exponent in
//! bits 37..43, the sign in bit 44 and the tag in bit 45. Bit 46 only ever
//! appears transiently, as the overflow of a cyclic sum. Everything is kept
//! in a `u64` and cut down with these masks.

/// Words of main memory.
pub const MEMSIZE: usize = 4096;

/// Words on the magnetic drum, over all four units.
pub const DRUM_SIZE: usize = 16384;

/// Mask for a 12-bit address.
pub const ADDR_MASK: u16 = 0o7777;

/// Bit 19, the scale factor of the square-root result mantissa.
pub const BIT19: u64 = 0o1000000;

/// Bit 37, the overflow of a 36-bit mantissa sum.
pub const BIT37: u64 = 0o1000000000000;

/// Bit 46, the overflow of a 45-bit cyclic sum.
pub const BIT46: u64 = 0o1000000000000000;

/// Bit 45, the tag. Not part of the numeric value.
pub const TAG: u64 = 0o400000000000000;

/// Bit 44, the sign.
pub const SIGN: u64 = 0o200000000000000;

/// Bits 45..1, a whole machine word.
pub const WORD: u64 = 0o777777777777777;

/// Bits 36..1, the mantissa.
pub const MANTISSA: u64 = 0o777777777777;

/// Bits 43..37, the exponent field.
pub const EXPONENT: u64 = 0o177000000000000;
