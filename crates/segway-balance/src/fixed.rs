//! Two's-complement register arithmetic.
//!
//! The balance loop is defined in terms of signed register widths (10-bit
//! pitch error, 18-bit integrator, 12-bit control output) rather than Rust
//! integer types. These helpers reproduce an N-bit signed register held in an
//! `i32`: saturation, wrap-around and the sign-based overflow test used by
//! the PID integrator.
//!
//! All functions are `const` and branch-light so they can be used in the
//! per-tick path.

/// Largest value held by a signed register of `bits` width (`2..=32`).
#[inline]
#[must_use]
pub const fn signed_max(bits: u32) -> i32 {
    ((1i64 << (bits - 1)) - 1) as i32
}

/// Smallest value held by a signed register of `bits` width (`2..=32`).
#[inline]
#[must_use]
pub const fn signed_min(bits: u32) -> i32 {
    (-(1i64 << (bits - 1))) as i32
}

/// Clamp `value` into the range of a signed `bits`-wide register.
///
/// # Examples
///
/// ```
/// use segway_balance::fixed::saturate;
///
/// assert_eq!(saturate(700, 10), 511);
/// assert_eq!(saturate(-700, 10), -512);
/// assert_eq!(saturate(-12, 10), -12);
/// ```
#[inline]
#[must_use]
pub const fn saturate(value: i32, bits: u32) -> i32 {
    let max = signed_max(bits);
    let min = signed_min(bits);
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// Same as [`saturate`] for an `i64` intermediate (products, wide sums).
#[inline]
#[must_use]
pub const fn saturate_wide(value: i64, bits: u32) -> i32 {
    let max = signed_max(bits) as i64;
    let min = signed_min(bits) as i64;
    if value > max {
        max as i32
    } else if value < min {
        min as i32
    } else {
        value as i32
    }
}

/// Reinterpret the low `bits` of `value` as a signed register (wrap-around).
///
/// # Examples
///
/// ```
/// use segway_balance::fixed::wrap;
///
/// // 18-bit register: max + 1 wraps to min
/// assert_eq!(wrap(131_072, 18), -131_072);
/// assert_eq!(wrap(-5, 18), -5);
/// ```
#[inline]
#[must_use]
pub const fn wrap(value: i64, bits: u32) -> i32 {
    let unused = 64 - bits;
    ((value << unused) >> unused) as i32
}

/// Add `addend` to a `bits`-wide accumulator, or return `None` if the
/// register would overflow.
///
/// Overflow is detected the way adder hardware does it: both operands share
/// a sign and the wrapped sum has the opposite sign.
///
/// # Examples
///
/// ```
/// use segway_balance::fixed::{checked_accumulate, signed_max};
///
/// assert_eq!(checked_accumulate(100, -40, 18), Some(60));
/// assert_eq!(checked_accumulate(signed_max(18), 1, 18), None);
/// ```
#[inline]
#[must_use]
pub const fn checked_accumulate(acc: i32, addend: i32, bits: u32) -> Option<i32> {
    let sum = wrap(acc as i64 + addend as i64, bits);
    let acc_neg = acc < 0;
    let overflowed = acc_neg == (addend < 0) && (sum < 0) != acc_neg;
    if overflowed { None } else { Some(sum) }
}

/// Saturate into `i16`.
#[inline]
#[must_use]
pub const fn saturate_i16(value: i32) -> i16 {
    saturate(value, 16) as i16
}
