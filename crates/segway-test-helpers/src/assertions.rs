//! Assertion macros for fixed-point control tests.

/// Assert a value lies in an inclusive range.
///
/// # Example
///
/// ```rust
/// use segway_test_helpers::assert_in_range;
///
/// assert_in_range!(5, 0, 10);
/// ```
#[macro_export]
macro_rules! assert_in_range {
    ($value:expr, $min:expr, $max:expr) => {{
        let value = $value;
        let (min, max) = ($min, $max);
        assert!(
            value >= min && value <= max,
            "{} = {:?} outside [{:?}, {:?}]",
            stringify!($value),
            value,
            min,
            max
        );
    }};
}

/// Assert a value fits a signed register of the given width.
///
/// # Example
///
/// ```rust
/// use segway_test_helpers::assert_fits_signed;
///
/// assert_fits_signed!(2047, 12);
/// assert_fits_signed!(-2048, 12);
/// ```
#[macro_export]
macro_rules! assert_fits_signed {
    ($value:expr, $bits:expr) => {{
        let value = i64::from($value);
        let bits: u32 = $bits;
        let max = (1i64 << (bits - 1)) - 1;
        let min = -(1i64 << (bits - 1));
        assert!(
            value >= min && value <= max,
            "{} = {} does not fit a {}-bit signed register",
            stringify!($value),
            value,
            bits
        );
    }};
}

/// Assert a boolean stays at one level for every element of an iterator.
///
/// # Example
///
/// ```rust
/// use segway_test_helpers::assert_all;
///
/// assert_all!([false, false, false], false);
/// ```
#[macro_export]
macro_rules! assert_all {
    ($iter:expr, $level:expr) => {{
        for (index, value) in ::core::iter::IntoIterator::into_iter($iter).enumerate() {
            assert_eq!(value, $level, "element {} of {}", index, stringify!($iter));
        }
    }};
}
