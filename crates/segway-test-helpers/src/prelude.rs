//! Convenience re-exports.

pub use crate::must::{must, must_err, must_some};
pub use crate::{assert_all, assert_fits_signed, assert_in_range};
