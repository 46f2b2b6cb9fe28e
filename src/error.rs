use thiserror::Error;

/// Result type alias for fallible map construction.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported when building an [`IntMap`](crate::IntMap) or
/// [`IntSet`](crate::IntSet).
///
/// Every other operation on the collections is total: any `u64` is a valid
/// key, including `0`.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// The fill factor was outside the open interval `(0, 1)`.
    ///
    /// NaN is rejected as well.
    #[error("fill factor must be in (0, 1), got {0}")]
    InvalidConfiguration(f64),

    /// The requested size hint cannot be satisfied by a power-of-two bucket
    /// array addressable with `usize`.
    #[error("size hint {0} overflows the bucket array")]
    CapacityOverflow(usize),
}
