use crate::error::Error;

/// Result type alias used throughout orka.
///
/// This is a type alias for `std::result::Result<T, Error>`, providing a
/// convenient shorthand for functions that return orka errors.
pub type Result<T> = std::result::Result<T, Error>;
