//! Error types for kvtable

use std::collections::TryReserveError;
use std::fmt;

/// Result type alias for table and cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for table and cache operations
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Capacity must be at least 1
    InvalidCapacity(usize),

    /// Load-factor threshold outside (0, 1)
    InvalidLoadFactor(f64),

    /// Doubling the capacity would overflow `usize`
    CapacityOverflow,

    /// Backing storage could not grow
    Alloc(TryReserveError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCapacity(cap) => {
                write!(f, "Invalid capacity: {} (must be greater than 0)", cap)
            }
            Error::InvalidLoadFactor(lf) => {
                write!(f, "Invalid load factor threshold: {} (must be in (0, 1))", lf)
            }
            Error::CapacityOverflow => write!(f, "Capacity overflow while growing table"),
            Error::Alloc(e) => write!(f, "Allocation failed: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Alloc(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TryReserveError> for Error {
    fn from(err: TryReserveError) -> Self {
        Error::Alloc(err)
    }
}
