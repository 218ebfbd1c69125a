//! Errors raised by address space operations.

use thiserror::Error;

/// Errors that can occur while managing or accessing an address space.
///
/// Every variant is a validation failure: the operation that produced it has left the
/// address space untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VmemError {
    /// An argument was malformed (bad endianness name, inverted or unbounded range,
    /// address arithmetic overflow).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The range is unmapped, spans more than one mapping, or is not fully contained
    /// in its mapping.
    #[error("address range {start:#x}..{end:#x} is out of range")]
    OutOfRange { start: usize, end: usize },
    /// The data supplied to a write does not match the length of the target range.
    #[error("data length {actual} does not match range length {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Result type used throughout the crate.
pub type Result<T> = core::result::Result<T, VmemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_argument() {
        let err = VmemError::InvalidArgument("end precedes start");
        assert_eq!(err.to_string(), "invalid argument: end precedes start");
    }

    #[test]
    fn display_out_of_range() {
        let err = VmemError::OutOfRange {
            start: 0x1000,
            end: 0x2001,
        };
        assert_eq!(err.to_string(), "address range 0x1000..0x2001 is out of range");
    }

    #[test]
    fn display_length_mismatch() {
        let err = VmemError::LengthMismatch {
            expected: 4,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "data length 2 does not match range length 4"
        );
    }
}
