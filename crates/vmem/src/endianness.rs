//! Byte order used by multi-byte scalar accessors.

use core::fmt;
use core::str::FromStr;

use crate::VmemError;

/// Byte order applied when decoding and encoding scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endianness {
    /// Least significant byte first.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

impl Endianness {
    /// Returns the name accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Little => "little",
            Self::Big => "big",
        }
    }

    /// Decodes an unsigned integer from up to eight bytes.
    pub(crate) fn decode(self, bytes: &[u8]) -> u64 {
        debug_assert!(bytes.len() <= 8);
        match self {
            Self::Little => bytes
                .iter()
                .rev()
                .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)),
            Self::Big => bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)),
        }
    }

    /// Encodes the low `N` bytes of `value`.
    pub(crate) fn encode<const N: usize>(self, value: u64) -> [u8; N] {
        let mut out = [0u8; N];
        match self {
            Self::Little => out.copy_from_slice(&value.to_le_bytes()[..N]),
            Self::Big => out.copy_from_slice(&value.to_be_bytes()[8 - N..]),
        }
        out
    }
}

impl FromStr for Endianness {
    type Err = VmemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "little" => Ok(Self::Little),
            "big" => Ok(Self::Big),
            _ => Err(VmemError::InvalidArgument(
                "endianness can only be 'big' or 'little'",
            )),
        }
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
