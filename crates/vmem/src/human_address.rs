//! Human-readable address formatting.

use core::fmt;

/// Formats an address as uppercase hexadecimal with a `0x` prefix and a `_` separator
/// between every group of four digits.
///
/// # Examples
///
/// ```
/// use vmem::HumanAddress;
///
/// assert_eq!(format!("{}", HumanAddress(0x0)), "0x0");
/// assert_eq!(format!("{}", HumanAddress(0x1000)), "0x1000");
/// assert_eq!(format!("{}", HumanAddress(0x7FFF_F000)), "0x7FFF_F000");
/// assert_eq!(format!("{}", HumanAddress(0x1_0000)), "0x1_0000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct HumanAddress(pub usize);

impl From<usize> for HumanAddress {
    #[inline]
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl fmt::Display for HumanAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;

        let significant_bits = usize::BITS - self.0.leading_zeros();
        let digits = significant_bits.div_ceil(4).max(1) as usize;

        for index in (0..digits).rev() {
            let nibble = (self.0 >> (index * 4)) & 0xF;
            write!(f, "{:X}", nibble)?;
            if index != 0 && index % 4 == 0 {
                f.write_str("_")?;
            }
        }

        Ok(())
    }
}
