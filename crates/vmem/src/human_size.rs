//! Human-readable byte counts.

use core::fmt;

/// Formats a byte count with binary prefixes (KiB, MiB, ...).
///
/// Values are truncated to at most two decimal places and trailing zeros are omitted.
///
/// # Examples
///
/// ```
/// use vmem::HumanSize;
///
/// assert_eq!(format!("{}", HumanSize(0)), "0B");
/// assert_eq!(format!("{}", HumanSize(4096)), "4KiB");
/// assert_eq!(format!("{}", HumanSize(6144)), "6KiB");
/// assert_eq!(format!("{}", HumanSize(1536)), "1.5KiB");
/// assert_eq!(format!("{}", HumanSize(0x30_0000)), "3MiB");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct HumanSize(pub usize);

impl From<usize> for HumanSize {
    #[inline]
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl fmt::Display for HumanSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

        let bytes = self.0 as u128;
        let mut unit = 0;
        while unit + 1 < UNITS.len() && bytes >= 1u128 << (10 * (unit + 1)) {
            unit += 1;
        }

        // Hundredths of the chosen unit.
        let scaled = bytes * 100 >> (10 * unit);
        let (whole, frac) = (scaled / 100, scaled % 100);

        if frac == 0 {
            write!(f, "{}{}", whole, UNITS[unit])
        } else if frac % 10 == 0 {
            write!(f, "{}.{}{}", whole, frac / 10, UNITS[unit])
        } else {
            write!(f, "{}.{:02}{}", whole, frac, UNITS[unit])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_bytes() {
        assert_eq!(format!("{}", HumanSize(0)), "0B");
        assert_eq!(format!("{}", HumanSize(1)), "1B");
        assert_eq!(format!("{}", HumanSize(1023)), "1023B");
    }

    #[test]
    fn formats_pages() {
        assert_eq!(format!("{}", HumanSize(0x1000)), "4KiB");
        assert_eq!(format!("{}", HumanSize(0x3000)), "12KiB");
        assert_eq!(format!("{}", HumanSize(0x10_0000)), "1MiB");
    }

    #[test]
    fn formats_fractions() {
        assert_eq!(format!("{}", HumanSize(1536)), "1.5KiB");
        assert_eq!(format!("{}", HumanSize(1280)), "1.25KiB");
        assert_eq!(format!("{}", HumanSize(0x18_0000)), "1.5MiB");
    }

    #[test]
    fn truncates_small_remainders() {
        assert_eq!(format!("{}", HumanSize(1025)), "1KiB");
        assert_eq!(format!("{}", HumanSize(1045)), "1.02KiB");
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn formats_large_sizes() {
        assert_eq!(format!("{}", HumanSize(1 << 30)), "1GiB");
        assert_eq!(format!("{}", HumanSize(1 << 40)), "1TiB");
        assert_eq!(format!("{}", HumanSize(usize::MAX)), "15.99EiB");
    }
}
