//! Page alignment helpers and address ranges with optional bounds.

use core::fmt;
use core::ops::{Range, RangeFrom, RangeTo};

use crate::{Result, VmemError};

/// Page size in bytes. Every mapping starts and ends on a multiple of this value.
pub const PAGE_SIZE: usize = 0x1000;

const PAGE_MASK: usize = PAGE_SIZE - 1;

/// Rounds `addr` down to the nearest page boundary.
#[inline]
pub const fn align_down(addr: usize) -> usize {
    addr & !PAGE_MASK
}

/// Rounds `addr` up to the nearest page boundary.
///
/// Returns `None` if the rounded address does not fit in a `usize`.
#[inline]
pub const fn align_up(addr: usize) -> Option<usize> {
    if addr & PAGE_MASK == 0 {
        Some(addr)
    } else {
        align_down(addr).checked_add(PAGE_SIZE)
    }
}

/// An address range whose start and end may each be left open.
///
/// Ranges are half-open: `start` is the first byte and `end` is one past the last byte.
/// How an open bound is filled in depends on the operation; see
/// [`AddressSpace::read`](crate::AddressSpace::read) and
/// [`AddressSpace::write`](crate::AddressSpace::write).
///
/// Ranges are usually built from Rust range syntax:
///
/// ```
/// use vmem::AddressRange;
///
/// assert_eq!(AddressRange::from(0x1000..0x1010), AddressRange::new(Some(0x1000), Some(0x1010)));
/// assert_eq!(AddressRange::from(0x1000..), AddressRange::new(Some(0x1000), None));
/// assert_eq!(AddressRange::from(..0x2000), AddressRange::new(None, Some(0x2000)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AddressRange {
    start: Option<usize>,
    end: Option<usize>,
}

impl AddressRange {
    /// Creates a range from optional bounds.
    ///
    /// A range with neither bound can be constructed, but every access using it fails
    /// with [`VmemError::InvalidArgument`].
    #[inline]
    pub const fn new(start: Option<usize>, end: Option<usize>) -> Self {
        Self { start, end }
    }

    /// Returns the start bound, if specified.
    #[inline]
    pub const fn start(&self) -> Option<usize> {
        self.start
    }

    /// Returns the end bound, if specified.
    #[inline]
    pub const fn end(&self) -> Option<usize> {
        self.end
    }

    /// Fills in an open bound so that the range spans `len` bytes.
    ///
    /// A fully bounded range is returned as-is, regardless of `len`.
    pub(crate) fn resolve(self, len: usize) -> Result<(usize, usize)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Ok((start, end)),
            (Some(start), None) => start
                .checked_add(len)
                .map(|end| (start, end))
                .ok_or(VmemError::InvalidArgument("range end overflows the address space")),
            (None, Some(end)) => end
                .checked_sub(len)
                .map(|start| (start, end))
                .ok_or(VmemError::InvalidArgument("range start would be negative")),
            (None, None) => Err(VmemError::InvalidArgument("range has neither start nor end")),
        }
    }
}

impl From<Range<usize>> for AddressRange {
    #[inline]
    fn from(range: Range<usize>) -> Self {
        Self::new(Some(range.start), Some(range.end))
    }
}

impl From<RangeFrom<usize>> for AddressRange {
    #[inline]
    fn from(range: RangeFrom<usize>) -> Self {
        Self::new(Some(range.start), None)
    }
}

impl From<RangeTo<usize>> for AddressRange {
    #[inline]
    fn from(range: RangeTo<usize>) -> Self {
        Self::new(None, Some(range.end))
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{:#x}", start)?;
        }
        write!(f, "..")?;
        if let Some(end) = self.end {
            write!(f, "{:#x}", end)?;
        }
        Ok(())
    }
}
