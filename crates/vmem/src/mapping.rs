//! A single page-aligned region of backed memory.

use alloc::boxed::Box;
use alloc::vec;
use core::fmt;
use core::ops::Range;

use crate::{HumanAddress, HumanSize};

/// A contiguous, page-aligned byte buffer covering `[start, end)`.
///
/// Mappings are created and owned by an [`AddressSpace`](crate::AddressSpace); callers
/// only ever see shared references to them.
#[derive(Clone, PartialEq, Eq)]
pub struct Mapping {
    start: usize,
    data: Box<[u8]>,
}

impl Mapping {
    /// Creates a zero-filled mapping covering `range`.
    pub(crate) fn zeroed(range: Range<usize>) -> Self {
        debug_assert!(range.start < range.end);
        Self {
            start: range.start,
            data: vec![0u8; range.end - range.start].into_boxed_slice(),
        }
    }

    /// Returns the first address of this mapping.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns one past the last address of this mapping.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.data.len()
    }

    /// Returns the number of bytes backed by this mapping.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the mapping has no bytes; never the case for mappings built by an
    /// [`AddressSpace`](crate::AddressSpace).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the address range covered by this mapping.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Returns the contents of this mapping.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns true if `addr` lies within `[start, end)`.
    #[inline]
    pub fn contains(&self, addr: usize) -> bool {
        addr >= self.start && addr < self.end()
    }

    /// Returns true if `[start, end)` lies entirely within this mapping.
    #[inline]
    pub(crate) fn covers(&self, start: usize, end: usize) -> bool {
        self.start <= start && end <= self.end()
    }

    /// Tests whether this mapping matches a range query.
    ///
    /// The mapping's end is treated as inclusive, so a query starting exactly at `end()`
    /// still matches. Coalescing relies on this to merge adjacent mappings.
    pub(crate) fn intersects(&self, start: usize, end: usize) -> bool {
        let (map_start, map_end) = (self.start, self.end());
        (map_start <= start && start <= map_end)
            || (map_start <= end && end <= map_end)
            || (start <= map_start && end >= map_end)
    }

    pub(crate) fn slice(&self, start: usize, end: usize) -> &[u8] {
        &self.data[start - self.start..end - self.start]
    }

    pub(crate) fn slice_mut(&mut self, start: usize, end: usize) -> &mut [u8] {
        &mut self.data[start - self.start..end - self.start]
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapping")
            .field("start", &HumanAddress(self.start))
            .field("end", &HumanAddress(self.end()))
            .field("size", &HumanSize(self.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PAGE_SIZE;

    #[test]
    fn zeroed_covers_range() {
        let mapping = Mapping::zeroed(0x1000..0x3000);
        assert_eq!(mapping.start(), 0x1000);
        assert_eq!(mapping.end(), 0x3000);
        assert_eq!(mapping.len(), 2 * PAGE_SIZE);
        assert_eq!(mapping.range(), 0x1000..0x3000);
        assert!(!mapping.is_empty());
        assert!(mapping.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn contains_is_half_open() {
        let mapping = Mapping::zeroed(0x1000..0x2000);
        assert!(!mapping.contains(0xfff));
        assert!(mapping.contains(0x1000));
        assert!(mapping.contains(0x1fff));
        assert!(!mapping.contains(0x2000));
    }

    #[test]
    fn covers_requires_full_containment() {
        let mapping = Mapping::zeroed(0x1000..0x2000);
        assert!(mapping.covers(0x1000, 0x2000));
        assert!(mapping.covers(0x1800, 0x1800));
        assert!(!mapping.covers(0xfff, 0x1001));
        assert!(!mapping.covers(0x1fff, 0x2001));
    }

    #[test]
    fn intersects_touching_end() {
        let mapping = Mapping::zeroed(0x1000..0x2000);
        assert!(mapping.intersects(0x2000, 0x3000));
        assert!(mapping.intersects(0x0, 0x1000));
        assert!(!mapping.intersects(0x2001, 0x3000));
        assert!(!mapping.intersects(0x0, 0xfff));
    }

    #[test]
    fn intersects_enclosing_range() {
        let mapping = Mapping::zeroed(0x2000..0x3000);
        assert!(mapping.intersects(0x1000, 0x4000));
        assert!(mapping.intersects(0x2400, 0x2800));
    }

    #[test]
    fn slices_translate_addresses() {
        let mut mapping = Mapping::zeroed(0x1000..0x2000);
        mapping.slice_mut(0x1010, 0x1013).copy_from_slice(&[1, 2, 3]);
        assert_eq!(mapping.slice(0x100f, 0x1014), &[0, 1, 2, 3, 0]);
        assert_eq!(mapping.as_bytes()[0x10], 1);
    }

    #[test]
    fn debug_format() {
        let mapping = Mapping::zeroed(0x1_0000..0x1_1000);
        let debug_str = format!("{:?}", mapping);
        assert!(debug_str.contains("0x1_0000"));
        assert!(debug_str.contains("0x1_1000"));
        assert!(debug_str.contains("4KiB"));
    }
}
