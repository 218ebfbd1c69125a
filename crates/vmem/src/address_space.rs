//! Sparse address space management.
//!
//! An [`AddressSpace`] owns a set of disjoint, page-aligned [`Mapping`]s. Mappings are
//! created on demand with [`AddressSpace::add_mapping`]; a request that overlaps or
//! touches existing mappings coalesces them into a single larger mapping, carrying over
//! their contents.
//!
//! Accesses go through address ranges that must fall entirely inside exactly one
//! mapping:
//!
//! ```
//! use vmem::{AddressSpace, Endianness};
//!
//! let mut space = AddressSpace::new(Endianness::Little);
//! space.add_mapping(0x1000, 0x1001).unwrap();
//! space.write(0x1000.., b"AB\0CD").unwrap();
//!
//! assert_eq!(space.read_cstr(0x1000).unwrap(), b"AB");
//! assert_eq!(space.read_u16(0x1000).unwrap(), 0x4241);
//! assert!(space.read(0x1ffe..0x2002).is_err());
//! ```

use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;
use core::slice::Iter as SliceIter;

use crate::address::{align_down, align_up};
use crate::{
    AddressRange, Bytes, Endianness, HumanAddress, HumanSize, Mapping, PAGE_SIZE, Result,
    VmemError,
};

/// A sparse virtual address space made of page-aligned mappings.
///
/// No two mappings ever overlap or touch. Mappings are kept in creation order; a mapping
/// produced by coalescing counts as newly created.
#[derive(Debug, Clone, Default)]
pub struct AddressSpace {
    mappings: Vec<Mapping>,
    endianness: Endianness,
}

impl AddressSpace {
    /// Creates an empty address space whose scalar accessors use `endianness`.
    pub const fn new(endianness: Endianness) -> Self {
        Self {
            mappings: Vec::new(),
            endianness,
        }
    }

    /// Returns the byte order used by the scalar accessors.
    #[inline]
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Returns the number of mappings.
    #[inline]
    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    /// Returns true if nothing has been mapped yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Returns the total number of bytes backed by all mappings.
    pub fn mapped_size(&self) -> usize {
        self.mappings.iter().map(Mapping::len).sum()
    }

    /// Returns the mappings in creation order.
    pub fn mappings(&self) -> SliceIter<'_, Mapping> {
        self.mappings.iter()
    }

    /// Returns every mapped byte, concatenated in mapping creation order.
    ///
    /// Each call starts over from the current contents of the address space.
    pub fn bytes(&self) -> Bytes<'_> {
        Bytes::new(&self.mappings)
    }

    /// Ensures that `[start, end)` is backed by memory.
    ///
    /// The range is widened to page boundaries, and always covers at least one page.
    /// Existing mappings that overlap or touch the widened range are merged with it into
    /// a single zero-filled mapping that retains their previous contents.
    ///
    /// Returns the range of the mapping that now covers the request.
    ///
    /// # Errors
    ///
    /// Returns [`VmemError::InvalidArgument`] if the page-rounded end precedes the
    /// page-rounded start, or if rounding `end` up to a page boundary overflows. An `end`
    /// below `start` within the same page is accepted and maps that page.
    pub fn add_mapping(&mut self, start: usize, end: usize) -> Result<Range<usize>> {
        let real_start = align_down(start);
        let mut real_end = align_up(end).ok_or(VmemError::InvalidArgument(
            "mapping end overflows the address space",
        ))?;
        if real_end == real_start {
            real_end = real_end.checked_add(PAGE_SIZE).ok_or(VmemError::InvalidArgument(
                "mapping end overflows the address space",
            ))?;
        }
        if real_end < real_start {
            return Err(VmemError::InvalidArgument("mapping end precedes its start"));
        }

        let absorbed = self.intersecting_indices(real_start, real_end);

        if absorbed.is_empty() {
            log::trace!(
                "mapping {}-{} ({})",
                HumanAddress(real_start),
                HumanAddress(real_end),
                HumanSize(real_end - real_start)
            );
            self.mappings.push(Mapping::zeroed(real_start..real_end));
            return Ok(real_start..real_end);
        }

        let new_start = absorbed
            .iter()
            .map(|&idx| self.mappings[idx].start())
            .fold(real_start, usize::min);
        let new_end = absorbed
            .iter()
            .map(|&idx| self.mappings[idx].end())
            .fold(real_end, usize::max);

        let mut merged = Mapping::zeroed(new_start..new_end);
        for &idx in &absorbed {
            let old = &self.mappings[idx];
            // Lands at `old.start() - new_start` within the merged buffer.
            merged
                .slice_mut(old.start(), old.end())
                .copy_from_slice(old.as_bytes());
        }

        // Descending order keeps the remaining indices valid.
        for &idx in absorbed.iter().rev() {
            self.mappings.remove(idx);
        }

        log::trace!(
            "coalesced {} mapping(s) into {}-{} ({})",
            absorbed.len(),
            HumanAddress(new_start),
            HumanAddress(new_end),
            HumanSize(new_end - new_start)
        );

        self.mappings.push(merged);
        Ok(new_start..new_end)
    }

    /// Returns every mapping that intersects, contains, or is contained by
    /// `[addr_start, addr_end)`, in creation order.
    ///
    /// A mapping's end address is compared inclusively, so a mapping ending exactly at
    /// `addr_start` is reported as intersecting.
    ///
    /// # Errors
    ///
    /// Returns [`VmemError::InvalidArgument`] if `addr_end < addr_start`.
    pub fn mappings_intersecting(
        &self,
        addr_start: usize,
        addr_end: usize,
    ) -> Result<Vec<&Mapping>> {
        if addr_end < addr_start {
            return Err(VmemError::InvalidArgument(
                "range end must not precede range start",
            ));
        }
        Ok(self
            .mappings
            .iter()
            .filter(|m| m.intersects(addr_start, addr_end))
            .collect())
    }

    /// Returns the first mapping with `start <= addr <= end`.
    ///
    /// The end bound is inclusive: an address one past a mapping still finds it.
    pub fn mapping_containing(&self, addr: usize) -> Option<&Mapping> {
        self.mappings
            .iter()
            .find(|m| m.start() <= addr && addr <= m.end())
    }

    /// Overwrites the bytes of `range` with `data`.
    ///
    /// An open end is taken as `start + data.len()`, an open start as
    /// `end - data.len()`.
    ///
    /// # Errors
    ///
    /// - [`VmemError::OutOfRange`] if the range does not intersect exactly one mapping,
    ///   or is not fully contained in it.
    /// - [`VmemError::LengthMismatch`] if `data` is not exactly as long as the range.
    /// - [`VmemError::InvalidArgument`] if the range is inverted, unbounded, or
    ///   its inferred bound overflows.
    ///
    /// Nothing is written unless the whole write is valid.
    pub fn write(&mut self, range: impl Into<AddressRange>, data: &[u8]) -> Result<()> {
        let (start, end) = range.into().resolve(data.len())?;
        let idx = self.owning_mapping(start, end)?;

        if data.len() != end - start {
            return Err(VmemError::LengthMismatch {
                expected: end - start,
                actual: data.len(),
            });
        }

        let mapping = &mut self.mappings[idx];
        if !mapping.covers(start, end) {
            return Err(out_of_range(start, end));
        }

        mapping.slice_mut(start, end).copy_from_slice(data);
        Ok(())
    }

    /// Returns a copy of the bytes in `range`.
    ///
    /// The owning mapping is located using a one-byte probe at the specified bound. An
    /// open end then extends to the end of that mapping, and an open start extends back
    /// to its start, so `read(addr..)` returns everything from `addr` to the end of its
    /// mapping.
    ///
    /// # Errors
    ///
    /// - [`VmemError::OutOfRange`] if the range does not intersect exactly one mapping,
    ///   or is not fully contained in it.
    /// - [`VmemError::InvalidArgument`] if the range is inverted or unbounded.
    pub fn read(&self, range: impl Into<AddressRange>) -> Result<Vec<u8>> {
        self.mapped_slice(range.into()).map(<[u8]>::to_vec)
    }

    /// Reads the single byte at `addr`.
    pub fn read_byte(&self, addr: usize) -> Result<u8> {
        self.read_array::<1>(addr).map(|[byte]| byte)
    }

    /// Reads an unsigned byte at `addr`.
    pub fn read_u8(&self, addr: usize) -> Result<u8> {
        self.read_byte(addr)
    }

    /// Reads an unsigned 16-bit integer at `addr` using the configured byte order.
    pub fn read_u16(&self, addr: usize) -> Result<u16> {
        let bytes = self.read_array::<2>(addr)?;
        Ok(self.endianness.decode(&bytes) as u16)
    }

    /// Reads an unsigned 32-bit integer at `addr` using the configured byte order.
    pub fn read_u32(&self, addr: usize) -> Result<u32> {
        let bytes = self.read_array::<4>(addr)?;
        Ok(self.endianness.decode(&bytes) as u32)
    }

    /// Reads an unsigned 64-bit integer at `addr` using the configured byte order.
    pub fn read_u64(&self, addr: usize) -> Result<u64> {
        let bytes = self.read_array::<8>(addr)?;
        Ok(self.endianness.decode(&bytes))
    }

    /// Reads a zero-terminated string starting at `addr`.
    ///
    /// The terminator is not included. The search never leaves the mapping containing
    /// `addr`: an unterminated string yields every byte up to the end of the mapping.
    pub fn read_cstr(&self, addr: usize) -> Result<Vec<u8>> {
        let bytes = self.mapped_slice(AddressRange::from(addr..))?;
        let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(bytes[..len].to_vec())
    }

    /// Writes a byte at `addr`.
    pub fn write_u8(&mut self, addr: usize, value: u8) -> Result<()> {
        self.write(addr.., &[value])
    }

    /// Writes an unsigned 16-bit integer at `addr` using the configured byte order.
    pub fn write_u16(&mut self, addr: usize, value: u16) -> Result<()> {
        let bytes = self.endianness.encode::<2>(value.into());
        self.write(addr.., &bytes)
    }

    /// Writes an unsigned 32-bit integer at `addr` using the configured byte order.
    pub fn write_u32(&mut self, addr: usize, value: u32) -> Result<()> {
        let bytes = self.endianness.encode::<4>(value.into());
        self.write(addr.., &bytes)
    }

    /// Writes an unsigned 64-bit integer at `addr` using the configured byte order.
    pub fn write_u64(&mut self, addr: usize, value: u64) -> Result<()> {
        let bytes = self.endianness.encode::<8>(value);
        self.write(addr.., &bytes)
    }

    fn intersecting_indices(&self, start: usize, end: usize) -> Vec<usize> {
        self.mappings
            .iter()
            .enumerate()
            .filter(|(_, m)| m.intersects(start, end))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Finds the one mapping intersecting `[start, end)`.
    fn owning_mapping(&self, start: usize, end: usize) -> Result<usize> {
        if end < start {
            return Err(VmemError::InvalidArgument(
                "range end must not precede range start",
            ));
        }

        let mut found = None;
        for (idx, mapping) in self.mappings.iter().enumerate() {
            if !mapping.intersects(start, end) {
                continue;
            }
            if found.is_some() {
                log::debug!(
                    "{}..{} spans more than one mapping",
                    HumanAddress(start),
                    HumanAddress(end)
                );
                return Err(VmemError::OutOfRange { start, end });
            }
            found = Some(idx);
        }

        found.ok_or_else(|| {
            log::debug!("{}..{} is not mapped", HumanAddress(start), HumanAddress(end));
            VmemError::OutOfRange { start, end }
        })
    }

    fn mapped_slice(&self, range: AddressRange) -> Result<&[u8]> {
        let (start, end) = range.resolve(1)?;
        let mapping = &self.mappings[self.owning_mapping(start, end)?];
        if !mapping.covers(start, end) {
            return Err(out_of_range(start, end));
        }

        let start = if range.start().is_some() {
            start
        } else {
            mapping.start()
        };
        let end = if range.end().is_some() {
            end
        } else {
            mapping.end()
        };

        Ok(mapping.slice(start, end))
    }

    fn read_array<const N: usize>(&self, addr: usize) -> Result<[u8; N]> {
        let end = addr.checked_add(N).ok_or(VmemError::InvalidArgument(
            "range end overflows the address space",
        ))?;
        let mut out = [0u8; N];
        out.copy_from_slice(self.mapped_slice(AddressRange::from(addr..end))?);
        Ok(out)
    }
}

fn out_of_range(start: usize, end: usize) -> VmemError {
    log::debug!(
        "{}..{} crosses a mapping boundary",
        HumanAddress(start),
        HumanAddress(end)
    );
    VmemError::OutOfRange { start, end }
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, mapping) in self.mappings.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{:#x}-{:#x}", mapping.start(), mapping.end())?;
        }
        Ok(())
    }
}
