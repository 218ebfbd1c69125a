//! Byte-wise iteration over every mapping of an address space.

use core::iter::FusedIterator;
use core::slice::Iter as SliceIter;

use crate::Mapping;

/// Iterator over the contents of every mapping, concatenated in creation order.
///
/// Adjacent bytes yielded by this iterator are not necessarily adjacent in the address
/// space. Sort [`AddressSpace::mappings`](crate::AddressSpace::mappings) by start
/// address when address order matters.
#[derive(Clone, Debug)]
pub struct Bytes<'a> {
    mappings: SliceIter<'a, Mapping>,
    current: SliceIter<'a, u8>,
    remaining: usize,
}

impl<'a> Bytes<'a> {
    pub(crate) fn new(mappings: &'a [Mapping]) -> Self {
        Self {
            mappings: mappings.iter(),
            current: (&[]).iter(),
            remaining: mappings.iter().map(Mapping::len).sum(),
        }
    }
}

impl Iterator for Bytes<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        loop {
            if let Some(&byte) = self.current.next() {
                self.remaining -= 1;
                return Some(byte);
            }
            self.current = self.mappings.next()?.as_bytes().iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Bytes<'_> {}

impl FusedIterator for Bytes<'_> {}
