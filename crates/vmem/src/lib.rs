#![cfg_attr(not(test), no_std)]

//! # vmem
//!
//! A sparse virtual address space built from independently allocated, page-aligned
//! byte regions ("mappings"). It provides:
//!
//! - On-demand mapping creation with page alignment.
//! - Automatic coalescing of mappings that overlap or touch.
//! - Bounds-checked reads and writes over address ranges, including open-ended ranges.
//! - Scalar and C-string accessors honouring a fixed endianness.
//!
//! Only the regions that were actually mapped are backed by memory, which makes the
//! address space suitable for emulators, loaders and memory-image inspection.

extern crate alloc;

mod address;
mod address_space;
mod bytes;
mod endianness;
mod error;
mod human_address;
mod human_size;
mod mapping;

pub use address::{AddressRange, PAGE_SIZE, align_down, align_up};
pub use address_space::AddressSpace;
pub use bytes::Bytes;
pub use endianness::Endianness;
pub use error::{Result, VmemError};
pub use human_address::HumanAddress;
pub use human_size::HumanSize;
pub use mapping::Mapping;
