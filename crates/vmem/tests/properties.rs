use proptest::prelude::*;
use vmem::{AddressSpace, Endianness, PAGE_SIZE, VmemError};

const SPAN: usize = 0x40_000;

fn mapping_request() -> impl Strategy<Value = (usize, usize)> {
    (0..SPAN, 0..0x6000usize).prop_map(|(start, len)| (start, start + len))
}

fn assert_disjoint(space: &AddressSpace) {
    let mut ranges: Vec<_> = space.mappings().map(|m| m.range()).collect();
    ranges.sort_by_key(|r| r.start);
    for pair in ranges.windows(2) {
        assert!(
            pair[0].end < pair[1].start,
            "mappings {:#x?} and {:#x?} overlap or touch",
            pair[0],
            pair[1]
        );
    }
}

proptest! {
    #[test]
    fn mappings_are_page_aligned_and_cover_requests(
        requests in prop::collection::vec(mapping_request(), 1..12)
    ) {
        let mut space = AddressSpace::default();
        for &(start, end) in &requests {
            let covering = space.add_mapping(start, end).unwrap();
            prop_assert!(covering.start <= start);
            prop_assert!(covering.end >= end);
            prop_assert!(covering.end > covering.start);
        }

        for mapping in space.mappings() {
            prop_assert_eq!(mapping.start() % PAGE_SIZE, 0);
            prop_assert_eq!(mapping.end() % PAGE_SIZE, 0);
        }
        for &(start, end) in &requests {
            let last = end.max(start + 1) - 1;
            let owner = space.mappings().find(|m| m.contains(start)).unwrap();
            prop_assert!(owner.contains(last));
        }
    }

    #[test]
    fn mappings_stay_disjoint(
        requests in prop::collection::vec(mapping_request(), 1..16)
    ) {
        let mut space = AddressSpace::default();
        for (start, end) in requests {
            space.add_mapping(start, end).unwrap();
            assert_disjoint(&space);
        }
    }

    #[test]
    fn coalescing_preserves_written_bytes(
        pages in prop::collection::btree_set(0..64usize, 3..10),
        bridge_start in 0..SPAN,
        bridge_len in 0..SPAN,
    ) {
        let mut space = AddressSpace::default();
        let mut written = Vec::new();
        for &page in &pages {
            // Leave a gap so each page starts as its own mapping.
            let base = page * 2 * PAGE_SIZE;
            space.add_mapping(base, base + 1).unwrap();
            let addr = base + (page * 37) % PAGE_SIZE;
            let value = (page as u8).wrapping_mul(13) | 1;
            space.write_u8(addr, value).unwrap();
            written.push((addr, value));
        }

        space.add_mapping(bridge_start, bridge_start + bridge_len).unwrap();
        assert_disjoint(&space);

        for (addr, value) in written {
            prop_assert_eq!(space.read_u8(addr), Ok(value));
        }
    }

    #[test]
    fn bridging_many_mappings_keeps_contents(
        count in 3..8usize,
        fill in any::<u8>(),
    ) {
        let mut space = AddressSpace::default();
        for idx in 0..count {
            let base = (idx * 3 + 1) * PAGE_SIZE;
            space.add_mapping(base, base + PAGE_SIZE).unwrap();
            space.write(base.., &vec![fill ^ idx as u8; PAGE_SIZE]).unwrap();
        }

        let covering = space.add_mapping(0, (count * 3 + 1) * PAGE_SIZE).unwrap();
        prop_assert_eq!(covering, 0..(count * 3 + 1) * PAGE_SIZE);
        prop_assert_eq!(space.mapping_count(), 1);

        for idx in 0..count {
            let base = (idx * 3 + 1) * PAGE_SIZE;
            let contents = space.read(base..base + PAGE_SIZE).unwrap();
            prop_assert!(contents.iter().all(|&b| b == fill ^ idx as u8));
            prop_assert_eq!(space.read_u8(base + PAGE_SIZE), Ok(0));
        }
    }

    #[test]
    fn write_then_read_round_trips(
        start in 0..SPAN,
        data in prop::collection::vec(any::<u8>(), 0..0x3000),
    ) {
        let mut space = AddressSpace::new(Endianness::Big);
        let end = start + data.len();
        space.add_mapping(start, end).unwrap();
        space.write(start..end, &data).unwrap();
        prop_assert_eq!(space.read(start..end).unwrap(), data);
    }

    #[test]
    fn accesses_outside_a_mapping_are_rejected(
        page in 1..32usize,
        offset in 1..0x100usize,
        len in 1..0x100usize,
    ) {
        let mut space = AddressSpace::default();
        let start = page * PAGE_SIZE;
        space.add_mapping(start, start + PAGE_SIZE).unwrap();
        let end = start + PAGE_SIZE;

        let crossing_end = (end - offset)..(end - offset + offset + len);
        let unmapped = (end + offset)..(end + offset + len);
        prop_assert!(matches!(
            space.read(crossing_end.clone()),
            Err(VmemError::OutOfRange { .. })
        ), "expected OutOfRange");
        prop_assert!(matches!(space.read(unmapped.clone()), Err(VmemError::OutOfRange { .. })), "expected OutOfRange");

        let data = vec![0xff; crossing_end.len()];
        prop_assert!(matches!(
            space.write(crossing_end, &data),
            Err(VmemError::OutOfRange { .. })
        ), "expected OutOfRange");
        prop_assert!(space.bytes().all(|b| b == 0));
    }
}
