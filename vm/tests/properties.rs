use std::collections::HashMap;

use proptest::prelude::*;
use vm::{Cell, Mmu, MmuConfig, ReplacementPolicy};

#[derive(Debug, Clone)]
enum Op {
    Write(usize, Cell),
    Read(usize),
}

fn policy() -> impl Strategy<Value = ReplacementPolicy> {
    prop_oneof![Just(ReplacementPolicy::Lru), Just(ReplacementPolicy::Fifo)]
}

fn op(len: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..len, any::<Cell>()).prop_map(|(address, value)| Op::Write(address, value)),
        (0..len).prop_map(Op::Read),
    ]
}

proptest! {
    #[test]
    fn reads_see_the_last_write(
        policy in policy(),
        num_frames in 1usize..4,
        ops in prop::collection::vec(op(6 * 3), 1..200),
    ) {
        let mut mmu = Mmu::new(MmuConfig::new(6, num_frames, 3, policy)).unwrap();
        let mut shadow: HashMap<usize, Cell> = HashMap::new();

        for op in ops {
            match op {
                Op::Write(address, value) => {
                    mmu.write(address, value).unwrap();
                    shadow.insert(address, value);
                }
                Op::Read(address) => {
                    let expected = shadow.get(&address).copied().unwrap_or(0);
                    prop_assert_eq!(mmu.read(address).unwrap(), expected);
                }
            }
        }
    }

    #[test]
    fn faults_grow_by_one_per_miss(
        policy in policy(),
        addresses in prop::collection::vec(0usize..40, 1..150),
    ) {
        let mut mmu = Mmu::new(MmuConfig::new(10, 3, 4, policy)).unwrap();

        for address in addresses {
            let page = address / 4;
            let was_resident = mmu.page_table().lookup(page).is_some();
            let before = mmu.fault_count();

            mmu.read(address).unwrap();

            let expected = if was_resident { before } else { before + 1 };
            prop_assert_eq!(mmu.fault_count(), expected);
            prop_assert_eq!(mmu.fault_order().len(), mmu.fault_count());
            if !was_resident {
                prop_assert_eq!(mmu.fault_order().last().copied(), Some(page));
            }
        }
    }

    #[test]
    fn no_frame_backs_two_pages(
        policy in policy(),
        addresses in prop::collection::vec(0usize..16, 1..100),
    ) {
        let mut mmu = Mmu::new(MmuConfig::new(8, 3, 2, policy)).unwrap();

        for address in addresses {
            mmu.write(address, 1).unwrap();

            let resident = mmu.resident_pages();
            let mut frames: Vec<usize> = resident.iter().map(|&(_, frame)| frame).collect();
            frames.sort_unstable();
            frames.dedup();
            prop_assert_eq!(frames.len(), resident.len());
            prop_assert!(resident.len() <= 3);
        }
    }
}
