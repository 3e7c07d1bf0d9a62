use vm::{Cell, Mmu, MmuConfig, ReplacementPolicy};

fn mmu(num_pages: usize, num_frames: usize, page_size: usize, policy: ReplacementPolicy) -> Mmu {
    Mmu::new(MmuConfig::new(num_pages, num_frames, page_size, policy)).unwrap()
}

/// write(0), write(1), read(0), write(2) over two single-cell frames.
fn divergence_run(policy: ReplacementPolicy) -> Mmu {
    let mut mmu = mmu(3, 2, 1, policy);

    mmu.write(0, 10).unwrap();
    mmu.write(1, 11).unwrap();
    assert_eq!(mmu.read(0).unwrap(), 10);
    assert_eq!(mmu.fault_count(), 2);

    mmu.write(2, 12).unwrap();
    assert_eq!(mmu.fault_order(), &[0, 1, 2]);

    mmu
}

#[test]
fn fifo_evicts_first_loaded_page_despite_recent_read() {
    let mmu = divergence_run(ReplacementPolicy::Fifo);
    assert_eq!(mmu.resident_pages(), vec![(1, 1), (2, 0)]);
}

#[test]
fn lru_evicts_least_recently_used_page() {
    let mmu = divergence_run(ReplacementPolicy::Lru);
    assert_eq!(mmu.resident_pages(), vec![(0, 0), (2, 1)]);
}

#[test]
fn fifo_full_round_trip() {
    let mut mmu = mmu(3, 2, 2, ReplacementPolicy::Fifo);

    for address in 0..6 {
        mmu.write(address, address as Cell).unwrap();
    }
    assert_eq!(mmu.fault_count(), 3);
    assert_eq!(mmu.fault_order(), &[0, 1, 2]);

    for address in 0..6 {
        assert_eq!(mmu.read(address).unwrap(), address as Cell);
    }

    assert_eq!(mmu.fault_count(), 6);
    assert_eq!(mmu.fault_order(), &[0, 1, 2, 0, 1, 2]);
    assert_eq!(mmu.reference_string(), "0, 1, 2, 0, 1, 2");
}

#[test]
fn written_value_survives_eviction_and_reload() {
    for policy in [ReplacementPolicy::Lru, ReplacementPolicy::Fifo] {
        let mut mmu = mmu(8, 2, 4, policy);
        mmu.write(13, -42).unwrap();

        // Two first-touches push page 3 out of both frames.
        mmu.read(0).unwrap();
        mmu.read(4).unwrap();
        assert!(mmu.resident_pages().iter().all(|&(page, _)| page != 3));
        assert_eq!(mmu.store().page(3).unwrap(), &[0, -42, 0, 0]);

        let faults = mmu.fault_count();
        assert_eq!(mmu.read(13).unwrap(), -42);
        assert_eq!(mmu.fault_count(), faults + 1);
    }
}

#[test]
fn fifo_victims_cycle_through_frames_in_order() {
    let mut mmu = mmu(8, 3, 1, ReplacementPolicy::Fifo);

    for (i, page) in [4, 0, 7, 2, 5, 1, 6].into_iter().enumerate() {
        mmu.read(page).unwrap();
        assert_eq!(mmu.page_table().lookup(page), Some(i % 3));

        // Hits on resident pages do not move the ring.
        let resident = mmu.resident_pages();
        for (page, _) in resident {
            mmu.read(page).unwrap();
        }
        assert_eq!(mmu.frame_table().fifo_cursor(), (i + 1) % 3);
    }

    assert_eq!(mmu.fault_count(), 7);
}

#[test]
fn lru_picks_the_one_frame_not_retouched() {
    for skipped in 0..3 {
        let mut mmu = mmu(5, 3, 1, ReplacementPolicy::Lru);
        for page in 0..3 {
            mmu.read(page).unwrap();
        }
        for page in (0..3).filter(|&page| page != skipped) {
            mmu.write(page, 1).unwrap();
        }

        assert_eq!(mmu.frame_table().select_victim(ReplacementPolicy::Lru), skipped);

        mmu.read(4).unwrap();
        assert_eq!(mmu.page_table().lookup(4), Some(skipped));
        assert_eq!(mmu.page_table().lookup(skipped), None);
    }
}

#[test]
fn hits_never_count_as_faults() {
    let mut mmu = mmu(4, 4, 8, ReplacementPolicy::Lru);
    for address in 0..32 {
        mmu.write(address, 1).unwrap();
    }
    for _ in 0..3 {
        for address in 0..32 {
            mmu.read(address).unwrap();
        }
    }
    assert_eq!(mmu.fault_count(), 4);
    assert_eq!(mmu.fault_order().len(), mmu.fault_count());
}
