//! Leader election over the sibling lists reported by the operating system.
//!
//! For every valid processor and every hierarchy level, the platform reports the IDs of the
//! processors that share the same group (core, cluster or package) as a list of contiguous
//! ranges. Each range is fed to [`reduce()`], which elects the smallest valid ID as the leader of
//! the group and accumulates the group's counters in the calling processor's draft records.
//!
//! The caller must invoke the reducer once per processor per level with disjoint ranges. The
//! counters are accumulated, so overlapping ranges would count the same sibling twice.

use std::ops::Range;

use crate::flags::SlotFlags;
use crate::slots::SlotTable;
use crate::{Level, ProcessorId};

/// Reduces one contiguous range of siblings of `processor` at `level`.
///
/// Returns `false` if the range contains no valid processor, in which case nothing is modified.
pub(crate) fn reduce(
    slots: &mut SlotTable,
    level: Level,
    processor: ProcessorId,
    siblings: Range<ProcessorId>,
) -> bool {
    // Sibling IDs past the highest present processor cannot be valid.
    let table_end = ProcessorId::try_from(slots.len()).unwrap_or(ProcessorId::MAX);
    let siblings = siblings.start..siblings.end.min(table_end);

    let Some(candidate) = siblings.clone().find(|id| slots.is_valid(*id)) else {
        return false;
    };

    // Leader IDs start at the slot's own ID and only ever decrease. An earlier call, by this
    // processor or by any processor that listed it as a sibling, may already have lowered it.
    let Some(existing) = slots.get(processor).map(|slot| slot.leader_id(level)) else {
        return false;
    };

    let leader = existing.min(candidate);

    let mut counts = GroupCounts::default();

    for id in siblings {
        let Some(slot) = slots.get_mut(id) else {
            break;
        };

        if !slot.is_valid() {
            continue;
        }

        slot.lower_leader_id(level, leader);

        counts.processors = counts.processors.saturating_add(1);

        if slot.core_leader_id == id {
            counts.cores = counts.cores.saturating_add(1);
        }

        if slot.cluster_leader_id == id {
            counts.clusters = counts.clusters.saturating_add(1);
        }
    }

    let Some(slot) = slots.get_mut(processor) else {
        return false;
    };

    let is_first_visit = !slot.is_visited(level);
    slot.lower_leader_id(level, leader);

    match level {
        Level::Core => {
            let core = &mut slot.core;

            if is_first_visit || core.processor_start > leader {
                core.processor_start = leader;
            }

            core.processor_count = core.processor_count.saturating_add(counts.processors);
        }
        Level::Cluster => {
            let cluster = &mut slot.cluster;

            if is_first_visit || cluster.processor_start > leader {
                cluster.processor_start = leader;
                cluster.cluster_id = leader;
            }

            cluster.processor_count = cluster.processor_count.saturating_add(counts.processors);
            cluster.core_count = cluster.core_count.saturating_add(counts.cores);
        }
        Level::Package => {
            let package = &mut slot.package;

            if is_first_visit || package.processor_start > leader {
                package.processor_start = leader;
            }

            package.processor_count = package.processor_count.saturating_add(counts.processors);
            package.core_count = package.core_count.saturating_add(counts.cores);
            package.cluster_count = package.cluster_count.saturating_add(counts.clusters);
        }
    }

    slot.flags |= SlotFlags::visited(level);

    true
}

// Members of one sibling range that lead a group at each level.
#[derive(Default)]
struct GroupCounts {
    processors: u32,
    cores: u32,
    clusters: u32,
}

#[allow(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::integer_division,
    reason = "we need not worry in tests"
)]
#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn table_with_present(slot_count: usize, present: &[Range<ProcessorId>]) -> SlotTable {
        let mut table = SlotTable::new(slot_count).unwrap();
        table.mark_present(present);
        table
    }

    fn leaders(table: &SlotTable, level: Level) -> Vec<ProcessorId> {
        table
            .valid_ids()
            .into_iter()
            .map(|id| table.get(id).unwrap().leader_id(level))
            .collect()
    }

    #[test]
    fn two_cores_of_two() {
        let mut table = table_with_present(4, &[0..4]);

        assert!(reduce(&mut table, Level::Core, 0, 0..2));
        assert!(reduce(&mut table, Level::Core, 1, 0..2));
        assert!(reduce(&mut table, Level::Core, 2, 2..4));
        assert!(reduce(&mut table, Level::Core, 3, 2..4));

        assert_eq!(leaders(&table, Level::Core), vec![0, 0, 2, 2]);

        let leader_0 = table.get(0).unwrap();
        assert_eq!(leader_0.core.processor_start, 0);
        assert_eq!(leader_0.core.processor_count, 2);

        let leader_2 = table.get(2).unwrap();
        assert_eq!(leader_2.core.processor_start, 2);
        assert_eq!(leader_2.core.processor_count, 2);

        for id in 0..4 {
            assert!(table.get(id).unwrap().is_visited(Level::Core));
            assert!(!table.get(id).unwrap().is_visited(Level::Cluster));
        }
    }

    #[test]
    fn invalid_siblings_are_skipped() {
        // Processor 0 is absent (e.g. offline before boot completed).
        let mut table = table_with_present(4, &[1..4]);

        assert!(reduce(&mut table, Level::Core, 1, 0..4));

        let slot = table.get(1).unwrap();
        assert_eq!(slot.core_leader_id, 1);
        assert_eq!(slot.core.processor_start, 1);
        assert_eq!(slot.core.processor_count, 3);

        // The absent slot is never touched.
        assert_eq!(table.get(0).unwrap().core_leader_id, 0);
    }

    #[test]
    fn no_valid_siblings_is_failure() {
        let mut table = table_with_present(4, &[2..4]);

        assert!(!reduce(&mut table, Level::Core, 2, 0..2));
        assert!(!reduce(&mut table, Level::Package, 2, 3..3));

        // A failed reduction leaves no trace.
        let slot = table.get(2).unwrap();
        assert!(!slot.is_visited(Level::Core));
        assert_eq!(slot.core.processor_count, 0);
    }

    #[test]
    fn siblings_past_end_are_ignored() {
        let mut table = table_with_present(2, &[0..2]);

        assert!(reduce(&mut table, Level::Package, 0, 0..64));

        assert_eq!(table.get(0).unwrap().package.processor_count, 2);
    }

    #[test]
    fn split_ranges_match_single_range() {
        // Processors 1, 10, 11 and 12 form one group. The OS reports "1,10-12".
        let present = [1..2, 10..13];

        let mut split = table_with_present(13, &present);
        for processor in [1, 10, 11, 12] {
            assert!(reduce(&mut split, Level::Core, processor, 1..2));
            assert!(reduce(&mut split, Level::Core, processor, 10..13));
        }

        // The same group as one range; 2..10 are absent and therefore skipped.
        let mut single = table_with_present(13, &present);
        for processor in [1, 10, 11, 12] {
            assert!(reduce(&mut single, Level::Core, processor, 1..13));
        }

        for processor in [1, 10, 11, 12] {
            let split_slot = split.get(processor).unwrap();
            let single_slot = single.get(processor).unwrap();

            assert_eq!(split_slot.core_leader_id, 1);
            assert_eq!(single_slot.core_leader_id, 1);

            assert_eq!(split_slot.core, single_slot.core);
            assert_eq!(split_slot.core.processor_count, 4);
            assert_eq!(split_slot.core.processor_start, 1);
        }
    }

    #[test]
    fn split_ranges_in_reverse_order_keep_smallest_leader() {
        let mut table = table_with_present(13, &[1..2, 10..13]);

        // The higher range arrives first, so the first candidate is 10.
        assert!(reduce(&mut table, Level::Core, 11, 10..13));
        assert_eq!(table.get(11).unwrap().core_leader_id, 10);

        // The lower range then lowers the leader of the caller.
        assert!(reduce(&mut table, Level::Core, 11, 1..2));

        let slot = table.get(11).unwrap();
        assert_eq!(slot.core_leader_id, 1);
        assert_eq!(slot.core.processor_start, 1);
        assert_eq!(slot.core.processor_count, 4);
    }

    #[test]
    fn leader_never_increases() {
        let mut table = table_with_present(16, &[0..16]);

        assert!(reduce(&mut table, Level::Cluster, 4, 4..8));
        assert_eq!(table.get(4).unwrap().cluster_leader_id, 4);

        // A later range with only higher IDs must not raise the leader.
        assert!(reduce(&mut table, Level::Cluster, 4, 8..12));
        assert_eq!(table.get(4).unwrap().cluster_leader_id, 4);
        assert_eq!(table.get(9).unwrap().cluster_leader_id, 4);

        // A later range with a lower ID lowers it.
        assert!(reduce(&mut table, Level::Cluster, 4, 2..3));
        assert_eq!(table.get(4).unwrap().cluster_leader_id, 2);

        // Siblings lowered earlier by another caller are not raised by this one.
        assert!(reduce(&mut table, Level::Cluster, 12, 9..10));
        assert_eq!(table.get(9).unwrap().cluster_leader_id, 4);
    }

    #[test]
    fn transitive_groups_converge() {
        let mut table = table_with_present(8, &[4..7]);

        // Inconsistent reports: 5 does not know about 4, but 6 does.
        assert!(reduce(&mut table, Level::Package, 5, 5..7));
        assert!(reduce(&mut table, Level::Package, 6, 4..7));
        assert!(reduce(&mut table, Level::Package, 4, 4..7));

        assert_eq!(leaders(&table, Level::Package), vec![4, 4, 4]);
    }

    #[test]
    fn leader_lowered_by_lower_sibling_is_kept() {
        for level in Level::ALL {
            let mut table = table_with_present(6, &[1..2, 3..4, 5..6]);

            // 1 claims 3 before 3 reports a group of its own that also contains 5.
            assert!(reduce(&mut table, level, 1, 1..2));
            assert!(reduce(&mut table, level, 1, 3..4));
            assert_eq!(table.get(3).unwrap().leader_id(level), 1);

            assert!(reduce(&mut table, level, 3, 3..6));
            assert!(reduce(&mut table, level, 5, 3..6));

            assert_eq!(leaders(&table, level), vec![1, 1, 1]);
        }
    }

    #[test]
    fn middle_processor_linked_before_reporting_higher_range() {
        let mut table = table_with_present(8, &[0..8]);

        assert!(reduce(&mut table, Level::Cluster, 0, 0..3));
        assert!(reduce(&mut table, Level::Cluster, 2, 2..8));

        for id in 3..8 {
            assert!(reduce(&mut table, Level::Cluster, id, 2..8));
        }

        assert!(leaders(&table, Level::Cluster).iter().all(|&leader| leader == 0));
    }

    #[test]
    fn scan_stops_at_end_of_table() {
        let mut table = table_with_present(4, &[0..4]);

        assert!(!reduce(&mut table, Level::Core, 0, 4..ProcessorId::MAX));
        assert!(reduce(&mut table, Level::Core, 3, 3..ProcessorId::MAX));

        let slot = table.get(3).unwrap();
        assert_eq!(slot.core_leader_id, 3);
        assert_eq!(slot.core.processor_count, 1);
    }

    #[test]
    fn reverse_call_order_converges() {
        let mut table = table_with_present(4, &[0..4]);

        for processor in (0..4).rev() {
            assert!(reduce(&mut table, Level::Core, processor, 0..4));
        }

        assert_eq!(leaders(&table, Level::Core), vec![0, 0, 0, 0]);
    }

    #[test]
    fn cluster_and_package_count_group_leaders() {
        // Two cores of two processors each, in one cluster and one package.
        let mut table = table_with_present(4, &[0..4]);

        for processor in 0..4 {
            let core_start = processor / 2 * 2;
            assert!(reduce(
                &mut table,
                Level::Core,
                processor,
                core_start..core_start + 2
            ));
        }

        for processor in 0..4 {
            assert!(reduce(&mut table, Level::Cluster, processor, 0..4));
        }

        for processor in 0..4 {
            assert!(reduce(&mut table, Level::Package, processor, 0..4));
        }

        let leader = table.get(0).unwrap();

        assert_eq!(leader.cluster.processor_start, 0);
        assert_eq!(leader.cluster.cluster_id, 0);
        assert_eq!(leader.cluster.processor_count, 4);
        assert_eq!(leader.cluster.core_count, 2);

        assert_eq!(leader.package.processor_start, 0);
        assert_eq!(leader.package.processor_count, 4);
        assert_eq!(leader.package.core_count, 2);
        assert_eq!(leader.package.cluster_count, 1);
    }

    #[test]
    fn counters_accumulate_across_calls() {
        let mut table = table_with_present(8, &[0..8]);

        assert!(reduce(&mut table, Level::Package, 0, 0..3));
        assert!(reduce(&mut table, Level::Package, 0, 3..8));

        assert_eq!(table.get(0).unwrap().package.processor_count, 8);
    }
}
