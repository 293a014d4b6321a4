//! Shared helpers for the unit tests of the discovery pipeline.

use std::ops::Range;

use crate::reducer::reduce;
use crate::slots::SlotTable;
use crate::{Level, ProcessorId, Topology};

/// Runs the reducer over a hand-written system description.
///
/// Each group lists the processor IDs it contains. Every valid processor is reduced once per
/// level with the ranges of its own group, as the discovery pass would with real sibling lists.
pub(crate) fn discovered_slots(
    slot_count: usize,
    present: &[Range<ProcessorId>],
    core_groups: &[&[ProcessorId]],
    cluster_groups: &[&[ProcessorId]],
    package_groups: &[&[ProcessorId]],
) -> SlotTable {
    let mut slots = SlotTable::new(slot_count).unwrap();
    slots.mark_present(present);

    for (level, groups) in [
        (Level::Core, core_groups),
        (Level::Cluster, cluster_groups),
        (Level::Package, package_groups),
    ] {
        for processor in slots.valid_ids() {
            let group = groups
                .iter()
                .find(|group| group.contains(&processor))
                .unwrap_or_else(|| panic!("processor {processor} has no {level} group"));

            for range in to_ranges(group) {
                assert!(reduce(&mut slots, level, processor, range));
            }
        }
    }

    slots
}

/// Compresses a sorted list of processor IDs into contiguous ranges.
pub(crate) fn to_ranges(ids: &[ProcessorId]) -> Vec<Range<ProcessorId>> {
    let mut ranges: Vec<Range<ProcessorId>> = Vec::new();

    for &id in ids {
        match ranges.last_mut() {
            Some(last) if last.end == id => last.end = id.checked_add(1).unwrap(),
            _ => ranges.push(id..id.checked_add(1).unwrap()),
        }
    }

    ranges
}

/// Asserts the structural invariants that every published topology upholds.
pub(crate) fn assert_consistent(topology: &Topology) {
    let processor_total: u32 = topology.cores().iter().map(|c| c.processor_count()).sum();
    assert_eq!(processor_total as usize, topology.processors().len());

    let cluster_processors: u32 = topology
        .clusters()
        .iter()
        .map(|c| c.processor_count())
        .sum();
    assert_eq!(cluster_processors as usize, topology.processors().len());

    let package_processors: u32 = topology
        .packages()
        .iter()
        .map(|p| p.processor_count())
        .sum();
    assert_eq!(package_processors as usize, topology.processors().len());

    let package_cores: u32 = topology.packages().iter().map(|p| p.core_count()).sum();
    assert_eq!(package_cores as usize, topology.cores().len());

    let package_clusters: u32 = topology.packages().iter().map(|p| p.cluster_count()).sum();
    assert_eq!(package_clusters as usize, topology.clusters().len());

    let uarch_processors: u32 = topology.uarchs().iter().map(|u| u.processor_count()).sum();
    assert_eq!(uarch_processors as usize, topology.processors().len());

    for pair in topology.processors().windows(2) {
        assert!(pair[0].linux_id() < pair[1].linux_id());
    }

    for processor in topology.processors() {
        let core = topology.core_of(processor).unwrap();
        let cluster = topology.cluster_of(processor).unwrap();
        let package = topology.package_of(processor).unwrap();

        // Every group is identified by its smallest member.
        assert!(core.processor_start() <= processor.linux_id());
        assert!(cluster.processor_start() <= processor.linux_id());
        assert!(package.processor_start() <= processor.linux_id());

        assert_eq!(topology.cluster_of_core(core), Some(cluster));
        assert_eq!(topology.package_of_core(core), Some(package));
        assert_eq!(topology.package_of_cluster(cluster), Some(package));

        assert_eq!(
            topology.processor_by_linux_id(processor.linux_id()),
            Some(processor)
        );
        assert_eq!(topology.core_by_linux_id(processor.linux_id()), Some(core));
        assert!(topology
            .uarch_index_by_linux_id(processor.linux_id())
            .is_some_and(|index| index < topology.uarchs().len()));
    }

    for (index, core) in topology.cores().iter().enumerate() {
        let members = topology.processors_in_core(index).count();
        assert_eq!(members, core.processor_count() as usize);
    }

    for (index, cluster) in topology.clusters().iter().enumerate() {
        let cores = topology
            .cores()
            .iter()
            .filter(|core| core.cluster_index() == index)
            .count();
        assert_eq!(cores, cluster.core_count() as usize);
    }
}
