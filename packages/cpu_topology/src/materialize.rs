//! Turns the working slot table into the compact, cross-linked published topology.
//!
//! Every array is allocated once with its exact final size, then filled in a single pass over the
//! valid slots in increasing processor ID order. Because a leader is the smallest valid ID in its
//! group, the leader's record has always been appended before any follower refers to it.

use crate::slots::{ProcessorSlot, SlotTable};
use crate::{
    Cluster, Core, Error, Level, Package, Processor, ProcessorId, Result, RiscvIsa, Topology,
    Uarch, UarchInfo,
};

/// Allocates an empty vector with room for exactly `count` items, failing instead of aborting
/// the process if the memory is not available.
pub(crate) fn allocate<T>(count: usize, what: &'static str) -> Result<Vec<T>> {
    let mut items = Vec::new();

    items
        .try_reserve_exact(count)
        .map_err(|source| Error::Allocation {
            what,
            count,
            source,
        })?;

    Ok(items)
}

/// Allocates a lookup map of `len` entries, all initially `None`.
fn allocate_map(len: usize, what: &'static str) -> Result<Vec<Option<usize>>> {
    let mut map = allocate(len, what)?;
    map.resize(len, None);
    Ok(map)
}

#[derive(Debug, Default, Eq, PartialEq)]
struct EntityCounts {
    processors: usize,
    cores: usize,
    clusters: usize,
    packages: usize,
}

fn count_entities(slots: &SlotTable) -> EntityCounts {
    slots
        .iter()
        .filter(|(_, slot)| slot.is_valid())
        .fold(EntityCounts::default(), |mut counts, (id, slot)| {
            counts.processors = counts.processors.saturating_add(1);

            if slot.core_leader_id == id {
                counts.cores = counts.cores.saturating_add(1);
            }

            if slot.cluster_leader_id == id {
                counts.clusters = counts.clusters.saturating_add(1);
            }

            if slot.package_leader_id == id {
                counts.packages = counts.packages.saturating_add(1);
            }

            counts
        })
}

/// Builds the published topology from fully reduced slots.
pub(crate) fn materialize(slots: &SlotTable, isa: RiscvIsa) -> Result<Topology> {
    let counts = count_entities(slots);

    let mut processors = allocate::<Processor>(counts.processors, "processors")?;
    let mut cores = allocate::<Core>(counts.cores, "cores")?;
    let mut clusters = allocate::<Cluster>(counts.clusters, "clusters")?;
    let mut packages = allocate::<Package>(counts.packages, "packages")?;

    // Micro-architectures are not identified, so every processor shares one unknown entry.
    let mut uarchs = allocate::<UarchInfo>(1, "micro-architectures")?;
    uarchs.push(UarchInfo {
        uarch: Uarch::Unknown,
        processor_count: saturating_u32(counts.processors),
        core_count: saturating_u32(counts.cores),
    });

    let mut processor_map = allocate_map(slots.len(), "processor map entries")?;
    let mut core_map = allocate_map(slots.len(), "core map entries")?;
    let mut uarch_map = allocate_map(slots.len(), "micro-architecture map entries")?;

    // Where the published record of each leader ended up, indexed by the leader's ID.
    let mut core_index_of = allocate_map(slots.len(), "core leader entries")?;
    let mut cluster_index_of = allocate_map(slots.len(), "cluster leader entries")?;
    let mut package_index_of = allocate_map(slots.len(), "package leader entries")?;

    for (id, slot) in slots.iter().filter(|(_, slot)| slot.is_valid()) {
        if slot.package_leader_id == id {
            set(&mut package_index_of, id, packages.len());
            packages.push(Package {
                core_start: cores.len(),
                cluster_start: clusters.len(),
                ..slot.package
            });
        }

        let package = resolve(&package_index_of, slot, id, Level::Package)?;

        if slot.cluster_leader_id == id {
            set(&mut cluster_index_of, id, clusters.len());
            clusters.push(Cluster {
                core_start: cores.len(),
                package,
                ..slot.cluster
            });
        }

        let cluster = resolve(&cluster_index_of, slot, id, Level::Cluster)?;

        if slot.core_leader_id == id {
            set(&mut core_index_of, id, cores.len());
            cores.push(Core {
                cluster,
                package,
                ..slot.core
            });
        }

        let core = resolve(&core_index_of, slot, id, Level::Core)?;

        let linux_id = slot.processor.linux_id;

        set(&mut processor_map, linux_id, processors.len());
        set(&mut core_map, linux_id, core);
        set(&mut uarch_map, linux_id, uarch_index(slot.uarch));

        processors.push(Processor {
            linux_id,
            core,
            cluster,
            package,
        });
    }

    Ok(Topology {
        processors: processors.into_boxed_slice(),
        cores: cores.into_boxed_slice(),
        clusters: clusters.into_boxed_slice(),
        packages: packages.into_boxed_slice(),
        uarchs: uarchs.into_boxed_slice(),
        processor_map: processor_map.into_boxed_slice(),
        core_map: core_map.into_boxed_slice(),
        uarch_map: uarch_map.into_boxed_slice(),
        isa,
    })
}

fn set(map: &mut [Option<usize>], id: ProcessorId, index: usize) {
    if let Some(entry) = map.get_mut(id as usize) {
        *entry = Some(index);
    }
}

// Finds the published index of the group that `slot` belongs to at `level`.
fn resolve(
    index_of: &[Option<usize>],
    slot: &ProcessorSlot,
    id: ProcessorId,
    level: Level,
) -> Result<usize> {
    index_of
        .get(slot.leader_id(level) as usize)
        .copied()
        .flatten()
        .ok_or(Error::DanglingLeader {
            level,
            processor: id,
        })
}

fn uarch_index(uarch: Uarch) -> usize {
    match uarch {
        Uarch::Unknown => 0,
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[allow(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    reason = "we need not worry in tests"
)]
