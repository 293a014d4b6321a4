//! Builds a [`Topology`] from the facts reported by a [`Platform`].
//!
//! Discovery runs as a sequence of passes over a slot table covering every processor ID up to
//! the highest present one:
//!
//! 1. Size the table from the highest present processor and mark the present processors valid.
//! 2. Reduce the core sibling lists of every valid processor, then read its hardware core ID.
//! 3. Reduce the cluster sibling lists, then the package sibling lists.
//! 4. Tag every processor with its micro-architecture and read the instruction set.
//! 5. Materialize the slots into the published arrays.
//!
//! Any failure aborts the whole discovery; no partial topology is ever returned.

use tracing::{debug, error, warn};

use crate::materialize::materialize;
use crate::pal::Platform;
use crate::reducer::reduce;
use crate::slots::SlotTable;
use crate::{Error, Level, ProcessorId, Result, Topology, Uarch};

/// Discovers the processor topology reported by `platform`.
pub(crate) fn discover(platform: &impl Platform) -> Result<Topology> {
    let max_processors_count = platform.max_processors_count();

    let Some(max_present_id) = platform.max_present_processor(max_processors_count) else {
        error!("failed to discover any processors");
        return Err(Error::NoProcessors);
    };

    let slot_count = (max_present_id as usize).saturating_add(1);
    let mut slots = SlotTable::new(slot_count)?;

    let Some(present) = platform.present_processors() else {
        error!("failed to detect present processors");
        return Err(Error::PresenceDetection);
    };

    let present_count = slots.mark_present(present.iter());

    if present_count == 0 {
        error!(slot_count, "no present processor is within the processor ID range");
        return Err(Error::PresenceDetection);
    }

    debug!(
        max_processors_count,
        slot_count, present_count, "detected present processors"
    );

    let valid_ids = slots.valid_ids();

    for &id in &valid_ids {
        if let Some(slot) = slots.get_mut(id) {
            slot.processor.linux_id = id;
        }
    }

    for &id in &valid_ids {
        reduce_siblings(platform, &mut slots, Level::Core, id, max_processors_count)?;

        let core_id = platform.processor_core_id(id);

        if let Some(slot) = slots.get_mut(id) {
            slot.core.core_id = core_id;
        }
    }

    for level in [Level::Cluster, Level::Package] {
        for &id in &valid_ids {
            reduce_siblings(platform, &mut slots, level, id, max_processors_count)?;
        }
    }

    // Micro-architectures are not identified on this platform.
    for &id in &valid_ids {
        if let Some(slot) = slots.get_mut(id) {
            slot.uarch = Uarch::Unknown;
        }
    }

    let isa = platform.isa();

    let topology = materialize(&slots, isa)?;

    debug!(
        processors = topology.processors().len(),
        cores = topology.cores().len(),
        clusters = topology.clusters().len(),
        packages = topology.packages().len(),
        "discovered processor topology"
    );

    Ok(topology)
}

/// Reduces every sibling range that `platform` reports for `processor` at `level`.
///
/// The processor fails if its sibling list is missing, empty, or has a range without any valid
/// processor. A partial hierarchy is never built from such a list.
fn reduce_siblings(
    platform: &impl Platform,
    slots: &mut SlotTable,
    level: Level,
    processor: ProcessorId,
    max_processors_count: u32,
) -> Result<()> {
    let Some(ranges) = platform.sibling_ranges(level, processor, max_processors_count) else {
        log_sibling_failure(level, processor, "sibling list is unavailable");
        return Err(Error::SiblingDetection { level, processor });
    };

    if ranges.is_empty() {
        log_sibling_failure(level, processor, "sibling list is empty");
        return Err(Error::SiblingDetection { level, processor });
    }

    for range in ranges {
        if !reduce(slots, level, processor, range.clone()) {
            log_sibling_failure(level, processor, &format!("no valid sibling in {range:?}"));
            return Err(Error::SiblingDetection { level, processor });
        }
    }

    Ok(())
}

// Without core siblings there is no topology at all. Cluster and package lists are secondary
// and reported at a lower severity.
fn log_sibling_failure(level: Level, processor: ProcessorId, problem: &str) {
    if level == Level::Core {
        error!(processor, problem, "failed to detect {level} siblings");
    } else {
        warn!(processor, problem, "failed to detect {level} siblings");
    }
}

#[allow(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::integer_division,
    reason = "we need not worry in tests"
)]
