use std::ops::Range;

use crate::flags::SlotFlags;
use crate::materialize::allocate;
use crate::{Cluster, Core, Level, Package, Processor, ProcessorId, Result, Uarch};

/// Working state for one processor ID during discovery.
///
/// Slots exist for every ID up to the highest present processor, including IDs of processors
/// that are absent. Only slots flagged [`SlotFlags::VALID`] take part in discovery.
///
/// Besides the leader IDs, a slot carries draft copies of every published record. The drafts
/// of a processor that leads a group become that group's published record.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ProcessorSlot {
    pub(crate) flags: SlotFlags,

    // The smallest valid processor ID in the same group at each level.
    pub(crate) core_leader_id: ProcessorId,
    pub(crate) cluster_leader_id: ProcessorId,
    pub(crate) package_leader_id: ProcessorId,

    pub(crate) processor: Processor,
    pub(crate) core: Core,
    pub(crate) cluster: Cluster,
    pub(crate) package: Package,
    pub(crate) uarch: Uarch,
}

impl ProcessorSlot {
    /// Creates the slot for processor `id`, which starts out as its own leader at every level.
    pub(crate) fn new(id: ProcessorId) -> Self {
        Self {
            core_leader_id: id,
            cluster_leader_id: id,
            package_leader_id: id,
            ..Self::default()
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.flags.contains(SlotFlags::VALID)
    }

    pub(crate) fn is_visited(&self, level: Level) -> bool {
        self.flags.contains(SlotFlags::visited(level))
    }

    pub(crate) fn leader_id(&self, level: Level) -> ProcessorId {
        match level {
            Level::Core => self.core_leader_id,
            Level::Cluster => self.cluster_leader_id,
            Level::Package => self.package_leader_id,
        }
    }

    /// Lowers the leader ID at `level` to `candidate` if `candidate` is smaller.
    /// Leader IDs never increase.
    pub(crate) fn lower_leader_id(&mut self, level: Level, candidate: ProcessorId) {
        let leader_id = match level {
            Level::Core => &mut self.core_leader_id,
            Level::Cluster => &mut self.cluster_leader_id,
            Level::Package => &mut self.package_leader_id,
        };

        *leader_id = (*leader_id).min(candidate);
    }
}

/// The slots of all processor IDs from 0 up to the highest present processor.
///
/// This table is owned by a single discovery pass and mutated in place, one processor at a
/// time, in increasing processor ID order.
#[derive(Debug)]
pub(crate) struct SlotTable {
    slots: Vec<ProcessorSlot>,
}

impl SlotTable {
    /// Allocates `slot_count` slots, each its own leader and not yet present.
    pub(crate) fn new(slot_count: usize) -> Result<Self> {
        let mut slots = allocate(slot_count, "processor slots")?;

        slots.extend(
            (0..=ProcessorId::MAX)
                .take(slot_count)
                .map(ProcessorSlot::new),
        );

        Ok(Self { slots })
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn get(&self, id: ProcessorId) -> Option<&ProcessorSlot> {
        self.slots.get(id as usize)
    }

    pub(crate) fn get_mut(&mut self, id: ProcessorId) -> Option<&mut ProcessorSlot> {
        self.slots.get_mut(id as usize)
    }

    /// Whether the slot of `id` exists and is valid.
    pub(crate) fn is_valid(&self, id: ProcessorId) -> bool {
        self.get(id).is_some_and(ProcessorSlot::is_valid)
    }

    /// Flags every slot in `ranges` as present and valid, ignoring IDs beyond the table.
    ///
    /// Returns the number of slots that became present.
    pub(crate) fn mark_present<'a>(
        &mut self,
        ranges: impl IntoIterator<Item = &'a Range<ProcessorId>>,
    ) -> usize {
        let mut marked = 0_usize;

        for range in ranges {
            for id in range.clone() {
                let Some(slot) = self.get_mut(id) else {
                    break;
                };

                if !slot.flags.contains(SlotFlags::PRESENT) {
                    marked = marked.saturating_add(1);
                }

                slot.flags |= SlotFlags::PRESENT | SlotFlags::VALID;
            }
        }

        marked
    }

    /// The IDs of all valid slots, in increasing order.
    pub(crate) fn valid_ids(&self) -> Vec<ProcessorId> {
        self.iter()
            .filter(|(_, slot)| slot.is_valid())
            .map(|(id, _)| id)
            .collect()
    }

    /// All slots with their processor IDs, in increasing order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (ProcessorId, &ProcessorSlot)> {
        (0..=ProcessorId::MAX).zip(self.slots.iter())
    }
}
