use bitflags::bitflags;

use crate::Level;

bitflags! {
    /// Per-slot state tracked while the topology is being discovered.
    ///
    /// A slot exists for every processor ID up to the highest present one, so most of these
    /// flags say whether the slot refers to a real processor and which discovery passes have
    /// already touched it.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub(crate) struct SlotFlags: u32 {
        /// The operating system reports this processor as present.
        const PRESENT = 1 << 0;

        /// The processor is present and all detection steps so far succeeded for it.
        const VALID = 1 << 1;

        /// The core sibling list has been reduced for this processor at least once.
        const CORE_CLUSTER = 1 << 2;

        /// The cluster sibling list has been reduced for this processor at least once.
        const CLUSTER_CLUSTER = 1 << 3;

        /// The package sibling list has been reduced for this processor at least once.
        const PACKAGE_CLUSTER = 1 << 4;
    }
}

impl SlotFlags {
    /// The flag that records whether a slot has been visited at the given level.
    pub(crate) const fn visited(level: Level) -> Self {
        match level {
            Level::Core => Self::CORE_CLUSTER,
            Level::Cluster => Self::CLUSTER_CLUSTER,
            Level::Package => Self::PACKAGE_CLUSTER,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn visited_flags_are_distinct() {
        let all = Level::ALL
            .iter()
            .fold(SlotFlags::empty(), |acc, level| acc | SlotFlags::visited(*level));

        assert_eq!(all.bits().count_ones(), 3);
        assert!(!all.intersects(SlotFlags::PRESENT | SlotFlags::VALID));
    }

    #[test]
    fn valid_requires_all_bits() {
        let flags = SlotFlags::PRESENT;

        assert!(!flags.contains(SlotFlags::PRESENT | SlotFlags::VALID));
        assert!((flags | SlotFlags::VALID).contains(SlotFlags::PRESENT | SlotFlags::VALID));
    }
}
