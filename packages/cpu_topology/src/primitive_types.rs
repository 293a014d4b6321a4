use derive_more::derive::Display;

/// Identifies a specific logical processor.
///
/// This will match the numeric identifier used by standard tooling of the operating system
/// (e.g. the `N` in `/sys/devices/system/cpu/cpuN`).
///
/// It is important to highlight that the values used are not guaranteed to be sequential/contiguous.
/// Processors that are not present on the system leave gaps in the identifier space.
pub type ProcessorId = u32;

/// Hardware identifier of a physical core, as reported by the operating system.
///
/// Unlike [`ProcessorId`], this is not unique across packages and may be absent entirely.
pub type CoreId = u32;

/// A level of the processor hierarchy at which processors are grouped together.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[expect(
    clippy::exhaustive_enums,
    reason = "mirroring the three-tier structure of platform APIs"
)]
pub enum Level {
    /// Processors that share one physical core (e.g. simultaneous multithreading siblings).
    #[display("core")]
    Core,

    /// Cores that share a cluster (e.g. a shared last-level cache slice or interconnect hop).
    #[display("cluster")]
    Cluster,

    /// Clusters that share one physical package (socket).
    #[display("package")]
    Package,
}

impl Level {
    /// All levels, in the order in which discovery processes them.
    pub const ALL: [Self; 3] = [Self::Core, Self::Cluster, Self::Package];
}
