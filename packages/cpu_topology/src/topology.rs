use derive_more::derive::Display;

use crate::{CoreId, ProcessorId, RiscvIsa};

/// A logical processor present on the system.
///
/// The processor links to the [`Core`], [`Cluster`] and [`Package`] it belongs to by their
/// index in the [`Topology`] that published it. Use [`Topology::core_of()`] and friends to
/// follow these links.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
#[display("processor {linux_id}")]
pub struct Processor {
    pub(crate) linux_id: ProcessorId,
    pub(crate) core: usize,
    pub(crate) cluster: usize,
    pub(crate) package: usize,
}

impl Processor {
    /// The numeric ID of the processor, matching the ID used by operating system tools.
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn linux_id(&self) -> ProcessorId {
        self.linux_id
    }

    /// Index of the processor's core in [`Topology::cores()`].
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn core_index(&self) -> usize {
        self.core
    }

    /// Index of the processor's cluster in [`Topology::clusters()`].
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn cluster_index(&self) -> usize {
        self.cluster
    }

    /// Index of the processor's package in [`Topology::packages()`].
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn package_index(&self) -> usize {
        self.package
    }
}

/// A physical core, grouping one or more logical processors.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Core {
    pub(crate) processor_start: ProcessorId,
    pub(crate) processor_count: u32,
    pub(crate) core_id: Option<CoreId>,
    pub(crate) cluster: usize,
    pub(crate) package: usize,
}

impl Core {
    /// The smallest processor ID among the processors of this core.
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn processor_start(&self) -> ProcessorId {
        self.processor_start
    }

    /// The number of logical processors in this core.
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn processor_count(&self) -> u32 {
        self.processor_count
    }

    /// The hardware core ID reported by the operating system, if it reports one.
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn core_id(&self) -> Option<CoreId> {
        self.core_id
    }

    /// Index of the core's cluster in [`Topology::clusters()`].
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn cluster_index(&self) -> usize {
        self.cluster
    }

    /// Index of the core's package in [`Topology::packages()`].
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn package_index(&self) -> usize {
        self.package
    }
}

/// A cluster of cores inside a package.
///
/// On systems whose kernel does not describe clusters, every package is a single cluster.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Cluster {
    pub(crate) processor_start: ProcessorId,
    pub(crate) processor_count: u32,
    pub(crate) core_start: usize,
    pub(crate) core_count: u32,
    pub(crate) cluster_id: ProcessorId,
    pub(crate) package: usize,
}

impl Cluster {
    /// The smallest processor ID among the processors of this cluster.
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn processor_start(&self) -> ProcessorId {
        self.processor_start
    }

    /// The number of logical processors in this cluster.
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn processor_count(&self) -> u32 {
        self.processor_count
    }

    /// Index of the first core of this cluster in [`Topology::cores()`].
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn core_start(&self) -> usize {
        self.core_start
    }

    /// The number of cores in this cluster.
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn core_count(&self) -> u32 {
        self.core_count
    }

    /// Identifies the cluster. This is the smallest processor ID in the cluster.
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn cluster_id(&self) -> ProcessorId {
        self.cluster_id
    }

    /// Index of the cluster's package in [`Topology::packages()`].
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn package_index(&self) -> usize {
        self.package
    }
}

/// A physical processor package (socket).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Package {
    pub(crate) processor_start: ProcessorId,
    pub(crate) processor_count: u32,
    pub(crate) core_start: usize,
    pub(crate) core_count: u32,
    pub(crate) cluster_start: usize,
    pub(crate) cluster_count: u32,
}

impl Package {
    /// The smallest processor ID among the processors of this package.
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn processor_start(&self) -> ProcessorId {
        self.processor_start
    }

    /// The number of logical processors in this package.
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn processor_count(&self) -> u32 {
        self.processor_count
    }

    /// Index of the first core of this package in [`Topology::cores()`].
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn core_start(&self) -> usize {
        self.core_start
    }

    /// The number of cores in this package.
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn core_count(&self) -> u32 {
        self.core_count
    }

    /// Index of the first cluster of this package in [`Topology::clusters()`].
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn cluster_start(&self) -> usize {
        self.cluster_start
    }

    /// The number of clusters in this package.
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn cluster_count(&self) -> u32 {
        self.cluster_count
    }
}

/// Micro-architecture of a core.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Uarch {
    /// The micro-architecture has not been identified.
    #[default]
    #[display("unknown")]
    Unknown,
}

/// Describes a group of cores that share one micro-architecture.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct UarchInfo {
    pub(crate) uarch: Uarch,
    pub(crate) processor_count: u32,
    pub(crate) core_count: u32,
}

impl UarchInfo {
    /// The micro-architecture shared by the cores in this group.
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn uarch(&self) -> Uarch {
        self.uarch
    }

    /// The number of logical processors with this micro-architecture.
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn processor_count(&self) -> u32 {
        self.processor_count
    }

    /// The number of cores with this micro-architecture.
    #[cfg_attr(test, mutants::skip)] // Trivial getter, do not waste time on mutation.
    #[inline]
    #[must_use]
    pub fn core_count(&self) -> u32 {
        self.core_count
    }
}

/// An immutable snapshot of the processor topology of the system.
///
/// All entities are stored in flat arrays ordered by the smallest processor ID they contain.
/// Entities refer to each other by index into these arrays; links always point upward in the
/// hierarchy (processor to core to cluster to package).
///
/// The lookup maps are indexed directly by processor ID and cover every ID up to
/// [`max_linux_id()`][Self::max_linux_id], returning `None` for processors that are not present.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Topology {
    pub(crate) processors: Box<[Processor]>,
    pub(crate) cores: Box<[Core]>,
    pub(crate) clusters: Box<[Cluster]>,
    pub(crate) packages: Box<[Package]>,
    pub(crate) uarchs: Box<[UarchInfo]>,

    pub(crate) processor_map: Box<[Option<usize>]>,
    pub(crate) core_map: Box<[Option<usize>]>,
    pub(crate) uarch_map: Box<[Option<usize>]>,

    pub(crate) isa: RiscvIsa,
}

impl Topology {
    /// All logical processors, ordered by processor ID.
    #[inline]
    #[must_use]
    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    /// All cores, ordered by the smallest processor ID they contain.
    #[inline]
    #[must_use]
    pub fn cores(&self) -> &[Core] {
        &self.cores
    }

    /// All clusters, ordered by the smallest processor ID they contain.
    #[inline]
    #[must_use]
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// All packages, ordered by the smallest processor ID they contain.
    #[inline]
    #[must_use]
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// All micro-architecture groups. There is currently always exactly one.
    #[inline]
    #[must_use]
    pub fn uarchs(&self) -> &[UarchInfo] {
        &self.uarchs
    }

    /// The instruction set extensions reported by the operating system.
    #[inline]
    #[must_use]
    pub fn isa(&self) -> &RiscvIsa {
        &self.isa
    }

    /// The highest processor ID covered by the lookup maps.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the maps are sized from a ProcessorId, so the length always fits"
    )]
    pub fn max_linux_id(&self) -> ProcessorId {
        self.processor_map.len().saturating_sub(1) as ProcessorId
    }

    /// Looks up a processor by its operating system processor ID.
    #[must_use]
    pub fn processor_by_linux_id(&self, linux_id: ProcessorId) -> Option<&Processor> {
        let index = lookup(&self.processor_map, linux_id)?;
        self.processors.get(index)
    }

    /// Looks up the core of a processor by the operating system processor ID.
    #[must_use]
    pub fn core_by_linux_id(&self, linux_id: ProcessorId) -> Option<&Core> {
        let index = lookup(&self.core_map, linux_id)?;
        self.cores.get(index)
    }

    /// Looks up the index into [`uarchs()`][Self::uarchs] of a processor by the operating
    /// system processor ID.
    #[must_use]
    pub fn uarch_index_by_linux_id(&self, linux_id: ProcessorId) -> Option<usize> {
        lookup(&self.uarch_map, linux_id)
    }

    /// The core of a processor from this snapshot.
    #[must_use]
    pub fn core_of(&self, processor: &Processor) -> Option<&Core> {
        self.cores.get(processor.core)
    }

    /// The cluster of a processor from this snapshot.
    #[must_use]
    pub fn cluster_of(&self, processor: &Processor) -> Option<&Cluster> {
        self.clusters.get(processor.cluster)
    }

    /// The package of a processor from this snapshot.
    #[must_use]
    pub fn package_of(&self, processor: &Processor) -> Option<&Package> {
        self.packages.get(processor.package)
    }

    /// The cluster of a core from this snapshot.
    #[must_use]
    pub fn cluster_of_core(&self, core: &Core) -> Option<&Cluster> {
        self.clusters.get(core.cluster)
    }

    /// The package of a core from this snapshot.
    #[must_use]
    pub fn package_of_core(&self, core: &Core) -> Option<&Package> {
        self.packages.get(core.package)
    }

    /// The package of a cluster from this snapshot.
    #[must_use]
    pub fn package_of_cluster(&self, cluster: &Cluster) -> Option<&Package> {
        self.packages.get(cluster.package)
    }

    /// The processors that belong to the core at `core_index`, ordered by processor ID.
    ///
    /// Processors of one core are not necessarily adjacent in [`processors()`][Self::processors]
    /// (e.g. SMT siblings are often numbered `N` and `N + core_count`).
    pub fn processors_in_core(&self, core_index: usize) -> impl Iterator<Item = &Processor> {
        self.processors.iter().filter(move |p| p.core == core_index)
    }

    /// The processors that belong to the cluster at `cluster_index`, ordered by processor ID.
    pub fn processors_in_cluster(&self, cluster_index: usize) -> impl Iterator<Item = &Processor> {
        self.processors
            .iter()
            .filter(move |p| p.cluster == cluster_index)
    }

    /// The processors that belong to the package at `package_index`, ordered by processor ID.
    pub fn processors_in_package(&self, package_index: usize) -> impl Iterator<Item = &Processor> {
        self.processors
            .iter()
            .filter(move |p| p.package == package_index)
    }
}

fn lookup(map: &[Option<usize>], linux_id: ProcessorId) -> Option<usize> {
    map.get(usize::try_from(linux_id).ok()?).copied().flatten()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Topology: Send, Sync, Debug, Clone);
    assert_impl_all!(Processor: Send, Sync, Copy);
    assert_impl_all!(Core: Send, Sync, Copy);
    assert_impl_all!(Cluster: Send, Sync, Copy);
    assert_impl_all!(Package: Send, Sync, Copy);

    /// Two processors (1 and 3) in one core, cluster and package, with absent processors 0 and 2.
    fn sparse_topology() -> Topology {
        Topology {
            processors: vec![
                Processor {
                    linux_id: 1,
                    ..Processor::default()
                },
                Processor {
                    linux_id: 3,
                    ..Processor::default()
                },
            ]
            .into_boxed_slice(),
            cores: vec![Core {
                processor_start: 1,
                processor_count: 2,
                core_id: Some(7),
                cluster: 0,
                package: 0,
            }]
            .into_boxed_slice(),
            clusters: vec![Cluster {
                processor_start: 1,
                processor_count: 2,
                core_start: 0,
                core_count: 1,
                cluster_id: 1,
                package: 0,
            }]
            .into_boxed_slice(),
            packages: vec![Package {
                processor_start: 1,
                processor_count: 2,
                core_start: 0,
                core_count: 1,
                cluster_start: 0,
                cluster_count: 1,
            }]
            .into_boxed_slice(),
            uarchs: vec![UarchInfo {
                uarch: Uarch::Unknown,
                processor_count: 2,
                core_count: 1,
            }]
            .into_boxed_slice(),
            processor_map: vec![None, Some(0), None, Some(1)].into_boxed_slice(),
            core_map: vec![None, Some(0), None, Some(0)].into_boxed_slice(),
            uarch_map: vec![None, Some(0), None, Some(0)].into_boxed_slice(),
            isa: RiscvIsa::default(),
        }
    }

    #[test]
    fn lookup_by_linux_id() {
        let topology = sparse_topology();

        assert_eq!(topology.max_linux_id(), 3);

        assert!(topology.processor_by_linux_id(0).is_none());
        assert!(topology.processor_by_linux_id(2).is_none());
        assert_eq!(topology.processor_by_linux_id(3).unwrap().linux_id(), 3);

        // Past the end of the maps is simply absent.
        assert!(topology.processor_by_linux_id(4).is_none());
        assert!(topology.processor_by_linux_id(ProcessorId::MAX).is_none());

        assert_eq!(topology.core_by_linux_id(1).unwrap().core_id(), Some(7));
        assert!(topology.core_by_linux_id(2).is_none());

        assert_eq!(topology.uarch_index_by_linux_id(3), Some(0));
        assert_eq!(topology.uarch_index_by_linux_id(0), None);
    }

    #[test]
    fn links_resolve_upward() {
        let topology = sparse_topology();
        let processor = topology.processor_by_linux_id(3).unwrap();

        let core = topology.core_of(processor).unwrap();
        assert_eq!(core.processor_count(), 2);

        let cluster = topology.cluster_of(processor).unwrap();
        assert_eq!(topology.cluster_of_core(core), Some(cluster));

        let package = topology.package_of(processor).unwrap();
        assert_eq!(topology.package_of_core(core), Some(package));
        assert_eq!(topology.package_of_cluster(cluster), Some(package));
    }

    #[test]
    fn members_of_groups() {
        let topology = sparse_topology();

        let ids = topology
            .processors_in_core(0)
            .map(Processor::linux_id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 3]);

        assert_eq!(topology.processors_in_cluster(0).count(), 2);
        assert_eq!(topology.processors_in_package(0).count(), 2);
        assert_eq!(topology.processors_in_package(1).count(), 0);
    }

    #[test]
    fn display_names_the_processor() {
        let processor = Processor {
            linux_id: 42,
            ..Processor::default()
        };

        assert_eq!(processor.to_string(), "processor 42");
        assert_eq!(Uarch::Unknown.to_string(), "unknown");
    }
}
