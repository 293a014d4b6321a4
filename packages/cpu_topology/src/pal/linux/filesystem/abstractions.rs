#![cfg_attr(
    test,
    expect(
        clippy::struct_field_names,
        reason = "false positive from automock generated code"
    )
)]

use std::fmt::Debug;

use crate::ProcessorId;

/// Linux exposes processor topology as a virtual filesystem under `/sys/devices/system/cpu`.
/// This trait abstracts that filesystem to allow it to be mocked.
///
/// All I/O is synchronous and blocking; the data never lives on a real storage device. Every
/// method returns `None` if the file does not exist or cannot be read.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Filesystem: Debug + Send + Sync + 'static {
    /// Contents of `/sys/devices/system/cpu/possible`.
    ///
    /// Lists every processor ID that could ever be brought online, in cpulist format.
    fn get_cpu_possible_contents(&self) -> Option<String>;

    /// Contents of `/sys/devices/system/cpu/present`.
    ///
    /// Lists every processor ID that is physically present, in cpulist format.
    fn get_cpu_present_contents(&self) -> Option<String>;

    /// Contents of `/sys/devices/system/cpu/kernel_max`.
    ///
    /// A single number: the highest processor ID the kernel was built to support.
    fn get_cpu_kernel_max_contents(&self) -> Option<String>;

    /// Contents of `/sys/devices/system/cpu/cpu{cpu_index}/topology/{file}`.
    fn get_cpu_topology_contents(&self, cpu_index: ProcessorId, file: TopologyFile)
    -> Option<String>;
}

/// The files in the per-processor `topology` directory that discovery reads.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum TopologyFile {
    /// Processors in the same core (kernel 5.16+).
    CoreCpusList,

    /// Processors in the same core (older name of `core_cpus_list`).
    ThreadSiblingsList,

    /// Processors in the same cluster (kernel 5.16+, only where the firmware describes clusters).
    ClusterCpusList,

    /// Processors in the same package (kernel 5.16+).
    PackageCpusList,

    /// Processors in the same package (older name of `package_cpus_list`).
    CoreSiblingsList,

    /// The hardware core ID as a single number.
    CoreId,
}

impl TopologyFile {
    pub(crate) const fn file_name(self) -> &'static str {
        match self {
            Self::CoreCpusList => "core_cpus_list",
            Self::ThreadSiblingsList => "thread_siblings_list",
            Self::ClusterCpusList => "cluster_cpus_list",
            Self::PackageCpusList => "package_cpus_list",
            Self::CoreSiblingsList => "core_siblings_list",
            Self::CoreId => "core_id",
        }
    }
}
