use std::ops::Range;

use nonempty::NonEmpty;
use tracing::warn;

use crate::pal::Platform;
use crate::pal::linux::{Bindings, BindingsFacade, Filesystem, FilesystemFacade, TopologyFile};
use crate::pal::linux::sibling_list;
use crate::{CoreId, Level, ProcessorId, RiscvIsa};

/// Used when neither the `possible` list nor `kernel_max` can be read.
pub(crate) const DEFAULT_MAX_PROCESSORS_COUNT: u32 = 4096;

/// Processor topology as reported by the Linux kernel through sysfs.
#[derive(Debug)]
pub(crate) struct BuildTargetPlatform {
    bindings: BindingsFacade,
    fs: FilesystemFacade,
}

/// Singleton instance of `BuildTargetPlatform`, used by public API types
/// to hook up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform =
    BuildTargetPlatform::new(BindingsFacade::target(), FilesystemFacade::target());

impl BuildTargetPlatform {
    pub(crate) const fn new(bindings: BindingsFacade, fs: FilesystemFacade) -> Self {
        Self { bindings, fs }
    }

    fn possible_count(&self) -> Option<u32> {
        let contents = self.fs.get_cpu_possible_contents()?;
        let ranges = parse_list(&contents, "possible")?;

        // Ranges are sorted, so the end of the last one is the highest ID plus one.
        ranges.last().map(|range| range.end)
    }

    fn kernel_max_count(&self) -> Option<u32> {
        let contents = self.fs.get_cpu_kernel_max_contents()?;
        let kernel_max = contents.trim().parse::<u32>().ok()?;

        kernel_max.checked_add(1)
    }

    fn present_ranges(&self) -> Option<Vec<Range<ProcessorId>>> {
        let contents = self.fs.get_cpu_present_contents()?;
        parse_list(&contents, "present")
    }
}

impl Platform for BuildTargetPlatform {
    fn max_processors_count(&self) -> u32 {
        self.possible_count()
            .or_else(|| {
                warn!("processor 'possible' list is unavailable, falling back to 'kernel_max'");
                self.kernel_max_count()
            })
            .unwrap_or_else(|| {
                warn!(
                    count = DEFAULT_MAX_PROCESSORS_COUNT,
                    "processor 'kernel_max' is unavailable, assuming default processor count"
                );
                DEFAULT_MAX_PROCESSORS_COUNT
            })
    }

    fn max_present_processor(&self, max_processors_count: u32) -> Option<ProcessorId> {
        let max_allowed = max_processors_count.checked_sub(1)?;
        let max_present = self.present_ranges()?.last()?.end.checked_sub(1)?;

        if max_present > max_allowed {
            warn!(
                max_present,
                max_allowed, "present processor IDs exceed the possible processor count"
            );

            return Some(max_allowed);
        }

        Some(max_present)
    }

    fn present_processors(&self) -> Option<NonEmpty<Range<ProcessorId>>> {
        NonEmpty::from_vec(self.present_ranges()?)
    }

    fn sibling_ranges(
        &self,
        level: Level,
        processor: ProcessorId,
        max_processors_count: u32,
    ) -> Option<Vec<Range<ProcessorId>>> {
        // Newer names first. Kernels before 5.16 have no cluster level; there, every package
        // is treated as one cluster.
        let candidates: &[TopologyFile] = match level {
            Level::Core => &[TopologyFile::CoreCpusList, TopologyFile::ThreadSiblingsList],
            Level::Cluster => &[
                TopologyFile::ClusterCpusList,
                TopologyFile::PackageCpusList,
                TopologyFile::CoreSiblingsList,
            ],
            Level::Package => &[
                TopologyFile::PackageCpusList,
                TopologyFile::CoreSiblingsList,
            ],
        };

        let (file, contents) = candidates.iter().find_map(|&file| {
            self.fs
                .get_cpu_topology_contents(processor, file)
                .map(|contents| (file, contents))
        })?;

        let ranges = parse_list(&contents, file.file_name())?;

        Some(
            ranges
                .into_iter()
                .filter(|range| range.start < max_processors_count)
                .map(|range| range.start..range.end.min(max_processors_count))
                .collect(),
        )
    }

    fn processor_core_id(&self, processor: ProcessorId) -> Option<CoreId> {
        self.fs
            .get_cpu_topology_contents(processor, TopologyFile::CoreId)?
            .trim()
            .parse()
            .ok()
    }

    fn isa(&self) -> RiscvIsa {
        // The capability word has an architecture-specific layout. Only the RISC-V layout is
        // understood here.
        if cfg!(any(target_arch = "riscv32", target_arch = "riscv64")) {
            RiscvIsa::from_hwcap(self.bindings.getauxval_hwcap())
        } else {
            RiscvIsa::default()
        }
    }
}

fn parse_list(contents: &str, file: &str) -> Option<Vec<Range<ProcessorId>>> {
    sibling_list::parse(contents)
        .inspect_err(|error| warn!(file, %error, "ignoring unparseable processor list"))
        .ok()
}

#[allow(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    reason = "we need not worry in tests"
)]
