use std::fmt::Debug;
use std::fs;

use crate::ProcessorId;
use crate::pal::linux::{Filesystem, TopologyFile};

/// The virtual filesystem for the real operating system that the build is targeting.
///
/// You would only use different filesystems in PAL unit tests that need to use a mock filesystem.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetFilesystem;

// Real filesystem access is excluded from coverage measurement because which files exist
// depends on the kernel version and the firmware of the machine running the tests.
#[cfg_attr(coverage_nightly, coverage(off))]
impl Filesystem for BuildTargetFilesystem {
    fn get_cpu_possible_contents(&self) -> Option<String> {
        fs::read_to_string("/sys/devices/system/cpu/possible").ok()
    }

    fn get_cpu_present_contents(&self) -> Option<String> {
        fs::read_to_string("/sys/devices/system/cpu/present").ok()
    }

    fn get_cpu_kernel_max_contents(&self) -> Option<String> {
        fs::read_to_string("/sys/devices/system/cpu/kernel_max").ok()
    }

    fn get_cpu_topology_contents(
        &self,
        cpu_index: ProcessorId,
        file: TopologyFile,
    ) -> Option<String> {
        fs::read_to_string(format!(
            "/sys/devices/system/cpu/cpu{cpu_index}/topology/{}",
            file.file_name()
        ))
        .ok()
    }
}
