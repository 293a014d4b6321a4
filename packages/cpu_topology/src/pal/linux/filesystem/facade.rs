use std::fmt::Debug;
#[cfg(test)]
use std::sync::Arc;

use crate::ProcessorId;
#[cfg(test)]
use crate::pal::linux::MockFilesystem;
use crate::pal::linux::{BuildTargetFilesystem, Filesystem, TopologyFile};

/// Enum to hide the different filesystem implementations behind a single wrapper type.
#[derive(Clone)]
pub(crate) enum FilesystemFacade {
    Target(&'static BuildTargetFilesystem),

    #[cfg(test)]
    Mock(Arc<MockFilesystem>),
}

impl FilesystemFacade {
    pub(crate) const fn target() -> Self {
        Self::Target(&BuildTargetFilesystem)
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockFilesystem) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

impl Filesystem for FilesystemFacade {
    fn get_cpu_possible_contents(&self) -> Option<String> {
        match self {
            Self::Target(filesystem) => filesystem.get_cpu_possible_contents(),
            #[cfg(test)]
            Self::Mock(mock) => mock.get_cpu_possible_contents(),
        }
    }

    fn get_cpu_present_contents(&self) -> Option<String> {
        match self {
            Self::Target(filesystem) => filesystem.get_cpu_present_contents(),
            #[cfg(test)]
            Self::Mock(mock) => mock.get_cpu_present_contents(),
        }
    }

    fn get_cpu_kernel_max_contents(&self) -> Option<String> {
        match self {
            Self::Target(filesystem) => filesystem.get_cpu_kernel_max_contents(),
            #[cfg(test)]
            Self::Mock(mock) => mock.get_cpu_kernel_max_contents(),
        }
    }

    fn get_cpu_topology_contents(
        &self,
        cpu_index: ProcessorId,
        file: TopologyFile,
    ) -> Option<String> {
        match self {
            Self::Target(filesystem) => filesystem.get_cpu_topology_contents(cpu_index, file),
            #[cfg(test)]
            Self::Mock(mock) => mock.get_cpu_topology_contents(cpu_index, file),
        }
    }
}

impl Debug for FilesystemFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Target(inner) => inner.fmt(f),
            #[cfg(test)]
            Self::Mock(inner) => inner.fmt(f),
        }
    }
}
