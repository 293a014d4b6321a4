use std::fmt::Debug;
use std::ops::Range;
#[cfg(test)]
use std::sync::Arc;

use nonempty::NonEmpty;

#[cfg(test)]
use crate::pal::MockPlatform;
#[cfg(test)]
use crate::pal::fallback::BuildTargetPlatform as FallbackPlatform;
use crate::pal::{BUILD_TARGET_PLATFORM, BuildTargetPlatform, Platform};
use crate::{CoreId, Level, ProcessorId, RiscvIsa};

/// Enum to hide the real/fallback/mock choice behind a single wrapper type.
#[derive(Clone)]
pub(crate) enum PlatformFacade {
    Target(&'static BuildTargetPlatform),

    #[cfg(test)]
    Fallback(&'static FallbackPlatform),

    #[cfg(test)]
    Mock(Arc<MockPlatform>),
}

impl PlatformFacade {
    pub(crate) fn target() -> Self {
        Self::Target(&BUILD_TARGET_PLATFORM)
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockPlatform) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

impl Platform for PlatformFacade {
    fn max_processors_count(&self) -> u32 {
        match self {
            Self::Target(p) => p.max_processors_count(),
            #[cfg(test)]
            Self::Fallback(p) => p.max_processors_count(),
            #[cfg(test)]
            Self::Mock(p) => p.max_processors_count(),
        }
    }

    fn max_present_processor(&self, max_processors_count: u32) -> Option<ProcessorId> {
        match self {
            Self::Target(p) => p.max_present_processor(max_processors_count),
            #[cfg(test)]
            Self::Fallback(p) => p.max_present_processor(max_processors_count),
            #[cfg(test)]
            Self::Mock(p) => p.max_present_processor(max_processors_count),
        }
    }

    fn present_processors(&self) -> Option<NonEmpty<Range<ProcessorId>>> {
        match self {
            Self::Target(p) => p.present_processors(),
            #[cfg(test)]
            Self::Fallback(p) => p.present_processors(),
            #[cfg(test)]
            Self::Mock(p) => p.present_processors(),
        }
    }

    fn sibling_ranges(
        &self,
        level: Level,
        processor: ProcessorId,
        max_processors_count: u32,
    ) -> Option<Vec<Range<ProcessorId>>> {
        match self {
            Self::Target(p) => p.sibling_ranges(level, processor, max_processors_count),
            #[cfg(test)]
            Self::Fallback(p) => p.sibling_ranges(level, processor, max_processors_count),
            #[cfg(test)]
            Self::Mock(p) => p.sibling_ranges(level, processor, max_processors_count),
        }
    }

    fn processor_core_id(&self, processor: ProcessorId) -> Option<CoreId> {
        match self {
            Self::Target(p) => p.processor_core_id(processor),
            #[cfg(test)]
            Self::Fallback(p) => p.processor_core_id(processor),
            #[cfg(test)]
            Self::Mock(p) => p.processor_core_id(processor),
        }
    }

    fn isa(&self) -> RiscvIsa {
        match self {
            Self::Target(p) => p.isa(),
            #[cfg(test)]
            Self::Fallback(p) => p.isa(),
            #[cfg(test)]
            Self::Mock(p) => p.isa(),
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))] // No API contract to test.
impl Debug for PlatformFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Target(inner) => inner.fmt(f),
            #[cfg(test)]
            Self::Fallback(inner) => inner.fmt(f),
            #[cfg(test)]
            Self::Mock(inner) => inner.fmt(f),
        }
    }
}
