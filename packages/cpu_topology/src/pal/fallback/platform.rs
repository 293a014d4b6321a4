use std::ops::Range;

use nonempty::NonEmpty;

use crate::pal::Platform;
use crate::{CoreId, Level, ProcessorId, RiscvIsa};

/// Platform for builds without a native topology source (operating systems other than Linux,
/// and Miri, which cannot read the real sysfs).
///
/// It reports no present processors, so discovery always fails and the system topology is
/// never published.
#[derive(Debug)]
pub(crate) struct BuildTargetPlatform;

/// Singleton instance of `BuildTargetPlatform`, used by public API types
/// to hook up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform = BuildTargetPlatform;

impl Platform for BuildTargetPlatform {
    fn max_processors_count(&self) -> u32 {
        0
    }

    fn max_present_processor(&self, _max_processors_count: u32) -> Option<ProcessorId> {
        None
    }

    fn present_processors(&self) -> Option<NonEmpty<Range<ProcessorId>>> {
        None
    }

    fn sibling_ranges(
        &self,
        _level: Level,
        _processor: ProcessorId,
        _max_processors_count: u32,
    ) -> Option<Vec<Range<ProcessorId>>> {
        None
    }

    fn processor_core_id(&self, _processor: ProcessorId) -> Option<CoreId> {
        None
    }

    fn isa(&self) -> RiscvIsa {
        RiscvIsa::default()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn reports_nothing() {
        let platform = &BUILD_TARGET_PLATFORM;

        assert_eq!(platform.max_processors_count(), 0);
        assert!(platform.max_present_processor(4096).is_none());
        assert!(platform.present_processors().is_none());
        assert!(platform.sibling_ranges(Level::Core, 0, 4096).is_none());
        assert!(platform.processor_core_id(0).is_none());
        assert_eq!(platform.isa(), RiscvIsa::default());
    }
}
