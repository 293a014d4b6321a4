use std::fmt::Debug;
use std::ops::Range;

use nonempty::NonEmpty;

use crate::{CoreId, Level, ProcessorId, RiscvIsa};

/// The operating system facts that topology discovery is built from.
///
/// Processor lists are expressed as half-open ranges of processor IDs, in increasing order and
/// without overlap. A `None` result means the information could not be obtained at all.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// The number of processor IDs the operating system could ever use. Every processor ID
    /// reported by the platform is below this value.
    fn max_processors_count(&self) -> u32;

    /// The highest ID of any processor that is present on the system, limited to IDs below
    /// `max_processors_count`.
    fn max_present_processor(&self, max_processors_count: u32) -> Option<ProcessorId>;

    /// The IDs of all processors present on the system.
    fn present_processors(&self) -> Option<NonEmpty<Range<ProcessorId>>>;

    /// The IDs of all processors that share the same group as `processor` at `level`,
    /// including `processor` itself. IDs at or above `max_processors_count` are dropped.
    fn sibling_ranges(
        &self,
        level: Level,
        processor: ProcessorId,
        max_processors_count: u32,
    ) -> Option<Vec<Range<ProcessorId>>>;

    /// The hardware ID of the core that `processor` belongs to, if the platform exposes one.
    fn processor_core_id(&self, processor: ProcessorId) -> Option<CoreId>;

    /// The instruction set extensions supported by all processors.
    fn isa(&self) -> RiscvIsa;
}
