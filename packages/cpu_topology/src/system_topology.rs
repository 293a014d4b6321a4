use std::marker::PhantomData;

use crate::pal::PlatformFacade;
use crate::publication::Publication;
use crate::{Cluster, Core, Package, Processor, ProcessorId, RiscvIsa, Topology, UarchInfo};

static SYSTEM: Publication = Publication::new();

/// The processor topology of the current system, discovered once per process.
///
/// Call [`initialize()`][Self::initialize] once (from any thread, any number of times) before
/// querying. Until a topology has been published, every query returns an empty slice or `None`.
/// If discovery fails, the topology is never published; the failure is logged through `tracing`.
///
/// The published topology never changes, even if processors are later brought online or
/// offline.
///
/// # Example
///
/// ```
/// use cpu_topology::SystemTopology;
///
/// if SystemTopology::initialize() {
///     println!(
///         "{} processors in {} cores and {} packages",
///         SystemTopology::processors().len(),
///         SystemTopology::cores().len(),
///         SystemTopology::packages().len()
///     );
/// } else {
///     println!("processor topology is not available on this system");
/// }
/// ```
#[derive(Debug)]
pub struct SystemTopology {
    _no_ctor: PhantomData<()>,
}

impl SystemTopology {
    /// Discovers and publishes the topology of the system, unless that was already attempted.
    ///
    /// Returns whether a topology is published. Concurrent callers block until the first
    /// attempt finishes. A failed attempt is not retried.
    #[cfg_attr(test, mutants::skip)] // Trivial layer, we only test the underlying logic.
    pub fn initialize() -> bool {
        SYSTEM.initialize_with(&PlatformFacade::target())
    }

    /// Whether a topology has been published.
    #[cfg_attr(test, mutants::skip)] // Trivial layer, we only test the underlying logic.
    #[inline]
    #[must_use]
    pub fn is_initialized() -> bool {
        SYSTEM.is_ready()
    }

    /// The published topology snapshot, if any.
    #[cfg_attr(test, mutants::skip)] // Trivial layer, we only test the underlying logic.
    #[inline]
    #[must_use]
    pub fn get() -> Option<&'static Topology> {
        SYSTEM.get()
    }

    /// All logical processors, ordered by processor ID.
    #[must_use]
    pub fn processors() -> &'static [Processor] {
        Self::get().map(Topology::processors).unwrap_or_default()
    }

    /// All cores, ordered by the smallest processor ID they contain.
    #[must_use]
    pub fn cores() -> &'static [Core] {
        Self::get().map(Topology::cores).unwrap_or_default()
    }

    /// All clusters, ordered by the smallest processor ID they contain.
    #[must_use]
    pub fn clusters() -> &'static [Cluster] {
        Self::get().map(Topology::clusters).unwrap_or_default()
    }

    /// All packages, ordered by the smallest processor ID they contain.
    #[must_use]
    pub fn packages() -> &'static [Package] {
        Self::get().map(Topology::packages).unwrap_or_default()
    }

    /// All micro-architectures present on the system.
    #[must_use]
    pub fn uarchs() -> &'static [UarchInfo] {
        Self::get().map(Topology::uarchs).unwrap_or_default()
    }

    /// The processor with the operating system processor ID `linux_id`.
    #[must_use]
    pub fn processor(linux_id: ProcessorId) -> Option<&'static Processor> {
        Self::get()?.processor_by_linux_id(linux_id)
    }

    /// The core of the processor with the operating system processor ID `linux_id`.
    #[must_use]
    pub fn core(linux_id: ProcessorId) -> Option<&'static Core> {
        Self::get()?.core_by_linux_id(linux_id)
    }

    /// The index into [`uarchs()`][Self::uarchs] of the processor with the operating system
    /// processor ID `linux_id`.
    #[must_use]
    pub fn uarch_index(linux_id: ProcessorId) -> Option<usize> {
        Self::get()?.uarch_index_by_linux_id(linux_id)
    }

    /// The instruction set extensions supported by all processors.
    #[must_use]
    pub fn isa() -> Option<&'static RiscvIsa> {
        Self::get().map(Topology::isa)
    }
}
