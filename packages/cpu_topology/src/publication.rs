use std::sync::OnceLock;

use tracing::error;

use crate::Topology;
use crate::discovery::discover;
use crate::pal::Platform;

/// Holds the outcome of a single discovery attempt for the lifetime of its owner.
///
/// The first call to [`initialize_with()`][Self::initialize_with] runs discovery; concurrent
/// callers wait for it to finish and later callers observe the stored outcome. A failed attempt
/// is final: the publication then stays empty forever.
///
/// Readers that observe a published topology also observe every write made while building it.
#[derive(Debug)]
pub(crate) struct Publication {
    state: OnceLock<Option<Topology>>,
}

impl Publication {
    pub(crate) const fn new() -> Self {
        Self {
            state: OnceLock::new(),
        }
    }

    /// Runs discovery against `platform` unless an attempt was already made.
    ///
    /// Returns whether a topology is published.
    pub(crate) fn initialize_with(&self, platform: &impl Platform) -> bool {
        self.state
            .get_or_init(|| {
                discover(platform)
                    .inspect_err(|error| error!(%error, "processor topology is not available"))
                    .ok()
            })
            .is_some()
    }

    /// Whether a topology has been published.
    pub(crate) fn is_ready(&self) -> bool {
        self.get().is_some()
    }

    /// The published topology, or `None` if discovery has not run or failed.
    pub(crate) fn get(&self) -> Option<&Topology> {
        self.state.get().and_then(Option::as_ref)
    }
}
