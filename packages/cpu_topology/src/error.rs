use std::collections::TryReserveError;

use thiserror::Error;

use crate::{Level, ProcessorId};

/// Errors that can stop topology discovery.
///
/// Discovery either produces a complete topology or none at all; there is no partial result.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The operating system did not report any present processor.
    #[error("failed to discover any processors")]
    NoProcessors,

    /// The set of present processors could not be determined or contained no usable processor.
    #[error("failed to detect present processors")]
    PresenceDetection,

    /// The sibling list of a processor could not be read or contained no valid processor.
    #[error("failed to detect {level} siblings of processor {processor}")]
    SiblingDetection {
        /// The hierarchy level whose sibling list failed.
        level: Level,

        /// The processor whose sibling list failed.
        processor: ProcessorId,
    },

    /// A processor refers to a leader at some level that was never materialized.
    #[error("processor {processor} refers to a {level} leader that does not exist")]
    DanglingLeader {
        /// The hierarchy level of the missing leader.
        level: Level,

        /// The processor that refers to the missing leader.
        processor: ProcessorId,
    },

    /// Memory for one of the topology tables could not be allocated.
    #[error("failed to allocate {count} {what}")]
    Allocation {
        /// What kind of records were being allocated.
        what: &'static str,

        /// How many records were requested.
        count: usize,

        /// The underlying allocation failure.
        #[source]
        source: TryReserveError,
    },
}

/// A specialized `Result` type for topology discovery, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::error::Error as _;
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn messages_name_the_failure() {
        let error = Error::SiblingDetection {
            level: Level::Cluster,
            processor: 12,
        };

        assert_eq!(
            error.to_string(),
            "failed to detect cluster siblings of processor 12"
        );
    }

    #[test]
    fn allocation_error_keeps_source() {
        let source = Vec::<u64>::new().try_reserve_exact(usize::MAX).unwrap_err();

        let error = Error::Allocation {
            what: "cores",
            count: usize::MAX,
            source,
        };

        assert!(error.source().is_some());
        assert!(error.to_string().starts_with("failed to allocate"));
    }
}
