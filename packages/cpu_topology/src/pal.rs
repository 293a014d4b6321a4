//! Platform Abstraction Layer (PAL). Everything the discovery pass needs to know about the
//! operating system goes through the [`Platform`] trait, so the algorithm can be exercised
//! against mock platforms in tests.

mod abstractions;
pub(crate) use abstractions::*;

mod facade;
pub(crate) use facade::*;

#[cfg(all(target_os = "linux", not(miri)))]
mod linux;
#[cfg(all(target_os = "linux", not(miri)))]
pub(crate) use linux::*;

// The fallback module is compiled in test mode on all platforms, under Miri, and as the primary
// implementation on other operating systems. It is only glob-imported when it is the primary
// implementation; on Linux in test mode it must be accessed via the explicit `fallback::` path.
#[cfg(any(test, miri, not(target_os = "linux")))]
pub(crate) mod fallback;

#[cfg(any(miri, not(target_os = "linux")))]
pub(crate) use fallback::*;
