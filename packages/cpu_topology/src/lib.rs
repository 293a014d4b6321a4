#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Discovers how the logical processors of a Linux system are grouped into cores, clusters and
//! packages, and publishes the result once per process as an immutable snapshot.
//!
//! This is part of the [Folo project](https://github.com/folo-rs/folo) that provides mechanisms for
//! high-performance hardware-aware programming in Rust.
//!
//! # Hierarchy
//!
//! * A **processor** is a logical processor, as numbered by the operating system
//!   (`/sys/devices/system/cpu/cpuN`).
//! * A **core** is a group of processors that share one physical core (SMT siblings).
//! * A **cluster** is a group of cores that share some resource, typically a cache level. On
//!   kernels that do not report clusters, every package forms one cluster.
//! * A **package** is a physical processor socket.
//!
//! Every group is identified by its smallest member processor ID. All entities are stored in
//! flat arrays of a [`Topology`] and refer upward to each other by index.
//!
//! # Example
//!
//! ```
//! use cpu_topology::SystemTopology;
//!
//! if SystemTopology::initialize() {
//!     let topology = SystemTopology::get().unwrap();
//!
//!     for processor in topology.processors() {
//!         let core = topology.core_of(processor).unwrap();
//!         let package = topology.package_of(processor).unwrap();
//!
//!         println!(
//!             "{processor} is in the core starting at {} and the package starting at {}",
//!             core.processor_start(),
//!             package.processor_start()
//!         );
//!     }
//! }
//! ```
//!
//! # Instruction set
//!
//! On RISC-V Linux, the base instruction set extensions supported by all processors are decoded
//! from the hardware capability word and exposed via [`Topology::isa()`]. On other architectures
//! every extension is reported as absent.
//!
//! # Unsupported platforms
//!
//! On operating systems other than Linux (and under Miri) the package compiles, but discovery
//! always fails: [`SystemTopology::initialize()`] returns `false` and all queries return empty
//! results.
//!
//! # Logging
//!
//! Discovery reports failures and fallbacks through [`tracing`](https://docs.rs/tracing). No
//! subscriber is installed by this package.

mod discovery;
mod error;
mod flags;
mod isa;
mod materialize;
mod pal;
mod primitive_types;
mod publication;
mod reducer;
mod slots;
mod system_topology;
mod topology;

#[cfg(test)]
#[allow(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    reason = "we need not worry in tests"
)]
mod test_helpers;

pub use error::*;
pub use isa::*;
pub use primitive_types::*;
pub use system_topology::SystemTopology;
pub use topology::*;
