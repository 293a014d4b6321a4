//! Discovers the processor topology of the current system and prints it to the terminal,
//! one package at a time.
//!
//! Discovery diagnostics at debug level and above are logged to stdout.

use cpu_topology::SystemTopology;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    if !SystemTopology::initialize() {
        println!("Processor topology is not available on this system.");
        return;
    }

    let Some(topology) = SystemTopology::get() else {
        return;
    };

    for (package_index, package) in topology.packages().iter().enumerate() {
        println!(
            "Package {package_index}: {} processors, {} cores, {} clusters",
            package.processor_count(),
            package.core_count(),
            package.cluster_count()
        );

        for (core_index, core) in topology.cores().iter().enumerate() {
            if core.package_index() != package_index {
                continue;
            }

            let members = topology
                .processors_in_core(core_index)
                .map(|processor| processor.linux_id().to_string())
                .collect::<Vec<_>>()
                .join(", ");

            match core.core_id() {
                Some(core_id) => println!(
                    "  core {core_id} (cluster {}): processors {members}",
                    core.cluster_index()
                ),
                None => println!(
                    "  core at index {core_index} (cluster {}): processors {members}",
                    core.cluster_index()
                ),
            }
        }
    }

    let isa = topology.isa();
    println!(
        "RISC-V extensions: I={} E={} M={} A={} F={} D={} C={} V={}",
        isa.i(),
        isa.e(),
        isa.m(),
        isa.a(),
        isa.f(),
        isa.d(),
        isa.c(),
        isa.v()
    );
}
