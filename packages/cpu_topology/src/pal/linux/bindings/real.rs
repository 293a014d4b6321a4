use std::fmt::Debug;

use crate::pal::linux::Bindings;

/// FFI bindings that target the real operating system that the build is targeting.
///
/// You would only use different bindings in PAL unit tests that need to use mock bindings.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetBindings;

// Real OS bindings are excluded from coverage measurement because the result depends on the
// hardware running the tests.
#[cfg_attr(coverage_nightly, coverage(off))]
impl Bindings for BuildTargetBindings {
    #[allow(
        clippy::useless_conversion,
        reason = "c_ulong is only 32 bits wide on 32-bit targets"
    )]
    fn getauxval_hwcap(&self) -> u64 {
        // SAFETY: No safety requirements. Returns 0 if the entry does not exist.
        let hwcap = unsafe { libc::getauxval(libc::AT_HWCAP) };

        u64::from(hwcap)
    }
}
