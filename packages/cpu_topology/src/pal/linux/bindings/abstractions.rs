use std::fmt::Debug;

/// Bindings for FFI calls into the C library.
///
/// All PAL FFI calls must go through this trait, enabling them to be mocked.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Bindings: Debug + Send + Sync + 'static {
    /// `getauxval(AT_HWCAP)`: the hardware capability word the kernel passed to this process.
    fn getauxval_hwcap(&self) -> u64;
}
