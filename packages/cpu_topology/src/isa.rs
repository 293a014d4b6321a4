/// RISC-V instruction set extensions supported by the processors of the system.
///
/// Decoded from the `AT_HWCAP` auxiliary vector entry, in which the Linux kernel sets bit
/// `letter - 'A'` for every single-letter base extension that all processors support.
/// On targets other than RISC-V Linux, every extension is reported as absent.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct RiscvIsa {
    i: bool,
    e: bool,
    m: bool,
    a: bool,
    f: bool,
    d: bool,
    c: bool,
    v: bool,
}

impl RiscvIsa {
    /// Decodes the extension flags from a raw hardware capability word.
    ///
    /// Bits that do not correspond to a known extension are ignored.
    #[must_use]
    pub fn from_hwcap(hwcap: u64) -> Self {
        Self {
            i: has_letter(hwcap, b'I'),
            e: has_letter(hwcap, b'E'),
            m: has_letter(hwcap, b'M'),
            a: has_letter(hwcap, b'A'),
            f: has_letter(hwcap, b'F'),
            d: has_letter(hwcap, b'D'),
            c: has_letter(hwcap, b'C'),
            v: has_letter(hwcap, b'V'),
        }
    }

    /// Base integer instruction set ("I").
    #[inline]
    #[must_use]
    pub fn i(&self) -> bool {
        self.i
    }

    /// Reduced base integer instruction set for embedded systems ("E").
    #[inline]
    #[must_use]
    pub fn e(&self) -> bool {
        self.e
    }

    /// Integer multiplication and division ("M").
    #[inline]
    #[must_use]
    pub fn m(&self) -> bool {
        self.m
    }

    /// Atomic instructions ("A").
    #[inline]
    #[must_use]
    pub fn a(&self) -> bool {
        self.a
    }

    /// Single-precision floating point ("F").
    #[inline]
    #[must_use]
    pub fn f(&self) -> bool {
        self.f
    }

    /// Double-precision floating point ("D").
    #[inline]
    #[must_use]
    pub fn d(&self) -> bool {
        self.d
    }

    /// Compressed instructions ("C").
    #[inline]
    #[must_use]
    pub fn c(&self) -> bool {
        self.c
    }

    /// Vector operations ("V").
    #[inline]
    #[must_use]
    pub fn v(&self) -> bool {
        self.v
    }
}

const fn has_letter(hwcap: u64, letter: u8) -> bool {
    // Letters are 'A'..='Z', so the shift is always within 0..26.
    let bit = letter.wrapping_sub(b'A');
    hwcap & (1 << bit) != 0
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn hwcap_from(letters: &str) -> u64 {
        letters
            .bytes()
            .fold(0, |acc, letter| acc | (1 << (letter - b'A')))
    }

    #[test]
    fn empty_hwcap_has_nothing() {
        assert_eq!(RiscvIsa::from_hwcap(0), RiscvIsa::default());
    }

    #[test]
    fn rv64gc() {
        // "G" is shorthand for IMAFD.
        let isa = RiscvIsa::from_hwcap(hwcap_from("IMAFDC"));

        assert!(isa.i());
        assert!(isa.m());
        assert!(isa.a());
        assert!(isa.f());
        assert!(isa.d());
        assert!(isa.c());

        assert!(!isa.e());
        assert!(!isa.v());
    }

    #[test]
    fn vector_and_embedded() {
        let isa = RiscvIsa::from_hwcap(hwcap_from("EV"));

        assert!(isa.e());
        assert!(isa.v());
        assert!(!isa.i());
    }

    #[test]
    fn unknown_bits_are_ignored() {
        // 'B', 'H', 'Z' and bits beyond the alphabet have no flag.
        let noise = hwcap_from("BHZ") | (1 << 40) | (1 << 63);

        assert_eq!(RiscvIsa::from_hwcap(noise), RiscvIsa::default());
        assert_eq!(
            RiscvIsa::from_hwcap(noise | hwcap_from("I")),
            RiscvIsa::from_hwcap(hwcap_from("I"))
        );
    }
}
