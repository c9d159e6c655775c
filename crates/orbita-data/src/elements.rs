//! Tabulated atomic data for the supported elements.
//!
//! Slater exponents ζ are the single-ζ values of:
//! E. Clementi and D. L. Raimondi, *J. Chem. Phys.* **38**, 2686 (1963).
//!
//! Only valence shells participate in hybridization, so each element stores
//! its valence principal quantum number and one ζ per orbital family. The
//! d exponents of phosphorus and sulfur follow the conventional
//! hypervalent-bonding treatment; whether d orbitals truly participate in
//! such bonds is debated, and the shapes are provided for completeness.

use orbita_core::types::{Atom, SlaterExponents};

use crate::hybridization::SchemeKind;

/// A chemical element with the data needed to evaluate its valence STOs.
#[derive(Debug, Clone, Copy)]
pub struct Element {
    /// One- or two-letter symbol, e.g. "C".
    pub symbol: &'static str,
    /// English name.
    pub name: &'static str,
    /// Atomic number Z.
    pub atomic_number: u32,
    /// Valence principal quantum number.
    pub n: u32,
    /// Valence electron configuration, for display.
    pub valence_config: &'static str,
    /// Clementi–Raimondi Slater exponents per family.
    pub zeta: SlaterExponents,
    /// Hybridization schemes this element conventionally exhibits.
    pub schemes: &'static [SchemeKind],
}

impl Element {
    /// The atom descriptor used by the field evaluator.
    pub fn atom(&self) -> Atom {
        Atom {
            n: self.n,
            zeta: self.zeta,
        }
    }
}

/// The supported elements, in order of atomic number.
pub static ELEMENTS: [Element; 7] = [
    Element {
        symbol: "H",
        name: "Hydrogen",
        atomic_number: 1,
        n: 1,
        valence_config: "1s¹",
        zeta: SlaterExponents {
            s: Some(1.0),
            p: None,
            d: None,
        },
        // Not hybridized; participates as a bonding partner only.
        schemes: &[],
    },
    Element {
        symbol: "B",
        name: "Boron",
        atomic_number: 5,
        n: 2,
        valence_config: "2s²2p¹",
        zeta: SlaterExponents {
            s: Some(1.3006),
            p: Some(1.0680),
            d: None,
        },
        schemes: &[SchemeKind::Sp2],
    },
    Element {
        symbol: "C",
        name: "Carbon",
        atomic_number: 6,
        n: 2,
        valence_config: "2s²2p²",
        zeta: SlaterExponents {
            s: Some(1.5679),
            p: Some(1.5187),
            d: None,
        },
        schemes: &[SchemeKind::Sp, SchemeKind::Sp2, SchemeKind::Sp3],
    },
    Element {
        symbol: "N",
        name: "Nitrogen",
        atomic_number: 7,
        n: 2,
        valence_config: "2s²2p³",
        zeta: SlaterExponents {
            s: Some(1.9237),
            p: Some(1.9170),
            d: None,
        },
        schemes: &[SchemeKind::Sp, SchemeKind::Sp2, SchemeKind::Sp3],
    },
    Element {
        symbol: "O",
        name: "Oxygen",
        atomic_number: 8,
        n: 2,
        valence_config: "2s²2p⁴",
        zeta: SlaterExponents {
            s: Some(2.2266),
            p: Some(2.2270),
            d: None,
        },
        schemes: &[SchemeKind::Sp2, SchemeKind::Sp3],
    },
    Element {
        symbol: "P",
        name: "Phosphorus",
        atomic_number: 15,
        n: 3,
        valence_config: "3s²3p³",
        zeta: SlaterExponents {
            s: Some(1.8860),
            p: Some(1.6288),
            d: Some(1.4),
        },
        schemes: &[SchemeKind::Sp3, SchemeKind::Sp3d, SchemeKind::Sp3d2],
    },
    Element {
        symbol: "S",
        name: "Sulfur",
        atomic_number: 16,
        n: 3,
        valence_config: "3s²3p⁴",
        zeta: SlaterExponents {
            s: Some(2.1223),
            p: Some(1.8273),
            d: Some(1.5),
        },
        schemes: &[SchemeKind::Sp3, SchemeKind::Sp3d, SchemeKind::Sp3d2],
    },
];

/// Look up an element by symbol (case-insensitive).
pub fn element(symbol: &str) -> Option<&'static Element> {
    ELEMENTS
        .iter()
        .find(|e| e.symbol.eq_ignore_ascii_case(symbol))
}

/// All supported elements.
pub fn all() -> &'static [Element] {
    &ELEMENTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(element("C").unwrap().atomic_number, 6);
        assert_eq!(element("c").unwrap().atomic_number, 6);
        assert_eq!(element("h").unwrap().n, 1);
        assert!(element("Xx").is_none());
        assert!(element("").is_none());
    }

    #[test]
    fn test_ordering_and_exponent_presence() {
        let mut previous = 0;
        for e in all() {
            assert!(e.atomic_number > previous, "{} out of order", e.symbol);
            previous = e.atomic_number;
            assert!(e.zeta.s.is_some(), "{} lacks an s exponent", e.symbol);
            // Third-row hypervalent elements carry a d exponent.
            if e.n >= 3 {
                assert!(e.zeta.d.is_some(), "{} lacks a d exponent", e.symbol);
            }
        }
    }

    #[test]
    fn test_carbon_reference_values() {
        let carbon = element("C").unwrap();
        assert_eq!(carbon.n, 2);
        assert_eq!(carbon.zeta.s, Some(1.5679));
        assert_eq!(carbon.zeta.p, Some(1.5187));
        assert_eq!(carbon.zeta.d, None);
    }
}
