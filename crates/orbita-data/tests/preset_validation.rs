//! Integration tests: orthonormality of the preset coefficient matrices and
//! coverage of the element table.
//!
//! Hybrid rows must form an orthonormal set — any drift here renders lobes
//! with the wrong relative weights, which looks plausible but is physically
//! wrong.

use approx::assert_relative_eq;
use orbita_data::elements;
use orbita_data::hybridization::{HybridScheme, SchemeKind};

#[test]
fn test_every_row_is_unit_norm() {
    for kind in SchemeKind::ALL {
        let scheme = HybridScheme::of(kind);
        for row in &scheme.coefficients {
            let sum_sq: f64 = row.iter().map(|c| c * c).sum();
            assert_relative_eq!(sum_sq, 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_rows_are_mutually_orthogonal() {
    for kind in SchemeKind::ALL {
        let scheme = HybridScheme::of(kind);
        for i in 0..scheme.count() {
            for j in (i + 1)..scheme.count() {
                let dot: f64 = scheme.coefficients[i]
                    .iter()
                    .zip(scheme.coefficients[j].iter())
                    .map(|(a, b)| a * b)
                    .sum();
                assert!(
                    dot.abs() < 1e-9,
                    "{kind} rows {i} and {j}: dot product = {dot}"
                );
            }
        }
    }
}

#[test]
fn test_sp_rows_match_reference_signs() {
    // The sp pair is (s ± px)/√2; the second row's p coefficient is the
    // negative of the first's.
    let scheme = HybridScheme::sp();
    let c = 1.0 / 2.0_f64.sqrt();
    assert!((scheme.coefficients[0][0] - c).abs() < 1e-15);
    assert!((scheme.coefficients[0][1] - c).abs() < 1e-15);
    assert!((scheme.coefficients[1][0] - c).abs() < 1e-15);
    assert!((scheme.coefficients[1][1] + c).abs() < 1e-15);
}

#[test]
fn test_elements_support_their_listed_schemes() {
    // Every scheme an element advertises must be evaluable: the atom needs
    // an exponent for each participating shell family.
    for element in elements::all() {
        let atom = element.atom();
        for &kind in element.schemes {
            let scheme = HybridScheme::of(kind);
            for shell in &scheme.shells {
                assert!(
                    atom.zeta.for_family(shell.exponent_family()).is_some(),
                    "{} lists {} but lacks a ζ for {}",
                    element.symbol,
                    kind,
                    shell
                );
            }
        }
    }
}

#[test]
fn test_scheme_counts() {
    let expected = [
        (SchemeKind::Sp, 2),
        (SchemeKind::Sp2, 3),
        (SchemeKind::Sp3, 4),
        (SchemeKind::Sp3d, 5),
        (SchemeKind::Sp3d2, 6),
    ];
    for (kind, count) in expected {
        assert_eq!(HybridScheme::of(kind).count(), count, "{kind}");
    }
}
