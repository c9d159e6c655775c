//! Hybridization preset schemes.
//!
//! Each scheme is a fixed orthonormal coefficient matrix: one row per hybrid
//! orbital, one column per participating shell. Rows mix the shells of a
//! single atom into directional lobes; the matrices are the textbook forms
//! (linear sp, trigonal sp², tetrahedral sp³, trigonal-bipyramidal sp³d,
//! octahedral sp³d²) with exact √-fraction entries computed at
//! construction.

use std::fmt;
use std::str::FromStr;

use orbita_core::types::Shell;
use thiserror::Error;

/// Errors from scheme and AO-name lookups.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Unknown hybridization scheme: '{0}'. Valid schemes: sp, sp2, sp3, sp3d, sp3d2")]
    UnknownScheme(String),

    #[error("Unknown atomic-orbital name: '{0}'")]
    UnknownOrbital(String),

    #[error("Hybrid index {index} out of range: scheme has {count} hybrids")]
    HybridIndexOutOfRange { index: usize, count: usize },
}

/// The five supported hybridization schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeKind {
    Sp,
    Sp2,
    Sp3,
    Sp3d,
    Sp3d2,
}

impl SchemeKind {
    /// All schemes, in increasing hybrid count.
    pub const ALL: [SchemeKind; 5] = [
        SchemeKind::Sp,
        SchemeKind::Sp2,
        SchemeKind::Sp3,
        SchemeKind::Sp3d,
        SchemeKind::Sp3d2,
    ];

    /// The ASCII configuration tag ("sp3d2" style).
    pub fn tag(&self) -> &'static str {
        match self {
            SchemeKind::Sp => "sp",
            SchemeKind::Sp2 => "sp2",
            SchemeKind::Sp3 => "sp3",
            SchemeKind::Sp3d => "sp3d",
            SchemeKind::Sp3d2 => "sp3d2",
        }
    }

    /// The display label with superscripts ("sp³d²" style).
    pub fn label(&self) -> &'static str {
        match self {
            SchemeKind::Sp => "sp",
            SchemeKind::Sp2 => "sp²",
            SchemeKind::Sp3 => "sp³",
            SchemeKind::Sp3d => "sp³d",
            SchemeKind::Sp3d2 => "sp³d²",
        }
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SchemeKind {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemeKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| DataError::UnknownScheme(s.to_string()))
    }
}

/// A hybridization scheme: participating shells, orthonormal coefficient
/// rows, and geometric metadata.
#[derive(Debug, Clone)]
pub struct HybridScheme {
    pub kind: SchemeKind,
    /// Shells mixed by this scheme; column order of `coefficients`.
    pub shells: Vec<Shell>,
    /// One row per hybrid orbital; each row is unit-norm and orthogonal to
    /// the others.
    pub coefficients: Vec<Vec<f64>>,
    /// Display label per hybrid ("h1(eq)" style).
    pub labels: Vec<&'static str>,
    /// Name of the resulting electron-domain geometry.
    pub geometry: &'static str,
    /// Ideal inter-hybrid angle in degrees.
    pub ideal_angle_deg: f64,
    /// Valence shells left out of the mix.
    pub unhybridised: Vec<Shell>,
}

impl HybridScheme {
    /// Construct the scheme for a kind.
    pub fn of(kind: SchemeKind) -> Self {
        match kind {
            SchemeKind::Sp => Self::sp(),
            SchemeKind::Sp2 => Self::sp2(),
            SchemeKind::Sp3 => Self::sp3(),
            SchemeKind::Sp3d => Self::sp3d(),
            SchemeKind::Sp3d2 => Self::sp3d2(),
        }
    }

    /// Two linear hybrids along ±x.
    pub fn sp() -> Self {
        let c = 1.0 / 2.0_f64.sqrt();
        Self {
            kind: SchemeKind::Sp,
            shells: vec![Shell::S, Shell::Px],
            coefficients: vec![vec![c, c], vec![c, -c]],
            labels: vec!["h1", "h2"],
            geometry: "linear",
            ideal_angle_deg: 180.0,
            unhybridised: vec![Shell::Py, Shell::Pz],
        }
    }

    /// Three trigonal-planar hybrids in the xy-plane, 120° apart.
    pub fn sp2() -> Self {
        let s3 = 1.0 / 3.0_f64.sqrt();
        let big = (2.0 / 3.0_f64).sqrt();
        let s6 = 1.0 / 6.0_f64.sqrt();
        let s2 = 1.0 / 2.0_f64.sqrt();
        Self {
            kind: SchemeKind::Sp2,
            shells: vec![Shell::S, Shell::Px, Shell::Py],
            coefficients: vec![
                vec![s3, big, 0.0],
                vec![s3, -s6, s2],
                vec![s3, -s6, -s2],
            ],
            labels: vec!["h1", "h2", "h3"],
            geometry: "trigonal planar",
            ideal_angle_deg: 120.0,
            unhybridised: vec![Shell::Pz],
        }
    }

    /// Four tetrahedral hybrids pointing at alternating cube vertices.
    pub fn sp3() -> Self {
        let h = 0.5;
        Self {
            kind: SchemeKind::Sp3,
            shells: vec![Shell::S, Shell::Px, Shell::Py, Shell::Pz],
            coefficients: vec![
                vec![h, h, h, h],
                vec![h, h, -h, -h],
                vec![h, -h, h, -h],
                vec![h, -h, -h, h],
            ],
            labels: vec!["h1", "h2", "h3", "h4"],
            geometry: "tetrahedral",
            ideal_angle_deg: 109.5,
            unhybridised: vec![],
        }
    }

    /// Trigonal bipyramid: three sp²-like equatorial hybrids in the
    /// xy-plane plus two pd axial hybrids along ±z. Axial and equatorial
    /// hybrids are not equivalent.
    pub fn sp3d() -> Self {
        let s3 = 1.0 / 3.0_f64.sqrt();
        let big = (2.0 / 3.0_f64).sqrt();
        let s6 = 1.0 / 6.0_f64.sqrt();
        let s2 = 1.0 / 2.0_f64.sqrt();
        Self {
            kind: SchemeKind::Sp3d,
            shells: vec![Shell::S, Shell::Px, Shell::Py, Shell::Pz, Shell::Dz2],
            coefficients: vec![
                vec![s3, big, 0.0, 0.0, 0.0],
                vec![s3, -s6, s2, 0.0, 0.0],
                vec![s3, -s6, -s2, 0.0, 0.0],
                vec![0.0, 0.0, 0.0, s2, s2],
                vec![0.0, 0.0, 0.0, s2, -s2],
            ],
            labels: vec!["h1(eq)", "h2(eq)", "h3(eq)", "h4(ax)", "h5(ax)"],
            geometry: "trigonal bipyramidal",
            // Axial-equatorial angle; equatorial pairs sit at 120°.
            ideal_angle_deg: 90.0,
            unhybridised: vec![Shell::Dxz, Shell::Dyz, Shell::Dxy, Shell::Dx2y2],
        }
    }

    /// Six equivalent octahedral hybrids along ±x, ±y, ±z.
    pub fn sp3d2() -> Self {
        let s6 = 1.0 / 6.0_f64.sqrt();
        let s2 = 1.0 / 2.0_f64.sqrt();
        let s12 = 1.0 / 12.0_f64.sqrt();
        let s3 = 1.0 / 3.0_f64.sqrt();
        let h = 0.5;
        Self {
            kind: SchemeKind::Sp3d2,
            shells: vec![
                Shell::S,
                Shell::Px,
                Shell::Py,
                Shell::Pz,
                Shell::Dz2,
                Shell::Dx2y2,
            ],
            coefficients: vec![
                vec![s6, s2, 0.0, 0.0, s12, h],
                vec![s6, -s2, 0.0, 0.0, s12, h],
                vec![s6, 0.0, s2, 0.0, s12, -h],
                vec![s6, 0.0, -s2, 0.0, s12, -h],
                vec![s6, 0.0, 0.0, s2, -s3, 0.0],
                vec![s6, 0.0, 0.0, -s2, -s3, 0.0],
            ],
            labels: vec!["h1(+x)", "h2(-x)", "h3(+y)", "h4(-y)", "h5(+z)", "h6(-z)"],
            geometry: "octahedral",
            ideal_angle_deg: 90.0,
            unhybridised: vec![Shell::Dxz, Shell::Dyz, Shell::Dxy],
        }
    }

    /// Number of hybrid orbitals (coefficient rows).
    pub fn count(&self) -> usize {
        self.coefficients.len()
    }

    /// The coefficient row for one hybrid.
    pub fn row(&self, index: usize) -> Result<&[f64], DataError> {
        self.coefficients
            .get(index)
            .map(Vec::as_slice)
            .ok_or(DataError::HybridIndexOutOfRange {
                index,
                count: self.count(),
            })
    }

    /// The `(shell, coefficient)` terms of one hybrid, ready for the field
    /// evaluator.
    pub fn terms(&self, index: usize) -> Result<Vec<(Shell, f64)>, DataError> {
        let row = self.row(index)?;
        Ok(self.shells.iter().copied().zip(row.iter().copied()).collect())
    }
}

/// Parse an AO name such as `"px"` or `"2px"` into its optional principal
/// quantum number and shell.
pub fn parse_ao_name(name: &str) -> Result<(Option<u32>, Shell), DataError> {
    let trimmed = name.trim();
    let (digits, tag) = trimmed
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| trimmed.split_at(i))
        .unwrap_or((trimmed, ""));

    let n = if digits.is_empty() {
        None
    } else {
        Some(
            digits
                .parse::<u32>()
                .map_err(|_| DataError::UnknownOrbital(name.to_string()))?,
        )
    };
    let shell: Shell = tag
        .parse()
        .map_err(|_| DataError::UnknownOrbital(name.to_string()))?;
    Ok((n, shell))
}

/// Format an AO name from a principal quantum number and shell ("3dz2").
pub fn ao_name(n: u32, shell: Shell) -> String {
    format!("{n}{shell}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_tags_round_trip() {
        for kind in SchemeKind::ALL {
            let parsed: SchemeKind = kind.tag().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("sp4".parse::<SchemeKind>().is_err());
        assert!("dsp3".parse::<SchemeKind>().is_err());
    }

    #[test]
    fn test_scheme_shapes_are_consistent() {
        for kind in SchemeKind::ALL {
            let scheme = HybridScheme::of(kind);
            assert_eq!(scheme.count(), scheme.labels.len(), "{kind}");
            for row in &scheme.coefficients {
                assert_eq!(row.len(), scheme.shells.len(), "{kind}");
            }
            // No shell appears both mixed and left over.
            for shell in &scheme.unhybridised {
                assert!(!scheme.shells.contains(shell), "{kind}: {shell}");
            }
        }
    }

    #[test]
    fn test_row_index_out_of_range() {
        let scheme = HybridScheme::sp();
        assert!(scheme.row(0).is_ok());
        assert!(scheme.row(1).is_ok());
        assert!(matches!(
            scheme.row(2),
            Err(DataError::HybridIndexOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_terms_pair_shells_with_row() {
        let scheme = HybridScheme::sp();
        let terms = scheme.terms(1).unwrap();
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].0, Shell::S);
        assert_eq!(terms[1].0, Shell::Px);
        assert!(terms[1].1 < 0.0);
    }

    #[test]
    fn test_parse_ao_names() {
        assert_eq!(parse_ao_name("px").unwrap(), (None, Shell::Px));
        assert_eq!(parse_ao_name("2s").unwrap(), (Some(2), Shell::S));
        assert_eq!(parse_ao_name("3dz2").unwrap(), (Some(3), Shell::Dz2));
        assert_eq!(parse_ao_name("3dx2y2").unwrap(), (Some(3), Shell::Dx2y2));
        assert!(parse_ao_name("4f").is_err());
        assert!(parse_ao_name("2").is_err());
        assert!(parse_ao_name("").is_err());
    }

    #[test]
    fn test_ao_name_round_trip() {
        assert_eq!(ao_name(2, Shell::Px), "2px");
        let (n, shell) = parse_ao_name(&ao_name(3, Shell::Dx2y2)).unwrap();
        assert_eq!((n, shell), (Some(3), Shell::Dx2y2));
    }
}
