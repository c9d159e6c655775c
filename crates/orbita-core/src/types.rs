//! Core types shared across the Orbita framework.
//!
//! This module defines the fundamental data structures of the pipeline:
//! orbital shells, atom descriptors, and the sampled scalar field handed to
//! the isosurface extractor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Radius below which the angular part of every non-s shell is defined to be
/// zero. Removes the removable singularity of the x/r, xy/r² forms at the
/// origin.
pub const ORIGIN_EPS: f64 = 1e-12;

/// A real atomic-orbital shell, l ≤ 2.
///
/// The set is closed: only s, p, and d orbitals participate in the supported
/// hybridization schemes, so each variant carries its own angular function
/// rather than dispatching through a name table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    S,
    Px,
    Py,
    Pz,
    Dz2,
    Dxz,
    Dyz,
    Dxy,
    Dx2y2,
}

/// Which Slater exponent an atom supplies for a shell: one ζ per angular
/// momentum family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExponentFamily {
    S,
    P,
    D,
}

impl Shell {
    /// All nine shells, in s, p, d order.
    pub const ALL: [Shell; 9] = [
        Shell::S,
        Shell::Px,
        Shell::Py,
        Shell::Pz,
        Shell::Dz2,
        Shell::Dxz,
        Shell::Dyz,
        Shell::Dxy,
        Shell::Dx2y2,
    ];

    /// Azimuthal quantum number l of this shell.
    pub fn l(&self) -> u32 {
        match self {
            Shell::S => 0,
            Shell::Px | Shell::Py | Shell::Pz => 1,
            _ => 2,
        }
    }

    /// The exponent family this shell draws its ζ from.
    pub fn exponent_family(&self) -> ExponentFamily {
        match self.l() {
            0 => ExponentFamily::S,
            1 => ExponentFamily::P,
            _ => ExponentFamily::D,
        }
    }

    /// The real spherical harmonic for this shell, in Cartesian form and
    /// carrying its standard normalisation constant.
    ///
    /// `r` must equal `sqrt(x² + y² + z²)`. Every non-s shell evaluates to
    /// exactly 0 for r < [`ORIGIN_EPS`]; the s shell is constant.
    pub fn angular(&self, x: f64, y: f64, z: f64, r: f64) -> f64 {
        use std::f64::consts::PI;

        if *self != Shell::S && r < ORIGIN_EPS {
            return 0.0;
        }

        match self {
            // Y_00 = 1/(2√π)
            Shell::S => 0.5 / PI.sqrt(),
            // Real Y_1m, each with the √(3/4π) prefactor
            Shell::Px => (3.0 / (4.0 * PI)).sqrt() * x / r,
            Shell::Py => (3.0 / (4.0 * PI)).sqrt() * y / r,
            Shell::Pz => (3.0 / (4.0 * PI)).sqrt() * z / r,
            // Real Y_2m
            Shell::Dz2 => (5.0 / (16.0 * PI)).sqrt() * (2.0 * z * z - x * x - y * y) / (r * r),
            Shell::Dxz => (15.0 / (4.0 * PI)).sqrt() * x * z / (r * r),
            Shell::Dyz => (15.0 / (4.0 * PI)).sqrt() * y * z / (r * r),
            Shell::Dxy => (15.0 / (4.0 * PI)).sqrt() * x * y / (r * r),
            Shell::Dx2y2 => (15.0 / (16.0 * PI)).sqrt() * (x * x - y * y) / (r * r),
        }
    }

    /// The lowercase tag used in configuration files and AO names.
    pub fn tag(&self) -> &'static str {
        match self {
            Shell::S => "s",
            Shell::Px => "px",
            Shell::Py => "py",
            Shell::Pz => "pz",
            Shell::Dz2 => "dz2",
            Shell::Dxz => "dxz",
            Shell::Dyz => "dyz",
            Shell::Dxy => "dxy",
            Shell::Dx2y2 => "dx2y2",
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Shell {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shell::ALL
            .iter()
            .copied()
            .find(|shell| shell.tag() == s)
            .ok_or_else(|| FieldError::UnknownShell(s.to_string()))
    }
}

impl fmt::Display for ExponentFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExponentFamily::S => "s",
            ExponentFamily::P => "p",
            ExponentFamily::D => "d",
        })
    }
}

/// Slater exponents ζ per orbital family. An atom need not supply every
/// family: second-row elements carry no d exponent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlaterExponents {
    pub s: Option<f64>,
    pub p: Option<f64>,
    pub d: Option<f64>,
}

impl SlaterExponents {
    /// The exponent for a family, if the atom defines one.
    pub fn for_family(&self, family: ExponentFamily) -> Option<f64> {
        match family {
            ExponentFamily::S => self.s,
            ExponentFamily::P => self.p,
            ExponentFamily::D => self.d,
        }
    }
}

/// An immutable atom descriptor: valence principal quantum number and the
/// Slater exponents of its valence shells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// Valence principal quantum number (1, 2, or 3 for the tabulated
    /// elements).
    pub n: u32,
    /// Slater exponents per family.
    pub zeta: SlaterExponents,
}

/// A wavefunction sampled on a cubic lattice.
///
/// Values are stored flat in (z, y, x)-major order: the value at lattice
/// index `(ix, iy, iz)` lives at `iz·N² + iy·N + ix` for `N = grid_size`.
/// The cubic bounding box `[min, max]` applies identically on all three
/// axes, with lattice step `(max − min) / (grid_size − 1)`.
#[derive(Debug, Clone)]
pub struct ScalarField {
    /// `grid_size³` sampled values, (z, y, x)-major.
    pub values: Vec<f64>,
    /// Number of lattice points along each axis (≥ 2).
    pub grid_size: usize,
    /// Cubic bounds `[min, max]`, `min < max`.
    pub bounds: [f64; 2],
}

impl ScalarField {
    /// Lattice spacing along each axis.
    pub fn step(&self) -> f64 {
        (self.bounds[1] - self.bounds[0]) / (self.grid_size - 1) as f64
    }

    /// Value at lattice coordinates `(ix, iy, iz)`.
    pub fn at(&self, ix: usize, iy: usize, iz: usize) -> f64 {
        let n = self.grid_size;
        self.values[(iz * n + iy) * n + ix]
    }

    /// World-space position of lattice coordinates `(ix, iy, iz)`.
    pub fn position(&self, ix: usize, iy: usize, iz: usize) -> [f64; 3] {
        let step = self.step();
        [
            self.bounds[0] + ix as f64 * step,
            self.bounds[0] + iy as f64 * step,
            self.bounds[0] + iz as f64 * step,
        ]
    }

    /// Minimum and maximum sampled values. Useful for picking an isovalue
    /// that actually intersects the field.
    pub fn value_range(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &self.values {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        (min, max)
    }
}

/// Errors raised while assembling a scalar field.
///
/// These are precondition violations: the caller supplied a configuration
/// that cannot produce a physically meaningful field. No defaults are
/// substituted — a silently wrong surface looks plausible and misleads.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("Grid resolution must be at least 2, got {0}")]
    ResolutionTooSmall(usize),

    #[error("Unknown orbital shell tag: '{0}'")]
    UnknownShell(String),

    #[error("Atom defines no Slater exponent for the {family} family (required by the {shell} shell)")]
    MissingExponent {
        family: ExponentFamily,
        shell: Shell,
    },
}
