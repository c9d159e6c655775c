//! Lattice evaluation of hybrid orbitals, bare AOs, and custom mixtures.
//!
//! The bounding box is derived from the most diffuse contributing exponent
//! and the sum over weighted STO terms is evaluated at every lattice point
//! as a data-parallel map over flat indices. Output values are identical to
//! the sequential triple loop regardless of the execution strategy.

use rayon::prelude::*;

use crate::sto::evaluate_sto;
use crate::types::{Atom, FieldError, ScalarField, Shell};

/// Extent heuristic margin: the box half-width is `(n + EXTENT_MARGIN) / ζ_min`.
///
/// Empirical rule carried over from the reference tables: it encloses
/// roughly 95% of the orbital density for the tabulated exponents. This is a
/// tunable constant, not a derived physical bound.
pub const EXTENT_MARGIN: f64 = 5.0;

/// Coefficient magnitude below which a term is skipped during summation.
/// Pure optimisation; dropping such terms changes results only below float
/// noise.
const COEFF_EPS: f64 = 1e-15;

/// A term with its exponent resolved from the atom's tables.
#[derive(Debug, Clone, Copy)]
struct ResolvedTerm {
    shell: Shell,
    coefficient: f64,
    zeta: f64,
}

/// Cubic bounds sized to the most diffuse exponent: `±(n + margin) / ζ_min`.
fn grid_bounds(n: u32, zeta_min: f64) -> [f64; 2] {
    let r_max = (n as f64 + EXTENT_MARGIN) / zeta_min;
    [-r_max, r_max]
}

/// Resolve each term's ζ, failing fast when the atom lacks the family.
///
/// A missing exponent is an error even for a zero coefficient: the row
/// names the shell, so the configuration is wrong, and silently narrowing
/// the bounds would render a plausible-looking but incorrect surface.
fn resolve_terms(atom: &Atom, terms: &[(Shell, f64)]) -> Result<Vec<ResolvedTerm>, FieldError> {
    terms
        .iter()
        .map(|&(shell, coefficient)| {
            let family = shell.exponent_family();
            let zeta = atom
                .zeta
                .for_family(family)
                .ok_or(FieldError::MissingExponent { family, shell })?;
            Ok(ResolvedTerm {
                shell,
                coefficient,
                zeta,
            })
        })
        .collect()
}

/// Evaluate the weighted STO sum at every lattice point.
fn evaluate_lattice(
    atom: &Atom,
    terms: &[ResolvedTerm],
    grid_size: usize,
    bounds: [f64; 2],
) -> Vec<f64> {
    let n = atom.n;
    let step = (bounds[1] - bounds[0]) / (grid_size - 1) as f64;
    let plane = grid_size * grid_size;

    log::debug!(
        "evaluating {}³ lattice over [{:.3}, {:.3}] with {} terms",
        grid_size,
        bounds[0],
        bounds[1],
        terms.len()
    );

    (0..grid_size * plane)
        .into_par_iter()
        .map(|idx| {
            let iz = idx / plane;
            let iy = (idx / grid_size) % grid_size;
            let ix = idx % grid_size;
            let point = [
                bounds[0] + ix as f64 * step,
                bounds[0] + iy as f64 * step,
                bounds[0] + iz as f64 * step,
            ];

            let mut value = 0.0;
            for term in terms {
                if term.coefficient.abs() < COEFF_EPS {
                    continue;
                }
                value += term.coefficient * evaluate_sto(point, n, term.zeta, term.shell);
            }
            value
        })
        .collect()
}

fn build_field(
    atom: &Atom,
    terms: &[ResolvedTerm],
    grid_size: usize,
) -> Result<ScalarField, FieldError> {
    if grid_size < 2 {
        return Err(FieldError::ResolutionTooSmall(grid_size));
    }

    // The smallest exponent is the most diffuse orbital and therefore sets
    // the box. Every term participates, including zero-coefficient columns
    // of a preset row.
    let zeta_min = terms
        .iter()
        .map(|t| t.zeta)
        .fold(f64::INFINITY, f64::min);
    let bounds = grid_bounds(atom.n, zeta_min);

    let values = evaluate_lattice(atom, terms, grid_size, bounds);
    Ok(ScalarField {
        values,
        grid_size,
        bounds,
    })
}

/// Evaluate a hybrid-orbital row on an auto-sized lattice.
///
/// `terms` pairs each participating shell with its mixing coefficient; for
/// standard hybridization presets the caller supplies an orthonormal row
/// (Σc² = 1). Coefficients are used as given — no renormalisation.
///
/// # Arguments
/// * `atom` - Atom descriptor supplying n and the ζ tables.
/// * `terms` - `(shell, coefficient)` pairs of the hybrid row.
/// * `grid_size` - Lattice points per axis (≥ 2).
pub fn hybrid_field(
    atom: &Atom,
    terms: &[(Shell, f64)],
    grid_size: usize,
) -> Result<ScalarField, FieldError> {
    let resolved = resolve_terms(atom, terms)?;
    build_field(atom, &resolved, grid_size)
}

/// Evaluate a single bare atomic orbital (coefficient 1).
///
/// Used for AO previews, typically at a lower resolution than hybrids.
pub fn single_ao_field(
    atom: &Atom,
    shell: Shell,
    grid_size: usize,
) -> Result<ScalarField, FieldError> {
    hybrid_field(atom, &[(shell, 1.0)], grid_size)
}

/// Evaluate an arbitrary weighted AO mixture, normalising the weights.
///
/// Raw weights are divided by √(Σw²) before summation, so the resulting
/// hybrid has unit norm insofar as the underlying AOs are orthonormal.
/// That holds exactly in the continuum but only approximately on a finite
/// lattice; the discrepancy is accepted, not corrected.
///
/// Returns `Ok(None)` — "nothing to render", not an error — when the term
/// list is empty or every weight is below the skip epsilon.
pub fn custom_mixture_field(
    atom: &Atom,
    terms: &[(Shell, f64)],
    grid_size: usize,
) -> Result<Option<ScalarField>, FieldError> {
    if terms.is_empty() {
        return Ok(None);
    }

    let resolved = resolve_terms(atom, terms)?;

    let sum_sq: f64 = resolved.iter().map(|t| t.coefficient * t.coefficient).sum();
    let norm = sum_sq.sqrt();
    if norm < COEFF_EPS {
        // An all-zero weight vector has no direction to normalise along.
        return Ok(None);
    }

    let normalised: Vec<ResolvedTerm> = resolved
        .iter()
        .map(|t| ResolvedTerm {
            coefficient: t.coefficient / norm,
            ..*t
        })
        .collect();

    build_field(atom, &normalised, grid_size).map(Some)
}
