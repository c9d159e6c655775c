//! # Orbita Core
//!
//! The numerical backbone of the Orbita framework. This crate evaluates
//! Slater-type orbitals (STOs) and their hybrid linear combinations on
//! cubic lattices, producing the scalar fields consumed by the isosurface
//! extractor in `orbita-mesh`.
//!
//! ## Architecture
//!
//! A wavefunction is assembled from [`types::Shell`]-tagged STO terms, each
//! weighted by a mixing coefficient. The [`grid`] module samples the sum on
//! an auto-sized lattice; the extent is derived from the most diffuse
//! contributing exponent. All operations are deterministic pure functions
//! over caller-owned data — no shared mutable state, safe to invoke
//! concurrently for different atoms or mixtures.
//!
//! ## Modules
//!
//! - [`types`] — Core data structures (shells, atoms, scalar fields).
//! - [`sto`] — Single-point Slater-type orbital evaluation.
//! - [`grid`] — Lattice evaluation of hybrids, bare AOs, and custom mixtures.

pub mod grid;
pub mod sto;
pub mod types;
