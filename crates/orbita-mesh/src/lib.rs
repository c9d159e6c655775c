//! # Orbita Mesh
//!
//! Isosurface extraction for the Orbita framework. This crate converts a
//! scalar field sampled on a cubic lattice into an unindexed triangle list
//! with per-vertex normals, using the classic 256-case marching-cubes
//! algorithm.
//!
//! The crate is deliberately decoupled from `orbita-core`: the extractor
//! consumes a plain value slice plus lattice metadata, so any field source
//! can feed it.
//!
//! ## Modules
//!
//! - [`tables`] — The static edge and triangle case tables.
//! - [`marching`] — Cell classification, interpolation, gradient normals,
//!   and the dual-lobe extraction contract.

pub mod marching;
pub mod tables;

pub use marching::{extract_lobes, marching_cubes, MeshError, TriangleMesh};
