//! # Orbita Data
//!
//! Embedded reference data for the Orbita framework:
//!
//! - **Elements** ([`elements`]) — Valence quantum numbers and
//!   Clementi–Raimondi Slater exponents for the supported main-group
//!   elements.
//! - **Hybridization schemes** ([`hybridization`]) — The standard preset
//!   coefficient matrices (sp through sp³d²) with their geometric metadata.
//!
//! Data is embedded at compile time; lookups never touch the filesystem.

pub mod elements;
pub mod hybridization;
