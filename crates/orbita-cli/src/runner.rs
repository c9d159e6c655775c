//! Job runner: ties together element data, field evaluation, and
//! isosurface extraction, then writes the meshes.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use orbita_core::grid::{custom_mixture_field, hybrid_field, single_ao_field};
use orbita_core::types::{Atom, ScalarField, Shell};
use orbita_data::elements;
use orbita_data::hybridization::{self, HybridScheme, SchemeKind};
use orbita_mesh::{extract_lobes, TriangleMesh};

use crate::config::{JobConfig, OrbitalConfig, SelectionSpec};

/// Default lattice resolutions, matching the interactive viewer's choices:
/// full resolution for hybrids and mixtures, a lighter preview for bare AOs.
const DEFAULT_HYBRID_RESOLUTION: usize = 64;
const DEFAULT_AO_RESOLUTION: usize = 32;

/// How a planned entry's terms should be evaluated.
#[derive(Debug)]
enum EntryKind {
    /// An orthonormal preset row, used as given.
    Hybrid,
    /// A single bare AO.
    BareAo(Shell),
    /// Raw weights that the evaluator normalises.
    Mixture,
}

/// One planned field evaluation.
#[derive(Debug)]
struct PlanEntry {
    /// File-name-friendly label, e.g. "sp3_h1" or "3dz2".
    label: String,
    /// Human-readable description for logs and headers.
    describe: String,
    terms: Vec<(Shell, f64)>,
    resolution: usize,
    kind: EntryKind,
}

/// A validated job: the atom plus every field to evaluate.
#[derive(Debug)]
struct Plan {
    atom: Atom,
    atom_desc: String,
    entries: Vec<PlanEntry>,
}

/// Resolve the atom: a tabulated element or a custom n/ζ pair.
fn resolve_atom(orbital: &OrbitalConfig) -> Result<(Atom, String, Option<&'static elements::Element>)> {
    if let Some(symbol) = &orbital.element {
        let element = elements::element(symbol)
            .with_context(|| format!("Unknown element '{symbol}'. Run `orbita-cli elements` for the table"))?;
        let desc = format!("{} ({}, n={})", element.name, element.symbol, element.n);
        return Ok((element.atom(), desc, Some(element)));
    }

    match (orbital.n, orbital.zeta) {
        (Some(n), Some(zeta)) => {
            let atom = Atom { n, zeta };
            Ok((atom, format!("custom atom (n={n})"), None))
        }
        _ => bail!("Orbital config needs either `element` or both `n` and `zeta`"),
    }
}

/// Resolve an AO name against the atom: the optional principal quantum
/// number prefix must match the atom's valence n.
fn resolve_ao(name: &str, atom: &Atom) -> Result<Shell> {
    let (prefix, shell) = hybridization::parse_ao_name(name)?;
    if let Some(n) = prefix {
        if n != atom.n {
            bail!(
                "AO '{name}' names shell n={n} but the atom's valence shell is n={}",
                atom.n
            );
        }
    }
    Ok(shell)
}

/// Validate the job and expand it into planned field evaluations.
fn plan_job(job: &JobConfig) -> Result<Plan> {
    let (atom, atom_desc, element) = resolve_atom(&job.orbital)?;

    let entries = match &job.orbital.selection {
        SelectionSpec::Preset { scheme, index } => {
            let kind: SchemeKind = scheme.parse()?;
            // A preset the element does not exhibit would render a
            // plausible but physically wrong surface; refuse it.
            if let Some(element) = element {
                if !element.schemes.contains(&kind) {
                    bail!(
                        "{} does not hybridize as {}; supported: {}",
                        element.name,
                        kind,
                        format_schemes(element.schemes)
                    );
                }
            }
            let scheme = HybridScheme::of(kind);
            let indices: Vec<usize> = match index {
                Some(i) => vec![*i],
                None => (0..scheme.count()).collect(),
            };
            let resolution = job.grid.resolution.unwrap_or(DEFAULT_HYBRID_RESOLUTION);
            indices
                .into_iter()
                .map(|i| {
                    let terms = scheme.terms(i)?;
                    Ok(PlanEntry {
                        label: format!("{}_h{}", scheme.kind, i + 1),
                        describe: format!("{} hybrid {}", scheme.kind.label(), scheme.labels[i]),
                        terms,
                        resolution,
                        kind: EntryKind::Hybrid,
                    })
                })
                .collect::<Result<Vec<_>>>()?
        }
        SelectionSpec::SingleAo { ao } => {
            let shell = resolve_ao(ao, &atom)?;
            let label = hybridization::ao_name(atom.n, shell);
            vec![PlanEntry {
                describe: format!("bare {label} orbital"),
                label,
                terms: vec![(shell, 1.0)],
                resolution: job.grid.resolution.unwrap_or(DEFAULT_AO_RESOLUTION),
                kind: EntryKind::BareAo(shell),
            }]
        }
        SelectionSpec::Mixture { mixture } => {
            let terms = mixture
                .iter()
                .map(|term| Ok((resolve_ao(&term.ao, &atom)?, term.weight)))
                .collect::<Result<Vec<_>>>()?;
            vec![PlanEntry {
                label: "mixture".into(),
                describe: format!("custom mixture of {} AOs", terms.len()),
                terms,
                resolution: job.grid.resolution.unwrap_or(DEFAULT_HYBRID_RESOLUTION),
                kind: EntryKind::Mixture,
            }]
        }
    };

    Ok(Plan {
        atom,
        atom_desc,
        entries,
    })
}

fn format_schemes(schemes: &[SchemeKind]) -> String {
    if schemes.is_empty() {
        return "none (bonding partner only)".into();
    }
    schemes
        .iter()
        .map(|k| k.tag())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate a job without evaluating any field.
pub fn validate_job(job: &JobConfig) -> Result<()> {
    let plan = plan_job(job)?;
    println!("Atom: {}", plan.atom_desc);
    for entry in &plan.entries {
        println!(
            "  {} — {} terms, resolution {}",
            entry.describe,
            entry.terms.len(),
            entry.resolution
        );
    }
    Ok(())
}

/// Run a job: evaluate every planned field, extract both lobes, and write
/// the configured outputs.
pub fn run_job(job: &JobConfig, out_dir: &Path) -> Result<()> {
    let plan = plan_job(job)?;
    let isovalue = job.surface.isovalue;

    println!("Atom: {}", plan.atom_desc);
    for entry in &plan.entries {
        let field = evaluate_entry(&plan.atom, entry)?;
        let Some(field) = field else {
            // Empty mixtures are "nothing to render", not a failure.
            println!("  {}: no contributing terms, nothing to render", entry.describe);
            continue;
        };

        let (positive, negative) =
            extract_lobes(&field.values, field.grid_size, field.bounds, isovalue)?;
        println!(
            "  {}: {}³ lattice over ±{:.2}, {} + {} triangles at ±{}",
            entry.describe,
            field.grid_size,
            field.bounds[1],
            positive.triangle_count(),
            negative.triangle_count(),
            isovalue
        );
        if positive.is_empty() && negative.is_empty() {
            println!("    no surface at this threshold — skipping export");
            continue;
        }

        if job.output.save_obj {
            let path = out_dir.join(format!("{}.obj", entry.label));
            write_lobes_obj(&positive, &negative, &path, &entry.describe, isovalue)?;
        }
        if job.output.save_json {
            let path = out_dir.join(format!("{}.json", entry.label));
            write_lobes_json(&positive, &negative, &path)?;
        }
    }

    Ok(())
}

fn evaluate_entry(atom: &Atom, entry: &PlanEntry) -> Result<Option<ScalarField>> {
    log::debug!("evaluating {}", entry.describe);
    let field = match entry.kind {
        EntryKind::Hybrid => Some(hybrid_field(atom, &entry.terms, entry.resolution)?),
        EntryKind::BareAo(shell) => Some(single_ao_field(atom, shell, entry.resolution)?),
        EntryKind::Mixture => custom_mixture_field(atom, &entry.terms, entry.resolution)?,
    };
    Ok(field)
}

/// Write both lobes as one Wavefront OBJ with a metadata header. The lobes
/// land in separate groups so the consumer can tint them by sign.
pub fn write_lobes_obj(
    positive: &TriangleMesh,
    negative: &TriangleMesh,
    path: &Path,
    title: &str,
    isovalue: f64,
) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path)?;

    writeln!(file, "# Orbita — orbital isosurface")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "# {title} at ±{isovalue}")?;
    writeln!(
        file,
        "# positive lobe: {} triangles, negative lobe: {} triangles",
        positive.triangle_count(),
        negative.triangle_count()
    )?;

    let mut vertex_base = 1usize;
    for (group, mesh) in [("positive_lobe", positive), ("negative_lobe", negative)] {
        if mesh.is_empty() {
            continue;
        }
        writeln!(file, "g {group}")?;
        for v in mesh.positions.chunks(3) {
            writeln!(file, "v {} {} {}", v[0], v[1], v[2])?;
        }
        for n in mesh.normals.chunks(3) {
            writeln!(file, "vn {} {} {}", n[0], n[1], n[2])?;
        }
        let vertices = mesh.positions.len() / 3;
        for triangle in 0..vertices / 3 {
            let a = vertex_base + triangle * 3;
            let (b, c) = (a + 1, a + 2);
            writeln!(file, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }
        vertex_base += vertices;
    }

    println!("    mesh written to: {}", path.display());
    Ok(())
}

#[derive(Serialize)]
struct LobePair<'a> {
    positive: &'a TriangleMesh,
    negative: &'a TriangleMesh,
}

/// Write both lobes as a JSON document.
pub fn write_lobes_json(
    positive: &TriangleMesh,
    negative: &TriangleMesh,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&LobePair { positive, negative })
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {e}"))?;
    std::fs::write(path, json)?;

    println!("    mesh (JSON) written to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;

    fn parse(content: &str) -> JobConfig {
        toml::from_str(content).unwrap()
    }

    #[test]
    fn test_plan_expands_all_hybrids_by_default() {
        let job = parse(
            r#"
            [orbital]
            element = "C"
            scheme = "sp3"
            "#,
        );
        let plan = plan_job(&job).unwrap();
        assert_eq!(plan.entries.len(), 4);
        assert_eq!(plan.entries[0].label, "sp3_h1");
        assert_eq!(plan.entries[0].resolution, 64);
    }

    #[test]
    fn test_plan_rejects_unsupported_scheme_for_element() {
        let job = parse(
            r#"
            [orbital]
            element = "C"
            scheme = "sp3d2"
            "#,
        );
        let err = plan_job(&job).unwrap_err().to_string();
        assert!(err.contains("does not hybridize"), "unexpected error: {err}");
    }

    #[test]
    fn test_plan_allows_any_scheme_for_custom_atom() {
        let job = parse(
            r#"
            [orbital]
            n = 3
            zeta = { s = 2.1, p = 1.8, d = 1.5 }
            scheme = "sp3d2"
            "#,
        );
        let plan = plan_job(&job).unwrap();
        assert_eq!(plan.entries.len(), 6);
    }

    #[test]
    fn test_plan_single_ao_uses_preview_resolution() {
        let job = parse(
            r#"
            [orbital]
            element = "S"
            ao = "3dz2"
            "#,
        );
        let plan = plan_job(&job).unwrap();
        assert_eq!(plan.entries.len(), 1);
        assert_eq!(plan.entries[0].resolution, 32);
        assert_eq!(plan.entries[0].label, "3dz2");
    }

    #[test]
    fn test_plan_rejects_mismatched_ao_shell_number() {
        let job = parse(
            r#"
            [orbital]
            element = "C"
            ao = "3px"
            "#,
        );
        assert!(plan_job(&job).is_err());
    }

    #[test]
    fn test_load_config_missing_file_errors() {
        assert!(load_config(Path::new("/nonexistent/job.toml")).is_err());
    }
}
