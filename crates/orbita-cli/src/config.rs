//! TOML configuration deserialisation for orbital jobs.

use orbita_core::types::SlaterExponents;
use serde::Deserialize;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub orbital: OrbitalConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which atom and which orbital(s) to evaluate.
#[derive(Debug, Deserialize)]
pub struct OrbitalConfig {
    /// Element symbol from the built-in table (e.g. "C").
    pub element: Option<String>,
    /// Custom atom: valence principal quantum number. Used with `zeta`
    /// when `element` is absent.
    pub n: Option<u32>,
    /// Custom atom: Slater exponents, e.g. `zeta = { s = 1.5679, p = 1.5187 }`.
    pub zeta: Option<SlaterExponents>,
    /// Orbital selection: a hybridization preset, a bare AO, or a custom
    /// mixture.
    #[serde(flatten)]
    pub selection: SelectionSpec,
}

/// Orbital selection: exactly one of the three forms.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SelectionSpec {
    /// A hybridization preset; all hybrids of the scheme unless `index`
    /// picks one row.
    Preset {
        scheme: String,
        index: Option<usize>,
    },
    /// A single bare atomic orbital, e.g. `ao = "pz"` or `ao = "3dz2"`.
    SingleAo { ao: String },
    /// A custom weighted mixture; weights are normalised before
    /// evaluation.
    Mixture { mixture: Vec<MixtureTerm> },
}

/// One term of a custom mixture.
#[derive(Debug, Deserialize)]
pub struct MixtureTerm {
    pub ao: String,
    pub weight: f64,
}

/// Lattice resolution.
#[derive(Debug, Default, Deserialize)]
pub struct GridConfig {
    /// Lattice points per axis. Defaults to 64 for hybrids and mixtures,
    /// 32 for bare-AO previews.
    pub resolution: Option<usize>,
}

/// Isosurface threshold.
#[derive(Debug, Deserialize)]
pub struct SurfaceConfig {
    /// Magnitude of the extraction threshold; the two lobes use ±isovalue.
    #[serde(default = "default_isovalue")]
    pub isovalue: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            isovalue: default_isovalue(),
        }
    }
}

fn default_isovalue() -> f64 {
    0.02
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save Wavefront OBJ meshes (default: true).
    #[serde(default = "default_true")]
    pub save_obj: bool,
    /// Whether to also save JSON meshes (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_obj: true,
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: JobConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preset_job() {
        let config: JobConfig = toml::from_str(
            r#"
            [orbital]
            element = "C"
            scheme = "sp3"
            index = 0

            [grid]
            resolution = 48

            [surface]
            isovalue = 0.05
            "#,
        )
        .unwrap();

        assert_eq!(config.orbital.element.as_deref(), Some("C"));
        match &config.orbital.selection {
            SelectionSpec::Preset { scheme, index } => {
                assert_eq!(scheme, "sp3");
                assert_eq!(*index, Some(0));
            }
            other => panic!("expected preset selection, got {other:?}"),
        }
        assert_eq!(config.grid.resolution, Some(48));
        assert_eq!(config.surface.isovalue, 0.05);
        // Defaults kick in for the omitted output table.
        assert!(config.output.save_obj);
        assert!(!config.output.save_json);
    }

    #[test]
    fn test_parse_custom_atom_mixture_job() {
        let config: JobConfig = toml::from_str(
            r#"
            [orbital]
            n = 2
            zeta = { s = 1.5679, p = 1.5187 }
            mixture = [
                { ao = "s", weight = 1.0 },
                { ao = "px", weight = 0.5 },
            ]
            "#,
        )
        .unwrap();

        assert!(config.orbital.element.is_none());
        assert_eq!(config.orbital.n, Some(2));
        match &config.orbital.selection {
            SelectionSpec::Mixture { mixture } => {
                assert_eq!(mixture.len(), 2);
                assert_eq!(mixture[1].ao, "px");
                assert_eq!(mixture[1].weight, 0.5);
            }
            other => panic!("expected mixture selection, got {other:?}"),
        }
        // Defaults.
        assert_eq!(config.grid.resolution, None);
        assert_eq!(config.surface.isovalue, 0.02);
    }

    #[test]
    fn test_parse_single_ao_job() {
        let config: JobConfig = toml::from_str(
            r#"
            [orbital]
            element = "S"
            ao = "3dz2"
            "#,
        )
        .unwrap();
        match &config.orbital.selection {
            SelectionSpec::SingleAo { ao } => assert_eq!(ao, "3dz2"),
            other => panic!("expected single-AO selection, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_selection_is_rejected() {
        let result: Result<JobConfig, _> = toml::from_str(
            r#"
            [orbital]
            element = "C"
            "#,
        );
        assert!(result.is_err());
    }
}
