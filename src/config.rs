//! Process and job configuration.
//!
//! Every field has a default matching the Sky130 met3/met4 stack, so an
//! empty TOML document is a valid configuration.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, SpecError};
use crate::geometry::{InductorKind, InductorSpec};

/// A GDS layer/datatype pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerSpec {
    pub layer: i16,
    pub datatype: i16,
}

impl LayerSpec {
    #[must_use]
    pub const fn new(layer: i16, datatype: i16) -> Self {
        Self { layer, datatype }
    }
}

/// Mask layers used by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayerStack {
    /// Winding conductor.
    pub top: LayerSpec,
    /// Contact cut between the two conductors.
    pub via: LayerSpec,
    /// Under-pass conductor.
    pub under: LayerSpec,
}

impl Default for LayerStack {
    fn default() -> Self {
        Self {
            top: LayerSpec::new(71, 20),
            via: LayerSpec::new(70, 44),
            under: LayerSpec::new(70, 20),
        }
    }
}

/// Frequency sweep written to the netlist footer.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrequencySweep {
    /// Lowest frequency in Hz.
    pub fmin: f64,
    /// Highest frequency in Hz.
    pub fmax: f64,
    /// Points per decade.
    pub ndec: u32,
}

impl Default for FrequencySweep {
    fn default() -> Self {
        Self {
            fmin: 1e9,
            fmax: 3e9,
            ndec: 10,
        }
    }
}

/// Solver constants written to the netlist.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetlistConfig {
    /// Segment resistivity.
    pub rho: f64,
    /// Default conductivity.
    pub sigma: f64,
    /// Filaments along the segment height.
    pub nhinc: u32,
    /// Filaments along the segment width.
    pub nwinc: u32,
    pub sweep: FrequencySweep,
}

impl Default for NetlistConfig {
    fn default() -> Self {
        Self {
            rho: 0.047,
            sigma: 5.8e4,
            nhinc: 5,
            nwinc: 5,
            sweep: FrequencySweep::default(),
        }
    }
}

/// Fabrication process settings shared by both emitters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessConfig {
    pub layers: LayerStack,
    /// Side length of the via contact cut in micrometers.
    pub via_size: f64,
    /// Side length of the via enclosure pads in micrometers.
    pub via_enclosure_size: f64,
    pub netlist: NetlistConfig,
    /// Name of the cell holding the inductor geometry.
    pub cell_name: String,
    /// Name of the top-level cell referencing [`Self::cell_name`].
    pub top_cell_name: String,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            layers: LayerStack::default(),
            via_size: 0.8,
            via_enclosure_size: 1.2,
            netlist: NetlistConfig::default(),
            cell_name: "INDUCTOR".into(),
            top_cell_name: "TOP".into(),
        }
    }
}

impl ProcessConfig {
    /// Parses a process configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed input or unknown keys.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}

/// Inductor parameters as given in a job file or on the command line.
///
/// Every field is optional so that sources can be layered with
/// [`InductorJob::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InductorJob {
    pub kind: Option<InductorKind>,
    pub inner_radius: Option<f64>,
    pub spacing: Option<f64>,
    pub width: Option<f64>,
    pub turns: Option<u32>,
    pub thickness: Option<f64>,
    pub guard_spacing: Option<f64>,
    pub guard_width: Option<f64>,
    pub tap_length: Option<f64>,
}

impl InductorJob {
    /// The reference spiral: R=20, S=2, W=2, N=4, T=0.854, GRS=20, GRW=2.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            kind: Some(InductorKind::Spiral),
            inner_radius: Some(20.0),
            spacing: Some(2.0),
            width: Some(2.0),
            turns: Some(4),
            thickness: Some(0.854),
            guard_spacing: Some(20.0),
            guard_width: Some(2.0),
            tap_length: None,
        }
    }

    /// Layers `over` on top of `self`; fields set in `over` win.
    #[must_use]
    pub fn merge(self, over: Self) -> Self {
        Self {
            kind: over.kind.or(self.kind),
            inner_radius: over.inner_radius.or(self.inner_radius),
            spacing: over.spacing.or(self.spacing),
            width: over.width.or(self.width),
            turns: over.turns.or(self.turns),
            thickness: over.thickness.or(self.thickness),
            guard_spacing: over.guard_spacing.or(self.guard_spacing),
            guard_width: over.guard_width.or(self.guard_width),
            tap_length: over.tap_length.or(self.tap_length),
        }
    }

    /// Resolves the job into a topology and a spec. The spec is not
    /// validated here.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Missing`] for the first unset parameter.
    pub fn resolve(&self) -> Result<(InductorKind, InductorSpec), SpecError> {
        let kind = self.kind.ok_or(SpecError::Missing("kind"))?;
        let spec = InductorSpec {
            inner_radius: self.inner_radius.ok_or(SpecError::Missing("inner_radius"))?,
            spacing: self.spacing.ok_or(SpecError::Missing("spacing"))?,
            width: self.width.ok_or(SpecError::Missing("width"))?,
            turns: self.turns.ok_or(SpecError::Missing("turns"))?,
            thickness: self.thickness.ok_or(SpecError::Missing("thickness"))?,
            guard_spacing: self.guard_spacing.ok_or(SpecError::Missing("guard_spacing"))?,
            guard_width: self.guard_width.ok_or(SpecError::Missing("guard_width"))?,
            tap_length: self.tap_length,
        };
        Ok((kind, spec))
    }
}

/// A TOML job file: a `[process]` table and an optional `[inductor]` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobFile {
    pub process: ProcessConfig,
    pub inductor: InductorJob,
}

impl JobFile {
    /// Parses a job file from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed input or unknown keys.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses a job file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it is not a valid job file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let job = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "loaded job file");
        Ok(job)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ProcessConfig::from_toml("").unwrap();
        assert_eq!(config, ProcessConfig::default());
        assert_eq!(config.layers.top, LayerSpec::new(71, 20));
        assert_eq!(config.layers.via, LayerSpec::new(70, 44));
        assert_eq!(config.layers.under, LayerSpec::new(70, 20));
        assert_eq!(config.cell_name, "INDUCTOR");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = ProcessConfig::from_toml(
            r"
            via_size = 0.5

            [layers.top]
            layer = 72
            datatype = 20

            [netlist.sweep]
            ndec = 4
            ",
        )
        .unwrap();
        assert_eq!(config.layers.top, LayerSpec::new(72, 20));
        assert_eq!(config.layers.under, LayerSpec::new(70, 20));
        assert!((config.via_size - 0.5).abs() < f64::EPSILON);
        assert!((config.via_enclosure_size - 1.2).abs() < f64::EPSILON);
        assert_eq!(config.netlist.sweep.ndec, 4);
        assert!((config.netlist.sweep.fmax - 3e9).abs() < 1.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            ProcessConfig::from_toml("via_sise = 0.5"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn job_file_layers_over_demo() {
        let job = JobFile::from_toml(
            r#"
            [inductor]
            kind = "symmetry"
            turns = 3
            "#,
        )
        .unwrap();
        let merged = InductorJob::demo().merge(job.inductor);
        let (kind, spec) = merged.resolve().unwrap();
        assert_eq!(kind, InductorKind::Symmetric);
        assert_eq!(spec.turns, 3);
        assert!((spec.inner_radius - 20.0).abs() < f64::EPSILON);
        assert_eq!(job.process, ProcessConfig::default());
    }

    #[test]
    fn unresolved_parameter_is_reported() {
        let job = InductorJob {
            width: None,
            ..InductorJob::demo()
        };
        assert_eq!(job.resolve(), Err(SpecError::Missing("width")));
    }

    #[test]
    fn missing_job_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JobFile::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
