use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::InductorKind;

/// Top-level error type for the inductor generator.
#[derive(Debug, Error)]
pub enum CoilgenError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Rejections of an inductor specification, raised before any walk begins.
#[derive(Debug, Error, PartialEq)]
pub enum SpecError {
    #[error("invalid spec: {parameter} = {value} must be positive")]
    NonPositive { parameter: &'static str, value: f64 },

    #[error("invalid spec: {parameter} = {value} must not be negative")]
    Negative { parameter: &'static str, value: f64 },

    #[error("invalid spec: {parameter} must be finite")]
    NotFinite { parameter: &'static str },

    #[error("invalid spec: turn count must be at least 1, got {0}")]
    TurnCount(u32),

    #[error("invalid spec: turn {turn} is outside 1..={turns}")]
    TurnOutOfRange { turn: u32, turns: u32 },

    #[error("invalid spec: missing parameter `{0}`")]
    Missing(&'static str),
}

/// Errors raised while building or reading the point/edge topology.
#[derive(Debug, Error, PartialEq)]
pub enum TopologyError {
    #[error("unsupported topology: {0}")]
    Unsupported(InductorKind),

    #[error("port resolution failed: expected 2 ports, found {found}")]
    PortResolution { found: usize },

    #[error("port resolution failed: port point was never reached by an edge")]
    UnreachablePort,

    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("turn {turn} has no `{anchor}` anchor")]
    MissingAnchor { turn: u32, anchor: String },
}

/// Errors raised while converting the topology into output artifacts.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("coordinate {0} um does not fit in a GDS database unit")]
    CoordinateOverflow(f64),

    #[error("netlist formatting failed")]
    Format(#[from] std::fmt::Error),
}

/// Errors raised while loading process or job configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown inductor kind `{0}`")]
    UnknownKind(String),
}

/// Errors raised while persisting artifacts to disk.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output directory {path} is not usable: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("GDS encoding of {path} failed: {message}")]
    Gds { path: PathBuf, message: String },
}

/// Convenience type alias for results using [`CoilgenError`].
pub type Result<T> = std::result::Result<T, CoilgenError>;
