//! Parametric generator for square on-chip inductors.
//!
//! A spec is turned into a [`ParametricModel`], walked into a point/edge
//! [`topology::InductorLayout`] and rendered twice from that one layout: as
//! GDSII mask geometry and as a FastHenry netlist.

pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod output;
pub mod pipeline;
pub mod topology;

pub use config::{InductorJob, JobFile, ProcessConfig};
pub use error::{CoilgenError, Result};
pub use geometry::{InductorKind, InductorSpec, ParametricModel};
pub use output::OutputWriter;
pub use pipeline::{generate, Generated};
