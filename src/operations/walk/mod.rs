mod guard_ring;
mod spiral;
mod symmetric;
mod trace;

use crate::error::{Result, TopologyError};
use crate::geometry::{InductorKind, ParametricModel};
use crate::topology::InductorLayout;

use trace::Trace;

/// Walks the turns of a model and builds the point/edge topology shared by
/// both emitters.
pub struct WalkTopology<'a> {
    model: &'a ParametricModel,
    kind: InductorKind,
}

impl<'a> WalkTopology<'a> {
    /// Creates a new `WalkTopology` operation.
    #[must_use]
    pub fn new(model: &'a ParametricModel, kind: InductorKind) -> Self {
        Self { model, kind }
    }

    /// Executes the walk, returning the finished layout.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Unsupported`] for hexagonal and octagonal
    /// kinds, or [`TopologyError::PortResolution`] if the walk did not
    /// designate exactly two ports.
    pub fn execute(&self) -> Result<InductorLayout> {
        let mut trace = Trace::new(self.model);
        match self.kind {
            InductorKind::Spiral => spiral::walk(&mut trace)?,
            InductorKind::Symmetric => symmetric::walk(&mut trace)?,
            InductorKind::Hexagon | InductorKind::Octagon => {
                return Err(TopologyError::Unsupported(self.kind).into());
            }
        }
        guard_ring::close(&mut trace)?;

        let layout = trace.finish(self.kind);
        layout.ports()?;
        tracing::debug!(
            kind = %self.kind,
            points = layout.store().point_count(),
            edges = layout.store().edge_count(),
            "walked topology"
        );
        Ok(layout)
    }
}
