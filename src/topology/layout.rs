use crate::error::TopologyError;
use crate::geometry::{DerivedGeometry, InductorKind, InductorSpec};

use super::anchor::AnchorRegistry;
use super::edge::{EdgeData, EdgeId, EdgeKind};
use super::point::{LayerRole, PointData, PointId};
use super::TopologyStore;

/// The immutable result of one topology walk.
///
/// Both emitters consume the same layout; neither mutates it.
#[derive(Debug, Clone)]
pub struct InductorLayout {
    kind: InductorKind,
    spec: InductorSpec,
    derived: DerivedGeometry,
    store: TopologyStore,
    anchors: AnchorRegistry,
}

impl InductorLayout {
    pub(crate) fn new(
        kind: InductorKind,
        spec: InductorSpec,
        derived: DerivedGeometry,
        store: TopologyStore,
        anchors: AnchorRegistry,
    ) -> Self {
        Self {
            kind,
            spec,
            derived,
            store,
            anchors,
        }
    }

    #[must_use]
    pub fn kind(&self) -> InductorKind {
        self.kind
    }

    #[must_use]
    pub fn spec(&self) -> &InductorSpec {
        &self.spec
    }

    #[must_use]
    pub fn derived(&self) -> &DerivedGeometry {
        &self.derived
    }

    #[must_use]
    pub fn store(&self) -> &TopologyStore {
        &self.store
    }

    #[must_use]
    pub fn anchors(&self) -> &AnchorRegistry {
        &self.anchors
    }

    /// Vertical distance between a via's surface point and its bottom.
    #[must_use]
    pub fn via_depth(&self) -> f64 {
        self.spec.thickness * 2.0
    }

    /// Iterates over edges in walk order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.store.edges()
    }

    /// Returns a point by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the point is not part of this layout.
    pub fn point(&self, id: PointId) -> Result<&PointData, TopologyError> {
        self.store.point(id)
    }

    /// Returns the two external ports.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::PortResolution`] unless exactly two ports
    /// were designated.
    pub fn ports(&self) -> Result<[PointId; 2], TopologyError> {
        match self.store.ports() {
            &[a, b] => Ok([a, b]),
            other => Err(TopologyError::PortResolution { found: other.len() }),
        }
    }

    /// Number of edges of the given kind.
    #[must_use]
    pub fn count_kind(&self, kind: EdgeKind) -> usize {
        self.edges().filter(|(_, e)| e.kind == kind).count()
    }

    /// Number of edges on the given layer.
    #[must_use]
    pub fn count_layer(&self, layer: LayerRole) -> usize {
        self.edges().filter(|(_, e)| e.layer == layer).count()
    }
}
