pub mod anchor;
pub mod edge;
pub mod layout;
pub mod point;

pub use anchor::{Anchor, AnchorRegistry};
pub use edge::{EdgeData, EdgeId, EdgeKind};
pub use layout::InductorLayout;
pub use point::{LayerRole, PointData, PointId, PointRole};

use crate::error::TopologyError;
use slotmap::SlotMap;

/// Central arena that owns all topological entities.
///
/// Points and edges reference each other via typed IDs (generational
/// indices). Edges additionally keep their insertion order, which is the
/// order both emitters consume them in.
#[derive(Debug, Default, Clone)]
pub struct TopologyStore {
    points: SlotMap<PointId, PointData>,
    edges: SlotMap<EdgeId, EdgeData>,
    order: Vec<EdgeId>,
    ports: Vec<PointId>,
}

impl TopologyStore {
    /// Creates a new, empty topology store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Point operations ---

    /// Inserts a point and returns its ID.
    pub fn add_point(&mut self, data: PointData) -> PointId {
        self.points.insert(data)
    }

    /// Returns a reference to the point data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn point(&self, id: PointId) -> Result<&PointData, TopologyError> {
        self.points
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("point".into()))
    }

    /// Returns a mutable reference to the point data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn point_mut(&mut self, id: PointId) -> Result<&mut PointData, TopologyError> {
        self.points
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("point".into()))
    }

    /// Number of points in the store.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    // --- Edge operations ---

    /// Inserts an edge at the end of the edge stream and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if either endpoint is not in the store.
    pub fn add_edge(&mut self, data: EdgeData) -> Result<EdgeId, TopologyError> {
        self.point(data.start)?;
        self.point(data.end)?;
        let id = self.edges.insert(data);
        self.order.push(id);
        Ok(id)
    }

    /// Iterates over edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.order
            .iter()
            .filter_map(|&id| self.edges.get(id).map(|edge| (id, edge)))
    }

    /// Number of edges in the store.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.order.len()
    }

    // --- Port operations ---

    /// Designates a point as an external port.
    ///
    /// # Errors
    ///
    /// Returns an error if the point is not in the store.
    pub fn add_port(&mut self, id: PointId) -> Result<(), TopologyError> {
        self.point(id)?;
        self.ports.push(id);
        Ok(())
    }

    /// Returns the designated ports in designation order.
    #[must_use]
    pub fn ports(&self) -> &[PointId] {
        &self.ports
    }
}
