use super::point::{LayerRole, PointId};

slotmap::new_key_type! {
    /// Unique identifier for an edge in the topology store.
    pub struct EdgeId;
}

/// Electrical purpose of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Winding,
    Crossover,
    Tap,
    GuardRing,
    Via,
}

/// Data associated with a topological edge.
///
/// An edge connects two points with a straight conductor of the given
/// width. Via edges connect a surface point to the virtual point below it
/// and their width is the conductor thickness.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeData {
    /// Start point of the edge.
    pub start: PointId,
    /// End point of the edge.
    pub end: PointId,
    pub layer: LayerRole,
    pub kind: EdgeKind,
    /// Conductor width in micrometers.
    pub width: f64,
}
