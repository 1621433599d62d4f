use crate::math::Point3;

slotmap::new_key_type! {
    /// Unique identifier for a topological point in the topology store.
    pub struct PointId;
}

/// Conductor layer a point or edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerRole {
    /// Top metal, carrying the winding.
    TopConductor,
    /// Metal below the winding, used for under-passes.
    UnderConductor,
    /// Vertical contact between the two conductor layers.
    Via,
}

/// What a point means to the winding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointRole {
    TurnStart,
    TurnEnd,
    Corner,
    CrossAnchor,
    /// Surface point where a via stack is dropped.
    ViaDrop,
    /// Virtual point at the bottom of a via stack.
    ViaBottom,
    TapStart,
    TapEnd,
    FrameCorner,
}

/// Data associated with a topological point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointData {
    /// The 3D position of the point.
    pub position: Point3,
    pub role: PointRole,
    pub layer: LayerRole,
}

impl PointData {
    /// Creates a new point on the top conductor.
    #[must_use]
    pub fn top(position: Point3, role: PointRole) -> Self {
        Self {
            position,
            role,
            layer: LayerRole::TopConductor,
        }
    }

    /// Creates a new point on the under conductor.
    #[must_use]
    pub fn under(position: Point3, role: PointRole) -> Self {
        Self {
            position,
            role,
            layer: LayerRole::UnderConductor,
        }
    }
}
