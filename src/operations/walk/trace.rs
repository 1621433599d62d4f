use crate::error::Result;
use crate::geometry::{InductorKind, ParametricModel};
use crate::math::Point3;
use crate::topology::{
    Anchor, AnchorRegistry, EdgeData, EdgeId, EdgeKind, InductorLayout, LayerRole, PointData,
    PointId, PointRole, TopologyStore,
};

/// Mutable state of a walk in progress: the arena being filled and the
/// anchor registry used to resolve cross-turn references.
pub(super) struct Trace<'a> {
    model: &'a ParametricModel,
    store: TopologyStore,
    anchors: AnchorRegistry,
}

impl<'a> Trace<'a> {
    pub(super) fn new(model: &'a ParametricModel) -> Self {
        Self {
            model,
            store: TopologyStore::new(),
            anchors: AnchorRegistry::new(),
        }
    }

    pub(super) fn model(&self) -> &'a ParametricModel {
        self.model
    }

    pub(super) fn anchors(&self) -> &AnchorRegistry {
        &self.anchors
    }

    /// Adds a point that no other turn refers to.
    pub(super) fn point(&mut self, data: PointData) -> PointId {
        self.store.add_point(data)
    }

    /// Returns the point registered as `anchor` of `turn`, creating it from
    /// `data` on first use.
    pub(super) fn anchor(&mut self, turn: u32, anchor: Anchor, data: PointData) -> PointId {
        if let Some(id) = self.anchors.find(turn, anchor) {
            return id;
        }
        let id = self.store.add_point(data);
        self.anchors.insert(turn, anchor, id);
        id
    }

    /// Connects two points with a top-conductor edge of wire width.
    pub(super) fn connect(&mut self, start: PointId, end: PointId, kind: EdgeKind) -> Result<EdgeId> {
        let width = self.model.spec().width;
        self.edge(start, end, LayerRole::TopConductor, kind, width)
    }

    /// Connects two points with an under-conductor edge of wire width.
    pub(super) fn connect_under(
        &mut self,
        start: PointId,
        end: PointId,
        kind: EdgeKind,
    ) -> Result<EdgeId> {
        let width = self.model.spec().width;
        self.edge(start, end, LayerRole::UnderConductor, kind, width)
    }

    /// Connects two guard ring corners.
    pub(super) fn connect_frame(&mut self, start: PointId, end: PointId) -> Result<EdgeId> {
        let width = self.model.spec().guard_width;
        self.edge(start, end, LayerRole::TopConductor, EdgeKind::GuardRing, width)
    }

    /// Drops a via stack at `surface` and registers its bottom as `anchor`
    /// of `turn`. Returns the via bottom.
    pub(super) fn drop_via(&mut self, turn: u32, surface: PointId, anchor: Anchor) -> Result<PointId> {
        let depth = self.via_depth();
        let thickness = self.model.spec().thickness;
        let point = self.store.point_mut(surface)?;
        point.role = PointRole::ViaDrop;
        let p = point.position;

        let bottom = self.anchor(
            turn,
            anchor,
            PointData::under(Point3::new(p.x, p.y, p.z - depth), PointRole::ViaBottom),
        );
        self.edge(surface, bottom, LayerRole::Via, EdgeKind::Via, thickness)?;
        Ok(bottom)
    }

    /// Designates an external port.
    pub(super) fn port(&mut self, id: PointId) -> Result<()> {
        self.store.add_port(id)?;
        Ok(())
    }

    pub(super) fn via_depth(&self) -> f64 {
        self.model.spec().thickness * 2.0
    }

    pub(super) fn finish(self, kind: InductorKind) -> InductorLayout {
        InductorLayout::new(
            kind,
            *self.model.spec(),
            *self.model.derived(),
            self.store,
            self.anchors,
        )
    }

    fn edge(
        &mut self,
        start: PointId,
        end: PointId,
        layer: LayerRole,
        kind: EdgeKind,
        width: f64,
    ) -> Result<EdgeId> {
        Ok(self.store.add_edge(EdgeData {
            start,
            end,
            layer,
            kind,
            width,
        })?)
    }
}
