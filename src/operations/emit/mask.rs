use crate::config::{LayerSpec, ProcessConfig};
use crate::error::{EmitError, Result};
use crate::math::{to_plane, Point2};
use crate::topology::{EdgeKind, InductorLayout, LayerRole};

/// GDS path type with square ends extended by half the path width.
const PATH_TYPE_EXTENDED: i16 = 2;

/// Database units per micrometer (1 nm database unit).
const DB_PER_UM: f64 = 1000.0;

/// Shape of a single mask primitive, in micrometers.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskShape {
    /// Constant-width two-point path.
    Path { points: [Point2; 2], width: f64 },
    /// Axis-aligned rectangle.
    Rect { min: Point2, max: Point2 },
}

/// A shape on a mask layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskPrimitive {
    pub layer: LayerSpec,
    pub shape: MaskShape,
}

/// Mask geometry of one inductor cell.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskLayout {
    pub cell_name: String,
    pub top_cell_name: String,
    pub primitives: Vec<MaskPrimitive>,
}

impl MaskLayout {
    /// Number of primitives on `layer`.
    #[must_use]
    pub fn count_on(&self, layer: LayerSpec) -> usize {
        self.primitives.iter().filter(|p| p.layer == layer).count()
    }

    /// Converts the layout into a GDS library with 1 nm database units and
    /// 1 µm user units. The inductor cell is referenced once from the top
    /// cell at the origin.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::CoordinateOverflow`] if a coordinate does not
    /// fit in a 32-bit database unit.
    pub fn to_gds_library(&self, name: &str) -> Result<gds21::GdsLibrary> {
        let mut cell = gds21::GdsStruct::new(self.cell_name.clone());
        for primitive in &self.primitives {
            cell.elems.push(primitive.to_gds()?);
        }

        let mut top = gds21::GdsStruct::new(self.top_cell_name.clone());
        top.elems
            .push(gds21::GdsElement::GdsStructRef(gds21::GdsStructRef {
                name: self.cell_name.clone(),
                xy: gds21::GdsPoint::new(0, 0),
                ..Default::default()
            }));

        let mut lib = gds21::GdsLibrary::new(name);
        lib.units = gds21::GdsUnits::new(1.0 / DB_PER_UM, 1e-9);
        lib.structs.push(cell);
        lib.structs.push(top);
        Ok(lib)
    }
}

impl MaskPrimitive {
    fn to_gds(&self) -> Result<gds21::GdsElement> {
        let LayerSpec { layer, datatype } = self.layer;
        let elem = match &self.shape {
            MaskShape::Path { points, width } => gds21::GdsElement::GdsPath(gds21::GdsPath {
                layer,
                datatype,
                xy: vec![to_gds_point(&points[0])?, to_gds_point(&points[1])?],
                width: Some(to_db(*width)?),
                path_type: Some(PATH_TYPE_EXTENDED),
                ..Default::default()
            }),
            MaskShape::Rect { min, max } => {
                let corners = [
                    Point2::new(min.x, min.y),
                    Point2::new(max.x, min.y),
                    Point2::new(max.x, max.y),
                    Point2::new(min.x, max.y),
                    Point2::new(min.x, min.y),
                ];
                let xy = corners
                    .iter()
                    .map(to_gds_point)
                    .collect::<Result<Vec<_>>>()?;
                gds21::GdsElement::GdsBoundary(gds21::GdsBoundary {
                    layer,
                    datatype,
                    xy,
                    ..Default::default()
                })
            }
        };
        Ok(elem)
    }
}

/// Converts micrometers to database units.
#[allow(clippy::cast_possible_truncation)]
fn to_db(um: f64) -> Result<i32> {
    let db = (um * DB_PER_UM).round();
    if !db.is_finite() || db < f64::from(i32::MIN) || db > f64::from(i32::MAX) {
        return Err(EmitError::CoordinateOverflow(um).into());
    }
    Ok(db as i32)
}

fn to_gds_point(p: &Point2) -> Result<gds21::GdsPoint> {
    Ok(gds21::GdsPoint::new(to_db(p.x)?, to_db(p.y)?))
}

/// Converts a layout's edge stream into mask primitives.
pub struct EmitMask<'a> {
    config: &'a ProcessConfig,
}

impl<'a> EmitMask<'a> {
    /// Creates a new `EmitMask` operation.
    #[must_use]
    pub fn new(config: &'a ProcessConfig) -> Self {
        Self { config }
    }

    /// Executes the emission.
    ///
    /// Conductor edges become paths whose centerline is the edge itself.
    /// Each via edge becomes a contact cut and two enclosure pads centered
    /// on its surface point.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge refers to a point outside the layout.
    pub fn execute(&self, layout: &InductorLayout) -> Result<MaskLayout> {
        let layers = &self.config.layers;
        let mut primitives = Vec::with_capacity(layout.store().edge_count() * 3);

        for (_, edge) in layout.edges() {
            let start = to_plane(&layout.point(edge.start)?.position);
            let end = to_plane(&layout.point(edge.end)?.position);
            match edge.layer {
                LayerRole::TopConductor | LayerRole::UnderConductor => {
                    let layer = if edge.layer == LayerRole::TopConductor {
                        layers.top
                    } else {
                        layers.under
                    };
                    primitives.push(MaskPrimitive {
                        layer,
                        shape: MaskShape::Path {
                            points: [start, end],
                            width: edge.width,
                        },
                    });
                }
                LayerRole::Via => {
                    debug_assert_eq!(edge.kind, EdgeKind::Via);
                    primitives.push(square(layers.via, &start, self.config.via_size));
                    primitives.push(square(layers.top, &start, self.config.via_enclosure_size));
                    primitives.push(square(layers.under, &start, self.config.via_enclosure_size));
                }
            }
        }

        tracing::debug!(primitives = primitives.len(), "emitted mask geometry");
        Ok(MaskLayout {
            cell_name: self.config.cell_name.clone(),
            top_cell_name: self.config.top_cell_name.clone(),
            primitives,
        })
    }
}

fn square(layer: LayerSpec, center: &Point2, size: f64) -> MaskPrimitive {
    let half = size / 2.0;
    MaskPrimitive {
        layer,
        shape: MaskShape::Rect {
            min: Point2::new(center.x - half, center.y - half),
            max: Point2::new(center.x + half, center.y + half),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CoilgenError;
    use crate::geometry::{InductorKind, InductorSpec, ParametricModel};
    use crate::operations::WalkTopology;
    use approx::assert_relative_eq;

    fn layout(kind: InductorKind, turns: u32) -> InductorLayout {
        let model =
            ParametricModel::new(InductorSpec::new(20.0, 2.0, 2.0, turns, 0.854, 20.0, 2.0))
                .unwrap();
        WalkTopology::new(&model, kind).execute().unwrap()
    }

    #[test]
    fn spiral_demo_primitives_per_layer() {
        let config = ProcessConfig::default();
        let mask = EmitMask::new(&config).execute(&layout(InductorKind::Spiral, 4)).unwrap();
        // 21 conductor edges of which one is under; one via stack.
        assert_eq!(mask.primitives.len(), 20 + 1 + 3);
        assert_eq!(mask.count_on(config.layers.via), 1);
        assert_eq!(mask.count_on(config.layers.under), 2);
        assert_eq!(mask.count_on(config.layers.top), 20 + 1);
    }

    #[test]
    fn via_stack_is_concentric() {
        let config = ProcessConfig::default();
        let mask = EmitMask::new(&config).execute(&layout(InductorKind::Spiral, 1)).unwrap();
        let rects: Vec<_> = mask
            .primitives
            .iter()
            .filter_map(|p| match p.shape {
                MaskShape::Rect { min, max } => Some((p.layer, min, max)),
                MaskShape::Path { .. } => None,
            })
            .collect();
        assert_eq!(rects.len(), 3);
        // Single turn: L = 24, GRL = 68, so the feed via sits at (34 + 11, 34 - 11).
        for (layer, min, max) in rects {
            let size = if layer == config.layers.via { 0.8 } else { 1.2 };
            assert_relative_eq!(max.x - min.x, size, epsilon = 1e-12);
            assert_relative_eq!((min.x + max.x) / 2.0, 45.0, epsilon = 1e-12);
            assert_relative_eq!((min.y + max.y) / 2.0, 23.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn guard_ring_paths_use_guard_width() {
        let config = ProcessConfig::default();
        let layout = layout(InductorKind::Symmetric, 2);
        let mask = EmitMask::new(&config).execute(&layout).unwrap();
        let length = layout.derived().guard_ring_length;
        let frame = mask
            .primitives
            .iter()
            .rev()
            .take(4)
            .collect::<Vec<_>>();
        for p in frame {
            match p.shape {
                MaskShape::Path { points, width } => {
                    assert_relative_eq!(width, 2.0);
                    assert!(points
                        .iter()
                        .all(|q| q.x.abs() < 1e-9 || (q.x - length).abs() < 1e-9));
                }
                MaskShape::Rect { .. } => panic!("guard ring emitted a rectangle"),
            }
        }
    }

    #[test]
    fn emission_is_idempotent() {
        let config = ProcessConfig::default();
        let layout = layout(InductorKind::Symmetric, 5);
        let emit = EmitMask::new(&config);
        assert_eq!(emit.execute(&layout).unwrap(), emit.execute(&layout).unwrap());
    }

    #[test]
    fn gds_library_wraps_cell_in_top() {
        let config = ProcessConfig::default();
        let mask = EmitMask::new(&config).execute(&layout(InductorKind::Spiral, 4)).unwrap();
        let lib = mask.to_gds_library("coilgen").unwrap();
        assert_eq!(lib.structs.len(), 2);
        assert_eq!(lib.structs[0].name, "INDUCTOR");
        assert_eq!(lib.structs[1].name, "TOP");
        assert_eq!(lib.structs[0].elems.len(), mask.primitives.len());
        let gds21::GdsElement::GdsPath(first) = &lib.structs[0].elems[3] else {
            panic!("expected a path");
        };
        // Right side of turn 1: (57, 35) -> (57, 57) in nanometers.
        assert_eq!(
            first.xy,
            vec![gds21::GdsPoint::new(57_000, 35_000), gds21::GdsPoint::new(57_000, 57_000)]
        );
        assert_eq!(first.width, Some(2_000));
        assert_eq!(first.path_type, Some(2));
        let mut bytes = Vec::new();
        lib.write(&mut bytes).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn huge_coordinates_overflow() {
        assert!(matches!(
            to_db(3.0e6),
            Err(CoilgenError::Emit(EmitError::CoordinateOverflow(_)))
        ));
        assert_eq!(to_db(-1.2345).unwrap(), -1235);
    }
}
