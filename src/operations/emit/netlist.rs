use std::collections::HashMap;
use std::fmt::{self, Write};

use crate::config::NetlistConfig;
use crate::error::{EmitError, Result, TopologyError};
use crate::topology::{InductorLayout, LayerRole, PointData, PointId, PointRole};

/// Name of a netlist node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeName {
    /// `N<k>`: a point on a conductor.
    Surface(u32),
    /// `NV<k>`: the virtual bottom of a via stack.
    Via(u32),
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface(k) => write!(f, "N{k}"),
            Self::Via(k) => write!(f, "NV{k}"),
        }
    }
}

/// Sequential node numbering, in first-reference order.
#[derive(Debug, Default)]
pub struct NodeAllocator {
    surface: u32,
    via: u32,
    names: HashMap<PointId, NodeName>,
}

impl NodeAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node of `id`, allocating one if this is the first
    /// reference. The second element is `true` on allocation.
    pub fn node(&mut self, id: PointId, point: &PointData) -> (NodeName, bool) {
        if let Some(&name) = self.names.get(&id) {
            return (name, false);
        }
        let name = if point.role == PointRole::ViaBottom {
            self.via += 1;
            NodeName::Via(self.via)
        } else {
            self.surface += 1;
            NodeName::Surface(self.surface)
        };
        self.names.insert(id, name);
        (name, true)
    }

    /// Returns the node already allocated for `id`.
    #[must_use]
    pub fn get(&self, id: PointId) -> Option<NodeName> {
        self.names.get(&id).copied()
    }

    /// Number of allocated nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A rendered FastHenry netlist.
#[derive(Debug, Clone, PartialEq)]
pub struct Netlist {
    pub text: String,
    pub nodes: usize,
    pub segments: usize,
    pub ports: [NodeName; 2],
}

impl fmt::Display for Netlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Converts a layout's edge stream into a FastHenry netlist.
pub struct EmitNetlist<'a> {
    config: &'a NetlistConfig,
}

impl<'a> EmitNetlist<'a> {
    /// Creates a new `EmitNetlist` operation.
    #[must_use]
    pub fn new(config: &'a NetlistConfig) -> Self {
        Self { config }
    }

    /// Executes the emission.
    ///
    /// Edges are walked once. Each node is numbered on its first reference
    /// and declared in the node section; the segments follow in edge order.
    /// Conductor segments have height `T` and the edge width; via segments
    /// have the via depth as height and width `T`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::PortResolution`] unless the layout has
    /// exactly two ports, or [`TopologyError::UnreachablePort`] if a port
    /// is not referenced by any edge.
    pub fn execute(&self, layout: &InductorLayout, nodes: &mut NodeAllocator) -> Result<Netlist> {
        let ports = layout.ports()?;
        let thickness = layout.spec().thickness;
        let mut node_lines = String::new();
        let mut segment_lines = String::new();
        let mut segments = 0;

        for (_, edge) in layout.edges() {
            let a = declare(&mut node_lines, layout, nodes, edge.start)?;
            let b = declare(&mut node_lines, layout, nodes, edge.end)?;
            let (height, width) = match edge.layer {
                LayerRole::Via => (via_height(layout, edge.start, edge.end)?, thickness),
                LayerRole::TopConductor | LayerRole::UnderConductor => (thickness, edge.width),
            };
            segments += 1;
            writeln!(
                segment_lines,
                "E{segments} {a} {b} rho={} H={height:.6} W={width:.6}",
                self.config.rho
            )
            .map_err(EmitError::from)?;
        }

        let [p, q] = ports;
        let ports = [
            nodes.get(p).ok_or(TopologyError::UnreachablePort)?,
            nodes.get(q).ok_or(TopologyError::UnreachablePort)?,
        ];

        let text = self
            .render(&node_lines, &segment_lines, ports)
            .map_err(EmitError::from)?;
        tracing::debug!(nodes = nodes.len(), segments, "emitted netlist");
        Ok(Netlist {
            text,
            nodes: nodes.len(),
            segments,
            ports,
        })
    }

    fn render(
        &self,
        node_lines: &str,
        segment_lines: &str,
        [a, b]: [NodeName; 2],
    ) -> std::result::Result<String, fmt::Error> {
        let c = self.config;
        let mut out = String::new();
        writeln!(out, "** Autogenerated ind")?;
        writeln!(out, ".units um")?;
        writeln!(out, ".Default sigma={:e} nhinc={} nwinc={}", c.sigma, c.nhinc, c.nwinc)?;
        writeln!(out)?;
        out.push_str(node_lines);
        writeln!(out)?;
        out.push_str(segment_lines);
        writeln!(out)?;
        writeln!(out, ".external {a} {b}")?;
        writeln!(
            out,
            ".freq fmin={:e} fmax={:e} ndec={}",
            c.sweep.fmin, c.sweep.fmax, c.sweep.ndec
        )?;
        writeln!(out)?;
        writeln!(out, ".end")?;
        Ok(out)
    }
}

/// Numbers the node of `id`, writing its declaration on first reference.
fn declare(
    out: &mut String,
    layout: &InductorLayout,
    nodes: &mut NodeAllocator,
    id: PointId,
) -> Result<NodeName> {
    let point = layout.point(id)?;
    let (name, fresh) = nodes.node(id, point);
    if fresh {
        let p = &point.position;
        writeln!(out, "{name} x={:.6} y={:.6} z={:.6}", p.x, p.y, p.z)
            .map_err(EmitError::from)?;
    }
    Ok(name)
}

fn via_height(layout: &InductorLayout, a: PointId, b: PointId) -> Result<f64> {
    let za = layout.point(a)?.position.z;
    let zb = layout.point(b)?.position.z;
    Ok((za - zb).abs())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ProcessConfig;
    use crate::error::CoilgenError;
    use crate::geometry::{InductorKind, InductorSpec, ParametricModel};
    use crate::operations::WalkTopology;

    fn layout(kind: InductorKind, turns: u32) -> InductorLayout {
        let model =
            ParametricModel::new(InductorSpec::new(20.0, 2.0, 2.0, turns, 0.854, 20.0, 2.0))
                .unwrap();
        WalkTopology::new(&model, kind).execute().unwrap()
    }

    fn emit(layout: &InductorLayout) -> Netlist {
        let config = ProcessConfig::default();
        EmitNetlist::new(&config.netlist)
            .execute(layout, &mut NodeAllocator::new())
            .unwrap()
    }

    #[test]
    fn header_and_footer() {
        let netlist = emit(&layout(InductorKind::Spiral, 4));
        let lines: Vec<&str> = netlist.text.lines().collect();
        assert_eq!(
            lines[..4],
            ["** Autogenerated ind", ".units um", ".Default sigma=5.8e4 nhinc=5 nwinc=5", ""]
        );
        // Feed tap and outer tap are declared just before the guard ring.
        assert_eq!(
            lines[lines.len() - 5..],
            ["", ".external N17 N18", ".freq fmin=1e9 fmax=3e9 ndec=10", "", ".end"]
        );
    }

    #[test]
    fn spiral_starts_with_feed_via() {
        let netlist = emit(&layout(InductorKind::Spiral, 4));
        let lines: Vec<&str> = netlist.text.lines().collect();
        assert_eq!(
            lines[4..6],
            [
                "N1 x=57.000000 y=35.000000 z=0.427000",
                "NV1 x=57.000000 y=35.000000 z=-1.281000",
            ]
        );
        let first_segment = lines.iter().find(|l| l.starts_with('E')).unwrap();
        assert_eq!(*first_segment, "E1 N1 NV1 rho=0.047 H=1.708000 W=0.854000");
    }

    #[test]
    fn nodes_precede_segments() {
        for kind in [InductorKind::Spiral, InductorKind::Symmetric] {
            let netlist = emit(&layout(kind, 4));
            let lines: Vec<&str> = netlist.text.lines().collect();
            let last_node = lines.iter().rposition(|l| l.starts_with('N')).unwrap();
            let first_segment = lines.iter().position(|l| l.starts_with('E')).unwrap();
            // One blank line separates the node section from the segments.
            assert_eq!(first_segment, last_node + 2, "{kind}");
            assert_eq!(lines[last_node + 1], "");
            assert_eq!(last_node - 4 + 1, netlist.nodes);
        }
    }

    #[test]
    fn every_edge_becomes_a_segment() {
        for kind in [InductorKind::Spiral, InductorKind::Symmetric] {
            for turns in 1..=5 {
                let layout = layout(kind, turns);
                let netlist = emit(&layout);
                assert_eq!(netlist.segments, layout.store().edge_count());
                let declared = netlist
                    .text
                    .lines()
                    .filter(|l| l.starts_with('N'))
                    .count();
                assert_eq!(declared, netlist.nodes);
                let elements = netlist.text.lines().filter(|l| l.starts_with('E')).count();
                assert_eq!(elements, netlist.segments);
            }
        }
    }

    #[test]
    fn guard_ring_closes_on_its_first_node() {
        let netlist = emit(&layout(InductorKind::Symmetric, 2));
        let elements: Vec<&str> = netlist.text.lines().filter(|l| l.starts_with('E')).collect();
        let ring: Vec<Vec<&str>> = elements[elements.len() - 4..]
            .iter()
            .map(|l| l.split_whitespace().collect())
            .collect();
        assert_eq!(ring[0][1], ring[3][2]);
        for segment in &ring {
            assert_eq!(segment[5], "W=2.000000");
        }
    }

    #[test]
    fn symmetric_ports_are_surface_nodes() {
        let netlist = emit(&layout(InductorKind::Symmetric, 4));
        assert!(matches!(
            netlist.ports,
            [NodeName::Surface(_), NodeName::Surface(_)]
        ));
    }

    #[test]
    fn fresh_allocators_give_identical_text() {
        let layout = layout(InductorKind::Symmetric, 3);
        assert_eq!(emit(&layout), emit(&layout));
    }

    #[test]
    fn reused_allocator_keeps_numbering() {
        let layout = layout(InductorKind::Spiral, 2);
        let config = NetlistConfig::default();
        let mut nodes = NodeAllocator::new();
        let first = EmitNetlist::new(&config).execute(&layout, &mut nodes).unwrap();
        let second = EmitNetlist::new(&config).execute(&layout, &mut nodes).unwrap();
        assert_eq!(first.ports, second.ports);
        // No node is declared twice.
        assert!(!second.text.lines().any(|l| l.starts_with('N')));
    }

    #[test]
    fn node_names_render() {
        assert_eq!(NodeName::Surface(12).to_string(), "N12");
        assert_eq!(NodeName::Via(3).to_string(), "NV3");
        let err: CoilgenError = TopologyError::PortResolution { found: 1 }.into();
        assert_eq!(
            err.to_string(),
            "port resolution failed: expected 2 ports, found 1"
        );
    }
}
