use crate::config::ProcessConfig;
use crate::error::Result;
use crate::geometry::{InductorKind, InductorSpec, ParametricModel};
use crate::operations::{EmitMask, EmitNetlist, MaskLayout, Netlist, NodeAllocator, WalkTopology};
use crate::topology::{EdgeKind, InductorLayout, LayerRole};

/// Everything generated from one spec: the shared layout and both
/// renderings of it.
#[derive(Debug, Clone)]
pub struct Generated {
    pub layout: InductorLayout,
    pub mask: MaskLayout,
    pub netlist: Netlist,
}

/// Validates `spec`, walks its topology and runs both emitters over the
/// result.
///
/// # Errors
///
/// Returns the first error from validation, the walk, or either emitter.
/// Nothing is produced for an unsupported kind.
pub fn generate(kind: InductorKind, spec: InductorSpec, config: &ProcessConfig) -> Result<Generated> {
    let model = ParametricModel::new(spec)?;
    let layout = WalkTopology::new(&model, kind).execute()?;
    let mask = EmitMask::new(config).execute(&layout)?;
    let netlist = EmitNetlist::new(&config.netlist).execute(&layout, &mut NodeAllocator::new())?;

    let derived = model.derived();
    tracing::info!(
        %kind,
        turns = spec.turns,
        area_length = derived.area_length,
        guard_ring_length = derived.guard_ring_length,
        tap_length = derived.tap_length,
        primitives = mask.primitives.len(),
        vias = layout.count_kind(EdgeKind::Via),
        crossovers = layout.count_kind(EdgeKind::Crossover),
        under_segments = layout.count_layer(LayerRole::UnderConductor),
        via_cuts = mask.count_on(config.layers.via),
        nodes = netlist.nodes,
        segments = netlist.segments,
        "generated inductor"
    );
    Ok(Generated {
        layout,
        mask,
        netlist,
    })
}
