pub mod emit;
pub mod walk;

pub use emit::{EmitMask, EmitNetlist, MaskLayout, Netlist, NodeAllocator};
pub use walk::WalkTopology;
