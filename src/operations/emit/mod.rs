mod mask;
mod netlist;

pub use mask::{EmitMask, MaskLayout, MaskPrimitive, MaskShape};
pub use netlist::{EmitNetlist, Netlist, NodeAllocator, NodeName};
