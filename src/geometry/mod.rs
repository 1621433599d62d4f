pub mod model;
pub mod segment;
pub mod side;
pub mod spec;

pub use model::{DerivedGeometry, FrameGeometry, ParametricModel, TurnGeometry};
pub use segment::Segment;
pub use side::{Corner, Side, Sides};
pub use spec::{InductorKind, InductorSpec, DEFAULT_TAP_LENGTH};
