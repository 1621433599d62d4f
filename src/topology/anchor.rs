use std::collections::BTreeMap;
use std::fmt;

use crate::error::TopologyError;
use crate::geometry::{Corner, Side};

use super::point::PointId;

/// Role name of a point within one turn.
///
/// Cross-turn references are resolved through these names rather than by
/// position in the point list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Anchor {
    /// A centerline corner.
    Corner(Corner),
    /// Crossover anchor at `center.x - (W+S)/2` on a side.
    CrossLeft(Side),
    /// Crossover anchor at `center.x + (W+S)/2` on a side.
    CrossRight(Side),
    /// Bottom of the via stack dropped on a side's crossover.
    ViaBottom(Side),
    /// Bottom of the spiral feed via.
    FeedVia,
    /// End of a spiral turn's extended left side.
    StepIn,
    /// Junction of the center-tap stub with the first turn's bottom side.
    CenterTap,
    /// Free end of the center-tap stub.
    FeedStub,
    /// End of the under-conductor tap bringing out the inner terminal.
    FeedTap,
    /// External tap end hanging off a corner of the last turn.
    Tap(Corner),
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corner(c) => write!(f, "corner {c}"),
            Self::CrossLeft(s) => write!(f, "{s} cross-left"),
            Self::CrossRight(s) => write!(f, "{s} cross-right"),
            Self::ViaBottom(s) => write!(f, "{s} via bottom"),
            Self::FeedVia => f.write_str("feed via"),
            Self::StepIn => f.write_str("step-in"),
            Self::CenterTap => f.write_str("center tap"),
            Self::FeedStub => f.write_str("feed stub"),
            Self::FeedTap => f.write_str("feed tap"),
            Self::Tap(c) => write!(f, "{c} tap"),
        }
    }
}

/// Turn-indexed lookup of named anchors.
#[derive(Debug, Clone, Default)]
pub struct AnchorRegistry {
    anchors: BTreeMap<(u32, Anchor), PointId>,
}

impl AnchorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `point` as `anchor` of `turn`, returning the previously
    /// registered point if there was one.
    pub fn insert(&mut self, turn: u32, anchor: Anchor, point: PointId) -> Option<PointId> {
        self.anchors.insert((turn, anchor), point)
    }

    /// Returns the point registered as `anchor` of `turn`, if any.
    #[must_use]
    pub fn find(&self, turn: u32, anchor: Anchor) -> Option<PointId> {
        self.anchors.get(&(turn, anchor)).copied()
    }

    /// Returns the point registered as `anchor` of `turn`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MissingAnchor`] if nothing was registered.
    pub fn get(&self, turn: u32, anchor: Anchor) -> Result<PointId, TopologyError> {
        self.find(turn, anchor)
            .ok_or_else(|| TopologyError::MissingAnchor {
                turn,
                anchor: anchor.to_string(),
            })
    }

    /// Number of registered anchors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Returns `true` if no anchor is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn lookup_by_turn_and_role() {
        let mut ids: SlotMap<PointId, ()> = SlotMap::with_key();
        let a = ids.insert(());
        let b = ids.insert(());
        let mut registry = AnchorRegistry::new();
        registry.insert(1, Anchor::CrossLeft(Side::Top), a);
        registry.insert(2, Anchor::CrossLeft(Side::Top), b);
        assert_eq!(registry.get(1, Anchor::CrossLeft(Side::Top)).unwrap(), a);
        assert_eq!(registry.get(2, Anchor::CrossLeft(Side::Top)).unwrap(), b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn missing_anchor_names_turn_and_role() {
        let registry = AnchorRegistry::new();
        assert_eq!(
            registry.get(3, Anchor::ViaBottom(Side::Bottom)),
            Err(TopologyError::MissingAnchor {
                turn: 3,
                anchor: "bottom via bottom".into(),
            })
        );
    }
}
