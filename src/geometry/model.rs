use crate::error::{Result, SpecError};
use crate::math::Point3;

use super::segment::Segment;
use super::side::{Corner, Side, Sides};
use super::spec::{InductorSpec, DEFAULT_TAP_LENGTH};

/// Scalar geometry derived once from an [`InductorSpec`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedGeometry {
    /// Outer side length of the winding area, `L`.
    pub area_length: f64,
    /// Winding area, `L²`.
    pub area_size: f64,
    /// Guard ring side length, `L + 2·GRS + 2·GRW`.
    pub guard_ring_length: f64,
    /// Layout center. The origin is the guard ring's lower-left corner.
    pub center: Point3,
    /// Length of external taps.
    pub tap_length: f64,
}

impl DerivedGeometry {
    /// Computes the derived geometry without validating the spec.
    #[must_use]
    pub fn from_spec(spec: &InductorSpec) -> Self {
        let n = f64::from(spec.turns);
        let area_length =
            (spec.inner_radius / 2.0 + spec.width * n + spec.spacing * (n - 1.0)) * 2.0;
        let guard_ring_length = area_length + spec.guard_spacing * 2.0 + spec.guard_width * 2.0;
        let half = guard_ring_length / 2.0;
        let tap_length = match spec.tap_length {
            Some(t) if t == 0.0 => spec.guard_spacing,
            Some(t) => t,
            None => DEFAULT_TAP_LENGTH,
        };
        Self {
            area_length,
            area_size: area_length * area_length,
            guard_ring_length,
            center: Point3::new(half, half, spec.thickness / 2.0),
            tap_length,
        }
    }
}

/// Reference geometry of one side-frame: a turn or the guard ring.
///
/// `centers` are the side midpoints, `lines` the conductor centerlines
/// walking the square clockwise (each line's end is the next line's start)
/// and `boxes` the conductor outlines as (min corner, max corner).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    /// Distance from the layout center to each side's centerline.
    pub offset: f64,
    /// Half side length of the outer conductor rectangle.
    pub half_extent: f64,
    pub centers: Sides<Point3>,
    pub lines: Sides<Segment>,
    pub boxes: Sides<Segment>,
}

impl FrameGeometry {
    fn new(center: &Point3, offset: f64, half_width: f64) -> Self {
        let (cx, cy, z) = (center.x, center.y, center.z);
        let half_extent = offset + half_width;

        let corner = |x: f64, y: f64| Point3::new(cx + x * offset, cy + y * offset, z);
        let lines = Sides {
            top: Segment::new(corner(-1.0, 1.0), corner(1.0, 1.0)),
            right: Segment::new(corner(1.0, 1.0), corner(1.0, -1.0)),
            bottom: Segment::new(corner(1.0, -1.0), corner(-1.0, -1.0)),
            left: Segment::new(corner(-1.0, -1.0), corner(-1.0, 1.0)),
        };
        let centers = Sides::from_fn(|side| lines.get(side).midpoint());

        let boxes = Sides::from_fn(|side| {
            let c = centers.get(side);
            let (hx, hy) = match side {
                Side::Top | Side::Bottom => (half_extent, half_width),
                Side::Right | Side::Left => (half_width, half_extent),
            };
            Segment::new(
                Point3::new(c.x - hx, c.y - hy, z),
                Point3::new(c.x + hx, c.y + hy, z),
            )
        });

        Self {
            offset,
            half_extent,
            centers,
            lines,
            boxes,
        }
    }

    /// Returns a centerline corner.
    #[must_use]
    pub fn corner(&self, corner: Corner) -> Point3 {
        match corner {
            Corner::TopLeft => self.lines.top.start,
            Corner::TopRight => self.lines.right.start,
            Corner::BottomRight => self.lines.bottom.start,
            Corner::BottomLeft => self.lines.left.start,
        }
    }
}

/// Reference geometry of turn `turn` (1-based, innermost first).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnGeometry {
    pub turn: u32,
    pub frame: FrameGeometry,
}

impl TurnGeometry {
    /// Returns `true` for even turn indices.
    #[must_use]
    pub fn is_even(&self) -> bool {
        self.turn % 2 == 0
    }
}

/// Parametric model of an inductor: the validated spec plus everything
/// derived from it. Pure and deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct ParametricModel {
    spec: InductorSpec,
    derived: DerivedGeometry,
}

impl ParametricModel {
    /// Validates `spec` and computes the derived geometry.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] if a length is non-positive or not finite, or
    /// if the turn count is zero.
    pub fn new(spec: InductorSpec) -> Result<Self> {
        spec.validate()?;
        Ok(Self {
            derived: DerivedGeometry::from_spec(&spec),
            spec,
        })
    }

    /// Returns the validated spec.
    #[must_use]
    pub fn spec(&self) -> &InductorSpec {
        &self.spec
    }

    /// Returns the derived scalar geometry.
    #[must_use]
    pub fn derived(&self) -> &DerivedGeometry {
        &self.derived
    }

    /// Distance from the center to turn `turn`'s centerline:
    /// `R/2 + W·n − W/2 + S·(n−1)`.
    #[must_use]
    pub fn turn_offset(&self, turn: u32) -> f64 {
        let n = f64::from(turn);
        let s = &self.spec;
        s.inner_radius / 2.0 + s.width * n - s.width / 2.0 + s.spacing * (n - 1.0)
    }

    /// Returns the reference geometry of a single turn.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::TurnOutOfRange`] unless `1 <= turn <= N`.
    pub fn turn(&self, turn: u32) -> Result<TurnGeometry> {
        if turn < 1 || turn > self.spec.turns {
            return Err(SpecError::TurnOutOfRange {
                turn,
                turns: self.spec.turns,
            }
            .into());
        }
        Ok(self.turn_unchecked(turn))
    }

    /// Iterates over all turns, innermost first.
    pub fn turns(&self) -> impl Iterator<Item = TurnGeometry> + '_ {
        (1..=self.spec.turns).map(|turn| self.turn_unchecked(turn))
    }

    /// Returns the guard ring frame, centered on the layout center at half
    /// the guard ring length.
    #[must_use]
    pub fn guard_ring(&self) -> FrameGeometry {
        FrameGeometry::new(
            &self.derived.center,
            self.derived.guard_ring_length / 2.0,
            self.spec.guard_width / 2.0,
        )
    }

    fn turn_unchecked(&self, turn: u32) -> TurnGeometry {
        TurnGeometry {
            turn,
            frame: FrameGeometry::new(
                &self.derived.center,
                self.turn_offset(turn),
                self.spec.width / 2.0,
            ),
        }
    }
}
