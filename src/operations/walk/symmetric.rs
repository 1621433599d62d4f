use crate::error::Result;
use crate::geometry::{Corner, Side, TurnGeometry};
use crate::math::Point3;
use crate::topology::{Anchor, EdgeKind, PointData, PointId, PointRole};

use super::trace::Trace;

/// Walks a symmetric (differential) spiral.
///
/// Adjacent turns swap places through crossovers at the center of a side:
/// Top sides pair turns (1,2), (3,4), ... and Bottom sides pair (2,3),
/// (4,5), .... The first turn carries the center tap on its bottom side and
/// the last turn is left open on the side that has no partner, where the
/// two differential taps come out.
pub(super) fn walk(trace: &mut Trace<'_>) -> Result<()> {
    let model = trace.model();
    let spec = model.spec();
    let turns = spec.turns;
    let drop = spec.guard_spacing / 2.0;

    for turn in model.turns() {
        let n = turn.turn;
        let frame = &turn.frame;
        let is_last = n == turns;
        let odd = !turn.is_even();
        let open_bottom = is_last && !odd;
        let open_top = is_last && odd;

        let bottom_right = corner(trace, &turn, Corner::BottomRight, open_bottom);
        let bottom_left = corner(trace, &turn, Corner::BottomLeft, open_bottom);
        let top_left = corner(trace, &turn, Corner::TopLeft, open_top);
        let top_right = corner(trace, &turn, Corner::TopRight, open_top);

        if n == 1 {
            let bottom = frame.centers.bottom;
            let junction = trace.anchor(
                n,
                Anchor::CenterTap,
                PointData::top(bottom, PointRole::TurnStart),
            );
            let stub = trace.anchor(
                n,
                Anchor::FeedStub,
                PointData::top(
                    Point3::new(bottom.x, bottom.y + spec.inner_radius / 2.0, bottom.z),
                    PointRole::TapStart,
                ),
            );
            trace.connect(stub, junction, EdgeKind::Tap)?;
            trace.connect(bottom_right, junction, EdgeKind::Winding)?;
            trace.connect(junction, bottom_left, EdgeKind::Winding)?;
        } else if !open_bottom {
            split_side(trace, &turn, Side::Bottom, bottom_right, bottom_left)?;
        }

        trace.connect(bottom_left, top_left, EdgeKind::Winding)?;
        if !open_top {
            split_side(trace, &turn, Side::Top, top_left, top_right)?;
        }
        trace.connect(top_right, bottom_right, EdgeKind::Winding)?;

        if n > 1 {
            let side = if odd { Side::Bottom } else { Side::Top };
            cross(trace, n - 1, n, side)?;
        }
        tracing::debug!(
            turn = n,
            offset = frame.offset,
            open_top,
            open_bottom,
            "walked symmetric turn"
        );
    }

    let last = model.turn(turns)?;
    let (left, right, dy) = if turns % 2 == 0 {
        (Corner::BottomLeft, Corner::BottomRight, -drop)
    } else {
        (Corner::TopLeft, Corner::TopRight, drop)
    };
    let tap_left = tap(trace, &last, left, dy)?;
    let tap_right = tap(trace, &last, right, dy)?;
    trace.port(tap_left)?;
    trace.port(tap_right)?;
    Ok(())
}

fn corner(trace: &mut Trace<'_>, turn: &TurnGeometry, c: Corner, open: bool) -> PointId {
    let role = if open {
        PointRole::TapStart
    } else {
        PointRole::Corner
    };
    trace.anchor(
        turn.turn,
        Anchor::Corner(c),
        PointData::top(turn.frame.corner(c), role),
    )
}

/// Runs a tap from corner `c` of the last turn `dy` away from the winding.
fn tap(trace: &mut Trace<'_>, last: &TurnGeometry, c: Corner, dy: f64) -> Result<PointId> {
    let start = trace.anchors().get(last.turn, Anchor::Corner(c))?;
    let p = last.frame.corner(c);
    let end = trace.anchor(
        last.turn,
        Anchor::Tap(c),
        PointData::top(Point3::new(p.x, p.y + dy, p.z), PointRole::TapEnd),
    );
    trace.connect(start, end, EdgeKind::Tap)?;
    Ok(end)
}

/// Emits a side with a crossover gap at its center as two half segments,
/// registering both cross anchors.
fn split_side(
    trace: &mut Trace<'_>,
    turn: &TurnGeometry,
    side: Side,
    start: PointId,
    end: PointId,
) -> Result<()> {
    let spec = trace.model().spec();
    let half_gap = (spec.width + spec.spacing) / 2.0;
    let line = turn.frame.lines.get(side);
    let mid = turn.frame.centers.get(side);

    let left = trace.anchor(
        turn.turn,
        Anchor::CrossLeft(side),
        PointData::top(
            Point3::new(mid.x - half_gap, mid.y, mid.z),
            PointRole::CrossAnchor,
        ),
    );
    let right = trace.anchor(
        turn.turn,
        Anchor::CrossRight(side),
        PointData::top(
            Point3::new(mid.x + half_gap, mid.y, mid.z),
            PointRole::CrossAnchor,
        ),
    );
    let (first, second) = if line.start.x < line.end.x {
        (left, right)
    } else {
        (right, left)
    };
    trace.connect(start, first, EdgeKind::Winding)?;
    trace.connect(second, end, EdgeKind::Winding)?;
    Ok(())
}

/// Joins the crossover gaps of `inner` and `outer = inner + 1` on `side`.
///
/// The inner turn's left anchor and the outer turn's right anchor drop to
/// the under conductor, which carries one path; the other path stays on top.
fn cross(trace: &mut Trace<'_>, inner: u32, outer: u32, side: Side) -> Result<()> {
    let anchors = trace.anchors();
    let inner_left = anchors.get(inner, Anchor::CrossLeft(side))?;
    let inner_right = anchors.get(inner, Anchor::CrossRight(side))?;
    let outer_left = anchors.get(outer, Anchor::CrossLeft(side))?;
    let outer_right = anchors.get(outer, Anchor::CrossRight(side))?;

    let inner_bottom = trace.drop_via(inner, inner_left, Anchor::ViaBottom(side))?;
    let outer_bottom = trace.drop_via(outer, outer_right, Anchor::ViaBottom(side))?;
    trace.connect(inner_right, outer_left, EdgeKind::Crossover)?;
    trace.connect_under(inner_bottom, outer_bottom, EdgeKind::Crossover)?;
    tracing::debug!(inner, outer, %side, "crossed turns");
    Ok(())
}
