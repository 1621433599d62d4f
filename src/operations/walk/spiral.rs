use crate::error::Result;
use crate::geometry::Corner;
use crate::math::Point3;
use crate::topology::{Anchor, EdgeKind, PointData, PointRole};

use super::trace::Trace;

/// Walks a single continuous spiral from the innermost turn outwards.
///
/// Each turn runs up its right side, across the top and down its left side.
/// Every turn but the last extends its left side down to the next turn's
/// bottom level and connects across to the next turn's bottom-right corner.
/// The inner terminal is brought out through a via at turn 1's bottom-right
/// corner and an under-conductor tap passing below the winding.
pub(super) fn walk(trace: &mut Trace<'_>) -> Result<()> {
    let model = trace.model();
    let spec = model.spec();
    let turns = spec.turns;
    let center = model.derived().center;
    let drop = spec.guard_spacing / 2.0;
    let depth = trace.via_depth();

    for turn in model.turns() {
        let n = turn.turn;
        let frame = &turn.frame;
        let corner = |c: Corner, role| PointData::top(frame.corner(c), role);

        let start = trace.anchor(
            n,
            Anchor::Corner(Corner::BottomRight),
            corner(Corner::BottomRight, PointRole::TurnStart),
        );
        if n == 1 {
            trace.drop_via(n, start, Anchor::FeedVia)?;
        }
        let top_right = trace.anchor(
            n,
            Anchor::Corner(Corner::TopRight),
            corner(Corner::TopRight, PointRole::Corner),
        );
        let top_left = trace.anchor(
            n,
            Anchor::Corner(Corner::TopLeft),
            corner(Corner::TopLeft, PointRole::Corner),
        );
        trace.connect(start, top_right, EdgeKind::Winding)?;
        trace.connect(top_right, top_left, EdgeKind::Winding)?;

        if n < turns {
            let next = model.turn(n + 1)?;
            let step_in = trace.anchor(
                n,
                Anchor::StepIn,
                PointData::top(
                    Point3::new(center.x - frame.offset, center.y - next.frame.offset, center.z),
                    PointRole::TurnEnd,
                ),
            );
            trace.connect(top_left, step_in, EdgeKind::Winding)?;
            let next_start = trace.anchor(
                n + 1,
                Anchor::Corner(Corner::BottomRight),
                PointData::top(next.frame.corner(Corner::BottomRight), PointRole::TurnStart),
            );
            trace.connect(step_in, next_start, EdgeKind::Winding)?;
        } else {
            let bottom_left = trace.anchor(
                n,
                Anchor::Corner(Corner::BottomLeft),
                corner(Corner::BottomLeft, PointRole::TapStart),
            );
            trace.connect(top_left, bottom_left, EdgeKind::Winding)?;
        }

        // Not exclusive with the feed via: a single turn needs both.
        if n == turns {
            let via_bottom = trace.anchors().get(1, Anchor::FeedVia)?;
            let first = model.turn(1)?;
            let end = trace.anchor(
                n,
                Anchor::FeedTap,
                PointData::under(
                    Point3::new(
                        center.x + first.frame.offset,
                        center.y - frame.offset - drop,
                        center.z - depth,
                    ),
                    PointRole::TapEnd,
                ),
            );
            trace.connect_under(via_bottom, end, EdgeKind::Tap)?;
        }
        tracing::debug!(turn = n, offset = frame.offset, "walked spiral turn");
    }

    let last = model.turn(turns)?;
    let tap_start = trace.anchors().get(turns, Anchor::Corner(Corner::BottomLeft))?;
    let p = last.frame.corner(Corner::BottomLeft);
    let tap_end = trace.anchor(
        turns,
        Anchor::Tap(Corner::BottomLeft),
        PointData::top(Point3::new(p.x, p.y - drop, p.z), PointRole::TapEnd),
    );
    trace.connect(tap_start, tap_end, EdgeKind::Tap)?;

    let feed_tap = trace.anchors().get(turns, Anchor::FeedTap)?;
    trace.port(feed_tap)?;
    trace.port(tap_end)?;
    Ok(())
}
