use crate::error::Result;
use crate::geometry::Corner;
use crate::topology::{PointData, PointRole};

use super::trace::Trace;

/// Corner order of the frame: counter-clockwise from the layout origin.
const FRAME_CORNERS: [Corner; 4] = [
    Corner::BottomLeft,
    Corner::BottomRight,
    Corner::TopRight,
    Corner::TopLeft,
];

/// Emits the closed guard ring frame. The ring shares no point with the
/// winding.
pub(super) fn close(trace: &mut Trace<'_>) -> Result<()> {
    let ring = trace.model().guard_ring();
    let [origin, right, far, top] =
        FRAME_CORNERS.map(|c| trace.point(PointData::top(ring.corner(c), PointRole::FrameCorner)));

    trace.connect_frame(origin, right)?;
    trace.connect_frame(right, far)?;
    trace.connect_frame(far, top)?;
    // Return stub back to the origin corner.
    trace.connect_frame(top, origin)?;
    Ok(())
}
