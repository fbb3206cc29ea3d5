use serde::{Deserialize, Serialize};

use geom::LonLat;

/// One corner of an edge's ribbon. "Bottom" is the edge's `src` end, "left" is to the left when
/// traveling from `src` to `dst`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quadrant {
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
        Quadrant::TopLeft,
        Quadrant::TopRight,
    ];

    pub(crate) fn idx(self) -> usize {
        match self {
            Quadrant::BottomLeft => 0,
            Quadrant::BottomRight => 1,
            Quadrant::TopLeft => 2,
            Quadrant::TopRight => 3,
        }
    }

    pub fn is_left(self) -> bool {
        matches!(self, Quadrant::BottomLeft | Quadrant::TopLeft)
    }

    pub fn is_bottom(self) -> bool {
        matches!(self, Quadrant::BottomLeft | Quadrant::BottomRight)
    }

    // The following are relative to someone standing at one endpoint of an edge and looking down
    // it. `originating` is true when they're standing at `src`.

    /// The corner at their feet, on their right.
    pub fn near_right(originating: bool) -> Quadrant {
        if originating {
            Quadrant::BottomRight
        } else {
            Quadrant::TopLeft
        }
    }

    /// The corner at their feet, on their left.
    pub fn near_left(originating: bool) -> Quadrant {
        if originating {
            Quadrant::BottomLeft
        } else {
            Quadrant::TopRight
        }
    }

    /// The corner at the other end, on their right.
    pub fn far_right(originating: bool) -> Quadrant {
        if originating {
            Quadrant::TopRight
        } else {
            Quadrant::BottomLeft
        }
    }

    /// The corner at the other end, on their left.
    pub fn far_left(originating: bool) -> Quadrant {
        if originating {
            Quadrant::TopLeft
        } else {
            Quadrant::BottomRight
        }
    }
}

/// The boundary of one quadrant when it's shaped by a junction spanning several nodes. `pts` is
/// in contour order; `project` holds points to carry over to the opposite contour.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub enum MultiSegment {
    #[default]
    Unset,
    Proposed {
        pts: Vec<LonLat>,
        project: Vec<LonLat>,
    },
    Committed {
        pts: Vec<LonLat>,
        project: Vec<LonLat>,
    },
}

impl MultiSegment {
    /// Replaces anything not yet committed. Returns false if this slot was already committed.
    pub(crate) fn propose(&mut self, pts: Vec<LonLat>, project: Vec<LonLat>) -> bool {
        if self.is_committed() {
            return false;
        }
        *self = MultiSegment::Proposed { pts, project };
        true
    }

    /// Promote a proposal to committed, or throw it away. Committed slots never change.
    pub(crate) fn apply(&mut self, commit: bool) {
        if let MultiSegment::Proposed { pts, project } = self {
            if commit {
                *self = MultiSegment::Committed {
                    pts: std::mem::take(pts),
                    project: std::mem::take(project),
                };
            } else {
                *self = MultiSegment::Unset;
            }
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, MultiSegment::Committed { .. })
    }

    pub fn committed_pts(&self) -> Option<&[LonLat]> {
        match self {
            MultiSegment::Committed { pts, .. } => Some(pts),
            _ => None,
        }
    }

    pub fn committed_project(&self) -> &[LonLat] {
        match self {
            MultiSegment::Committed { project, .. } => project,
            _ => &[],
        }
    }
}
