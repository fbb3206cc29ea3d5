use std::fmt;

use enumset::{EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};

use geom::{Angle, Distance, GPSBounds, Line, LonLat, Ray};

use crate::{MultiSegment, NodeID, Quadrant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeID(pub usize);

impl fmt::Display for EdgeID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Edge #{}", self.0)
    }
}

/// Progress markers checked by verification.
#[derive(Debug, Serialize, Deserialize, PartialOrd, Ord, EnumSetType)]
pub enum EdgeFlag {
    /// Both corners at `src` were found.
    BottomResolved,
    /// Both corners at `dst` were found.
    TopResolved,
    Textured,
}

/// One segment of a linear feature, extruded to its width.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeID,
    pub src: NodeID,
    pub dst: NodeID,
    pub src_pt: LonLat,
    pub dst_pt: LonLat,
    pub width: Distance,
    pub feature_type: u32,

    // The unconstrained quadrilateral
    pub bot_left: LonLat,
    pub bot_right: LonLat,
    pub top_left: LonLat,
    pub top_right: LonLat,
    /// Parallel to the edge, extended past both ends. Treated as infinite when intersecting.
    pub side_left: Line,
    pub side_right: Line,

    constraints: [Option<Ray>; 4],
    corners: [Option<LonLat>; 4],
    multi_segments: [MultiSegment; 4],

    /// From the top-left corner to the bottom-left. Empty until the edge is completed.
    pub left_contour: Vec<LonLat>,
    /// From the bottom-right corner to the top-right. Empty until the edge is completed.
    pub right_contour: Vec<LonLat>,

    pub flags: EnumSet<EdgeFlag>,
    /// Visited by the texturing traversal, whether or not that succeeded.
    pub(crate) traversed: bool,
}

impl Edge {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: EdgeID,
        src: NodeID,
        dst: NodeID,
        src_pt: LonLat,
        dst_pt: LonLat,
        width: Distance,
        feature_type: u32,
        side_extension: Distance,
    ) -> Edge {
        let placeholder = Line::new(src_pt, dst_pt);
        let mut edge = Edge {
            id,
            src,
            dst,
            src_pt,
            dst_pt,
            width,
            feature_type,
            bot_left: src_pt,
            bot_right: src_pt,
            top_left: dst_pt,
            top_right: dst_pt,
            side_left: placeholder,
            side_right: placeholder,
            constraints: [None; 4],
            corners: [None; 4],
            multi_segments: Default::default(),
            left_contour: Vec::new(),
            right_contour: Vec::new(),
            flags: EnumSet::new(),
            traversed: false,
        };
        edge.recalculate_geometry(side_extension);
        edge
    }

    /// Move one endpoint. Everything derived from the old position is recomputed.
    pub(crate) fn set_endpoint(
        &mut self,
        at_src: bool,
        node: NodeID,
        pt: LonLat,
        side_extension: Distance,
    ) {
        if at_src {
            self.src = node;
            self.src_pt = pt;
        } else {
            self.dst = node;
            self.dst_pt = pt;
        }
        self.recalculate_geometry(side_extension);
    }

    fn recalculate_geometry(&mut self, side_extension: Distance) {
        let course = self.course();
        let left = course.rotate_degs(-90.0);
        let half_width = self.width / 2.0;

        self.bot_left = self.src_pt.project_away(half_width, left);
        self.bot_right = self.src_pt.project_away(-half_width, left);
        self.top_left = self.dst_pt.project_away(half_width, left);
        self.top_right = self.dst_pt.project_away(-half_width, left);

        self.side_left = Line::new(
            self.bot_left.project_away(-side_extension, course),
            self.top_left.project_away(side_extension, course),
        );
        self.side_right = Line::new(
            self.bot_right.project_away(-side_extension, course),
            self.top_right.project_away(side_extension, course),
        );

        self.constraints = [None; 4];
        self.corners = [None; 4];
    }

    /// The course from `src` to `dst`.
    pub fn course(&self) -> Angle {
        self.src_pt.course_to(self.dst_pt)
    }

    /// The course leaving the `src` end if originating, otherwise leaving the `dst` end.
    pub fn heading(&self, originating: bool) -> Angle {
        if originating {
            self.src_pt.course_to(self.dst_pt)
        } else {
            self.dst_pt.course_to(self.src_pt)
        }
    }

    pub fn length(&self) -> Distance {
        self.src_pt.gps_dist(self.dst_pt)
    }

    /// The centerline, from `src` to `dst`.
    pub fn skeleton(&self) -> Line {
        Line::new(self.src_pt, self.dst_pt)
    }

    /// The endpoint opposite the one described by `originating`.
    pub fn far_node(&self, originating: bool) -> NodeID {
        if originating {
            self.dst
        } else {
            self.src
        }
    }

    pub fn other_node(&self, node: NodeID) -> NodeID {
        if node == self.src {
            self.dst
        } else {
            self.src
        }
    }

    pub fn constraint(&self, q: Quadrant) -> Option<Ray> {
        self.constraints[q.idx()]
    }

    pub(crate) fn set_constraint(&mut self, q: Quadrant, ray: Ray) {
        if self.constraints[q.idx()].is_some() {
            debug!("{} already has a {:?} constraint; replacing it", self.id, q);
        }
        self.constraints[q.idx()] = Some(ray);
    }

    /// Where the quadrant's constraint meets its side, once found.
    pub fn corner(&self, q: Quadrant) -> Option<LonLat> {
        self.corners[q.idx()]
    }

    pub(crate) fn set_corner(&mut self, q: Quadrant, pt: Option<LonLat>) {
        self.corners[q.idx()] = pt;
    }

    /// The side line bounding a quadrant.
    pub fn side(&self, q: Quadrant) -> &Line {
        if q.is_left() {
            &self.side_left
        } else {
            &self.side_right
        }
    }

    /// The side on the right of someone looking down the edge from one end.
    pub fn right_side(&self, originating: bool) -> &Line {
        if originating {
            &self.side_right
        } else {
            &self.side_left
        }
    }

    /// The side on the left of someone looking down the edge from one end.
    pub fn left_side(&self, originating: bool) -> &Line {
        if originating {
            &self.side_left
        } else {
            &self.side_right
        }
    }

    pub fn multi_segment(&self, q: Quadrant) -> &MultiSegment {
        &self.multi_segments[q.idx()]
    }

    /// Propose the boundary on the near right, given in the order it was walked away from the
    /// node.
    pub(crate) fn propose_right(
        &mut self,
        originating: bool,
        pts: Vec<LonLat>,
        project: Vec<LonLat>,
    ) {
        let q = Quadrant::near_right(originating);
        if !self.multi_segments[q.idx()].propose(pts, project) {
            debug!("{} {:?} is already committed", self.id, q);
        }
    }

    /// Propose the boundary on the near left, given in the order it was walked away from the
    /// node. Contours run the other way on this side, so this is stored reversed.
    pub(crate) fn propose_left(
        &mut self,
        originating: bool,
        mut pts: Vec<LonLat>,
        mut project: Vec<LonLat>,
    ) {
        pts.reverse();
        project.reverse();
        let q = Quadrant::near_left(originating);
        if !self.multi_segments[q.idx()].propose(pts, project) {
            debug!("{} {:?} is already committed", self.id, q);
        }
    }

    pub(crate) fn apply_multi_segments(&mut self, commit: bool) {
        for slot in &mut self.multi_segments {
            slot.apply(commit);
        }
    }

    /// The quadrilateral ignoring every constraint, closed.
    pub fn plain_polygon(&self) -> Vec<LonLat> {
        vec![
            self.bot_right,
            self.top_right,
            self.top_left,
            self.bot_left,
            self.bot_right,
        ]
    }

    pub fn bounds(&self) -> GPSBounds {
        GPSBounds::from(&self.plain_polygon())
    }

    /// The finished ribbon: the right contour followed by the left.
    pub fn polygon(&self) -> Vec<LonLat> {
        let mut pts = self.right_contour.clone();
        pts.extend(self.left_contour.iter().cloned());
        pts
    }
}
