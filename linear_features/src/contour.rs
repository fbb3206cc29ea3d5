use geom::{Angle, Distance, InfiniteLine, LonLat};

use crate::{Edge, Quadrant};

impl Edge {
    /// Assemble both contours from the corners and any committed multi-segment boundaries. The
    /// degrees of the edge's endpoints decide whether the node itself becomes part of the ribbon.
    pub fn complete(&mut self, src_degree: usize, dst_degree: usize, tolerance: Distance) {
        let mut right = self.assemble_side(Quadrant::BottomRight, Quadrant::TopRight, tolerance);
        let mut left = self.assemble_side(Quadrant::TopLeft, Quadrant::BottomLeft, tolerance);

        if src_degree > 2 {
            left.push(self.src_pt);
        }
        if dst_degree > 2 {
            right.push(self.dst_pt);
        }

        // Points where a neighbor's boundary bends get a matching vertex across this edge, so
        // the two ribbons stay seamless
        let course = self.course();
        for q in [Quadrant::BottomLeft, Quadrant::TopLeft] {
            for pt in self.multi_segment(q).committed_project().to_vec() {
                project_onto(&mut right, pt, course.rotate_degs(90.0), tolerance);
            }
        }
        for q in [Quadrant::BottomRight, Quadrant::TopRight] {
            for pt in self.multi_segment(q).committed_project().to_vec() {
                project_onto(&mut left, pt, course.rotate_degs(-90.0), tolerance);
            }
        }

        dedupe(&mut right, tolerance);
        dedupe(&mut left, tolerance);
        self.right_contour = right;
        self.left_contour = left;
    }

    /// One side of the ribbon, running from the corner `first` to the corner `last`.
    fn assemble_side(&self, first: Quadrant, last: Quadrant, tolerance: Distance) -> Vec<LonLat> {
        let side = self.side(first).infinite();
        let mut pts = Vec::new();
        match (
            self.multi_segment(first).committed_pts(),
            self.multi_segment(last).committed_pts(),
        ) {
            (None, None) => {
                pts.extend(self.corner(first));
                pts.extend(self.corner(last));
            }
            (Some(near), None) => {
                pts.extend_from_slice(near);
                if near
                    .last()
                    .map(|pt| side.contains_pt(*pt, tolerance))
                    .unwrap_or(false)
                {
                    pts.extend(self.corner(last));
                }
            }
            (None, Some(far)) => {
                if far
                    .first()
                    .map(|pt| side.contains_pt(*pt, tolerance))
                    .unwrap_or(false)
                {
                    pts.extend(self.corner(first));
                }
                pts.extend_from_slice(far);
            }
            (Some(near), Some(far)) => {
                pts.extend_from_slice(near);
                pts.extend_from_slice(far);
            }
        }
        pts
    }
}

/// Splice in the point where a line through `pt` crosses the contour, on the first segment that
/// straddles it.
fn project_onto(contour: &mut Vec<LonLat>, pt: LonLat, angle: Angle, tolerance: Distance) {
    let line = InfiniteLine::from_pt_angle(pt, angle);
    for idx in 0..contour.len().saturating_sub(1) {
        let (a, b) = (contour[idx], contour[idx + 1]);
        let side_a = line.signed_dist(a);
        let side_b = line.signed_dist(b);
        let straddles = (side_a <= Distance::ZERO && side_b >= Distance::ZERO)
            || (side_a >= Distance::ZERO && side_b <= Distance::ZERO);
        if !straddles {
            continue;
        }
        if let Some(hit) = InfiniteLine::new(a, b).intersection(&line) {
            if !hit.approx_eq(a, tolerance) && !hit.approx_eq(b, tolerance) {
                contour.insert(idx + 1, hit);
            }
        }
        return;
    }
    debug!("Projected point {} doesn't cross the opposite contour", pt);
}

fn dedupe(pts: &mut Vec<LonLat>, tolerance: Distance) {
    pts.dedup_by(|b, a| a.approx_eq(*b, tolerance));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EdgeID, Network};
    use geom::EPSILON_DIST;

    const M: f64 = 6_371_000.0 * std::f64::consts::PI / 180.0;

    fn pt(x: f64, y: f64) -> LonLat {
        LonLat::new(x / M, y / M)
    }

    fn chain() -> (Network, EdgeID) {
        let mut net = Network::new(Distance::meters(10.0));
        let a = net.add_node(pt(0.0, 0.0));
        let b = net.add_node(pt(0.0, 100.0));
        let e = net.add_edge(a, b, Distance::meters(10.0), 1);
        crate::bisect::constrain_nodes(&mut net);
        crate::bisect::intersect_constraints_and_sides(
            &mut net,
            &mut crate::DebugLayers::new(None),
        );
        (net, e)
    }

    #[test]
    fn plain_edge_is_its_quadrilateral() {
        let (mut net, e) = chain();
        let edge = net.mut_edge(e);
        edge.complete(1, 1, EPSILON_DIST);

        let expected_right = [pt(5.0, 0.0), pt(5.0, 100.0)];
        let expected_left = [pt(-5.0, 100.0), pt(-5.0, 0.0)];
        assert_eq!(edge.right_contour.len(), 2);
        assert_eq!(edge.left_contour.len(), 2);
        for (got, want) in edge.right_contour.iter().zip(expected_right) {
            assert!(got.approx_eq(want, EPSILON_DIST));
        }
        for (got, want) in edge.left_contour.iter().zip(expected_left) {
            assert!(got.approx_eq(want, EPSILON_DIST));
        }
    }

    #[test]
    fn junction_points_join_the_contour() {
        let (mut net, e) = chain();
        let edge = net.mut_edge(e);
        edge.complete(3, 4, EPSILON_DIST);
        assert!(edge.left_contour.last().unwrap().approx_eq(pt(0.0, 0.0), EPSILON_DIST));
        assert!(edge
            .right_contour
            .last()
            .unwrap()
            .approx_eq(pt(0.0, 100.0), EPSILON_DIST));
    }

    #[test]
    fn committed_boundary_and_projection() {
        let (mut net, e) = chain();
        let edge = net.mut_edge(e);
        // A neighbor pinches the bottom right, bending at y=3 and meeting the side at y=57
        let walked = vec![pt(0.0, 0.0), pt(0.3, 3.0), pt(5.0, 57.0)];
        edge.propose_right(true, walked.clone(), vec![pt(0.3, 3.0), pt(5.0, 57.0)]);
        edge.apply_multi_segments(true);
        edge.complete(3, 2, EPSILON_DIST);

        let right = &edge.right_contour;
        assert_eq!(right.len(), 4);
        assert!(right[2].approx_eq(pt(5.0, 57.0), EPSILON_DIST));
        assert!(right[3].approx_eq(pt(5.0, 100.0), EPSILON_DIST));

        let left = &edge.left_contour;
        let expected = [
            pt(-5.0, 100.0),
            pt(-5.0, 57.0),
            pt(-5.0, 3.0),
            pt(-5.0, 0.0),
            pt(0.0, 0.0),
        ];
        assert_eq!(left.len(), expected.len());
        for (got, want) in left.iter().zip(expected) {
            assert!(got.approx_eq(want, EPSILON_DIST), "{} vs {}", got, want);
        }
    }

    #[test]
    fn boundary_not_reaching_the_side_drops_the_far_corner() {
        let (mut net, e) = chain();
        let edge = net.mut_edge(e);
        let walked = vec![pt(0.0, 0.0), pt(1.0, 20.0)];
        edge.propose_right(true, walked, Vec::new());
        edge.apply_multi_segments(true);
        edge.complete(2, 2, EPSILON_DIST);
        assert_eq!(edge.right_contour.len(), 2);
        assert!(edge.right_contour[1].approx_eq(pt(1.0, 20.0), EPSILON_DIST));
    }
}
