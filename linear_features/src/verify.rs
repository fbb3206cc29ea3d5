use enumset::EnumSet;

use crate::{DebugLayers, Edge, EdgeFlag};

impl Edge {
    /// Check that every required flag is set. Each missing one is logged, with the edge's
    /// skeleton dumped to a debug layer named after the problem.
    pub fn verify(&self, required: EnumSet<EdgeFlag>, debug: &mut DebugLayers) -> bool {
        let missing = required - self.flags;
        for flag in missing {
            let layer = match flag {
                EdgeFlag::BottomResolved => "no_bottom_intersections",
                EdgeFlag::TopResolved => "no_top_intersections",
                EdgeFlag::Textured => "not_textured",
            };
            warn!("{} failed verification: {}", self.id, layer);
            debug.add_line(self.id, layer, "skeleton", &self.skeleton());
            debug.add_path(self.id, layer, "plain", &self.plain_polygon());
        }
        missing.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EdgeID, Network};
    use geom::{Distance, LonLat};

    #[test]
    fn reports_missing_flags() {
        let mut net = Network::new(Distance::meters(10.0));
        let a = net.add_node(LonLat::new(0.0, 0.0));
        let b = net.add_node(LonLat::new(0.0, 0.001));
        let e = net.add_edge(a, b, Distance::meters(10.0), 1);
        let mut debug = DebugLayers::new(None);

        assert!(net.get_e(e).verify(EnumSet::new(), &mut debug));
        assert!(!net
            .get_e(e)
            .verify(EdgeFlag::BottomResolved | EdgeFlag::TopResolved, &mut debug));

        net.mut_edge(e).flags.insert(EdgeFlag::BottomResolved);
        net.mut_edge(e).flags.insert(EdgeFlag::TopResolved);
        assert!(net
            .get_e(e)
            .verify(EdgeFlag::BottomResolved | EdgeFlag::TopResolved, &mut debug));
        assert!(!net.get_e(EdgeID(0)).verify(EdgeFlag::Textured.into(), &mut debug));
    }
}
