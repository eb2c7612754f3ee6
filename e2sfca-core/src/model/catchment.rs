//! Catchment bands produced around a single source node

use geo::{Area, BoundingRect, Geometry, Intersects, MultiPolygon, Point, Rect};

use crate::Cost;

/// Hulls and band differences at or below this area are treated as empty
pub const AREA_EPSILON: f64 = 1e-12;

/// Region reachable within `threshold` but not within any smaller
/// threshold of the same catchment.
#[derive(Debug, Clone)]
pub struct CatchmentBand {
    /// Travel-cost cutoff of this band
    pub threshold: Cost,
    /// Polygonal band, disjoint from every other band of the catchment.
    /// Empty when the reach has no area.
    pub area: MultiPolygon<f64>,
    /// Cumulative convex hull of everything reachable within `threshold`:
    /// a polygon, or a segment when the reached nodes are collinear.
    /// `None` when nothing beyond the source's own position is reached.
    pub reach: Option<Geometry<f64>>,
    /// Street nodes first reached within this band
    pub new_nodes: usize,
}

impl CatchmentBand {
    /// Empty bands contribute nothing to aggregation
    pub fn is_empty(&self) -> bool {
        self.reach.is_none() || self.new_nodes == 0
    }

    pub fn area(&self) -> f64 {
        self.area.unsigned_area()
    }

    /// Boundary-inclusive test against the cumulative hull
    pub fn reaches(&self, point: &Point<f64>) -> bool {
        self.reach
            .as_ref()
            .is_some_and(|reach| reach.intersects(point))
    }

    pub(crate) fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.reach.as_ref().and_then(BoundingRect::bounding_rect)
    }
}

/// Drops zero-area parts (slivers, collapsed hulls)
pub(crate) fn without_slivers(polygons: MultiPolygon<f64>) -> MultiPolygon<f64> {
    polygons
        .into_iter()
        .filter(|polygon| polygon.unsigned_area() > AREA_EPSILON)
        .collect()
}
