//! Point-in-polygon joins between catchments and location sets.
//!
//! Containment is boundary-inclusive everywhere: a point on a polygon's
//! edge counts as inside. Areas are tested through their centroid.

use fixedbitset::FixedBitSet;
use geo::{Geometry, Intersects, MultiPolygon, Point, Relate};
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

use crate::{CatchmentBand, Error, Location, LocationSet};

/// Sums `attribute` over the records inside `polygon`.
///
/// With `use_centroid` each record is represented by its point or
/// centroid; otherwise the whole geometry must be covered by `polygon`.
///
/// # Errors
///
/// `MissingAttribute` if a record inside the polygon lacks `attribute`.
pub fn sum_attribute_within(
    records: &LocationSet,
    attribute: &str,
    polygon: &MultiPolygon<f64>,
    use_centroid: bool,
) -> Result<f64, Error> {
    if polygon.0.is_empty() {
        return Ok(0.0);
    }

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| is_covered(polygon, record, use_centroid))
        .map(|(index, record)| {
            record
                .attribute(attribute)
                .ok_or_else(|| Error::MissingAttribute {
                    index,
                    attribute: attribute.to_string(),
                })
        })
        .sum()
}

fn is_covered(polygon: &MultiPolygon<f64>, record: &Location, use_centroid: bool) -> bool {
    match (&record.geometry, use_centroid) {
        (_, true) => record.anchor().is_some_and(|point| polygon.intersects(&point)),
        (Geometry::Point(point), false) => polygon.intersects(point),
        (geometry, false) => polygon.relate(geometry).is_covers(),
    }
}

type IndexedAnchor = GeomWithData<[f64; 2], usize>;

/// R-tree over the anchor points of a location set, paired with one value
/// per record
pub(crate) struct AnchorIndex<'a> {
    tree: RTree<IndexedAnchor>,
    values: &'a [f64],
}

impl<'a> AnchorIndex<'a> {
    /// Records with empty geometries are left out of the index.
    pub(crate) fn new(records: &LocationSet, values: &'a [f64]) -> Self {
        let anchors = records
            .anchors()
            .into_iter()
            .enumerate()
            .filter_map(|(idx, anchor)| anchor.map(|p| GeomWithData::new([p.x(), p.y()], idx)))
            .collect();

        Self {
            tree: RTree::bulk_load(anchors),
            values,
        }
    }

    /// Decay-weighted sum over a banded catchment.
    ///
    /// Each record is attributed to the first non-empty band whose
    /// cumulative hull covers it, so records on a band boundary are
    /// counted once.
    pub(crate) fn weighted_sum(&self, bands: &[CatchmentBand], weights: &[f64]) -> f64 {
        let mut claimed = FixedBitSet::with_capacity(self.values.len());
        let mut total = 0.0;

        for (band, &weight) in bands.iter().zip(weights) {
            if band.is_empty() {
                continue;
            }
            let Some(rect) = band.bounding_rect() else {
                continue;
            };

            let envelope =
                AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);
            let inside: Vec<usize> = self
                .tree
                .locate_in_envelope_intersecting(&envelope)
                .filter(|entry| {
                    let [x, y] = *entry.geom();
                    !claimed.contains(entry.data) && band.reaches(&Point::new(x, y))
                })
                .map(|entry| entry.data)
                .collect();

            let mut band_sum = 0.0;
            for idx in inside {
                claimed.insert(idx);
                band_sum += self.values[idx];
            }

            total += band_sum * weight;
        }

        total
    }
}
