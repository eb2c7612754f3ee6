//! Supply and demand locations

use geo::{Centroid, Geometry, Point};
use hashbrown::HashMap;
use log::info;
use petgraph::graph::NodeIndex;

use crate::{Error, OsmNodeId, StreetGraph};

/// Attribute holding a place rating, e.g. the Google Places `rating`
pub const RATING_ATTRIBUTE: &str = "rating";
/// Attribute holding the number of reviews behind the rating
pub const REVIEW_COUNT_ATTRIBUTE: &str = "user_ratings_total";

/// A single supply or demand record
#[derive(Debug, Clone)]
pub struct Location {
    /// Point or area geometry
    pub geometry: Geometry<f64>,
    /// Numeric attributes (capacity, population, derived `ratio`/`access`)
    pub attributes: HashMap<String, f64>,
    /// OSM id of the nearest street node
    pub nearest_osm: Option<OsmNodeId>,
}

impl Location {
    pub fn new(geometry: impl Into<Geometry<f64>>) -> Self {
        Self {
            geometry: geometry.into(),
            attributes: HashMap::new(),
            nearest_osm: None,
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: f64) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }

    #[must_use]
    pub fn with_nearest_osm(mut self, id: OsmNodeId) -> Self {
        self.nearest_osm = Some(id);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).copied()
    }

    /// Point used for containment tests and snapping: the point itself, or
    /// the centroid of an area. `None` for empty geometries.
    pub fn anchor(&self) -> Option<Point<f64>> {
        self.geometry.centroid()
    }
}

/// Ordered collection of locations.
///
/// Accessibility steps never modify a set in place; they return a copy
/// carrying the derived attribute.
#[derive(Debug, Clone, Default)]
pub struct LocationSet {
    records: Vec<Location>,
}

impl LocationSet {
    pub fn new(records: Vec<Location>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Location] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.records.iter()
    }

    /// Values of `name` in record order
    ///
    /// # Errors
    ///
    /// `MissingAttribute` for the first record without the attribute.
    pub fn attribute_values(&self, name: &str) -> Result<Vec<f64>, Error> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                record.attribute(name).ok_or_else(|| Error::MissingAttribute {
                    index,
                    attribute: name.to_string(),
                })
            })
            .collect()
    }

    /// Anchor points in record order, `None` where the geometry is empty
    pub fn anchors(&self) -> Vec<Option<Point<f64>>> {
        self.records.iter().map(Location::anchor).collect()
    }

    /// Graph indices of every record's nearest node.
    ///
    /// # Errors
    ///
    /// `MissingNearestNode` if a record was never snapped, `UnknownNode` if
    /// it was snapped to a node the graph does not contain.
    pub fn source_nodes(&self, graph: &StreetGraph) -> Result<Vec<NodeIndex>, Error> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let id = record
                    .nearest_osm
                    .ok_or(Error::MissingNearestNode(index))?;
                graph.node_index(id)
            })
            .collect()
    }

    /// Snaps every record to the nearest street node, writing `nearest_osm`.
    ///
    /// # Errors
    ///
    /// `NoPointsFound` on an empty network, `InvalidData` for a record with
    /// an empty geometry.
    pub fn resolve_nearest_nodes(mut self, graph: &StreetGraph) -> Result<Self, Error> {
        for (index, record) in self.records.iter_mut().enumerate() {
            let anchor = record.anchor().ok_or_else(|| {
                Error::InvalidData(format!("Location {index} has an empty geometry"))
            })?;
            let (_, id) = graph.nearest_node(&anchor).ok_or(Error::NoPointsFound)?;
            record.nearest_osm = Some(id);
        }

        Ok(self)
    }

    /// Copy of the set with `name` set to `values[i]` on record `i`
    pub fn with_attribute(&self, name: &str, values: Vec<f64>) -> Result<Self, Error> {
        if values.len() != self.records.len() {
            return Err(Error::InvalidData(format!(
                "Got {} values for attribute '{name}' on {} locations",
                values.len(),
                self.records.len()
            )));
        }

        let records = self
            .records
            .iter()
            .zip(values)
            .map(|(record, value)| record.clone().with_attribute(name, value))
            .collect();

        Ok(Self { records })
    }

    /// Keeps places rated above `min_rating` by more than `min_reviews`
    /// reviewers. Records without rating attributes are dropped.
    pub fn filter_rated(&self, min_rating: f64, min_reviews: f64) -> Self {
        let records: Vec<Location> = self
            .records
            .iter()
            .filter(|record| {
                matches!(
                    (
                        record.attribute(RATING_ATTRIBUTE),
                        record.attribute(REVIEW_COUNT_ATTRIBUTE),
                    ),
                    (Some(rating), Some(reviews)) if rating > min_rating && reviews > min_reviews
                )
            })
            .cloned()
            .collect();

        info!(
            "Kept {} of {} places rated above {min_rating} with more than {min_reviews} reviews",
            records.len(),
            self.records.len()
        );

        Self { records }
    }
}

impl FromIterator<Location> for LocationSet {
    fn from_iter<I: IntoIterator<Item = Location>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LocationSet {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
