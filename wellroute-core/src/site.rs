//! Sites: the depot and the wells an operator may visit.

use geo::Coord;

/// A location on the route network.
///
/// Coordinates use WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use wellroute_core::Site;
///
/// let site = Site::new(3, "Well 3", Coord { x: -107.9, y: 36.6 });
/// assert_eq!(site.name, "Well 3");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Site {
    /// Position of the site in its source table.
    pub id: u64,
    /// Human-readable site name.
    pub name: String,
    /// Geospatial position.
    pub location: Coord<f64>,
}

impl Site {
    /// Construct a site.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, location: Coord<f64>) -> Self {
        Self {
            id,
            name: name.into(),
            location,
        }
    }
}
