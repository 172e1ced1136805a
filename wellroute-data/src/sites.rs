//! CSV loader for the depot and well table.
//!
//! The table carries one row per site with `well_name`, `latitude` and
//! `longitude` columns. The first data row is the depot. An optional
//! `production_vs_plan` column holds each well's production change against
//! plan; when present, every well must have a value.

use std::io::Read;

use geo::Coord;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wellroute_core::Site;

/// Row of the site table that holds the depot.
pub const DEPOT_ROW: usize = 0;

const PRODUCTION_COLUMN: &str = "production_vs_plan";
const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

/// Errors raised while loading a site table.
#[derive(Debug, Error)]
pub enum SiteTableError {
    /// The CSV could not be read or a row did not match the expected columns.
    #[error("failed to read site table: {0}")]
    Csv(#[from] csv::Error),
    /// The table holds a header but no rows.
    #[error("site table has no rows; the first row must be the depot")]
    Empty,
    /// A row's coordinates are outside WGS84 bounds.
    #[error("row {row} ({name}) has invalid coordinates lat={latitude}, lon={longitude}")]
    InvalidCoordinate {
        /// Zero-based data row.
        row: usize,
        /// Site name on that row.
        name: String,
        /// Latitude as read.
        latitude: f64,
        /// Longitude as read.
        longitude: f64,
    },
    /// The production column exists but a well left it blank.
    #[error("row {row} ({name}) is missing {PRODUCTION_COLUMN}")]
    MissingProduction {
        /// Zero-based data row.
        row: usize,
        /// Site name on that row.
        name: String,
    },
}

/// Sites loaded from a table, depot first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteTable {
    /// Depot followed by the wells, in table order.
    pub sites: Vec<Site>,
    /// Production change against plan per site, when the table has one.
    pub production_vs_plan: Option<Vec<i64>>,
}

impl SiteTable {
    /// Number of sites, depot included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.sites.len()
    }

    /// Whether the table holds no sites.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// The depot site, if the table is not empty.
    #[must_use]
    pub fn depot(&self) -> Option<&Site> {
        self.sites.get(DEPOT_ROW)
    }
}

#[derive(Debug, Deserialize)]
struct SiteRow {
    well_name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    production_vs_plan: Option<i64>,
}

impl SiteRow {
    fn into_site(self, id: u64, row: usize) -> Result<Site, SiteTableError> {
        let valid = self.latitude.abs() <= MAX_LATITUDE && self.longitude.abs() <= MAX_LONGITUDE;
        if !valid {
            return Err(SiteTableError::InvalidCoordinate {
                row,
                name: self.well_name,
                latitude: self.latitude,
                longitude: self.longitude,
            });
        }
        Ok(Site::new(
            id,
            self.well_name,
            Coord {
                x: self.longitude,
                y: self.latitude,
            },
        ))
    }
}

/// Read a site table from CSV.
///
/// Surrounding whitespace in fields is ignored and extra columns are
/// skipped. A blank production value on the depot row reads as zero.
///
/// # Errors
///
/// Returns [`SiteTableError::Csv`] for unreadable input or missing required
/// columns, [`SiteTableError::Empty`] when no rows follow the header,
/// [`SiteTableError::InvalidCoordinate`] for out-of-range positions and
/// [`SiteTableError::MissingProduction`] for a blank production value on a
/// well.
///
/// # Examples
///
/// ```
/// use wellroute_data::load_sites_csv;
///
/// let csv = "well_name,latitude,longitude\nYard,36.70,-108.20\nWell 1,36.71,-108.21\n";
/// let table = load_sites_csv(csv.as_bytes())?;
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.depot().map(|site| site.name.as_str()), Some("Yard"));
/// assert!(table.production_vs_plan.is_none());
/// # Ok::<(), wellroute_data::SiteTableError>(())
/// ```
pub fn load_sites_csv<R: Read>(reader: R) -> Result<SiteTable, SiteTableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let has_production = csv_reader
        .headers()?
        .iter()
        .any(|header| header == PRODUCTION_COLUMN);

    let mut sites = Vec::new();
    let mut production = Vec::new();
    for ((row, id), record) in (0_usize..).zip(0_u64..).zip(csv_reader.deserialize()) {
        let site_row: SiteRow = record?;
        let delta = match (site_row.production_vs_plan, has_production) {
            (Some(delta), _) => delta,
            (None, false) => 0,
            (None, true) if row == DEPOT_ROW => 0,
            (None, true) => {
                return Err(SiteTableError::MissingProduction {
                    row,
                    name: site_row.well_name,
                });
            }
        };
        sites.push(site_row.into_site(id, row)?);
        production.push(delta);
    }

    if sites.is_empty() {
        return Err(SiteTableError::Empty);
    }
    debug!(
        "loaded {} sites (production column: {has_production})",
        sites.len()
    );
    Ok(SiteTable {
        sites,
        production_vs_plan: has_production.then_some(production),
    })
}
