//! Wire format of the OSRM Table service
//! (<http://project-osrm.org/docs/v5.24.0/api/#table-service>).

use serde::Deserialize;

/// The body OSRM returns for `/table/v1/...`.
///
/// Only the fields the provider reads are decoded; `sources` and
/// `destinations` are ignored.
#[derive(Debug, Deserialize)]
pub struct TableResponse {
    /// `"Ok"` on success, otherwise an error code such as `"NoTable"`.
    pub code: String,
    /// Human-readable detail for error codes.
    pub message: Option<String>,
    /// Row-major seconds between every pair; `null` where no route exists.
    pub durations: Option<Vec<Vec<Option<f64>>>>,
}

impl TableResponse {
    /// Whether OSRM answered with code `"Ok"`.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}
