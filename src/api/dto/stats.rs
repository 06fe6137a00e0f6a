//! DTOs for the range report endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::entities::RangeReport;

/// Query parameters for `GET /stats`.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    /// `today`, `yesterday`, `week` or `month`; anything else means `today`.
    pub range: Option<String>,
}

/// Range report envelope: `{ok, range, total, stats}`.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub report: RangeReport,
}
