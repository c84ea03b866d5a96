//! Chant suggestion endpoint
//!
//! `GET /api/getChants?temps=<season>` returns one suggestion per role.
//! `GET /api/getChants?type=<role>&temps=<season>` re-rolls a single role.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chants_common::db::{random_chant, random_propositions};
use chants_common::{Chant, ChantType, Propositions, DEFAULT_TEMPS};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Query parameters for `/api/getChants`
#[derive(Debug, Default, Deserialize)]
pub struct ChantsQuery {
    /// Liturgical season; absent or empty means `Ordinaire`
    pub temps: Option<String>,

    /// Role to re-roll; absent or empty means all five roles
    #[serde(rename = "type")]
    pub chant_type: Option<String>,
}

impl ChantsQuery {
    /// Season to query, falling back to the default
    pub fn temps(&self) -> &str {
        non_empty(self.temps.as_deref()).unwrap_or(DEFAULT_TEMPS)
    }

    /// Requested role, if any
    pub fn chant_type(&self) -> ApiResult<Option<ChantType>> {
        non_empty(self.chant_type.as_deref())
            .map(|s| s.parse::<ChantType>())
            .transpose()
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Response body; the shape depends on whether a role was requested
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ChantsResponse {
    /// All five roles
    Propositions { propositions: Propositions },
    /// A single re-rolled role
    Single { chant: Option<Chant> },
}

/// GET /api/getChants
pub async fn get_chants(
    State(state): State<AppState>,
    query: Result<Query<ChantsQuery>, QueryRejection>,
) -> ApiResult<Json<ChantsResponse>> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let temps = query.temps();

    let response = match query.chant_type()? {
        Some(chant_type) => {
            debug!("Re-rolling {} for {}", chant_type, temps);
            let chant = random_chant(&state.db, chant_type, temps).await?;
            ChantsResponse::Single { chant }
        }
        None => {
            debug!("Generating propositions for {}", temps);
            let propositions = random_propositions(&state.db, temps).await?;
            ChantsResponse::Propositions { propositions }
        }
    };

    Ok(Json(response))
}
