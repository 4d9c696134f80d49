//! Release batch route.

use alianza_core::release::{ReleaseScope, resolve_batch_period};
use alianza_db::repositories::ReleaseRepository;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{AppState, error::ApiError};

/// Creates the release routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/releases/run", post(run_release))
}

/// Request body for a batch run. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RunReleaseRequest {
    /// Month (1-12); defaults to the previous calendar month.
    pub month: Option<u32>,
    /// Year; defaults to the year of that month.
    pub year: Option<i32>,
    /// Only periods that still have unreleased rows.
    pub pending_only: bool,
    /// Ignore month/year and evaluate every period.
    pub all_periods: bool,
}

impl RunReleaseRequest {
    fn scope(&self, today: chrono::NaiveDate) -> Result<ReleaseScope, ApiError> {
        if self.all_periods {
            return Ok(ReleaseScope {
                period: None,
                pending_only: self.pending_only,
            });
        }
        let resolved = resolve_batch_period(self.month, self.year, today)?;
        if resolved.fell_back {
            return Err(ApiError::validation("month must be between 1 and 12"));
        }
        Ok(ReleaseScope {
            period: Some(resolved.period),
            pending_only: self.pending_only,
        })
    }
}

/// POST `/releases/run` - Re-evaluate release periods.
async fn run_release(
    State(state): State<AppState>,
    body: Option<Json<RunReleaseRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let today = state.business.today()?;
    let scope = request.scope(today)?;

    let summary = ReleaseRepository::new((*state.db).clone())
        .run_batch(scope, today)
        .await?;

    info!(periods = summary.periods, released = summary.released, "Release run requested");
    Ok((
        StatusCode::OK,
        Json(json!({
            "periods": summary.periods,
            "released": summary.released,
            "held": summary.held,
            "month": scope.period.map(|p| p.month()),
            "year": scope.period.map(|p| p.year()),
            "today": today,
        })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()
    }

    #[test]
    fn test_scope_defaults_to_previous_month() {
        let scope = RunReleaseRequest::default().scope(today()).unwrap();
        let period = scope.period.unwrap();
        assert_eq!((period.month(), period.year()), (3, 2024));
        assert!(!scope.pending_only);
    }

    #[test]
    fn test_scope_all_periods() {
        let request = RunReleaseRequest {
            month: Some(2),
            all_periods: true,
            pending_only: true,
            ..Default::default()
        };
        let scope = request.scope(today()).unwrap();
        assert!(scope.period.is_none());
        assert!(scope.pending_only);
    }

    #[test]
    fn test_scope_rejects_bad_month() {
        let request = RunReleaseRequest {
            month: Some(13),
            ..Default::default()
        };
        assert_eq!(request.scope(today()).unwrap_err().0.status_code(), 400);
    }
}
