use crate::dashboard::{ConfigStatus, DashboardView, RefreshOutcome, ReportingService};
use crate::errors::AppError;
use crate::models::RefreshRequest;
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Reporting facade owning the source clients and the published view.
    pub reporting: Arc<ReportingService>,
}

impl AppState {
    pub fn new(reporting: ReportingService) -> Self {
        Self {
            reporting: Arc::new(reporting),
        }
    }
}

/// Health check endpoint.
///
/// Returns the service status, version and whether a refresh is running.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-leads-api",
            "version": env!("CARGO_PKG_VERSION"),
            "refreshing": state.reporting.is_refreshing(),
        })),
    )
}

/// GET /api/v1/config/status
///
/// Reports whether a refresh can run and where each source's data would come from.
pub async fn config_status(State(state): State<Arc<AppState>>) -> Json<ConfigStatus> {
    Json(state.reporting.config_status())
}

/// POST /api/v1/dashboard/refresh
///
/// Recomputes the dashboard for the requested range (current month when the
/// body is empty). An incomplete configuration is reported in the body with
/// status 200; only unexpected pipeline failures produce an error response.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `body` - Optional `{start, end}` or `{year, month}` range.
///
/// # Returns
///
/// * `Result<Json<RefreshOutcome>, AppError>` - The refresh outcome or an error.
pub async fn refresh_dashboard(
    State(state): State<Arc<AppState>>,
    body: Option<Json<RefreshRequest>>,
) -> Result<Json<RefreshOutcome>, AppError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let range = request.resolve(Utc::now().date_naive())?;
    tracing::info!("POST /dashboard/refresh - range: {} → {}", range.start, range.end);

    // Run on its own task so a panic in aggregation becomes a 500, not a dropped connection
    let reporting = Arc::clone(&state.reporting);
    let outcome = tokio::spawn(async move { reporting.refresh(range).await })
        .await
        .map_err(|e| {
            AppError::InternalError(format!("Dashboard refresh task failed: {}", e))
        })?;

    Ok(Json(outcome))
}

/// GET /api/v1/dashboard
///
/// Returns the most recently published view, or 404 before the first refresh.
pub async fn latest_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Arc<DashboardView>>, AppError> {
    state
        .reporting
        .latest()
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No dashboard has been computed yet".to_string()))
}
