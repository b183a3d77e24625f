//! `GET /dashboard`

use axum::extract::State;
use axum::{Extension, Json};
use pharmacy_stock_core::{Actor, CategorySeries, Dashboard, Inventory};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::{today, AppState};

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub dashboard: Dashboard,
    /// Chart-ready copy of `categories`
    pub series: CategorySeries,
}

pub async fn show(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let db = state.db()?;
    let dashboard = Inventory::new(&db).dashboard(&actor, today())?;
    let series = dashboard.category_series();
    Ok(Json(DashboardResponse { dashboard, series }))
}
