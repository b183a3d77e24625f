//! `GET /api/medicines`: read-only record export, no session required.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use pharmacy_stock_core::{Inventory, Medicine, MedicineFilter};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn medicines(
    State(state): State<AppState>,
    filter: Result<Query<MedicineFilter>, QueryRejection>,
) -> Result<Json<Vec<Medicine>>, ApiError> {
    let Query(mut filter) = filter.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    // `?category=` with no value means no filter
    filter.category = filter.category.filter(|c| !c.is_empty());

    let db = state.db()?;
    Ok(Json(Inventory::new(&db).export(&filter)?))
}
