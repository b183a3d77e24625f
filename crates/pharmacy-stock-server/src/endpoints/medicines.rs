//! Medicine CRUD endpoints.
//!
//! - `GET /` list with `?q=` filter
//! - `POST /add`
//! - `GET|POST /edit/:id`
//! - `GET|POST /delete/:id` (confirm, then delete)

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Form, Json};
use pharmacy_stock_core::{
    Actor, DeleteConfirmation, Inventory, Medicine, MedicineForm, MedicineView,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::{today, AppState};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub query: Option<String>,
    pub medicines: Vec<MedicineView>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: i64,
}

/// `GET /`
pub async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let db = state.db()?;
    let medicines = Inventory::new(&db).list(query.q.as_deref(), &actor, today())?;
    Ok(Json(ListResponse {
        query: query.q,
        medicines,
    }))
}

/// `POST /add`
pub async fn add(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Form(form): Form<MedicineForm>,
) -> Result<(StatusCode, Json<Medicine>), ApiError> {
    let db = state.db()?;
    let medicine = Inventory::new(&db).create(&form, &actor, today())?;
    Ok((StatusCode::CREATED, Json(medicine)))
}

/// `GET /edit/:id`
pub async fn edit_form(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> Result<Json<Medicine>, ApiError> {
    let db = state.db()?;
    Ok(Json(Inventory::new(&db).get(id, &actor)?))
}

/// `POST /edit/:id`
pub async fn edit(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
    Form(form): Form<MedicineForm>,
) -> Result<Json<Medicine>, ApiError> {
    let db = state.db()?;
    Ok(Json(Inventory::new(&db).update(id, &form, &actor, today())?))
}

/// `GET /delete/:id`
pub async fn delete_confirm(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteConfirmation>, ApiError> {
    let db = state.db()?;
    Ok(Json(Inventory::new(&db).request_delete(id, &actor)?))
}

/// `POST /delete/:id`
pub async fn delete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let db = state.db()?;
    Inventory::new(&db).confirm_delete(id, &actor)?;
    Ok(Json(DeletedResponse { deleted: id }))
}
