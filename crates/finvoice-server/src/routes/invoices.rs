//! Invoice record endpoints.

use std::str::FromStr;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use strum::VariantNames;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use finvoice_core::record::{InvoiceRecord, InvoiceStatus};

/// Get all extracted invoices, newest first.
/// GET /invoices
pub async fn list_invoices(State(state): State<AppState>) -> ApiResult<Json<Vec<InvoiceRecord>>> {
    let store = state.store.read().await;
    Ok(Json(store.list().to_vec()))
}

/// Get a specific invoice by id.
/// GET /invoices/:id
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
) -> ApiResult<Json<InvoiceRecord>> {
    let store = state.store.read().await;
    match store.get(&invoice_id) {
        Some(record) => Ok(Json(record.clone())),
        None => Err(ApiError::not_found(format!(
            "Invoice with id '{}' not found",
            invoice_id
        ))),
    }
}

/// Request body for updating an invoice status.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Update the status of an invoice.
/// PUT /invoices/:id/status
///
/// The status vocabulary is closed, but transitions are not constrained:
/// any known status may be written at any time.
pub async fn update_invoice_status(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> ApiResult<Json<InvoiceRecord>> {
    let status = InvoiceStatus::from_str(&request.status).map_err(|_| {
        ApiError::validation(format!(
            "Unknown status '{}'. Allowed values: {}",
            request.status,
            InvoiceStatus::VARIANTS.join(", ")
        ))
    })?;

    let mut store = state.store.write().await;
    let updated = store.set_status(&invoice_id, status).map_err(ApiError::from)?;
    Ok(Json(updated))
}
