//! Invoice extraction endpoint.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use finvoice_core::record::{InvoiceRecord, InvoiceStatus};

/// Extract invoice data from an uploaded image.
/// POST /extract-invoice
///
/// Expects a multipart `file` field carrying an `image/*` payload. On
/// success the extraction result is normalized into a Pending record and
/// inserted newest-first; an extraction failure leaves the store untouched.
pub async fn extract_invoice(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<InvoiceRecord>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart request: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(ApiError::bad_request("File must be an image"));
        }

        let filename = field
            .file_name()
            .unwrap_or("upload.jpg")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;

        upload = Some((filename, bytes.to_vec()));
        break;
    }

    let (filename, bytes) = upload
        .ok_or_else(|| ApiError::bad_request("Missing 'file' field in multipart request"))?;

    // Remote call happens outside the store lock; the lock is only held for
    // the insert.
    let extracted = state
        .agent
        .extract(&bytes, &filename)
        .await
        .map_err(|e| {
            warn!(filename = %filename, error = %e, "extraction failed");
            ApiError::from(e)
        })?;

    let record = InvoiceRecord::build(extracted, filename, InvoiceStatus::Pending);
    info!(id = %record.id, invoice_number = %record.invoice_number, "invoice extracted");

    let mut store = state.store.write().await;
    store.insert(record.clone());

    Ok(Json(record))
}
