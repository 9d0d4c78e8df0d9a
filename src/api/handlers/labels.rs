use crate::api::models::PreviewRequest;
use crate::core::error::Result;
use crate::label::ResolvedDocument;
use axum::{extract::rejection::JsonRejection, Json};

/// Handler for POST /api/labels/preview - Normalize a document and fill its placeholders
pub async fn preview_label(
    payload: std::result::Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<ResolvedDocument>> {
    let Json(req) = payload?;

    let resolved = req.document.resolve(&req.values);

    tracing::debug!(
        elements = resolved.document.elements.len(),
        unresolved = resolved.unresolved.len(),
        "Label preview resolved"
    );

    Ok(Json(resolved))
}
