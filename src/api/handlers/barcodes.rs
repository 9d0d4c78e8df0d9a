use crate::api::models::{Ean13Request, Ean13Response};
use crate::barcode::{digits_only, is_valid_ean13, make_ean13};
use crate::core::error::Result;
use axum::{extract::rejection::JsonRejection, Json};

/// Handler for POST /api/barcodes/ean13 - Normalize a value into an EAN-13 code
pub async fn ean13(
    payload: std::result::Result<Json<Ean13Request>, JsonRejection>,
) -> Result<Json<Ean13Response>> {
    let Json(req) = payload?;

    let passthrough = digits_only(&req.value).len() == 13;
    let ean13 = make_ean13(&req.value);
    let check_digit = ean13.as_bytes()[12] - b'0';
    let valid = is_valid_ean13(&ean13);

    if !valid {
        tracing::debug!(ean13 = %ean13, "Passed through EAN-13 with a wrong check digit");
    }

    Ok(Json(Ean13Response {
        ean13,
        check_digit,
        passthrough,
        valid,
    }))
}
