use crate::label::LabelDocument;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request body for POST /api/barcodes/ean13
#[derive(Debug, Deserialize)]
pub struct Ean13Request {
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ean13Response {
    pub ean13: String,
    pub check_digit: u8,
    /// The input already held exactly 13 digits and was returned unchanged
    pub passthrough: bool,
    /// Whether the returned code carries a correct check digit
    pub valid: bool,
}

/// Request body for POST /api/labels/preview
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub document: LabelDocument,
    #[serde(default)]
    pub values: HashMap<String, String>,
}
