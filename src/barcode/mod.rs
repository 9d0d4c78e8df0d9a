//! Barcode helpers

pub mod ean13;

pub use ean13::{digits_only, ean13_check_digit, is_valid_ean13, make_ean13};
