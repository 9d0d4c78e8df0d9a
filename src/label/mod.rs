//! Label document model, geometry and placeholder substitution

pub mod document;
pub mod geometry;
pub mod placeholder;

pub use document::{
    BarcodeElement, BarcodeFormat, Canvas, LabelDocument, LabelElement, RectElement,
    ResolvedDocument, TextAlign, TextElement,
};
pub use geometry::{resize, Frame, Point, ResizeHandle, ResizeOptions, Viewport};
pub use placeholder::{placeholders, substitute, Substitution};
