//! Signature stroke injection for PDF documents
//!
//! This crate paints freehand ink strokes onto an existing PDF page by
//! appending path operators to the page's content, leaving everything that
//! was already on the page intact.
//!
//! - [`document`]: load/save through lopdf, zero-based page lookup
//! - [`engine`]: stroke validation, operator translation and injection
//! - [`ops`]: the typed operator model the engine emits
//!
//! The crate does no I/O; callers own persistence and locking.

pub mod document;
pub mod engine;
pub mod error;
pub mod ops;
pub mod stroke;

#[cfg(test)]
mod test_support;

pub use document::{load, page_count, page_operations, save};
pub use engine::{apply_strokes, sign_document, stroke_operations, LINE_WIDTH};
pub use error::SignError;
pub use ops::PathOp;
pub use stroke::{validate_strokes, Point, Rgb, Stroke};
