//! Text extraction abstraction.
//!
//! Defines the [`TextExtractor`] trait so the OCR engine can be swapped for a
//! deterministic stub in tests. The shipped backend is Tesseract.

pub mod tesseract;

pub use tesseract::TesseractExtractor;

use std::path::Path;

/// Async trait implemented by each OCR backend.
///
/// `extract` returns the recognized text with surrounding whitespace already
/// trimmed. An empty result is not an error at this layer; the handler turns
/// it into the empty-text rejection.
#[async_trait::async_trait]
pub trait TextExtractor: Send + Sync {
    fn name(&self) -> &str;
    async fn extract(&self, path: &Path) -> anyhow::Result<String>;
}
