//! Tesseract OCR backend.

use anyhow::{Context, Result};
use rusty_tesseract::Args;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::TextExtractor;

const DEFAULT_LANG: &str = "eng";

/// OCR via the Tesseract engine, single language model.
pub struct TesseractExtractor {
    lang: String,
}

impl TesseractExtractor {
    pub fn new() -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
        }
    }
}

impl Default for TesseractExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TextExtractor for TesseractExtractor {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn extract(&self, path: &Path) -> Result<String> {
        let path = path.to_path_buf();
        let lang = self.lang.clone();

        // Tesseract runs the engine synchronously; keep it off the async
        // worker threads.
        let text = tokio::task::spawn_blocking(move || -> Result<String> {
            let dynamic_image = image::open(&path)
                .with_context(|| format!("Failed to load image: {:?}", path))?;

            let ocr_image = rusty_tesseract::Image::from_dynamic_image(&dynamic_image)
                .map_err(|e| anyhow::anyhow!("Failed to prepare image for OCR: {}", e))?;

            let args = Args {
                lang,
                config_variables: HashMap::new(),
                dpi: Some(150),
                psm: Some(3),
                oem: Some(3),
            };

            rusty_tesseract::image_to_string(&ocr_image, &args)
                .map_err(|e| anyhow::anyhow!("Tesseract recognition failed: {}", e))
        })
        .await
        .context("OCR task panicked")??;

        let trimmed = text.trim().to_string();
        debug!("Tesseract extracted {} chars", trimmed.len());
        Ok(trimmed)
    }
}
