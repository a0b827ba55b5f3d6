//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use super::record::Arity;
use crate::error::{DanfeError, Result};

/// Main configuration for the danfex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DanfexConfig {
    /// Line classification and field assignment configuration.
    pub extraction: ExtractionConfig,

    /// PDF text ingestion configuration (host side).
    pub pdf: PdfConfig,
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Lines shorter than this (in characters, trimmed) are noise.
    pub min_line_chars: usize,

    /// Force the technical window arity instead of detecting it from the
    /// first classified product line. Needed only for templates whose line
    /// shape is ambiguous.
    pub arity_hint: Option<Arity>,

    /// Attach a trailing description buffer to the last record of the
    /// document instead of discarding it.
    pub attach_trailing_description: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_line_chars: 10,
            arity_hint: None,
            attach_trailing_description: true,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum embedded-text length to consider a PDF readable.
    pub min_text_length: usize,

    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            min_text_length: 50,
            max_pages: 0,
        }
    }
}

impl DanfexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| DanfeError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| DanfeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_json() {
        let config = DanfexConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: DanfexConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(back.extraction.min_line_chars, 10);
        assert_eq!(back.extraction.arity_hint, None);
        assert_eq!(back.pdf.min_text_length, 50);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: DanfexConfig =
            serde_json::from_str(r#"{"extraction": {"arity_hint": "fifteen"}}"#).unwrap();

        assert_eq!(config.extraction.arity_hint, Some(Arity::Fifteen));
        assert_eq!(config.extraction.min_line_chars, 10);
    }
}
