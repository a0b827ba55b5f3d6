//! Data models for extracted invoice records and engine configuration.

pub mod config;
pub mod record;

pub use config::{DanfexConfig, ExtractionConfig, PdfConfig};
pub use record::{Arity, DocumentMetadata, ProductRecord};
