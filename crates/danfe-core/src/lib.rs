//! Core library for NFe/DANFE line-item extraction.
//!
//! This crate provides:
//! - line classification over extracted PDF text (product data,
//!   continuation, noise) with per-document arity locking
//! - field assignment of the trailing technical window to named tax/value
//!   fields
//! - description merging across wrapped lines
//! - document-level metadata extraction (issuance date, access key, totals,
//!   parties)
//! - order-preserving parallel batch extraction
//!
//! The engine works on in-memory text only; producing that text (PDF
//! extraction) and consuming the records (export, transport) are host
//! concerns.

pub mod batch;
pub mod engine;
pub mod error;
pub mod models;

pub use batch::{collect_records, parse_documents};
pub use engine::{DanfeParser, DocumentResult, LineClass, LineOutcome, SkipReason};
pub use error::{DanfeError, Result};
pub use models::config::{DanfexConfig, ExtractionConfig, PdfConfig};
pub use models::record::{Arity, DocumentMetadata, ProductRecord};
