//! The extraction engine: line classification and field assignment over
//! DANFE text.

pub mod anchor;
pub mod classify;
pub mod merge;
pub mod metadata;
pub mod number;
pub mod patterns;
pub mod window;

pub use anchor::{find_anchor, strip_accents};
pub use classify::{LineClass, LineClassifier};
pub use merge::{DescriptionMerger, MergeState};
pub use metadata::extract_metadata;
pub use number::{normalize, parse_brazilian_number};
pub use window::{LineOutcome, SkipReason, assign};

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::config::ExtractionConfig;
use crate::models::record::{Arity, DocumentMetadata, ProductRecord};
use patterns::CODE_TOKEN;

/// Result of extracting one document.
///
/// An unusable document (no anchor, no recognizable product lines) is a
/// valid, reportable outcome with zero records, never an error.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResult {
    /// Records in source order (top to bottom through the text).
    pub records: Vec<ProductRecord>,
    /// Document-level fields, also broadcast into every record.
    pub metadata: DocumentMetadata,
    /// Technical window arity locked for this document, if any product line
    /// was seen.
    pub arity: Option<Arity>,
    /// Classified product lines that produced no record.
    pub skipped: Vec<SkipReason>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// The DANFE extraction engine.
///
/// Stateless across documents: every call to [`parse_document`] starts from
/// a fresh classifier and merger, so re-running the same input yields
/// identical output.
///
/// [`parse_document`]: DanfeParser::parse_document
#[derive(Debug, Clone, Default)]
pub struct DanfeParser {
    config: ExtractionConfig,
}

impl DanfeParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser from an extraction configuration.
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Set the minimum line length below which lines are noise.
    pub fn with_min_line_chars(mut self, chars: usize) -> Self {
        self.config.min_line_chars = chars;
        self
    }

    /// Force the technical window arity instead of detecting it.
    pub fn with_arity_hint(mut self, arity: Arity) -> Self {
        self.config.arity_hint = Some(arity);
        self
    }

    /// Control whether a trailing description buffer attaches to the last
    /// record instead of being discarded.
    pub fn with_trailing_description(mut self, attach: bool) -> Self {
        self.config.attach_trailing_description = attach;
        self
    }

    /// Extract every product record of one document.
    ///
    /// `identifier` is the document provenance (file name); it is copied into
    /// every record along with the issuance date.
    pub fn parse_document(&self, identifier: &str, text: &str) -> DocumentResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!(identifier, chars = text.len(), "parsing document");

        let metadata = extract_metadata(text);
        let lines: Vec<&str> = text.lines().collect();

        let Some(anchor) = find_anchor(&lines) else {
            warn!(identifier, "product table header not found");
            warnings.push("product table header not found".to_string());
            return DocumentResult {
                records: Vec::new(),
                metadata,
                arity: None,
                skipped: Vec::new(),
                warnings,
                processing_time_ms: start.elapsed().as_millis() as u64,
            };
        };

        let mut classifier =
            LineClassifier::new(self.config.min_line_chars, self.config.arity_hint);
        let mut merger = DescriptionMerger::new();
        let mut pending_code: Option<String> = None;
        let mut records: Vec<ProductRecord> = Vec::new();
        let mut skipped = Vec::new();

        for line in &lines[anchor..] {
            let tokens: Vec<&str> = line.split_whitespace().collect();

            // A bare product-code line belongs to a record, not to the
            // description buffer: it fills the previous record when that one
            // came up codeless, otherwise it waits for the next.
            if let [token] = tokens.as_slice() {
                if CODE_TOKEN.is_match(token) {
                    match records.last_mut() {
                        Some(last) if last.codigo.is_empty() => last.codigo = token.to_string(),
                        _ => pending_code = Some(token.to_string()),
                    }
                    continue;
                }
            }

            match classifier.classify(line, &tokens) {
                LineClass::Noise => {}
                LineClass::Continuation => merger.push(line),
                LineClass::ProductData => {
                    let Some(arity) = classifier.arity() else {
                        continue;
                    };
                    match assign(&tokens, arity) {
                        LineOutcome::Assigned(mut record) => {
                            record.descricao = merger.claim(&record.descricao);
                            if record.codigo.is_empty() {
                                if let Some(code) = pending_code.take() {
                                    record.codigo = code;
                                }
                            }
                            records.push(*record);
                        }
                        LineOutcome::Skipped(reason) => {
                            debug!(identifier, %reason, "skipping product line");
                            skipped.push(reason);
                        }
                    }
                }
            }
        }

        // Trailing continuation text only has an owner when the last record
        // ended up without a description of its own.
        if self.config.attach_trailing_description {
            if let (Some(leftover), Some(last)) = (merger.flush(), records.last_mut()) {
                if last.descricao.is_empty() {
                    last.descricao = leftover;
                }
            }
        }

        if records.is_empty() {
            warnings.push("no product lines recognized".to_string());
        }

        for record in &mut records {
            record.arquivo = identifier.to_string();
            record.data_emissao = metadata.data_emissao;
        }

        debug!(
            identifier,
            records = records.len(),
            skipped = skipped.len(),
            "document extracted"
        );

        DocumentResult {
            records,
            metadata,
            arity: classifier.arity(),
            skipped,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const SINGLE_LINE_DOC: &str = "\
NOTA FISCAL ELETRÔNICA
DATA DE EMISSÃO: 05/03/2024
DADOS DO PRODUTO/SERVIÇO
123456 PARAFUSO M6 7891 000 5102 UN 10,00 1,50 0,00 15,00 1,20 0,18 0,00 18,00 0,00
";

    const TWO_LINE_DOC: &str = "\
DANFE
DADOS DO PRODUTO/SERVIÇO
PARAFUSO SEXTAVADO INOX
73181500 000 5102 UN 10,00 1,50 0,00 15,00 1,20 0,18 0,00 18,00 0,00
";

    #[test]
    fn single_line_layout_yields_one_record() {
        let result = DanfeParser::new().parse_document("nfe1.pdf", SINGLE_LINE_DOC);

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.arity, Some(Arity::Thirteen));

        let record = &result.records[0];
        assert_eq!(record.codigo, "123456");
        assert_eq!(record.descricao, "PARAFUSO M6");
        assert_eq!(record.qtd, dec!(10.00));
        assert_eq!(record.aliq_icms, dec!(18.00));
        assert_eq!(record.arquivo, "nfe1.pdf");
        assert_eq!(record.data_emissao, NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn two_line_layout_takes_description_from_its_own_line() {
        let result = DanfeParser::new().parse_document("nfe2.pdf", TWO_LINE_DOC);

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].descricao, "PARAFUSO SEXTAVADO INOX");
        assert_eq!(result.records[0].ncm, "73181500");
    }

    #[test]
    fn missing_anchor_yields_empty_result_not_error() {
        let text = "RECIBO SIMPLES\n123456 PARAFUSO 1,00 2,00\n";
        let result = DanfeParser::new().parse_document("doc.pdf", text);

        assert_eq!(result.records.len(), 0);
        assert_eq!(result.arity, None);
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.contains("header not found"))
        );
    }

    #[test]
    fn pre_anchor_lines_never_become_records() {
        // A numeric-dense summary line above the table must not be misread.
        let text = "\
RESUMO 11111 22222 33333 44444 55555 66666 77777 88888 99999 11,00 22,00 33,00 44,00 55,00
DADOS DO PRODUTO/SERVIÇO
123456 PORCA M8 7891 000 5102 UN 5,00 2,00 0,00 10,00 1,00 0,18 0,00 18,00 0,00
";
        let result = DanfeParser::new().parse_document("doc.pdf", text);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].codigo, "123456");
    }

    #[test]
    fn bare_code_line_after_technical_line_fills_the_code() {
        let text = "\
DADOS DO PRODUTO/SERVIÇO
PARAFUSO SEXTAVADO INOX
73181500 000 5102 UN 10,00 1,50 0,00 15,00 1,20 0,18 0,00 18,00 0,00
987654
";
        let result = DanfeParser::new().parse_document("doc.pdf", text);

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].codigo, "987654");
        assert_eq!(result.records[0].descricao, "PARAFUSO SEXTAVADO INOX");
    }

    #[test]
    fn bare_code_line_before_technical_line_feeds_the_next_record() {
        let text = "\
DADOS DO PRODUTO/SERVIÇO
987654
PARAFUSO SEXTAVADO INOX
73181500 000 5102 UN 10,00 1,50 0,00 15,00 1,20 0,18 0,00 18,00 0,00
";
        let result = DanfeParser::new().parse_document("doc.pdf", text);

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].codigo, "987654");
    }

    #[test]
    fn arity_stays_locked_for_the_whole_document() {
        let text = "\
DADOS DO PRODUTO/SERVIÇO
123456 PARAFUSO M6 7891 000 5102 UN 10,00 1,50 0,00 15,00 1,20 0,18 0,00 18,00 0,00
654321 PORCA M8 7891 000 5102 UN 5,00 2,00 0,00 10,00 1,00 0,18 0,00 18,00 0,00
";
        let result = DanfeParser::new().parse_document("doc.pdf", text);

        assert_eq!(result.arity, Some(Arity::Thirteen));
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].codigo, "123456");
        assert_eq!(result.records[1].codigo, "654321");
    }

    #[test]
    fn metadata_broadcasts_into_every_record() {
        let text = SINGLE_LINE_DOC.replace("05/03/2024", "01/02/2024");
        let result = DanfeParser::new().parse_document("lote.pdf", &text);

        for record in &result.records {
            assert_eq!(record.arquivo, "lote.pdf");
            assert_eq!(record.data_emissao, NaiveDate::from_ymd_opt(2024, 2, 1));
        }
    }

    #[test]
    fn reruns_are_byte_for_byte_identical() {
        let parser = DanfeParser::new();
        let a = parser.parse_document("nfe1.pdf", SINGLE_LINE_DOC);
        let b = parser.parse_document("nfe1.pdf", SINGLE_LINE_DOC);

        let ja = serde_json::to_string(&a.records).unwrap();
        let jb = serde_json::to_string(&b.records).unwrap();
        assert_eq!(ja, jb);
    }

    #[test]
    fn narrow_product_line_under_wider_lock_is_skipped_and_counted() {
        // Dense 13-token line in a document whose template is locked at 15:
        // classified as product data, then rejected by the assignor.
        let text = "\
DADOS DO PRODUTO/SERVIÇO
11111 22222 33333 44444 55555 66666 77777 88888 99999 10,00 20,00 30,00 40,00
";
        let result = DanfeParser::new()
            .with_arity_hint(Arity::Fifteen)
            .parse_document("doc.pdf", text);

        assert_eq!(result.records.len(), 0);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(
            result.skipped[0],
            SkipReason::ArityMismatch {
                expected: 15,
                got: 13
            }
        );
        assert!(result.warnings.iter().any(|w| w.contains("no product lines")));
    }

    #[test]
    fn all_zero_record_is_preserved_not_filtered() {
        let text = "\
DADOS DO PRODUTO/SERVIÇO
123456 PECA 7891 000 5102 UN xx 1,5O O,OO 15,OO 1,2O 0,18 O,OO 18,OO O,OO
";
        let result = DanfeParser::new().parse_document("doc.pdf", text);

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].qtd, dec!(0));
    }
}
