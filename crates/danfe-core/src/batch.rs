//! Batch extraction across documents.
//!
//! Documents are independent, so the batch is a parallel map followed by an
//! ordered join: output order always follows input order, never completion
//! order. Within one document processing stays sequential (the description
//! merger has line-to-line dependencies).

use rayon::prelude::*;
use tracing::info;

use crate::engine::{DanfeParser, DocumentResult};
use crate::models::record::ProductRecord;

/// Extract every document of a batch in parallel.
///
/// Each entry is an `(identifier, full_text)` pair; results come back in
/// input order with one [`DocumentResult`] per document.
pub fn parse_documents(parser: &DanfeParser, documents: &[(String, String)]) -> Vec<DocumentResult> {
    info!(count = documents.len(), "extracting document batch");

    documents
        .par_iter()
        .map(|(identifier, text)| parser.parse_document(identifier, text))
        .collect()
}

/// Flatten batch results into one record sequence for tabular export,
/// preserving document and line order.
pub fn collect_records(results: Vec<DocumentResult>) -> Vec<ProductRecord> {
    results.into_iter().flat_map(|r| r.records).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(code: &str) -> String {
        format!(
            "DADOS DO PRODUTO/SERVIÇO\n{code} PARAFUSO M6 7891 000 5102 UN 10,00 1,50 0,00 15,00 1,20 0,18 0,00 18,00 0,00\n"
        )
    }

    #[test]
    fn results_preserve_input_order() {
        let documents: Vec<(String, String)> = (0..32)
            .map(|i| (format!("doc{i:02}.pdf"), doc(&format!("10{i:04}"))))
            .collect();

        let parser = DanfeParser::new();
        let results = parse_documents(&parser, &documents);

        assert_eq!(results.len(), 32);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.records[0].arquivo, format!("doc{i:02}.pdf"));
            assert_eq!(result.records[0].codigo, format!("10{i:04}"));
        }
    }

    #[test]
    fn unusable_documents_do_not_block_the_batch() {
        let documents = vec![
            ("a.pdf".to_string(), doc("100001")),
            ("b.pdf".to_string(), "SEM TABELA AQUI".to_string()),
            ("c.pdf".to_string(), doc("100003")),
        ];

        let results = parse_documents(&DanfeParser::new(), &documents);
        let records = collect_records(results);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].arquivo, "a.pdf");
        assert_eq!(records[1].arquivo, "c.pdf");
    }

    #[test]
    fn empty_batch_yields_empty_output() {
        let results = parse_documents(&DanfeParser::new(), &[]);
        assert!(collect_records(results).is_empty());
    }
}
