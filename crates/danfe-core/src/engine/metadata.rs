//! Document-level metadata extraction.
//!
//! Anchored pattern search over the whole document text, independent of the
//! product-table scan. Every field is optional on its own: a missing label
//! yields the empty/zero sentinel, never a failed document.

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use super::number::normalize;
use super::patterns::{
    AMOUNT, CHAVE_LABEL, DATE_DMY, DESTINATARIO_LABEL, EMISSAO_LABEL, EMITENTE_LABEL,
    VALOR_TOTAL_LABEL,
};
use crate::models::record::DocumentMetadata;

/// How far past a label a value may sit (in bytes of tail text). Values can
/// wrap onto the next line but never drift further than this.
const LABEL_WINDOW: usize = 120;

/// Extract all document-level fields from the full text.
pub fn extract_metadata(text: &str) -> DocumentMetadata {
    let metadata = DocumentMetadata {
        data_emissao: extract_issue_date(text),
        chave_acesso: extract_access_key(text),
        valor_total_nota: VALOR_TOTAL_LABEL
            .find(text)
            .and_then(|m| find_near(&AMOUNT, &text[m.end()..]))
            .map(|tok| normalize(&tok))
            .unwrap_or_default(),
        emissor: EMITENTE_LABEL
            .find(text)
            .map(|m| first_line_after(&text[m.end()..]))
            .unwrap_or_default(),
        destinatario: DESTINATARIO_LABEL
            .find(text)
            .map(|m| first_line_after(&text[m.end()..]))
            .unwrap_or_default(),
    };

    debug!(
        data_emissao = ?metadata.data_emissao,
        chave = %metadata.chave_acesso,
        "extracted document metadata"
    );
    metadata
}

fn extract_issue_date(text: &str) -> Option<NaiveDate> {
    let label = EMISSAO_LABEL.find(text)?;
    let tail = &text[label.end()..];

    let caps = DATE_DMY.captures(tail)?;
    if caps.get(0)?.start() > LABEL_WINDOW {
        return None;
    }

    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// The 44-digit access key, tolerant of space grouping and line wrapping.
fn extract_access_key(text: &str) -> String {
    let Some(label) = CHAVE_LABEL.find(text) else {
        return String::new();
    };

    let digits: String = text[label.end()..]
        .chars()
        .take(LABEL_WINDOW)
        .filter(|c| c.is_ascii_digit())
        .collect();

    if digits.len() >= 44 {
        digits[..44].to_string()
    } else {
        String::new()
    }
}

/// First token matching `re` within the label window of `tail`.
fn find_near(re: &Regex, tail: &str) -> Option<String> {
    let m = re.find(tail)?;
    (m.start() <= LABEL_WINDOW).then(|| m.as_str().to_string())
}

/// Free-text value after a label: the rest of the label's own line, or the
/// next non-empty line when the label ends its line.
fn first_line_after(tail: &str) -> String {
    let mut lines = tail.lines();

    if let Some(rest) = lines.next() {
        let rest = rest.trim().trim_start_matches([':', '-']).trim();
        if !rest.is_empty() {
            return rest.to_string();
        }
    }

    lines
        .take(2)
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .to_string()
}
