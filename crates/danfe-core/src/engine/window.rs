//! Technical field window assignment.
//!
//! The rightmost N tokens of a product-data line (N = locked arity) form the
//! technical window. The thirteen tax/value fields are bound by a single
//! slice pattern so the right-to-left order lives in exactly one place
//! instead of repeated index literals.

use serde::Serialize;

use super::number::normalize;
use super::patterns::CODE_TOKEN;
use crate::models::record::{Arity, ProductRecord};

/// Why a classified product line produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum SkipReason {
    /// Line has fewer tokens than the locked window width.
    ArityMismatch { expected: usize, got: usize },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::ArityMismatch { expected, got } => {
                write!(f, "arity mismatch: expected {expected} tokens, got {got}")
            }
        }
    }
}

/// Outcome of field assignment for one classified product line.
///
/// Skips are data, not errors: callers count them, log them, and keep going.
#[derive(Debug)]
pub enum LineOutcome {
    Assigned(Box<ProductRecord>),
    Skipped(SkipReason),
}

/// Map the token sequence of a product-data line to a [`ProductRecord`].
///
/// The trailing window is consumed right-to-left in the fixed field order;
/// everything left of it becomes code and description. Quantity/value tokens
/// pass through the number normalizer; code fields stay as raw strings.
pub fn assign(tokens: &[&str], arity: Arity) -> LineOutcome {
    let width = arity.width();
    if tokens.len() < width {
        return LineOutcome::Skipped(SkipReason::ArityMismatch {
            expected: width,
            got: tokens.len(),
        });
    }

    let (remainder, window) = tokens.split_at(tokens.len() - width);

    // The last thirteen window slots are the tax/value fields in both
    // template variants; a fifteen-wide window prepends the product code and
    // one discount/placeholder slot.
    let tech = &window[width - Arity::TECH_FIELDS..];
    let [ncm, cst, cfop, unid, qtd, vlr_unit, vlr_desc, vlr_total, bc_icms, vlr_icms, vlr_ipi, aliq_icms, aliq_ipi] =
        tech
    else {
        return LineOutcome::Skipped(SkipReason::ArityMismatch {
            expected: Arity::TECH_FIELDS,
            got: tech.len(),
        });
    };

    let (codigo, descricao) = match arity {
        Arity::Fifteen => (window[0].to_string(), remainder.join(" ")),
        Arity::Thirteen => match remainder {
            [code, rest @ ..] if CODE_TOKEN.is_match(code) => (code.to_string(), rest.join(" ")),
            _ => (String::new(), remainder.join(" ")),
        },
    };

    LineOutcome::Assigned(Box::new(ProductRecord {
        arquivo: String::new(),
        data_emissao: None,
        codigo,
        descricao,
        ncm: ncm.to_string(),
        cst: cst.to_string(),
        cfop: cfop.to_string(),
        unid: unid.to_string(),
        qtd: normalize(qtd),
        vlr_unit: normalize(vlr_unit),
        vlr_desc: normalize(vlr_desc),
        vlr_total: normalize(vlr_total),
        bc_icms: normalize(bc_icms),
        vlr_icms: normalize(vlr_icms),
        vlr_ipi: normalize(vlr_ipi),
        aliq_icms: normalize(aliq_icms),
        aliq_ipi: normalize(aliq_ipi),
    }))
}
