use crate::breakdown::BreakdownCategory;
use crate::field_table::CategoryFieldTable;
use crate::numeric::NumberFormat;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalMismatch {
    pub ordinal: u32,
    pub category: String,
    pub total: f64,
    pub out_of_escrow: f64,
    pub within_escrow: f64,
}

impl TotalMismatch {
    pub fn difference(&self) -> f64 {
        self.total - (self.out_of_escrow + self.within_escrow)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub checked: usize,
    pub mismatches: Vec<TotalMismatch>,
}

impl ReconciliationReport {
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Reports categories whose total differs from out-of-escrow plus
/// within-escrow by more than `tolerance`. Only categories the wire carries
/// with an escrow split are checked, and rows missing any of the three
/// amounts are skipped. Nothing is corrected: the backend accepts
/// inconsistent rows and the encoder sends them as entered.
pub fn reconcile_breakdown(
    categories: &[BreakdownCategory],
    format: &NumberFormat,
    tolerance: f64,
) -> ReconciliationReport {
    let mut report = ReconciliationReport::default();

    for category in categories {
        let Some(row) = CategoryFieldTable::get(category.ordinal) else {
            continue;
        };
        if !row.has_escrow_split() {
            continue;
        }

        let amounts = (
            format.parse_optional(category.total.as_ref()),
            format.parse_optional(category.out_of_escrow.as_ref()),
            format.parse_optional(category.within_escrow.as_ref()),
        );

        let (Some(total), Some(out_of_escrow), Some(within_escrow)) = amounts else {
            continue;
        };

        report.checked += 1;

        if (total - (out_of_escrow + within_escrow)).abs() > tolerance {
            let mismatch = TotalMismatch {
                ordinal: category.ordinal,
                category: row.name.to_string(),
                total,
                out_of_escrow,
                within_escrow,
            };
            debug!(
                "Breakdown category {} ({}) total {} differs from escrow split by {}",
                mismatch.ordinal,
                mismatch.category,
                mismatch.total,
                mismatch.difference()
            );
            report.mismatches.push(mismatch);
        }
    }

    report
}
