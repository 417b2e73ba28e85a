//! # Financial Summary Codec
//!
//! A library for converting project financial summaries between their
//! structured, form-friendly representation and the flat wire schema used by
//! the escrow reporting backend.
//!
//! ## Core Concepts
//!
//! - **Breakdown Category**: One financial line item (Land Cost, Mortgage, ...) identified by
//!   its fixed ordinal and split into out-of-escrow and within-escrow amounts
//! - **Field Table**: A literal table naming the wire fields of every ordinal, including the
//!   irregular names the backend contract carries
//! - **Amounts**: User-typed text with thousands separators is normalized to numbers; blank or
//!   malformed input becomes `null`, never `0`
//! - **Summary Document**: Estimate, actual, breakdown and additional sections plus the owning
//!   project reference, encoded once per save
//! - **Payment Plans**: Installments whose percentages are capped at 100
//!
//! ## Example
//!
//! ```rust,ignore
//! use financial_summary_codec::*;
//!
//! let doc = FinancialSummaryDocument {
//!     estimate: EstimateSection {
//!         construction_cost: Some(Amount::from("2,500,000")),
//!         ..Default::default()
//!     },
//!     breakdown: vec![BreakdownCategory::with_amounts(0, "100000", "40000", "60000")],
//!     additional: AdditionalSection {
//!         unit_registration_fees: Some(Amount::from("5000")),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//!
//! let payload = encode_financial_summary(&doc, 42, SaveMode::Create);
//! assert_eq!(payload["mffsEstConstructionCost"], 2500000);
//!
//! let restored = decode_financial_summary(Some(&serde_json::Value::Object(payload)));
//! ```

pub mod breakdown;
pub mod config;
pub mod dates;
pub mod error;
pub mod field_table;
pub mod numeric;
pub mod payment_plan;
pub mod reconcile;
pub mod summary;

pub use breakdown::{decode_breakdown, encode_breakdown, BreakdownCategory, BreakdownCodec, WireObject};
pub use config::{CodecConfig, DEFAULT_PROJECT_REFERENCE_KEY};
pub use dates::{normalize_date, normalize_date_now, parse_date, DateValue};
pub use error::{CodecError, Result};
pub use field_table::{CategoryFieldTable, CategoryFields, CATEGORY_COUNT};
pub use numeric::{format_number, parse_number, parse_number_str, Amount, NumberFormat};
pub use payment_plan::{PaymentPlan, PaymentPlanEntry, PaymentPlanValidator};
pub use reconcile::{reconcile_breakdown, ReconciliationReport, TotalMismatch};
pub use summary::{
    decode_financial_summary, encode_financial_summary, ActualSection, AdditionalSection,
    EstimateSection, FinancialSummaryCodec, FinancialSummaryDocument, PersistenceFlags,
    ProjectReference, SaveMode,
};
