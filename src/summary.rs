use crate::breakdown::{BreakdownCategory, BreakdownCodec, WireObject};
use crate::config::CodecConfig;
use crate::dates::{from_wire_date, normalize_date, DateValue};
use crate::numeric::{from_wire_number, to_wire_number, Amount, NumberFormat};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub mod wire {
    pub const ID: &str = "id";
    pub const DELETED: &str = "deleted";
    pub const ENABLED: &str = "enabled";

    pub const EST_REVENUE: &str = "mffsEstRevenue";
    pub const EST_CONSTRUCTION_COST: &str = "mffsEstConstructionCost";
    pub const EST_PROJECT_MGMT_EXPENSE: &str = "mffsEstProjectMgmtExpense";
    pub const EST_LAND_COST: &str = "mffsEstLandCost";
    pub const EST_MARKETING_EXPENSE: &str = "mffsEstMarketingExpense";
    pub const EST_DATE: &str = "mffsEstDate";
    pub const EST_EXCEPT_CAP_VAL: &str = "mffsEstExceptCapVal";

    pub const ACTUAL_SOLD_VALUE: &str = "mffsActualSoldValue";
    pub const ACTUAL_CONSTRUCTION_COST: &str = "mffsActualConstructionCost";
    pub const ACTUAL_INFRA_COST: &str = "mffsActualInfraCost";
    pub const ACTUAL_LAND_COST: &str = "mffsActualLandCost";
    pub const ACTUAL_MARKETING_EXPENSE: &str = "mffsActualMarketingExpense";
    pub const ACTUAL_PROJECT_MGMT_EXPENSE: &str = "mffsActualProjectMgmtExpense";
    pub const ACTUAL_DATE: &str = "mffsActualDate";
    pub const ACTUAL_EXCEPT_CAP_VAL: &str = "mffsActualExceptCapVal";

    pub const CREDIT_INTEREST: &str = "mffsCreditInterest";
    pub const PAYMENT_FOR_RETENTION: &str = "mffsPaymentForRetentionAcc";
    pub const DEVELOPER_REIMBURSE: &str = "mffsDeveloperReimburse";
    pub const UNIT_REG_FEES: &str = "mffsUnitRegFees";
    pub const CREDIT_INTEREST_PROFIT: &str = "mffsCreditInterestProfit";
    pub const VAT_CAPPED_COST: &str = "mffsVatCappedCost";
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct EstimateSection {
    pub revenue: Option<String>,
    pub construction_cost: Option<Amount>,
    pub project_management_expense: Option<Amount>,
    pub land_cost: Option<Amount>,
    pub marketing_expense: Option<Amount>,
    #[schemars(description = "Date of the estimate. Defaults to the save instant when absent")]
    pub date: Option<DateValue>,
    pub exceptional_cap_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ActualSection {
    pub sold_value: Option<Amount>,
    pub construction_cost: Option<Amount>,
    pub infra_cost: Option<Amount>,
    pub land_cost: Option<Amount>,
    pub marketing_expense: Option<Amount>,
    pub project_management_expense: Option<Amount>,
    #[schemars(description = "Date of the actuals. Defaults to the save instant when absent")]
    pub date: Option<DateValue>,
    pub exceptional_cap_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct AdditionalSection {
    pub credit_interest_on_retention: Option<Amount>,
    pub payments_from_retention: Option<Amount>,
    pub developer_reimbursements: Option<Amount>,
    pub unit_registration_fees: Option<Amount>,
    pub credit_interest_on_escrow: Option<Amount>,
    pub vat_capped_cost: Option<Amount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectReference {
    pub id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PersistenceFlags {
    pub deleted: bool,
    pub enabled: bool,
}

impl Default for PersistenceFlags {
    fn default() -> Self {
        Self {
            deleted: false,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialSummaryDocument {
    #[schemars(description = "Backend record id. Absent until the summary is first saved")]
    pub id: Option<i64>,
    pub estimate: EstimateSection,
    pub actual: ActualSection,
    #[schemars(description = "Breakdown categories keyed by ordinal (0..=29)")]
    pub breakdown: Vec<BreakdownCategory>,
    pub additional: AdditionalSection,
    pub project_reference: Option<ProjectReference>,
    pub persistence_flags: PersistenceFlags,
}

impl FinancialSummaryDocument {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(FinancialSummaryDocument)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// Whether a save creates a new record (POST) or replaces an existing one (PUT).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Create,
    Update { id: i64 },
}

impl SaveMode {
    pub fn from_record_id(id: Option<i64>) -> Self {
        match id {
            Some(id) => SaveMode::Update { id },
            None => SaveMode::Create,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FinancialSummaryCodec {
    config: CodecConfig,
    breakdown: BreakdownCodec,
}

impl FinancialSummaryCodec {
    pub fn new(config: CodecConfig) -> Self {
        let breakdown = BreakdownCodec::new(config.number_format);
        Self { config, breakdown }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn encode(&self, doc: &FinancialSummaryDocument, project_id: i64, mode: SaveMode) -> WireObject {
        self.encode_at(doc, project_id, mode, Utc::now())
    }

    /// Encodes with an explicit instant standing in for absent dates.
    pub fn encode_at(
        &self,
        doc: &FinancialSummaryDocument,
        project_id: i64,
        mode: SaveMode,
        now: DateTime<Utc>,
    ) -> WireObject {
        info!(
            "Encoding financial summary for project {} ({:?})",
            project_id, mode
        );

        let mut payload = WireObject::new();

        self.encode_estimate(&doc.estimate, now, &mut payload);
        self.encode_actual(&doc.actual, now, &mut payload);
        self.breakdown.encode_into(&doc.breakdown, &mut payload);
        self.encode_additional(&doc.additional, &mut payload);

        payload.insert(
            self.config.project_reference_key.clone(),
            json!({ "id": project_id }),
        );
        payload.insert(wire::DELETED.to_string(), Value::Bool(false));
        payload.insert(wire::ENABLED.to_string(), Value::Bool(true));

        if let SaveMode::Update { id } = mode {
            payload.insert(wire::ID.to_string(), Value::from(id));
        }

        debug!("Financial summary payload has {} fields", payload.len());

        payload
    }

    fn put_amount(&self, payload: &mut WireObject, key: &str, amount: Option<&Amount>) {
        let value = self.config.number_format.parse_optional(amount);
        payload.insert(key.to_string(), to_wire_number(value));
    }

    fn encode_estimate(&self, est: &EstimateSection, now: DateTime<Utc>, payload: &mut WireObject) {
        payload.insert(
            wire::EST_REVENUE.to_string(),
            est.revenue.clone().map(Value::String).unwrap_or(Value::Null),
        );
        self.put_amount(payload, wire::EST_CONSTRUCTION_COST, est.construction_cost.as_ref());
        self.put_amount(
            payload,
            wire::EST_PROJECT_MGMT_EXPENSE,
            est.project_management_expense.as_ref(),
        );
        self.put_amount(payload, wire::EST_LAND_COST, est.land_cost.as_ref());
        self.put_amount(payload, wire::EST_MARKETING_EXPENSE, est.marketing_expense.as_ref());
        payload.insert(
            wire::EST_DATE.to_string(),
            Value::String(normalize_date(est.date.as_ref(), now)),
        );
        payload.insert(
            wire::EST_EXCEPT_CAP_VAL.to_string(),
            Value::String(est.exceptional_cap_value.clone().unwrap_or_default()),
        );
    }

    fn encode_actual(&self, actual: &ActualSection, now: DateTime<Utc>, payload: &mut WireObject) {
        self.put_amount(payload, wire::ACTUAL_SOLD_VALUE, actual.sold_value.as_ref());
        self.put_amount(payload, wire::ACTUAL_CONSTRUCTION_COST, actual.construction_cost.as_ref());
        self.put_amount(payload, wire::ACTUAL_INFRA_COST, actual.infra_cost.as_ref());
        self.put_amount(payload, wire::ACTUAL_LAND_COST, actual.land_cost.as_ref());
        self.put_amount(payload, wire::ACTUAL_MARKETING_EXPENSE, actual.marketing_expense.as_ref());
        self.put_amount(
            payload,
            wire::ACTUAL_PROJECT_MGMT_EXPENSE,
            actual.project_management_expense.as_ref(),
        );
        payload.insert(
            wire::ACTUAL_DATE.to_string(),
            Value::String(normalize_date(actual.date.as_ref(), now)),
        );
        payload.insert(
            wire::ACTUAL_EXCEPT_CAP_VAL.to_string(),
            Value::String(actual.exceptional_cap_value.clone().unwrap_or_default()),
        );
    }

    fn encode_additional(&self, add: &AdditionalSection, payload: &mut WireObject) {
        self.put_amount(payload, wire::CREDIT_INTEREST, add.credit_interest_on_retention.as_ref());
        self.put_amount(payload, wire::PAYMENT_FOR_RETENTION, add.payments_from_retention.as_ref());
        self.put_amount(payload, wire::DEVELOPER_REIMBURSE, add.developer_reimbursements.as_ref());
        self.put_amount(payload, wire::UNIT_REG_FEES, add.unit_registration_fees.as_ref());
        self.put_amount(payload, wire::CREDIT_INTEREST_PROFIT, add.credit_interest_on_escrow.as_ref());
        self.put_amount(payload, wire::VAT_CAPPED_COST, add.vat_capped_cost.as_ref());
    }

    /// Decodes a payload fetched from the backend. A missing or `null`
    /// payload means nothing has been saved yet and yields the default document.
    pub fn decode(&self, payload: Option<&Value>) -> FinancialSummaryDocument {
        let object = match payload {
            None | Some(Value::Null) => {
                debug!("No financial summary saved yet, returning empty document");
                return FinancialSummaryDocument::default();
            }
            Some(Value::Object(object)) => object,
            Some(other) => {
                warn!(
                    "Ignoring financial summary payload that is not an object: {}",
                    other
                );
                return FinancialSummaryDocument::default();
            }
        };

        let reader = WireReader {
            object,
            format: &self.config.number_format,
        };

        let doc = FinancialSummaryDocument {
            id: object.get(wire::ID).and_then(Value::as_i64),
            estimate: EstimateSection {
                revenue: reader.text(wire::EST_REVENUE),
                construction_cost: reader.amount(wire::EST_CONSTRUCTION_COST),
                project_management_expense: reader.amount(wire::EST_PROJECT_MGMT_EXPENSE),
                land_cost: reader.amount(wire::EST_LAND_COST),
                marketing_expense: reader.amount(wire::EST_MARKETING_EXPENSE),
                date: from_wire_date(object.get(wire::EST_DATE)),
                exceptional_cap_value: Some(reader.text(wire::EST_EXCEPT_CAP_VAL).unwrap_or_default()),
            },
            actual: ActualSection {
                sold_value: reader.amount(wire::ACTUAL_SOLD_VALUE),
                construction_cost: reader.amount(wire::ACTUAL_CONSTRUCTION_COST),
                infra_cost: reader.amount(wire::ACTUAL_INFRA_COST),
                land_cost: reader.amount(wire::ACTUAL_LAND_COST),
                marketing_expense: reader.amount(wire::ACTUAL_MARKETING_EXPENSE),
                project_management_expense: reader.amount(wire::ACTUAL_PROJECT_MGMT_EXPENSE),
                date: from_wire_date(object.get(wire::ACTUAL_DATE)),
                exceptional_cap_value: Some(
                    reader.text(wire::ACTUAL_EXCEPT_CAP_VAL).unwrap_or_default(),
                ),
            },
            breakdown: self.breakdown.decode(object),
            additional: AdditionalSection {
                credit_interest_on_retention: reader.amount(wire::CREDIT_INTEREST),
                payments_from_retention: reader.amount(wire::PAYMENT_FOR_RETENTION),
                developer_reimbursements: reader.amount(wire::DEVELOPER_REIMBURSE),
                unit_registration_fees: reader.amount(wire::UNIT_REG_FEES),
                credit_interest_on_escrow: reader.amount(wire::CREDIT_INTEREST_PROFIT),
                vat_capped_cost: reader.amount(wire::VAT_CAPPED_COST),
            },
            project_reference: object
                .get(&self.config.project_reference_key)
                .and_then(|reference| reference.get("id"))
                .and_then(Value::as_i64)
                .map(|id| ProjectReference { id }),
            persistence_flags: PersistenceFlags {
                deleted: object.get(wire::DELETED).and_then(Value::as_bool).unwrap_or(false),
                enabled: object.get(wire::ENABLED).and_then(Value::as_bool).unwrap_or(true),
            },
        };

        info!(
            "Decoded financial summary {:?} for project {:?}",
            doc.id,
            doc.project_reference.map(|r| r.id)
        );

        doc
    }
}

struct WireReader<'a> {
    object: &'a WireObject,
    format: &'a NumberFormat,
}

impl<'a> WireReader<'a> {
    fn amount(&self, key: &str) -> Option<Amount> {
        from_wire_number(self.object.get(key), self.format)
    }

    fn text(&self, key: &str) -> Option<String> {
        self.object
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

pub fn encode_financial_summary(
    doc: &FinancialSummaryDocument,
    project_id: i64,
    mode: SaveMode,
) -> WireObject {
    FinancialSummaryCodec::default().encode(doc, project_id, mode)
}

pub fn decode_financial_summary(payload: Option<&Value>) -> FinancialSummaryDocument {
    FinancialSummaryCodec::default().decode(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_table::CATEGORY_COUNT;
    use chrono::{NaiveDate, TimeZone};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 29, 9, 0, 0).unwrap()
    }

    fn sample_document() -> FinancialSummaryDocument {
        FinancialSummaryDocument {
            estimate: EstimateSection {
                revenue: Some("15,000,000".to_string()),
                construction_cost: Some(Amount::from("2,500,000")),
                land_cost: Some(Amount::from(1_000_000.0)),
                date: Some(DateValue::from(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap())),
                ..Default::default()
            },
            actual: ActualSection {
                sold_value: Some(Amount::from("9,750,000.25")),
                infra_cost: Some(Amount::from("")),
                exceptional_cap_value: Some("land revaluation".to_string()),
                ..Default::default()
            },
            breakdown: vec![BreakdownCategory::with_amounts(0, "100000", "40000", "60000")],
            additional: AdditionalSection {
                unit_registration_fees: Some(Amount::from("5000")),
                vat_capped_cost: Some(Amount::from("0")),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_encode_sections() {
        let codec = FinancialSummaryCodec::default();
        let payload = codec.encode_at(&sample_document(), 42, SaveMode::Create, fixed_now());

        assert_eq!(payload[wire::EST_REVENUE], json!("15,000,000"));
        assert_eq!(payload[wire::EST_CONSTRUCTION_COST], json!(2500000));
        assert_eq!(payload[wire::EST_LAND_COST], json!(1000000));
        assert_eq!(payload[wire::EST_MARKETING_EXPENSE], Value::Null);
        assert_eq!(payload[wire::EST_DATE], json!("2023-12-31T00:00:00.000Z"));
        assert_eq!(payload[wire::EST_EXCEPT_CAP_VAL], json!(""));

        assert_eq!(payload[wire::ACTUAL_SOLD_VALUE], json!(9750000.25));
        assert_eq!(payload[wire::ACTUAL_INFRA_COST], Value::Null);
        assert_eq!(payload[wire::ACTUAL_DATE], json!("2024-02-29T09:00:00.000Z"));
        assert_eq!(payload[wire::ACTUAL_EXCEPT_CAP_VAL], json!("land revaluation"));

        assert_eq!(payload[wire::UNIT_REG_FEES], json!(5000));
        assert_eq!(payload[wire::VAT_CAPPED_COST], json!(0));
        assert_eq!(payload[wire::CREDIT_INTEREST], Value::Null);

        assert_eq!(payload["mffsCurCashRecvdTotal"], json!(100000));
        assert_eq!(payload["realEstateAssetDTO"], json!({ "id": 42 }));
        assert_eq!(payload[wire::DELETED], json!(false));
        assert_eq!(payload[wire::ENABLED], json!(true));
    }

    #[test]
    fn test_create_omits_id_and_update_carries_it() {
        let codec = FinancialSummaryCodec::default();
        let doc = sample_document();

        let created = codec.encode_at(&doc, 7, SaveMode::Create, fixed_now());
        assert!(!created.contains_key(wire::ID));

        let updated = codec.encode_at(&doc, 7, SaveMode::Update { id: 311 }, fixed_now());
        assert_eq!(updated[wire::ID], json!(311));
    }

    #[test]
    fn test_save_mode_from_record_id() {
        assert_eq!(SaveMode::from_record_id(None), SaveMode::Create);
        assert_eq!(SaveMode::from_record_id(Some(9)), SaveMode::Update { id: 9 });
    }

    #[test]
    fn test_custom_project_reference_key() {
        let config = CodecConfig {
            project_reference_key: "projectDTO".to_string(),
            ..Default::default()
        };
        let codec = FinancialSummaryCodec::new(config);
        let payload = codec.encode_at(&FinancialSummaryDocument::default(), 3, SaveMode::Create, fixed_now());

        assert_eq!(payload["projectDTO"], json!({ "id": 3 }));
        assert!(!payload.contains_key("realEstateAssetDTO"));

        let decoded = codec.decode(Some(&Value::Object(payload)));
        assert_eq!(decoded.project_reference, Some(ProjectReference { id: 3 }));
    }

    #[test]
    fn test_decode_absent_payload_is_default() {
        assert_eq!(decode_financial_summary(None), FinancialSummaryDocument::default());
        assert_eq!(
            decode_financial_summary(Some(&Value::Null)),
            FinancialSummaryDocument::default()
        );
        assert_eq!(
            decode_financial_summary(Some(&json!([1, 2, 3]))),
            FinancialSummaryDocument::default()
        );
    }

    #[test]
    fn test_decode_is_structural_inverse() {
        let codec = FinancialSummaryCodec::default();
        let payload = codec.encode_at(&sample_document(), 42, SaveMode::Update { id: 5 }, fixed_now());
        let doc = codec.decode(Some(&Value::Object(payload)));

        assert_eq!(doc.id, Some(5));
        assert_eq!(doc.project_reference, Some(ProjectReference { id: 42 }));
        assert_eq!(doc.persistence_flags, PersistenceFlags::default());

        assert_eq!(doc.estimate.revenue.as_deref(), Some("15,000,000"));
        assert_eq!(doc.estimate.construction_cost, Some(Amount::Number(2_500_000.0)));
        assert_eq!(doc.estimate.marketing_expense, None);
        assert_eq!(
            doc.estimate.date,
            Some(DateValue::Timestamp(Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap()))
        );

        assert_eq!(doc.actual.sold_value, Some(Amount::Number(9_750_000.25)));
        assert_eq!(doc.actual.exceptional_cap_value.as_deref(), Some("land revaluation"));

        assert_eq!(doc.additional.unit_registration_fees, Some(Amount::Number(5000.0)));
        assert_eq!(doc.additional.vat_capped_cost, Some(Amount::Number(0.0)));

        assert_eq!(doc.breakdown.len(), CATEGORY_COUNT);
        assert_eq!(doc.breakdown[0].within_escrow, Some(Amount::Number(60000.0)));
    }

    #[test]
    fn test_decode_reads_persistence_flags() {
        let doc = decode_financial_summary(Some(&json!({ "deleted": true, "enabled": false })));
        assert!(doc.persistence_flags.deleted);
        assert!(!doc.persistence_flags.enabled);
    }

    #[test]
    fn test_document_from_form_json() {
        let doc: FinancialSummaryDocument = serde_json::from_value(json!({
            "estimate": { "constructionCost": "2,500,000", "date": "2024-01-01" },
            "breakdown": [{ "ordinal": 5, "outOfEscrow": 250 }],
            "additional": { "unitRegistrationFees": 5000 }
        }))
        .unwrap();

        assert_eq!(doc.estimate.construction_cost, Some(Amount::from("2,500,000")));
        assert_eq!(
            doc.estimate.date,
            Some(DateValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()))
        );
        assert_eq!(doc.breakdown.len(), 1);
        assert_eq!(doc.persistence_flags, PersistenceFlags::default());
    }

    #[test]
    fn test_schema_generation() {
        let schema_json = FinancialSummaryDocument::schema_as_json().unwrap();
        assert!(schema_json.contains("breakdown"));
        assert!(schema_json.contains("exceptionalCapValue"));
        assert!(schema_json.contains("persistenceFlags"));
    }
}
