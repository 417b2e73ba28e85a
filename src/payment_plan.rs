use crate::breakdown::WireObject;
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::summary::SaveMode;
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const MAX_PERCENTAGE: u32 = 100;

pub mod wire {
    pub use crate::summary::wire::{DELETED, ENABLED, ID};

    pub const INSTALLMENT_NUMBER: &str = "installmentNumber";
    pub const INSTALLMENT_PERCENTAGE: &str = "installmentPercentage";
    pub const PROJECT_COMPLETION_PERCENTAGE: &str = "projectCompletionPercentage";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentPlanEntry {
    #[schemars(description = "Backend record id, present once the installment has been saved")]
    pub id: Option<i64>,
    pub installment_number: u32,
    #[schemars(description = "Share of the unit price due at this installment (0-100)")]
    pub installment_percentage: u32,
    #[schemars(description = "Construction progress that triggers this installment (0-100)")]
    pub project_completion_percentage: u32,
}

impl PaymentPlanEntry {
    pub fn new(installment_number: u32, installment_percentage: u32, project_completion_percentage: u32) -> Self {
        Self {
            id: None,
            installment_number,
            installment_percentage,
            project_completion_percentage,
        }
    }
}

/// All installments of one project's payment plan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPlan {
    pub project_id: i64,
    pub entries: Vec<PaymentPlanEntry>,
}

impl PaymentPlan {
    /// Validates each installment independently, stopping at the first failure.
    /// The error names the failing installment.
    pub fn validate_all(&self) -> Result<()> {
        self.entries.iter().try_for_each(validate)
    }

    /// Sum of installment percentages. Informational only: plans are not
    /// required to add up to 100.
    pub fn total_installment_percentage(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| u64::from(e.installment_percentage))
            .sum()
    }
}

pub fn validate(entry: &PaymentPlanEntry) -> Result<()> {
    if entry.installment_percentage > MAX_PERCENTAGE {
        return Err(CodecError::PercentageExceeded {
            installment_number: entry.installment_number,
            field: wire::INSTALLMENT_PERCENTAGE,
            value: entry.installment_percentage,
        });
    }
    if entry.project_completion_percentage > MAX_PERCENTAGE {
        return Err(CodecError::PercentageExceeded {
            installment_number: entry.installment_number,
            field: wire::PROJECT_COMPLETION_PERCENTAGE,
            value: entry.project_completion_percentage,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct PaymentPlanValidator {
    config: CodecConfig,
}

impl PaymentPlanValidator {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn validate(&self, entry: &PaymentPlanEntry) -> Result<()> {
        validate(entry)
    }

    pub fn encode(&self, entry: &PaymentPlanEntry, project_id: i64, mode: SaveMode) -> WireObject {
        let mut payload = WireObject::new();

        payload.insert(
            wire::INSTALLMENT_NUMBER.to_string(),
            Value::from(entry.installment_number),
        );
        payload.insert(
            wire::INSTALLMENT_PERCENTAGE.to_string(),
            Value::from(entry.installment_percentage),
        );
        payload.insert(
            wire::PROJECT_COMPLETION_PERCENTAGE.to_string(),
            Value::from(entry.project_completion_percentage),
        );
        payload.insert(
            self.config.payment_plan_project_key.clone(),
            json!({ "id": project_id }),
        );

        if let SaveMode::Update { id } = mode {
            payload.insert(wire::ID.to_string(), Value::from(id));
            payload.insert(wire::DELETED.to_string(), Value::Bool(false));
            payload.insert(wire::ENABLED.to_string(), Value::Bool(true));
        }

        payload
    }

    pub fn validate_and_encode(
        &self,
        entry: &PaymentPlanEntry,
        project_id: i64,
        mode: SaveMode,
    ) -> Result<WireObject> {
        self.validate(entry)?;
        debug!(
            "Installment {} for project {} passed validation",
            entry.installment_number, project_id
        );
        Ok(self.encode(entry, project_id, mode))
    }

    /// Reads an installment back. Missing or non-numeric fields become 0.
    pub fn decode(&self, payload: &WireObject) -> PaymentPlanEntry {
        let number = |key: &str| {
            payload
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(0)
        };

        PaymentPlanEntry {
            id: payload.get(wire::ID).and_then(Value::as_i64),
            installment_number: number(wire::INSTALLMENT_NUMBER),
            installment_percentage: number(wire::INSTALLMENT_PERCENTAGE),
            project_completion_percentage: number(wire::PROJECT_COMPLETION_PERCENTAGE),
        }
    }

    /// Project id carried by an encoded installment, if any.
    pub fn project_id(&self, payload: &WireObject) -> Option<i64> {
        payload
            .get(&self.config.payment_plan_project_key)
            .and_then(|reference| reference.get("id"))
            .and_then(Value::as_i64)
    }
}
