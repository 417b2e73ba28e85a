use crate::field_table::{CategoryFieldTable, CategoryFields};
use crate::numeric::{from_wire_number, to_wire_number, Amount, NumberFormat};
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type WireObject = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownCategory {
    #[schemars(description = "0-based position of the category in the fixed category sequence")]
    pub ordinal: u32,

    #[serde(default)]
    #[schemars(description = "Amount held outside the escrow account")]
    pub out_of_escrow: Option<Amount>,

    #[serde(default)]
    #[schemars(description = "Amount held within the escrow account")]
    pub within_escrow: Option<Amount>,

    #[serde(default)]
    #[schemars(
        description = "Category total. Not required to equal outOfEscrow + withinEscrow"
    )]
    pub total: Option<Amount>,

    #[serde(default)]
    #[schemars(description = "Free-text note explaining a deviation from the cost cap")]
    pub exceptional_cap_value: Option<String>,
}

impl BreakdownCategory {
    pub fn new(ordinal: u32) -> Self {
        Self {
            ordinal,
            ..Default::default()
        }
    }

    pub fn with_amounts(
        ordinal: u32,
        total: impl Into<Amount>,
        out_of_escrow: impl Into<Amount>,
        within_escrow: impl Into<Amount>,
    ) -> Self {
        Self {
            ordinal,
            total: Some(total.into()),
            out_of_escrow: Some(out_of_escrow.into()),
            within_escrow: Some(within_escrow.into()),
            exceptional_cap_value: None,
        }
    }

    /// Display name of the category, if the ordinal is known.
    pub fn name(&self) -> Option<&'static str> {
        CategoryFieldTable::get(self.ordinal).map(|row| row.name)
    }

    /// The form this category takes after a trip through the wire: amounts
    /// parsed to numbers (or dropped), a missing cap value read as empty, and
    /// any field the category's table row does not carry cleared.
    pub fn normalized(&self, format: &NumberFormat) -> Self {
        let row = CategoryFieldTable::get(self.ordinal);
        let keep = |field: Option<&'static str>, amount: &Option<Amount>| {
            field
                .and_then(|_| format.parse_optional(amount.as_ref()))
                .map(Amount::Number)
        };

        Self {
            ordinal: self.ordinal,
            total: format.parse_optional(self.total.as_ref()).map(Amount::Number),
            out_of_escrow: keep(row.and_then(|r| r.out_field), &self.out_of_escrow),
            within_escrow: keep(row.and_then(|r| r.within_field), &self.within_escrow),
            exceptional_cap_value: Some(
                row.and_then(|r| r.cap_val_field)
                    .and_then(|_| self.exceptional_cap_value.clone())
                    .unwrap_or_default(),
            ),
        }
    }
}

/// Maps breakdown categories to and from their flat wire fields using the
/// literal [`CategoryFieldTable`].
#[derive(Debug, Clone, Default)]
pub struct BreakdownCodec {
    format: NumberFormat,
}

impl BreakdownCodec {
    pub fn new(format: NumberFormat) -> Self {
        Self { format }
    }

    pub fn encode(&self, categories: &[BreakdownCategory]) -> WireObject {
        let mut fragment = WireObject::new();
        self.encode_into(categories, &mut fragment);
        fragment
    }

    /// Writes the wire fields of every known category into `target`.
    /// Unknown ordinals are skipped.
    pub fn encode_into(&self, categories: &[BreakdownCategory], target: &mut WireObject) {
        for category in categories {
            match CategoryFieldTable::get(category.ordinal) {
                Some(row) => self.encode_row(row, category, target),
                None => debug!(
                    "Skipping breakdown category with unknown ordinal {}",
                    category.ordinal
                ),
            }
        }
    }

    fn encode_row(&self, row: &CategoryFields, category: &BreakdownCategory, target: &mut WireObject) {
        target.insert(
            row.total_field.to_string(),
            to_wire_number(self.format.parse_optional(category.total.as_ref())),
        );

        if let Some(field) = row.out_field {
            target.insert(
                field.to_string(),
                to_wire_number(self.format.parse_optional(category.out_of_escrow.as_ref())),
            );
        }

        if let Some(field) = row.within_field {
            target.insert(
                field.to_string(),
                to_wire_number(self.format.parse_optional(category.within_escrow.as_ref())),
            );
        }

        if let Some(field) = row.cap_val_field {
            let cap_value = category.exceptional_cap_value.clone().unwrap_or_default();
            target.insert(field.to_string(), Value::String(cap_value));
        }
    }

    /// Reads back one category per table row, in ordinal order.
    pub fn decode(&self, fragment: &WireObject) -> Vec<BreakdownCategory> {
        CategoryFieldTable::entries()
            .iter()
            .map(|row| self.decode_row(row, fragment))
            .collect()
    }

    fn decode_row(&self, row: &CategoryFields, fragment: &WireObject) -> BreakdownCategory {
        let amount = |field: Option<&str>| {
            field.and_then(|name| from_wire_number(fragment.get(name), &self.format))
        };

        let cap_value = row
            .cap_val_field
            .and_then(|name| fragment.get(name))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        BreakdownCategory {
            ordinal: row.ordinal,
            total: amount(Some(row.total_field)),
            out_of_escrow: amount(row.out_field),
            within_escrow: amount(row.within_field),
            exceptional_cap_value: Some(cap_value),
        }
    }
}

pub fn encode_breakdown(categories: &[BreakdownCategory]) -> WireObject {
    BreakdownCodec::default().encode(categories)
}

pub fn decode_breakdown(fragment: &WireObject) -> Vec<BreakdownCategory> {
    BreakdownCodec::default().decode(fragment)
}
