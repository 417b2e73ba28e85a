//! The literal ordinal-to-wire-field table for breakdown categories.
//!
//! Most rows follow `mffsCur<Abbrev>{Total,OutEscrow,WithinEscrow,ExceptCapVal}`,
//! but the backend contract carries a handful of irregular names (Mortgage's
//! out-of-escrow field has no category prefix, for one). Every name is written
//! out in full here; none are assembled at runtime.

pub const CATEGORY_COUNT: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryFields {
    pub ordinal: u32,
    pub name: &'static str,
    pub total_field: &'static str,
    pub out_field: Option<&'static str>,
    pub within_field: Option<&'static str>,
    pub cap_val_field: Option<&'static str>,
}

impl CategoryFields {
    /// True when the category is split into out-of-escrow and within-escrow amounts.
    pub fn has_escrow_split(&self) -> bool {
        self.out_field.is_some() || self.within_field.is_some()
    }

    /// The wire keys this row writes, in total/out/within/cap order.
    pub fn wire_fields(&self) -> impl Iterator<Item = &'static str> {
        [
            Some(self.total_field),
            self.out_field,
            self.within_field,
            self.cap_val_field,
        ]
        .into_iter()
        .flatten()
    }
}

const fn split(
    ordinal: u32,
    name: &'static str,
    total: &'static str,
    out: &'static str,
    within: &'static str,
    cap_val: &'static str,
) -> CategoryFields {
    CategoryFields {
        ordinal,
        name,
        total_field: total,
        out_field: Some(out),
        within_field: Some(within),
        cap_val_field: Some(cap_val),
    }
}

const fn total_only(ordinal: u32, name: &'static str, total: &'static str) -> CategoryFields {
    CategoryFields {
        ordinal,
        name,
        total_field: total,
        out_field: None,
        within_field: None,
        cap_val_field: None,
    }
}

static CATEGORY_FIELDS: [CategoryFields; CATEGORY_COUNT] = [
    split(
        0,
        "Cash Received from Unit Holder",
        "mffsCurCashRecvdTotal",
        "mffsCurCashRecvdOutEscrow",
        "mffsCurCashRecvdWithinEscrow",
        "mffsCurCashexceptCapVal",
    ),
    split(
        1,
        "Land Cost",
        "mffsCurLandCostTotal",
        "mffsCurLandCostOutEscrow",
        "mffsCurLandCostWithinEscrow",
        "mffsCurLandCostExceptCapVal",
    ),
    split(
        2,
        "Construction Cost",
        "mffsCurConsCostTotal",
        "mffsCurConsCostOutEscrow",
        "mffsCurConsCostWithinEscrow",
        "mffsCurConsCostExceptCapVal",
    ),
    split(
        3,
        "Marketing Expense",
        "mffsCurMrktExpTotal",
        "mffsCurMrktExpOutEscrow",
        "mffsCurMrktExpWithinEscrow",
        "mffsCurMrktExpExceptCapVal",
    ),
    split(
        4,
        "Project Management Expense",
        "mffsCurPrjMgmtExpTotal",
        "mffsCurPrjMgmtExpOutEscrow",
        "mffsCurPrjMgmtExpWithinEscrow",
        "mffsCurPrjMgmtExpExceptCapVal",
    ),
    split(
        5,
        "Mortgage",
        "mffsCurMortgageTotal",
        "mffsCurOutEscrow",
        "mffsCurMortgageWithinEscrow",
        "mffsCurMortgageExceptCapVal",
    ),
    split(
        6,
        "VAT Paid",
        "mffsCurVatPaidTotal",
        "mffsCurVatPaidOutEscrow",
        "mffsCurVatPaidWithinEscrow",
        "mffsCurVatPaidExceptCapVal",
    ),
    split(
        7,
        "Professional Fees",
        "mffsCurProfFeeTotal",
        "mffsCurProfFeeOutEscrow",
        "mffsCurProfFeeWithinEscrow",
        "mffsCurProfFeeExceptCapVal",
    ),
    split(
        8,
        "Authority Fees",
        "mffsCurAuthFeeTotal",
        "mffsCurAuthFeeOutEscrow",
        "mffsCurAuthFeeWithEscrow",
        "mffsCurAuthFeeExceptCapVal",
    ),
    split(
        9,
        "Land Registration Fees",
        "mffsCurLandRegFeeTotal",
        "mffsCurLandRegFeeOutEscrow",
        "mffsCurLandRegFeeWithinEscrow",
        "mffsCurLandRegFeeExceptCapVal",
    ),
    split(
        10,
        "Design Fees",
        "mffsCurDesignFeeTotal",
        "mffsCurDesignFeeOutEscrow",
        "mffsCurDesignFeeWithinEscrow",
        "mffsCurDesignFeeExceptCapVal",
    ),
    split(
        11,
        "Supervision Fees",
        "mffsCurSupervFeeTotal",
        "mffsCurSupervFeeOutEscrow",
        "mffsCurSupervFeeWithinEscrow",
        "mffsCurSupervFeeExceptCapVal",
    ),
    split(
        12,
        "Permit Fees",
        "mffsCurPermitFees",
        "mffsCurPermitFeeOutEscrow",
        "mffsCurPermitFeeWithinEscrow",
        "mffsCurPermitFeeExceptCapVal",
    ),
    split(
        13,
        "Infrastructure Cost",
        "mffsCurInfraCostTotal",
        "mffsCurInfraCostOutEscrow",
        "mffsCurInfraCostWithinEscrow",
        "mffsCurInfraCostExceptCapVal",
    ),
    split(
        14,
        "Consultant Fees",
        "mffsCurConsultFeeTotal",
        "mffsCurConsultFeeOutEscrow",
        "mffsCurConsultFeeWithinEscrow",
        "mffsCurConsultFeeExceptCapVal",
    ),
    split(
        15,
        "Bank Charges",
        "mffsCurBankChrgTotal",
        "mffsCurBankChrgOutEscrow",
        "mffsCurBankChrgWithinEscrow",
        "mffsCurBankChrgExceptCapVal",
    ),
    split(
        16,
        "Refunds to Unit Holders",
        "mffsCurRefundTotal",
        "mffsCurRefundOutEscrow",
        "mffsCurRefundWithinEscrow",
        "mffsCurRefundExceptCapVal",
    ),
    split(
        17,
        "Developer Contribution",
        "mffsCurDevContribTotal",
        "mffsCurDevContribOutEscrow",
        "mffsCurDevContribWithinEscrow",
        "mffsCurDevContribExceptCapVal",
    ),
    split(
        18,
        "Transfers to Retention Account",
        "mffsCurTransRetentionTotal",
        "mffsCurTransRetentionOutEscrow",
        "mffsCurTransRetentionWithinEscrow",
        "mffsCurTransRetentionExceptCapVal",
    ),
    split(
        19,
        "Insurance",
        "mffsCurInsuranceTotal",
        "mffsCurInsuranceOutEscrow",
        "mffsCurInsuranceWithinEscrow",
        "mffsCurInsuranceExceptCapVal",
    ),
    split(
        20,
        "Utility Connection Fees",
        "mffsCurUtilityFeeTotal",
        "mffsCurUtilityFeeOutEscrow",
        "mffsCurUtilityFeeWithinEscrow",
        "mffsCurUtilityFeeExceptCapVal",
    ),
    split(
        21,
        "Sales Commission",
        "mffsCurSalesCommTotal",
        "mffsCurSalesCommOutEscrow",
        "mffsCurSalesCommWithinEscrow",
        "mffsCurSalesCommCapVal",
    ),
    split(
        22,
        "Overhead Expenses",
        "mffsCurOverheadTotal",
        "mffsCurOverheadOutEscrow",
        "mffsCurOverheadWithinEscrow",
        "mffsCurOverheadExceptCapVal",
    ),
    split(
        23,
        "Financing Cost",
        "mffsCurFinCostTotal",
        "mffsCurFinCostOutEscrow",
        "mffsCurFinCostWithinEscrow",
        "mffsCurFinCostExceptCapVal",
    ),
    split(
        24,
        "Contingency",
        "mffsCurContingencyTotal",
        "mffsCurContingencyOutEscrow",
        "mffsCurContingencyWithinEscrow",
        "mffsCurContingencyExceptCapVal",
    ),
    split(
        25,
        "Escrow Account Fees",
        "mffsCurEscrowFeeTotal",
        "mffsCurEscrowFeeOutEscrow",
        "mffsCurEscrowFeeWithinEscrow",
        "mffsCurEscrowFeeExceptCapVal",
    ),
    split(
        26,
        "Other Payments",
        "mffsCurOtherPayTotal",
        "mffsCurOtherPayOutEscrow",
        "mffsCurOtherPayWithinEscrow",
        "mffsCurOtherPayExceptCapVal",
    ),
    split(
        27,
        "Service Charges",
        "mffsCurServiceChrgTotal",
        "mffsCurServiceChrgOutEscrow",
        "mffsCurServiceChrgWithinEscrow",
        "mffsCurServiceChrgExceptCapVal",
    ),
    total_only(28, "Balance in Escrow Account", "mffsCurEscrowBalance"),
    total_only(29, "Total Payments", "mffsCurTotalPay"),
];

pub struct CategoryFieldTable;

impl CategoryFieldTable {
    pub fn get(ordinal: u32) -> Option<&'static CategoryFields> {
        CATEGORY_FIELDS.get(ordinal as usize)
    }

    /// All rows in ordinal order.
    pub fn entries() -> &'static [CategoryFields] {
        &CATEGORY_FIELDS
    }

    pub fn len() -> usize {
        CATEGORY_FIELDS.len()
    }

    pub fn contains_ordinal(ordinal: u32) -> bool {
        Self::get(ordinal).is_some()
    }

    /// True if `key` is written by any breakdown row.
    pub fn is_breakdown_field(key: &str) -> bool {
        CATEGORY_FIELDS
            .iter()
            .any(|row| row.wire_fields().any(|field| field == key))
    }

    pub fn to_csv() -> String {
        let mut output = String::new();
        output.push_str("Ordinal,Category,Total Field,Out of Escrow Field,Within Escrow Field,Cap Value Field\n");

        for row in &CATEGORY_FIELDS {
            output.push_str(&format!(
                "{},{},{},{},{},{}\n",
                row.ordinal,
                row.name,
                row.total_field,
                row.out_field.unwrap_or(""),
                row.within_field.unwrap_or(""),
                row.cap_val_field.unwrap_or("")
            ));
        }

        output
    }

    pub fn to_markdown() -> String {
        let mut output = String::new();

        output.push_str("# Breakdown Category Field Map\n\n");
        output.push_str("| # | Category | Total | Out of Escrow | Within Escrow | Cap Value |\n");
        output.push_str("|---|----------|-------|---------------|---------------|-----------|\n");

        for row in &CATEGORY_FIELDS {
            output.push_str(&format!(
                "| {} | {} | `{}` | {} | {} | {} |\n",
                row.ordinal,
                row.name,
                row.total_field,
                code_or_dash(row.out_field),
                code_or_dash(row.within_field),
                code_or_dash(row.cap_val_field)
            ));
        }

        output
    }
}

fn code_or_dash(field: Option<&str>) -> String {
    match field {
        Some(name) => format!("`{}`", name),
        None => "-".to_string(),
    }
}
