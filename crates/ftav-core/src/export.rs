//! Flat export rows for evaluated documents.
//!
//! Rows are a pure projection of stored batches; writing them as CSV or
//! JSON is left to the caller. Column names and order are stable.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::batch::{Batch, BatchId, BatchStore, DocumentResult};

/// Export column headers, in row order.
pub const COLUMNS: [&str; 16] = [
    "Invoice Name",
    "Invoice Type",
    "TRN",
    "Invoice Number",
    "Invoice Date",
    "Supplier",
    "Customer",
    "VAT Rate",
    "VAT Amount",
    "Total Amount",
    "Currency AED",
    "Tax Invoice Label",
    "Description Section",
    "FTA Status",
    "Remarks",
    "Batch_ID",
];

/// One exported document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Invoice Name")]
    pub document: String,
    #[serde(rename = "Invoice Type")]
    pub invoice_type: String,
    #[serde(rename = "TRN")]
    pub trn: String,
    #[serde(rename = "Invoice Number")]
    pub invoice_number: String,
    #[serde(rename = "Invoice Date")]
    pub invoice_date: String,
    #[serde(rename = "Supplier")]
    pub supplier: String,
    #[serde(rename = "Customer")]
    pub customer: String,
    #[serde(rename = "VAT Rate")]
    pub vat_rate: String,
    #[serde(rename = "VAT Amount")]
    pub vat_amount: String,
    #[serde(rename = "Total Amount")]
    pub total_amount: String,
    #[serde(rename = "Currency AED")]
    pub currency_present: String,
    #[serde(rename = "Tax Invoice Label")]
    pub tax_invoice_label: String,
    #[serde(rename = "Description Section")]
    pub description_section: String,
    #[serde(rename = "FTA Status")]
    pub status: String,
    #[serde(rename = "Remarks")]
    pub remarks: String,
    #[serde(rename = "Batch_ID")]
    pub batch_id: String,
}

impl ExportRow {
    pub fn new(batch_id: &BatchId, doc: &DocumentResult) -> Self {
        let fields = &doc.fields;
        Self {
            document: doc.name.clone(),
            invoice_type: doc.verdict.derived_type().label().to_string(),
            trn: fields.trn.clone().unwrap_or_default(),
            invoice_number: fields.invoice_number.clone().unwrap_or_default(),
            invoice_date: fields
                .invoice_date
                .as_ref()
                .map(|d| d.raw.clone())
                .unwrap_or_default(),
            supplier: fields.supplier.clone().unwrap_or_default(),
            customer: fields.customer.clone().unwrap_or_default(),
            vat_rate: fields.vat_rate.clone().unwrap_or_default(),
            vat_amount: format_amount(fields.vat_amount),
            total_amount: format_amount(fields.total_amount),
            currency_present: yes_no(fields.currency_present),
            tax_invoice_label: yes_no(fields.has_tax_invoice_label),
            description_section: yes_no(fields.has_description_section),
            status: doc.verdict.status().label().to_string(),
            remarks: doc.verdict.joined_remarks(),
            batch_id: batch_id.to_string(),
        }
    }

    /// Cell values in [`COLUMNS`] order.
    pub fn values(&self) -> [&str; 16] {
        [
            &self.document,
            &self.invoice_type,
            &self.trn,
            &self.invoice_number,
            &self.invoice_date,
            &self.supplier,
            &self.customer,
            &self.vat_rate,
            &self.vat_amount,
            &self.total_amount,
            &self.currency_present,
            &self.tax_invoice_label,
            &self.description_section,
            &self.status,
            &self.remarks,
            &self.batch_id,
        ]
    }
}

/// Rows for one batch, in submission order.
pub fn to_rows(batch: &Batch) -> Vec<ExportRow> {
    batch
        .documents
        .iter()
        .map(|doc| ExportRow::new(&batch.id, doc))
        .collect()
}

/// Rows for every stored batch, in creation then submission order.
pub fn all_rows(store: &BatchStore) -> Vec<ExportRow> {
    store
        .all_results()
        .iter()
        .map(|(id, doc)| ExportRow::new(id, doc))
        .collect()
}

fn format_amount(amount: Option<Decimal>) -> String {
    amount.map(|a| format!("{:.2}", a)).unwrap_or_default()
}

fn yes_no(flag: bool) -> String {
    let label = if flag { "Yes" } else { "No" };
    label.to_string()
}
