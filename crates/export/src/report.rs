use chrono::NaiveDate;
use engine::{Bill, Currency};
use serde::Serialize;

const UNTITLED: &str = "Untitled Bill";
const NO_EMAIL: &str = "N/A";
const SHARED: &str = "Shared";

/// One row of the "who owes what" table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Amount Due")]
    pub amount_due: String,
}

/// One row of the itemized table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ItemRow {
    #[serde(rename = "Item")]
    pub item: String,
    #[serde(rename = "Qty")]
    pub quantity: u32,
    #[serde(rename = "Unit Price")]
    pub unit_price: String,
    #[serde(rename = "Assigned To")]
    pub assigned_to: String,
    #[serde(rename = "Total")]
    pub total: String,
}

/// A bill laid out for export, with every amount already formatted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillReport {
    pub title: String,
    pub date: NaiveDate,
    pub generated_on: NaiveDate,
    pub total: String,
    pub summary: Vec<SummaryRow>,
    pub items: Vec<ItemRow>,
}

impl BillReport {
    pub const SUMMARY_HEADERS: [&'static str; 3] = ["Name", "Email", "Amount Due"];
    pub const ITEM_HEADERS: [&'static str; 5] =
        ["Item", "Qty", "Unit Price", "Assigned To", "Total"];

    pub fn build(bill: &Bill, generated_on: NaiveDate) -> Self {
        let currency = Currency::Lkr;

        let summary = bill
            .summaries()
            .into_iter()
            .map(|summary| SummaryRow {
                name: summary.participant.name,
                email: summary
                    .participant
                    .email
                    .unwrap_or_else(|| NO_EMAIL.to_string()),
                amount_due: summary.total_amount.format(currency),
            })
            .collect();

        let items = bill
            .items()
            .iter()
            .map(|item| ItemRow {
                item: item.name().to_string(),
                quantity: item.quantity(),
                unit_price: item.unit_price().format(currency),
                assigned_to: if item.is_shared() {
                    SHARED.to_string()
                } else {
                    bill.assignee_names(item).join(", ")
                },
                total: item.total().format(currency),
            })
            .collect();

        tracing::debug!("built report for bill {}", bill.id());

        Self {
            title: bill.title().unwrap_or(UNTITLED).to_string(),
            date: bill.date(),
            generated_on,
            total: bill.total().format(currency),
            summary,
            items,
        }
    }
}
