//! Tabular exports of a bill: who owes what, and the itemized lines.
//!
//! [`BillReport::build`] runs the split once and formats every amount with
//! the fixed currency label; [`to_csv`] and [`render_text`] only lay the
//! rows out.

use engine::Bill;
use thiserror::Error;

pub use report::{BillReport, ItemRow, SummaryRow};
pub use table::to_csv;
pub use text::render_text;

mod report;
mod table;
mod text;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Suggested file name: `Bill_<title or Export>_<date>.<ext>`.
///
/// Characters that are unsafe in file names are replaced with `_`.
#[must_use]
pub fn file_name(bill: &Bill, extension: &str) -> String {
    let title: String = bill
        .title()
        .unwrap_or("Export")
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | ' ' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("Bill_{title}_{}.{extension}", bill.date().format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn file_name_uses_title_and_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(
            file_name(&Bill::new(Some("Galle trip"), date), "csv"),
            "Bill_Galle trip_2026-08-30.csv"
        );
        assert_eq!(
            file_name(&Bill::new(None, date), "txt"),
            "Bill_Export_2026-08-30.txt"
        );
        assert_eq!(
            file_name(&Bill::new(Some("a/b:c"), date), "csv"),
            "Bill_a_b_c_2026-08-30.csv"
        );
    }
}
