use csv::WriterBuilder;

use crate::{BillReport, ExportError};

/// Writes the report as CSV: a header block, then the summary table, then
/// the item table, each table introduced by a one-field label record.
pub fn to_csv(report: &BillReport) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_writer(vec![]);

    writer.write_record(["Bill", report.title.as_str()])?;
    writer.write_record(["Date", report.date.to_string().as_str()])?;
    writer.write_record(["Generated On", report.generated_on.to_string().as_str()])?;
    writer.write_record(["Total Amount", report.total.as_str()])?;

    writer.write_record(["Summary of Split"])?;
    writer.write_record(BillReport::SUMMARY_HEADERS)?;
    for row in &report.summary {
        writer.serialize(row)?;
    }

    writer.write_record(["Detailed Items"])?;
    writer.write_record(BillReport::ITEM_HEADERS)?;
    for row in &report.items {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}
