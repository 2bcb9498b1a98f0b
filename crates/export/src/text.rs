use crate::BillReport;

const HEADING: &str = "Bill Keeper - LKR";
const GAP: &str = "  ";

/// Renders the report as fixed-width plain text tables.
#[must_use]
pub fn render_text(report: &BillReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{HEADING}\nGenerated on {}\n\n", report.generated_on));
    out.push_str(&format!("Bill: {}\nDate: {}\n", report.title, report.date));
    out.push_str(&format!("Total Amount: {}\n\n", report.total));

    out.push_str("Summary of Split:\n");
    let summary: Vec<Vec<String>> = report
        .summary
        .iter()
        .map(|row| vec![row.name.clone(), row.email.clone(), row.amount_due.clone()])
        .collect();
    out.push_str(&table(
        &BillReport::SUMMARY_HEADERS,
        &summary,
        &[false, false, true],
    ));

    out.push_str("\nDetailed Items:\n");
    let items: Vec<Vec<String>> = report
        .items
        .iter()
        .map(|row| {
            vec![
                row.item.clone(),
                row.quantity.to_string(),
                row.unit_price.clone(),
                row.assigned_to.clone(),
                row.total.clone(),
            ]
        })
        .collect();
    out.push_str(&table(
        &BillReport::ITEM_HEADERS,
        &items,
        &[false, true, true, false, true],
    ));

    out
}

fn table(headers: &[&str], rows: &[Vec<String>], right_aligned: &[bool]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .map(|row| row[col].chars().count())
                .chain([header.chars().count()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[&str]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .zip(right_aligned)
            .map(|((cell, width), right)| {
                if *right {
                    format!("{cell:>width$}")
                } else {
                    format!("{cell:<width$}")
                }
            })
            .collect();
        format!("{}\n", padded.join(GAP).trim_end())
    };

    let rule_width = widths.iter().sum::<usize>() + GAP.len() * widths.len().saturating_sub(1);
    let mut out = line(headers);
    out.push_str(&"-".repeat(rule_width));
    out.push('\n');
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&line(&cells));
    }
    out
}
