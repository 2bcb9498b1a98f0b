use api_types::report::{ParticipantReport, ReportLine, ReportParticipant, SendReport};
use engine::{Currency, ParticipantSummary};

use crate::BillMeta;

const SIGNATURE: &str = "Sent via Bill Keeper LKR";

/// Subject and bodies of a participant's report email.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportMessage {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl ReportMessage {
    pub fn render(summary: &ParticipantSummary, meta: &BillMeta) -> Self {
        let currency = Currency::Lkr;
        let name = &summary.participant.name;
        let subject = format!(
            "Bill Split: {} ({})",
            meta.title.as_deref().unwrap_or("Untitled"),
            meta.date
        );

        let lines: Vec<String> = summary
            .assigned_items
            .iter()
            .map(|line| {
                let marker = if line.is_shared { " (Shared)" } else { "" };
                format!("{}{marker}: {}", line.item_name, line.amount.format(currency))
            })
            .collect();
        let text = format!(
            "Hello {name},\n\nHere is your split for {} on {}:\n\n{}\n\nTotal Payable: {}\n\n{SIGNATURE}",
            meta.title.as_deref().unwrap_or("the bill"),
            meta.date,
            lines.join("\n"),
            summary.total_amount.format(currency),
        );

        let rows: String = summary
            .assigned_items
            .iter()
            .map(|line| {
                let badge = if line.is_shared { " <small>Shared</small>" } else { "" };
                format!(
                    "<tr><td>{}{badge}</td><td align=\"right\">{}</td></tr>",
                    escape_html(&line.item_name),
                    line.amount.format(currency)
                )
            })
            .collect();
        let html = format!(
            "<div>\
             <h1>Bill Keeper</h1>\
             <p>Individual Settlement Report</p>\
             <p>Hello <strong>{}</strong>,</p>\
             <p>Here is your breakdown for <strong>{}</strong> dated {}.</p>\
             <table width=\"100%\">\
             <thead><tr><th align=\"left\">Item</th><th align=\"right\">Your Share</th></tr></thead>\
             <tbody>{rows}</tbody>\
             <tfoot><tr><td><strong>Total Payable</strong></td><td align=\"right\"><strong>{}</strong></td></tr></tfoot>\
             </table>\
             <p><small>{SIGNATURE}</small></p>\
             </div>",
            escape_html(name),
            escape_html(meta.title.as_deref().unwrap_or("Untitled Bill")),
            meta.date,
            summary.total_amount.format(currency),
        );

        Self {
            subject,
            text,
            html,
        }
    }
}

/// Wire payload for a remote report service.
#[must_use]
pub fn report_payload(summary: &ParticipantSummary, meta: &BillMeta) -> SendReport {
    SendReport {
        report: ParticipantReport {
            participant: ReportParticipant {
                id: summary.participant.id,
                name: summary.participant.name.clone(),
                email: summary.participant.email.clone(),
            },
            assigned_items: summary
                .assigned_items
                .iter()
                .map(|line| ReportLine {
                    item_name: line.item_name.clone(),
                    amount_minor: line.amount.minor(),
                    is_shared: line.is_shared,
                })
                .collect(),
            currency: api_types::Currency::Lkr,
            total_amount_minor: summary.total_amount.minor(),
        },
        bill_date: meta.date,
        bill_title: meta.title.clone(),
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use engine::{Bill, ItemInput, Money};

    use super::*;

    fn summary_and_meta() -> (ParticipantSummary, BillMeta) {
        let mut bill = Bill::new(
            Some("Mum's <birthday>"),
            NaiveDate::from_ymd_opt(2026, 9, 12).unwrap(),
        );
        let nadia = bill.add_participant("Nadia", Some("nadia@example.lk")).unwrap();
        bill.add_participant("Omar", None).unwrap();
        bill.add_item(ItemInput::new("Cake", Money::new(300_000)))
            .unwrap();
        let flowers = bill
            .add_item(ItemInput::new("Flowers & card", Money::new(120_000)))
            .unwrap();
        bill.toggle_assignment(flowers, nadia).unwrap();

        let summary = bill.summaries().remove(0);
        (summary, BillMeta::from(&bill))
    }

    #[test]
    fn text_body_lists_each_share() {
        let (summary, meta) = summary_and_meta();
        let message = ReportMessage::render(&summary, &meta);

        assert_eq!(message.subject, "Bill Split: Mum's <birthday> (2026-09-12)");
        assert_eq!(
            message.text,
            "Hello Nadia,\n\n\
             Here is your split for Mum's <birthday> on 2026-09-12:\n\n\
             Cake (Shared): LKR 1,500.00\n\
             Flowers & card: LKR 1,200.00\n\n\
             Total Payable: LKR 2,700.00\n\n\
             Sent via Bill Keeper LKR"
        );
    }

    #[test]
    fn html_body_is_escaped() {
        let (summary, meta) = summary_and_meta();
        let message = ReportMessage::render(&summary, &meta);

        assert!(message.html.contains("Mum&#39;s &lt;birthday&gt;"));
        assert!(message.html.contains("Flowers &amp; card"));
        assert!(message.html.contains("<strong>LKR 2,700.00</strong>"));
        assert!(!message.html.contains("<birthday>"));
    }

    #[test]
    fn payload_carries_minor_units() {
        let (summary, meta) = summary_and_meta();
        let payload = report_payload(&summary, &meta);

        assert_eq!(payload.report.total_amount_minor, 270_000);
        assert_eq!(payload.report.assigned_items.len(), 2);
        assert!(payload.report.assigned_items[0].is_shared);
        assert_eq!(payload.bill_title.as_deref(), Some("Mum's <birthday>"));
    }
}
