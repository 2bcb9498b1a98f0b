use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Lkr,
}

pub mod report {
    use super::*;

    /// Request body for delivering one participant's share of a bill.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SendReport {
        pub report: ParticipantReport,
        pub bill_date: NaiveDate,
        pub bill_title: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ParticipantReport {
        pub participant: ReportParticipant,
        pub assigned_items: Vec<ReportLine>,
        pub currency: Currency,
        /// Sum of the rounded line amounts.
        pub total_amount_minor: i64,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ReportParticipant {
        pub id: Uuid,
        pub name: String,
        pub email: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ReportLine {
        pub item_name: String,
        pub amount_minor: i64,
        pub is_shared: bool,
    }
}

pub mod mail {
    use super::*;

    /// Request body of the transactional mail API.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EmailNew {
        pub from: String,
        pub to: String,
        pub subject: String,
        pub html: String,
        pub text: Option<String>,
    }

    /// Successful response: the provider's message id.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EmailCreated {
        pub id: String,
    }

    /// Error response of the mail API.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EmailError {
        pub message: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::report::*;
    use super::*;

    #[test]
    fn send_report_uses_camel_case() {
        let payload = SendReport {
            report: ParticipantReport {
                participant: ReportParticipant {
                    id: Uuid::nil(),
                    name: "Nimal".to_string(),
                    email: Some("nimal@example.lk".to_string()),
                },
                assigned_items: vec![ReportLine {
                    item_name: "Kottu".to_string(),
                    amount_minor: 75_000,
                    is_shared: true,
                }],
                currency: Currency::Lkr,
                total_amount_minor: 75_000,
            },
            bill_date: NaiveDate::from_ymd_opt(2026, 2, 4).unwrap(),
            bill_title: None,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["billDate"], "2026-02-04");
        assert_eq!(json["report"]["currency"], "LKR");
        assert_eq!(json["report"]["totalAmountMinor"], 75_000);
        assert_eq!(json["report"]["assignedItems"][0]["isShared"], true);

        let back: SendReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, payload);
    }
}
