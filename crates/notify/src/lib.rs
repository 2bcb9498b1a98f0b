//! Delivers one participant's share of a bill by email.
//!
//! Delivery is best effort: the report is sent through a [`MailTransport`]
//! and, if that is unavailable, fails or times out, the caller gets a
//! `mailto:` link to open a local compose window instead (see [`Delivery`]).
//! A participant without an email address is never attempted.

use chrono::NaiveDate;
use engine::Bill;
use thiserror::Error;

pub use delivery::{Delivery, FallbackReason, Notifier};
pub use mailto::mailto_url;
pub use message::{ReportMessage, report_payload};
pub use transport::{MailTransport, ResendTransport, TransportError};

mod delivery;
mod mailto;
mod message;
mod transport;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("{0} has no email address")]
    MissingEmail(String),
    #[error("invalid delivery transition from {0}")]
    InvalidTransition(&'static str),
    #[error("delivery to {0} did not finish")]
    Unfinished(String),
    #[error("config error: {0}")]
    Config(String),
}

/// Bill details shown alongside a participant's share.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillMeta {
    pub title: Option<String>,
    pub date: NaiveDate,
}

impl From<&Bill> for BillMeta {
    fn from(bill: &Bill) -> Self {
        Self {
            title: bill.title().map(ToString::to_string),
            date: bill.date(),
        }
    }
}
