//! Bill model and split-allocation engine.
//!
//! The engine owns the bill entity graph ([`Bill`], [`Participant`],
//! [`BillItem`]) together with the mutation rules that keep it consistent,
//! and the pure split computation ([`compute_summaries`], [`bill_total`]).
//! It performs no I/O; storage, exports and notifications live in their own
//! crates and call into it.

pub use bill::{Bill, BillParts, DEFAULT_BILL_TITLE, MAX_BILL_TOTAL, checked_bill_total};
pub use book::BillBook;
pub use commands::{ItemEdit, ItemInput, parse_quantity, parse_unit_price};
pub use currency::Currency;
pub use error::EngineError;
pub use items::{Allocation, Assignees, BillItem};
pub use money::Money;
pub use participant::Participant;
pub use split::{ParticipantSummary, SummaryLine, bill_total, compute_summaries};

mod bill;
mod book;
mod commands;
mod currency;
mod error;
mod items;
mod money;
mod participant;
pub mod split;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
