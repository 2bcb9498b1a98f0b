//! The `Bill` holds the participants and items of one shared expense.
//!
//! Every mutation goes through a method here so the bill invariants hold
//! between calls:
//!
//! - participant and item ids are unique within the bill
//! - every assignee of an item is a participant of the bill
//! - an item total always equals `unit_price * quantity`
//! - the item totals add up to at most [`MAX_BILL_TOTAL`]

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    Allocation, BillItem, EngineError, ItemEdit, ItemInput, Money, Participant,
    ParticipantSummary, ResultEngine, split, util::normalize_optional_text,
};

/// Title given to bills created without one.
pub const DEFAULT_BILL_TITLE: &str = "New Bill";

/// Ceiling on the sum of a bill's item totals (LKR 1,000,000,000,000.00).
///
/// A share never exceeds its item total, so no participant total can
/// exceed it either.
pub const MAX_BILL_TOTAL: Money = Money::new(100_000_000_000_000);

/// Sums item totals, failing when the sum passes [`MAX_BILL_TOTAL`].
pub fn checked_bill_total<'a>(
    items: impl IntoIterator<Item = &'a BillItem>,
) -> ResultEngine<Money> {
    items
        .into_iter()
        .try_fold(Money::ZERO, |sum, item| sum.checked_add(item.total()))
        .filter(|total| *total <= MAX_BILL_TOTAL)
        .ok_or_else(|| EngineError::InvalidAmount("bill total too large".to_string()))
}

/// A dated collection of participants and items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bill {
    id: Uuid,
    title: Option<String>,
    date: NaiveDate,
    participants: Vec<Participant>,
    items: Vec<BillItem>,
    created_at: DateTime<Utc>,
}

/// Already-validated pieces of a bill, as read back from storage.
#[derive(Clone, Debug)]
pub struct BillParts {
    pub id: Uuid,
    pub title: Option<String>,
    pub date: NaiveDate,
    pub participants: Vec<Participant>,
    pub items: Vec<BillItem>,
    pub created_at: DateTime<Utc>,
}

impl Bill {
    /// Creates an empty bill.
    pub fn new(title: Option<&str>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: normalize_optional_text(title),
            date,
            participants: Vec::new(),
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Rebuilds a bill, checking the cross-entity invariants.
    pub fn restore(parts: BillParts) -> ResultEngine<Self> {
        let invalid = |msg: String| Err(EngineError::InvalidBill(msg));

        for (index, participant) in parts.participants.iter().enumerate() {
            if parts.participants[..index]
                .iter()
                .any(|other| other.id == participant.id)
            {
                return invalid(format!("duplicate participant id {}", participant.id));
            }
        }
        for (index, item) in parts.items.iter().enumerate() {
            if parts.items[..index].iter().any(|other| other.id() == item.id()) {
                return invalid(format!("duplicate item id {}", item.id()));
            }
            if let Some(dangling) = item
                .allocation()
                .assigned_to()
                .iter()
                .find(|id| !parts.participants.iter().any(|p| p.id == **id))
            {
                return invalid(format!(
                    "item {} assigned to unknown participant {dangling}",
                    item.id()
                ));
            }
        }
        if let Err(err) = checked_bill_total(&parts.items) {
            return invalid(err.to_string());
        }

        Ok(Self {
            id: parts.id,
            title: normalize_optional_text(parts.title.as_deref()),
            date: parts.date,
            participants: parts.participants,
            items: parts.items,
            created_at: parts.created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    #[must_use]
    pub fn items(&self) -> &[BillItem] {
        &self.items
    }

    pub fn participant(&self, id: Uuid) -> ResultEngine<&Participant> {
        self.participants
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    pub fn item(&self, id: Uuid) -> ResultEngine<&BillItem> {
        self.items
            .iter()
            .find(|item| item.id() == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    fn item_mut(&mut self, id: Uuid) -> ResultEngine<&mut BillItem> {
        self.items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    pub fn set_title(&mut self, title: Option<&str>) {
        self.title = normalize_optional_text(title);
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    /// Appends a participant and returns its new id.
    pub fn add_participant(&mut self, name: &str, email: Option<&str>) -> ResultEngine<Uuid> {
        let participant = Participant::new(name, email)?;
        let id = participant.id;
        self.participants.push(participant);
        Ok(id)
    }

    /// Removes a participant and scrubs them from every item.
    ///
    /// An item whose only assignee was this participant becomes shared.
    pub fn remove_participant(&mut self, id: Uuid) -> ResultEngine<Participant> {
        let index = self
            .participants
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        let removed = self.participants.remove(index);
        for item in &mut self.items {
            item.reallocate(|allocation| allocation.without(&id));
        }
        Ok(removed)
    }

    /// Appends a shared item and returns its new id.
    pub fn add_item(&mut self, input: ItemInput) -> ResultEngine<Uuid> {
        let item = BillItem::restore(
            Uuid::new_v4(),
            &input.name,
            input.quantity,
            input.unit_price,
            Allocation::Shared,
        )?;
        checked_bill_total(self.items.iter().chain([&item]))?;
        let id = item.id();
        self.items.push(item);
        Ok(id)
    }

    /// Applies `edit` to an item. The allocation is never touched.
    ///
    /// The edit is all-or-nothing: on error the item is unchanged.
    pub fn edit_item(&mut self, id: Uuid, edit: ItemEdit) -> ResultEngine<&BillItem> {
        let mut updated = self.item(id)?.clone();
        if let Some(name) = edit.name.as_deref() {
            updated.rename(name)?;
        }
        if edit.unit_price.is_some() || edit.quantity.is_some() {
            updated.reprice(edit.unit_price, edit.quantity)?;
            checked_bill_total(
                self.items
                    .iter()
                    .map(|item| if item.id() == id { &updated } else { item }),
            )?;
        }
        let item = self.item_mut(id)?;
        *item = updated;
        Ok(&*item)
    }

    /// Toggles whether `participant_id` pays for `item_id`.
    ///
    /// See [`Allocation::toggled`] for the transitions.
    pub fn toggle_assignment(
        &mut self,
        item_id: Uuid,
        participant_id: Uuid,
    ) -> ResultEngine<&Allocation> {
        self.participant(participant_id)?;
        let item = self.item_mut(item_id)?;
        item.reallocate(|allocation| allocation.toggled(participant_id));
        Ok(item.allocation())
    }

    pub fn delete_item(&mut self, id: Uuid) -> ResultEngine<BillItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        Ok(self.items.remove(index))
    }

    /// Names of the participants an item is assigned to, in bill order.
    ///
    /// Empty for a shared item.
    #[must_use]
    pub fn assignee_names(&self, item: &BillItem) -> Vec<&str> {
        let assigned = item.allocation().assigned_to();
        self.participants
            .iter()
            .filter(|p| assigned.contains(&p.id))
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Per-participant breakdown, see [`split::compute_summaries`].
    #[must_use]
    pub fn summaries(&self) -> Vec<ParticipantSummary> {
        split::compute_summaries(self)
    }

    /// Raw sum of item totals, see [`split::bill_total`].
    #[must_use]
    pub fn total(&self) -> Money {
        split::bill_total(&self.items)
    }
}
