//! Bill line items and how each one is allocated.
//!
//! An item is either [`Allocation::Shared`] (divided among everyone currently
//! on the bill) or [`Allocation::Assigned`] to a non-empty set of
//! participants. The "assigned to nobody" state cannot be represented.

use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, util::normalize_required_name};

/// Non-empty, duplicate-free set of participant ids, kept in the order the
/// participants were selected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignees(Vec<Uuid>);

impl Assignees {
    /// A set holding exactly one participant.
    #[must_use]
    pub fn single(participant_id: Uuid) -> Self {
        Self(vec![participant_id])
    }

    /// Builds a set from `ids`, dropping duplicates.
    ///
    /// Returns `None` when no id is left.
    pub fn from_ids(ids: impl IntoIterator<Item = Uuid>) -> Option<Self> {
        let mut unique: Vec<Uuid> = Vec::new();
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        (!unique.is_empty()).then_some(Self(unique))
    }

    #[must_use]
    pub fn contains(&self, participant_id: &Uuid) -> bool {
        self.0.contains(participant_id)
    }

    /// Number of participants sharing the item (always at least 1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Uuid> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Uuid] {
        &self.0
    }

    /// Removes `participant_id`, returning `None` if the set became empty.
    fn without(mut self, participant_id: &Uuid) -> Option<Self> {
        self.0.retain(|id| id != participant_id);
        (!self.0.is_empty()).then_some(self)
    }

    fn with(mut self, participant_id: Uuid) -> Self {
        if !self.0.contains(&participant_id) {
            self.0.push(participant_id);
        }
        self
    }
}

/// Who pays for an item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Allocation {
    /// Divided equally among every participant on the bill.
    #[default]
    Shared,
    /// Divided equally among the named participants only.
    Assigned(Assignees),
}

impl Allocation {
    #[must_use]
    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Shared)
    }

    /// Explicit assignees; empty for a shared item.
    #[must_use]
    pub fn assigned_to(&self) -> &[Uuid] {
        match self {
            Self::Shared => &[],
            Self::Assigned(assignees) => assignees.as_slice(),
        }
    }

    /// Toggles `participant_id`.
    ///
    /// From `Shared` the item narrows to that participant alone. From
    /// `Assigned` membership is flipped; removing the last assignee makes the
    /// item shared again.
    #[must_use]
    pub fn toggled(self, participant_id: Uuid) -> Self {
        match self {
            Self::Shared => Self::Assigned(Assignees::single(participant_id)),
            Self::Assigned(assignees) if assignees.contains(&participant_id) => assignees
                .without(&participant_id)
                .map_or(Self::Shared, Self::Assigned),
            Self::Assigned(assignees) => Self::Assigned(assignees.with(participant_id)),
        }
    }

    /// Drops `participant_id` from the assignees, falling back to `Shared`
    /// when nobody is left.
    #[must_use]
    pub fn without(self, participant_id: &Uuid) -> Self {
        match self {
            Self::Shared => Self::Shared,
            Self::Assigned(assignees) => assignees
                .without(participant_id)
                .map_or(Self::Shared, Self::Assigned),
        }
    }
}

/// A line on the bill.
///
/// `total` is always `unit_price * quantity`; it is recomputed by every
/// constructor and every price or quantity change and cannot be set directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillItem {
    id: Uuid,
    name: String,
    quantity: u32,
    unit_price: Money,
    total: Money,
    allocation: Allocation,
}

impl BillItem {
    /// Rebuilds an item from stored parts, recomputing the total.
    pub fn restore(
        id: Uuid,
        name: &str,
        quantity: u32,
        unit_price: Money,
        allocation: Allocation,
    ) -> ResultEngine<Self> {
        let name = normalize_required_name(name, "item")?;
        let unit_price = checked_unit_price(unit_price)?;
        let quantity = quantity.max(1);
        Ok(Self {
            id,
            name,
            quantity,
            unit_price,
            total: line_total(unit_price, quantity)?,
            allocation,
        })
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    #[must_use]
    pub fn total(&self) -> Money {
        self.total
    }

    #[must_use]
    pub fn allocation(&self) -> &Allocation {
        &self.allocation
    }

    #[must_use]
    pub fn is_shared(&self) -> bool {
        self.allocation.is_shared()
    }

    pub(crate) fn rename(&mut self, name: &str) -> ResultEngine<()> {
        self.name = normalize_required_name(name, "item")?;
        Ok(())
    }

    /// Applies a new price and/or quantity, keeping `total` in step.
    ///
    /// Nothing changes if the new total would overflow.
    pub(crate) fn reprice(
        &mut self,
        unit_price: Option<Money>,
        quantity: Option<u32>,
    ) -> ResultEngine<()> {
        let unit_price = checked_unit_price(unit_price.unwrap_or(self.unit_price))?;
        let quantity = quantity.unwrap_or(self.quantity).max(1);
        self.total = line_total(unit_price, quantity)?;
        self.unit_price = unit_price;
        self.quantity = quantity;
        Ok(())
    }

    pub(crate) fn reallocate(&mut self, reallocate: impl FnOnce(Allocation) -> Allocation) {
        let current = std::mem::take(&mut self.allocation);
        self.allocation = reallocate(current);
    }
}

fn checked_unit_price(unit_price: Money) -> ResultEngine<Money> {
    if unit_price.is_negative() {
        return Err(EngineError::InvalidAmount(
            "unit price must be >= 0".to_string(),
        ));
    }
    Ok(unit_price)
}

fn line_total(unit_price: Money, quantity: u32) -> ResultEngine<Money> {
    unit_price
        .checked_mul(quantity)
        .ok_or_else(|| EngineError::InvalidAmount("item total too large".to_string()))
}
