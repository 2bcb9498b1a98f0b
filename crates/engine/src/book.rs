//! The collection of bills owned by the application shell.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{Bill, EngineError, ResultEngine, bill::DEFAULT_BILL_TITLE};

/// Every bill the user keeps, in creation order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BillBook {
    bills: Vec<Bill>,
}

impl BillBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps loaded bills, rejecting duplicate ids.
    pub fn from_bills(bills: Vec<Bill>) -> ResultEngine<Self> {
        for (index, bill) in bills.iter().enumerate() {
            if bills[..index].iter().any(|other| other.id() == bill.id()) {
                return Err(EngineError::ExistingKey(bill.id().to_string()));
            }
        }
        Ok(Self { bills })
    }

    #[must_use]
    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    /// Adds an empty bill titled "New Bill" and returns its id.
    pub fn create_bill(&mut self, date: NaiveDate) -> Uuid {
        let bill = Bill::new(Some(DEFAULT_BILL_TITLE), date);
        let id = bill.id();
        self.bills.push(bill);
        id
    }

    /// Removes a bill for good. Nothing else refers to it.
    pub fn delete_bill(&mut self, id: Uuid) -> ResultEngine<Bill> {
        let index = self
            .bills
            .iter()
            .position(|bill| bill.id() == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        Ok(self.bills.remove(index))
    }

    pub fn bill(&self, id: Uuid) -> ResultEngine<&Bill> {
        self.bills
            .iter()
            .find(|bill| bill.id() == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    pub fn bill_mut(&mut self, id: Uuid) -> ResultEngine<&mut Bill> {
        self.bills
            .iter_mut()
            .find(|bill| bill.id() == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }
}
