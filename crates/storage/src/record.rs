//! On-disk record format and the repair applied when reading it back.
//!
//! Records keep the flat `isShared` + `assignedTo` pair and plain string ids,
//! so a blob may hold shapes the engine cannot represent. [`decode_blob`]
//! turns each record into a valid [`Bill`]:
//!
//! - participants with a blank name or a duplicate id are dropped
//! - ids that are not UUIDs get a fresh id, consistently within the bill
//! - items with a blank name, a duplicate id or a negative price are dropped
//! - a quantity below 1 becomes 1 and the stored total is recomputed
//! - an item that would push the bill past `MAX_BILL_TOTAL` is dropped
//! - assignees that are not on the bill are dropped; `isShared` or an empty
//!   `assignedTo` makes the item shared
//! - an unreadable date falls back to the creation date, an unreadable
//!   creation time to now

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use engine::{
    Allocation, Assignees, Bill, BillItem, BillParts, Money, Participant, checked_bill_total,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBill {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub participants: Vec<StoredParticipant>,
    #[serde(default)]
    pub items: Vec<StoredItem>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredParticipant {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub unit_price_minor: i64,
    #[serde(default)]
    pub total_minor: i64,
    #[serde(default)]
    pub assigned_to: Vec<String>,
    #[serde(default)]
    pub is_shared: bool,
}

impl From<&Bill> for StoredBill {
    fn from(bill: &Bill) -> Self {
        Self {
            id: bill.id().to_string(),
            title: bill.title().map(ToString::to_string),
            date: bill.date().format(DATE_FORMAT).to_string(),
            participants: bill
                .participants()
                .iter()
                .map(|participant| StoredParticipant {
                    id: participant.id.to_string(),
                    name: participant.name.clone(),
                    email: participant.email.clone(),
                })
                .collect(),
            items: bill
                .items()
                .iter()
                .map(|item| StoredItem {
                    id: item.id().to_string(),
                    name: item.name().to_string(),
                    quantity: i64::from(item.quantity()),
                    unit_price_minor: item.unit_price().minor(),
                    total_minor: item.total().minor(),
                    assigned_to: item
                        .allocation()
                        .assigned_to()
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                    is_shared: item.is_shared(),
                })
                .collect(),
            created_at: bill.created_at().timestamp_millis(),
        }
    }
}

/// Serializes the collection into the stored blob.
pub fn encode_blob(bills: &[Bill]) -> Result<String> {
    let records: Vec<StoredBill> = bills.iter().map(StoredBill::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Parses a stored blob, repairing each record into a valid bill.
///
/// A blob that is not valid JSON is an error; nothing is repaired then.
pub fn decode_blob(blob: &str) -> Result<Vec<Bill>> {
    let records: Vec<StoredBill> = serde_json::from_str(blob)?;
    let mut seen = HashSet::new();
    let mut bills = Vec::with_capacity(records.len());
    for record in records {
        let bill = record.into_bill()?;
        if !seen.insert(bill.id()) {
            tracing::warn!("dropping duplicate bill {}", bill.id());
            continue;
        }
        bills.push(bill);
    }
    Ok(bills)
}

/// Maps stored string ids to UUIDs, minting fresh ids for foreign ones.
#[derive(Default)]
struct IdMap {
    ids: HashMap<String, Uuid>,
}

impl IdMap {
    fn resolve(&mut self, raw: &str, label: &str) -> Uuid {
        if let Some(id) = self.ids.get(raw) {
            return *id;
        }
        let id = Uuid::parse_str(raw).unwrap_or_else(|_| {
            let fresh = Uuid::new_v4();
            tracing::warn!("{label} id {raw:?} is not a UUID, using {fresh}");
            fresh
        });
        self.ids.insert(raw.to_string(), id);
        id
    }
}

impl StoredBill {
    /// Repairs the record into a bill.
    pub fn into_bill(self) -> Result<Bill> {
        let mut bill_ids = IdMap::default();
        let id = bill_ids.resolve(&self.id, "bill");

        let created_at = DateTime::<Utc>::from_timestamp_millis(self.created_at)
            .filter(|_| self.created_at > 0)
            .unwrap_or_else(|| {
                tracing::warn!("bill {id}: invalid createdAt {}, using now", self.created_at);
                Utc::now()
            });
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).unwrap_or_else(|_| {
            tracing::warn!("bill {id}: invalid date {:?}, using creation date", self.date);
            created_at.date_naive()
        });

        let mut participant_ids = IdMap::default();
        let mut participants: Vec<Participant> = Vec::with_capacity(self.participants.len());
        for stored in self.participants {
            if participant_ids.ids.contains_key(&stored.id) {
                tracing::warn!("bill {id}: dropping duplicate participant {:?}", stored.id);
                continue;
            }
            let participant_id = participant_ids.resolve(&stored.id, "participant");
            if participants.iter().any(|p| p.id == participant_id) {
                tracing::warn!("bill {id}: dropping duplicate participant {participant_id}");
                participant_ids.ids.remove(&stored.id);
                continue;
            }
            match Participant::with_id(participant_id, &stored.name, stored.email.as_deref()) {
                Ok(participant) => participants.push(participant),
                Err(err) => {
                    tracing::warn!("bill {id}: dropping participant {participant_id}: {err}");
                    participant_ids.ids.remove(&stored.id);
                }
            }
        }

        let mut item_ids = IdMap::default();
        let mut items: Vec<BillItem> = Vec::with_capacity(self.items.len());
        for stored in self.items {
            if item_ids.ids.contains_key(&stored.id) {
                tracing::warn!("bill {id}: dropping duplicate item {:?}", stored.id);
                continue;
            }
            let item_id = item_ids.resolve(&stored.id, "item");
            if items.iter().any(|item| item.id() == item_id) {
                tracing::warn!("bill {id}: dropping duplicate item {item_id}");
                continue;
            }
            let Some(item) = repair_item(id, item_id, stored, &participant_ids) else {
                continue;
            };
            if let Err(err) = checked_bill_total(items.iter().chain([&item])) {
                tracing::warn!("bill {id}: dropping item {item_id}: {err}");
                continue;
            }
            items.push(item);
        }

        Ok(Bill::restore(BillParts {
            id,
            title: self.title,
            date,
            participants,
            items,
            created_at,
        })?)
    }
}

fn repair_item(
    bill_id: Uuid,
    item_id: Uuid,
    stored: StoredItem,
    participant_ids: &IdMap,
) -> Option<BillItem> {
    let quantity = u32::try_from(stored.quantity)
        .ok()
        .filter(|quantity| *quantity >= 1)
        .unwrap_or_else(|| {
            tracing::warn!(
                "bill {bill_id}: item {item_id} has quantity {}, using 1",
                stored.quantity
            );
            1
        });

    let allocation = if stored.is_shared {
        if !stored.assigned_to.is_empty() {
            tracing::warn!("bill {bill_id}: item {item_id} is shared, ignoring assignees");
        }
        Allocation::Shared
    } else {
        let assignees = stored.assigned_to.iter().filter_map(|raw| {
            let resolved = participant_ids.ids.get(raw).copied();
            if resolved.is_none() {
                tracing::warn!("bill {bill_id}: item {item_id} drops unknown assignee {raw:?}");
            }
            resolved
        });
        Assignees::from_ids(assignees.collect::<Vec<_>>())
            .map_or(Allocation::Shared, Allocation::Assigned)
    };

    let item = match BillItem::restore(
        item_id,
        &stored.name,
        quantity,
        Money::new(stored.unit_price_minor),
        allocation,
    ) {
        Ok(item) => item,
        Err(err) => {
            tracing::warn!("bill {bill_id}: dropping item {item_id}: {err}");
            return None;
        }
    };
    if item.total().minor() != stored.total_minor {
        tracing::warn!(
            "bill {bill_id}: item {item_id} stored total {} recomputed as {}",
            stored.total_minor,
            item.total().minor()
        );
    }
    Some(item)
}

#[cfg(test)]
mod tests {
    use engine::ItemInput;

    use super::*;

    fn decode_one(blob: &str) -> Bill {
        let mut bills = decode_blob(blob).unwrap();
        assert_eq!(bills.len(), 1);
        bills.remove(0)
    }

    #[test]
    fn encode_then_decode_keeps_the_bill() {
        let mut bill = Bill::new(Some("Lunch"), NaiveDate::from_ymd_opt(2026, 4, 2).unwrap());
        let alice = bill.add_participant("Alice", Some("alice@example.lk")).unwrap();
        bill.add_participant("Bob", None).unwrap();
        let item = bill
            .add_item(ItemInput::new("Rice", Money::new(1_250)).quantity(2))
            .unwrap();
        bill.toggle_assignment(item, alice).unwrap();
        bill.add_item(ItemInput::new("Tea", Money::new(100))).unwrap();

        let blob = encode_blob(std::slice::from_ref(&bill)).unwrap();
        let restored = decode_one(&blob);

        // created_at is stored with millisecond precision.
        assert_eq!(
            restored.created_at().timestamp_millis(),
            bill.created_at().timestamp_millis()
        );
        assert_eq!(restored.participants(), bill.participants());
        assert_eq!(restored.items(), bill.items());
        assert_eq!(restored.summaries(), bill.summaries());
    }

    #[test]
    fn blob_keeps_flat_assignment_fields() {
        let mut bill = Bill::new(None, NaiveDate::from_ymd_opt(2026, 4, 2).unwrap());
        bill.add_item(ItemInput::new("Tea", Money::new(100))).unwrap();
        let blob = encode_blob(&[bill]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&blob).unwrap();

        assert_eq!(json[0]["items"][0]["isShared"], true);
        assert_eq!(json[0]["items"][0]["assignedTo"], serde_json::json!([]));
        assert_eq!(json[0]["items"][0]["totalMinor"], 100);
        assert_eq!(json[0]["date"], "2026-04-02");
    }

    #[test]
    fn repairs_dangling_assignee_and_flags() {
        let bill = decode_one(
            r#"[{
                "id": "bill-1",
                "date": "2026-01-05",
                "createdAt": 1767571200000,
                "participants": [
                    {"id": "p1", "name": "Kamal"},
                    {"id": "p2", "name": "   "}
                ],
                "items": [
                    {"id": "i1", "name": "Fish", "quantity": 2, "unitPriceMinor": 500,
                     "totalMinor": 999, "assignedTo": ["p2", "ghost"], "isShared": false},
                    {"id": "i2", "name": "Crab", "quantity": 1, "unitPriceMinor": 900,
                     "totalMinor": 900, "assignedTo": ["p1"], "isShared": true},
                    {"id": "i3", "name": "Prawns", "quantity": 1, "unitPriceMinor": 700,
                     "totalMinor": 700, "assignedTo": ["p1", "p1"], "isShared": false}
                ]
            }]"#,
        );

        assert_eq!(bill.participants().len(), 1);
        let kamal = bill.participants()[0].id;

        let fish = &bill.items()[0];
        assert!(fish.is_shared());
        assert_eq!(fish.total(), Money::new(1_000));

        assert!(bill.items()[1].is_shared());
        assert_eq!(bill.items()[2].allocation().assigned_to(), &[kamal]);
    }

    #[test]
    fn drops_invalid_items_and_clamps_quantity() {
        let bill = decode_one(
            r#"[{
                "id": "b",
                "date": "2026-01-05",
                "createdAt": 1767571200000,
                "items": [
                    {"id": "i1", "name": "Refund", "quantity": 1, "unitPriceMinor": -50},
                    {"id": "i2", "name": "", "quantity": 1, "unitPriceMinor": 50},
                    {"id": "i3", "name": "Water", "quantity": -4, "unitPriceMinor": 80},
                    {"id": "i3", "name": "Water again", "quantity": 1, "unitPriceMinor": 80}
                ]
            }]"#,
        );

        assert_eq!(bill.items().len(), 1);
        assert_eq!(bill.items()[0].name(), "Water");
        assert_eq!(bill.items()[0].quantity(), 1);
        assert!(bill.items()[0].is_shared());
    }

    #[test]
    fn drops_items_past_the_bill_ceiling() {
        let bill = decode_one(
            r#"[{
                "id": "b",
                "date": "2026-01-05",
                "createdAt": 1767571200000,
                "items": [
                    {"id": "i1", "name": "Villa", "quantity": 1, "unitPriceMinor": 90000000000000},
                    {"id": "i2", "name": "Boat", "quantity": 1, "unitPriceMinor": 90000000000000},
                    {"id": "i3", "name": "Tea", "quantity": 2, "unitPriceMinor": 5000000000000000000},
                    {"id": "i4", "name": "Cake", "quantity": 1, "unitPriceMinor": 500}
                ]
            }]"#,
        );

        let names: Vec<&str> = bill.items().iter().map(BillItem::name).collect();
        assert_eq!(names, vec!["Villa", "Cake"]);
        assert_eq!(bill.total(), Money::new(90_000_000_000_500));
    }

    #[test]
    fn bad_date_falls_back_to_creation_day() {
        let bill = decode_one(
            r#"[{"id": "b", "date": "yesterday", "createdAt": 1767571200000}]"#,
        );
        assert_eq!(bill.date(), NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
    }

    #[test]
    fn keeps_existing_uuid_ids() {
        let raw = "0b0d3f0e-3f54-4a5e-9a55-6f0c5c1b7c3e";
        let bill = decode_one(&format!(
            r#"[{{"id": "{raw}", "date": "2026-01-05", "createdAt": 1767571200000}}]"#
        ));
        assert_eq!(bill.id().to_string(), raw);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            decode_blob("{not json"),
            Err(crate::StoreError::Json(_))
        ));
    }
}
