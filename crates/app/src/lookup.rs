//! Resolves what the user typed to the id of a bill, participant or item.
//!
//! A query matches, in order of preference: a full id, the exact name or
//! title (ignoring case), or a unique id prefix.

use engine::{Bill, BillItem, Participant};
use uuid::Uuid;

use crate::error::{AppError, Result};

pub trait Lookup {
    const KIND: &'static str;

    fn key(&self) -> Uuid;
    fn label(&self) -> Option<&str>;
}

impl Lookup for Bill {
    const KIND: &'static str = "bill";

    fn key(&self) -> Uuid {
        self.id()
    }

    fn label(&self) -> Option<&str> {
        self.title()
    }
}

impl Lookup for Participant {
    const KIND: &'static str = "participant";

    fn key(&self) -> Uuid {
        self.id
    }

    fn label(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl Lookup for BillItem {
    const KIND: &'static str = "item";

    fn key(&self) -> Uuid {
        self.id()
    }

    fn label(&self) -> Option<&str> {
        Some(self.name())
    }
}

pub fn resolve<T: Lookup>(entries: &[T], query: &str) -> Result<Uuid> {
    let query = query.trim();
    if let Ok(id) = Uuid::parse_str(query)
        && entries.iter().any(|entry| entry.key() == id)
    {
        return Ok(id);
    }

    let named: Vec<Uuid> = entries
        .iter()
        .filter(|entry| {
            entry
                .label()
                .is_some_and(|label| label.trim().to_lowercase() == query.to_lowercase())
        })
        .map(Lookup::key)
        .collect();
    if !named.is_empty() {
        return unique::<T>(named, query);
    }

    let prefix = query.to_ascii_lowercase();
    let prefixed: Vec<Uuid> = if prefix.is_empty() {
        Vec::new()
    } else {
        entries
            .iter()
            .map(Lookup::key)
            .filter(|id| id.to_string().starts_with(&prefix))
            .collect()
    };
    unique::<T>(prefixed, query)
}

fn unique<T: Lookup>(matches: Vec<Uuid>, query: &str) -> Result<Uuid> {
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(AppError::NotFound {
            kind: T::KIND,
            query: query.to_string(),
        }),
        _ => Err(AppError::Ambiguous {
            kind: T::KIND,
            query: query.to_string(),
            matches: matches.len(),
        }),
    }
}

/// First eight characters of an id, enough to address it from the shell.
pub fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Vec<Participant> {
        vec![
            Participant::with_id(
                Uuid::parse_str("1a2b3c4d-0000-4000-8000-000000000001").unwrap(),
                "Ruwan",
                None,
            )
            .unwrap(),
            Participant::with_id(
                Uuid::parse_str("1a2b9999-0000-4000-8000-000000000002").unwrap(),
                "Sachini",
                None,
            )
            .unwrap(),
            Participant::with_id(
                Uuid::parse_str("77777777-0000-4000-8000-000000000003").unwrap(),
                "1a2b",
                None,
            )
            .unwrap(),
        ]
    }

    #[test]
    fn full_id_wins() {
        let people = people();
        assert_eq!(
            resolve(&people, "1a2b9999-0000-4000-8000-000000000002").unwrap(),
            people[1].id
        );
    }

    #[test]
    fn name_ignores_case_and_beats_prefix() {
        let people = people();
        assert_eq!(resolve(&people, "  ruWAN ").unwrap(), people[0].id);
        assert_eq!(resolve(&people, "1A2B").unwrap(), people[2].id);
    }

    #[test]
    fn unique_prefix() {
        let people = people();
        assert_eq!(resolve(&people, "1a2b3").unwrap(), people[0].id);
        assert_eq!(resolve(&people, "7777").unwrap(), people[2].id);
    }

    #[test]
    fn ambiguous_and_missing() {
        let people = people();
        assert!(matches!(
            resolve(&people, "1a2"),
            Err(AppError::Ambiguous { matches: 2, .. })
        ));
        assert!(matches!(
            resolve(&people, "Priya"),
            Err(AppError::NotFound {
                kind: "participant",
                ..
            })
        ));
        assert!(matches!(
            resolve(&people, ""),
            Err(AppError::NotFound { .. })
        ));
    }

    #[test]
    fn short_id_is_a_prefix() {
        let id = Uuid::parse_str("1a2b3c4d-0000-4000-8000-000000000001").unwrap();
        assert_eq!(short_id(id), "1a2b3c4d");
    }
}
