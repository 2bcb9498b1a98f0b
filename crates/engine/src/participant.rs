//! The module contains the `Participant` struct.

use serde::Serialize;
use uuid::Uuid;

use crate::{
    ResultEngine,
    util::{normalize_optional_text, normalize_required_name},
};

/// A person sharing the bill.
///
/// Identity is the `id`; two participants may share a display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
}

impl Participant {
    /// Creates a participant with a fresh id.
    ///
    /// The name is trimmed and must not be empty; a blank email is dropped.
    pub fn new(name: &str, email: Option<&str>) -> ResultEngine<Self> {
        Self::with_id(Uuid::new_v4(), name, email)
    }

    /// Creates a participant with a known id (e.g. when restoring a bill).
    pub fn with_id(id: Uuid, name: &str, email: Option<&str>) -> ResultEngine<Self> {
        Ok(Self {
            id,
            name: normalize_required_name(name, "participant")?,
            email: normalize_optional_text(email),
        })
    }
}
