//! Club reference data.

use serde::{Deserialize, Serialize};

/// Backend identifier of a club (`id_clube`).
pub type ClubId = i64;

/// A club taking part in the league. Read-only on the client.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Club {
    #[serde(rename = "id_clube")]
    pub id: ClubId,
    #[serde(rename = "descricao")]
    pub name: String,
}

impl Club {
    pub fn new(id: ClubId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
