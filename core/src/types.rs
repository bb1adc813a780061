//! Response DTOs for the most common Neople payloads.
//!
//! # Design
//! Endpoints decode into any `DeserializeOwned`, so these types are a
//! convenience, not a schema. Fields the API may omit are `Option` and unknown
//! fields are ignored.

use serde::{Deserialize, Serialize};

/// The `{"rows": [...]}` envelope used by every search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rows<T> {
    pub rows: Vec<T>,
    /// Cursor for the next page, when the endpoint pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// One hit from the Dungeon Fighter character search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSummary {
    pub server_id: String,
    pub character_id: String,
    pub character_name: String,
    pub level: u32,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub job_grow_id: Option<String>,
    #[serde(default)]
    pub job_name: Option<String>,
    #[serde(default)]
    pub job_grow_name: Option<String>,
    #[serde(default)]
    pub fame: Option<u32>,
}

/// Dungeon Fighter character basic info.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub server_id: String,
    pub character_id: String,
    pub character_name: String,
    pub level: u32,
    #[serde(default)]
    pub job_name: Option<String>,
    #[serde(default)]
    pub job_grow_name: Option<String>,
    #[serde(default)]
    pub adventure_name: Option<String>,
    #[serde(default)]
    pub guild_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepresentCharacter {
    pub character_id: String,
    pub character_name: String,
}

/// One hit from the Cyphers player search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub player_id: String,
    pub nickname: String,
    pub grade: u32,
    #[serde(default)]
    pub represent: Option<RepresentCharacter>,
}
