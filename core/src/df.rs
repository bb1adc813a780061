//! Dungeon Fighter Online (`/df`) endpoints.
//!
//! # Design
//! Each endpoint is a free function returning an [`ApiRequest`]. The client
//! view ([`DungeonFighter`]) sends it and the URL view ([`DfUrls`]) renders
//! it, so both always agree on path and parameter order.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::NeopleClient;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::query::{ParamValue, QueryParams};
use crate::url_builder::UrlBuilder;

/// Server id that searches every server.
pub const ALL_SERVERS: &str = "all";

/// How a name parameter is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordType {
    Match,
    Front,
    Full,
}

impl WordType {
    pub fn as_str(self) -> &'static str {
        match self {
            WordType::Match => "match",
            WordType::Front => "front",
            WordType::Full => "full",
        }
    }
}

impl From<WordType> for ParamValue {
    fn from(word_type: WordType) -> Self {
        ParamValue::Str(word_type.as_str().to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineParams {
    /// `YYYYMMDDTHHmm`
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<u32>,
    /// Comma-separated timeline codes.
    pub code: Option<String>,
    /// Cursor returned by the previous page.
    pub next: Option<String>,
}

impl From<&TimelineParams> for QueryParams {
    fn from(p: &TimelineParams) -> Self {
        QueryParams::new()
            .with_some("startDate", p.start_date.clone())
            .with_some("endDate", p.end_date.clone())
            .with_some("limit", p.limit)
            .with_some("code", p.code.clone())
            .with_some("next", p.next.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuctionSearchParams {
    pub item_id: Option<String>,
    pub item_name: Option<String>,
    pub word_type: Option<WordType>,
    pub word_short: Option<bool>,
    pub limit: Option<u32>,
    /// e.g. `unitPrice:asc`
    pub sort: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
}

impl From<&AuctionSearchParams> for QueryParams {
    fn from(p: &AuctionSearchParams) -> Self {
        QueryParams::new()
            .with_some("itemId", p.item_id.clone())
            .with_some("itemName", p.item_name.clone())
            .with_some("wordType", p.word_type)
            .with_some("wordShort", p.word_short)
            .with_some("limit", p.limit)
            .with_some("sort", p.sort.clone())
            .with_some("minPrice", p.min_price)
            .with_some("maxPrice", p.max_price)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuctionSoldParams {
    pub item_id: Option<String>,
    pub item_name: Option<String>,
    pub word_type: Option<WordType>,
    pub word_short: Option<bool>,
    pub limit: Option<u32>,
}

impl From<&AuctionSoldParams> for QueryParams {
    fn from(p: &AuctionSoldParams) -> Self {
        QueryParams::new()
            .with_some("itemId", p.item_id.clone())
            .with_some("itemName", p.item_name.clone())
            .with_some("wordType", p.word_type)
            .with_some("wordShort", p.word_short)
            .with_some("limit", p.limit)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemSearchParams {
    pub item_name: Option<String>,
    pub word_type: Option<WordType>,
    pub limit: Option<u32>,
    /// Raw filter expression, e.g. `minLevel:100,rarity:에픽`.
    pub q: Option<String>,
}

impl From<&ItemSearchParams> for QueryParams {
    fn from(p: &ItemSearchParams) -> Self {
        QueryParams::new()
            .with_some("itemName", p.item_name.clone())
            .with_some("wordType", p.word_type)
            .with_some("limit", p.limit)
            .with_some("q", p.q.clone())
    }
}

fn character_path(server_id: &str, character_id: &str, suffix: &str) -> String {
    format!("/df/servers/{server_id}/characters/{character_id}{suffix}")
}

pub fn search_character(character_name: &str, server_id: &str) -> ApiRequest {
    ApiRequest::with_params(
        format!("/df/servers/{server_id}/characters"),
        QueryParams::new().with("characterName", character_name),
    )
}

pub fn character(server_id: &str, character_id: &str) -> ApiRequest {
    ApiRequest::new(character_path(server_id, character_id, ""))
}

pub fn character_equipment(server_id: &str, character_id: &str) -> ApiRequest {
    ApiRequest::new(character_path(server_id, character_id, "/equip/equipment"))
}

pub fn character_status(server_id: &str, character_id: &str) -> ApiRequest {
    ApiRequest::new(character_path(server_id, character_id, "/status"))
}

pub fn character_avatar(server_id: &str, character_id: &str) -> ApiRequest {
    ApiRequest::new(character_path(server_id, character_id, "/equip/avatar"))
}

pub fn character_creature(server_id: &str, character_id: &str) -> ApiRequest {
    ApiRequest::new(character_path(server_id, character_id, "/equip/creature"))
}

pub fn character_flag(server_id: &str, character_id: &str) -> ApiRequest {
    ApiRequest::new(character_path(server_id, character_id, "/equip/flag"))
}

pub fn character_talisman(server_id: &str, character_id: &str) -> ApiRequest {
    ApiRequest::new(character_path(server_id, character_id, "/equip/talisman"))
}

/// Skill style (learned skills and levels).
pub fn character_skill(server_id: &str, character_id: &str) -> ApiRequest {
    ApiRequest::new(character_path(server_id, character_id, "/skill/style"))
}

/// Buff-enhancement skill.
pub fn character_buff(server_id: &str, character_id: &str) -> ApiRequest {
    ApiRequest::new(character_path(server_id, character_id, "/skill/buff"))
}

pub fn character_timeline(server_id: &str, character_id: &str, params: &TimelineParams) -> ApiRequest {
    ApiRequest::with_params(character_path(server_id, character_id, "/timeline"), params.into())
}

pub fn search_auction(params: &AuctionSearchParams) -> ApiRequest {
    ApiRequest::with_params("/df/auction", params.into())
}

pub fn auction_sold(params: &AuctionSoldParams) -> ApiRequest {
    ApiRequest::with_params("/df/auction-sold", params.into())
}

pub fn search_items(params: &ItemSearchParams) -> ApiRequest {
    ApiRequest::with_params("/df/items", params.into())
}

pub fn item(item_id: &str) -> ApiRequest {
    ApiRequest::new(format!("/df/items/{item_id}"))
}

pub fn set_item(set_item_id: &str) -> ApiRequest {
    ApiRequest::new(format!("/df/setitems/{set_item_id}"))
}

pub fn multi_item(item_id: &str) -> ApiRequest {
    ApiRequest::new(format!("/df/multi/{item_id}"))
}

/// Dungeon Fighter calls issued through a [`NeopleClient`].
///
/// Every method decodes the payload into `T`; use `serde_json::Value` for the
/// raw body or a type from [`crate::types`].
#[derive(Debug, Clone, Copy)]
pub struct DungeonFighter<'a> {
    client: &'a NeopleClient,
}

impl<'a> DungeonFighter<'a> {
    pub(crate) fn new(client: &'a NeopleClient) -> Self {
        Self { client }
    }

    /// Search by name; pass [`ALL_SERVERS`] to search every server.
    pub async fn search_character<T: DeserializeOwned>(&self, character_name: &str, server_id: &str) -> Result<T> {
        self.client.send(&search_character(character_name, server_id)).await
    }

    pub async fn character<T: DeserializeOwned>(&self, server_id: &str, character_id: &str) -> Result<T> {
        self.client.send(&character(server_id, character_id)).await
    }

    pub async fn character_equipment<T: DeserializeOwned>(&self, server_id: &str, character_id: &str) -> Result<T> {
        self.client.send(&character_equipment(server_id, character_id)).await
    }

    pub async fn character_status<T: DeserializeOwned>(&self, server_id: &str, character_id: &str) -> Result<T> {
        self.client.send(&character_status(server_id, character_id)).await
    }

    pub async fn character_avatar<T: DeserializeOwned>(&self, server_id: &str, character_id: &str) -> Result<T> {
        self.client.send(&character_avatar(server_id, character_id)).await
    }

    pub async fn character_creature<T: DeserializeOwned>(&self, server_id: &str, character_id: &str) -> Result<T> {
        self.client.send(&character_creature(server_id, character_id)).await
    }

    pub async fn character_flag<T: DeserializeOwned>(&self, server_id: &str, character_id: &str) -> Result<T> {
        self.client.send(&character_flag(server_id, character_id)).await
    }

    pub async fn character_talisman<T: DeserializeOwned>(&self, server_id: &str, character_id: &str) -> Result<T> {
        self.client.send(&character_talisman(server_id, character_id)).await
    }

    pub async fn character_skill<T: DeserializeOwned>(&self, server_id: &str, character_id: &str) -> Result<T> {
        self.client.send(&character_skill(server_id, character_id)).await
    }

    pub async fn character_buff<T: DeserializeOwned>(&self, server_id: &str, character_id: &str) -> Result<T> {
        self.client.send(&character_buff(server_id, character_id)).await
    }

    pub async fn character_timeline<T: DeserializeOwned>(
        &self,
        server_id: &str,
        character_id: &str,
        params: &TimelineParams,
    ) -> Result<T> {
        self.client
            .send(&character_timeline(server_id, character_id, params))
            .await
    }

    pub async fn search_auction<T: DeserializeOwned>(&self, params: &AuctionSearchParams) -> Result<T> {
        self.client.send(&search_auction(params)).await
    }

    pub async fn auction_sold<T: DeserializeOwned>(&self, params: &AuctionSoldParams) -> Result<T> {
        self.client.send(&auction_sold(params)).await
    }

    pub async fn search_items<T: DeserializeOwned>(&self, params: &ItemSearchParams) -> Result<T> {
        self.client.send(&search_items(params)).await
    }

    pub async fn item<T: DeserializeOwned>(&self, item_id: &str) -> Result<T> {
        self.client.send(&item(item_id)).await
    }

    pub async fn set_item<T: DeserializeOwned>(&self, set_item_id: &str) -> Result<T> {
        self.client.send(&set_item(set_item_id)).await
    }

    pub async fn multi_item<T: DeserializeOwned>(&self, item_id: &str) -> Result<T> {
        self.client.send(&multi_item(item_id)).await
    }
}

/// Dungeon Fighter URLs rendered by a [`UrlBuilder`].
#[derive(Debug, Clone, Copy)]
pub struct DfUrls<'a> {
    builder: &'a UrlBuilder,
}

impl<'a> DfUrls<'a> {
    pub(crate) fn new(builder: &'a UrlBuilder) -> Self {
        Self { builder }
    }

    pub fn search_character(&self, character_name: &str, server_id: &str) -> Result<String> {
        self.builder.build(&search_character(character_name, server_id))
    }

    pub fn character(&self, server_id: &str, character_id: &str) -> Result<String> {
        self.builder.build(&character(server_id, character_id))
    }

    pub fn character_equipment(&self, server_id: &str, character_id: &str) -> Result<String> {
        self.builder.build(&character_equipment(server_id, character_id))
    }

    pub fn character_status(&self, server_id: &str, character_id: &str) -> Result<String> {
        self.builder.build(&character_status(server_id, character_id))
    }

    pub fn character_avatar(&self, server_id: &str, character_id: &str) -> Result<String> {
        self.builder.build(&character_avatar(server_id, character_id))
    }

    pub fn character_creature(&self, server_id: &str, character_id: &str) -> Result<String> {
        self.builder.build(&character_creature(server_id, character_id))
    }

    pub fn character_flag(&self, server_id: &str, character_id: &str) -> Result<String> {
        self.builder.build(&character_flag(server_id, character_id))
    }

    pub fn character_talisman(&self, server_id: &str, character_id: &str) -> Result<String> {
        self.builder.build(&character_talisman(server_id, character_id))
    }

    pub fn character_skill(&self, server_id: &str, character_id: &str) -> Result<String> {
        self.builder.build(&character_skill(server_id, character_id))
    }

    pub fn character_buff(&self, server_id: &str, character_id: &str) -> Result<String> {
        self.builder.build(&character_buff(server_id, character_id))
    }

    pub fn character_timeline(
        &self,
        server_id: &str,
        character_id: &str,
        params: &TimelineParams,
    ) -> Result<String> {
        self.builder
            .build(&character_timeline(server_id, character_id, params))
    }

    pub fn search_auction(&self, params: &AuctionSearchParams) -> Result<String> {
        self.builder.build(&search_auction(params))
    }

    pub fn auction_sold(&self, params: &AuctionSoldParams) -> Result<String> {
        self.builder.build(&auction_sold(params))
    }

    pub fn search_items(&self, params: &ItemSearchParams) -> Result<String> {
        self.builder.build(&search_items(params))
    }

    pub fn item(&self, item_id: &str) -> Result<String> {
        self.builder.build(&item(item_id))
    }

    pub fn set_item(&self, set_item_id: &str) -> Result<String> {
        self.builder.build(&set_item(set_item_id))
    }

    pub fn multi_item(&self, item_id: &str) -> Result<String> {
        self.builder.build(&multi_item(item_id))
    }

    /// Render several URLs in order.
    pub fn batch(&self, builders: &[&dyn Fn(&Self) -> Result<String>]) -> Result<Vec<String>> {
        builders.iter().map(|build| build(self)).collect()
    }
}
