//! Cyphers (`/cy`) endpoints.
//!
//! Same layout as [`crate::df`]: descriptor functions, a client view and a
//! URL view.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::NeopleClient;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::query::{ParamValue, QueryParams};
use crate::url_builder::UrlBuilder;

/// Nickname match mode for player search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerWordType {
    Match,
    Full,
}

impl From<PlayerWordType> for ParamValue {
    fn from(word_type: PlayerWordType) -> Self {
        let s = match word_type {
            PlayerWordType::Match => "match",
            PlayerWordType::Full => "full",
        };
        ParamValue::Str(s.to_string())
    }
}

/// Per-character ranking category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RankingType {
    WinCount,
    WinRate,
    KillCount,
    AssistCount,
    Exp,
}

impl RankingType {
    pub fn as_str(self) -> &'static str {
        match self {
            RankingType::WinCount => "winCount",
            RankingType::WinRate => "winRate",
            RankingType::KillCount => "killCount",
            RankingType::AssistCount => "assistCount",
            RankingType::Exp => "exp",
        }
    }
}

/// Fighting-style ranking category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TsjType {
    Melee,
    Ranged,
}

impl TsjType {
    pub fn as_str(self) -> &'static str {
        match self {
            TsjType::Melee => "melee",
            TsjType::Ranged => "ranged",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerSearchParams {
    pub word_type: Option<PlayerWordType>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchesParams {
    /// `rating` or `normal`.
    pub game_type_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<u32>,
    pub next: Option<String>,
}

impl From<&MatchesParams> for QueryParams {
    fn from(p: &MatchesParams) -> Self {
        QueryParams::new()
            .with_some("gameTypeId", p.game_type_id.clone())
            .with_some("startDate", p.start_date.clone())
            .with_some("endDate", p.end_date.clone())
            .with_some("limit", p.limit)
            .with_some("next", p.next.clone())
    }
}

/// Paging shared by every ranking endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingParams {
    pub player_id: Option<String>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl From<&RankingParams> for QueryParams {
    fn from(p: &RankingParams) -> Self {
        QueryParams::new()
            .with_some("playerId", p.player_id.clone())
            .with_some("offset", p.offset)
            .with_some("limit", p.limit)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemSearchParams {
    pub item_name: Option<String>,
    pub limit: Option<u32>,
    pub word_type: Option<crate::df::WordType>,
    pub character_id: Option<String>,
    pub slot_code: Option<String>,
    pub rarity_code: Option<String>,
    pub season_code: Option<String>,
}

impl From<&ItemSearchParams> for QueryParams {
    fn from(p: &ItemSearchParams) -> Self {
        QueryParams::new()
            .with_some("itemName", p.item_name.clone())
            .with_some("limit", p.limit)
            .with_some("wordType", p.word_type)
            .with_some("characterId", p.character_id.clone())
            .with_some("slotCode", p.slot_code.clone())
            .with_some("rarityCode", p.rarity_code.clone())
            .with_some("seasonCode", p.season_code.clone())
    }
}

pub fn search_player(nickname: &str, params: &PlayerSearchParams) -> ApiRequest {
    let params = QueryParams::new()
        .with("nickname", nickname)
        .with_some("wordType", params.word_type)
        .with_some("limit", params.limit);
    ApiRequest::with_params("/cy/players", params)
}

pub fn player_info(player_id: &str) -> ApiRequest {
    ApiRequest::new(format!("/cy/players/{player_id}"))
}

pub fn player_matches(player_id: &str, params: &MatchesParams) -> ApiRequest {
    ApiRequest::with_params(format!("/cy/players/{player_id}/matches"), params.into())
}

pub fn player_equipment(player_id: &str) -> ApiRequest {
    ApiRequest::new(format!("/cy/players/{player_id}/battleitems"))
}

pub fn match_detail(match_id: &str) -> ApiRequest {
    ApiRequest::new(format!("/cy/matches/{match_id}"))
}

pub fn overall_ranking(params: &RankingParams) -> ApiRequest {
    ApiRequest::with_params("/cy/ranking/ratingpoint", params.into())
}

pub fn character_ranking(character_id: &str, kind: RankingType, params: &RankingParams) -> ApiRequest {
    ApiRequest::with_params(
        format!("/cy/ranking/characters/{character_id}/{}", kind.as_str()),
        params.into(),
    )
}

pub fn tsj_ranking(kind: TsjType, params: &RankingParams) -> ApiRequest {
    ApiRequest::with_params(format!("/cy/ranking/tsj/{}", kind.as_str()), params.into())
}

pub fn search_items(params: &ItemSearchParams) -> ApiRequest {
    ApiRequest::with_params("/cy/battleitems", params.into())
}

pub fn item_detail(item_id: &str) -> ApiRequest {
    ApiRequest::new(format!("/cy/battleitems/{item_id}"))
}

/// Details for several items in one call; ids are sent comma-joined.
pub fn multi_items<S: AsRef<str>>(item_ids: &[S]) -> ApiRequest {
    let joined = item_ids
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",");
    ApiRequest::with_params("/cy/multi/battleitems", QueryParams::new().with("itemIds", joined))
}

/// Character catalogue. Parameters are forwarded as given.
pub fn cyphers_info(params: QueryParams) -> ApiRequest {
    ApiRequest::with_params("/cy/characters", params)
}

pub fn recommend_items(character_id: &str) -> ApiRequest {
    ApiRequest::new(format!("/cy/characters/{character_id}/items"))
}

/// Cyphers calls issued through a [`NeopleClient`].
#[derive(Debug, Clone, Copy)]
pub struct Cyphers<'a> {
    client: &'a NeopleClient,
}

impl<'a> Cyphers<'a> {
    pub(crate) fn new(client: &'a NeopleClient) -> Self {
        Self { client }
    }

    pub async fn search_player<T: DeserializeOwned>(&self, nickname: &str, params: &PlayerSearchParams) -> Result<T> {
        self.client.send(&search_player(nickname, params)).await
    }

    pub async fn player_info<T: DeserializeOwned>(&self, player_id: &str) -> Result<T> {
        self.client.send(&player_info(player_id)).await
    }

    pub async fn player_matches<T: DeserializeOwned>(&self, player_id: &str, params: &MatchesParams) -> Result<T> {
        self.client.send(&player_matches(player_id, params)).await
    }

    pub async fn player_equipment<T: DeserializeOwned>(&self, player_id: &str) -> Result<T> {
        self.client.send(&player_equipment(player_id)).await
    }

    pub async fn match_detail<T: DeserializeOwned>(&self, match_id: &str) -> Result<T> {
        self.client.send(&match_detail(match_id)).await
    }

    pub async fn overall_ranking<T: DeserializeOwned>(&self, params: &RankingParams) -> Result<T> {
        self.client.send(&overall_ranking(params)).await
    }

    pub async fn character_ranking<T: DeserializeOwned>(
        &self,
        character_id: &str,
        kind: RankingType,
        params: &RankingParams,
    ) -> Result<T> {
        self.client
            .send(&character_ranking(character_id, kind, params))
            .await
    }

    pub async fn tsj_ranking<T: DeserializeOwned>(&self, kind: TsjType, params: &RankingParams) -> Result<T> {
        self.client.send(&tsj_ranking(kind, params)).await
    }

    pub async fn search_items<T: DeserializeOwned>(&self, params: &ItemSearchParams) -> Result<T> {
        self.client.send(&search_items(params)).await
    }

    pub async fn item_detail<T: DeserializeOwned>(&self, item_id: &str) -> Result<T> {
        self.client.send(&item_detail(item_id)).await
    }

    pub async fn multi_items<T: DeserializeOwned, S: AsRef<str>>(&self, item_ids: &[S]) -> Result<T> {
        self.client.send(&multi_items(item_ids)).await
    }

    pub async fn cyphers_info<T: DeserializeOwned>(&self, params: QueryParams) -> Result<T> {
        self.client.send(&cyphers_info(params)).await
    }

    pub async fn recommend_items<T: DeserializeOwned>(&self, character_id: &str) -> Result<T> {
        self.client.send(&recommend_items(character_id)).await
    }
}

/// Cyphers URLs rendered by a [`UrlBuilder`].
#[derive(Debug, Clone, Copy)]
pub struct CyphersUrls<'a> {
    builder: &'a UrlBuilder,
}

impl<'a> CyphersUrls<'a> {
    pub(crate) fn new(builder: &'a UrlBuilder) -> Self {
        Self { builder }
    }

    pub fn search_player(&self, nickname: &str, params: &PlayerSearchParams) -> Result<String> {
        self.builder.build(&search_player(nickname, params))
    }

    pub fn player_info(&self, player_id: &str) -> Result<String> {
        self.builder.build(&player_info(player_id))
    }

    pub fn player_matches(&self, player_id: &str, params: &MatchesParams) -> Result<String> {
        self.builder.build(&player_matches(player_id, params))
    }

    pub fn player_equipment(&self, player_id: &str) -> Result<String> {
        self.builder.build(&player_equipment(player_id))
    }

    pub fn match_detail(&self, match_id: &str) -> Result<String> {
        self.builder.build(&match_detail(match_id))
    }

    pub fn overall_ranking(&self, params: &RankingParams) -> Result<String> {
        self.builder.build(&overall_ranking(params))
    }

    pub fn character_ranking(&self, character_id: &str, kind: RankingType, params: &RankingParams) -> Result<String> {
        self.builder.build(&character_ranking(character_id, kind, params))
    }

    pub fn tsj_ranking(&self, kind: TsjType, params: &RankingParams) -> Result<String> {
        self.builder.build(&tsj_ranking(kind, params))
    }

    pub fn search_items(&self, params: &ItemSearchParams) -> Result<String> {
        self.builder.build(&search_items(params))
    }

    pub fn item_detail(&self, item_id: &str) -> Result<String> {
        self.builder.build(&item_detail(item_id))
    }

    pub fn multi_items<S: AsRef<str>>(&self, item_ids: &[S]) -> Result<String> {
        self.builder.build(&multi_items(item_ids))
    }

    pub fn cyphers_info(&self, params: QueryParams) -> Result<String> {
        self.builder.build(&cyphers_info(params))
    }

    pub fn recommend_items(&self, character_id: &str) -> Result<String> {
        self.builder.build(&recommend_items(character_id))
    }

    /// Render several URLs in order.
    pub fn batch(&self, builders: &[&dyn Fn(&Self) -> Result<String>]) -> Result<Vec<String>> {
        builders.iter().map(|build| build(self)).collect()
    }
}
