//! In-process stand-in for the Neople Open API.
//!
//! Serves a small fixed data set for the Dungeon Fighter character and
//! Cyphers player endpoints, plus diagnostic routes (`/echo`, `/status`,
//! `/slow`, `/malformed`, `/large`) used to exercise transport behavior.

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Character id the detail route always reports as unknown.
pub const MISSING_CHARACTER_ID: &str = "missing";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub server_id: String,
    pub character_id: String,
    pub character_name: String,
    pub level: u32,
    pub job_id: String,
    pub job_grow_id: String,
    pub job_name: String,
    pub job_grow_name: String,
    pub fame: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub player_id: String,
    pub nickname: String,
    pub grade: u32,
}

#[derive(Clone)]
struct AppState {
    api_key: Arc<str>,
    characters: Arc<Vec<Character>>,
    players: Arc<Vec<Player>>,
}

/// Router accepting only `api_key` as the `apikey` query parameter.
pub fn app(api_key: impl Into<String>) -> Router {
    let api_key: String = api_key.into();
    let state = AppState {
        api_key: Arc::from(api_key),
        characters: Arc::new(seed_characters()),
        players: Arc::new(seed_players()),
    };

    let protected = Router::new()
        .route("/df/servers/{server_id}/characters", get(search_characters))
        .route("/df/servers/{server_id}/characters/{character_id}", get(get_character))
        .route("/cy/players", get(search_players))
        .route("/cy/players/{player_id}", get(get_player))
        .route("/echo/{*path}", get(echo))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/status/{code}", get(status))
        .route("/slow", get(slow))
        .route("/malformed", get(malformed))
        .route("/large", get(large))
        .merge(protected)
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: impl Into<String>) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

/// Neople-shaped error body: `{"error": {"status", "code", "message"}}`.
fn neople_error(status: StatusCode, code: &str, message: &str) -> Response {
    let body = json!({
        "error": {
            "status": status.as_u16(),
            "code": code,
            "message": message,
        }
    });
    (status, Json(body)).into_response()
}

async fn require_api_key(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Response {
    match query.get("apikey") {
        Some(key) if key.as_str() == &*state.api_key => next.run(request).await,
        _ => {
            tracing::debug!(path = %request.uri().path(), "rejecting request without a valid apikey");
            neople_error(StatusCode::FORBIDDEN, "API001", "INVALID_APIKEY")
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacterSearch {
    character_name: Option<String>,
    word_type: Option<String>,
}

async fn search_characters(
    State(state): State<AppState>,
    Path(server_id): Path<String>,
    Query(search): Query<CharacterSearch>,
) -> Response {
    let Some(name) = search.character_name.filter(|n| !n.is_empty()) else {
        return neople_error(StatusCode::BAD_REQUEST, "DNF004", "INVALID_CHARACTER_INFO");
    };
    let full = search.word_type.as_deref() == Some("full");

    let rows: Vec<&Character> = state
        .characters
        .iter()
        .filter(|c| server_id == "all" || c.server_id == server_id)
        .filter(|c| {
            if full {
                c.character_name.contains(name.as_str())
            } else {
                c.character_name == name
            }
        })
        .collect();
    Json(json!({ "rows": rows })).into_response()
}

async fn get_character(
    State(state): State<AppState>,
    Path((server_id, character_id)): Path<(String, String)>,
) -> Response {
    if character_id == MISSING_CHARACTER_ID {
        return neople_error(StatusCode::NOT_FOUND, "DNF001", "NOT_FOUND_CHARACTER");
    }
    let known = state
        .characters
        .iter()
        .find(|c| c.server_id == server_id && c.character_id == character_id);
    match known {
        Some(character) => Json(character.clone()).into_response(),
        None => Json(json!({
            "serverId": server_id,
            "characterId": character_id,
            "characterName": format!("char-{character_id}"),
            "level": 1,
        }))
        .into_response(),
    }
}

#[derive(Deserialize)]
struct PlayerSearch {
    nickname: Option<String>,
    limit: Option<usize>,
}

async fn search_players(State(state): State<AppState>, Query(search): Query<PlayerSearch>) -> Response {
    let Some(nickname) = search.nickname.filter(|n| !n.is_empty()) else {
        return neople_error(StatusCode::BAD_REQUEST, "CY001", "INVALID_NICKNAME");
    };
    let rows: Vec<&Player> = state
        .players
        .iter()
        .filter(|p| p.nickname == nickname)
        .take(search.limit.unwrap_or(usize::MAX))
        .collect();
    Json(json!({ "rows": rows })).into_response()
}

async fn get_player(State(state): State<AppState>, Path(player_id): Path<String>) -> Response {
    match state.players.iter().find(|p| p.player_id == player_id) {
        Some(player) => Json(player.clone()).into_response(),
        None => neople_error(StatusCode::NOT_FOUND, "CY002", "NOT_FOUND_PLAYER"),
    }
}

/// Reflects what the server received so clients can check their encoding.
async fn echo(uri: Uri, headers: HeaderMap) -> Json<Value> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let content_type: Vec<&str> = headers
        .get_all(header::CONTENT_TYPE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    Json(json!({
        "path": uri.path(),
        "query": uri.query().unwrap_or_default(),
        "authorization": authorization,
        "contentType": content_type,
    }))
}

async fn status(Path(code): Path<u16>) -> Response {
    let Ok(status) = StatusCode::from_u16(code) else {
        return neople_error(StatusCode::BAD_REQUEST, "API000", "INVALID_STATUS");
    };
    let message = status.canonical_reason().unwrap_or("UNKNOWN");
    neople_error(status, "API999", message)
}

#[derive(Deserialize)]
struct SlowQuery {
    #[serde(default)]
    ms: u64,
}

async fn slow(Query(query): Query<SlowQuery>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(query.ms)).await;
    Json(json!({ "sleptMs": query.ms }))
}

#[derive(Deserialize)]
struct LargeQuery {
    bytes: usize,
}

/// `{"rows": "aaa..."}` with a string of `bytes` characters.
async fn large(Query(query): Query<LargeQuery>) -> Json<Value> {
    Json(json!({ "rows": "a".repeat(query.bytes) }))
}

async fn malformed() -> Response {
    (
        [(header::CONTENT_TYPE, "application/json")],
        "{\"rows\": [unterminated",
    )
        .into_response()
}

fn seed_characters() -> Vec<Character> {
    vec![
        Character {
            server_id: "cain".to_string(),
            character_id: "5f1b9c2a8e".to_string(),
            character_name: "홍길동".to_string(),
            level: 110,
            job_id: "41f1cdc2ff58bb5fdc287be0db2a8df3".to_string(),
            job_grow_id: "df3870efe8e8754011cd12fa03cd275f".to_string(),
            job_name: "귀검사(남)".to_string(),
            job_grow_name: "眞 웨펀마스터".to_string(),
            fame: 45210,
        },
        Character {
            server_id: "hilder".to_string(),
            character_id: "7a2c4d9e01".to_string(),
            character_name: "홍길동".to_string(),
            level: 105,
            job_id: "a7a059ebe9e6054c0644b40ef316d6e9".to_string(),
            job_grow_id: "4fe8b3d5d4c8d8dbd7e5c6e2a13bbd0c".to_string(),
            job_name: "마법사(여)".to_string(),
            job_grow_name: "眞 엘레멘탈마스터".to_string(),
            fame: 38002,
        },
        Character {
            server_id: "cain".to_string(),
            character_id: "0d3e8b7c55".to_string(),
            character_name: "홍길순".to_string(),
            level: 110,
            job_id: "1645c45aabb008c98406b3a16447040d".to_string(),
            job_grow_id: "37495b941da3b97e7c8e3e47b8a2b0ab".to_string(),
            job_name: "거너(여)".to_string(),
            job_grow_name: "眞 스핏파이어".to_string(),
            fame: 41877,
        },
    ]
}

fn seed_players() -> Vec<Player> {
    vec![
        Player {
            player_id: "b3c1e0f2a4d6".to_string(),
            nickname: "사이퍼".to_string(),
            grade: 87,
        },
        Player {
            player_id: "c9d8e7f6a5b4".to_string(),
            nickname: "test user".to_string(),
            grade: 12,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_serializes_camel_case() {
        let character = &seed_characters()[0];
        let json = serde_json::to_value(character).unwrap();
        assert_eq!(json["serverId"], "cain");
        assert_eq!(json["characterName"], "홍길동");
        assert_eq!(json["jobGrowName"], "眞 웨펀마스터");
    }

    #[test]
    fn seeded_ids_are_unique() {
        let characters = seed_characters();
        let mut ids: Vec<_> = characters.iter().map(|c| c.character_id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), characters.len());
        assert!(!ids.contains(&MISSING_CHARACTER_ID));
    }

    #[test]
    fn slow_query_defaults_to_zero() {
        let query: SlowQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.ms, 0);
    }
}
