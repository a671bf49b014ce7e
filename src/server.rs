use crate::config::Config;
use crate::http::{ApiRequest, ApiSession, RateLimiter};
use crate::mcp::mcp_wrap;
use crate::resources;
use crate::tools::*;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

// Minimal JSON-RPC 2.0 types
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Id {
    Str(String),
    Num(i64),
    Null,
}

#[derive(Debug, Serialize, Deserialize)]
struct Request {
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Value,
    id: Option<Id>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Response {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
    id: Option<Id>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

fn rpc_error(id: Option<Id>, code: i64, message: &str, data: Option<Value>) -> Response {
    Response { jsonrpc: "2.0".into(), result: None, error: Some(RpcError { code, message: message.into(), data }), id }
}

fn rpc_ok(id: Option<Id>, result: Value) -> Response {
    Response { jsonrpc: "2.0".into(), result: Some(result), error: None, id }
}

/// Process-wide server state: the validated configuration, the shared rate
/// budget, and the runtime driving per-call async work.
struct ServerState {
    cfg: Config,
    limiter: Arc<RateLimiter>,
    rt: tokio::runtime::Runtime,
}

pub fn run_stdio_server(cfg: Config) -> anyhow::Result<()> {
    info!("Starting steam-mcp stdio server; protocol={}", PROTOCOL_VERSION);
    let rt = tokio::runtime::Runtime::new()?;
    let limiter = Arc::new(RateLimiter::new(
        cfg.rate_limit,
        Duration::from_secs(cfg.rate_period_secs),
    ));
    let state = ServerState { cfg, limiter, rt };

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let resp = match serde_json::from_str::<Request>(&line) {
            Ok(req) => {
                debug!("Received method={}", req.method);
                dispatch(&state, req)
            }
            Err(e) => Some(rpc_error(None, -32700, &format!("Parse error: {}", e), None)),
        };
        if let Some(resp) = resp {
            write_response(&resp)?;
        }
    }
    Ok(())
}

fn write_response(resp: &Response) -> anyhow::Result<()> {
    let mut out = io::stdout();
    let payload = serde_json::to_string(resp)?;
    writeln!(out, "{}", payload)?;
    out.flush()?;
    Ok(())
}

fn dispatch(st: &ServerState, req: Request) -> Option<Response> {
    // Notifications carry no id and expect no response.
    if req.method.starts_with("notifications/") {
        return None;
    }
    Some(match req.method.as_str() {
        "initialize" => handle_initialize(req.id),
        "ping" => handle_ping(req.id, req.params),
        "tools/list" => handle_tools_list(req.id),
        "tools/call" => handle_tools_call(st, req.id, req.params),
        "resources/list" => handle_resources_list(req.id),
        "resources/read" => handle_resources_read(req.id, req.params),
        other => rpc_error(req.id, -32601, &format!("Method not found: {}", other), None),
    })
}

fn handle_initialize(id: Option<Id>) -> Response {
    rpc_ok(
        id,
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {}, "resources": {} },
            "serverInfo": {
                "name": "steam-mcp",
                "version": env!("CARGO_PKG_VERSION"),
            }
        }),
    )
}

fn handle_tools_list(id: Option<Id>) -> Response {
    let tools = tool_descriptors();
    rpc_ok(id, serde_json::json!({ "tools": tools }))
}

fn handle_resources_list(id: Option<Id>) -> Response {
    let resources = resources::resource_descriptors();
    rpc_ok(id, serde_json::json!({ "resources": resources }))
}

#[derive(Deserialize)]
struct ResourcesReadParams {
    uri: String,
}

fn handle_resources_read(id: Option<Id>, params: Value) -> Response {
    let parsed: Result<ResourcesReadParams, _> = serde_json::from_value(params);
    let Ok(read) = parsed else {
        return rpc_error(id, -32602, "Invalid params", None);
    };
    match resources::read_resource(&read.uri) {
        Some(doc) => {
            let text = serde_json::to_string_pretty(&doc).unwrap_or_else(|_| "{}".into());
            rpc_ok(
                id,
                serde_json::json!({
                    "contents": [{ "uri": read.uri, "mimeType": "application/json", "text": text }]
                }),
            )
        }
        None => rpc_error(id, -32602, &format!("Unknown resource: {}", read.uri), None),
    }
}

#[derive(Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

fn handle_tools_call(st: &ServerState, id: Option<Id>, params: Value) -> Response {
    let parsed: Result<ToolCallParams, _> = serde_json::from_value(params);
    let Ok(call) = parsed else {
        return rpc_error(id, -32602, "Invalid params", None);
    };
    match call.name.as_str() {
        "ping" => handle_ping(id, call.arguments),
        "get_user_profile" => handle_get_user_profile(st, id, call.arguments),
        "get_friends_list" => handle_get_friends_list(st, id, call.arguments),
        "get_owned_games" => handle_get_owned_games(st, id, call.arguments),
        "get_recently_played_games" => handle_get_recently_played_games(st, id, call.arguments),
        "get_steam_level" => handle_get_steam_level(st, id, call.arguments),
        "get_player_achievements" => handle_get_player_achievements(st, id, call.arguments),
        "get_game_details" => handle_get_game_details(st, id, call.arguments),
        "get_game_news" => handle_get_game_news(st, id, call.arguments),
        "get_global_achievement_percentages" => {
            handle_get_global_achievement_percentages(st, id, call.arguments)
        }
        "search_games" => handle_search_games(st, id, call.arguments),
        "get_game_schema" => handle_get_game_schema(st, id, call.arguments),
        "get_workshop_items" => handle_get_workshop_items(st, id, call.arguments),
        "get_workshop_item_details" => handle_get_workshop_item_details(st, id, call.arguments),
        "get_user_reviews" => handle_get_user_reviews(st, id, call.arguments),
        "get_player_bans" => handle_get_player_bans(st, id, call.arguments),
        "resolve_vanity_url" => handle_resolve_vanity_url(st, id, call.arguments),
        _ => rpc_error(id, -32601, &format!("Tool not found: {}", call.name), None),
    }
}

fn handle_ping(id: Option<Id>, params: Value) -> Response {
    let input: PingInput = match serde_json::from_value(params) {
        Ok(v) => v,
        Err(_) => PingInput { message: None },
    };
    let message = input.message.unwrap_or_else(|| "pong".to_string());
    let out = serde_json::to_value(PingOutput { message }).unwrap_or_default();
    rpc_ok(id, mcp_wrap(out, false))
}

// Run one scoped gateway session; the session (and its connection pool) is
// dropped on every exit path when the future resolves.
fn with_session<F, Fut, T>(st: &ServerState, f: F) -> Result<T, ErrorShape>
where
    F: FnOnce(ApiSession) -> Fut,
    Fut: Future<Output = Result<T, ErrorShape>>,
{
    let session = match ApiSession::new(&st.cfg, st.limiter.clone()) {
        Ok(s) => s,
        Err(e) => return Err(ErrorShape::from(&e)),
    };
    st.rt.block_on(f(session))
}

fn tool_result<T: Serialize>(id: Option<Id>, out: &T, is_error: bool) -> Response {
    let structured = serde_json::to_value(out).unwrap_or(Value::Null);
    rpc_ok(id, mcp_wrap(structured, is_error))
}

fn item_result(id: Option<Id>, out: ItemOutput) -> Response {
    let is_error = out.is_error();
    tool_result(id, &out, is_error)
}

fn list_result(id: Option<Id>, out: ListOutput) -> Response {
    let is_error = out.is_error();
    tool_result(id, &out, is_error)
}

fn resolve_steam_id(explicit: Option<String>, cfg: &Config) -> Result<String, String> {
    explicit
        .filter(|s| !s.is_empty())
        .or_else(|| cfg.default_user_id.clone())
        .ok_or_else(|| "Missing steam_id and no STEAM_USER_ID configured".to_string())
}

fn enforce_count(count: Option<u32>, default: u32, max: u32) -> Result<u32, String> {
    let c = count.unwrap_or(default);
    if c == 0 || c > max {
        return Err(format!("count must be 1..={}", max));
    }
    Ok(c)
}

// Checked list extraction; a missing sub-path is an empty result, matching
// how the upstream omits empty collections entirely.
fn list_at(payload: &Value, pointer: &str) -> Vec<Value> {
    payload
        .pointer(pointer)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn handle_get_user_profile(st: &ServerState, id: Option<Id>, params: Value) -> Response {
    let input: GetUserProfileInput = match serde_json::from_value(params) { Ok(v) => v, Err(e) => return rpc_error(id, -32602, &format!("Invalid params: {}", e), None) };
    let steam_id = match resolve_steam_id(input.steam_id, &st.cfg) { Ok(s) => s, Err(m) => return rpc_error(id, -32602, &m, None) };
    let sid = steam_id.clone();
    let out = match with_session(st, |s| async move {
        let req = ApiRequest::new("ISteamUser", "GetPlayerSummaries", "v0002")
            .param("steamids", &sid);
        s.get(&req).await.map_err(|e| ErrorShape::from(&e))
    }) {
        Ok(payload) => match payload.pointer("/response/players/0") {
            Some(player) => ItemOutput::ok(player.clone()),
            None => ItemOutput::fail(ErrorShape::not_found(format!(
                "No profile found for Steam ID: {}",
                steam_id
            ))),
        },
        Err(e) => ItemOutput::fail(e),
    };
    item_result(id, out)
}

fn handle_get_friends_list(st: &ServerState, id: Option<Id>, params: Value) -> Response {
    let input: GetFriendsListInput = match serde_json::from_value(params) { Ok(v) => v, Err(e) => return rpc_error(id, -32602, &format!("Invalid params: {}", e), None) };
    let steam_id = match resolve_steam_id(input.steam_id, &st.cfg) { Ok(s) => s, Err(m) => return rpc_error(id, -32602, &m, None) };
    let relationship = input.relationship.unwrap_or_else(|| "all".to_string());
    let out = match with_session(st, |s| async move {
        let req = ApiRequest::new("ISteamUser", "GetFriendList", "v0002")
            .param("steamid", &steam_id)
            .param("relationship", &relationship);
        s.get(&req).await.map_err(|e| ErrorShape::from(&e))
    }) {
        Ok(payload) => ListOutput::ok(list_at(&payload, "/response/friends")),
        Err(e) => ListOutput::fail(e),
    };
    list_result(id, out)
}

fn handle_get_owned_games(st: &ServerState, id: Option<Id>, params: Value) -> Response {
    let input: GetOwnedGamesInput = match serde_json::from_value(params) { Ok(v) => v, Err(e) => return rpc_error(id, -32602, &format!("Invalid params: {}", e), None) };
    let steam_id = match resolve_steam_id(input.steam_id, &st.cfg) { Ok(s) => s, Err(m) => return rpc_error(id, -32602, &m, None) };
    let include_app_info = input.include_app_info.unwrap_or(true);
    let include_free = input.include_played_free_games.unwrap_or(false);
    let out = match with_session(st, |s| async move {
        let req = ApiRequest::new("IPlayerService", "GetOwnedGames", "v0001")
            .param("steamid", &steam_id)
            .param("include_appinfo", include_app_info)
            .param("include_played_free_games", include_free)
            .param("format", "json");
        s.get(&req).await.map_err(|e| ErrorShape::from(&e))
    }) {
        Ok(payload) => ListOutput::ok(list_at(&payload, "/response/games")),
        Err(e) => ListOutput::fail(e),
    };
    list_result(id, out)
}

fn handle_get_recently_played_games(st: &ServerState, id: Option<Id>, params: Value) -> Response {
    let input: GetRecentlyPlayedGamesInput = match serde_json::from_value(params) { Ok(v) => v, Err(e) => return rpc_error(id, -32602, &format!("Invalid params: {}", e), None) };
    let steam_id = match resolve_steam_id(input.steam_id, &st.cfg) { Ok(s) => s, Err(m) => return rpc_error(id, -32602, &m, None) };
    let count = match enforce_count(input.count, 10, 50) { Ok(c) => c, Err(m) => return rpc_error(id, -32602, &m, None) };
    let out = match with_session(st, |s| async move {
        let req = ApiRequest::new("IPlayerService", "GetRecentlyPlayedGames", "v0001")
            .param("steamid", &steam_id)
            .param("count", count);
        s.get(&req).await.map_err(|e| ErrorShape::from(&e))
    }) {
        Ok(payload) => ListOutput::ok(list_at(&payload, "/response/games")),
        Err(e) => ListOutput::fail(e),
    };
    list_result(id, out)
}

fn handle_get_steam_level(st: &ServerState, id: Option<Id>, params: Value) -> Response {
    let input: GetSteamLevelInput = match serde_json::from_value(params) { Ok(v) => v, Err(e) => return rpc_error(id, -32602, &format!("Invalid params: {}", e), None) };
    let steam_id = match resolve_steam_id(input.steam_id, &st.cfg) { Ok(s) => s, Err(m) => return rpc_error(id, -32602, &m, None) };
    let out = match with_session(st, |s| async move {
        let req = ApiRequest::new("IPlayerService", "GetSteamLevel", "v0002")
            .param("steamid", &steam_id);
        s.get(&req).await.map_err(|e| ErrorShape::from(&e))
    }) {
        Ok(payload) => ItemOutput::ok(
            payload
                .pointer("/response")
                .cloned()
                .unwrap_or_else(|| serde_json::json!({})),
        ),
        Err(e) => ItemOutput::fail(e),
    };
    item_result(id, out)
}

fn handle_get_player_achievements(st: &ServerState, id: Option<Id>, params: Value) -> Response {
    let input: GetPlayerAchievementsInput = match serde_json::from_value(params) { Ok(v) => v, Err(e) => return rpc_error(id, -32602, &format!("Invalid params: {}", e), None) };
    let steam_id = match resolve_steam_id(input.steam_id, &st.cfg) { Ok(s) => s, Err(m) => return rpc_error(id, -32602, &m, None) };
    let language = input.language.unwrap_or_else(|| "english".to_string());
    let app_id = input.app_id;
    let out = match with_session(st, |s| async move {
        let req = ApiRequest::new("ISteamUserStats", "GetPlayerAchievements", "v0001")
            .param("steamid", &steam_id)
            .param("appid", app_id)
            .param("l", &language);
        s.get(&req).await.map_err(|e| ErrorShape::from(&e))
    }) {
        Ok(payload) => ListOutput::ok(list_at(&payload, "/response/achievements")),
        Err(e) => ListOutput::fail(e),
    };
    list_result(id, out)
}

fn handle_get_game_details(st: &ServerState, id: Option<Id>, params: Value) -> Response {
    let input: GetGameDetailsInput = match serde_json::from_value(params) { Ok(v) => v, Err(e) => return rpc_error(id, -32602, &format!("Invalid params: {}", e), None) };
    if input.app_ids.is_empty() {
        return list_result(id, ListOutput::ok(Vec::new()));
    }
    let language = input.language.unwrap_or_else(|| "english".to_string());
    let app_ids = input.app_ids.clone();
    let joined = app_ids
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let out = match with_session(st, |s| async move {
        let params = [("appids", joined), ("l", language)];
        s.get_store("/api/appdetails", &params)
            .await
            .map_err(|e| ErrorShape::from(&e))
    }) {
        Ok(payload) => {
            // Response is keyed by app id; keep only successful lookups.
            let mut games = Vec::new();
            for app_id in &app_ids {
                if let Some(entry) = payload.get(app_id.to_string()) {
                    if entry.get("success").and_then(Value::as_bool) == Some(true) {
                        if let Some(data) = entry.get("data") {
                            games.push(data.clone());
                        }
                    }
                }
            }
            ListOutput::ok(games)
        }
        Err(e) => ListOutput::fail(e),
    };
    list_result(id, out)
}

fn handle_get_game_news(st: &ServerState, id: Option<Id>, params: Value) -> Response {
    let input: GetGameNewsInput = match serde_json::from_value(params) { Ok(v) => v, Err(e) => return rpc_error(id, -32602, &format!("Invalid params: {}", e), None) };
    let count = match enforce_count(input.count, 5, 20) { Ok(c) => c, Err(m) => return rpc_error(id, -32602, &m, None) };
    let max_length = input.max_length.unwrap_or(300);
    let app_id = input.app_id;
    let out = match with_session(st, |s| async move {
        let req = ApiRequest::new("ISteamNews", "GetNewsForApp", "v0002")
            .param("appid", app_id)
            .param("count", count)
            .param("maxlength", max_length);
        s.get(&req).await.map_err(|e| ErrorShape::from(&e))
    }) {
        Ok(payload) => ListOutput::ok(list_at(&payload, "/appnews/newsitems")),
        Err(e) => ListOutput::fail(e),
    };
    list_result(id, out)
}

fn handle_get_global_achievement_percentages(
    st: &ServerState,
    id: Option<Id>,
    params: Value,
) -> Response {
    let input: GetGlobalAchievementPercentagesInput = match serde_json::from_value(params) { Ok(v) => v, Err(e) => return rpc_error(id, -32602, &format!("Invalid params: {}", e), None) };
    let app_id = input.app_id;
    let out = match with_session(st, |s| async move {
        let req = ApiRequest::new(
            "ISteamUserStats",
            "GetGlobalAchievementPercentagesForApp",
            "v0002",
        )
        .param("gameid", app_id)
        .param("l", "english");
        s.get(&req).await.map_err(|e| ErrorShape::from(&e))
    }) {
        Ok(payload) => ListOutput::ok(list_at(&payload, "/achievementpercentages/achievements")),
        Err(e) => ListOutput::fail(e),
    };
    list_result(id, out)
}

fn handle_search_games(st: &ServerState, id: Option<Id>, params: Value) -> Response {
    let input: SearchGamesInput = match serde_json::from_value(params) { Ok(v) => v, Err(e) => return rpc_error(id, -32602, &format!("Invalid params: {}", e), None) };
    let count = match enforce_count(input.count, 25, 50) { Ok(c) => c, Err(m) => return rpc_error(id, -32602, &m, None) };
    let query = input.query;
    let out = match with_session(st, |s| async move {
        let params = [
            ("term", query),
            ("l", "english".to_string()),
            ("cc", "US".to_string()),
        ];
        s.get_store("/api/storesearch/", &params)
            .await
            .map_err(|e| ErrorShape::from(&e))
    }) {
        Ok(payload) => {
            let mut items = list_at(&payload, "/items");
            items.truncate(count as usize);
            ListOutput::ok(items)
        }
        Err(e) => ListOutput::fail(e),
    };
    list_result(id, out)
}

fn handle_get_game_schema(st: &ServerState, id: Option<Id>, params: Value) -> Response {
    let input: GetGameSchemaInput = match serde_json::from_value(params) { Ok(v) => v, Err(e) => return rpc_error(id, -32602, &format!("Invalid params: {}", e), None) };
    let language = input.language.unwrap_or_else(|| "english".to_string());
    let app_id = input.app_id;
    let out = match with_session(st, |s| async move {
        let req = ApiRequest::new("ISteamUserStats", "GetSchemaForGame", "v0002")
            .param("appid", app_id)
            .param("l", &language);
        s.get(&req).await.map_err(|e| ErrorShape::from(&e))
    }) {
        Ok(payload) => ItemOutput::ok(
            payload
                .pointer("/response")
                .cloned()
                .unwrap_or_else(|| serde_json::json!({})),
        ),
        Err(e) => ItemOutput::fail(e),
    };
    item_result(id, out)
}

fn handle_get_workshop_items(st: &ServerState, id: Option<Id>, params: Value) -> Response {
    let input: GetWorkshopItemsInput = match serde_json::from_value(params) { Ok(v) => v, Err(e) => return rpc_error(id, -32602, &format!("Invalid params: {}", e), None) };
    let count = match enforce_count(input.count, 30, 100) { Ok(c) => c, Err(m) => return rpc_error(id, -32602, &m, None) };
    let query_type = input.query_type.unwrap_or(1);
    let page = input.page.unwrap_or(1).max(1);
    let app_id = input.app_id;
    let out = match with_session(st, |s| async move {
        let req = ApiRequest::new("IPublishedFileService", "QueryFiles", "v0001")
            .param("appid", app_id)
            .param("query_type", query_type)
            .param("page", page)
            .param("pagesize", count)
            .param("numperpage", count);
        s.get(&req).await.map_err(|e| ErrorShape::from(&e))
    }) {
        Ok(payload) => ListOutput::ok(list_at(&payload, "/response/publishedfiledetails")),
        Err(e) => ListOutput::fail(e),
    };
    list_result(id, out)
}

fn handle_get_workshop_item_details(st: &ServerState, id: Option<Id>, params: Value) -> Response {
    let input: GetWorkshopItemDetailsInput = match serde_json::from_value(params) { Ok(v) => v, Err(e) => return rpc_error(id, -32602, &format!("Invalid params: {}", e), None) };
    if input.published_file_ids.is_empty() {
        return list_result(id, ListOutput::ok(Vec::new()));
    }
    let joined = input
        .published_file_ids
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let out = match with_session(st, |s| async move {
        let req = ApiRequest::new("IPublishedFileService", "GetDetails", "v0001")
            .param("publishedfileids", &joined);
        s.get(&req).await.map_err(|e| ErrorShape::from(&e))
    }) {
        Ok(payload) => ListOutput::ok(list_at(&payload, "/response/publishedfiledetails")),
        Err(e) => ListOutput::fail(e),
    };
    list_result(id, out)
}

fn handle_get_user_reviews(st: &ServerState, id: Option<Id>, params: Value) -> Response {
    let input: GetUserReviewsInput = match serde_json::from_value(params) { Ok(v) => v, Err(e) => return rpc_error(id, -32602, &format!("Invalid params: {}", e), None) };
    let count = match enforce_count(input.count, 10, 100) { Ok(c) => c, Err(m) => return rpc_error(id, -32602, &m, None) };
    let review_type = input.review_type.unwrap_or_else(|| "all".to_string());
    let path = format!("/appreviews/{}", input.app_id);
    let out = match with_session(st, |s| async move {
        let params = [
            ("json", "1".to_string()),
            ("filter", review_type),
            ("num_per_page", count.to_string()),
        ];
        s.get_store(&path, &params)
            .await
            .map_err(|e| ErrorShape::from(&e))
    }) {
        Ok(payload) => ListOutput::ok(list_at(&payload, "/reviews")),
        Err(e) => ListOutput::fail(e),
    };
    list_result(id, out)
}

fn handle_get_player_bans(st: &ServerState, id: Option<Id>, params: Value) -> Response {
    let input: GetPlayerBansInput = match serde_json::from_value(params) { Ok(v) => v, Err(e) => return rpc_error(id, -32602, &format!("Invalid params: {}", e), None) };
    if input.steam_ids.is_empty() {
        return list_result(id, ListOutput::ok(Vec::new()));
    }
    let joined = input.steam_ids.join(",");
    let out = match with_session(st, |s| async move {
        let req = ApiRequest::new("ISteamUser", "GetPlayerBans", "v0001")
            .param("steamids", &joined);
        s.get(&req).await.map_err(|e| ErrorShape::from(&e))
    }) {
        Ok(payload) => ListOutput::ok(list_at(&payload, "/response/players")),
        Err(e) => ListOutput::fail(e),
    };
    list_result(id, out)
}

fn handle_resolve_vanity_url(st: &ServerState, id: Option<Id>, params: Value) -> Response {
    let input: ResolveVanityUrlInput = match serde_json::from_value(params) { Ok(v) => v, Err(e) => return rpc_error(id, -32602, &format!("Invalid params: {}", e), None) };
    let vanity = input.vanity_url.clone();
    let out = match with_session(st, |s| async move {
        let req = ApiRequest::new("ISteamUser", "ResolveVanityURL", "v0001")
            .param("vanityurl", &vanity);
        s.get(&req).await.map_err(|e| ErrorShape::from(&e))
    }) {
        Ok(payload) => {
            let success = payload
                .pointer("/response/success")
                .and_then(Value::as_i64)
                == Some(1);
            match payload.pointer("/response/steamid").and_then(Value::as_str) {
                Some(steamid) if success => ItemOutput::ok(serde_json::json!({
                    "steamid": steamid,
                    "success": true,
                })),
                _ => ItemOutput::fail(ErrorShape::not_found(format!(
                    "Could not resolve vanity URL: {}",
                    input.vanity_url
                ))),
            }
        }
        Err(e) => ItemOutput::fail(e),
    };
    item_result(id, out)
}
