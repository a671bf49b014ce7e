use assert_cmd::prelude::*;
use httpmock::{Method::GET, MockServer};
use assert_cmd::Command;

fn run_with_env(req: &serde_json::Value, envs: &[(&str, &str)]) -> anyhow::Result<String> {
    let mut cmd = Command::cargo_bin("steam-mcp")?;
    cmd.env_remove("STEAM_API_KEY");
    cmd.env_remove("STEAM_USER_ID");
    for (k, v) in envs {
        cmd.env(k, v);
    }
    let input = serde_json::to_string(req)?;
    let assert = cmd.arg("--log-level").arg("warn").write_stdin(input).assert();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    Ok(output)
}

fn tool_call(name: &str, arguments: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "method": "tools/call",
        "id": 1,
        "params": {"name": name, "arguments": arguments}
    })
}

#[test]
fn get_game_details_keeps_only_successful_lookups() -> anyhow::Result<()> {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET)
            .path("/api/appdetails")
            .query_param("appids", "730,999999")
            .query_param("l", "english");
        then.status(200).json_body(serde_json::json!({
            "730": {"success": true, "data": {"name": "Counter-Strike 2", "steam_appid": 730}},
            "999999": {"success": false}
        }));
    });
    let req = tool_call(
        "get_game_details",
        serde_json::json!({"app_ids": [730, 999999]}),
    );
    let out = run_with_env(
        &req,
        &[
            ("STEAM_API_KEY", "t"),
            ("STEAM_STORE_BASE_URL", server.base_url().as_str()),
        ],
    )?;
    m.assert();
    assert!(out.contains("Counter-Strike 2"));
    assert!(!out.contains("999999"));
    Ok(())
}

#[test]
fn get_game_details_with_empty_list_is_empty_success() -> anyhow::Result<()> {
    // No mock server: an empty id list must not issue any request.
    let req = tool_call("get_game_details", serde_json::json!({"app_ids": []}));
    let out = run_with_env(&req, &[("STEAM_API_KEY", "t")])?;
    assert!(out.contains("\"items\":[]"));
    assert!(!out.contains("isError"));
    Ok(())
}

#[test]
fn search_games_truncates_to_count() -> anyhow::Result<()> {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(GET)
            .path("/api/storesearch/")
            .query_param("term", "portal")
            .query_param("cc", "US");
        then.status(200).json_body(serde_json::json!({
            "total": 3,
            "items": [
                {"id": 400, "name": "Portal"},
                {"id": 620, "name": "Portal 2"},
                {"id": 1255980, "name": "Portal Reloaded"}
            ]
        }));
    });
    let req = tool_call(
        "search_games",
        serde_json::json!({"query": "portal", "count": 2}),
    );
    let out = run_with_env(
        &req,
        &[
            ("STEAM_API_KEY", "t"),
            ("STEAM_STORE_BASE_URL", server.base_url().as_str()),
        ],
    )?;
    assert!(out.contains("\"Portal 2\""));
    assert!(!out.contains("Portal Reloaded"));
    Ok(())
}

#[test]
fn get_game_news_extracts_newsitems() -> anyhow::Result<()> {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET)
            .path("/ISteamNews/GetNewsForApp/v0002/")
            .query_param("appid", "570")
            .query_param("count", "5")
            .query_param("maxlength", "300");
        then.status(200).json_body(serde_json::json!({
            "appnews": {"appid": 570, "newsitems": [
                {"gid": "1", "title": "Patch 7.40", "url": "https://example.test/1"}
            ]}
        }));
    });
    let req = tool_call("get_game_news", serde_json::json!({"app_id": 570}));
    let out = run_with_env(
        &req,
        &[
            ("STEAM_API_KEY", "t"),
            ("STEAM_API_BASE_URL", server.base_url().as_str()),
        ],
    )?;
    m.assert();
    assert!(out.contains("Patch 7.40"));
    Ok(())
}

#[test]
fn embedded_error_marker_is_upstream_error_despite_http_200() -> anyhow::Result<()> {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(GET).path("/ISteamNews/GetNewsForApp/v0002/");
        then.status(200)
            .json_body(serde_json::json!({"error": "Requested app has no news"}));
    });
    let req = tool_call("get_game_news", serde_json::json!({"app_id": 1}));
    let out = run_with_env(
        &req,
        &[
            ("STEAM_API_KEY", "t"),
            ("STEAM_API_BASE_URL", server.base_url().as_str()),
        ],
    )?;
    assert!(out.contains("\"upstream_error\""));
    assert!(out.contains("Requested app has no news"));
    assert!(out.contains("\"isError\":true"));
    Ok(())
}

#[test]
fn malformed_body_is_unknown_error() -> anyhow::Result<()> {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(GET)
            .path("/ISteamUserStats/GetSchemaForGame/v0002/");
        then.status(200).body("<html>maintenance</html>");
    });
    let req = tool_call("get_game_schema", serde_json::json!({"app_id": 730}));
    let out = run_with_env(
        &req,
        &[
            ("STEAM_API_KEY", "t"),
            ("STEAM_API_BASE_URL", server.base_url().as_str()),
        ],
    )?;
    assert!(out.contains("\"unknown_error\""));
    Ok(())
}

#[test]
fn global_achievement_percentages_uses_gameid_param() -> anyhow::Result<()> {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET)
            .path("/ISteamUserStats/GetGlobalAchievementPercentagesForApp/v0002/")
            .query_param("gameid", "730");
        then.status(200).json_body(serde_json::json!({
            "achievementpercentages": {"achievements": [
                {"name": "WIN_MAP", "percent": 61.5}
            ]}
        }));
    });
    let req = tool_call(
        "get_global_achievement_percentages",
        serde_json::json!({"app_id": 730}),
    );
    let out = run_with_env(
        &req,
        &[
            ("STEAM_API_KEY", "t"),
            ("STEAM_API_BASE_URL", server.base_url().as_str()),
        ],
    )?;
    m.assert();
    assert!(out.contains("61.5"));
    Ok(())
}

#[test]
fn get_user_reviews_hits_store_review_path() -> anyhow::Result<()> {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET)
            .path("/appreviews/730")
            .query_param("json", "1")
            .query_param("filter", "positive")
            .query_param("num_per_page", "2");
        then.status(200).json_body(serde_json::json!({
            "success": 1,
            "reviews": [
                {"recommendationid": "1", "review": "great", "voted_up": true},
                {"recommendationid": "2", "review": "good", "voted_up": true}
            ]
        }));
    });
    let req = tool_call(
        "get_user_reviews",
        serde_json::json!({"app_id": 730, "review_type": "positive", "count": 2}),
    );
    let out = run_with_env(
        &req,
        &[
            ("STEAM_API_KEY", "t"),
            ("STEAM_STORE_BASE_URL", server.base_url().as_str()),
        ],
    )?;
    m.assert();
    assert!(out.contains("\"recommendationid\":\"1\""));
    Ok(())
}
