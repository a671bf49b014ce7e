use crate::http::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    let ping = ToolDescriptor {
        name: "ping".into(),
        description: "Health check; echoes a message.".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "message": {"type": "string"}
            }
        }),
    };

    let get_user_profile = ToolDescriptor {
        name: "get_user_profile".into(),
        description: "Get a Steam user profile by 64-bit Steam ID".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "steam_id": {"type": "string", "description": "64-bit Steam ID (e.g., 76561198000000000); falls back to STEAM_USER_ID"}
            }
        }),
    };

    let get_friends_list = ToolDescriptor {
        name: "get_friends_list".into(),
        description: "Get a Steam user's friend list".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "steam_id": {"type": "string"},
                "relationship": {"type": "string", "enum": ["all", "friend"], "default": "all"}
            }
        }),
    };

    let get_owned_games = ToolDescriptor {
        name: "get_owned_games".into(),
        description: "Get all games owned by a Steam user".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "steam_id": {"type": "string"},
                "include_app_info": {"type": "boolean", "default": true},
                "include_played_free_games": {"type": "boolean", "default": false}
            }
        }),
    };

    let get_recently_played_games = ToolDescriptor {
        name: "get_recently_played_games".into(),
        description: "Get recently played games for a Steam user".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "steam_id": {"type": "string"},
                "count": {"type": "integer", "default": 10, "description": "Number of recent games to return (max 50)"}
            }
        }),
    };

    let get_steam_level = ToolDescriptor {
        name: "get_steam_level".into(),
        description: "Get the Steam level for a user".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "steam_id": {"type": "string"}
            }
        }),
    };

    let get_player_achievements = ToolDescriptor {
        name: "get_player_achievements".into(),
        description: "Get achievement progress for a specific game".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "steam_id": {"type": "string"},
                "app_id": {"type": "integer"},
                "language": {"type": "string", "default": "english"}
            },
            "required": ["app_id"]
        }),
    };

    let get_game_details = ToolDescriptor {
        name: "get_game_details".into(),
        description: "Get game details from the Steam store".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "app_ids": {"type": "array", "items": {"type": "integer"}},
                "language": {"type": "string", "default": "english"}
            },
            "required": ["app_ids"]
        }),
    };

    let get_game_news = ToolDescriptor {
        name: "get_game_news".into(),
        description: "Get news and updates for a specific game".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "app_id": {"type": "integer"},
                "count": {"type": "integer", "default": 5, "description": "Number of news items to return (max 20)"},
                "max_length": {"type": "integer", "default": 300, "description": "Maximum length of each news item in characters"}
            },
            "required": ["app_id"]
        }),
    };

    let get_global_achievement_percentages = ToolDescriptor {
        name: "get_global_achievement_percentages".into(),
        description: "Get global achievement unlock percentages for a game".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "app_id": {"type": "integer"}
            },
            "required": ["app_id"]
        }),
    };

    let search_games = ToolDescriptor {
        name: "search_games".into(),
        description: "Search for games on the Steam store".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "query": {"type": "string"},
                "count": {"type": "integer", "default": 25, "description": "Number of results to return (max 50)"}
            },
            "required": ["query"]
        }),
    };

    let get_game_schema = ToolDescriptor {
        name: "get_game_schema".into(),
        description: "Get achievement and stats schema for a game".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "app_id": {"type": "integer"},
                "language": {"type": "string", "default": "english"}
            },
            "required": ["app_id"]
        }),
    };

    let get_workshop_items = ToolDescriptor {
        name: "get_workshop_items".into(),
        description: "Get Steam Workshop items for a game".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "app_id": {"type": "integer"},
                "query_type": {"type": "integer", "default": 1, "description": "1=RankedByVote, 2=RankedByPublicationDate, ..."},
                "page": {"type": "integer", "default": 1},
                "count": {"type": "integer", "default": 30, "description": "Items per page (max 100)"}
            },
            "required": ["app_id"]
        }),
    };

    let get_workshop_item_details = ToolDescriptor {
        name: "get_workshop_item_details".into(),
        description: "Get detailed information about workshop items".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "published_file_ids": {"type": "array", "items": {"type": "integer"}}
            },
            "required": ["published_file_ids"]
        }),
    };

    let get_user_reviews = ToolDescriptor {
        name: "get_user_reviews".into(),
        description: "Get user reviews for a game".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "app_id": {"type": "integer"},
                "review_type": {"type": "string", "enum": ["all", "positive", "negative"], "default": "all"},
                "count": {"type": "integer", "default": 10, "description": "Number of reviews to return (max 100)"}
            },
            "required": ["app_id"]
        }),
    };

    let get_player_bans = ToolDescriptor {
        name: "get_player_bans".into(),
        description: "Get VAC and game ban status for players".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "steam_ids": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["steam_ids"]
        }),
    };

    let resolve_vanity_url = ToolDescriptor {
        name: "resolve_vanity_url".into(),
        description: "Resolve a Steam vanity URL to a 64-bit Steam ID".into(),
        input_schema: serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "vanity_url": {"type": "string", "description": "Custom profile name from steamcommunity.com/id/<name>"}
            },
            "required": ["vanity_url"]
        }),
    };

    vec![
        ping,
        get_user_profile,
        get_friends_list,
        get_owned_games,
        get_recently_played_games,
        get_steam_level,
        get_player_achievements,
        get_game_details,
        get_game_news,
        get_global_achievement_percentages,
        search_games,
        get_game_schema,
        get_workshop_items,
        get_workshop_item_details,
        get_user_reviews,
        get_player_bans,
        resolve_vanity_url,
    ]
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PingInput {
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PingOutput {
    pub message: String,
}

// Shared error shape used across tool outputs. `retriable` tells callers
// whether trying again later can help (rate limits, transport faults).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorShape {
    pub code: String,
    pub message: String,
    pub retriable: bool,
}

impl ErrorShape {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: "not_found".into(),
            message: message.into(),
            retriable: false,
        }
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self {
            code: "unknown_error".into(),
            message: message.into(),
            retriable: false,
        }
    }
}

impl From<&ApiError> for ErrorShape {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.code().into(),
            message: err.to_string(),
            retriable: err.retriable(),
        }
    }
}

// Steam payloads are dynamic JSON; tools return either one extracted
// sub-object or a list of them, so two shared output shapes cover the
// whole surface.
#[derive(Debug, Serialize)]
pub struct ItemOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorShape>,
}

impl ItemOutput {
    pub fn ok(item: Value) -> Self {
        Self {
            item: Some(item),
            error: None,
        }
    }

    pub fn fail(error: ErrorShape) -> Self {
        Self {
            item: None,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Serialize)]
pub struct ListOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorShape>,
}

impl ListOutput {
    pub fn ok(items: Vec<Value>) -> Self {
        Self {
            items: Some(items),
            error: None,
        }
    }

    pub fn fail(error: ErrorShape) -> Self {
        Self {
            items: None,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

// Tool inputs. Identity-scoped tools leave steam_id optional and fall back
// to the configured STEAM_USER_ID.
#[derive(Debug, Deserialize)]
pub struct GetUserProfileInput {
    pub steam_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetFriendsListInput {
    pub steam_id: Option<String>,
    pub relationship: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetOwnedGamesInput {
    pub steam_id: Option<String>,
    pub include_app_info: Option<bool>,
    pub include_played_free_games: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct GetRecentlyPlayedGamesInput {
    pub steam_id: Option<String>,
    pub count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GetSteamLevelInput {
    pub steam_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetPlayerAchievementsInput {
    pub steam_id: Option<String>,
    pub app_id: u64,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetGameDetailsInput {
    pub app_ids: Vec<u64>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetGameNewsInput {
    pub app_id: u64,
    pub count: Option<u32>,
    pub max_length: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GetGlobalAchievementPercentagesInput {
    pub app_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct SearchGamesInput {
    pub query: String,
    pub count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GetGameSchemaInput {
    pub app_id: u64,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetWorkshopItemsInput {
    pub app_id: u64,
    pub query_type: Option<u32>,
    pub page: Option<u32>,
    pub count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GetWorkshopItemDetailsInput {
    pub published_file_ids: Vec<u64>,
}

#[derive(Debug, Deserialize)]
pub struct GetUserReviewsInput {
    pub app_id: u64,
    pub review_type: Option<String>,
    pub count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GetPlayerBansInput {
    pub steam_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveVanityUrlInput {
    pub vanity_url: String,
}
