use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CONFIG_URI: &str = "steam://config";
pub const SUPPORTED_GAMES_URI: &str = "steam://supported-games";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResourceDescriptor {
    pub uri: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

pub fn resource_descriptors() -> Vec<ResourceDescriptor> {
    vec![
        ResourceDescriptor {
            uri: CONFIG_URI.into(),
            name: "Server configuration".into(),
            description: "Server capabilities, API base and rate limit".into(),
            mime_type: "application/json".into(),
        },
        ResourceDescriptor {
            uri: SUPPORTED_GAMES_URI.into(),
            name: "Supported games".into(),
            description: "Commonly queried game App IDs by name".into(),
            mime_type: "application/json".into(),
        },
    ]
}

/// Resolve a resource URI to its fixed JSON document. Both resources take
/// no request parameters.
pub fn read_resource(uri: &str) -> Option<Value> {
    match uri {
        CONFIG_URI => Some(config_descriptor()),
        SUPPORTED_GAMES_URI => Some(supported_games()),
        _ => None,
    }
}

fn config_descriptor() -> Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "api_base": "https://api.steampowered.com",
        "features": [
            "user_profiles",
            "game_info",
            "achievements",
            "workshop",
            "reviews"
        ],
        "rate_limit": {
            "requests_per_minute": 100
        },
        "documentation": "https://steamapi.xpaw.me/"
    })
}

fn supported_games() -> Value {
    serde_json::json!({
        "counter_strike_2": 730,
        "dota_2": 570,
        "team_fortress_2": 440,
        "portal_2": 620,
        "half_life_2": 220,
        "left_4_dead_2": 550,
        "skyrim": 72850,
        "gta_v": 271590
    })
}
