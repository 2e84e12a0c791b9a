//! Tool definitions for the structured tool-invocation transport
//!
//! Only tools for configured backends are advertised; an unconfigured
//! backend contributes nothing to the listing.

use crate::context::AppContext;
use crate::facade::ServiceKind;
use crate::mcp::Tool;
use serde_json::json;

/// All tools available given the current configuration.
pub fn tool_definitions(ctx: &AppContext) -> Vec<Tool> {
    let mut tools = Vec::new();

    if ctx.is_configured(ServiceKind::Sonarr) {
        tools.extend(sonarr_tools());
    }
    if ctx.is_configured(ServiceKind::Radarr) {
        tools.extend(radarr_tools());
    }

    tools
}

fn sonarr_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "sonarr_get_recent_series".to_string(),
            description: "Get recently added TV series from Sonarr. Returns series added \
                in the last N days (default 7)."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "days": {
                        "type": "number",
                        "description": "Number of days to look back (default: 7)",
                        "default": 7
                    }
                }
            }),
        },
        Tool {
            name: "sonarr_get_calendar".to_string(),
            description: "Get upcoming episodes from Sonarr calendar. Shows episodes airing \
                in the next N days."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "days": {
                        "type": "number",
                        "description": "Number of days to look ahead (default: 7)",
                        "default": 7
                    }
                }
            }),
        },
        Tool {
            name: "sonarr_search_series".to_string(),
            description: "Search for a TV series in Sonarr's library by title.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query (series title)"
                    }
                },
                "required": ["query"]
            }),
        },
        Tool {
            name: "sonarr_get_system_status".to_string(),
            description: "Get Sonarr system status including version, disk space, and health."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
        Tool {
            name: "sonarr_get_queue".to_string(),
            description: "Get current download queue in Sonarr.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
        Tool {
            name: "sonarr_refresh_series".to_string(),
            description: "Trigger a refresh of a specific series to update metadata and \
                check for new episodes."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "series_id": {
                        "type": "number",
                        "description": "ID of the series to refresh"
                    }
                },
                "required": ["series_id"]
            }),
        },
        Tool {
            name: "sonarr_search_episodes".to_string(),
            description: "Trigger a search for missing episodes of a specific series."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "series_id": {
                        "type": "number",
                        "description": "ID of the series to search episodes for"
                    }
                },
                "required": ["series_id"]
            }),
        },
    ]
}

fn radarr_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "radarr_get_recent_movies".to_string(),
            description: "Get recently added movies from Radarr. Returns movies added in \
                the last N days (default 7)."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "days": {
                        "type": "number",
                        "description": "Number of days to look back (default: 7)",
                        "default": 7
                    }
                }
            }),
        },
        Tool {
            name: "radarr_get_calendar".to_string(),
            description: "Get upcoming movie releases from Radarr calendar.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "days": {
                        "type": "number",
                        "description": "Number of days to look ahead (default: 30)",
                        "default": 30
                    }
                }
            }),
        },
        Tool {
            name: "radarr_search_movies".to_string(),
            description: "Search for a movie in Radarr's library by title.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query (movie title)"
                    }
                },
                "required": ["query"]
            }),
        },
        Tool {
            name: "radarr_get_system_status".to_string(),
            description: "Get Radarr system status including version, disk space, and health."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
        Tool {
            name: "radarr_get_queue".to_string(),
            description: "Get current download queue in Radarr.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
        Tool {
            name: "radarr_refresh_movie".to_string(),
            description: "Trigger a refresh of a specific movie to update metadata."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "movie_id": {
                        "type": "number",
                        "description": "ID of the movie to refresh"
                    }
                },
                "required": ["movie_id"]
            }),
        },
        Tool {
            name: "radarr_search_movie".to_string(),
            description: "Trigger a search for a specific movie.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "movie_id": {
                        "type": "number",
                        "description": "ID of the movie to search for"
                    }
                },
                "required": ["movie_id"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::ToolRequest;
    use serde_json::json;
    use servarr_config::{Config, ServiceConfig};

    fn configured(sonarr: bool, radarr: bool) -> AppContext {
        let service = ServiceConfig {
            url: "http://localhost:1234".to_string(),
            api_key: "key".to_string(),
        };
        let config = Config {
            sonarr: if sonarr {
                service.clone()
            } else {
                ServiceConfig::default()
            },
            radarr: if radarr {
                service
            } else {
                ServiceConfig::default()
            },
            ..Config::default()
        };
        AppContext::from_config(config).unwrap()
    }

    #[test]
    fn test_no_backends_no_tools() {
        let ctx = configured(false, false);
        assert!(tool_definitions(&ctx).is_empty());
    }

    #[test]
    fn test_only_configured_backend_listed() {
        let ctx = configured(true, false);
        let tools = tool_definitions(&ctx);
        assert_eq!(tools.len(), 7);
        assert!(tools.iter().all(|t| t.name.starts_with("sonarr_")));
    }

    #[test]
    fn test_both_backends_listed() {
        let ctx = configured(true, true);
        let tools = tool_definitions(&ctx);
        assert_eq!(tools.len(), 14);
        assert!(tools.iter().any(|t| t.name == "radarr_search_movie"));
    }

    #[test]
    fn test_every_advertised_tool_parses() {
        // Every listed tool name must be accepted by the dispatcher
        let ctx = configured(true, true);
        for tool in tool_definitions(&ctx) {
            let args = json!({"days": 7, "query": "x", "series_id": 1, "movie_id": 1});
            assert!(
                ToolRequest::parse(&tool.name, &args).is_ok(),
                "tool {} did not parse",
                tool.name
            );
        }
    }

    #[test]
    fn test_required_arguments_declared_in_schema() {
        let ctx = configured(true, true);
        let tools = tool_definitions(&ctx);
        let search = tools
            .iter()
            .find(|t| t.name == "sonarr_search_series")
            .unwrap();
        assert_eq!(search.input_schema["required"][0], "query");

        let refresh = tools
            .iter()
            .find(|t| t.name == "radarr_refresh_movie")
            .unwrap();
        assert_eq!(refresh.input_schema["required"][0], "movie_id");
    }
}
