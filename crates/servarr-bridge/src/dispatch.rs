//! Operation dispatch
//!
//! Translates a tool name plus a loosely-typed argument bag into one typed
//! request variant, validating required arguments before anything touches the
//! network. Unknown names and missing arguments produce distinct error kinds
//! so callers can tell protocol misuse from domain failure.

use crate::context::AppContext;
use crate::facade::ServiceKind;
use serde_json::Value;
use servarr_common::{Result, ServarrError};

/// Default look-back window for the recent-additions operations
pub const RECENT_DEFAULT_DAYS: i64 = 7;

/// One fully-validated operation request
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    SonarrRecent { days: i64 },
    SonarrCalendar { days: Option<i64> },
    SonarrSearch { query: String },
    SonarrStatus,
    SonarrQueue,
    SonarrRefresh { series_id: i64 },
    SonarrEpisodeSearch { series_id: i64 },
    RadarrRecent { days: i64 },
    RadarrCalendar { days: Option<i64> },
    RadarrSearch { query: String },
    RadarrStatus,
    RadarrQueue,
    RadarrRefresh { movie_id: i64 },
    RadarrMovieSearch { movie_id: i64 },
}

impl ToolRequest {
    /// Parse a named operation and its argument bag into a typed request.
    pub fn parse(name: &str, arguments: &Value) -> Result<Self> {
        match name {
            "sonarr_get_recent_series" => Ok(Self::SonarrRecent {
                days: optional_days(arguments)?.unwrap_or(RECENT_DEFAULT_DAYS),
            }),
            "sonarr_get_calendar" => Ok(Self::SonarrCalendar {
                days: optional_days(arguments)?,
            }),
            "sonarr_search_series" => Ok(Self::SonarrSearch {
                query: required_query(arguments)?,
            }),
            "sonarr_get_system_status" => Ok(Self::SonarrStatus),
            "sonarr_get_queue" => Ok(Self::SonarrQueue),
            "sonarr_refresh_series" => Ok(Self::SonarrRefresh {
                series_id: required_id(arguments, "series_id")?,
            }),
            "sonarr_search_episodes" => Ok(Self::SonarrEpisodeSearch {
                series_id: required_id(arguments, "series_id")?,
            }),
            "radarr_get_recent_movies" => Ok(Self::RadarrRecent {
                days: optional_days(arguments)?.unwrap_or(RECENT_DEFAULT_DAYS),
            }),
            "radarr_get_calendar" => Ok(Self::RadarrCalendar {
                days: optional_days(arguments)?,
            }),
            "radarr_search_movies" => Ok(Self::RadarrSearch {
                query: required_query(arguments)?,
            }),
            "radarr_get_system_status" => Ok(Self::RadarrStatus),
            "radarr_get_queue" => Ok(Self::RadarrQueue),
            "radarr_refresh_movie" => Ok(Self::RadarrRefresh {
                movie_id: required_id(arguments, "movie_id")?,
            }),
            "radarr_search_movie" => Ok(Self::RadarrMovieSearch {
                movie_id: required_id(arguments, "movie_id")?,
            }),
            other => Err(ServarrError::unknown_operation(other)),
        }
    }

    /// Which backend this request targets
    pub fn service(&self) -> ServiceKind {
        match self {
            Self::SonarrRecent { .. }
            | Self::SonarrCalendar { .. }
            | Self::SonarrSearch { .. }
            | Self::SonarrStatus
            | Self::SonarrQueue
            | Self::SonarrRefresh { .. }
            | Self::SonarrEpisodeSearch { .. } => ServiceKind::Sonarr,
            Self::RadarrRecent { .. }
            | Self::RadarrCalendar { .. }
            | Self::RadarrSearch { .. }
            | Self::RadarrStatus
            | Self::RadarrQueue
            | Self::RadarrRefresh { .. }
            | Self::RadarrMovieSearch { .. } => ServiceKind::Radarr,
        }
    }

    /// Run the request against the context's facade for its backend.
    ///
    /// Fails with a configuration error before any network call when the
    /// backend is not configured.
    pub async fn execute(&self, ctx: &AppContext) -> Result<String> {
        let facade = ctx.facade(self.service())?;
        match self {
            Self::SonarrRecent { days } | Self::RadarrRecent { days } => {
                facade.recent(*days).await
            }
            Self::SonarrCalendar { days } | Self::RadarrCalendar { days } => {
                facade.calendar(*days).await
            }
            Self::SonarrSearch { query } | Self::RadarrSearch { query } => {
                facade.search(query).await
            }
            Self::SonarrStatus | Self::RadarrStatus => facade.status().await,
            Self::SonarrQueue | Self::RadarrQueue => facade.queue().await,
            Self::SonarrRefresh { series_id } => facade.refresh(*series_id).await,
            Self::SonarrEpisodeSearch { series_id } => facade.trigger_search(*series_id).await,
            Self::RadarrRefresh { movie_id } => facade.refresh(*movie_id).await,
            Self::RadarrMovieSearch { movie_id } => facade.trigger_search(*movie_id).await,
        }
    }
}

/// Accept whole-number floats (JSON-RPC clients commonly send numbers as
/// floats) but reject anything with a fractional part.
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0)
        .map(|f| f as i64)
}

fn optional_days(arguments: &Value) -> Result<Option<i64>> {
    match arguments.get("days") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => as_integer(value).map(Some).ok_or_else(|| {
            ServarrError::validation_field("days must be an integer", "days")
        }),
    }
}

fn required_query(arguments: &Value) -> Result<String> {
    let query = arguments
        .get("query")
        .and_then(Value::as_str)
        .ok_or_else(|| ServarrError::validation_field("query is required", "query"))?;
    if query.trim().is_empty() {
        return Err(ServarrError::validation_field(
            "query cannot be empty",
            "query",
        ));
    }
    Ok(query.to_string())
}

fn required_id(arguments: &Value, field: &str) -> Result<i64> {
    arguments
        .get(field)
        .and_then(as_integer)
        .ok_or_else(|| ServarrError::validation_field(format!("{} is required", field), field))
}
