//! Per-backend service facade
//!
//! One generic `MediaFacade` serves both backends; everything that differs
//! between Sonarr and Radarr lives in a static `ServiceProfile` table plus the
//! command payload shape. Each operation fetches raw JSON through the shared
//! client, applies filtering/sorting/truncation and renders a text summary.

use chrono::{DateTime, Duration, Local, Utc};
use serde_json::{json, Value};
use servarr_common::{ArrClient, Result, ServarrError};
use tracing::{error, warn};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Maximum number of matches rendered by a library search
const SEARCH_RESULT_CAP: usize = 10;

/// The two supported backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Sonarr,
    Radarr,
}

impl ServiceKind {
    /// Human-readable service name
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Sonarr => "Sonarr",
            Self::Radarr => "Radarr",
        }
    }

    fn profile(self) -> &'static ServiceProfile {
        match self {
            Self::Sonarr => &SONARR_PROFILE,
            Self::Radarr => &RADARR_PROFILE,
        }
    }

    /// Build a command payload in the shape the backend expects.
    ///
    /// Sonarr commands take a scalar `seriesId`, Radarr commands a
    /// `movieIds` array. The asymmetry is the remote API contract,
    /// preserved exactly.
    fn command_body(self, command: &str, id: i64) -> Value {
        match self {
            Self::Sonarr => json!({"name": command, "seriesId": id}),
            Self::Radarr => json!({"name": command, "movieIds": [id]}),
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Static per-backend differences
struct ServiceProfile {
    /// Endpoint listing the full entity collection
    collection_endpoint: &'static str,
    /// Lowercase entity noun used mid-sentence ("series"/"movies")
    noun: &'static str,
    /// Capitalized entity noun used at sentence start
    noun_title: &'static str,
    /// Default look-ahead window for the calendar operation
    calendar_default_days: i64,
    refresh_command: &'static str,
    search_command: &'static str,
}

static SONARR_PROFILE: ServiceProfile = ServiceProfile {
    collection_endpoint: "series",
    noun: "series",
    noun_title: "Series",
    calendar_default_days: 7,
    refresh_command: "RefreshSeries",
    search_command: "SeriesSearch",
};

static RADARR_PROFILE: ServiceProfile = ServiceProfile {
    collection_endpoint: "movie",
    noun: "movies",
    noun_title: "Movies",
    calendar_default_days: 30,
    refresh_command: "RefreshMovie",
    search_command: "MoviesSearch",
};

/// Facade translating named operations into REST calls and formatted text
#[derive(Debug, Clone)]
pub struct MediaFacade {
    kind: ServiceKind,
    client: ArrClient,
}

impl MediaFacade {
    pub fn new(kind: ServiceKind, client: ArrClient) -> Self {
        Self { kind, client }
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    async fn fetch(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value> {
        self.client.get(path, query).await.map_err(|e| {
            error!(operation, service = self.kind.display_name(), error = %e, "Operation failed");
            e
        })
    }

    async fn command(&self, operation: &'static str, body: &Value) -> Result<Value> {
        self.client.post("command", body).await.map_err(|e| {
            error!(operation, service = self.kind.display_name(), error = %e, "Operation failed");
            e
        })
    }

    /// Entities added within the last `days` days, most recent first.
    ///
    /// Entries whose `added` timestamp is missing or unparseable are skipped
    /// with a warning rather than failing the whole operation.
    pub async fn recent(&self, days: i64) -> Result<String> {
        let profile = self.kind.profile();
        let collection = self
            .fetch("recent", profile.collection_endpoint, &[])
            .await?;
        let items = collection.as_array().cloned().unwrap_or_default();

        let cutoff = Utc::now() - Duration::days(days);
        let entries = filter_recent(&items, cutoff);

        if entries.is_empty() {
            return Ok(format!(
                "No {} added in the last {} days.",
                profile.noun, days
            ));
        }

        Ok(render_recent(self.kind, days, &entries))
    }

    /// Upcoming calendar entries for the next `days` days (backend order).
    pub async fn calendar(&self, days: Option<i64>) -> Result<String> {
        let profile = self.kind.profile();
        let days = days.unwrap_or(profile.calendar_default_days);

        // Naive local timestamps, sent as-is; no timezone conversion
        let start = Local::now().naive_local();
        let end = start + Duration::days(days);
        let query = [
            ("start", start.format("%Y-%m-%dT%H:%M:%S").to_string()),
            ("end", end.format("%Y-%m-%dT%H:%M:%S").to_string()),
        ];

        let calendar = self.fetch("calendar", "calendar", &query).await?;
        let entries = calendar.as_array().cloned().unwrap_or_default();

        if entries.is_empty() {
            return Ok(match self.kind {
                ServiceKind::Sonarr => {
                    format!("No episodes airing in the next {} days.", days)
                }
                ServiceKind::Radarr => {
                    format!("No movies releasing in the next {} days.", days)
                }
            });
        }

        Ok(render_calendar(self.kind, days, &entries))
    }

    /// Case-insensitive substring search over the library, capped at 10 matches.
    ///
    /// An empty query is rejected before any network call.
    pub async fn search(&self, query: &str) -> Result<String> {
        if query.trim().is_empty() {
            return Err(ServarrError::validation_field(
                "query cannot be empty",
                "query",
            ));
        }

        let profile = self.kind.profile();
        let collection = self
            .fetch("search", profile.collection_endpoint, &[])
            .await?;
        let items = collection.as_array().cloned().unwrap_or_default();

        let matches = search_matches(&items, query);
        if matches.is_empty() {
            return Ok(format!("No {} found matching '{}'.", profile.noun, query));
        }

        Ok(render_search(self.kind, query, &matches))
    }

    /// System status plus disk space, fetched in two sequential calls.
    pub async fn status(&self) -> Result<String> {
        let status = self.fetch("status", "system/status", &[]).await?;
        let disk_space = self.fetch("status", "diskspace", &[]).await?;
        Ok(render_status(self.kind, &status, &disk_space))
    }

    /// Current download queue.
    pub async fn queue(&self) -> Result<String> {
        let queue = self.fetch("queue", "queue", &[]).await?;
        let records = queue
            .get("records")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        if records.is_empty() {
            return Ok("Download queue is empty.".to_string());
        }

        Ok(render_queue(self.kind, &records))
    }

    /// Trigger a metadata refresh for one entity. Fire-and-forget.
    pub async fn refresh(&self, id: i64) -> Result<String> {
        let profile = self.kind.profile();
        let body = self.kind.command_body(profile.refresh_command, id);
        self.command("refresh", &body).await?;

        Ok(match self.kind {
            ServiceKind::Sonarr => format!("Refresh triggered for series ID {}", id),
            ServiceKind::Radarr => format!("Refresh triggered for movie ID {}", id),
        })
    }

    /// Trigger a release search for one entity. Fire-and-forget.
    pub async fn trigger_search(&self, id: i64) -> Result<String> {
        let profile = self.kind.profile();
        let body = self.kind.command_body(profile.search_command, id);
        self.command("trigger_search", &body).await?;

        Ok(match self.kind {
            ServiceKind::Sonarr => format!("Episode search triggered for series ID {}", id),
            ServiceKind::Radarr => format!("Search triggered for movie ID {}", id),
        })
    }
}

// ============================================================================
// Filtering and rendering
// ============================================================================

fn str_field<'a>(value: &'a Value, key: &str, default: &'a str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or(default)
}

fn int_field(value: &Value, key: &str) -> i64 {
    value.get(key).and_then(Value::as_i64).unwrap_or(0)
}

fn float_field(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn year_label(value: &Value) -> String {
    value
        .get("year")
        .and_then(Value::as_i64)
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

fn season_episode_label(value: &Value) -> String {
    format!(
        "S{:02}E{:02}",
        int_field(value, "seasonNumber"),
        int_field(value, "episodeNumber")
    )
}

/// Keep entries added strictly after `cutoff`, sorted most recent first.
fn filter_recent(items: &[Value], cutoff: DateTime<Utc>) -> Vec<(DateTime<Utc>, &Value)> {
    let mut kept = Vec::new();
    for item in items {
        match item.get("added").and_then(Value::as_str) {
            Some(raw) => match DateTime::parse_from_rfc3339(raw) {
                Ok(added) => {
                    let added = added.with_timezone(&Utc);
                    if added > cutoff {
                        kept.push((added, item));
                    }
                }
                Err(e) => {
                    warn!(added = raw, error = %e, "Skipping entry with unparseable added timestamp");
                }
            },
            None => warn!("Skipping entry with missing added timestamp"),
        }
    }
    kept.sort_by(|a, b| b.0.cmp(&a.0));
    kept
}

fn render_recent(kind: ServiceKind, days: i64, entries: &[(DateTime<Utc>, &Value)]) -> String {
    let profile = kind.profile();
    let mut out = format!(
        "Recently added {} (last {} days):\n\n",
        profile.noun, days
    );
    for (_, item) in entries {
        out.push_str(&format!(
            "- {} ({})\n",
            str_field(item, "title", "Unknown"),
            year_label(item)
        ));
        out.push_str(&format!("  Added: {}\n", str_field(item, "added", "Unknown")));
        match kind {
            ServiceKind::Sonarr => {
                out.push_str(&format!(
                    "  Network: {}\n",
                    str_field(item, "network", "Unknown")
                ));
                out.push_str(&format!("  Seasons: {}\n\n", int_field(item, "seasonCount")));
            }
            ServiceKind::Radarr => {
                out.push_str(&format!(
                    "  Studio: {}\n\n",
                    str_field(item, "studio", "Unknown")
                ));
            }
        }
    }
    out
}

fn render_calendar(kind: ServiceKind, days: i64, entries: &[Value]) -> String {
    match kind {
        ServiceKind::Sonarr => {
            let mut out = format!("Upcoming episodes (next {} days):\n\n", days);
            for entry in entries {
                let series_title = entry
                    .get("series")
                    .map(|s| str_field(s, "title", "Unknown"))
                    .unwrap_or("Unknown");
                out.push_str(&format!(
                    "- {} - {}\n",
                    series_title,
                    season_episode_label(entry)
                ));
                out.push_str(&format!("  Title: {}\n", str_field(entry, "title", "TBA")));
                out.push_str(&format!(
                    "  Airs: {}\n\n",
                    str_field(entry, "airDateUtc", "Unknown")
                ));
            }
            out
        }
        ServiceKind::Radarr => {
            let mut out = format!("Upcoming movie releases (next {} days):\n\n", days);
            for entry in entries {
                out.push_str(&format!(
                    "- {} ({})\n",
                    str_field(entry, "title", "Unknown"),
                    year_label(entry)
                ));
                out.push_str(&format!(
                    "  Release: {}\n",
                    str_field(entry, "inCinemas", "TBA")
                ));
                out.push_str(&format!(
                    "  Status: {}\n\n",
                    str_field(entry, "status", "Unknown")
                ));
            }
            out
        }
    }
}

/// Matches in original collection order, capped at [`SEARCH_RESULT_CAP`].
fn search_matches<'a>(items: &'a [Value], query: &str) -> Vec<&'a Value> {
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| {
            item.get("title")
                .and_then(Value::as_str)
                .map(|title| title.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .take(SEARCH_RESULT_CAP)
        .collect()
}

fn render_search(kind: ServiceKind, query: &str, matches: &[&Value]) -> String {
    let profile = kind.profile();
    let mut out = format!("{} matching '{}':\n\n", profile.noun_title, query);
    for item in matches {
        out.push_str(&format!(
            "- {} ({})\n",
            str_field(item, "title", "Unknown"),
            year_label(item)
        ));
        out.push_str(&format!(
            "  Status: {}\n",
            str_field(item, "status", "Unknown")
        ));
        if kind == ServiceKind::Sonarr {
            out.push_str(&format!("  Seasons: {}\n", int_field(item, "seasonCount")));
        }
        out.push_str(&format!("  ID: {}\n\n", int_field(item, "id")));
    }
    out
}

fn render_status(kind: ServiceKind, status: &Value, disk_space: &Value) -> String {
    let mut out = format!("{} System Status:\n\n", kind.display_name());
    out.push_str(&format!(
        "Version: {}\n",
        str_field(status, "version", "Unknown")
    ));
    out.push_str(&format!("OS: {}\n", str_field(status, "osName", "Unknown")));
    out.push_str(&format!(
        "Runtime: {}\n\n",
        str_field(status, "runtimeName", "Unknown")
    ));

    out.push_str("Disk Space:\n");
    for disk in disk_space.as_array().map(Vec::as_slice).unwrap_or(&[]) {
        let free_gb = float_field(disk, "freeSpace") / GIB;
        let total_gb = float_field(disk, "totalSpace") / GIB;
        out.push_str(&format!(
            "- {}: {:.2} GB free of {:.2} GB\n",
            str_field(disk, "path", "Unknown"),
            free_gb,
            total_gb
        ));
    }
    out
}

fn render_queue(kind: ServiceKind, records: &[Value]) -> String {
    let mut out = String::from("Current Download Queue:\n\n");
    for item in records {
        match kind {
            ServiceKind::Sonarr => {
                let series_title = item
                    .get("series")
                    .map(|s| str_field(s, "title", "Unknown"))
                    .unwrap_or("Unknown");
                let episode_label = item
                    .get("episode")
                    .map(season_episode_label)
                    .unwrap_or_else(|| "S00E00".to_string());
                out.push_str(&format!("- {} - {}\n", series_title, episode_label));
            }
            ServiceKind::Radarr => {
                let movie = item.get("movie").cloned().unwrap_or_else(|| json!({}));
                out.push_str(&format!(
                    "- {} ({})\n",
                    str_field(&movie, "title", "Unknown"),
                    year_label(&movie)
                ));
            }
        }
        out.push_str(&format!(
            "  Status: {}\n",
            str_field(item, "status", "Unknown")
        ));
        out.push_str(&format!(
            "  Progress: {:.2} MB remaining\n\n",
            float_field(item, "sizeleft") / MIB
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_item(title: &str, added: &str) -> Value {
        json!({
            "title": title,
            "year": 2021,
            "added": added,
            "status": "continuing",
            "network": "HBO",
            "seasonCount": 3,
            "id": 1
        })
    }

    #[test]
    fn test_filter_recent_strict_boundary() {
        let cutoff = Utc::now() - Duration::days(7);
        let exactly_at = cutoff.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let items = vec![series_item("Boundary Show", &exactly_at)];

        // Strict inequality: an entry exactly at the boundary is excluded.
        // Format to whole seconds on both sides so the comparison is exact.
        let cutoff = DateTime::parse_from_rfc3339(&exactly_at)
            .unwrap()
            .with_timezone(&Utc);
        let kept = filter_recent(&items, cutoff);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_filter_recent_keeps_and_sorts_descending() {
        let now = Utc::now();
        let items = vec![
            series_item(
                "Older",
                &(now - Duration::days(5)).format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            ),
            series_item(
                "Newest",
                &(now - Duration::days(1)).format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            ),
            series_item(
                "Too Old",
                &(now - Duration::days(10)).format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            ),
        ];

        let kept = filter_recent(&items, now - Duration::days(7));
        let titles: Vec<&str> = kept
            .iter()
            .map(|(_, item)| item["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Newest", "Older"]);
    }

    #[test]
    fn test_filter_recent_skips_malformed_added() {
        let now = Utc::now();
        let items = vec![
            series_item("Bad Date", "not-a-date"),
            json!({"title": "No Date"}),
            series_item(
                "Good",
                &(now - Duration::days(1)).format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            ),
        ];

        let kept = filter_recent(&items, now - Duration::days(7));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].1["title"], "Good");
    }

    #[test]
    fn test_render_recent_missing_network_renders_unknown() {
        let added = Utc::now();
        let item = json!({
            "title": "Mystery Show",
            "year": 2020,
            "added": "2024-01-01T00:00:00Z",
            "seasonCount": 2
        });
        let entries = vec![(added, &item)];
        let out = render_recent(ServiceKind::Sonarr, 7, &entries);

        assert!(out.contains("- Mystery Show (2020)"));
        assert!(out.contains("Network: Unknown"));
        assert!(out.contains("Seasons: 2"));
    }

    #[test]
    fn test_render_recent_radarr_uses_studio() {
        let added = Utc::now();
        let item = json!({
            "title": "Some Film",
            "year": 2023,
            "added": "2024-01-01T00:00:00Z",
            "studio": "A24"
        });
        let entries = vec![(added, &item)];
        let out = render_recent(ServiceKind::Radarr, 7, &entries);

        assert!(out.starts_with("Recently added movies (last 7 days):"));
        assert!(out.contains("Studio: A24"));
        assert!(!out.contains("Seasons:"));
    }

    #[test]
    fn test_search_matches_case_insensitive_and_capped() {
        let mut items: Vec<Value> = (0..15)
            .map(|i| json!({"title": format!("Breaking Point {}", i), "id": i}))
            .collect();
        items.push(json!({"title": "Unrelated", "id": 99}));

        let matches = search_matches(&items, "bReAkInG");
        assert_eq!(matches.len(), 10);
        // Original collection order preserved
        assert_eq!(matches[0]["id"], 0);
        assert_eq!(matches[9]["id"], 9);
    }

    #[test]
    fn test_search_matches_ignores_untitled_entries() {
        let items = vec![json!({"id": 1}), json!({"title": "The Wire", "id": 2})];
        let matches = search_matches(&items, "wire");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["id"], 2);
    }

    #[test]
    fn test_render_search_sonarr_includes_seasons() {
        let item = json!({"title": "The Wire", "year": 2002, "status": "ended", "seasonCount": 5, "id": 12});
        let matches = vec![&item];
        let out = render_search(ServiceKind::Sonarr, "wire", &matches);

        assert!(out.starts_with("Series matching 'wire':"));
        assert!(out.contains("- The Wire (2002)"));
        assert!(out.contains("Status: ended"));
        assert!(out.contains("Seasons: 5"));
        assert!(out.contains("ID: 12"));
    }

    #[test]
    fn test_render_search_radarr_has_no_seasons_line() {
        let item = json!({"title": "Heat", "year": 1995, "status": "released", "id": 7});
        let matches = vec![&item];
        let out = render_search(ServiceKind::Radarr, "heat", &matches);

        assert!(out.starts_with("Movies matching 'heat':"));
        assert!(!out.contains("Seasons:"));
    }

    #[test]
    fn test_render_status_converts_bytes_to_gigabytes() {
        let status = json!({"version": "4.0.0", "osName": "ubuntu", "runtimeName": "netcore"});
        let disks = json!([
            {"path": "/data", "freeSpace": 107374182400u64, "totalSpace": 214748364800u64}
        ]);
        let out = render_status(ServiceKind::Sonarr, &status, &disks);

        assert!(out.starts_with("Sonarr System Status:"));
        assert!(out.contains("Version: 4.0.0"));
        assert!(out.contains("OS: ubuntu"));
        assert!(out.contains("Runtime: netcore"));
        assert!(out.contains("- /data: 100.00 GB free of 200.00 GB"));
    }

    #[test]
    fn test_render_status_defaults_missing_fields() {
        let out = render_status(ServiceKind::Radarr, &json!({}), &json!([]));
        assert!(out.contains("Version: Unknown"));
        assert!(out.contains("OS: Unknown"));
        assert!(out.contains("Runtime: Unknown"));
    }

    #[test]
    fn test_render_queue_sonarr_item() {
        let records = vec![json!({
            "series": {"title": "Dark"},
            "episode": {"seasonNumber": 2, "episodeNumber": 5},
            "status": "downloading",
            "sizeleft": 157286400u64
        })];
        let out = render_queue(ServiceKind::Sonarr, &records);

        assert!(out.starts_with("Current Download Queue:"));
        assert!(out.contains("- Dark - S02E05"));
        assert!(out.contains("Status: downloading"));
        assert!(out.contains("Progress: 150.00 MB remaining"));
    }

    #[test]
    fn test_render_queue_radarr_item() {
        let records = vec![json!({
            "movie": {"title": "Dune", "year": 2021},
            "status": "queued",
            "sizeleft": 0
        })];
        let out = render_queue(ServiceKind::Radarr, &records);

        assert!(out.contains("- Dune (2021)"));
        assert!(out.contains("Progress: 0.00 MB remaining"));
    }

    #[test]
    fn test_render_calendar_sonarr_zero_pads() {
        let entries = vec![json!({
            "series": {"title": "Severance"},
            "seasonNumber": 1,
            "episodeNumber": 9,
            "title": "The We We Are",
            "airDateUtc": "2024-04-08T01:00:00Z"
        })];
        let out = render_calendar(ServiceKind::Sonarr, 7, &entries);

        assert!(out.starts_with("Upcoming episodes (next 7 days):"));
        assert!(out.contains("- Severance - S01E09"));
        assert!(out.contains("Title: The We We Are"));
        assert!(out.contains("Airs: 2024-04-08T01:00:00Z"));
    }

    #[test]
    fn test_render_calendar_radarr_defaults() {
        let entries = vec![json!({"title": "Untitled Project", "status": "announced"})];
        let out = render_calendar(ServiceKind::Radarr, 30, &entries);

        assert!(out.starts_with("Upcoming movie releases (next 30 days):"));
        assert!(out.contains("- Untitled Project (N/A)"));
        assert!(out.contains("Release: TBA"));
        assert!(out.contains("Status: announced"));
    }

    #[test]
    fn test_command_body_shapes() {
        assert_eq!(
            ServiceKind::Sonarr.command_body("RefreshSeries", 42),
            json!({"name": "RefreshSeries", "seriesId": 42})
        );
        assert_eq!(
            ServiceKind::Radarr.command_body("MoviesSearch", 7),
            json!({"name": "MoviesSearch", "movieIds": [7]})
        );
    }

    #[test]
    fn test_calendar_default_days_per_backend() {
        assert_eq!(ServiceKind::Sonarr.profile().calendar_default_days, 7);
        assert_eq!(ServiceKind::Radarr.profile().calendar_default_days, 30);
    }
}
