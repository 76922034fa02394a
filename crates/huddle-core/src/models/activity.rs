use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One entry in the user's recent-activity feed.
///
/// The backend pre-renders the activity text ("Posted a message: ...",
/// "Joined Group: ...") and the feed arrives newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub activity: String,
    pub created_at: Option<String>,
}

impl Activity {
    /// Timestamp formatted for list views, "2025-04-01 10:30" style.
    /// The backend emits naive ISO 8601 timestamps; fall back to the first
    /// ten characters of the raw value if parsing fails.
    pub fn formatted_created_at(&self) -> String {
        match &self.created_at {
            Some(raw) => match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
                Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
                Err(_) => raw.chars().take(10).collect(),
            },
            None => "-".to_string(),
        }
    }
}
