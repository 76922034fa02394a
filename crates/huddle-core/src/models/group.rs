use serde::{Deserialize, Serialize};

/// A collaboration group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: Option<String>,
}

impl Group {
    /// Description for list views, with a placeholder when none was set.
    pub fn display_description(&self) -> &str {
        self.description.as_deref().unwrap_or("No description")
    }
}

/// Editable fields for creating or updating a group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupFields {
    pub name: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group_row() {
        let json = r#"{
            "id": 12,
            "name": "Rust study circle",
            "description": "Weekly sessions",
            "created_by": 7,
            "created_at": "2025-03-01T18:00:00"
        }"#;

        let group: Group = serde_json::from_str(json).expect("group row parses");
        assert_eq!(group.id, 12);
        assert_eq!(group.name, "Rust study circle");
        assert_eq!(group.display_description(), "Weekly sessions");
        assert_eq!(group.created_by, Some(7));
    }

    #[test]
    fn test_missing_description_gets_placeholder() {
        let json = r#"{"id": 1, "name": "Lonely", "description": null, "created_by": null, "created_at": null}"#;
        let group: Group = serde_json::from_str(json).expect("group row parses");
        assert_eq!(group.display_description(), "No description");
    }
}
