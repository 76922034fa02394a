use serde::{Deserialize, Serialize};

/// A user record as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub created_at: Option<String>,
    pub last_login: Option<String>,
}

impl UserProfile {
    /// Full display name, falling back to the email address when the
    /// name fields were never filled in.
    pub fn display_name(&self) -> String {
        match (&self.firstname, &self.lastname) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone(),
        }
    }
}

/// Sign-up form input.
///
/// The confirmation field is validated by the client before any request is
/// made; only the canonical fields travel over the wire.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub firstname: String,
    pub lastname: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_row() {
        let json = r#"{
            "id": 7,
            "email": "ada@x.com",
            "firstname": "Ada",
            "lastname": "Lovelace",
            "role": "Normal",
            "created_at": "2025-01-15T08:00:00",
            "last_login": "2025-04-01T10:30:00"
        }"#;

        let user: UserProfile = serde_json::from_str(json).expect("user row parses");
        assert_eq!(user.display_name(), "Ada Lovelace");
        assert_eq!(user.role.as_deref(), Some("Normal"));
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let json = r#"{"id": 8, "email": "anon@x.com", "firstname": null, "lastname": null, "created_at": null, "last_login": null}"#;
        let user: UserProfile = serde_json::from_str(json).expect("user row parses");
        assert_eq!(user.display_name(), "anon@x.com");
    }
}
