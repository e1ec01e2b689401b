/// User domain types
use crate::error::{Result, RosterError};
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted user row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    /// Server-assigned, strictly increasing identifier
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Unique email address
    pub email: String,

    /// Insertion timestamp, never modified
    pub created_at: DateTime<Utc>,
}

/// The `{id, name, email}` shape returned by create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl UserSummary {
    pub fn new(id: UserId, user: NewUser) -> Self {
        Self {
            id,
            name: user.name,
            email: user.email,
        }
    }
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Unvalidated create/update payload as it arrives from a client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserDraft {
    /// Check that both fields are present and non-blank
    pub fn validate(self) -> Result<NewUser> {
        match (non_blank(self.name), non_blank(self.email)) {
            (Some(name), Some(email)) => Ok(NewUser { name, email }),
            _ => Err(RosterError::InvalidInput(
                "Name and email are required".to_string(),
            )),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A validated name/email pair, safe to hand to a [`UserStore`](crate::UserStore)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: String,
    email: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self> {
        UserDraft {
            name: Some(name.into()),
            email: Some(email.into()),
        }
        .validate()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: Option<&str>, email: Option<&str>) -> UserDraft {
        UserDraft {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
        }
    }

    #[test]
    fn accepts_complete_draft() {
        let user = draft(Some("Ada"), Some("ada@example.com")).validate().unwrap();
        assert_eq!(user.name(), "Ada");
        assert_eq!(user.email(), "ada@example.com");
    }

    #[test]
    fn rejects_missing_email() {
        let err = draft(Some("X"), None).validate().unwrap_err();
        assert!(matches!(err, RosterError::InvalidInput(_)));
    }

    #[test]
    fn rejects_missing_name() {
        assert!(draft(None, Some("x@example.com")).validate().is_err());
    }

    #[test]
    fn rejects_blank_fields() {
        assert!(draft(Some(""), Some("x@example.com")).validate().is_err());
        assert!(draft(Some("X"), Some("   ")).validate().is_err());
    }

    #[test]
    fn draft_tolerates_absent_keys() {
        let draft: UserDraft = serde_json::from_str(r#"{"name":"X"}"#).unwrap();
        assert_eq!(draft.name.as_deref(), Some("X"));
        assert!(draft.email.is_none());
    }

    #[test]
    fn summary_keeps_validated_values() {
        let user = NewUser::new("A", "a@x.com").unwrap();
        let summary = UserSummary::new(UserId::new(3), user);
        assert_eq!(summary.id, UserId::new(3));
        assert_eq!(summary.name, "A");
        assert_eq!(summary.email, "a@x.com");
    }
}
