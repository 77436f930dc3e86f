use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored snippet record.
///
/// `content` carries plaintext in the domain; when sealing is enabled the
/// service swaps in the sealed form before the record crosses the storage
/// boundary, and `content_nonce` marks the row as sealed.
#[derive(Debug, Clone)]
pub struct Snippet {
    pub short_id: String,
    pub title: Option<String>,
    pub content: String,
    pub content_nonce: Option<String>,
    pub language: String,
    pub theme: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    /// `None` = unlimited views.
    pub view_limit: Option<i64>,
    pub view_count: i64,
    pub owner_code_hash: Option<String>,
    pub edit_code_hash: Option<String>,
    pub delete_code_hash: Option<String>,
    pub password_hash: Option<String>,
    pub user_id: Option<String>,
}

impl Snippet {
    /// Pure expiry predicate; every read path goes through this.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at < now)
    }

    pub fn is_password_protected(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Legacy/anonymous snippets carry no authorization codes at all.
    pub fn has_owner_codes(&self) -> bool {
        self.owner_code_hash.is_some()
    }
}

/// Listing row for display surfaces. Never carries content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetSummary {
    pub short_id: String,
    pub title: Option<String>,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub view_limit: Option<i64>,
    pub is_password_protected: bool,
}

impl From<&Snippet> for SnippetSummary {
    fn from(snippet: &Snippet) -> Self {
        Self {
            short_id: snippet.short_id.clone(),
            title: snippet.title.clone(),
            language: snippet.language.clone(),
            created_at: snippet.created_at,
            expires_at: snippet.expires_at,
            view_count: snippet.view_count,
            view_limit: snippet.view_limit,
            is_password_protected: snippet.is_password_protected(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn snippet(expires_at: Option<DateTime<Utc>>) -> Snippet {
        Snippet {
            short_id: "abcdefgh".into(),
            title: None,
            content: "x".into(),
            content_nonce: None,
            language: "rust".into(),
            theme: None,
            created_at: Utc::now(),
            expires_at,
            view_limit: None,
            view_count: 0,
            owner_code_hash: None,
            edit_code_hash: None,
            delete_code_hash: None,
            password_hash: None,
            user_id: None,
        }
    }

    #[test]
    fn test_is_expired() {
        let now = Utc::now();
        assert!(!snippet(None).is_expired(now));
        assert!(!snippet(Some(now + Duration::minutes(1))).is_expired(now));
        assert!(snippet(Some(now - Duration::seconds(1))).is_expired(now));
    }

    #[test]
    fn test_protection_flags() {
        let mut s = snippet(None);
        assert!(!s.is_password_protected());
        assert!(!s.has_owner_codes());

        s.password_hash = Some("$argon2id$...".into());
        s.owner_code_hash = Some("$argon2id$...".into());
        assert!(s.is_password_protected());
        assert!(s.has_owner_codes());
    }
}
