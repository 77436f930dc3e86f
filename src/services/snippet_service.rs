//! Snippet lifecycle service
//!
//! Creation, retrieval with side effects (view counting, lazy expiry),
//! update, deletion and owner-code verification. All authorization and
//! lifecycle decisions read the store directly; the listing cache is only
//! invalidated here, never consulted.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::cache::ListCache;
use crate::errors::{Result, SnipbinError};
use crate::storage::{Snippet, SnippetStore, SnippetSummary};
use crate::utils::codes::{self, AuthCodes};
use crate::utils::expiry::{ExpirationOption, ViewLimitOption};
use crate::utils::password::{process_new_password, process_update_password, verify_credential};
use crate::utils::sealing::ContentSealer;

/// Cache keys written by the listing surface; every mutation invalidates them.
const LIST_CACHE_PREFIX: &str = "snippets:";

// ============ Request/Response DTOs ============

/// Request to create a new snippet
#[derive(Debug, Clone)]
pub struct CreateSnippetRequest {
    pub title: Option<String>,
    pub content: String,
    pub language: String,
    /// "5m" | "1h" | "1d" | "1w" | "never"
    pub expiration: String,
    /// Positive number or "unlimited"
    pub view_limit: String,
    /// Optional view password (plaintext, hashed before storing)
    pub password: Option<String>,
    pub theme: Option<String>,
    /// Opaque authenticated account id, if any
    pub user_id: Option<String>,
}

/// Result of snippet creation. The plaintext codes exist only here,
/// exactly once; the store keeps hashes.
#[derive(Debug, Clone)]
pub struct CreateSnippetResult {
    pub short_id: String,
    pub owner_code: String,
    pub edit_code: String,
    pub delete_code: String,
}

/// Partial update. `None` keeps the stored value; for title, theme and
/// password an empty string clears the field.
#[derive(Debug, Clone, Default)]
pub struct UpdateSnippetRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub language: Option<String>,
    pub theme: Option<String>,
    pub expiration: Option<String>,
    pub view_limit: Option<String>,
    pub password: Option<String>,
}

// ============ SnippetService Implementation ============

/// Service for snippet lifecycle operations
pub struct SnippetService {
    store: Arc<dyn SnippetStore>,
    cache: Arc<dyn ListCache>,
    sealer: Option<Arc<ContentSealer>>,
    short_id_length: usize,
    list_cache_ttl: u64,
}

impl SnippetService {
    pub fn new(
        store: Arc<dyn SnippetStore>,
        cache: Arc<dyn ListCache>,
        sealer: Option<Arc<ContentSealer>>,
        short_id_length: usize,
        list_cache_ttl: u64,
    ) -> Self {
        Self {
            store,
            cache,
            sealer,
            short_id_length,
            list_cache_ttl,
        }
    }

    fn hash_credential(secret: &str) -> Result<String> {
        crate::utils::password::hash_credential(secret)
            .map_err(|e| SnipbinError::password_hash(e.to_string()))
    }

    /// Uniform "not found" so absent, expired and exhausted snippets are
    /// indistinguishable to callers.
    fn not_found(short_id: &str) -> SnipbinError {
        SnipbinError::not_found(format!("Snippet not found: {}", short_id))
    }

    async fn invalidate_listings(&self) {
        self.cache.invalidate_prefix(LIST_CACHE_PREFIX).await;
    }

    /// Best-effort removal on the lazy-expiry path. A failed cleanup must
    /// not turn "not found" into a crash or a misleading success.
    async fn remove_best_effort(&self, short_id: &str, reason: &str) {
        match self.store.remove(short_id).await {
            Ok(()) => {
                info!("Snippet '{}' removed ({})", short_id, reason);
                self.invalidate_listings().await;
            }
            Err(e) => {
                warn!("Best-effort removal of '{}' failed ({}): {}", short_id, reason, e);
            }
        }
    }

    /// Swap sealed content back to plaintext before the record leaves the service.
    fn open_content(&self, mut snippet: Snippet) -> Result<Snippet> {
        if let Some(nonce) = snippet.content_nonce.take() {
            let sealer = self.sealer.as_ref().ok_or_else(|| {
                SnipbinError::sealing("Snippet is sealed but no sealing key is configured")
            })?;
            snippet.content = sealer.open(&snippet.content, &nonce)?;
        }
        Ok(snippet)
    }

    // ============ Lifecycle Operations ============

    /// Create a new snippet. Returns the short id and the plaintext
    /// authorization codes, available only in this response.
    pub async fn create(&self, req: CreateSnippetRequest) -> Result<CreateSnippetResult> {
        if req.content.is_empty() {
            return Err(SnipbinError::validation("Content must not be empty"));
        }
        if req.language.is_empty() {
            return Err(SnipbinError::validation("Language must not be empty"));
        }

        let expiration =
            ExpirationOption::parse(&req.expiration).map_err(SnipbinError::validation)?;
        let view_limit =
            ViewLimitOption::parse(&req.view_limit).map_err(SnipbinError::validation)?;

        let now = Utc::now();
        let short_id = codes::generate_short_id(self.short_id_length);
        let auth_codes = AuthCodes::generate();

        let password_hash = process_new_password(req.password.as_deref())
            .map_err(|e| SnipbinError::password_hash(e.to_string()))?;

        let (content, content_nonce) = match &self.sealer {
            Some(sealer) => {
                let sealed = sealer.seal(&req.content)?;
                (sealed.ciphertext_b64, Some(sealed.nonce_b64))
            }
            None => (req.content.clone(), None),
        };

        let snippet = Snippet {
            short_id: short_id.clone(),
            title: req.title.filter(|t| !t.is_empty()),
            content,
            content_nonce,
            language: req.language,
            theme: req.theme.filter(|t| !t.is_empty()),
            created_at: now,
            expires_at: expiration.expires_at(now),
            view_limit: view_limit.as_limit(),
            view_count: 0,
            owner_code_hash: Some(Self::hash_credential(&auth_codes.owner)?),
            edit_code_hash: Some(Self::hash_credential(&auth_codes.edit)?),
            delete_code_hash: Some(Self::hash_credential(&auth_codes.delete)?),
            password_hash,
            user_id: req.user_id,
        };

        self.store.insert(snippet).await?;
        self.invalidate_listings().await;

        info!("SnippetService: created '{}'", short_id);
        Ok(CreateSnippetResult {
            short_id,
            owner_code: auth_codes.owner,
            edit_code: auth_codes.edit,
            delete_code: auth_codes.delete,
        })
    }

    /// Fetch a snippet, counting the view.
    ///
    /// This is a read with side effects, not idempotent: the read that
    /// exhausts a finite view quota deletes the record and reports NotFound,
    /// and an expired record is lazily deleted on first access. At most one
    /// increment or one deletion happens per call, never both.
    pub async fn get(&self, short_id: &str, password: Option<&str>) -> Result<Snippet> {
        let mut snippet = self
            .store
            .get(short_id)
            .await?
            .ok_or_else(|| Self::not_found(short_id))?;

        if snippet.is_expired(Utc::now()) {
            self.remove_best_effort(short_id, "expired").await;
            return Err(Self::not_found(short_id));
        }

        // Password gate runs before any view-count side effect: a failed
        // attempt must not consume a view.
        if let Some(hash) = &snippet.password_hash {
            let candidate =
                password.ok_or_else(|| SnipbinError::authorization("Password required"))?;
            let ok = verify_credential(candidate, hash)
                .map_err(|e| SnipbinError::password_hash(e.to_string()))?;
            if !ok {
                return Err(SnipbinError::authorization("Wrong password"));
            }
        }

        match self.store.increment_view(short_id, snippet.view_limit).await? {
            Some(new_count) => {
                snippet.view_count = new_count;
            }
            None if snippet.view_limit.is_some() => {
                // Quota already exhausted; the consuming reader never sees content.
                self.remove_best_effort(short_id, "view limit exhausted").await;
                return Err(Self::not_found(short_id));
            }
            None => {
                // Unlimited snippet deleted out from under us.
                return Err(Self::not_found(short_id));
            }
        }

        self.open_content(snippet)
    }

    /// Apply a partial update after owner-code authorization.
    pub async fn update(
        &self,
        short_id: &str,
        owner_code: &str,
        req: UpdateSnippetRequest,
    ) -> Result<Snippet> {
        // Cheap pattern reject before any lookup.
        if !codes::is_valid_owner_code(owner_code) {
            return Err(SnipbinError::authorization("Invalid owner code"));
        }

        let existing = self
            .store
            .get(short_id)
            .await?
            .ok_or_else(|| Self::not_found(short_id))?;

        let now = Utc::now();
        if existing.is_expired(now) {
            self.remove_best_effort(short_id, "expired").await;
            return Err(Self::not_found(short_id));
        }

        self.authorize_owner_code(&existing, owner_code)?;

        if let Some(content) = &req.content {
            if content.is_empty() {
                return Err(SnipbinError::validation("Content must not be empty"));
            }
        }
        if let Some(language) = &req.language {
            if language.is_empty() {
                return Err(SnipbinError::validation("Language must not be empty"));
            }
        }

        let expires_at = match &req.expiration {
            Some(option) => ExpirationOption::parse(option)
                .map_err(SnipbinError::validation)?
                .expires_at(now),
            None => existing.expires_at,
        };

        let view_limit = match &req.view_limit {
            Some(option) => ViewLimitOption::parse(option)
                .map_err(SnipbinError::validation)?
                .as_limit(),
            None => existing.view_limit,
        };

        // The counter must never retroactively exceed the limit.
        if let Some(limit) = view_limit {
            if limit < existing.view_count {
                return Err(SnipbinError::validation(format!(
                    "View limit {} is below the current view count {}",
                    limit, existing.view_count
                )));
            }
        }

        let password_hash =
            process_update_password(req.password.as_deref(), existing.password_hash.clone())
                .map_err(|e| SnipbinError::password_hash(e.to_string()))?;

        let (content, content_nonce) = match &req.content {
            Some(new_content) => match &self.sealer {
                Some(sealer) => {
                    let sealed = sealer.seal(new_content)?;
                    (sealed.ciphertext_b64, Some(sealed.nonce_b64))
                }
                None => (new_content.clone(), None),
            },
            None => (existing.content.clone(), existing.content_nonce.clone()),
        };

        let updated = Snippet {
            short_id: short_id.to_string(),
            title: match req.title {
                Some(title) => Some(title).filter(|t| !t.is_empty()),
                None => existing.title,
            },
            content,
            content_nonce,
            language: req.language.unwrap_or(existing.language),
            theme: match req.theme {
                Some(theme) => Some(theme).filter(|t| !t.is_empty()),
                None => existing.theme,
            },
            created_at: existing.created_at,
            expires_at,
            view_limit,
            view_count: existing.view_count,
            owner_code_hash: existing.owner_code_hash,
            edit_code_hash: existing.edit_code_hash,
            delete_code_hash: existing.delete_code_hash,
            password_hash,
            user_id: existing.user_id,
        };

        self.store.update(updated.clone()).await?;
        self.invalidate_listings().await;

        info!("SnippetService: updated '{}'", short_id);
        self.open_content(updated)
    }

    /// Permanently remove a snippet after owner-code authorization.
    ///
    /// Deleting an already-absent snippet reports NotFound, so callers can
    /// tell "you deleted it" from "it was already gone".
    pub async fn delete(&self, short_id: &str, owner_code: &str) -> Result<()> {
        if !codes::is_valid_owner_code(owner_code) {
            return Err(SnipbinError::authorization("Invalid owner code"));
        }

        let existing = self
            .store
            .get(short_id)
            .await?
            .ok_or_else(|| Self::not_found(short_id))?;

        if existing.is_expired(Utc::now()) {
            self.remove_best_effort(short_id, "expired").await;
            return Err(Self::not_found(short_id));
        }

        self.authorize_owner_code(&existing, owner_code)?;

        self.store.remove(short_id).await.map_err(|e| match e {
            SnipbinError::NotFound(_) => Self::not_found(short_id),
            other => other,
        })?;
        self.invalidate_listings().await;

        info!("SnippetService: deleted '{}'", short_id);
        Ok(())
    }

    /// Pure authorization pre-check with no side effects.
    ///
    /// Errors only for malformed input or a missing snippet; a wrong code
    /// is an `Ok(false)`, not an error.
    pub async fn verify_owner_code(&self, short_id: &str, candidate: &str) -> Result<bool> {
        if !codes::is_valid_owner_code(candidate) {
            return Err(SnipbinError::validation("Malformed owner code"));
        }

        let snippet = self
            .store
            .get(short_id)
            .await?
            .ok_or_else(|| Self::not_found(short_id))?;

        // Expired records look nonexistent everywhere; no cleanup here,
        // this path is side-effect free.
        if snippet.is_expired(Utc::now()) {
            return Err(Self::not_found(short_id));
        }

        match &snippet.owner_code_hash {
            Some(hash) => verify_credential(candidate, hash)
                .map_err(|e| SnipbinError::password_hash(e.to_string())),
            None => Ok(false),
        }
    }

    /// Idempotent expiry sweep; safe to run concurrently with normal traffic.
    pub async fn sweep_expired(&self) -> Result<u64> {
        let removed = self.store.delete_expired(Utc::now()).await?;
        if removed > 0 {
            self.invalidate_listings().await;
        }
        Ok(removed)
    }

    /// Cached newest-first listing for display surfaces.
    pub async fn list_recent(&self, limit: u64) -> Result<Vec<SnippetSummary>> {
        let limit = limit.clamp(1, 100);
        let cache_key = format!("{}recent:{}", LIST_CACHE_PREFIX, limit);

        if let Some(hit) = self.cache.get(&cache_key).await {
            return Ok(hit);
        }

        let snippets = self.store.list_recent(limit).await?;
        let summaries: Vec<SnippetSummary> =
            snippets.iter().map(SnippetSummary::from).collect();

        self.cache
            .set(cache_key, summaries.clone(), self.list_cache_ttl)
            .await;
        Ok(summaries)
    }

    /// Owner-code check against the stored hash. Fails closed: a snippet
    /// with no stored hash (legacy/anonymous) can never be mutated this way.
    fn authorize_owner_code(&self, snippet: &Snippet, candidate: &str) -> Result<()> {
        let Some(hash) = &snippet.owner_code_hash else {
            return Err(SnipbinError::authorization(
                "Snippet has no owner code; it cannot be edited or deleted",
            ));
        };

        let ok = verify_credential(candidate, hash)
            .map_err(|e| SnipbinError::password_hash(e.to_string()))?;
        if !ok {
            return Err(SnipbinError::authorization("Wrong owner code"));
        }
        Ok(())
    }
}
