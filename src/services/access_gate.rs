//! Access gate
//!
//! Two independent capability checks over the same snippet identity:
//! possession of the owner code grants mutation rights, possession of the
//! view password grants read access. Neither implies the other, and there
//! is no user model behind them - only the secrets.
//!
//! Both checks fail closed: no stored hash means authorization always
//! fails, never always-succeeds.

use std::sync::Arc;

use chrono::Utc;

use crate::errors::{Result, SnipbinError};
use crate::storage::SnippetStore;
use crate::utils::codes;
use crate::utils::password::verify_credential;

pub struct AccessGate {
    store: Arc<dyn SnippetStore>,
}

impl AccessGate {
    pub fn new(store: Arc<dyn SnippetStore>) -> Self {
        Self { store }
    }

    async fn stored_hash(
        &self,
        short_id: &str,
        pick: impl Fn(&crate::storage::Snippet) -> Option<String>,
    ) -> Result<Option<String>> {
        let Some(snippet) = self.store.get(short_id).await? else {
            return Ok(None);
        };
        // Expired snippets are nonexistent to every read path.
        if snippet.is_expired(Utc::now()) {
            return Ok(None);
        }
        Ok(pick(&snippet))
    }

    /// Does `candidate` prove mutation rights over the snippet?
    pub async fn authorize_owner(&self, short_id: &str, candidate: &str) -> Result<bool> {
        // Malformed codes can never match a stored hash; reject before lookup.
        if !codes::is_valid_owner_code(candidate) {
            return Ok(false);
        }

        match self
            .stored_hash(short_id, |s| s.owner_code_hash.clone())
            .await?
        {
            Some(hash) => verify_credential(candidate, &hash)
                .map_err(|e| SnipbinError::password_hash(e.to_string())),
            None => Ok(false),
        }
    }

    /// Does `candidate` unlock read access to a password-protected snippet?
    pub async fn authorize_password(&self, short_id: &str, candidate: &str) -> Result<bool> {
        match self
            .stored_hash(short_id, |s| s.password_hash.clone())
            .await?
        {
            Some(hash) => verify_credential(candidate, &hash)
                .map_err(|e| SnipbinError::password_hash(e.to_string())),
            None => Ok(false),
        }
    }
}
