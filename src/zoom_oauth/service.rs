use crate::config::Config;
use crate::db::models::{AccountRecord, NewAccount};
use crate::db::sqlite::AccountStorage;
use crate::error::RelayError;
use crate::zoom_oauth::endpoints::ZoomOauthEndpoints;
use crate::zoom_oauth::jwt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Shared outbound HTTP client with bounded timeouts, so no provider
/// call can suspend a request indefinitely.
pub fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("zmail-relay/0.2")
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(15))
        .build()
        .expect("FATAL: initialize relay HTTP client failed")
}

/// Owns the credential lifecycle for every mailbox: bootstrap from an
/// authorization code, and hand out a currently-valid access token,
/// refreshing and persisting transparently when the stored one is stale.
pub struct TokenLifecycle {
    config: Arc<Config>,
    storage: AccountStorage,
    http: reqwest::Client,
}

impl TokenLifecycle {
    pub fn new(config: Arc<Config>, storage: AccountStorage, http: reqwest::Client) -> Self {
        Self {
            config,
            storage,
            http,
        }
    }

    pub fn storage(&self) -> &AccountStorage {
        &self.storage
    }

    /// One-time flow: authorization code -> token pair -> persisted
    /// account record keyed by the fetched zmail address.
    ///
    /// The first failing step aborts the whole bootstrap; nothing written
    /// before that point is rolled back (at most the provider-side code
    /// consumption), which single-statement store atomicity bounds.
    pub async fn bootstrap(&self, code: &str) -> Result<AccountRecord, RelayError> {
        let pair =
            ZoomOauthEndpoints::exchange_authorization_code(&self.config, code, &self.http).await?;
        let mailbox =
            ZoomOauthEndpoints::fetch_mailbox_address(&self.config, &pair.access_token, &self.http)
                .await?;

        match self.storage.find_by_alias(&mailbox).await? {
            Some(existing) => {
                info!(mailbox = %mailbox, "account already present, rotating token pair");
                self.storage
                    .update_tokens(existing.id, &pair.access_token, &pair.refresh_token)
                    .await?;
                Ok(AccountRecord {
                    access_token: pair.access_token,
                    refresh_token: pair.refresh_token,
                    ..existing
                })
            }
            None => {
                // Identity is only needed for brand-new records.
                let identity =
                    ZoomOauthEndpoints::fetch_identity(&self.config, &pair.access_token, &self.http)
                        .await?;
                let record = self
                    .storage
                    .create(NewAccount {
                        user_id: identity.user_id,
                        email: identity.email,
                        zmail_address: mailbox,
                        access_token: pair.access_token,
                        refresh_token: pair.refresh_token,
                    })
                    .await?;
                info!(
                    mailbox = %record.zmail_address,
                    user_id = %record.user_id,
                    "account bootstrapped"
                );
                Ok(record)
            }
        }
    }

    /// Return a currently-valid access token for `alias`.
    ///
    /// A fresh stored token is returned verbatim with zero provider
    /// calls. A stale one triggers exactly one refresh exchange, and the
    /// rotated pair is persisted by the record's durable id (the alias is
    /// not guaranteed stable across call sites). A failed refresh
    /// surfaces as-is; the stale token is never handed out.
    pub async fn valid_access_token(&self, alias: &str) -> Result<String, RelayError> {
        let record = self
            .storage
            .find_by_alias(alias)
            .await?
            .ok_or_else(|| RelayError::NoSuchAccount {
                alias: alias.to_owned(),
            })?;

        if !jwt::is_expired(&record.access_token) {
            debug!(mailbox = %alias, "stored access token still valid");
            return Ok(record.access_token);
        }

        info!(mailbox = %alias, "stored access token expired, refreshing");
        // Known race: two tasks can observe the same expired token and
        // both reach this exchange; the provider invalidates the loser's
        // refresh token and the store resolves last-write-wins.
        let pair =
            ZoomOauthEndpoints::exchange_refresh_token(&self.config, &record.refresh_token, &self.http)
                .await
                .inspect_err(|e| warn!(mailbox = %alias, error = %e, "refresh exchange failed"))?;

        self.storage
            .update_tokens(record.id, &pair.access_token, &pair.refresh_token)
            .await?;
        Ok(pair.access_token)
    }
}
