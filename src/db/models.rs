use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted credential record per mailbox identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountRecord {
    pub id: i64,
    /// Provider-assigned stable user id.
    pub user_id: String,
    /// Provider account email.
    pub email: String,
    /// The mailbox alias: lookup key for every mail operation.
    pub zmail_address: String,
    pub access_token: String,
    pub refresh_token: String,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create a record; `id` and `created_at` are assigned
/// by the store.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user_id: String,
    pub email: String,
    pub zmail_address: String,
    pub access_token: String,
    pub refresh_token: String,
}
