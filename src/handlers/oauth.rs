use crate::error::RelayError;
use crate::router::RelayState;
use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct AuthCallbackQuery {
    pub code: Option<String>,
}

/// GET /oauth?code=... -> exchanges the authorization code and persists
/// the resulting credential record. The response names the mailbox only;
/// tokens never leave the server.
pub async fn oauth_callback(
    State(state): State<RelayState>,
    Query(query): Query<AuthCallbackQuery>,
) -> Result<Json<Value>, RelayError> {
    let Some(code) = query.code.as_deref() else {
        return Err(RelayError::MissingAuthCode);
    };

    let record = state.lifecycle.bootstrap(code).await?;
    info!(mailbox = %record.zmail_address, "OAuth callback stored credential");
    Ok(Json(json!({
        "mailbox": record.zmail_address,
        "email": record.email,
    })))
}
