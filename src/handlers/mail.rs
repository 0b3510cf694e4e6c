use crate::error::RelayError;
use crate::router::RelayState;
use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::Value;

/// Required body for the message-producing endpoints. Deserialization
/// rejects a missing `toEmail` before any core logic runs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    pub to_email: String,
}

/// Required body for label creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelBody {
    pub label_name: String,
}

/// GET /mail/{mailbox}/profile
pub async fn mailbox_profile(
    State(state): State<RelayState>,
    Path(mailbox): Path<String>,
) -> Result<Json<Value>, RelayError> {
    Ok(Json(state.mail.mailbox_profile(&mailbox).await?))
}

/// POST /mail/{mailbox}/messages
pub async fn create_inbox_message(
    State(state): State<RelayState>,
    Path(mailbox): Path<String>,
    Json(body): Json<MessageBody>,
) -> Result<Json<Value>, RelayError> {
    Ok(Json(
        state
            .mail
            .create_inbox_message(&mailbox, &body.to_email)
            .await?,
    ))
}

/// POST /mail/{mailbox}/messages/send
pub async fn send_message(
    State(state): State<RelayState>,
    Path(mailbox): Path<String>,
    Json(body): Json<MessageBody>,
) -> Result<Json<Value>, RelayError> {
    Ok(Json(
        state.mail.send_message(&mailbox, &body.to_email).await?,
    ))
}

/// POST /mail/{mailbox}/messages/trash
pub async fn create_trash_message(
    State(state): State<RelayState>,
    Path(mailbox): Path<String>,
    Json(body): Json<MessageBody>,
) -> Result<Json<Value>, RelayError> {
    Ok(Json(
        state
            .mail
            .create_trash_message(&mailbox, &body.to_email)
            .await?,
    ))
}

/// POST /mail/{mailbox}/messages/draft
pub async fn create_draft_message(
    State(state): State<RelayState>,
    Path(mailbox): Path<String>,
    Json(body): Json<MessageBody>,
) -> Result<Json<Value>, RelayError> {
    Ok(Json(
        state
            .mail
            .create_draft_message(&mailbox, &body.to_email)
            .await?,
    ))
}

/// POST /mail/{mailbox}/labels
pub async fn create_label(
    State(state): State<RelayState>,
    Path(mailbox): Path<String>,
    Json(body): Json<LabelBody>,
) -> Result<Json<Value>, RelayError> {
    Ok(Json(
        state.mail.create_label(&mailbox, &body.label_name).await?,
    ))
}
