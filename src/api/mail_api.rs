use crate::api::lorem;
use crate::config::Config;
use crate::error::RelayError;
use crate::zoom_oauth::service::TokenLifecycle;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use reqwest::Method;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Forwards mail operations to the provider's REST API. Every call first
/// obtains a usable bearer token for the mailbox from the lifecycle
/// manager, then issues a single non-retrying HTTP request.
pub struct MailApi {
    config: Arc<Config>,
    lifecycle: Arc<TokenLifecycle>,
    http: reqwest::Client,
}

impl MailApi {
    pub fn new(config: Arc<Config>, lifecycle: Arc<TokenLifecycle>, http: reqwest::Client) -> Self {
        Self {
            config,
            lifecycle,
            http,
        }
    }

    /// Send a generated message from `mailbox` to `to_email`.
    pub async fn send_message(&self, mailbox: &str, to_email: &str) -> Result<Value, RelayError> {
        info!(mailbox = %mailbox, "sending mail message");
        let url = self
            .config
            .api_url(&format!("emails/mailboxes/{mailbox}/messages/send"))?;
        self.forward(mailbox, Method::POST, url, Some(raw_message_body(mailbox, to_email)))
            .await
    }

    /// Insert a generated message straight into the inbox.
    pub async fn create_inbox_message(
        &self,
        mailbox: &str,
        to_email: &str,
    ) -> Result<Value, RelayError> {
        info!(mailbox = %mailbox, "adding mail message to inbox");
        let url = self
            .config
            .api_url(&format!("emails/mailboxes/{mailbox}/messages"))?;
        self.forward(mailbox, Method::POST, url, Some(raw_message_body(mailbox, to_email)))
            .await
    }

    /// Insert a generated message into the trash folder.
    pub async fn create_trash_message(
        &self,
        mailbox: &str,
        to_email: &str,
    ) -> Result<Value, RelayError> {
        info!(mailbox = %mailbox, "creating message in the trash folder");
        let mut url = self
            .config
            .api_url(&format!("emails/mailboxes/{mailbox}/messages"))?;
        url.query_pairs_mut().append_pair("deleted", "true");
        self.forward(mailbox, Method::POST, url, Some(raw_message_body(mailbox, to_email)))
            .await
    }

    /// Create a generated draft message.
    pub async fn create_draft_message(
        &self,
        mailbox: &str,
        to_email: &str,
    ) -> Result<Value, RelayError> {
        info!(mailbox = %mailbox, "creating draft mail message");
        let url = self
            .config
            .api_url(&format!("emails/mailboxes/{mailbox}/drafts"))?;
        self.forward(mailbox, Method::POST, url, Some(raw_message_body(mailbox, to_email)))
            .await
    }

    /// Create a label; the provider response carries the new label id.
    pub async fn create_label(&self, mailbox: &str, label_name: &str) -> Result<Value, RelayError> {
        info!(mailbox = %mailbox, label = %label_name, "creating label in mailbox");
        let url = self
            .config
            .api_url(&format!("emails/mailboxes/{mailbox}/labels"))?;
        let body = json!({ "name": label_name, "parentId": "" });
        self.forward(mailbox, Method::POST, url, Some(body)).await
    }

    /// Fetch the mailbox profile.
    pub async fn mailbox_profile(&self, mailbox: &str) -> Result<Value, RelayError> {
        info!(mailbox = %mailbox, "getting mailbox profile");
        let url = self
            .config
            .api_url(&format!("emails/mailboxes/{mailbox}/profile"))?;
        self.forward(mailbox, Method::GET, url, None).await
    }

    async fn forward(
        &self,
        mailbox: &str,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<Value, RelayError> {
        let token = self.lifecycle.valid_access_token(mailbox).await?;
        debug!(mailbox = %mailbox, url = %url, method = %method, "forwarding mail request");

        let mut request = self.http.request(method, url).bearer_auth(token);
        if let Some(body) = &body {
            request = request.json(body);
        }
        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RelayError::UpstreamStatus { status, body });
        }
        Ok(resp.json::<Value>().await?)
    }
}

/// Build the RFC2822-style raw message with generated subject and body,
/// base64-encoded the way the provider's `raw` field expects.
fn raw_message_body(from: &str, to: &str) -> Value {
    debug!("generating email message in RFC2822 format");
    let message = format!(
        "From: {from}\nTo: {to}\nSubject: {subject}\n\n{body}",
        subject = lorem::words(5),
        body = lorem::paragraphs(6),
    );
    json!({ "raw": BASE64_STANDARD.encode(message) })
}
