use crate::api::mail_api::MailApi;
use crate::handlers;
use crate::zoom_oauth::service::TokenLifecycle;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct RelayState {
    pub lifecycle: Arc<TokenLifecycle>,
    pub mail: Arc<MailApi>,
}

impl RelayState {
    pub fn new(lifecycle: Arc<TokenLifecycle>, mail: Arc<MailApi>) -> Self {
        Self { lifecycle, mail }
    }
}

pub fn relay_router(state: RelayState) -> Router {
    Router::new()
        .route("/oauth", get(handlers::oauth::oauth_callback))
        .route(
            "/mail/{mailbox}/profile",
            get(handlers::mail::mailbox_profile),
        )
        .route(
            "/mail/{mailbox}/messages",
            post(handlers::mail::create_inbox_message),
        )
        .route(
            "/mail/{mailbox}/messages/send",
            post(handlers::mail::send_message),
        )
        .route(
            "/mail/{mailbox}/messages/trash",
            post(handlers::mail::create_trash_message),
        )
        .route(
            "/mail/{mailbox}/messages/draft",
            post(handlers::mail::create_draft_message),
        )
        .route("/mail/{mailbox}/labels", post(handlers::mail::create_label))
        .with_state(state)
}
