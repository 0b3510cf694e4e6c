//! Provider mail API forwarding and the filler-text generator feeding it.

pub mod lorem;
pub mod mail_api;

pub use mail_api::MailApi;
