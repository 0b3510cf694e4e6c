//! One-shot test-data generation: drives the mail operations against the
//! configured seed mailbox until the fixed quotas are met.

use crate::api::mail_api::MailApi;
use crate::config::Config;
use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::{info, warn};

const NUM_SENT_MESSAGES: usize = 10;
const NUM_INBOX: usize = 25;
const NUM_LABELS: usize = 5;
const NUM_TRASH: usize = 10;
const NUM_DRAFT: usize = 10;

const LABEL_NAME_LEN: usize = 12;

fn random_label_name() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(LABEL_NAME_LEN)
        .map(char::from)
        .collect()
}

/// Populate the seed mailbox with generated data. Individual failures are
/// logged and skipped so one rejected call does not starve the rest of
/// the pass.
pub async fn generate_data(config: &Config, mail: &MailApi) {
    if !config.seed_enabled {
        info!("seed script is disabled, skipping data generation");
        return;
    }

    let mailbox = config.seed_mailbox.as_str();
    let to_email = config.seed_to_email.as_str();
    info!(mailbox = %mailbox, "seed pass starting");

    for _ in 0..NUM_SENT_MESSAGES {
        if let Err(e) = mail.send_message(mailbox, to_email).await {
            warn!(error = %e, "seed: sending message failed");
        }
    }

    for _ in 0..NUM_LABELS {
        let label_name = random_label_name();
        if let Err(e) = mail.create_label(mailbox, &label_name).await {
            warn!(error = %e, label = %label_name, "seed: creating label failed");
        }
    }

    for _ in 0..NUM_TRASH {
        if let Err(e) = mail.create_trash_message(mailbox, to_email).await {
            warn!(error = %e, "seed: creating trash message failed");
        }
    }

    for _ in 0..NUM_DRAFT {
        if let Err(e) = mail.create_draft_message(mailbox, to_email).await {
            warn!(error = %e, "seed: creating draft message failed");
        }
    }

    for _ in 0..NUM_INBOX {
        if let Err(e) = mail.create_inbox_message(mailbox, to_email).await {
            warn!(error = %e, "seed: creating inbox message failed");
        }
    }

    info!(mailbox = %mailbox, "seed pass finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_names_are_twelve_alphanumerics() {
        for _ in 0..20 {
            let name = random_label_name();
            assert_eq!(name.len(), LABEL_NAME_LEN);
            assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }
}
