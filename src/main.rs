use mimalloc::MiMalloc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use zmail_relay::api::mail_api::MailApi;
use zmail_relay::config::Config;
use zmail_relay::db::sqlite::AccountStorage;
use zmail_relay::router::{RelayState, relay_router};
use zmail_relay::service::seeder;
use zmail_relay::zoom_oauth::service::{TokenLifecycle, build_http_client};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Arc::new(Config::from_env()?);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        api_base_url = %cfg.api_base_url,
        auth_base_url = %cfg.auth_base_url,
        listen_addr = %cfg.listen_addr,
        seed_enabled = cfg.seed_enabled,
        loglevel = %cfg.loglevel,
    );

    let storage = AccountStorage::connect(&cfg.database_url).await?;
    let http = build_http_client();

    let lifecycle = Arc::new(TokenLifecycle::new(cfg.clone(), storage, http.clone()));
    let mail = Arc::new(MailApi::new(cfg.clone(), lifecycle.clone(), http));

    if cfg.seed_enabled {
        let seed_cfg = cfg.clone();
        let seed_mail = mail.clone();
        tokio::spawn(async move {
            seeder::generate_data(&seed_cfg, &seed_mail).await;
        });
    }

    let state = RelayState::new(lifecycle, mail);
    let app = relay_router(state);

    let listener = TcpListener::bind(cfg.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
