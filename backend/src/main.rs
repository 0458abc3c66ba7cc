//! Backend entry-point: loads settings, prepares the store and serves the
//! blog API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{AppSettings, ServerConfig, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;

    let mut config = ServerConfig::new(session, settings.bind_addr()?)
        .with_page_size(settings.page_size()?);

    if let Some(url) = settings.database_url.clone() {
        if settings.run_migrations {
            run_pending_migrations(url.clone())
                .await
                .wrap_err("failed to apply migrations")?;
        }
        let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size()))
            .await
            .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    } else {
        warn!("BLOG_DATABASE_URL not set; serving from the in-memory store");
    }

    let health_state = web::Data::new(HealthState::new(config.store_kind()));
    let store = config.store_kind();
    let server = create_server(health_state.clone(), config)?;
    info!(?store, "server listening");
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.wrap_err("server terminated with an error")
}
