//! Backend entry-point: loads settings, prepares adapters and serves HTTP and
//! WebSocket traffic.

mod server;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use partfinder::config::AppSettings;
use partfinder::inbound::http::health::HealthState;
use partfinder::inbound::ws::OriginPolicy;
use partfinder::outbound::change_feed::BroadcastChangeFeed;
use partfinder::outbound::geocoding::NominatimGeocoder;
use partfinder::outbound::hosted::{
    DEFAULT_HOSTED_TIMEOUT, HostedBlobStore, HostedIdentityProvider, HostedService,
};
use partfinder::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, create_server};

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
        .map_err(|e| eyre!("failed to load settings: {e}"))?;
    let config = build_server_config(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %config.bind_addr(), "starting server");
    let server = create_server(health_state, config)?;
    server.await?;
    Ok(())
}

async fn build_server_config(settings: &AppSettings) -> Result<ServerConfig> {
    let key = load_session_key(
        &settings.session_key_file(),
        settings.session_allow_ephemeral(),
    )?;
    let bind_addr: SocketAddr = settings
        .bind_addr()
        .parse()
        .wrap_err_with(|| format!("invalid bind address {}", settings.bind_addr()))?;

    let geocoder = NominatimGeocoder::new(
        Url::parse(settings.geocoder_url()).wrap_err("invalid geocoder URL")?,
        settings.geocoder_timeout(),
        settings.geocoder_user_agent(),
    )?;

    let mut config = ServerConfig::new(
        key,
        settings.cookie_secure(),
        SameSite::Lax,
        bind_addr,
        OriginPolicy::new(settings.public_host()),
    )
    .with_geocoder(Arc::new(geocoder))
    .with_feed(BroadcastChangeFeed::new(settings.feed_capacity()));

    if let Some(database_url) = settings.database_url.as_deref() {
        let applied = run_pending_migrations(database_url)
            .await
            .wrap_err("failed to apply migrations")?;
        info!(applied, "database migrations complete");
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(|e| eyre!("failed to build database pool: {}", e.into_message()))?;
        config = config.with_db_pool(pool);
    } else {
        warn!("no database URL configured; serving fixture data");
    }

    if let Some((url, anon_key)) = settings.hosted() {
        let service = HostedService::new(
            Url::parse(url).wrap_err("invalid hosted service URL")?,
            anon_key,
            DEFAULT_HOSTED_TIMEOUT,
        )?;
        config = config.with_hosted(
            Arc::new(HostedIdentityProvider::new(service.clone())),
            Arc::new(HostedBlobStore::new(service, settings.storage_bucket())),
        );
    } else {
        warn!("no hosted service configured; using fixture sign-in and storage");
    }

    Ok(config)
}

fn load_session_key(path: &Path, allow_ephemeral: bool) -> Result<Key> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) if cfg!(debug_assertions) || allow_ephemeral => {
            warn!(path = %path.display(), error = %e, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(e) => Err(eyre!(
            "failed to read session key at {}: {e}",
            path.display()
        )),
    }
}
