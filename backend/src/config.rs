//! Service settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `PARTFINDER_*` environment variables and an
//! optional config file. Everything is optional: without a database URL the
//! service runs on in-memory fixtures, and without hosted credentials it uses
//! the fixture identity provider and blob store.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::change_feed::DEFAULT_FEED_CAPACITY;
use crate::outbound::geocoding::{
    DEFAULT_GEOCODER_TIMEOUT, DEFAULT_NOMINATIM_URL, DEFAULT_USER_AGENT,
};
use crate::outbound::hosted::DEFAULT_IMAGE_BUCKET;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_PUBLIC_HOST: &str = "partfinder.app";

/// Runtime configuration for the `partfinder` binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PARTFINDER")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Fixture adapters are used when absent.
    pub database_url: Option<String>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Generate a throwaway session key when the key file is missing.
    pub session_allow_ephemeral: Option<bool>,
    /// Drop the `Secure` flag from the session cookie. Plain-HTTP dev only.
    pub cookie_insecure: Option<bool>,
    /// Host whose HTTPS origins may open WebSockets.
    pub public_host: Option<String>,
    /// Base URL of the Nominatim service.
    pub geocoder_url: Option<String>,
    /// Geocoder request timeout in milliseconds.
    pub geocoder_timeout_ms: Option<u64>,
    /// User-Agent sent to the geocoder.
    pub geocoder_user_agent: Option<String>,
    /// Base URL of the hosted auth and storage service.
    pub hosted_url: Option<String>,
    /// Public anon key for the hosted service.
    pub hosted_anon_key: Option<String>,
    /// Storage bucket for request images.
    pub storage_bucket: Option<String>,
    /// Rows a live listener may fall behind before skipping.
    pub feed_capacity: Option<usize>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    pub fn session_allow_ephemeral(&self) -> bool {
        self.session_allow_ephemeral.unwrap_or(false)
    }

    /// Whether the session cookie carries `Secure`. An absent flag means yes.
    pub fn cookie_secure(&self) -> bool {
        !self.cookie_insecure.unwrap_or(false)
    }

    pub fn public_host(&self) -> &str {
        self.public_host.as_deref().unwrap_or(DEFAULT_PUBLIC_HOST)
    }

    pub fn geocoder_url(&self) -> &str {
        self.geocoder_url.as_deref().unwrap_or(DEFAULT_NOMINATIM_URL)
    }

    pub fn geocoder_timeout(&self) -> Duration {
        self.geocoder_timeout_ms
            .map_or(DEFAULT_GEOCODER_TIMEOUT, Duration::from_millis)
    }

    pub fn geocoder_user_agent(&self) -> &str {
        self.geocoder_user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Hosted service URL and key, when both are configured.
    pub fn hosted(&self) -> Option<(&str, &str)> {
        match (self.hosted_url.as_deref(), self.hosted_anon_key.as_deref()) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => Some((url, key)),
            _ => None,
        }
    }

    pub fn storage_bucket(&self) -> &str {
        self.storage_bucket.as_deref().unwrap_or(DEFAULT_IMAGE_BUCKET)
    }

    pub fn feed_capacity(&self) -> usize {
        self.feed_capacity.unwrap_or(DEFAULT_FEED_CAPACITY)
    }
}
