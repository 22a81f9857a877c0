use std::env;

use log::*;
use skroutz_order_engine::RestockPolicy;
use soa_common::{parse_boolean_flag, Secret};

const DEFAULT_SOA_HOST: &str = "127.0.0.1";
const DEFAULT_SOA_PORT: u16 = 8380;
const DEFAULT_WEBHOOK_SLUG: &str = "receive";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Shared secret that webhook deliveries must present, either as a `secret` query parameter
    /// or a top-level `secret` field in the body. An empty secret disables the check.
    pub webhook_secret: Secret<String>,
    /// Final path segment of the webhook endpoint. Mirrors the storefront's configurable slug, so
    /// operators can rotate the URL without redeploying.
    pub webhook_slug: String,
    /// When true, cancellations only restock orders that actually reduced stock beforehand.
    pub strict_restock: bool,
    /// When true, webhook acknowledgements carry only `{"status": "success"}`, exactly as the
    /// legacy integration answered.
    pub legacy_responses: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SOA_HOST.to_string(),
            port: DEFAULT_SOA_PORT,
            database_url: String::default(),
            webhook_secret: Secret::default(),
            webhook_slug: DEFAULT_WEBHOOK_SLUG.to_string(),
            strict_restock: false,
            legacy_responses: false,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SOA_HOST").ok().unwrap_or_else(|| DEFAULT_SOA_HOST.into());
        let port = env::var("SOA_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SOA_PORT. {e} Using the default, {DEFAULT_SOA_PORT}, instead."
                    );
                    DEFAULT_SOA_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SOA_PORT);
        let database_url = env::var("SOA_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ SOA_DATABASE_URL is not set. Please set it to the URL for the order database.");
            String::default()
        });
        let webhook_secret = env::var("SOA_WEBHOOK_SECRET").ok().unwrap_or_else(|| {
            warn!("🪛️ SOA_WEBHOOK_SECRET is not set. The webhook endpoint will accept unauthenticated deliveries.");
            String::default()
        });
        let webhook_slug = env::var("SOA_WEBHOOK_SLUG")
            .ok()
            .map(|s| s.trim_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_WEBHOOK_SLUG.to_string());
        let strict_restock = parse_boolean_flag(env::var("SOA_STRICT_RESTOCK").ok(), false);
        let legacy_responses = parse_boolean_flag(env::var("SOA_LEGACY_RESPONSES").ok(), false);
        Self {
            host,
            port,
            database_url,
            webhook_secret: Secret::new(webhook_secret),
            webhook_slug,
            strict_restock,
            legacy_responses,
        }
    }

    /// The restock behaviour the engine applies on cancellations.
    pub fn restock_policy(&self) -> RestockPolicy {
        if self.strict_restock {
            RestockPolicy::RequirePriorReduction
        } else {
            RestockPolicy::Always
        }
    }
}

/// The request-scoped subset of the configuration handed to the webhook handler. Kept small, and
/// without the database URL, to avoid passing more configuration around the system than handlers
/// need.
#[derive(Clone, Debug)]
pub struct WebhookOptions {
    pub secret: Secret<String>,
    pub legacy_responses: bool,
}

impl WebhookOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { secret: config.webhook_secret.clone(), legacy_responses: config.legacy_responses }
    }
}
