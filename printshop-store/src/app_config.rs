use printshop_order::StatusPolicy;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_true")]
    pub seed_sample_data: bool,
    /// Capacity of the domain event channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_sample_data: true,
            event_buffer: default_event_buffer(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    #[serde(default)]
    pub status_policy: StatusPolicy,
    /// Low-stock threshold for products whose `min_stock` is 0
    #[serde(default = "default_low_stock_fallback")]
    pub low_stock_fallback: i64,
    #[serde(default = "default_quote_validity_days")]
    pub quote_validity_days: i64,
    #[serde(default = "default_order_deadline_days")]
    pub order_deadline_days: i64,
    #[serde(default = "default_recent_orders_limit")]
    pub recent_orders_limit: usize,
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            status_policy: StatusPolicy::Open,
            low_stock_fallback: default_low_stock_fallback(),
            quote_validity_days: default_quote_validity_days(),
            order_deadline_days: default_order_deadline_days(),
            recent_orders_limit: default_recent_orders_limit(),
        }
    }
}

fn default_true() -> bool { true }
fn default_event_buffer() -> usize { 256 }
fn default_low_stock_fallback() -> i64 { 10 }
fn default_quote_validity_days() -> i64 { 30 }
fn default_order_deadline_days() -> i64 { 10 }
fn default_recent_orders_limit() -> usize { 5 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            // per-environment overrides, e.g. config/production.toml
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `PRINTSHOP__SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("PRINTSHOP").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
