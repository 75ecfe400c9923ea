pub mod config;
pub mod config_loader;
pub mod money;

pub use config::{AdSenseConfig, AppConfig, ContentConfig, MonetizationConfig, ServerConfig};
pub use config_loader::{ConfigLoader, DEFAULT_CONFIG_PATH};
pub use money::{format_cents, round_cents, round_ratio, safe_div};
