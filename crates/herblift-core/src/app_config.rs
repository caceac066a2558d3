use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub ebay_client_id: String,
    pub ebay_client_secret: String,
    /// eBay Partner Network campaign id, emitted as `campid` on affiliate links.
    pub epn_campaign_id: String,
    pub ebay_api_base_url: String,
    pub ebay_marketplace_id: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Optional YAML file replacing the built-in category table.
    pub catalog_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("ebay_client_id", &self.ebay_client_id)
            .field("ebay_client_secret", &"[redacted]")
            .field("epn_campaign_id", &self.epn_campaign_id)
            .field("ebay_api_base_url", &self.ebay_api_base_url)
            .field("ebay_marketplace_id", &self.ebay_marketplace_id)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("catalog_path", &self.catalog_path)
            .finish()
    }
}
