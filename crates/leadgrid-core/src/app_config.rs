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
    pub log_level: String,
    pub campaigns_path: PathBuf,
    pub geocoder_base_url: String,
    pub search_base_url: String,
    pub search_api_key: String,
    pub crawl_base_url: Option<String>,
    pub contact_api_base_url: Option<String>,
    pub contact_api_key: Option<String>,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub inter_page_delay_ms: u64,
    pub inter_subject_delay_ms: u64,
    pub monthly_request_ceiling: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("campaigns_path", &self.campaigns_path)
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field("search_base_url", &self.search_base_url)
            .field("search_api_key", &"[redacted]")
            .field("crawl_base_url", &self.crawl_base_url)
            .field("contact_api_base_url", &self.contact_api_base_url)
            .field(
                "contact_api_key",
                &self.contact_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("inter_page_delay_ms", &self.inter_page_delay_ms)
            .field("inter_subject_delay_ms", &self.inter_subject_delay_ms)
            .field("monthly_request_ceiling", &self.monthly_request_ceiling)
            .finish()
    }
}
