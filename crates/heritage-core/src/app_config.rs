use std::net::SocketAddr;

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
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub geoserver_base_url: String,
    pub geoserver_workspace: String,
    pub khs_base_url: String,
    pub cors_origins: Vec<String>,
    pub search_schema: String,
    pub search_row_limit: i64,
    pub upstream_timeout_secs: u64,
    pub user_agent: String,
    pub resolver_top_n: usize,
    pub list_page_size: u32,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("geoserver_base_url", &self.geoserver_base_url)
            .field("geoserver_workspace", &self.geoserver_workspace)
            .field("khs_base_url", &self.khs_base_url)
            .field("cors_origins", &self.cors_origins)
            .field("search_schema", &self.search_schema)
            .field("search_row_limit", &self.search_row_limit)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("resolver_top_n", &self.resolver_top_n)
            .field("list_page_size", &self.list_page_size)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
