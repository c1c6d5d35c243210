use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// PostgreSQL URL. Only honoured when built with the `postgres` feature;
    /// otherwise records live in memory for the lifetime of the process.
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_db_pool_size")]
    pub db_pool_size: u32,
    /// Cap for `/pets` and `/announcements`.
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
    #[serde(default = "default_nearby_limit")]
    pub nearby_limit: usize,
    /// Cap for `/matches/:owner_id` and `/messages/:match_id`.
    #[serde(default = "default_conversation_limit")]
    pub conversation_limit: usize,
}

fn default_port() -> u16 { 8000 }
fn default_db_pool_size() -> u32 { 10 }
fn default_list_limit() -> usize { 100 }
fn default_nearby_limit() -> usize { 200 }
fn default_conversation_limit() -> usize { 200 }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            database_url: None,
            db_pool_size: default_db_pool_size(),
            list_limit: default_list_limit(),
            nearby_limit: default_nearby_limit(),
            conversation_limit: default_conversation_limit(),
        }
    }
}

impl AppConfig {
    /// Reads `PUREBRED_*` environment variables, e.g. `PUREBRED_PORT`,
    /// `PUREBRED_DATABASE_URL`.
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("PUREBRED")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
