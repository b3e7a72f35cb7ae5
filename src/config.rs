use config::{builder::DefaultState, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub web_host: String,
    pub web_port: u16,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub static_dir: String,
    pub log_filter: String,
    pub log_json: bool,
}

impl Config {
    /// Defaults, then an optional `blogicum.{toml,yaml,json}`, then the
    /// environment (including `.env`).
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::defaults()?
            .add_source(File::with_name("blogicum").required(false))
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize::<Self>()?;

        Ok(config)
    }

    fn defaults() -> crate::Result<ConfigBuilder<DefaultState>> {
        Ok(config::Config::builder()
            .set_default("web_host", "0.0.0.0")?
            .set_default("web_port", 8000)?
            .set_default("max_connections", 20)?
            .set_default("acquire_timeout_secs", 30)?
            .set_default("static_dir", "static")?
            .set_default("log_filter", "blogicum=debug,tower_http=debug")?
            .set_default("log_json", false)?)
    }

    pub fn web_addr(&self) -> String {
        format!("{}:{}", self.web_host, self.web_port)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}
