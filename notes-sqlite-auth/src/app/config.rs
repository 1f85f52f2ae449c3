use std::sync::OnceLock;

use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default)]
    pub log_json: bool,

    // sessions
    #[serde(default)]
    pub session_secure: bool,
    #[serde(default = "default_session_inactivity_days")]
    pub session_inactivity_days: i64,
}

fn default_port() -> u16 {
    4000
}

fn default_database_url() -> String {
    "sqlite.db".into()
}

fn default_session_inactivity_days() -> i64 {
    1
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<Self>()
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

pub fn config() -> &'static Config {
    CONFIG.get_or_init(|| Config::from_env().unwrap_or_else(|err| panic!("invalid configuration: {err}")))
}
