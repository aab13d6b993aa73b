//! Application configuration loaded from `config.json` and environment variables.

use anyhow::{Context, Result};
use discord_gateway::{CommandSync, GatewaySettings};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming the JSON config file.
pub const CONFIG_PATH_VAR: &str = "BOT_CONFIG";

/// Application configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Discord connection and application settings
    pub discord: DiscordConfig,

    /// Bot behaviour
    #[serde(default)]
    pub bot: BotConfig,

    /// Static strings shown by informational commands
    #[serde(default)]
    pub display: DisplayConfig,

    /// Button / select menu sessions
    #[serde(default)]
    pub interaction: InteractionConfig,

    /// Blacklist storage
    #[serde(default)]
    pub blacklist: BlacklistConfig,

    /// Third-party API access
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Deserialize)]
pub struct DiscordConfig {
    /// Bot token
    pub token: SecretString,

    /// Application id, used for the invite link
    #[serde(default)]
    pub application_id: u64,

    /// Permission bitfield requested by the invite link
    #[serde(default = "default_permissions")]
    pub permissions: u64,

    /// Register slash commands globally on ready
    #[serde(default = "default_true")]
    pub sync_commands_globally: bool,

    /// Register slash commands to this guild only (takes precedence)
    #[serde(default)]
    pub guild_id: Option<u64>,

    /// Request the privileged message content intent for prefix commands
    #[serde(default)]
    pub message_content: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Prefix for text commands
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// User ids allowed to run owner-only commands
    #[serde(default, deserialize_with = "deserialize_ids")]
    pub owners: Vec<u64>,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log file, truncated on start. Empty disables file logging.
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Presence statuses to rotate through
    #[serde(default = "default_statuses")]
    pub statuses: Vec<String>,

    /// Presence rotation interval
    #[serde(default = "default_status_interval", with = "humantime_serde")]
    pub status_interval: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_owner_name")]
    pub owner_name: String,

    #[serde(default = "default_description")]
    pub description: String,

    #[serde(default = "default_support_invite")]
    pub support_invite: String,

    /// Title of the `serverinfo` embed; the guild name when unset
    #[serde(default)]
    pub server_title: Option<String>,

    /// Description of the `serverinfo` embed
    #[serde(default)]
    pub server_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionConfig {
    /// How long a button or select waits for an answer
    #[serde(default = "default_interaction_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlacklistConfig {
    #[serde(default = "default_blacklist_path")]
    pub path: PathBuf,

    /// How often the file is re-read; zero turns reloading off
    #[serde(default = "default_blacklist_reload", with = "humantime_serde")]
    pub reload_interval: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Request timeout
    #[serde(default = "default_fetch_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// How long successful responses are reused
    #[serde(default = "default_cache_ttl", with = "humantime_serde")]
    pub cache_ttl: Duration,

    #[serde(default = "default_fact_url")]
    pub fact_url: String,

    #[serde(default = "default_dog_url")]
    pub dog_url: String,

    #[serde(default = "default_bitcoin_url")]
    pub bitcoin_url: String,

    #[serde(default = "default_covid_url")]
    pub covid_url: String,

    #[serde(default = "default_cat_base_url")]
    pub cat_base_url: String,
}

// Default implementations
impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            owners: Vec::new(),
            log_level: default_log_level(),
            log_file: default_log_file(),
            statuses: default_statuses(),
            status_interval: default_status_interval(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            owner_name: default_owner_name(),
            description: default_description(),
            support_invite: default_support_invite(),
            server_title: None,
            server_description: None,
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            timeout: default_interaction_timeout(),
        }
    }
}

impl Default for BlacklistConfig {
    fn default() -> Self {
        Self {
            path: default_blacklist_path(),
            reload_interval: default_blacklist_reload(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: default_fetch_timeout(),
            cache_ttl: default_cache_ttl(),
            fact_url: default_fact_url(),
            dog_url: default_dog_url(),
            bitcoin_url: default_bitcoin_url(),
            covid_url: default_covid_url(),
            cat_base_url: default_cat_base_url(),
        }
    }
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_permissions() -> u64 {
    8
}

fn default_prefix() -> String {
    "!".into()
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_file() -> String {
    "discord.log".into()
}

fn default_statuses() -> Vec<String> {
    vec!["by trqngdk".into()]
}

fn default_status_interval() -> Duration {
    Duration::from_secs(60)
}

fn default_owner_name() -> String {
    "trqngdk".into()
}

fn default_description() -> String {
    "A normal Rust discord bot.".into()
}

fn default_support_invite() -> String {
    "https://discord.gg/123456789".into()
}

fn default_interaction_timeout() -> Duration {
    Duration::from_secs(180)
}

fn default_blacklist_path() -> PathBuf {
    PathBuf::from("database/blacklist.json")
}

fn default_blacklist_reload() -> Duration {
    Duration::from_secs(30)
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(1)
}

fn default_fact_url() -> String {
    fetchers::endpoints::FACT.into()
}

fn default_dog_url() -> String {
    fetchers::endpoints::DOG.into()
}

fn default_bitcoin_url() -> String {
    fetchers::endpoints::BITCOIN.into()
}

fn default_covid_url() -> String {
    fetchers::endpoints::COVID.into()
}

fn default_cat_base_url() -> String {
    fetchers::endpoints::CAT_BASE.into()
}

/// Accept `[1, "2"]` from the JSON file or `"1,2"` from the environment.
fn deserialize_ids<'de, D>(deserializer: D) -> std::result::Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(u64),
        Text(String),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Ids {
        Many(Vec<Id>),
        Joined(String),
    }

    let texts: Vec<String> = match Ids::deserialize(deserializer)? {
        Ids::Many(ids) => ids
            .into_iter()
            .map(|id| match id {
                Id::Number(n) => n.to_string(),
                Id::Text(s) => s,
            })
            .collect(),
        Ids::Joined(joined) => joined.split(',').map(str::to_string).collect(),
    };

    texts
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .map_err(|_| serde::de::Error::custom(format!("invalid user id '{}'", s)))
        })
        .collect()
}

impl Config {
    /// Load configuration from the JSON file named by `BOT_CONFIG` (default
    /// `config.json`, optional) and environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.json".into());
        Self::load_from(&path, None)
    }

    /// Load from `path` and either the process environment or `env`.
    pub fn load_from(path: &str, env: Option<HashMap<String, String>>) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::new(path, config::FileFormat::Json).required(false))
            .add_source(
                config::Environment::default()
                    .separator("__")
                    // Ids are longer than a JSON-safe float; keep strings as strings.
                    .try_parsing(false)
                    .source(env),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Where slash commands get registered.
    pub fn command_sync(&self) -> CommandSync {
        match (self.discord.guild_id, self.discord.sync_commands_globally) {
            (Some(id), _) => CommandSync::Guild(id),
            (None, true) => CommandSync::Global,
            (None, false) => CommandSync::Off,
        }
    }

    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            prefix: self.bot.prefix.clone(),
            sync: self.command_sync(),
            statuses: self.bot.statuses.clone(),
            status_interval: self.bot.status_interval,
        }
    }
}
