//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a default so the application works out of the box.

use serde::{Deserialize, Serialize};

use super::nickname::generate_nickname;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub networks: Vec<NetworkConfig>,
    #[serde(default = "default_ui")]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            networks: default_networks(),
            ui: default_ui(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_networks() -> Vec<NetworkConfig> {
    let nick = generate_nickname();
    vec![
        NetworkConfig {
            name: "libera".into(),
            host: "irc.libera.chat".into(),
            port: 6697,
            tls: true,
            nickname: nick.clone(),
            user: default_user(),
            login_cmd: None,
            channels: vec![],
            auto_connect: false,
        },
        NetworkConfig {
            name: "oftc".into(),
            host: "irc.oftc.net".into(),
            port: 6697,
            tls: true,
            nickname: nick,
            user: default_user(),
            login_cmd: None,
            channels: vec![],
            auto_connect: false,
        },
    ]
}

/// One IRC network: everything needed to open a connection, log in, and
/// settle into the configured channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// User-facing label (e.g. `"libera"`), also the /connect argument.
    pub name: String,
    /// Hostname or IP address of the IRC server.
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub tls: bool,
    #[serde(default = "default_nickname")]
    pub nickname: String,
    /// `USER` parameters sent verbatim, e.g. `"vy 0 * :vy"`.
    #[serde(default = "default_user")]
    pub user: String,
    /// Raw command sent once after end-of-MOTD, typically
    /// `PRIVMSG nickserv :identify <password>`.
    #[serde(default)]
    pub login_cmd: Option<String>,
    /// Channels joined, in order, after end-of-MOTD.
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub auto_connect: bool,
}

/// UI appearance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default = "default_max_scrollback")]
    pub max_scrollback: usize,
}

/// Chat transcript logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_true")]
    pub log_channels: bool,
    #[serde(default)]
    pub log_queries: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_dir: default_log_dir(),
            log_channels: true,
            log_queries: false,
        }
    }
}

fn default_nickname() -> String {
    generate_nickname()
}
fn default_user() -> String {
    "tabirc 0 * :tabirc user".to_string()
}
fn default_port() -> u16 {
    6697
}
fn default_true() -> bool {
    true
}
fn default_timestamp_format() -> String {
    "%H:%M".to_string()
}
fn default_max_scrollback() -> usize {
    10000
}
fn default_log_dir() -> String {
    "~/.local/share/tabirc/logs".to_string()
}
fn default_ui() -> UiConfig {
    UiConfig {
        timestamp_format: default_timestamp_format(),
        max_scrollback: default_max_scrollback(),
    }
}
