use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants;

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_max_message_size() -> u32 {
    constants::DEFAULT_MAX_MESSAGE_SIZE
}

fn default_host() -> String {
    constants::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    constants::DEFAULT_PORT
}

fn default_ping_interval() -> u32 {
    constants::DEFAULT_PING_INTERVAL
}

fn default_activity_timeout() -> u32 {
    constants::DEFAULT_ACTIVITY_TIMEOUT
}

/// URL scheme used to reach an application's server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// Per-application server options. The named fields are the ones this system
/// understands; anything else round-trips through `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppOptions {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub scheme: Scheme,
    #[serde(rename = "useTLS", default)]
    pub use_tls: bool,
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u32,
    #[serde(default = "default_activity_timeout")]
    pub activity_timeout: u32,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            scheme: Scheme::default(),
            use_tls: false,
            ping_interval: default_ping_interval(),
            activity_timeout: default_activity_timeout(),
            extra: serde_json::Map::new(),
        }
    }
}

impl AppOptions {
    /// Merge a partial update key-by-key. Named fields present in the patch
    /// replace the current value; `extra` keys are merged, never wholesale
    /// replaced.
    pub fn merge(&mut self, patch: OptionsUpdate) {
        if let Some(host) = patch.host {
            self.host = host;
        }
        if let Some(port) = patch.port {
            self.port = port;
        }
        if let Some(scheme) = patch.scheme {
            self.scheme = scheme;
        }
        if let Some(use_tls) = patch.use_tls {
            self.use_tls = use_tls;
        }
        if let Some(ping_interval) = patch.ping_interval {
            self.ping_interval = ping_interval;
        }
        if let Some(activity_timeout) = patch.activity_timeout {
            self.activity_timeout = activity_timeout;
        }
        self.extra.extend(patch.extra);
    }
}

/// A configured application. `id` and `key` are unique across the active
/// set; `secret` is sensitive and excluded from [`ApplicationSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: String,
    pub key: String,
    pub secret: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default)]
    pub enable_client_messages: bool,
    #[serde(default)]
    pub max_connections: Option<u32>,
    #[serde(default = "default_max_message_size")]
    pub max_message_size: u32,
    #[serde(default)]
    pub options: AppOptions,
}

impl ApplicationRecord {
    /// Build a fresh record with generated credentials: uuid id, 32-hex key,
    /// 64-hex secret.
    pub fn provision(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            key: Uuid::new_v4().simple().to_string(),
            secret: format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple()),
            name: name.into(),
            allowed_origins: default_allowed_origins(),
            enable_client_messages: false,
            max_connections: None,
            max_message_size: default_max_message_size(),
            options: AppOptions::default(),
        }
    }

    /// Field-level merge: unspecified fields are retained, `options` is
    /// merged key-by-key. The id is never touched.
    pub fn apply(&mut self, update: ApplicationUpdate) {
        if let Some(key) = update.key {
            self.key = key;
        }
        if let Some(secret) = update.secret {
            self.secret = secret;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(allowed_origins) = update.allowed_origins {
            self.allowed_origins = allowed_origins;
        }
        if let Some(enable_client_messages) = update.enable_client_messages {
            self.enable_client_messages = enable_client_messages;
        }
        if let Some(max_connections) = update.max_connections {
            self.max_connections = max_connections;
        }
        if let Some(max_message_size) = update.max_message_size {
            self.max_message_size = max_message_size;
        }
        if let Some(options) = update.options {
            self.options.merge(options);
        }
    }

    /// View safe for list/show responses: everything except the secret.
    pub fn summary(&self) -> ApplicationSummary {
        ApplicationSummary {
            id: self.id.clone(),
            key: self.key.clone(),
            name: self.name.clone(),
            allowed_origins: self.allowed_origins.clone(),
            enable_client_messages: self.enable_client_messages,
            max_connections: self.max_connections,
            max_message_size: self.max_message_size,
            options: self.options.clone(),
        }
    }
}

/// Redacted application view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSummary {
    pub id: String,
    pub key: String,
    pub name: String,
    pub allowed_origins: Vec<String>,
    pub enable_client_messages: bool,
    pub max_connections: Option<u32>,
    pub max_message_size: u32,
    pub options: AppOptions,
}

/// Partial update for a record. A missing field means "leave untouched";
/// `max_connections` distinguishes missing from an explicit null (clear).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationUpdate {
    pub key: Option<String>,
    pub secret: Option<String>,
    pub name: Option<String>,
    pub allowed_origins: Option<Vec<String>>,
    pub enable_client_messages: Option<bool>,
    #[serde(default, with = "double_option")]
    pub max_connections: Option<Option<u32>>,
    pub max_message_size: Option<u32>,
    pub options: Option<OptionsUpdate>,
}

/// Partial update for [`AppOptions`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionsUpdate {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub scheme: Option<Scheme>,
    #[serde(rename = "useTLS")]
    pub use_tls: Option<bool>,
    pub ping_interval: Option<u32>,
    pub activity_timeout: Option<u32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Deserialize `Option<Option<T>>` so an absent field stays `None` while an
/// explicit `null` becomes `Some(None)`.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
