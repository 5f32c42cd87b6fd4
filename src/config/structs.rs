use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{ChatcasterError, Result};

/// Messenger backends understood by `messenger::build_connector`
pub const MESSENGER_BACKENDS: &[&str] = &["tdjson_bridge", "memory"];

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 服务器地址、端口、worker 数量
/// - messenger: 消息客户端后端及其凭据
/// - storage: 列表存储文件位置
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub messenger: MessengerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：CC，分隔符：__
    /// 示例：CC__SERVER__PORT=9999
    pub fn try_load_from(path: &str) -> Result<Self> {
        use config::{Config, Environment, File, FileFormat};

        let settings = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::new(path, FileFormat::Toml).required(false))
            // 2. 从环境变量覆盖，前缀 CC，分隔符 __
            .add_source(
                Environment::with_prefix("CC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: StaticConfig = settings.try_deserialize()?;
        config.messenger.apply_legacy_env();
        Ok(config)
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ChatcasterError::serialization(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ChatcasterError::config("server.port must not be 0"));
        }
        if self.messenger.chat_limit == 0 {
            return Err(ChatcasterError::config(
                "messenger.chat_limit must be at least 1",
            ));
        }
        if !MESSENGER_BACKENDS.contains(&self.messenger.backend.as_str()) {
            return Err(ChatcasterError::config(format!(
                "Unknown messenger backend '{}'. Valid: {}",
                self.messenger.backend,
                MESSENGER_BACKENDS.join(", ")
            )));
        }
        if self.storage.settings_file.trim().is_empty() {
            return Err(ChatcasterError::config(
                "storage.settings_file must not be empty",
            ));
        }
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 消息客户端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessengerConfig {
    /// "tdjson_bridge" or "memory"
    #[serde(default = "default_messenger_backend")]
    pub backend: String,
    #[serde(default)]
    pub api_id: i32,
    #[serde(default)]
    pub api_hash: String,
    #[serde(default = "default_bridge_url")]
    pub bridge_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_log_verbosity")]
    pub log_verbosity: i32,
    /// Maximum number of chats fetched for the logged-in user
    #[serde(default = "default_chat_limit")]
    pub chat_limit: usize,
    #[serde(default = "default_chat_cache_ttl")]
    pub chat_cache_ttl_secs: u64,
    #[serde(default = "default_chat_cache_capacity")]
    pub chat_cache_capacity: u64,
    /// Login code accepted by the memory backend
    #[serde(default = "default_demo_code")]
    pub demo_code: String,
}

impl MessengerConfig {
    /// `API_ID` / `API_HASH` fill in credentials left unset by config.toml
    fn apply_legacy_env(&mut self) {
        if self.api_id == 0
            && let Some(id) = std::env::var("API_ID").ok().and_then(|v| v.parse().ok())
        {
            self.api_id = id;
        }
        if self.api_hash.is_empty()
            && let Ok(hash) = std::env::var("API_HASH")
        {
            self.api_hash = hash;
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_settings_file")]
    pub settings_file: String,
}

impl StorageConfig {
    pub fn settings_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.settings_file)
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_messenger_backend() -> String {
    "tdjson_bridge".to_string()
}

fn default_bridge_url() -> String {
    "http://127.0.0.1:8081".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_verbosity() -> i32 {
    2
}

fn default_chat_limit() -> usize {
    100
}

fn default_chat_cache_ttl() -> u64 {
    600
}

fn default_chat_cache_capacity() -> u64 {
    10_000
}

fn default_demo_code() -> String {
    "12345".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_settings_file() -> String {
    "settings.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            backend: default_messenger_backend(),
            api_id: 0,
            api_hash: String::new(),
            bridge_url: default_bridge_url(),
            request_timeout_secs: default_request_timeout(),
            log_verbosity: default_log_verbosity(),
            chat_limit: default_chat_limit(),
            chat_cache_ttl_secs: default_chat_cache_ttl(),
            chat_cache_capacity: default_chat_cache_capacity(),
            demo_code: default_demo_code(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            settings_file: default_settings_file(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = StaticConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.messenger.chat_limit, 100);
        assert_eq!(
            config.storage.settings_path(),
            PathBuf::from("data").join("settings.json")
        );
    }

    #[test]
    fn test_validate_rejects_unknown_backend() {
        let mut config = StaticConfig::default();
        config.messenger.backend = "carrier-pigeon".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.message().contains("carrier-pigeon"));
    }

    #[test]
    fn test_sample_config_round_trips_through_toml() {
        let sample = StaticConfig::generate_sample_config();
        let parsed: StaticConfig = toml::from_str(&sample).expect("sample config parses");
        assert_eq!(parsed.messenger.backend, "tdjson_bridge");
        assert_eq!(parsed.storage.settings_file, "settings.json");
    }
}
