use crate::error::{Result, SpeedTestError};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// Include the default domain list at compile time
const DOMAINS_JSON: &str = include_str!("../assets/domains.json");

pub const DEFAULT_PROBE_PATH: &str = "/test-img";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_STORAGE_KEY: &str = "speed_test_results";
pub const DEFAULT_BACKEND: &str = "file";

/// 测速配置
///
/// 对应配置文件 `~/.config/domspeed/config.toml`, 所有字段都可省略。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeedTestConfig {
    pub probe_path: String,
    pub timeout_ms: u64,
    pub storage_key: String,
    /// 同时进行的探测数量, 1 表示逐个顺序探测
    pub concurrency: usize,
    pub backend: String,
    pub domains: Vec<String>,
}

impl Default for SpeedTestConfig {
    fn default() -> Self {
        Self {
            probe_path: DEFAULT_PROBE_PATH.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            concurrency: 1,
            backend: DEFAULT_BACKEND.to_string(),
            domains: Vec::new(),
        }
    }
}

impl SpeedTestConfig {
    /// 失败探测使用的延迟值, 等于超时时间
    pub fn sentinel(&self) -> f64 {
        self.timeout_ms as f64
    }

    /// Parse a TOML document and normalize out-of-range values.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: SpeedTestConfig = toml::from_str(content)?;
        Ok(config.normalized())
    }

    pub fn normalized(mut self) -> Self {
        if self.timeout_ms == 0 {
            tracing::warn!(
                "timeout_ms must be positive, falling back to {}",
                DEFAULT_TIMEOUT_MS
            );
            self.timeout_ms = DEFAULT_TIMEOUT_MS;
        }
        if self.concurrency == 0 {
            tracing::warn!("concurrency must be at least 1, using 1");
            self.concurrency = 1;
        }
        if self.storage_key.trim().is_empty() {
            tracing::warn!("empty storage_key, using '{}'", DEFAULT_STORAGE_KEY);
            self.storage_key = DEFAULT_STORAGE_KEY.to_string();
        }
        self
    }

    /// 配置中的域名列表, 为空时使用内置列表
    pub fn candidates(&self) -> Vec<String> {
        if self.domains.is_empty() {
            builtin_domains()
        } else {
            self.domains.clone()
        }
    }
}

pub fn builtin_domains() -> Vec<String> {
    match serde_json::from_str(DOMAINS_JSON) {
        Ok(domains) => domains,
        Err(err) => {
            tracing::error!("assets/domains.json is invalid: {}", err);
            Vec::new()
        }
    }
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "domspeed")
}

/// 测速结果的默认存储目录
pub fn data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".").join(".domspeed"))
}

/// Load configuration
/// Strategy:
/// 1. Try to load from User Config (~/.config/domspeed/config.toml)
/// 2. Fallback to built-in defaults
pub fn load() -> SpeedTestConfig {
    match project_dirs() {
        Some(dirs) => load_from(&dirs.config_dir().join("config.toml")),
        None => SpeedTestConfig::default(),
    }
}

pub fn load_from(path: &Path) -> SpeedTestConfig {
    if !path.exists() {
        return SpeedTestConfig::default();
    }

    let parsed = std::fs::read_to_string(path)
        .map_err(SpeedTestError::from)
        .and_then(|content| SpeedTestConfig::from_toml(&content));

    match parsed {
        Ok(config) => {
            tracing::debug!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            tracing::warn!("Ignoring unreadable config {:?}: {}", path, err);
            SpeedTestConfig::default()
        }
    }
}
