//! 全局配置管理,存储所有可配置项
//! 所有配置仅在构造阶段传入，核心逻辑不读取任何环境变量

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{RsuError, RsuResult};

/// 数据源字符集
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Charset {
    #[default]
    Utf8,
    /// ISO-8859-1，每个字节对应一个 Unicode 码位
    Latin1,
}

impl Charset {
    /// 按名称解析字符集（大小写不敏感）
    pub fn from_label(label: &str) -> RsuResult<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "iso-8859-1" | "latin1" | "latin-1" => Ok(Self::Latin1),
            other => Err(RsuError::invalid_argument("charset", format!("不支持的字符集：{}", other))),
        }
    }

    /// 按字符集解码字节
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8 => write!(f, "UTF-8"),
            Self::Latin1 => write!(f, "ISO-8859-1"),
        }
    }
}

/// 全局配置
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    // 数据文件地址
    pub data_url: Url,
    // 版本号地址
    pub version_url: Url,
    // 数据源字符集
    pub charset: Charset,
    // 本地缓存文件路径（None 表示不落盘）
    pub cache_path: Option<PathBuf>,
    // 请求驱动的更新检查间隔
    pub update_interval: Duration,
    // 读取超时
    pub http_timeout: Duration,
    // 连接超时
    pub connect_timeout: Duration,
    // 后台线程数
    pub worker_threads: usize,
    // 关闭线程池时的优雅等待时间
    pub shutdown_grace: Duration,
}

impl GlobalConfig {
    /// 默认更新间隔：1天
    pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
    pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
    pub const DEFAULT_WORKER_THREADS: usize = 2;
    pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 自定义配置（数据地址与版本地址必填）
    pub fn custom(data_url: Url, version_url: Url) -> CustomConfigBuilder {
        CustomConfigBuilder::new(data_url, version_url)
    }

    /// 从字符串地址创建配置构建器
    pub fn parse(data_url: &str, version_url: &str) -> RsuResult<CustomConfigBuilder> {
        Ok(CustomConfigBuilder::new(Url::parse(data_url)?, Url::parse(version_url)?))
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone)]
pub struct CustomConfigBuilder {
    config: GlobalConfig,
}

impl CustomConfigBuilder {
    pub fn new(data_url: Url, version_url: Url) -> Self {
        Self {
            config: GlobalConfig {
                data_url,
                version_url,
                charset: Charset::default(),
                cache_path: None,
                update_interval: GlobalConfig::DEFAULT_UPDATE_INTERVAL,
                http_timeout: GlobalConfig::DEFAULT_HTTP_TIMEOUT,
                connect_timeout: GlobalConfig::DEFAULT_CONNECT_TIMEOUT,
                worker_threads: GlobalConfig::DEFAULT_WORKER_THREADS,
                shutdown_grace: GlobalConfig::DEFAULT_SHUTDOWN_GRACE,
            },
        }
    }

    pub fn charset(mut self, charset: Charset) -> Self {
        self.config.charset = charset;
        self
    }

    pub fn cache_path(mut self, path: PathBuf) -> Self {
        self.config.cache_path = Some(path);
        self
    }

    pub fn update_interval(mut self, interval: Duration) -> Self {
        self.config.update_interval = interval;
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn worker_threads(mut self, threads: usize) -> Self {
        self.config.worker_threads = threads;
        self
    }

    pub fn shutdown_grace(mut self, grace: Duration) -> Self {
        self.config.shutdown_grace = grace;
        self
    }

    /// 校验并生成配置
    pub fn build(self) -> RsuResult<GlobalConfig> {
        let config = self.config;
        if config.worker_threads == 0 {
            return Err(RsuError::invalid_argument("worker_threads", "后台线程数必须大于0"));
        }
        if config.http_timeout.is_zero() {
            return Err(RsuError::invalid_argument("http_timeout", "超时时间必须大于0"));
        }
        if config.connect_timeout.is_zero() {
            return Err(RsuError::invalid_argument("connect_timeout", "超时时间必须大于0"));
        }
        if config.update_interval.is_zero() {
            return Err(RsuError::invalid_argument("update_interval", "更新间隔必须大于0"));
        }
        Ok(config)
    }
}
