//! rsuadetector - 基于有序正则模式库的 User-Agent 识别引擎，支持后台更新与本地缓存

// 导出全局错误类型
pub use self::error::{RsuError, RsuResult};

// 导出配置模块
pub use self::config::{Charset, GlobalConfig, ConfigManager, CustomConfigBuilder};

// 导出工具模块核心接口
pub use self::utils::{NaturalOrderComparator, RegexConverter, UrlReader};

// 导出版本模块核心接口
pub use self::version::{VersionNumber, VersionExtractor};

// 导出数据模型
pub use self::model::{
    Family, UserAgentType, Category, Pattern, BrowserType, BrowserRecord, Browser,
    BrowserOperatingSystemMapping, OperatingSystem, Robot, Device, Data, DataBuilder
};

// 导出读取模块核心接口
pub use self::reader::{DataReader, JsonDataReader, DataFormat, DataDocument, PatternRecord};

// 导出解析模块核心接口
pub use self::parser::{
    UserAgent, OperatingSystemInfo, DeviceCategory, UserAgentClassifier, ClassifierOptions,
    UserAgentStringParser, UpdatingUserAgentStringParser
};

// 导出数据源模块核心接口
pub use self::store::{
    DataStore, RefreshableStore, SnapshotHolder, StaticDataStore, RefreshableDataStore,
    UpdateOperation, UpdateOutcome, CacheFile, FileOps, StdFileOps, CachingDataStore
};

// 导出后台服务
pub use self::service::UpdateService;

// 声明所有子模块
pub mod config;
pub mod error;
pub mod utils;
pub mod version;
pub mod model;
pub mod reader;
pub mod parser;
pub mod store;
pub mod service;
