//! 版本模块：版本号值类型与版本提取
pub mod version_number;
pub mod version_extractor;
pub mod version_parser;

// 导出核心接口
pub use self::version_number::VersionNumber;
pub use self::version_extractor::VersionExtractor;
