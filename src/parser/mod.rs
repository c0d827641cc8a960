//! 解析模块：匹配引擎与解析器入口
pub mod result;
pub mod classifier;
pub mod string_parser;

// 导出核心接口
pub use self::result::{UserAgent, OperatingSystemInfo, DeviceCategory};
pub use self::classifier::{UserAgentClassifier, ClassifierOptions};
pub use self::string_parser::{UserAgentStringParser, UpdatingUserAgentStringParser};
