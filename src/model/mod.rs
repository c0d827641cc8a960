//! 数据模型：实体、识别词表与不可变数据快照
pub mod vocabulary;
pub mod domain;
pub mod data;

// 导出核心接口
pub use self::vocabulary::{Family, UserAgentType, Category};
pub use self::domain::{
    Pattern, BrowserType, BrowserRecord, Browser, BrowserOperatingSystemMapping,
    OperatingSystem, Robot, Device
};
pub use self::data::{Data, DataBuilder};
