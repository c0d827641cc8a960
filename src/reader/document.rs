//! 数据源文档结构
//! 实体与模式均以 ID 互相引用，模式正则为 Perl 写法（`/正文/修饰符`）

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{RsuError, RsuResult};
use crate::model::{
    BrowserOperatingSystemMapping, BrowserRecord, BrowserType, Data, DataBuilder, Device, OperatingSystem, Pattern,
    Robot,
};

/// 模式记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRecord {
    pub id: u32,
    /// 所属实体 ID，兼容 `browser_id` / `operating_system_id` / `device_id` 写法
    #[serde(alias = "browser_id", alias = "operating_system_id", alias = "device_id")]
    pub owner_id: u32,
    pub position: u32,
    pub regex: String,
}

impl PatternRecord {
    pub fn new(id: u32, owner_id: u32, position: u32, regex: impl Into<String>) -> Self {
        Self { id, owner_id, position, regex: regex.into() }
    }

    fn compile(&self) -> RsuResult<Pattern> {
        Pattern::from_perl(self.id, self.owner_id, self.position, &self.regex)
    }
}

/// 完整的数据源文档
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataDocument {
    pub version: String,
    pub browser_types: Vec<BrowserType>,
    pub browsers: Vec<BrowserRecord>,
    pub browser_patterns: Vec<PatternRecord>,
    pub operating_systems: Vec<OperatingSystem>,
    pub operating_system_patterns: Vec<PatternRecord>,
    pub browser_operating_system_mappings: Vec<BrowserOperatingSystemMapping>,
    pub robots: Vec<Robot>,
    pub devices: Vec<Device>,
    pub device_patterns: Vec<PatternRecord>,
}

impl DataDocument {
    pub fn new(version: impl Into<String>) -> Self {
        Self { version: version.into(), ..Self::default() }
    }

    /// 序列化为 JSON 字节
    pub fn to_json_bytes(&self) -> RsuResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// 序列化为 MessagePack 字节（带字段名）
    pub fn to_msgpack_bytes(&self) -> RsuResult<Vec<u8>> {
        rmp_serde::to_vec_named(self).map_err(|e| RsuError::MsgPackError(format!("序列化失败：{}", e)))
    }

    /// 编译所有正则并生成数据快照
    ///
    /// 无法转换或编译的模式会被跳过并记录告警，其余内容照常构建。
    pub fn into_data(self) -> Data {
        let mut builder = DataBuilder::new(self.version);

        for browser_type in self.browser_types {
            builder = builder.browser_type(browser_type);
        }
        for browser in self.browsers {
            builder = builder.browser(browser);
        }
        for operating_system in self.operating_systems {
            builder = builder.operating_system(operating_system);
        }
        for mapping in self.browser_operating_system_mappings {
            builder = builder.browser_os_mapping(mapping);
        }
        for robot in self.robots {
            builder = builder.robot(robot);
        }
        for device in self.devices {
            builder = builder.device(device);
        }

        for pattern in compile_all(&self.browser_patterns, "浏览器") {
            builder = builder.browser_pattern(pattern);
        }
        for pattern in compile_all(&self.operating_system_patterns, "操作系统") {
            builder = builder.operating_system_pattern(pattern);
        }
        for pattern in compile_all(&self.device_patterns, "设备") {
            builder = builder.device_pattern(pattern);
        }

        builder.build()
    }
}

fn compile_all(records: &[PatternRecord], kind: &str) -> Vec<Pattern> {
    records
        .iter()
        .filter_map(|record| match record.compile() {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("跳过无效的{}模式 {}（{}）：{}", kind, record.id, record.regex, e);
                None
            }
        })
        .collect()
}
