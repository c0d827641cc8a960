//! 数据快照中的实体定义
//! 实体构造后不可变，由 [`DataBuilder`](super::DataBuilder) 一次性完成外键解析

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::vocabulary::{Category, Family};
use crate::error::RsuResult;
use crate::utils::RegexConverter;

/// 已编译的匹配模式
///
/// 同类模式按 `(position, 正则正文, 修饰符)` 全序排列，匹配时取第一个命中项；
/// 正文相同时无修饰符的模式排在前面。
#[derive(Debug, Clone)]
pub struct Pattern {
    pub id: u32,
    /// 所属实体 ID（浏览器/操作系统/设备）
    pub owner_id: u32,
    pub position: u32,
    pub regex: Regex,
    body: String,
    flags: String,
}

impl Pattern {
    pub fn new(id: u32, owner_id: u32, position: u32, regex: Regex) -> Self {
        let (body, flags) = RegexConverter::split_inline_flags(regex.as_str());
        let (body, flags) = (body.to_string(), flags.to_string());
        Self { id, owner_id, position, regex, body, flags }
    }

    /// 由 Perl 风格正则（`/正文/修饰符`）创建，忽略不支持的修饰符
    pub fn from_perl(id: u32, owner_id: u32, position: u32, perl_regex: &str) -> RsuResult<Self> {
        let regex = RegexConverter::convert_perl_regex_tolerant(perl_regex)?;
        Ok(Self::new(id, owner_id, position, regex))
    }

    pub fn pattern_text(&self) -> &str {
        self.regex.as_str()
    }

    /// 不含内联修饰符的正则正文
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    fn sort_key(&self) -> (u32, &str, &str, u32, u32) {
        (self.position, &self.body, &self.flags, self.id, self.owner_id)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for Pattern {}

impl Ord for Pattern {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Pattern {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}

/// 浏览器类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrowserType {
    pub id: u32,
    pub name: String,
}

/// 操作系统
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OperatingSystem {
    pub id: u32,
    #[serde(skip)]
    pub family: Family,
    pub family_name: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub info_url: String,
    #[serde(default)]
    pub producer: String,
    #[serde(default)]
    pub producer_url: String,
    #[serde(default)]
    pub url: String,
}

/// 数据源中的浏览器记录（类型与操作系统尚未解析）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserRecord {
    pub id: u32,
    pub type_id: u32,
    pub family_name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub info_url: String,
    #[serde(default)]
    pub producer: String,
    #[serde(default)]
    pub producer_url: String,
    #[serde(default)]
    pub url: String,
}

/// 已解析的浏览器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Browser {
    pub id: u32,
    pub family: Family,
    pub family_name: String,
    pub browser_type: BrowserType,
    /// 静态映射的操作系统（映射目标不存在时为 None）
    pub operating_system: Option<Arc<OperatingSystem>>,
    pub icon: String,
    pub info_url: String,
    pub producer: String,
    pub producer_url: String,
    pub url: String,
}

impl Browser {
    /// 由记录与已解析的外键创建
    pub fn resolve(
        record: &BrowserRecord,
        browser_type: BrowserType,
        operating_system: Option<Arc<OperatingSystem>>,
    ) -> Self {
        Self {
            id: record.id,
            family: Family::evaluate(&record.family_name),
            family_name: record.family_name.clone(),
            browser_type,
            operating_system,
            icon: record.icon.clone(),
            info_url: record.info_url.clone(),
            producer: record.producer.clone(),
            producer_url: record.producer_url.clone(),
            url: record.url.clone(),
        }
    }
}

/// 浏览器到操作系统的静态映射
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BrowserOperatingSystemMapping {
    pub browser_id: u32,
    pub operating_system_id: u32,
}

/// 爬虫（按完整 User-Agent 字面值匹配）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Robot {
    pub id: u32,
    #[serde(skip)]
    pub family: Family,
    pub family_name: String,
    pub name: String,
    pub user_agent_string: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub info_url: String,
    #[serde(default)]
    pub producer: String,
    #[serde(default)]
    pub producer_url: String,
}

/// 设备
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Device {
    pub id: u32,
    pub name: String,
    #[serde(skip)]
    pub category: Category,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub info_url: String,
}

impl OperatingSystem {
    /// 根据名称补全家族标识
    pub(crate) fn normalized(mut self) -> Self {
        self.family = Family::evaluate(&self.family_name);
        self
    }
}

impl Robot {
    pub(crate) fn normalized(mut self) -> Self {
        self.family = Family::evaluate(&self.family_name);
        self
    }
}

impl Device {
    pub(crate) fn normalized(mut self) -> Self {
        self.category = Category::evaluate(&self.name);
        self
    }
}
