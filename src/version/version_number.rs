//! 版本号值类型
//! 由若干数字分组（可为空）与自由格式的扩展后缀组成，至少保证 3 个分组

use std::cmp::Ordering;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{RsuError, RsuResult};
use crate::utils::NaturalOrderComparator;

/// 版本号中第一段连续的「数字(.数字)*」
static VERSION_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)*").unwrap());

/// 版本号
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionNumber {
    groups: Vec<String>,
    extension: String,
}

impl VersionNumber {
    /// 最少分组数（不足时以空分组补齐）
    pub const MIN_GROUP_SIZE: usize = 3;
    const SEPARATOR: char = '.';

    /// 未知版本：全部分组为空，扩展为空
    pub fn unknown() -> Self {
        Self {
            groups: vec![String::new(); Self::MIN_GROUP_SIZE],
            extension: String::new(),
        }
    }

    /// 创建版本号，非空分组必须全部为数字
    pub fn new<I, S>(groups: I, extension: impl Into<String>) -> RsuResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut groups: Vec<String> = groups.into_iter().map(Into::into).collect();
        for (index, group) in groups.iter().enumerate() {
            if !group.is_empty() && !group.bytes().all(|b| b.is_ascii_digit()) {
                return Err(RsuError::InvalidVersionGroup { index, group: group.clone() });
            }
        }
        while groups.len() < Self::MIN_GROUP_SIZE {
            groups.push(String::new());
        }
        Ok(Self { groups, extension: extension.into() })
    }

    /// 仅由分组创建（无扩展）
    pub fn from_groups<I, S>(groups: I) -> RsuResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(groups, "")
    }

    /// 从文本中解析版本号：第一段「数字(.数字)*」作为分组，其后内容作为扩展
    ///
    /// `"1.0.3-beta"` 解析为分组 `[1, 0, 3]`、扩展 `"-beta"`；不含数字时返回 [`VersionNumber::unknown`]。
    pub fn parse_version(text: &str) -> Self {
        let Some(run) = VERSION_RUN.find(text) else {
            return Self::unknown();
        };
        let mut groups: Vec<String> = run.as_str().split(Self::SEPARATOR).map(str::to_string).collect();
        while groups.len() < Self::MIN_GROUP_SIZE {
            groups.push(String::new());
        }
        Self {
            groups,
            extension: text[run.end()..].trim_end().to_string(),
        }
    }

    pub fn major(&self) -> &str {
        &self.groups[0]
    }

    pub fn minor(&self) -> &str {
        &self.groups[1]
    }

    pub fn bugfix(&self) -> &str {
        &self.groups[2]
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn is_unknown(&self) -> bool {
        self.extension.is_empty() && self.groups.iter().all(String::is_empty)
    }

    /// 点分形式（遇到第一个空分组即停止）加扩展
    pub fn to_version_string(&self) -> String {
        let mut rendered = self
            .groups
            .iter()
            .take_while(|group| !group.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(".");
        rendered.push_str(&self.extension);
        rendered
    }
}

impl Default for VersionNumber {
    fn default() -> Self {
        Self::unknown()
    }
}

impl Ord for VersionNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        for (left, right) in self.groups.iter().zip(other.groups.iter()) {
            let result = NaturalOrderComparator::compare_str(left, right);
            if result != Ordering::Equal {
                return result;
            }
        }
        self.groups
            .len()
            .cmp(&other.groups.len())
            .then_with(|| self.extension.cmp(&other.extension))
            .then_with(|| {
                NaturalOrderComparator::compare_str(&self.to_version_string(), &other.to_version_string())
            })
    }
}

impl PartialOrd for VersionNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_version_string())
    }
}
