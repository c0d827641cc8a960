//! 识别结果使用的枚举与标识
//! 均由数据源中的名称推导，无法识别的名称统一落到 UNKNOWN

use std::fmt;

use serde::{Deserialize, Serialize};

/// 家族标识（浏览器、爬虫与操作系统共用）
///
/// 由名称归一化得到：字母数字转大写，其余字符合并为单个下划线，
/// 如 `"Internet Explorer"` → `INTERNET_EXPLORER`。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Family(String);

impl Family {
    pub const UNKNOWN: &'static str = "UNKNOWN";

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    /// 由名称推导家族标识
    pub fn evaluate(name: &str) -> Self {
        let mut key = String::with_capacity(name.len());
        let mut pending_separator = false;
        for c in name.chars() {
            if c.is_alphanumeric() {
                if pending_separator && !key.is_empty() {
                    key.push('_');
                }
                pending_separator = false;
                key.extend(c.to_uppercase());
            } else {
                pending_separator = true;
            }
        }
        if key.is_empty() {
            Self::unknown()
        } else {
            Self(key)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }
}

impl Default for Family {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for Family {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// User-Agent 类型（由浏览器类型名称推导）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UserAgentType {
    Browser,
    EmailClient,
    FeedReader,
    Library,
    MediaPlayer,
    MobileBrowser,
    OfflineBrowser,
    Other,
    Robot,
    UseragentAnonymizer,
    Validator,
    WapBrowser,
    #[default]
    Unknown,
}

impl UserAgentType {
    const ALL: [UserAgentType; 12] = [
        Self::Browser,
        Self::EmailClient,
        Self::FeedReader,
        Self::Library,
        Self::MediaPlayer,
        Self::MobileBrowser,
        Self::OfflineBrowser,
        Self::Other,
        Self::Robot,
        Self::UseragentAnonymizer,
        Self::Validator,
        Self::WapBrowser,
    ];

    /// 数据源中的类型名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Browser => "Browser",
            Self::EmailClient => "Email client",
            Self::FeedReader => "Feed Reader",
            Self::Library => "Library",
            Self::MediaPlayer => "Multimedia Player",
            Self::MobileBrowser => "Mobile Browser",
            Self::OfflineBrowser => "Offline Browser",
            Self::Other => "Other",
            Self::Robot => "Robot",
            Self::UseragentAnonymizer => "Useragent Anonymizer",
            Self::Validator => "Validator",
            Self::WapBrowser => "Wap Browser",
            Self::Unknown => "",
        }
    }

    /// 按名称推导类型（大小写不敏感）
    pub fn evaluate(type_name: &str) -> Self {
        let type_name = type_name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(type_name))
            .unwrap_or(Self::Unknown)
    }
}

/// 设备类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    GameConsole,
    Other,
    Pda,
    PersonalComputer,
    SmartTv,
    Smartphone,
    Tablet,
    #[default]
    Unknown,
}

impl Category {
    const ALL: [Category; 7] = [
        Self::GameConsole,
        Self::Other,
        Self::Pda,
        Self::PersonalComputer,
        Self::SmartTv,
        Self::Smartphone,
        Self::Tablet,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::GameConsole => "Game console",
            Self::Other => "Other",
            Self::Pda => "PDA",
            Self::PersonalComputer => "Personal computer",
            Self::SmartTv => "Smart TV",
            Self::Smartphone => "Smartphone",
            Self::Tablet => "Tablet",
            Self::Unknown => "unknown",
        }
    }

    /// 按名称推导类别（大小写不敏感）
    pub fn evaluate(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(name))
            .unwrap_or(Self::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_evaluate() {
        assert_eq!(Family::evaluate("Eudora"), "EUDORA");
        assert_eq!(Family::evaluate("Internet Explorer"), "INTERNET_EXPLORER");
        assert_eq!(Family::evaluate("  Mac OS X "), "MAC_OS_X");
        assert_eq!(Family::evaluate("Opera Mini/Mobile"), "OPERA_MINI_MOBILE");
        assert!(Family::evaluate("").is_unknown());
        assert!(Family::evaluate("--").is_unknown());
    }

    #[test]
    fn test_user_agent_type_evaluate() {
        assert_eq!(UserAgentType::evaluate("Browser"), UserAgentType::Browser);
        assert_eq!(UserAgentType::evaluate("email client"), UserAgentType::EmailClient);
        assert_eq!(UserAgentType::evaluate("whatever"), UserAgentType::Unknown);
    }

    #[test]
    fn test_category_evaluate() {
        assert_eq!(Category::evaluate(Category::Tablet.name()), Category::Tablet);
        assert_eq!(Category::evaluate("smart tv"), Category::SmartTv);
        assert_eq!(Category::evaluate("unknown"), Category::Unknown);
        assert_eq!(Category::evaluate(""), Category::Unknown);
    }
}
