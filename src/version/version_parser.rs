//! 版本号文本解析
//! 操作系统模式通常不带捕获分组，这里按操作系统家族从 User-Agent 中直接提取版本号

use once_cell::sync::Lazy;
use regex::Regex;

use super::VersionNumber;
use crate::model::Family;

/// 任意一段「数字(.数字)*」
static VERSION_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)*").unwrap());

static WINDOWS_NT: Lazy<Regex> = Lazy::new(|| Regex::new(r"Windows NT\s?(\d+(?:\.\d+)*)").unwrap());
static ANDROID: Lazy<Regex> = Lazy::new(|| Regex::new(r"Android\s?(\d+(?:\.\d+)*)").unwrap());
static IOS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:iPhone|CPU) OS\s?(\d+(?:_\d+)*)").unwrap());
static MAC_OS_X: Lazy<Regex> = Lazy::new(|| Regex::new(r"Mac OS X\s?(\d+(?:[_.]\d+)*)").unwrap());
static BSD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\w*bsd\s?(\d+(?:\.\d+)*)").unwrap());
static SYMBIAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"SymbianOS/(\d+(?:\.\d+)*)").unwrap());
static WEBOS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)web\s?OS/(\d+(?:\.\d+)*)").unwrap());

impl VersionNumber {
    /// 取文本中最后一段「数字(.数字)*」作为版本号，不含数字时返回未知版本
    ///
    /// `"Linux 2.6.32 i686 1.2"` 解析为 `1.2`。
    pub fn parse_last_version_number(text: &str) -> Self {
        VERSION_RUNS
            .find_iter(text)
            .last()
            .map(|run| Self::split_groups(run.as_str(), '.'))
            .unwrap_or_else(Self::unknown)
    }

    /// 按操作系统家族从 User-Agent 中提取版本号
    ///
    /// 支持 Windows NT、Android、iOS 与 Mac OS X（`_` 分隔）、BSD、Symbian、webOS，其余家族返回未知版本。
    pub fn parse_operating_system_version(family: &Family, user_agent: &str) -> Self {
        let key = family.as_str();
        let (pattern, separator): (&Regex, char) = if key.starts_with("WINDOWS") {
            (&*WINDOWS_NT, '.')
        } else if key.starts_with("ANDROID") {
            (&*ANDROID, '.')
        } else if key == "IOS" || key.starts_with("IPHONE") {
            (&*IOS, '_')
        } else if key.starts_with("MAC_OS") || key.starts_with("OS_X") {
            return MAC_OS_X
                .captures(user_agent)
                .and_then(|caps| caps.get(1))
                .map(|run| Self::split_groups(&run.as_str().replace('_', "."), '.'))
                .unwrap_or_else(Self::unknown);
        } else if key.contains("BSD") {
            (&*BSD, '.')
        } else if key.starts_with("SYMBIAN") {
            (&*SYMBIAN, '.')
        } else if key.starts_with("WEBOS") || key.starts_with("PALM") {
            (&*WEBOS, '.')
        } else {
            return Self::unknown();
        };

        pattern
            .captures(user_agent)
            .and_then(|caps| caps.get(1))
            .map(|run| Self::split_groups(run.as_str(), separator))
            .unwrap_or_else(Self::unknown)
    }

    /// 已校验为纯数字的分组文本
    fn split_groups(run: &str, separator: char) -> Self {
        Self::from_groups(run.split(separator)).unwrap_or_else(|_| Self::unknown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os_version(family: &str, user_agent: &str) -> String {
        VersionNumber::parse_operating_system_version(&Family::evaluate(family), user_agent).to_version_string()
    }

    #[test]
    fn test_parse_last_version_number() {
        assert_eq!(VersionNumber::parse_last_version_number("Linux 2.6.32 i686 1.2").to_version_string(), "1.2");
        assert_eq!(VersionNumber::parse_last_version_number("Version 10").major(), "10");
        assert!(VersionNumber::parse_last_version_number("no digits").is_unknown());
    }

    #[test]
    fn test_windows_nt() {
        assert_eq!(os_version("Windows", "Mozilla/5.0 (Windows NT 6.1; WOW64)"), "6.1");
        assert_eq!(os_version("Windows", "Mozilla/4.0 (compatible; MSIE 6.0; Windows 98)"), "");
    }

    #[test]
    fn test_ios_and_mac_os_x_underscores() {
        assert_eq!(
            os_version("iOS", "Mozilla/5.0 (iPhone; CPU iPhone OS 6_0_1 like Mac OS X) AppleWebKit/536.26"),
            "6.0.1"
        );
        assert_eq!(os_version("iOS", "Mozilla/5.0 (iPad; CPU OS 5_1 like Mac OS X)"), "5.1");
        assert_eq!(os_version("Mac OS X", "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_8_2)"), "10.8.2");
        assert_eq!(os_version("Mac OS X", "Mozilla/5.0 (Macintosh; PPC Mac OS X 10.5; rv:10.0)"), "10.5");
    }

    #[test]
    fn test_android() {
        assert_eq!(os_version("Android", "Mozilla/5.0 (Linux; U; Android 4.0.3; de-de; GT-I9100)"), "4.0.3");
        assert_eq!(os_version("Android", "Mozilla/5.0 (Linux; Android; Nexus)"), "");
    }

    #[test]
    fn test_other_families() {
        assert_eq!(os_version("FreeBSD", "Mozilla/5.0 (X11; FreeBSD 9.0 amd64)"), "9.0");
        assert_eq!(os_version("Symbian OS", "Nokia5800/SymbianOS/9.4; Series60/5.0"), "9.4");
        assert_eq!(os_version("webOS", "Mozilla/5.0 (webOS/2.1.0; U; en-US)"), "2.1.0");
        assert_eq!(os_version("Linux", "Mozilla/5.0 (X11; Linux 2.6.32)"), "");
    }
}
