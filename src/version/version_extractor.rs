//! 版本提取工具模块
//! 负责从正则捕获结果中提取版本号：只读取第一个捕获分组，
//! 模式未定义捕获分组或分组未参与匹配时返回未知版本（属于正常结果，不是错误）

use regex::Captures;

use super::VersionNumber;

/// 版本提取工具类
pub struct VersionExtractor;

impl VersionExtractor {
    /// 从正则捕获结果中提取版本号
    pub fn extract(captures: &Captures) -> VersionNumber {
        captures
            .get(1)
            .map(|matched| matched.as_str().trim())
            .filter(|text| !text.is_empty())
            .map(VersionNumber::parse_version)
            .unwrap_or_else(VersionNumber::unknown)
    }
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_extract_first_group() {
        let regex = Regex::new(r"(?i)firefox/([\d.]+)").unwrap();
        let captures = regex.captures("Mozilla/5.0 Firefox/17.0.1").unwrap();

        let version = VersionExtractor::extract(&captures);
        assert_eq!(version.to_version_string(), "17.0.1");
    }

    #[test]
    fn test_extract_without_group() {
        // 模式没有捕获分组，版本为空
        let regex = Regex::new(r"(?si)^Eudora?").unwrap();
        let captures = regex.captures("Eudora/1.0").unwrap();

        let version = VersionExtractor::extract(&captures);
        assert!(version.is_unknown());
        assert_eq!(version.to_version_string(), "");
    }

    #[test]
    fn test_extract_group_not_participating() {
        let regex = Regex::new(r"nginx(?:/([\d.]+))?").unwrap();
        let captures = regex.captures("nginx").unwrap();

        assert!(VersionExtractor::extract(&captures).is_unknown());
    }

    #[test]
    fn test_extract_only_first_group() {
        let regex = Regex::new(r"(\w+)/v([\d.]+)").unwrap();
        let captures = regex.captures("rust/v1.75.0").unwrap();

        // 第一个分组不含数字
        assert!(VersionExtractor::extract(&captures).is_unknown());
    }
}
