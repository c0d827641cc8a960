//! Perl 风格正则转换工具
//! 数据源中的模式以 `/正文/修饰符` 的形式书写（如 `/^Eudora?/si`），
//! 转换时修饰符以内联分组 `(?si)` 的形式写回正则，保证正则文本即可唯一描述一个模式

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{RsuError, RsuResult};

/// 解析 `/正文/修饰符` 结构（正文贪婪匹配到最后一个 `/`，允许尾随空白）
static PERL_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^/(.*)/([A-Za-z]*)\s*$").unwrap()
});

/// 识别转换时写入的内联修饰符前缀
static INLINE_FLAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\(\?([imsx]+)\)(.*)$").unwrap()
});

/// 支持的修饰符
const SUPPORTED_FLAGS: &[char] = &['i', 'm', 's', 'x'];

/// Perl 正则转换器
pub struct RegexConverter;

impl RegexConverter {
    /// 严格模式转换：出现不支持的修饰符时报错
    pub fn convert_perl_regex(perl_regex: &str) -> RsuResult<Regex> {
        Self::convert(perl_regex, false)
    }

    /// 容错模式转换：忽略不支持的修饰符（如 `/Nintendo DS/Si` 中的 `S`）
    pub fn convert_perl_regex_tolerant(perl_regex: &str) -> RsuResult<Regex> {
        Self::convert(perl_regex, true)
    }

    /// 将转换后的正则还原为 Perl 写法
    pub fn to_perl_regex(regex: &Regex) -> String {
        match INLINE_FLAGS.captures(regex.as_str()) {
            Some(caps) => format!("/{}/{}", &caps[2], &caps[1]),
            None => format!("/{}/", regex.as_str()),
        }
    }

    /// 拆分转换后的正则文本为 `(正文, 修饰符)`，无内联修饰符时修饰符为空
    pub fn split_inline_flags(pattern: &str) -> (&str, &str) {
        match INLINE_FLAGS.captures(pattern) {
            Some(caps) => match (caps.get(2), caps.get(1)) {
                (Some(body), Some(flags)) => (body.as_str(), flags.as_str()),
                _ => (pattern, ""),
            },
            None => (pattern, ""),
        }
    }

    fn convert(perl_regex: &str, fault_tolerant: bool) -> RsuResult<Regex> {
        let caps = PERL_STYLE.captures(perl_regex).ok_or_else(|| {
            RsuError::RegexConvertError(format!("不是合法的 Perl 风格正则：{}", perl_regex))
        })?;
        let body = &caps[1];

        let mut flags = String::new();
        for flag in caps[2].chars() {
            if SUPPORTED_FLAGS.contains(&flag) {
                if !flags.contains(flag) {
                    flags.push(flag);
                }
            } else if !fault_tolerant {
                return Err(RsuError::RegexConvertError(format!(
                    "不支持的修饰符 '{}'：{}",
                    flag, perl_regex
                )));
            }
        }

        let pattern = if flags.is_empty() {
            body.to_string()
        } else {
            format!("(?{}){}", flags, body)
        };
        Ok(Regex::new(&pattern)?)
    }
}
