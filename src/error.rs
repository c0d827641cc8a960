//! 全局错误类型定义

use thiserror::Error;
use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use std::path::PathBuf;
use url::ParseError as UrlParseError;

#[derive(Error, Debug)]
pub enum RsuError {
    // 参数校验错误（构造阶段立即失败）
    #[error("无效参数 '{name}'：{reason}")]
    InvalidArgument { name: &'static str, reason: String },
    #[error("版本号第 {index} 段（{group}）必须为数字")]
    InvalidVersionGroup { index: usize, group: String },

    // 正则相关错误
    #[error("正则编译失败：{0}")]
    RegexCompileError(#[from] RegexError),
    #[error("Perl 正则转换失败：{0}")]
    RegexConvertError(String),

    // 数据源相关错误
    #[error("数据源不可用：{0}")]
    SourceUnavailable(String),
    #[error("网络请求失败：{0}")]
    HttpError(#[from] reqwest::Error),

    // 缓存文件不变量被破坏（仅影响当前更新周期）
    #[error("无法删除文件 '{}'", .0.display())]
    CannotDeleteFile(PathBuf),
    #[error("无法将文件 '{}' 重命名为 '{}'", .from.display(), .to.display())]
    CannotRenameFile { from: PathBuf, to: PathBuf },

    // 后台线程池相关错误
    #[error("更新服务不可用：{0}")]
    ServiceUnavailable(String),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),
    #[error("MessagePack反序列化失败：{0}")]
    MsgPackError(String),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
    #[error("URL解析失败：{0}")]
    UrlError(#[from] UrlParseError),
}

impl RsuError {
    /// 快速构造参数错误
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument { name, reason: reason.into() }
    }

    /// 是否为缓存文件不变量错误（删除/重命名失败）
    pub fn is_file_invariant(&self) -> bool {
        matches!(self, Self::CannotDeleteFile(_) | Self::CannotRenameFile { .. })
    }
}

// 全局Result类型
pub type RsuResult<T> = Result<T, RsuError>;
