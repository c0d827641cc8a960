//! 读取模块：将数据源字节解析为数据快照
pub mod document;
pub mod json_reader;

use std::fmt;
use std::path::Path;

use tracing::warn;

use crate::config::Charset;
use crate::model::Data;

// 导出核心接口
pub use self::document::{DataDocument, PatternRecord};
pub use self::json_reader::{DataFormat, JsonDataReader};

/// 数据读取能力
///
/// 任何读取或解析失败都以空快照 [`Data::empty`] 表示，不向调用方返回错误。
pub trait DataReader: Send + Sync + fmt::Debug {
    /// 从原始字节解析
    fn read(&self, bytes: &[u8], charset: Charset) -> Data;

    /// 从本地文件解析
    fn read_file(&self, path: &Path, charset: Charset) -> Data {
        match std::fs::read(path) {
            Ok(bytes) => self.read(&bytes, charset),
            Err(e) => {
                warn!("读取数据文件 {} 失败：{}", path.display(), e);
                Data::empty()
            }
        }
    }
}
