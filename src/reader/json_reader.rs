//! JSON / MessagePack 数据源读取器

use rmp_serde::from_slice;
use tracing::{debug, warn};

use super::DataReader;
use super::document::DataDocument;
use crate::config::Charset;
use crate::error::{RsuError, RsuResult};
use crate::model::Data;

/// 数据源格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataFormat {
    #[default]
    Json,
    MsgPack,
}

/// 文档读取器
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDataReader {
    format: DataFormat,
}

impl JsonDataReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(format: DataFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> DataFormat {
        self.format
    }

    /// 解析文档（保留错误信息，供需要区分失败原因的调用方使用）
    pub fn parse_document(&self, bytes: &[u8], charset: Charset) -> RsuResult<DataDocument> {
        match self.format {
            DataFormat::Json => {
                let text = charset.decode(bytes);
                Ok(serde_json::from_str(text.trim_start_matches('\u{feff}'))?)
            }
            // 二进制格式，字符集不参与解码
            DataFormat::MsgPack => {
                from_slice(bytes).map_err(|e| RsuError::MsgPackError(format!("反序列化失败：{}", e)))
            }
        }
    }
}

impl DataReader for JsonDataReader {
    fn read(&self, bytes: &[u8], charset: Charset) -> Data {
        if bytes.is_empty() {
            warn!("数据源内容为空");
            return Data::empty();
        }
        match self.parse_document(bytes, charset) {
            Ok(document) => {
                debug!("数据源文档解析成功，版本：{}，格式：{:?}", document.version, self.format);
                document.into_data()
            }
            Err(e) => {
                warn!("数据源文档解析失败：{}", e);
                Data::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::PatternRecord;
    use crate::model::{BrowserRecord, BrowserType};

    fn document() -> DataDocument {
        let mut document = DataDocument::new("20120801-00");
        document.browser_types.push(BrowserType { id: 2, name: "Email client".to_string() });
        document.browsers.push(BrowserRecord {
            id: 465,
            type_id: 2,
            family_name: "Eudora".to_string(),
            icon: String::new(),
            info_url: String::new(),
            producer: "Qualcomm Incorporated.".to_string(),
            producer_url: String::new(),
            url: String::new(),
        });
        document.browser_patterns.push(PatternRecord::new(1, 465, 1, "/^Eudora?/si"));
        document
    }

    #[test]
    fn test_read_json() {
        let bytes = document().to_json_bytes().unwrap();
        let data = JsonDataReader::new().read(&bytes, Charset::Utf8);
        assert_eq!(data.version(), "20120801-00");
        assert_eq!(data.browser_index().len(), 1);
        assert_eq!(data.browsers()[&465].family, "EUDORA");
    }

    #[test]
    fn test_read_msgpack() {
        let bytes = document().to_msgpack_bytes().unwrap();
        let data = JsonDataReader::with_format(DataFormat::MsgPack).read(&bytes, Charset::Utf8);
        assert_eq!(data.version(), "20120801-00");
        assert_eq!(data.browsers().len(), 1);
    }

    #[test]
    fn test_owner_aliases() {
        let json = r#"{
            "version": "1",
            "browser_types": [{"id": 1, "name": "Browser"}],
            "browsers": [{"id": 7, "type_id": 1, "family_name": "Firefox"}],
            "browser_patterns": [{"id": 1, "browser_id": 7, "position": 3, "regex": "/firefox/i"}]
        }"#;
        let data = JsonDataReader::new().read(json.as_bytes(), Charset::Utf8);
        assert_eq!(data.browser_index()[0].0.owner_id, 7);
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let mut document = document();
        document.browser_patterns.push(PatternRecord::new(2, 465, 2, "missing delimiters"));
        let data = JsonDataReader::new().read(&document.to_json_bytes().unwrap(), Charset::Utf8);
        assert_eq!(data.browser_index().len(), 1);
    }

    #[test]
    fn test_malformed_input_yields_empty_sentinel() {
        let reader = JsonDataReader::new();
        assert!(reader.read(b"", Charset::Utf8).is_empty());
        assert!(reader.read(b"<xml/>", Charset::Utf8).is_empty());
        assert!(JsonDataReader::with_format(DataFormat::MsgPack).read(b"\xc1", Charset::Utf8).is_empty());
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let data = JsonDataReader::new().read_file(&dir.path().join("missing.json"), Charset::Utf8);
        assert!(data.is_empty());
    }
}
