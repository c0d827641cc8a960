//! 固定数据源（不更新，常用作最终回退）

use std::sync::Arc;

use url::Url;

use super::DataStore;
use crate::config::Charset;
use crate::model::Data;
use crate::reader::{DataReader, JsonDataReader};

#[derive(Debug, Clone)]
pub struct StaticDataStore {
    data: Arc<Data>,
    reader: Arc<dyn DataReader>,
    charset: Charset,
}

impl StaticDataStore {
    pub fn new(data: Data) -> Self {
        Self::from_arc(Arc::new(data))
    }

    pub fn from_arc(data: Arc<Data>) -> Self {
        Self {
            data,
            reader: Arc::new(JsonDataReader::new()),
            charset: Charset::default(),
        }
    }

    /// 空数据源
    pub fn empty() -> Self {
        Self::new(Data::empty())
    }

    /// 用指定读取器解析字节（解析失败时为空数据源）
    pub fn read_from(reader: Arc<dyn DataReader>, bytes: &[u8], charset: Charset) -> Self {
        let data = Arc::new(reader.read(bytes, charset));
        Self { data, reader, charset }
    }
}

impl DataStore for StaticDataStore {
    fn data(&self) -> Arc<Data> {
        Arc::clone(&self.data)
    }

    fn data_reader(&self) -> Arc<dyn DataReader> {
        Arc::clone(&self.reader)
    }

    fn data_url(&self) -> Option<&Url> {
        None
    }

    fn version_url(&self) -> Option<&Url> {
        None
    }

    fn charset(&self) -> Charset {
        self.charset
    }
}
