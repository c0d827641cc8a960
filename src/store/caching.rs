//! 带本地缓存的可刷新数据源
//! 创建时只读本地缓存，不访问网络；缓存不可用时直接采用回退数据源的快照

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use super::cache_file::CacheFile;
use super::refreshable::RefreshableDataStore;
use super::update::UpdateOperation;
use super::DataStore;
use crate::config::{Charset, GlobalConfig};
use crate::error::RsuResult;
use crate::model::Data;
use crate::reader::DataReader;
use crate::service::UpdateService;
use crate::utils::UrlReader;

/// 带缓存的数据源工厂
pub struct CachingDataStore;

impl CachingDataStore {
    /// 默认缓存文件名（位于系统临时目录）
    pub const DEFAULT_CACHE_FILE_NAME: &'static str = "rsuadetector-data.cache";

    /// 创建带缓存的数据源
    ///
    /// 初始快照：缓存文件可读且非空时使用缓存内容，否则使用 `fallback` 的当前快照（同一引用）。
    /// `config.cache_path` 为 None 时使用 [`CachingDataStore::find_or_create_cache_file`]。
    pub fn create(
        config: &GlobalConfig,
        reader: Arc<dyn DataReader>,
        fallback: Arc<dyn DataStore>,
        service: Arc<UpdateService>,
    ) -> RsuResult<RefreshableDataStore> {
        let path = match &config.cache_path {
            Some(path) => path.clone(),
            None => Self::find_or_create_cache_file()?,
        };
        Self::create_with_cache(config, reader, fallback, service, CacheFile::new(path))
    }

    /// 使用指定缓存文件创建（可注入自定义文件操作）
    pub fn create_with_cache(
        config: &GlobalConfig,
        reader: Arc<dyn DataReader>,
        fallback: Arc<dyn DataStore>,
        service: Arc<UpdateService>,
        cache: CacheFile,
    ) -> RsuResult<RefreshableDataStore> {
        let initial = Self::initial_data(reader.as_ref(), config.charset, &cache, fallback.as_ref());
        let operation = UpdateOperation::new(
            config.data_url.clone(),
            config.version_url.clone(),
            config.charset,
            reader,
            UrlReader::from_config(config)?,
            fallback,
        )
        .with_cache(cache);
        Ok(RefreshableDataStore::new(initial, operation, service))
    }

    /// 系统临时目录下的默认缓存文件，不存在时创建空文件
    pub fn find_or_create_cache_file() -> RsuResult<PathBuf> {
        Self::find_or_create_cache_file_in(&std::env::temp_dir())
    }

    pub fn find_or_create_cache_file_in(dir: &Path) -> RsuResult<PathBuf> {
        let path = dir.join(Self::DEFAULT_CACHE_FILE_NAME);
        if !path.exists() {
            OpenOptions::new().create(true).append(true).open(&path)?;
            debug!("已创建缓存文件：{}", path.display());
        }
        Ok(path)
    }

    fn initial_data(reader: &dyn DataReader, charset: Charset, cache: &CacheFile, fallback: &dyn DataStore) -> Arc<Data> {
        if cache.has_content() {
            let data = reader.read_file(cache.path(), charset);
            if !data.is_empty() {
                info!("从缓存文件 {} 加载数据，版本：{}", cache.path().display(), data.version());
                return Arc::new(data);
            }
        }
        let data = fallback.data();
        info!("缓存文件 {} 不可用，使用回退数据，版本：{}", cache.path().display(), data.version());
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_or_create_cache_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = CachingDataStore::find_or_create_cache_file_in(dir.path()).unwrap();
        assert!(path.is_file());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);

        std::fs::write(&path, b"keep").unwrap();
        let again = CachingDataStore::find_or_create_cache_file_in(dir.path()).unwrap();
        assert_eq!(again, path);
        assert_eq!(std::fs::read(&path).unwrap(), b"keep");
    }
}
