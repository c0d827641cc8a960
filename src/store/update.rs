//! 更新周期
//!
//! 1. 拉取版本号，按自然序与当前快照版本比较，只有严格更新时才继续
//! 2. 拉取完整数据并解析，解析失败（空快照）时结束
//! 3. 先替换内存快照，再把原始字节写入缓存文件（数据地址与缓存文件为同一资源时跳过）
//!
//! 主数据源的版本号或数据不可达时依次尝试回退数据源的地址，第一个同时给出版本号与数据的数据源决定本次结果。

use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use tracing::{debug, info, warn};
use url::Url;

use super::cache_file::CacheFile;
use super::holder::SnapshotHolder;
use super::DataStore;
use crate::config::Charset;
use crate::error::RsuResult;
use crate::reader::DataReader;
use crate::utils::{NaturalOrderComparator, UrlReader};

/// 一次更新周期的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// 远程版本不比当前新，未做任何数据读取
    NotModified { version: String },
    /// 所有数据源均不可达
    SourceUnavailable,
    /// 数据源内容无法解析
    ReadFailed,
    /// 已安装新快照；`persisted` 表示缓存文件是否已写入
    Updated { version: String, persisted: bool },
    /// 已有更新周期在进行，本次请求被丢弃
    AlreadyRunning,
}

/// 更新操作
#[derive(Debug)]
pub struct UpdateOperation {
    data_url: Url,
    version_url: Url,
    charset: Charset,
    reader: Arc<dyn DataReader>,
    url_reader: UrlReader,
    fallback: Arc<dyn DataStore>,
    cache: Option<CacheFile>,
    last_update_check: Mutex<Option<SystemTime>>,
}

impl UpdateOperation {
    pub fn new(
        data_url: Url,
        version_url: Url,
        charset: Charset,
        reader: Arc<dyn DataReader>,
        url_reader: UrlReader,
        fallback: Arc<dyn DataStore>,
    ) -> Self {
        Self {
            data_url,
            version_url,
            charset,
            reader,
            url_reader,
            fallback,
            cache: None,
            last_update_check: Mutex::new(None),
        }
    }

    /// 成功更新后写入缓存文件
    pub fn with_cache(mut self, cache: CacheFile) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn data_url(&self) -> &Url {
        &self.data_url
    }

    pub fn version_url(&self) -> &Url {
        &self.version_url
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn reader(&self) -> &Arc<dyn DataReader> {
        &self.reader
    }

    pub fn fallback(&self) -> &Arc<dyn DataStore> {
        &self.fallback
    }

    pub fn cache(&self) -> Option<&CacheFile> {
        self.cache.as_ref()
    }

    /// 最近一次更新周期的开始时间
    pub fn last_update_check(&self) -> Option<SystemTime> {
        *self.last_update_check.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 执行一次更新周期
    ///
    /// 网络、解析等可恢复的失败都折叠进 [`UpdateOutcome`]；
    /// 只有缓存文件删除或重命名失败时返回错误，此时内存快照已经更新。
    pub async fn run(&self, holder: &SnapshotHolder) -> RsuResult<UpdateOutcome> {
        *self.last_update_check.lock().unwrap_or_else(PoisonError::into_inner) = Some(SystemTime::now());

        for (data_url, version_url) in self.sources() {
            let remote_version = match self.url_reader.read_string(version_url, self.charset).await {
                Ok(version) => version,
                Err(e) => {
                    warn!("读取版本号失败（{}）：{}", version_url, e);
                    continue;
                }
            };
            // 数据地址不可达时继续尝试下一个数据源
            match self.update_from(holder, data_url, remote_version).await? {
                Some(outcome) => return Ok(outcome),
                None => continue,
            }
        }

        warn!("所有数据源均不可达，保留当前数据");
        Ok(UpdateOutcome::SourceUnavailable)
    }

    /// 数据地址读取失败时返回 None
    async fn update_from(
        &self,
        holder: &SnapshotHolder,
        data_url: &Url,
        remote_version: String,
    ) -> RsuResult<Option<UpdateOutcome>> {
        let current = holder.load();
        if !NaturalOrderComparator::is_newer(&remote_version, current.version()) {
            debug!("远程版本 {} 不比当前版本 {} 新，无需更新", remote_version, current.version());
            return Ok(Some(UpdateOutcome::NotModified { version: current.version().to_string() }));
        }
        info!("发现新版本：{} → {}，开始拉取 {}", current.version(), remote_version, data_url);

        let bytes = match self.url_reader.read_bytes(data_url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("读取数据失败（{}）：{}", data_url, e);
                return Ok(None);
            }
        };

        let data = self.reader.read(&bytes, self.charset);
        if data.is_empty() {
            warn!("数据解析失败（{}），保留当前数据", data_url);
            return Ok(Some(UpdateOutcome::ReadFailed));
        }
        let version = data.version().to_string();
        holder.install(Arc::new(data));

        let persisted = match &self.cache {
            Some(cache) if UrlReader::is_same_resource(data_url, cache.path()) => {
                debug!("数据地址即缓存文件 {}，跳过写入", cache.path().display());
                false
            }
            Some(cache) => match cache.write_atomically(&bytes) {
                Ok(()) => true,
                Err(e) if e.is_file_invariant() => return Err(e),
                Err(e) => {
                    warn!("写入缓存文件 {} 失败：{}", cache.path().display(), e);
                    false
                }
            },
            None => false,
        };

        Ok(Some(UpdateOutcome::Updated { version, persisted }))
    }

    /// 主数据源及回退数据源的（数据地址, 版本地址）
    fn sources(&self) -> Vec<(&Url, &Url)> {
        let mut sources = vec![(&self.data_url, &self.version_url)];
        if let (Some(data_url), Some(version_url)) = (self.fallback.data_url(), self.fallback.version_url()) {
            if (data_url, version_url) != (&self.data_url, &self.version_url) {
                sources.push((data_url, version_url));
            }
        }
        sources
    }
}
