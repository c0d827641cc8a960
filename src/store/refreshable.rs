//! 可刷新数据源：快照持有者 + 更新操作 + 后台服务

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use url::Url;

use super::holder::SnapshotHolder;
use super::update::{UpdateOperation, UpdateOutcome};
use super::{DataStore, RefreshableStore};
use crate::config::{Charset, GlobalConfig};
use crate::error::RsuResult;
use crate::model::Data;
use crate::reader::DataReader;
use crate::service::UpdateService;
use crate::utils::UrlReader;

/// 可刷新数据源
///
/// 同一实例同时最多只有一个更新周期在执行；周期进行中收到的刷新请求直接丢弃，不排队。
#[derive(Debug)]
pub struct RefreshableDataStore {
    holder: Arc<SnapshotHolder>,
    operation: Arc<UpdateOperation>,
    service: Arc<UpdateService>,
    refreshing: Arc<AtomicBool>,
}

/// 周期结束（包括任务被取消）时释放单飞标志
struct RefreshGuard(Arc<AtomicBool>);

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RefreshableDataStore {
    /// 以指定初始快照创建（不做任何 I/O）
    pub fn new(initial: Arc<Data>, operation: UpdateOperation, service: Arc<UpdateService>) -> Self {
        Self {
            holder: Arc::new(SnapshotHolder::new(initial)),
            operation: Arc::new(operation),
            service,
            refreshing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 按配置创建，初始快照取回退数据源的当前快照（同一引用）
    ///
    /// `cache_path` 为 None 时更新结果不落盘。
    pub fn from_config(
        config: &GlobalConfig,
        reader: Arc<dyn DataReader>,
        fallback: Arc<dyn DataStore>,
        service: Arc<UpdateService>,
    ) -> RsuResult<Self> {
        let mut operation = UpdateOperation::new(
            config.data_url.clone(),
            config.version_url.clone(),
            config.charset,
            reader,
            UrlReader::from_config(config)?,
            Arc::clone(&fallback),
        );
        if let Some(path) = &config.cache_path {
            operation = operation.with_cache(super::CacheFile::new(path));
        }
        Ok(Self::new(fallback.data(), operation, service))
    }

    pub fn operation(&self) -> &Arc<UpdateOperation> {
        &self.operation
    }

    pub fn service(&self) -> &Arc<UpdateService> {
        &self.service
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    fn try_acquire(&self) -> Option<RefreshGuard> {
        self.refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshGuard(Arc::clone(&self.refreshing)))
    }

    /// 在当前任务内执行一次更新周期并等待结果
    pub async fn refresh_now(&self) -> RsuResult<UpdateOutcome> {
        let Some(_guard) = self.try_acquire() else {
            return Ok(UpdateOutcome::AlreadyRunning);
        };
        self.operation.run(&self.holder).await
    }
}

impl DataStore for RefreshableDataStore {
    fn data(&self) -> Arc<Data> {
        self.holder.load()
    }

    fn data_reader(&self) -> Arc<dyn DataReader> {
        Arc::clone(self.operation.reader())
    }

    fn data_url(&self) -> Option<&Url> {
        Some(self.operation.data_url())
    }

    fn version_url(&self) -> Option<&Url> {
        Some(self.operation.version_url())
    }

    fn charset(&self) -> Charset {
        self.operation.charset()
    }
}

impl RefreshableStore for RefreshableDataStore {
    fn refresh(&self) -> bool {
        let Some(guard) = self.try_acquire() else {
            debug!("已有更新周期在进行，丢弃本次刷新请求");
            return false;
        };

        let holder = Arc::clone(&self.holder);
        let operation = Arc::clone(&self.operation);
        let submitted = self.service.submit(async move {
            let _guard = guard;
            match operation.run(&holder).await {
                Ok(UpdateOutcome::Updated { version, persisted }) => {
                    info!("后台更新完成，当前版本：{}，缓存已写入：{}", version, persisted)
                }
                Ok(outcome) => debug!("后台更新结束：{:?}", outcome),
                Err(e) => error!("后台更新缓存写入失败：{}", e),
            }
        });
        if !submitted {
            warn!("刷新请求未能提交到更新服务");
        }
        submitted
    }
}
