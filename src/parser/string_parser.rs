//! User-Agent 解析器入口
//! 每次解析读取当前安装的快照；更新中的快照替换对正在进行的解析不可见

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

use super::classifier::{ClassifierOptions, UserAgentClassifier};
use super::result::UserAgent;
use crate::config::GlobalConfig;
use crate::error::{RsuError, RsuResult};
use crate::store::{DataStore, RefreshableStore};

/// 基于任意数据源的解析器（不触发更新）
#[derive(Debug, Clone)]
pub struct UserAgentStringParser {
    store: Arc<dyn DataStore>,
    classifier: UserAgentClassifier,
}

impl UserAgentStringParser {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self::with_options(store, ClassifierOptions::default())
    }

    pub fn with_options(store: Arc<dyn DataStore>, options: ClassifierOptions) -> Self {
        Self { store, classifier: UserAgentClassifier::new(options) }
    }

    /// 解析 User-Agent
    pub fn parse(&self, user_agent: &str) -> UserAgent {
        let data = self.store.data();
        self.classifier.classify(&data, user_agent)
    }

    /// 当前数据版本
    pub fn data_version(&self) -> String {
        self.store.data().version().to_string()
    }

    pub fn store(&self) -> &Arc<dyn DataStore> {
        &self.store
    }
}

/// 请求驱动更新的解析器
///
/// 每次解析前检查距上次检查是否已超过更新间隔，超过则提交一次后台更新并立即返回，
/// 本次解析仍使用当前快照。
#[derive(Debug)]
pub struct UpdatingUserAgentStringParser {
    store: Arc<dyn RefreshableStore>,
    classifier: UserAgentClassifier,
    update_interval_nanos: AtomicU64,
    last_check: Mutex<Instant>,
}

impl UpdatingUserAgentStringParser {
    /// 按配置中的更新间隔创建解析器
    pub fn from_config(store: Arc<dyn RefreshableStore>, config: &GlobalConfig) -> RsuResult<Self> {
        Self::new(store, config.update_interval)
    }

    /// 创建解析器，并立即提交一次后台更新
    pub fn new(store: Arc<dyn RefreshableStore>, update_interval: Duration) -> RsuResult<Self> {
        Self::with_options(store, update_interval, ClassifierOptions::default())
    }

    pub fn with_options(
        store: Arc<dyn RefreshableStore>,
        update_interval: Duration,
        options: ClassifierOptions,
    ) -> RsuResult<Self> {
        let update_interval_nanos = interval_nanos(update_interval)?;
        let parser = Self {
            store,
            classifier: UserAgentClassifier::new(options),
            update_interval_nanos: AtomicU64::new(update_interval_nanos),
            last_check: Mutex::new(Instant::now()),
        };
        parser.store.refresh();
        Ok(parser)
    }

    /// 解析 User-Agent（可能触发后台更新，但从不等待更新完成）
    pub fn parse(&self, user_agent: &str) -> UserAgent {
        self.check_update();
        let data = self.store.data();
        self.classifier.classify(&data, user_agent)
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_nanos(self.update_interval_nanos.load(Ordering::Relaxed))
    }

    /// 运行期修改更新间隔
    pub fn set_update_interval(&self, update_interval: Duration) -> RsuResult<()> {
        let nanos = interval_nanos(update_interval)?;
        self.update_interval_nanos.store(nanos, Ordering::Relaxed);
        Ok(())
    }

    pub fn data_version(&self) -> String {
        self.store.data().version().to_string()
    }

    pub fn store(&self) -> &Arc<dyn RefreshableStore> {
        &self.store
    }

    fn check_update(&self) {
        let interval = self.update_interval();
        let now = Instant::now();
        let due = {
            let mut last_check = self.last_check.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if now.duration_since(*last_check) >= interval {
                *last_check = now;
                true
            } else {
                false
            }
        };
        if due {
            debug!("已超过更新间隔 {:?}，提交后台更新", interval);
            self.store.refresh();
        }
    }
}

/// 以纳秒保存，超出 u64 范围（约 584 年）时取最大值
fn interval_nanos(update_interval: Duration) -> RsuResult<u64> {
    if update_interval.is_zero() {
        return Err(RsuError::invalid_argument("update_interval", "更新间隔必须大于0"));
    }
    Ok(u64::try_from(update_interval.as_nanos()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_millisecond_interval_is_kept() {
        assert_eq!(interval_nanos(Duration::from_micros(500)).unwrap(), 500_000);
        assert_eq!(interval_nanos(Duration::from_nanos(1)).unwrap(), 1);
        assert!(interval_nanos(Duration::ZERO).is_err());
        assert_eq!(interval_nanos(Duration::MAX).unwrap(), u64::MAX);
    }
}
