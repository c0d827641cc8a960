//! 数据源模块：快照持有、后台更新与本地缓存
//! 快照引用是唯一的共享可变状态，读取无锁，更新以整体替换的方式发布
pub mod holder;
pub mod static_store;
pub mod cache_file;
pub mod update;
pub mod refreshable;
pub mod caching;

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::config::Charset;
use crate::model::Data;
use crate::reader::DataReader;

// 导出核心接口
pub use self::holder::SnapshotHolder;
pub use self::static_store::StaticDataStore;
pub use self::cache_file::{CacheFile, FileOps, StdFileOps};
pub use self::update::{UpdateOperation, UpdateOutcome};
pub use self::refreshable::RefreshableDataStore;
pub use self::caching::CachingDataStore;

/// 数据源
pub trait DataStore: Send + Sync + fmt::Debug {
    /// 当前安装的快照（非阻塞）
    fn data(&self) -> Arc<Data>;

    fn data_reader(&self) -> Arc<dyn DataReader>;

    /// 数据地址（固定数据源为 None）
    fn data_url(&self) -> Option<&Url>;

    /// 版本号地址（固定数据源为 None）
    fn version_url(&self) -> Option<&Url>;

    fn charset(&self) -> Charset;
}

/// 可刷新的数据源
pub trait RefreshableStore: DataStore {
    /// 请求一次后台更新并立即返回；已有更新在进行时丢弃本次请求，返回 false
    fn refresh(&self) -> bool;
}
