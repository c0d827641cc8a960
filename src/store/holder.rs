//! 当前快照持有者

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;

use crate::model::Data;

/// 以原子引用替换的方式发布快照，读者看到的要么是完整的旧快照，要么是完整的新快照
#[derive(Debug)]
pub struct SnapshotHolder {
    current: ArcSwap<Data>,
}

impl SnapshotHolder {
    pub fn new(initial: Arc<Data>) -> Self {
        Self { current: ArcSwap::new(initial) }
    }

    pub fn load(&self) -> Arc<Data> {
        self.current.load_full()
    }

    /// 安装新快照，返回被替换的旧快照
    pub fn install(&self, data: Arc<Data>) -> Arc<Data> {
        let previous = self.current.swap(data);
        info!("数据快照已替换：{} → {}", previous.version(), self.current.load().version());
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DataBuilder;

    #[test]
    fn test_install_replaces_whole_snapshot() {
        let old = Arc::new(DataBuilder::new("1").build());
        let holder = SnapshotHolder::new(Arc::clone(&old));
        let held = holder.load();
        assert!(Arc::ptr_eq(&held, &old));

        let previous = holder.install(Arc::new(DataBuilder::new("2").build()));
        assert!(Arc::ptr_eq(&previous, &old));
        assert_eq!(holder.load().version(), "2");
        // 旧引用仍然完整可用
        assert_eq!(held.version(), "1");
    }
}
