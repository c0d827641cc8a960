//! 后台更新服务
//! 显式创建与关闭的线程池，更新周期只在池内线程执行，从不占用调用方线程

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::GlobalConfig;
use crate::error::{RsuError, RsuResult};

const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// 更新服务
#[derive(Debug)]
pub struct UpdateService {
    runtime: Mutex<Option<Runtime>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    shutdown_grace: Duration,
}

impl UpdateService {
    /// 按配置启动服务
    pub fn start(config: &GlobalConfig) -> RsuResult<Arc<Self>> {
        Self::with_threads(config.worker_threads, config.shutdown_grace)
    }

    /// 指定线程数与关闭等待时间启动服务
    pub fn with_threads(worker_threads: usize, shutdown_grace: Duration) -> RsuResult<Arc<Self>> {
        if worker_threads == 0 {
            return Err(RsuError::invalid_argument("worker_threads", "后台线程数必须大于0"));
        }
        let runtime = Builder::new_multi_thread()
            .worker_threads(worker_threads)
            .thread_name("rsuadetector-update")
            .enable_all()
            .build()?;
        info!("更新服务已启动，线程数：{}", worker_threads);

        Ok(Arc::new(Self {
            runtime: Mutex::new(Some(runtime)),
            tasks: Mutex::new(Vec::new()),
            shutdown_grace,
        }))
    }

    /// 提交后台任务；服务已关闭时返回 false
    pub fn submit<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let runtime = lock(&self.runtime);
        let Some(runtime) = runtime.as_ref() else {
            warn!("更新服务已关闭，任务被丢弃");
            return false;
        };
        let handle = runtime.spawn(task);

        let mut tasks = lock(&self.tasks);
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
        true
    }

    pub fn is_running(&self) -> bool {
        lock(&self.runtime).is_some()
    }

    /// 尚未结束的任务数
    pub fn pending_tasks(&self) -> usize {
        lock(&self.tasks).iter().filter(|task| !task.is_finished()).count()
    }

    /// 按配置的等待时间关闭服务
    pub fn shutdown(&self) -> bool {
        self.shutdown_with_grace(self.shutdown_grace)
    }

    /// 两阶段关闭：先等待任务在 `grace` 内结束，超时后取消剩余任务
    ///
    /// 所有任务都在等待期内结束时返回 true。该调用会阻塞当前线程，不应在异步任务中调用。
    pub fn shutdown_with_grace(&self, grace: Duration) -> bool {
        let Some(runtime) = lock(&self.runtime).take() else {
            return true;
        };
        let tasks = std::mem::take(&mut *lock(&self.tasks));
        debug!("开始关闭更新服务，未结束任务：{}", tasks.iter().filter(|t| !t.is_finished()).count());

        // 1. 等待
        let deadline = Instant::now() + grace;
        while tasks.iter().any(|task| !task.is_finished()) && Instant::now() < deadline {
            std::thread::sleep(SHUTDOWN_POLL_INTERVAL);
        }

        // 2. 强制取消
        let mut cancelled = 0;
        for task in tasks.iter().filter(|task| !task.is_finished()) {
            task.abort();
            cancelled += 1;
        }
        runtime.shutdown_background();

        if cancelled > 0 {
            warn!("更新服务已关闭，取消了 {} 个未完成的任务", cancelled);
        } else {
            info!("更新服务已关闭");
        }
        cancelled == 0
    }
}

impl Drop for UpdateService {
    fn drop(&mut self) {
        let runtime = self.runtime.get_mut().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(runtime) = runtime {
            runtime.shutdown_background();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_zero_threads_rejected() {
        let err = UpdateService::with_threads(0, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, RsuError::InvalidArgument { name: "worker_threads", .. }));
    }

    #[test]
    fn test_graceful_shutdown_waits_for_tasks() {
        let service = UpdateService::with_threads(1, Duration::from_secs(5)).unwrap();
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);
        assert!(service.submit(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
        }));

        assert!(service.shutdown());
        assert!(done.load(Ordering::SeqCst));
        assert!(!service.is_running());
    }

    #[test]
    fn test_forced_shutdown_cancels_tasks() {
        let service = UpdateService::with_threads(1, Duration::from_secs(5)).unwrap();
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);
        service.submit(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            flag.store(true, Ordering::SeqCst);
        });

        let started = Instant::now();
        assert!(!service.shutdown_with_grace(Duration::from_millis(50)));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!done.load(Ordering::SeqCst));
    }

    #[test]
    fn test_submit_after_shutdown_is_rejected() {
        let service = UpdateService::with_threads(1, Duration::from_millis(10)).unwrap();
        service.shutdown();
        assert!(!service.submit(async {}));
        assert_eq!(service.pending_tasks(), 0);
    }
}
