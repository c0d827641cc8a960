//! 后台服务模块：执行更新周期的线程池
pub mod update_service;

// 导出核心接口
pub use self::update_service::UpdateService;
