#![allow(dead_code)]

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rsuadetector::{
    BrowserOperatingSystemMapping, BrowserRecord, BrowserType, ConfigManager, DataDocument, GlobalConfig,
    OperatingSystem, PatternRecord, UpdateService,
};
use url::Url;

pub const OLDER_VERSION: &str = "20120801-00";
pub const NEWER_VERSION: &str = "20130101-00";

pub fn browser(id: u32, type_id: u32, name: &str, producer: &str) -> BrowserRecord {
    BrowserRecord {
        id,
        type_id,
        family_name: name.to_string(),
        icon: String::new(),
        info_url: String::new(),
        producer: producer.to_string(),
        producer_url: String::new(),
        url: String::new(),
    }
}

pub fn os(id: u32, name: &str) -> OperatingSystem {
    OperatingSystem {
        id,
        family_name: name.to_string(),
        name: name.to_string(),
        ..OperatingSystem::default()
    }
}

/// Eudora 文档；`producer` 与 `os_id` 用于区分不同版本的数据，`extra` 个附加浏览器用于增大文件
pub fn document(version: &str, producer: &str, os_id: u32, extra: u32) -> DataDocument {
    let mut document = DataDocument::new(version);
    document.browser_types.push(BrowserType { id: 1, name: "Browser".to_string() });
    document.browser_types.push(BrowserType { id: 2, name: "Email client".to_string() });
    document.browsers.push(browser(465, 2, "Eudora", producer));
    document.browser_patterns.push(PatternRecord::new(1, 465, 1, "/^Eudora?/si"));
    document.operating_systems.push(os(10, "Linux"));
    document.operating_systems.push(os(11, "Windows"));
    document.browser_operating_system_mappings.push(BrowserOperatingSystemMapping {
        browser_id: 465,
        operating_system_id: os_id,
    });
    for i in 0..extra {
        let id = 1000 + i;
        document.browsers.push(browser(id, 1, &format!("Browser {}", i), "Example"));
        document.browser_patterns.push(PatternRecord::new(id, id, 100 + i, format!("/browser-{}-([\\d.]+)/i", i)));
    }
    document
}

pub fn older_document() -> DataDocument {
    document(OLDER_VERSION, "Qualcomm Incorporated.", 11, 0)
}

pub fn newer_document() -> DataDocument {
    document(NEWER_VERSION, "Qualcomm", 10, 20)
}

/// 写入数据文件与版本文件，返回对应的 file:// 地址
pub fn write_source(dir: &Path, name: &str, document: &DataDocument, version: &str) -> (Url, Url) {
    let data_path = dir.join(format!("{}.json", name));
    let version_path = dir.join(format!("{}.version", name));
    std::fs::write(&data_path, document.to_json_bytes().unwrap()).unwrap();
    std::fs::write(&version_path, version).unwrap();
    (Url::from_file_path(&data_path).unwrap(), Url::from_file_path(&version_path).unwrap())
}

pub fn write_cache(dir: &Path, document: &DataDocument) -> PathBuf {
    let path = dir.join("uas.cache");
    std::fs::write(&path, document.to_json_bytes().unwrap()).unwrap();
    path
}

pub fn config(data_url: Url, version_url: Url, cache_path: Option<PathBuf>) -> GlobalConfig {
    let mut builder = ConfigManager::custom(data_url, version_url)
        .http_timeout(Duration::from_secs(1))
        .connect_timeout(Duration::from_millis(500))
        .shutdown_grace(Duration::from_secs(2));
    if let Some(path) = cache_path {
        builder = builder.cache_path(path);
    }
    builder.build().unwrap()
}

pub fn unreachable_urls() -> (Url, Url) {
    (
        Url::parse("http://127.0.0.1:9/uas.json").unwrap(),
        Url::parse("http://127.0.0.1:9/uas.version").unwrap(),
    )
}

/// 通过 RUST_LOG 查看更新过程日志
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn service() -> Arc<UpdateService> {
    init_tracing();
    UpdateService::with_threads(2, Duration::from_secs(2)).unwrap()
}

/// 在独立的单线程运行时中执行异步代码
pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

/// 轮询直到条件满足或超时
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = std::time::Instant::now() + timeout;
    while std::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    condition()
}
