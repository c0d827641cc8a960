//! 数据源读取工具
//! 统一读取 `file://` 与 `http(s)://` 地址，网络请求带连接/读取超时

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::{Charset, GlobalConfig};
use crate::error::{RsuError, RsuResult};

const USER_AGENT: &str = concat!("rsuadetector/", env!("CARGO_PKG_VERSION"));

/// 地址读取器
#[derive(Debug, Clone)]
pub struct UrlReader {
    client: Client,
}

impl UrlReader {
    /// 创建读取器（超时用于保证后台刷新不会无限挂起）
    pub fn new(http_timeout: Duration, connect_timeout: Duration) -> RsuResult<Self> {
        let client = Client::builder()
            .timeout(http_timeout)
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { client })
    }

    /// 按全局配置创建读取器
    pub fn from_config(config: &GlobalConfig) -> RsuResult<Self> {
        Self::new(config.http_timeout, config.connect_timeout)
    }

    /// 读取地址的原始字节
    pub async fn read_bytes(&self, url: &Url) -> RsuResult<Vec<u8>> {
        match url.scheme() {
            "file" => {
                let path = Self::to_file_path(url).ok_or_else(|| {
                    RsuError::SourceUnavailable(format!("无法转换为本地路径：{}", url))
                })?;
                Ok(tokio::fs::read(&path).await?)
            }
            "http" | "https" => {
                let response = self.client.get(url.clone())
                    .header("User-Agent", USER_AGENT)
                    .header("Accept-Encoding", "gzip, deflate")
                    .send()
                    .await?;

                if !response.status().is_success() {
                    return Err(RsuError::SourceUnavailable(format!(
                        "URL {} 返回状态码 {}",
                        url, response.status()
                    )));
                }

                let bytes = response.bytes().await?;
                debug!("读取 {} 完成，大小：{} 字节", url, bytes.len());
                Ok(bytes.to_vec())
            }
            other => Err(RsuError::SourceUnavailable(format!("不支持的协议：{}", other))),
        }
    }

    /// 读取地址内容并按字符集解码（去除首尾空白）
    pub async fn read_string(&self, url: &Url, charset: Charset) -> RsuResult<String> {
        let bytes = self.read_bytes(url).await?;
        Ok(charset.decode(&bytes).trim().to_string())
    }

    /// `file://` 地址转本地路径
    pub fn to_file_path(url: &Url) -> Option<PathBuf> {
        if url.scheme() != "file" {
            return None;
        }
        url.to_file_path().ok()
    }

    /// 判断地址与本地文件是否为同一资源
    pub fn is_same_resource(url: &Url, path: &Path) -> bool {
        let Some(url_path) = Self::to_file_path(url) else {
            return false;
        };
        match (url_path.canonicalize(), path.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => url_path == path,
        }
    }
}
