//! 本地缓存文件
//!
//! 写入协议：先写同目录临时文件，再将旧缓存移到备份位置（删除步骤），最后把临时文件重命名为缓存文件。
//! 重命名失败时旧缓存从备份恢复，任何时刻都不会出现截断或写了一半的缓存文件。

use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{RsuError, RsuResult};

/// 文件操作（便于在测试中注入失败）
pub trait FileOps: Send + Sync + fmt::Debug {
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// 标准库文件操作
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileOps;

impl FileOps for StdFileOps {
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::write(path, bytes)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

/// 缓存文件
#[derive(Debug, Clone)]
pub struct CacheFile {
    path: PathBuf,
    ops: Arc<dyn FileOps>,
}

impl CacheFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_ops(path, Arc::new(StdFileOps))
    }

    pub fn with_ops(path: impl Into<PathBuf>, ops: Arc<dyn FileOps>) -> Self {
        Self { path: path.into(), ops }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 同目录下的临时文件
    pub fn temp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    fn backup_path(&self) -> PathBuf {
        self.sibling(".bak")
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.file_name().map(OsString::from).unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    /// 缓存文件存在且非空
    pub fn has_content(&self) -> bool {
        fs::metadata(&self.path).map(|meta| meta.is_file() && meta.len() > 0).unwrap_or(false)
    }

    pub fn read(&self) -> RsuResult<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }

    /// 原子写入缓存
    ///
    /// 删除或重命名失败时返回 [`RsuError::CannotDeleteFile`] / [`RsuError::CannotRenameFile`]，
    /// 此时磁盘上保留的仍是旧缓存。整个过程为同步调用，中途不可取消。
    pub fn write_atomically(&self, bytes: &[u8]) -> RsuResult<()> {
        let temp = self.temp_path();
        self.ops.write(&temp, bytes)?;

        let backup = self.backup_path();
        let had_previous = self.path.exists();
        if had_previous {
            if let Err(e) = self.ops.rename(&self.path, &backup) {
                warn!("无法移除旧缓存文件 {}：{}", self.path.display(), e);
                self.discard(&temp);
                return Err(RsuError::CannotDeleteFile(self.path.clone()));
            }
        }

        if let Err(e) = self.ops.rename(&temp, &self.path) {
            warn!("无法将临时文件 {} 重命名为 {}：{}", temp.display(), self.path.display(), e);
            if had_previous {
                if let Err(e) = self.ops.rename(&backup, &self.path) {
                    warn!("旧缓存恢复失败，备份保留在 {}：{}", backup.display(), e);
                }
            }
            self.discard(&temp);
            return Err(RsuError::CannotRenameFile { from: temp, to: self.path.clone() });
        }

        if had_previous {
            self.discard(&backup);
        }
        debug!("缓存文件已更新：{}，大小：{} 字节", self.path.display(), bytes.len());
        Ok(())
    }

    fn discard(&self, path: &Path) {
        if let Err(e) = self.ops.remove(path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("无法删除文件 {}：{}", path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 指定名称后缀的源文件重命名失败
    #[derive(Debug)]
    struct FailingRename(&'static str);

    impl FileOps for FailingRename {
        fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
            StdFileOps.write(path, bytes)
        }

        fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
            if from.to_string_lossy().ends_with(self.0) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "rename denied"));
            }
            StdFileOps.rename(from, to)
        }

        fn remove(&self, path: &Path) -> io::Result<()> {
            StdFileOps.remove(path)
        }
    }

    #[test]
    fn test_write_new_and_replace() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheFile::new(dir.path().join("uas.cache"));
        assert!(!cache.has_content());

        cache.write_atomically(b"first").unwrap();
        assert_eq!(cache.read().unwrap(), b"first");

        cache.write_atomically(b"second version").unwrap();
        assert_eq!(cache.read().unwrap(), b"second version");
        assert!(!cache.temp_path().exists());
        assert!(!cache.backup_path().exists());
    }

    #[test]
    fn test_rename_failure_keeps_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uas.cache");
        std::fs::write(&path, b"previous").unwrap();

        let cache = CacheFile::with_ops(&path, Arc::new(FailingRename(".tmp")));
        let err = cache.write_atomically(b"next").unwrap_err();

        assert!(matches!(err, RsuError::CannotRenameFile { .. }));
        assert!(err.is_file_invariant());
        assert_eq!(std::fs::read(&path).unwrap(), b"previous");
        assert!(!cache.temp_path().exists());
    }

    #[test]
    fn test_delete_failure_keeps_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uas.cache");
        std::fs::write(&path, b"previous").unwrap();

        let cache = CacheFile::with_ops(&path, Arc::new(FailingRename("uas.cache")));
        let err = cache.write_atomically(b"next").unwrap_err();

        assert!(matches!(err, RsuError::CannotDeleteFile(_)));
        assert_eq!(std::fs::read(&path).unwrap(), b"previous");
    }
}
