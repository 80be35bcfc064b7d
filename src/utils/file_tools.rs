//! 文件工具模块
//!
//! 提供文本记录 sink 用到的目录与追加写文件操作。

use crate::error::{ChanlogError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// 文件工具结构体
///
/// 提供各种文件操作的静态方法
pub struct FileTools;

impl FileTools {
    /// 确保目录存在，如果不存在则创建
    ///
    /// # 参数
    ///
    /// * `path` - 目录路径
    pub fn ensure_directory_exists<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();

        if !path.exists() {
            fs::create_dir_all(path).map_err(|e| ChanlogError::IoError { source: e })?
        } else if !path.is_dir() {
            return Err(ChanlogError::IoError {
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("路径存在但不是目录: {}", path.display()),
                ),
            });
        }

        Ok(())
    }

    /// 打开文件进行追加写入
    ///
    /// 不会创建父目录：目录缺失属于调用方应当看到的 I/O 错误。
    pub fn open_file_append<P: AsRef<Path>>(file_path: P) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path.as_ref())
            .map_err(|e| ChanlogError::IoError { source: e })
    }

    /// 以追加方式写入一行并立即刷新
    pub fn append_line<P: AsRef<Path>>(file_path: P, line: &str) -> Result<()> {
        let mut file = Self::open_file_append(file_path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// 检查目录是否可写
    pub fn is_directory_writable<P: AsRef<Path>>(dir_path: P) -> bool {
        let dir_path = dir_path.as_ref();

        if !dir_path.exists() || !dir_path.is_dir() {
            return false;
        }

        // 尝试在目录中创建临时文件
        let temp_file = dir_path.join(".chanlog_write_test");
        let result = File::create(&temp_file).is_ok();

        // 清理临时文件
        if temp_file.exists() {
            let _ = fs::remove_file(&temp_file);
        }

        result
    }
}
