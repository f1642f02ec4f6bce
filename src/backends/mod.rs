pub mod file;
#[cfg(test)]
pub mod memory;

use crate::error::{Result, SpeedTestError};
use crate::traits::KeyValueStore;
use std::path::Path;
use std::sync::Arc;

// 结果需要跨进程保存, 内存存储只用于测试
pub const SUPPORTED_BACKENDS: &[&str] = &["file"];

pub fn open(name: &str, dir: &Path) -> Result<Arc<dyn KeyValueStore>> {
    match name.to_lowercase().as_str() {
        "file" => Ok(Arc::new(file::FileStore::new(dir.to_path_buf()))),
        _ => Err(SpeedTestError::UnknownBackend(format!(
            "Unsupported backend: '{}'. Available: {}",
            name,
            SUPPORTED_BACKENDS.join(", ")
        ))),
    }
}
