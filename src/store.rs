use crate::error::Result;
use crate::traits::KeyValueStore;
use crate::types::ProbeResult;
use crate::utils;
use std::sync::Arc;

/// 最近一次测速结果的持久化
///
/// 快照以 JSON 数组 `[{"domain": .., "time": ..}]` 存在固定 key 下, 按延迟升序。
pub struct ResultStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
}

impl ResultStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, key: &str) -> Self {
        Self {
            backend,
            key: key.to_string(),
        }
    }

    /// 写入前再排序一次, 保证快照始终有序
    pub async fn set(&self, results: &[ProbeResult]) -> Result<()> {
        let mut sorted = results.to_vec();
        utils::sort_by_latency(&mut sorted);

        let json = serde_json::to_string(&sorted)?;
        self.backend.write(&self.key, &json).await
    }

    /// key 不存在、为空或无法解析时返回空列表, 不会失败
    pub async fn get(&self) -> Vec<ProbeResult> {
        match self.try_get().await {
            Ok(results) => results,
            Err(err) => {
                tracing::warn!(
                    key = %self.key,
                    backend = self.backend.name(),
                    "Failed to load stored results: {}",
                    err
                );
                Vec::new()
            }
        }
    }

    async fn try_get(&self) -> Result<Vec<ProbeResult>> {
        let content = match self.backend.read(&self.key).await? {
            Some(content) if !content.trim().is_empty() => content,
            _ => return Ok(Vec::new()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub async fn clear(&self) -> Result<()> {
        self.backend.delete(&self.key).await
    }
}
