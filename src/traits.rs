use crate::error::Result;
use crate::types::{ProbeOutcome, TransportFailure};
use async_trait::async_trait;
use std::time::Duration;

/// Transport: 执行一次 HTTPS GET
#[async_trait]
pub trait Transport: Sync + Send {
    /// 返回 HTTP 状态码
    /// 实现中必须保证:
    /// 1. 不超过给定的 timeout
    /// 2. 状态码为 200 时, 响应体已完整读取
    async fn get(&self, url: &str, timeout: Duration) -> std::result::Result<u16, TransportFailure>;
}

/// KeyValueStore: 测速结果的持久化后端
#[async_trait]
pub trait KeyValueStore: Sync + Send {
    /// 后端名称 (如 "file", "memory")
    fn name(&self) -> &'static str;

    /// 读取 key, 不存在时返回 None
    async fn read(&self, key: &str) -> Result<Option<String>>;

    async fn write(&self, key: &str, value: &str) -> Result<()>;

    /// 删除 key, key 不存在不算错误
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Probe: 对单个域名测速, 所有失败都体现在 ProbeOutcome 中
#[async_trait]
pub trait Probe: Sync + Send {
    async fn probe(&self, domain: &str) -> ProbeOutcome;
}
