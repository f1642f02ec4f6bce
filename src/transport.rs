use crate::error::Result;
use crate::traits::Transport;
use crate::types::{TransportErrorKind, TransportFailure};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("domspeed/", env!("CARGO_PKG_VERSION"));

/// 基于 reqwest 的 HTTPS Transport
///
/// 整个测速过程共用一个 Client (连接池), 超时按请求单独设置。
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// 忽略系统代理, 测试时直连本地服务
    #[cfg(test)]
    pub fn direct() -> Self {
        let client = Client::builder().no_proxy().build().unwrap();
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, timeout: Duration) -> std::result::Result<u16, TransportFailure> {
        let resp = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = resp.status().as_u16();
        if status != 200 {
            // 连上了但返回 404/500 等, 直接丢弃响应体
            return Ok(status);
        }

        // 200 需要完整读取响应体才算成功
        resp.bytes().await.map_err(classify)?;
        Ok(status)
    }
}

fn classify(err: reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        TransportFailure::Timeout
    } else if err.is_connect() {
        TransportFailure::Error(TransportErrorKind::Connect)
    } else if err.is_body() || err.is_decode() {
        TransportFailure::Error(TransportErrorKind::Body)
    } else if err.is_request() || err.is_builder() {
        TransportFailure::Error(TransportErrorKind::Request)
    } else {
        TransportFailure::Error(TransportErrorKind::Other)
    }
}
