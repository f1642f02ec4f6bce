use crate::config::SpeedTestConfig;
use crate::traits::{Probe, Transport};
use crate::types::ProbeOutcome;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

/// 单个域名测速
///
/// 请求 `https://{domain}{probe_path}`, 200 且响应体读取完成即视为成功,
/// 其余情况 (超时/连接错误/非 200) 都不会向上抛错。
pub struct Prober<T: Transport> {
    transport: T,
    probe_path: String,
    timeout: Duration,
}

impl<T: Transport> Prober<T> {
    pub fn new(transport: T, config: &SpeedTestConfig) -> Self {
        Self {
            transport,
            probe_path: normalize_path(&config.probe_path),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    pub fn url_for(&self, domain: &str) -> String {
        format!("https://{}{}", domain, self.probe_path)
    }

    /// 超时后才完成的请求 (timeout 检查前最后一次 poll 恰好完成) 仍按超时处理
    fn completed_after(&self, elapsed: Duration) -> ProbeOutcome {
        if elapsed >= self.timeout {
            ProbeOutcome::Timeout
        } else {
            ProbeOutcome::Success {
                latency_ms: elapsed.as_secs_f64() * 1000.0,
            }
        }
    }
}

#[async_trait]
impl<T: Transport> Probe for Prober<T> {
    async fn probe(&self, domain: &str) -> ProbeOutcome {
        let url = self.url_for(domain);
        let start = Instant::now();

        // Transport 自身也有超时, 这里再包一层保证上限
        let request = self.transport.get(&url, self.timeout);
        let outcome = match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(200)) => self.completed_after(start.elapsed()),
            Ok(Ok(status)) => ProbeOutcome::BadStatus(status),
            Ok(Err(failure)) => failure.into(),
            Err(_) => ProbeOutcome::Timeout,
        };

        if !outcome.is_success() {
            tracing::warn!(domain = %domain, url = %url, "probe failed: {}", outcome);
        } else {
            tracing::debug!(domain = %domain, "probe {}", outcome);
        }

        outcome
    }
}

fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}
