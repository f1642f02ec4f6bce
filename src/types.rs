use serde::{Deserialize, Serialize};
use std::fmt;

/// 单个域名的测速结果 (持久化单元)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub domain: String,
    /// 延迟 (毫秒), 失败时等于配置的超时时间 (sentinel)
    #[serde(rename = "time")]
    pub latency_ms: f64,
}

impl ProbeResult {
    pub fn new(domain: &str, latency_ms: f64) -> Self {
        Self {
            domain: domain.to_string(),
            latency_ms,
        }
    }
}

/// 传输层失败的具体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// DNS / TCP / TLS 握手失败
    Connect,
    /// 请求构建或发送失败
    Request,
    /// 响应体读取中断
    Body,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Request => "request",
            TransportErrorKind::Body => "body",
            TransportErrorKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// Transport 报告的失败
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    Error(TransportErrorKind),
}

/// 一次探测的完整结果
///
/// 只有在转换为 [`ProbeResult`] 时才会折叠为 sentinel 延迟,
/// 日志里仍能区分超时、状态码错误和连接错误。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeOutcome {
    Success { latency_ms: f64 },
    Timeout,
    BadStatus(u16),
    TransportError(TransportErrorKind),
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success { .. })
    }

    pub fn latency_ms(&self, sentinel: f64) -> f64 {
        match self {
            ProbeOutcome::Success { latency_ms } => *latency_ms,
            _ => sentinel,
        }
    }
}

impl From<TransportFailure> for ProbeOutcome {
    fn from(failure: TransportFailure) -> Self {
        match failure {
            TransportFailure::Timeout => ProbeOutcome::Timeout,
            TransportFailure::Error(kind) => ProbeOutcome::TransportError(kind),
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Success { latency_ms } => write!(f, "ok ({:.0}ms)", latency_ms),
            ProbeOutcome::Timeout => f.write_str("timeout"),
            ProbeOutcome::BadStatus(code) => write!(f, "status {}", code),
            ProbeOutcome::TransportError(kind) => write!(f, "transport error ({})", kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_collapse_to_sentinel() {
        let sentinel = 30000.0;
        assert_eq!(ProbeOutcome::Success { latency_ms: 12.5 }.latency_ms(sentinel), 12.5);
        assert_eq!(ProbeOutcome::Timeout.latency_ms(sentinel), sentinel);
        assert_eq!(ProbeOutcome::BadStatus(503).latency_ms(sentinel), sentinel);
        assert_eq!(
            ProbeOutcome::TransportError(TransportErrorKind::Connect).latency_ms(sentinel),
            sentinel
        );
    }

    #[test]
    fn serializes_latency_as_time() {
        let json = serde_json::to_string(&ProbeResult::new("a.com", 45.0)).unwrap();
        assert_eq!(json, r#"{"domain":"a.com","time":45.0}"#);

        let back: ProbeResult = serde_json::from_str(r#"{"domain":"b.com","time":30000}"#).unwrap();
        assert_eq!(back, ProbeResult::new("b.com", 30000.0));
    }
}
