use crate::error::Result;
use crate::types::ProbeResult;
use std::path::Path;
use tokio::fs;

/// 按延迟升序排序, 延迟相同时保持原有顺序 (稳定排序)
pub fn sort_by_latency(results: &mut [ProbeResult]) {
    results.sort_by(|a, b| a.latency_ms.total_cmp(&b.latency_ms));
}

/// 表格中的延迟显示, 失败的显示为 Timeout
pub fn format_latency(latency_ms: f64, sentinel: f64) -> String {
    if latency_ms >= sentinel {
        "Timeout".to_string()
    } else {
        format!("{:.0}ms", latency_ms)
    }
}

/// 解析域名列表: 每行一个, 忽略空行和 `#` 注释
pub fn parse_domain_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub async fn read_domain_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).await?;
    Ok(parse_domain_list(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sort_is_stable() {
        let mut results = vec![
            ProbeResult::new("x.com", 30000.0),
            ProbeResult::new("fast.com", 10.0),
            ProbeResult::new("y.com", 30000.0),
            ProbeResult::new("z.com", 10.0),
        ];
        sort_by_latency(&mut results);

        let order: Vec<_> = results.iter().map(|r| r.domain.as_str()).collect();
        assert_eq!(order, vec!["fast.com", "z.com", "x.com", "y.com"]);
    }

    #[test]
    fn test_format_latency() {
        assert_eq!(format_latency(45.4, 30000.0), "45ms");
        assert_eq!(format_latency(30000.0, 30000.0), "Timeout");
    }

    #[tokio::test]
    async fn test_read_domain_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("domains.txt");
        fs::write(&path, "# candidates\na.com\n\n  b.com  # backup\nc.com\n").await?;

        assert_eq!(read_domain_file(&path).await?, vec!["a.com", "b.com", "c.com"]);
        assert!(read_domain_file(&dir.path().join("missing.txt")).await.is_err());
        Ok(())
    }
}
