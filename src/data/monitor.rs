//! 查询性能监控
//!
//! 用计时器包装存储调用，按标签累计查询次数与耗时，
//! 超过慢查询阈值时输出 warn 日志。纯内存统计，线程安全。

use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// 单个标签的累计统计
#[derive(Debug, Clone, Default)]
struct QueryStats {
    count: u64,
    total: Duration,
    max: Duration,
}

/// 对外暴露的统计快照
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuerySummary {
    /// 查询次数
    pub count: u64,
    /// 累计耗时（毫秒）
    pub total_millis: u64,
    /// 单次最大耗时（毫秒）
    pub max_millis: u64,
    /// 平均耗时（毫秒）
    pub avg_millis: u64,
}

/// 查询性能监控器
pub struct QueryMonitor {
    /// 慢查询阈值，超过则 warn
    slow_threshold: Duration,
    stats: RwLock<HashMap<String, QueryStats>>,
}

impl QueryMonitor {
    /// 创建监控器
    ///
    /// # 参数
    ///
    /// - `slow_threshold`: 慢查询阈值
    pub fn new(slow_threshold: Duration) -> Self {
        Self {
            slow_threshold,
            stats: RwLock::new(HashMap::new()),
        }
    }

    /// 执行并计时一次查询
    ///
    /// 返回被包装调用的原始结果，耗时记入对应标签。
    ///
    /// # 示例
    ///
    /// ```rust
    /// let members = monitor.observe("members.read_all", || store.read_all("members"))?;
    /// ```
    pub fn observe<T>(&self, label: &str, query: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = query();
        let elapsed = start.elapsed();

        if elapsed > self.slow_threshold {
            tracing::warn!(
                "慢查询: {} 耗时 {:.1}ms（阈值 {:.1}ms）",
                label,
                elapsed.as_secs_f64() * 1000.0,
                self.slow_threshold.as_secs_f64() * 1000.0
            );
        } else {
            tracing::debug!("查询 {} 耗时 {:.1}ms", label, elapsed.as_secs_f64() * 1000.0);
        }

        if let Ok(mut stats) = self.stats.write() {
            let entry = stats.entry(label.to_string()).or_default();
            entry.count += 1;
            entry.total += elapsed;
            if elapsed > entry.max {
                entry.max = elapsed;
            }
        }

        result
    }

    /// 获取所有标签的统计快照
    pub fn stats(&self) -> HashMap<String, QuerySummary> {
        let stats = match self.stats.read() {
            Ok(stats) => stats,
            Err(_) => return HashMap::new(),
        };

        stats
            .iter()
            .map(|(label, s)| {
                let total_millis = s.total.as_millis() as u64;
                (
                    label.clone(),
                    QuerySummary {
                        count: s.count,
                        total_millis,
                        max_millis: s.max.as_millis() as u64,
                        avg_millis: if s.count > 0 { total_millis / s.count } else { 0 },
                    },
                )
            })
            .collect()
    }

    /// 清空统计
    pub fn reset(&self) {
        if let Ok(mut stats) = self.stats.write() {
            stats.clear();
        }
    }
}

impl Default for QueryMonitor {
    fn default() -> Self {
        // 默认阈值 250ms
        Self::new(Duration::from_millis(250))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_observe_returns_result() {
        let monitor = QueryMonitor::default();
        let value = monitor.observe("test.query", || 42);
        assert_eq!(value, 42);
    }

    #[test]
    fn test_stats_accumulate() {
        let monitor = QueryMonitor::default();
        monitor.observe("members.read_all", || ());
        monitor.observe("members.read_all", || ());
        monitor.observe("settings.read", || ());

        let stats = monitor.stats();
        assert_eq!(stats["members.read_all"].count, 2);
        assert_eq!(stats["settings.read"].count, 1);
    }

    #[test]
    fn test_slow_query_recorded() {
        let monitor = QueryMonitor::new(Duration::from_millis(1));
        monitor.observe("slow.query", || {
            thread::sleep(Duration::from_millis(10));
        });

        let stats = monitor.stats();
        assert!(stats["slow.query"].max_millis >= 10);
        assert!(stats["slow.query"].avg_millis >= 10);
    }

    #[test]
    fn test_reset() {
        let monitor = QueryMonitor::default();
        monitor.observe("a", || ());
        assert_eq!(monitor.stats().len(), 1);

        monitor.reset();
        assert!(monitor.stats().is_empty());
    }

    #[test]
    fn test_concurrent_observe() {
        let monitor = Arc::new(QueryMonitor::default());
        let mut handles = vec![];

        for _ in 0..8 {
            let monitor_clone = Arc::clone(&monitor);
            handles.push(thread::spawn(move || {
                for _ in 0..10 {
                    monitor_clone.observe("concurrent", || ());
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(monitor.stats()["concurrent"].count, 80);
    }
}
