// Migration Manager - 统一迁移管理器
//
// 基于版本号驱动的数据迁移系统

use super::pipeline::MigrationReport;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 迁移接口
#[async_trait]
pub trait Migration: Send + Sync {
    /// 迁移唯一标识（如 "board_members"）
    fn id(&self) -> &str;

    /// 迁移名称（用于日志）
    fn name(&self) -> &str;

    /// 目标版本号（迁移执行后达到的版本）
    ///
    /// 示例：
    /// - "0.2.0" - 旧理事会文档 → 会员集合
    /// - "0.4.0" - V1 导出数据导入
    ///
    /// 规则：存储模式版本 < target_version 时执行
    fn target_version(&self) -> &str;

    /// 执行迁移
    ///
    /// 返回：迁移结果（成功/失败、各类记录数等）。
    /// 源集合本身无法读取等灾难性错误以 `Err` 返回，
    /// 此时没有任何报告产生。
    async fn execute(&self) -> Result<MigrationResult>;
}

/// 迁移结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationResult {
    /// 迁移 ID
    pub migration_id: String,
    /// 是否成功（运行完成且没有失败记录）
    pub success: bool,
    /// 结果消息
    pub message: String,
    /// 创建的记录数
    pub records_created: usize,
    /// 跳过的记录数
    pub records_skipped: usize,
    /// 失败的记录数
    pub records_failed: usize,
    /// 失败消息列表（按发生顺序）
    pub failures: Vec<String>,
    /// 执行时间（秒）
    pub duration_secs: f64,
}

impl MigrationResult {
    /// 从一次流水线运行的报告构造结果
    pub fn from_report(migration_id: &str, report: &MigrationReport) -> Self {
        let summary = report.summary();
        Self {
            migration_id: migration_id.to_string(),
            success: report.is_clean(),
            message: format!(
                "创建 {}，跳过 {}，失败 {}，共 {} 条记录",
                summary.created, summary.skipped, summary.failed, summary.total
            ),
            records_created: summary.created,
            records_skipped: summary.skipped,
            records_failed: summary.failed,
            failures: summary.failures,
            duration_secs: 0.0, // 由 MigrationManager 填充
        }
    }
}

/// 版本比较辅助函数
pub fn compare_versions(v1: &str, v2: &str) -> Ordering {
    use semver::Version;

    let version1 = Version::parse(v1).ok();
    let version2 = Version::parse(v2).ok();

    match (version1, version2) {
        (Some(ver1), Some(ver2)) => ver1.cmp(&ver2),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => v1.cmp(v2), // 字符串比较
    }
}
