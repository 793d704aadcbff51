//! 迁移运行报告
//!
//! 纯内存累加器，作用域限定在一次运行内；运行结束后交还调用方，
//! 不做持久化，也不安排重试。

use serde::Serialize;

/// 记录被跳过的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// 目标已存在（幂等检查命中或唯一约束冲突）
    Duplicate,
    /// 幂等查找失败，存在性未知，按保守策略跳过
    ExistenceUnknown,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Duplicate => write!(f, "目标已存在"),
            SkipReason::ExistenceUnknown => write!(f, "存在性未知"),
        }
    }
}

/// 单条源记录的迁移结局
///
/// 每条源记录恰好产生一个结局。
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOutcome {
    /// 已创建目标记录
    Created {
        source_id: String,
        target_id: String,
    },
    /// 跳过
    Skipped {
        source_id: String,
        reason: SkipReason,
    },
    /// 失败（映射错误或写入错误），该记录在本次运行内不再重试
    Failed { source_id: String, error: String },
}

impl MigrationOutcome {
    pub fn source_id(&self) -> &str {
        match self {
            MigrationOutcome::Created { source_id, .. }
            | MigrationOutcome::Skipped { source_id, .. }
            | MigrationOutcome::Failed { source_id, .. } => source_id,
        }
    }
}

/// 报告汇总：按结局种类计数，附失败消息列表
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
    /// 失败消息，按发生顺序排列
    pub failures: Vec<String>,
}

/// 一次迁移运行的报告
#[derive(Debug)]
pub struct MigrationReport {
    /// 迁移种类标识
    kind: String,
    outcomes: Vec<MigrationOutcome>,
}

impl MigrationReport {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            outcomes: Vec::new(),
        }
    }

    /// 迁移种类标识
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// 累加一条结局
    pub fn record(&mut self, outcome: MigrationOutcome) {
        self.outcomes.push(outcome);
    }

    /// 全部结局，按处理顺序排列
    pub fn outcomes(&self) -> &[MigrationOutcome] {
        &self.outcomes
    }

    /// 是否没有任何失败
    pub fn is_clean(&self) -> bool {
        !self
            .outcomes
            .iter()
            .any(|o| matches!(o, MigrationOutcome::Failed { .. }))
    }

    /// 汇总计数与失败消息
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            created: 0,
            skipped: 0,
            failed: 0,
            total: self.outcomes.len(),
            failures: Vec::new(),
        };

        for outcome in &self.outcomes {
            match outcome {
                MigrationOutcome::Created { .. } => summary.created += 1,
                MigrationOutcome::Skipped { .. } => summary.skipped += 1,
                MigrationOutcome::Failed { source_id, error } => {
                    summary.failed += 1;
                    summary.failures.push(format!("{source_id}: {error}"));
                }
            }
        }

        summary
    }
}
