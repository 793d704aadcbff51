//! 批量迁移器：一次迁移运行的编排
//!
//! 按源集合给出的顺序逐条处理：映射 → 幂等检查 → 写入。
//! 单条记录的失败只记入报告，运行永不中途放弃；
//! 失败的记录在本次运行内不做重试，由人工重新发起整次迁移，
//! 依靠幂等检查避免重复处理已迁移的记录。

use super::guard::{GuardDecision, IdempotencyGuard};
use super::mapper::{FieldMapper, TargetRecord};
use super::report::{MigrationOutcome, MigrationReport, SkipReason};
use super::source::SourceRecord;
use crate::data::{DataError, DocumentStore, Result};
use crate::models::LookupPolicy;
use serde_json::Value;

/// 目标记录写入接口
pub trait TargetWriter: Send + Sync {
    /// 写入一条目标记录，返回写入的文档 ID
    ///
    /// 唯一约束冲突以 [`DataError::AlreadyExists`] 返回，
    /// 由批量迁移器记为跳过而非失败。
    fn write(&self, target: &TargetRecord) -> Result<String>;
}

/// 创建型写入：每条目标记录创建一个新文档
///
/// 使用存储的 create 唯一约束，同一文档 ID 不会被写两次。
pub struct StoreWriter<'a> {
    store: &'a DocumentStore,
}

impl<'a> StoreWriter<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }
}

impl TargetWriter for StoreWriter<'_> {
    fn write(&self, target: &TargetRecord) -> Result<String> {
        self.store
            .create(&target.collection, &target.doc_id, &target.fields)?;
        Ok(target.doc_id.clone())
    }
}

/// 合并型写入：把目标记录的顶层字段并入同一个文档
///
/// 用于把分散的旧文档整合为单个文档的迁移，
/// 底层走"更新文档字段"操作，文档不存在时创建。
pub struct MergeWriter<'a> {
    store: &'a DocumentStore,
}

impl<'a> MergeWriter<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }
}

impl TargetWriter for MergeWriter<'_> {
    fn write(&self, target: &TargetRecord) -> Result<String> {
        let fields = match &target.fields {
            Value::Object(map) => map,
            _ => {
                return Err(DataError::NotAnObject(format!(
                    "{}/{}",
                    target.collection, target.doc_id
                )))
            }
        };
        self.store
            .update_fields(&target.collection, &target.doc_id, fields)?;
        Ok(target.doc_id.clone())
    }
}

/// 批量迁移器
pub struct BatchMigrator<'a> {
    mapper: &'a dyn FieldMapper,
    guard: &'a dyn IdempotencyGuard,
    writer: &'a dyn TargetWriter,
    policy: LookupPolicy,
}

impl<'a> BatchMigrator<'a> {
    pub fn new(
        mapper: &'a dyn FieldMapper,
        guard: &'a dyn IdempotencyGuard,
        writer: &'a dyn TargetWriter,
    ) -> Self {
        Self {
            mapper,
            guard,
            writer,
            policy: LookupPolicy::default(),
        }
    }

    /// 设置幂等查找失败策略（整次运行只用这一种）
    pub fn with_policy(mut self, policy: LookupPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 执行一次迁移运行
    ///
    /// 总是跑完全部源记录并返回覆盖每条记录的报告；
    /// 空的源集合返回全零报告。
    pub fn run(&self, sources: &[SourceRecord]) -> MigrationReport {
        let kind = self.mapper.kind().to_string();
        let mut report = MigrationReport::new(&kind);

        tracing::info!("迁移 {} 开始，共 {} 条源记录", kind, sources.len());

        for source in sources {
            let outcome = self.process_one(source);
            match &outcome {
                MigrationOutcome::Created { source_id, target_id } => {
                    tracing::info!("[{}] {} -> 已创建 {}", kind, source_id, target_id);
                }
                MigrationOutcome::Skipped { source_id, reason } => {
                    tracing::info!("[{}] {} -> 跳过（{}）", kind, source_id, reason);
                }
                MigrationOutcome::Failed { source_id, error } => {
                    tracing::error!("[{}] {} -> 失败: {}", kind, source_id, error);
                }
            }
            report.record(outcome);
        }

        let summary = report.summary();
        tracing::info!(
            "迁移 {} 完成: 创建 {}，跳过 {}，失败 {}，共 {}",
            kind,
            summary.created,
            summary.skipped,
            summary.failed,
            summary.total
        );

        report
    }

    /// 处理单条记录：映射 → 幂等检查 → 写入
    fn process_one(&self, source: &SourceRecord) -> MigrationOutcome {
        let source_id = source.id().to_string();

        // 1. 映射。失败记为 Failed，继续下一条。
        let target = match self.mapper.map(source) {
            Ok(target) => target,
            Err(e) => {
                return MigrationOutcome::Failed {
                    source_id,
                    error: e.to_string(),
                }
            }
        };

        // 2. 幂等检查。命中记为 Skipped；查找失败按策略处理。
        match self.guard.check(&target.lookup) {
            Ok(GuardDecision::Exists(existing)) => {
                tracing::debug!(
                    "幂等检查命中: {}（已有文档 {}）",
                    target.lookup.describe(),
                    existing
                );
                return MigrationOutcome::Skipped {
                    source_id,
                    reason: SkipReason::Duplicate,
                };
            }
            Ok(GuardDecision::Absent) => {}
            Err(e) => match self.policy {
                LookupPolicy::Conservative => {
                    tracing::warn!(
                        "幂等查找失败（{}），按保守策略跳过: {}",
                        target.lookup.describe(),
                        e
                    );
                    return MigrationOutcome::Skipped {
                        source_id,
                        reason: SkipReason::ExistenceUnknown,
                    };
                }
                LookupPolicy::Optimistic => {
                    tracing::warn!(
                        "幂等查找失败（{}），按乐观策略继续写入: {}",
                        target.lookup.describe(),
                        e
                    );
                }
            },
        }

        // 3. 写入。唯一约束冲突等价于幂等命中，记为跳过；
        //    其余写入错误记为 Failed，不重试。
        match self.writer.write(&target) {
            Ok(target_id) => MigrationOutcome::Created {
                source_id,
                target_id,
            },
            Err(e) if e.is_conflict() => MigrationOutcome::Skipped {
                source_id,
                reason: SkipReason::Duplicate,
            },
            Err(e) => MigrationOutcome::Failed {
                source_id,
                error: e.to_string(),
            },
        }
    }
}
