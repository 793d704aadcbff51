//! 通用批量迁移流水线
//!
//! 与具体数据库无关的"读取-重塑-写入"工具，分四个部分：
//! - `source`: 松散源记录与显式的可选字段访问
//! - `mapper`: 纯函数字段映射（每种迁移一个实现）
//! - `guard`: 建议性幂等检查
//! - `batch`: 逐条编排与写入
//! - `report`: 运行结局累加
//!
//! 单线程顺序处理，每条记录的映射→检查→写入完成后才处理下一条。
//! 设计面向一次性、人工触发、不并发的迁移运行。

pub mod batch;
pub mod guard;
pub mod mapper;
pub mod report;
pub mod source;

pub use batch::{BatchMigrator, MergeWriter, StoreWriter, TargetWriter};
pub use guard::{FieldPresenceGuard, GuardDecision, IdempotencyGuard, StoreGuard};
pub use mapper::{
    split_name, synthesize_email, FieldMapper, LookupKey, MapperDefaults, TargetRecord,
};
pub use report::{MigrationOutcome, MigrationReport, ReportSummary, SkipReason};
pub use source::{MapError, SourceRecord};
