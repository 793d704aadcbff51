//! 幂等检查：判断目标记录是否已存在
//!
//! 检查是建议性的：漏判（报告"不存在"而实际存在）是被容忍的，
//! 最终由存储 create 的唯一约束兜底。查找本身失败时返回错误，
//! 由批量迁移器按既定策略处理（见 [`crate::models::LookupPolicy`]）。

use super::mapper::LookupKey;
use crate::data::{DocumentStore, Result};

/// 幂等检查结论
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// 目标已存在，附带已有文档 ID
    Exists(String),
    /// 未找到目标
    Absent,
}

/// 幂等检查接口
pub trait IdempotencyGuard: Send + Sync {
    /// 按查找键检查目标是否已存在
    fn check(&self, key: &LookupKey) -> Result<GuardDecision>;
}

/// 基于目标集合等值查找的检查器
///
/// 把查找键的过滤条件原样交给存储做整集合等值扫描。
pub struct StoreGuard<'a> {
    store: &'a DocumentStore,
    collection: String,
}

impl<'a> StoreGuard<'a> {
    pub fn new(store: &'a DocumentStore, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }
}

impl IdempotencyGuard for StoreGuard<'_> {
    fn check(&self, key: &LookupKey) -> Result<GuardDecision> {
        match self.store.find_matching(&self.collection, &key.filters())? {
            Some(doc_id) => Ok(GuardDecision::Exists(doc_id)),
            None => Ok(GuardDecision::Absent),
        }
    }
}

/// 基于单个目标文档字段存在性的检查器
///
/// 用于合并型迁移（多个源文档并入同一个目标文档）：
/// 查找键的首个值被解释为目标文档里的顶层字段名，
/// 字段已存在即视为该源记录已迁移。
pub struct FieldPresenceGuard<'a> {
    store: &'a DocumentStore,
    collection: String,
    doc_id: String,
}

impl<'a> FieldPresenceGuard<'a> {
    pub fn new(
        store: &'a DocumentStore,
        collection: impl Into<String>,
        doc_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            collection: collection.into(),
            doc_id: doc_id.into(),
        }
    }
}

impl IdempotencyGuard for FieldPresenceGuard<'_> {
    fn check(&self, key: &LookupKey) -> Result<GuardDecision> {
        let field = key.primary_value();
        match self.store.read(&self.collection, &self.doc_id)? {
            Some(doc) if doc.get(field).is_some() => {
                Ok(GuardDecision::Exists(self.doc_id.clone()))
            }
            _ => Ok(GuardDecision::Absent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_store_guard_detects_existing_target() {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::new(temp.path());
        store
            .create("members", "jane-doe", &json!({"email": "jane.doe@gsbea.org"}))
            .unwrap();

        let guard = StoreGuard::new(&store, "members");

        let hit = guard
            .check(&LookupKey::single("email", "jane.doe@gsbea.org"))
            .unwrap();
        assert_eq!(hit, GuardDecision::Exists("jane-doe".to_string()));

        let miss = guard
            .check(&LookupKey::single("email", "ghost@gsbea.org"))
            .unwrap();
        assert_eq!(miss, GuardDecision::Absent);
    }

    #[test]
    fn test_store_guard_composite_key() {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::new(temp.path());
        store
            .create(
                "members",
                "jane-doe",
                &json!({"firstName": "Jane", "lastName": "Doe", "membershipType": "pastPresident"}),
            )
            .unwrap();

        let guard = StoreGuard::new(&store, "members");
        let key = LookupKey::composite(vec![
            ("firstName".to_string(), "Jane".to_string()),
            ("lastName".to_string(), "Doe".to_string()),
            ("membershipType".to_string(), "pastPresident".to_string()),
        ]);
        assert_eq!(guard.check(&key).unwrap(), GuardDecision::Exists("jane-doe".to_string()));
    }

    #[test]
    fn test_field_presence_guard() {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::new(temp.path());
        store
            .upsert("siteSettings", "main", &json!({"homepage": {"banner": "欢迎"}}))
            .unwrap();

        let guard = FieldPresenceGuard::new(&store, "siteSettings", "main");

        assert_eq!(
            guard.check(&LookupKey::single("section", "homepage")).unwrap(),
            GuardDecision::Exists("main".to_string())
        );
        assert_eq!(
            guard.check(&LookupKey::single("section", "contact")).unwrap(),
            GuardDecision::Absent
        );
    }

    #[test]
    fn test_field_presence_guard_missing_document() {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::new(temp.path());

        let guard = FieldPresenceGuard::new(&store, "siteSettings", "main");
        assert_eq!(
            guard.check(&LookupKey::single("section", "homepage")).unwrap(),
            GuardDecision::Absent
        );
    }
}
