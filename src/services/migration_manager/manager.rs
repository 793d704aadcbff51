// Migration Manager - 迁移管理器核心
//
// 统一管理所有数据迁移操作

use super::migration_trait::{compare_versions, Migration, MigrationResult};
use crate::data::DocumentStore;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::cmp::Ordering;
use std::sync::Arc;

/// 当前应用版本（从 Cargo.toml 读取）
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// 模式版本记录所在的集合与文档
const META_COLLECTION: &str = "_meta";
const SCHEMA_DOC: &str = "schema";

/// 迁移管理器
pub struct MigrationManager {
    store: Arc<DocumentStore>,
    migrations: Vec<Arc<dyn Migration>>,
}

impl MigrationManager {
    /// 创建新的迁移管理器
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self {
            store,
            migrations: Vec::new(),
        }
    }

    /// 注册迁移
    pub fn register(&mut self, migration: Arc<dyn Migration>) {
        tracing::debug!(
            "注册迁移: {} (目标版本: {})",
            migration.id(),
            migration.target_version()
        );
        self.migrations.push(migration);
    }

    /// 执行所有需要的迁移
    ///
    /// 流程：
    /// 1. 读取存储的模式版本（`_meta/schema`）
    /// 2. 筛选需要执行的迁移（target_version > 当前版本）
    /// 3. 按 target_version 排序（从低到高）
    /// 4. 依次执行迁移
    /// 5. 每个迁移成功后更新模式版本 = target_version；
    ///    一旦有迁移失败，版本停在失败前的位置不再推进，
    ///    这样下次运行会重新列出失败的迁移（已成功的部分靠幂等检查跳过）
    /// 6. 全部成功时最后把模式版本推进到 APP_VERSION
    pub async fn run_all(&self) -> Result<Vec<MigrationResult>> {
        tracing::info!("开始执行迁移检查（应用版本: {}）", APP_VERSION);

        // 1. 读取当前模式版本
        let current_version = self.get_current_version()?;
        tracing::info!("当前模式版本: {}", current_version);

        // 2. 筛选需要执行的迁移
        let mut pending_migrations: Vec<_> = self
            .migrations
            .iter()
            .filter(|m| {
                let needs =
                    compare_versions(&current_version, m.target_version()) == Ordering::Less;
                if needs {
                    tracing::info!(
                        "需要执行迁移: {} ({} → {})",
                        m.name(),
                        current_version,
                        m.target_version()
                    );
                }
                needs
            })
            .collect();

        if pending_migrations.is_empty() {
            tracing::info!("无需执行迁移");
        } else {
            // 3. 按 target_version 排序（从低到高）
            pending_migrations
                .sort_by(|a, b| compare_versions(a.target_version(), b.target_version()));

            tracing::info!("共 {} 个迁移需要执行", pending_migrations.len());
        }

        // 4. 依次执行迁移
        let mut results = Vec::new();
        // 出现失败后冻结版本推进，保证失败的迁移下次仍是待执行状态
        let mut version_frozen = false;

        for migration in pending_migrations {
            tracing::info!(
                "执行迁移: {} (目标版本: {})",
                migration.name(),
                migration.target_version()
            );

            let start_time = std::time::Instant::now();
            let result = migration.execute().await;

            match result {
                Ok(mut migration_result) => {
                    migration_result.duration_secs = start_time.elapsed().as_secs_f64();

                    tracing::info!(
                        "迁移 {} 完成: {}（耗时 {:.2}s）",
                        migration.name(),
                        migration_result.message,
                        migration_result.duration_secs
                    );

                    // 5. 没有失败记录且版本未被冻结时才推进模式版本
                    if migration_result.success && !version_frozen {
                        if let Err(e) = self.update_schema_version(migration.target_version()) {
                            tracing::error!("更新模式版本失败: {}", e);
                            // 不中断后续迁移
                        }
                    } else if !migration_result.success {
                        version_frozen = true;
                        tracing::warn!(
                            "迁移 {} 有 {} 条失败记录，模式版本停止推进以便重试",
                            migration.name(),
                            migration_result.records_failed
                        );
                    }

                    results.push(migration_result);
                }
                Err(e) => {
                    let error_result = MigrationResult {
                        migration_id: migration.id().to_string(),
                        success: false,
                        message: format!("迁移失败: {}", e),
                        records_created: 0,
                        records_skipped: 0,
                        records_failed: 0,
                        failures: vec![e.to_string()],
                        duration_secs: start_time.elapsed().as_secs_f64(),
                    };

                    tracing::error!(
                        "迁移 {} 失败: {}（耗时 {:.2}s）",
                        migration.name(),
                        e,
                        error_result.duration_secs
                    );

                    results.push(error_result);

                    // 6. 迁移失败，冻结版本推进，继续执行后续迁移（不中断）
                    version_frozen = true;
                    tracing::warn!("迁移失败，继续执行后续迁移");
                }
            }
        }

        // 7. 全部成功时把模式版本推进到当前应用版本
        let all_succeeded = results.iter().all(|r| r.success);
        if all_succeeded && compare_versions(&self.get_current_version()?, APP_VERSION) == Ordering::Less
        {
            tracing::info!("更新模式版本 → {}", APP_VERSION);
            if let Err(e) = self.update_schema_version(APP_VERSION) {
                tracing::error!("更新模式版本失败: {}", e);
            }
        }

        if !results.is_empty() {
            tracing::info!(
                "所有迁移执行完成，成功 {} 个，失败 {} 个",
                results.iter().filter(|r| r.success).count(),
                results.iter().filter(|r| !r.success).count()
            );
        }

        Ok(results)
    }

    /// 获取当前模式版本
    fn get_current_version(&self) -> Result<String> {
        match self.store.read(META_COLLECTION, SCHEMA_DOC)? {
            Some(doc) => Ok(doc
                .get("version")
                .and_then(|v| v.as_str())
                .unwrap_or("0.0.0")
                .to_string()),
            None => Ok("0.0.0".to_string()), // 无版本文档，视为初始版本
        }
    }

    /// 更新模式版本
    fn update_schema_version(&self, new_version: &str) -> Result<()> {
        self.store.upsert(
            META_COLLECTION,
            SCHEMA_DOC,
            &json!({ "version": new_version }),
        )?;
        tracing::info!("模式版本已更新: {}", new_version);
        Ok(())
    }

    /// 执行单个迁移（用于测试或手动触发）
    pub async fn run_single(&self, migration_id: &str) -> Result<MigrationResult> {
        let migration = self
            .migrations
            .iter()
            .find(|m| m.id() == migration_id)
            .ok_or_else(|| anyhow::anyhow!("未找到迁移: {}", migration_id))?;

        tracing::info!("手动执行迁移: {}", migration.name());
        migration.execute().await
    }

    /// 获取所有已注册的迁移
    pub fn list_migrations(&self) -> Vec<MigrationInfo> {
        self.migrations
            .iter()
            .map(|m| MigrationInfo {
                id: m.id().to_string(),
                name: m.name().to_string(),
                target_version: m.target_version().to_string(),
            })
            .collect()
    }
}

/// 迁移信息（用于列表展示）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationInfo {
    pub id: String,
    pub name: String,
    pub target_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempfile::TempDir;

    // Mock 迁移用于测试
    struct MockMigration {
        id: String,
        target_version: String,
        should_fail: bool,
    }

    #[async_trait]
    impl Migration for MockMigration {
        fn id(&self) -> &str {
            &self.id
        }

        fn name(&self) -> &str {
            &self.id
        }

        fn target_version(&self) -> &str {
            &self.target_version
        }

        async fn execute(&self) -> Result<MigrationResult> {
            if self.should_fail {
                anyhow::bail!("模拟失败");
            }

            Ok(MigrationResult {
                migration_id: self.id.clone(),
                success: true,
                message: "成功".to_string(),
                records_created: 10,
                records_skipped: 0,
                records_failed: 0,
                failures: vec![],
                duration_secs: 0.1,
            })
        }
    }

    fn mock(id: &str, version: &str, should_fail: bool) -> Arc<dyn Migration> {
        Arc::new(MockMigration {
            id: id.to_string(),
            target_version: version.to_string(),
            should_fail,
        })
    }

    #[tokio::test]
    async fn test_run_all_executes_in_version_order() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(DocumentStore::new(temp.path()));
        let mut manager = MigrationManager::new(store.clone());

        // 注册乱序的迁移
        manager.register(mock("migration3", "0.4.0", false));
        manager.register(mock("migration1", "0.2.0", false));
        manager.register(mock("migration2", "0.3.0", false));

        let results = manager.run_all().await.unwrap();
        let order: Vec<&str> = results.iter().map(|r| r.migration_id.as_str()).collect();
        assert_eq!(order, vec!["migration1", "migration2", "migration3"]);

        // 全部成功后模式版本推进到应用版本
        let version_doc = store.read("_meta", "schema").unwrap().unwrap();
        assert_eq!(version_doc["version"], serde_json::json!(APP_VERSION));
    }

    #[tokio::test]
    async fn test_already_migrated_versions_are_skipped() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(DocumentStore::new(temp.path()));
        store
            .upsert("_meta", "schema", &json!({"version": "0.3.0"}))
            .unwrap();

        let mut manager = MigrationManager::new(store);
        manager.register(mock("old", "0.2.0", false));
        manager.register(mock("new", "0.4.0", false));

        let results = manager.run_all().await.unwrap();
        assert_eq!(results.len(), 1, "低于当前版本的迁移不应该执行");
        assert_eq!(results[0].migration_id, "new");
    }

    #[tokio::test]
    async fn test_failed_migration_does_not_abort_later_ones() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(DocumentStore::new(temp.path()));
        let mut manager = MigrationManager::new(store.clone());

        manager.register(mock("first", "0.2.0", true));
        manager.register(mock("second", "0.3.0", false));

        let results = manager.run_all().await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(!results[0].success);
        assert!(results[1].success);

        // 失败后版本推进被冻结，版本文档保持初始状态，下次运行可以重试
        assert!(store.read("_meta", "schema").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_run_single_unknown_id() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(DocumentStore::new(temp.path()));
        let manager = MigrationManager::new(store);

        let err = manager.run_single("ghost").await.unwrap_err();
        assert!(err.to_string().contains("未找到迁移"));
    }

    #[test]
    fn test_list_migrations() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(DocumentStore::new(temp.path()));
        let mut manager = MigrationManager::new(store);

        manager.register(mock("a", "0.2.0", false));
        manager.register(mock("b", "0.3.0", false));

        let infos = manager.list_migrations();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].id, "a");
        assert_eq!(infos[0].target_version, "0.2.0");
    }
}
