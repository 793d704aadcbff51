// 站点设置整合
//
// 旧站点把设置散在 settings 集合的多个小文档里（homepage、
// contact、conference……），新模式整合为 siteSettings/main 一个
// 文档，每个旧文档成为其中一个顶层分区。

use crate::data::DocumentStore;
use crate::models::AppConfig;
use crate::services::migration_manager::migration_trait::{Migration, MigrationResult};
use crate::services::migration_manager::pipeline::{
    BatchMigrator, FieldMapper, FieldPresenceGuard, LookupKey, MapError, MergeWriter,
    SourceRecord, TargetRecord,
};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

const SOURCE_COLLECTION: &str = "settings";
const TARGET_COLLECTION: &str = "siteSettings";
const TARGET_DOC: &str = "main";

/// 设置分区映射器
///
/// 源文档 ID 即分区名，文档内容整体并入目标文档的同名顶层字段。
/// 幂等键的取值是分区名，由字段存在性检查器解读。
pub struct SettingsSectionMapper;

impl FieldMapper for SettingsSectionMapper {
    fn kind(&self) -> &str {
        "site_settings"
    }

    fn map(&self, source: &SourceRecord) -> Result<TargetRecord, MapError> {
        let section = source.id().to_string();
        let fields = json!({ section.clone(): source.to_value() });

        Ok(TargetRecord::with_doc_id(
            TARGET_COLLECTION,
            TARGET_DOC,
            LookupKey::single("section", section),
            fields,
        ))
    }
}

/// 站点设置整合（目标版本 0.5.0）
pub struct SiteSettingsMigration {
    store: Arc<DocumentStore>,
    config: Arc<AppConfig>,
}

impl SiteSettingsMigration {
    pub fn new(store: Arc<DocumentStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl Migration for SiteSettingsMigration {
    fn id(&self) -> &str {
        "site_settings"
    }

    fn name(&self) -> &str {
        "站点设置整合"
    }

    fn target_version(&self) -> &str {
        "0.5.0"
    }

    async fn execute(&self) -> Result<MigrationResult> {
        tracing::info!("开始执行站点设置整合");

        let sources: Vec<SourceRecord> = self
            .store
            .read_all(SOURCE_COLLECTION)?
            .into_iter()
            .map(|(id, doc)| SourceRecord::from_document(id, doc))
            .collect();

        let mapper = SettingsSectionMapper;
        let guard = FieldPresenceGuard::new(&self.store, TARGET_COLLECTION, TARGET_DOC);
        let writer = MergeWriter::new(&self.store);

        let report = BatchMigrator::new(&mapper, &guard, &writer)
            .with_policy(self.config.lookup_policy)
            .run(&sources);

        Ok(MigrationResult::from_report(self.id(), &report))
    }
}
