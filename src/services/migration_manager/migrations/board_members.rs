// 旧理事会文档 → 会员集合迁移
//
// 旧站点把理事会成员单独存在 boardMembers 集合里，字段只有
// 姓名和职务；新模式下理事会成员是带 boardPosition 的普通会员。

use crate::data::DocumentStore;
use crate::models::{AppConfig, Member, MembershipType};
use crate::services::migration_manager::migration_trait::{Migration, MigrationResult};
use crate::services::migration_manager::pipeline::{
    split_name, synthesize_email, BatchMigrator, FieldMapper, LookupKey, MapError, MapperDefaults,
    SourceRecord, StoreGuard, StoreWriter, TargetRecord,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// 源集合与目标集合
const SOURCE_COLLECTION: &str = "boardMembers";
const TARGET_COLLECTION: &str = "members";

/// 理事会文档映射器
///
/// 缺省表：
/// - 姓名缺失 → 空串拆分（名、姓都为 ""）
/// - 邮箱缺失 → 由姓名合成（`名.姓@机构域名`）
/// - 入会日期缺失 → 本次运行开始时间
pub struct BoardMemberMapper {
    defaults: MapperDefaults,
}

impl BoardMemberMapper {
    pub fn new(defaults: MapperDefaults) -> Self {
        Self { defaults }
    }
}

impl FieldMapper for BoardMemberMapper {
    fn kind(&self) -> &str {
        "board_members"
    }

    fn map(&self, source: &SourceRecord) -> Result<TargetRecord, MapError> {
        let full_name = source.trimmed_or_empty("name")?;
        let (first_name, last_name) = split_name(&full_name);

        let email = match source.non_empty("email")? {
            Some(email) => email,
            None => synthesize_email(&first_name, &last_name, &self.defaults.org_domain),
        };

        let member = Member {
            first_name,
            last_name,
            email: email.clone(),
            institution: source.non_empty("institution")?,
            board_position: source.non_empty("title")?,
            past_president_term: None,
            membership_type: MembershipType::Board,
            join_date: source
                .date_field("joinDate")?
                .unwrap_or(self.defaults.join_date),
            renewal_date: None,
            address: None,
            active: source.bool_or("active", true)?,
        };

        let fields = member
            .to_document()
            .map_err(|e| MapError::Serialize(e.to_string()))?;

        Ok(TargetRecord::new(
            TARGET_COLLECTION,
            LookupKey::single("email", email),
            fields,
        ))
    }
}

/// 理事会文档迁移（目标版本 0.2.0）
pub struct BoardMemberMigration {
    store: Arc<DocumentStore>,
    config: Arc<AppConfig>,
}

impl BoardMemberMigration {
    pub fn new(store: Arc<DocumentStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl Migration for BoardMemberMigration {
    fn id(&self) -> &str {
        "board_members"
    }

    fn name(&self) -> &str {
        "理事会文档迁移"
    }

    fn target_version(&self) -> &str {
        "0.2.0"
    }

    async fn execute(&self) -> Result<MigrationResult> {
        tracing::info!("开始执行理事会文档迁移");

        // 源集合本身读不出来是灾难性错误，直接向上传播
        let sources: Vec<SourceRecord> = self
            .store
            .read_all(SOURCE_COLLECTION)?
            .into_iter()
            .map(|(id, doc)| SourceRecord::from_document(id, doc))
            .collect();

        let mapper = BoardMemberMapper::new(MapperDefaults::from_config(&self.config));
        let guard = StoreGuard::new(&self.store, TARGET_COLLECTION);
        let writer = StoreWriter::new(&self.store);

        let report = BatchMigrator::new(&mapper, &guard, &writer)
            .with_policy(self.config.lookup_policy)
            .run(&sources);

        Ok(MigrationResult::from_report(self.id(), &report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapper() -> BoardMemberMapper {
        BoardMemberMapper::new(MapperDefaults {
            org_domain: "gsbea.org".to_string(),
            default_state: "NH".to_string(),
            join_date: "2026-08-01T00:00:00Z".parse().unwrap(),
            renewal_epoch: chrono::DateTime::UNIX_EPOCH,
        })
    }

    #[test]
    fn test_full_record_mapping() {
        let source = SourceRecord::from_document(
            "bm-1",
            json!({"name": "Jane Doe", "title": "Treasurer"}),
        );
        let target = mapper().map(&source).unwrap();

        assert_eq!(target.collection, "members");
        assert_eq!(target.fields["firstName"], json!("Jane"));
        assert_eq!(target.fields["lastName"], json!("Doe"));
        assert_eq!(target.fields["email"], json!("jane.doe@gsbea.org"));
        assert_eq!(target.fields["boardPosition"], json!("Treasurer"));
        assert_eq!(target.fields["joinDate"], json!("2026-08-01T00:00:00Z"));
        assert_eq!(target.fields["membershipType"], json!("board"));
    }

    #[test]
    fn test_existing_email_is_kept() {
        let source = SourceRecord::from_document(
            "bm-2",
            json!({"name": "John Roe", "email": "jroe@school.edu"}),
        );
        let target = mapper().map(&source).unwrap();
        assert_eq!(target.fields["email"], json!("jroe@school.edu"));
        assert_eq!(target.lookup, LookupKey::single("email", "jroe@school.edu"));
    }

    #[test]
    fn test_empty_name_does_not_error() {
        // 已知弱边界：空姓名产出空名姓与 "@域名" 形式的邮箱，但不报错
        let source = SourceRecord::from_document("bm-3", json!({"name": "", "title": "President"}));
        let target = mapper().map(&source).unwrap();

        assert_eq!(target.fields["firstName"], json!(""));
        assert_eq!(target.fields["lastName"], json!(""));
        assert_eq!(target.fields["email"], json!("@gsbea.org"));
        assert_eq!(target.fields["boardPosition"], json!("President"));
    }

    #[test]
    fn test_name_type_mismatch_is_error() {
        let source = SourceRecord::from_document("bm-4", json!({"name": 42}));
        assert!(matches!(
            mapper().map(&source).unwrap_err(),
            MapError::TypeMismatch { .. }
        ));
    }

    #[tokio::test]
    async fn test_execute_over_store() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = Arc::new(DocumentStore::new(temp.path()));
        let config = Arc::new(AppConfig {
            data_dir: temp.path().to_path_buf(),
            ..AppConfig::default()
        });

        store
            .create("boardMembers", "bm-1", &json!({"name": "Jane Doe", "title": "Treasurer"}))
            .unwrap();
        store
            .create("boardMembers", "bm-2", &json!({"name": "John Roe", "title": "Secretary"}))
            .unwrap();

        let migration = BoardMemberMigration::new(store.clone(), config);
        let result = migration.execute().await.unwrap();

        assert!(result.success);
        assert_eq!(result.records_created, 2);

        let members = store.read_all("members").unwrap();
        assert_eq!(members.len(), 2);

        // 再次执行应该全部跳过
        let second = migration.execute().await.unwrap();
        assert_eq!(second.records_created, 0);
        assert_eq!(second.records_skipped, 2);
    }
}
