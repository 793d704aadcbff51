// 历任会长文档 → 会员集合迁移
//
// 旧站点的 pastPresidents 集合通常没有邮箱，
// 幂等键用姓名 + 会员类别的复合键而不是邮箱。

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

const SOURCE_COLLECTION: &str = "pastPresidents";
const TARGET_COLLECTION: &str = "members";

/// 历任会长文档映射器
pub struct PastPresidentMapper {
    defaults: MapperDefaults,
}

impl PastPresidentMapper {
    pub fn new(defaults: MapperDefaults) -> Self {
        Self { defaults }
    }
}

impl FieldMapper for PastPresidentMapper {
    fn kind(&self) -> &str {
        "past_presidents"
    }

    fn map(&self, source: &SourceRecord) -> Result<TargetRecord, MapError> {
        let full_name = source.trimmed_or_empty("name")?;
        let (first_name, last_name) = split_name(&full_name);

        let email = match source.non_empty("email")? {
            Some(email) => email,
            None => synthesize_email(&first_name, &last_name, &self.defaults.org_domain),
        };

        // 任期写法不一，"term" 优先，其次单独的 "year"
        let term = match source.non_empty("term")? {
            Some(term) => Some(term),
            None => source.non_empty("year")?,
        };

        let member = Member {
            first_name: first_name.clone(),
            last_name: last_name.clone(),
            email,
            institution: source.non_empty("institution")?,
            board_position: None,
            past_president_term: term,
            membership_type: MembershipType::PastPresident,
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

        let lookup = LookupKey::composite(vec![
            ("firstName".to_string(), first_name),
            ("lastName".to_string(), last_name),
            (
                "membershipType".to_string(),
                MembershipType::PastPresident.as_str().to_string(),
            ),
        ]);

        Ok(TargetRecord::new(TARGET_COLLECTION, lookup, fields))
    }
}

/// 历任会长迁移（目标版本 0.3.0）
pub struct PastPresidentMigration {
    store: Arc<DocumentStore>,
    config: Arc<AppConfig>,
}

impl PastPresidentMigration {
    pub fn new(store: Arc<DocumentStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl Migration for PastPresidentMigration {
    fn id(&self) -> &str {
        "past_presidents"
    }

    fn name(&self) -> &str {
        "历任会长迁移"
    }

    fn target_version(&self) -> &str {
        "0.3.0"
    }

    async fn execute(&self) -> Result<MigrationResult> {
        tracing::info!("开始执行历任会长迁移");

        let sources: Vec<SourceRecord> = self
            .store
            .read_all(SOURCE_COLLECTION)?
            .into_iter()
            .map(|(id, doc)| SourceRecord::from_document(id, doc))
            .collect();

        let mapper = PastPresidentMapper::new(MapperDefaults::from_config(&self.config));
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

    fn mapper() -> PastPresidentMapper {
        PastPresidentMapper::new(MapperDefaults {
            org_domain: "gsbea.org".to_string(),
            default_state: "NH".to_string(),
            join_date: "2026-08-01T00:00:00Z".parse().unwrap(),
            renewal_epoch: chrono::DateTime::UNIX_EPOCH,
        })
    }

    #[test]
    fn test_mapping_with_term() {
        let source = SourceRecord::from_document(
            "pp-1",
            json!({"name": "Mary Smith", "term": "2018-2019"}),
        );
        let target = mapper().map(&source).unwrap();

        assert_eq!(target.fields["pastPresidentTerm"], json!("2018-2019"));
        assert_eq!(target.fields["membershipType"], json!("pastPresident"));
        assert_eq!(target.fields["email"], json!("mary.smith@gsbea.org"));
    }

    #[test]
    fn test_year_fallback_for_term() {
        let source =
            SourceRecord::from_document("pp-2", json!({"name": "Al Gray", "year": "2005"}));
        let target = mapper().map(&source).unwrap();
        assert_eq!(target.fields["pastPresidentTerm"], json!("2005"));
    }

    #[test]
    fn test_lookup_is_name_and_type_composite() {
        let source = SourceRecord::from_document("pp-3", json!({"name": "Mary Smith"}));
        let target = mapper().map(&source).unwrap();

        assert_eq!(
            target.lookup.filters(),
            vec![
                ("firstName", "Mary"),
                ("lastName", "Smith"),
                ("membershipType", "pastPresident"),
            ]
        );
        // 文档 ID 由复合键派生，与同名理事会记录不冲突
        assert_eq!(target.doc_id, "mary-smith-pastpresident");
    }

    #[tokio::test]
    async fn test_execute_is_idempotent() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = Arc::new(DocumentStore::new(temp.path()));
        let config = Arc::new(AppConfig {
            data_dir: temp.path().to_path_buf(),
            ..AppConfig::default()
        });

        store
            .create("pastPresidents", "pp-1", &json!({"name": "Mary Smith", "term": "2018-2019"}))
            .unwrap();

        let migration = PastPresidentMigration::new(store.clone(), config);
        assert_eq!(migration.execute().await.unwrap().records_created, 1);
        assert_eq!(migration.execute().await.unwrap().records_skipped, 1);
    }
}
