// V1 导出数据导入
//
// 旧站点 V1 的会员名单以表格导出（snake_case 列名），
// 逐行落在 v1Members 集合里；这里把每行重塑为增强版会员文档。

use crate::data::DocumentStore;
use crate::models::{Address, AppConfig, Member, MembershipType};
use crate::services::migration_manager::migration_trait::{Migration, MigrationResult};
use crate::services::migration_manager::pipeline::{
    split_name, synthesize_email, BatchMigrator, FieldMapper, LookupKey, MapError, MapperDefaults,
    SourceRecord, StoreGuard, StoreWriter, TargetRecord,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

const SOURCE_COLLECTION: &str = "v1Members";
const TARGET_COLLECTION: &str = "members";

/// V1 行记录映射器
///
/// 缺省表：
/// - `first_name`/`last_name` 缺失 → 拆分 `name`，再缺失补空串
/// - `email` 缺失 → 由姓名合成
/// - `joined` 缺失 → 本次运行开始时间
/// - `renewal` 缺失 → 固定纪元（缺失的续费日期立即表现为已过期）
/// - `state` 缺失 → 配置的缺省州
pub struct V1RowMapper {
    defaults: MapperDefaults,
}

impl V1RowMapper {
    pub fn new(defaults: MapperDefaults) -> Self {
        Self { defaults }
    }
}

impl FieldMapper for V1RowMapper {
    fn kind(&self) -> &str {
        "v1_import"
    }

    fn map(&self, source: &SourceRecord) -> Result<TargetRecord, MapError> {
        let (split_first, split_last) = split_name(&source.trimmed_or_empty("name")?);
        let first_name = source.non_empty("first_name")?.unwrap_or(split_first);
        let last_name = source.non_empty("last_name")?.unwrap_or(split_last);

        let email = match source.non_empty("email")? {
            Some(email) => email,
            None => synthesize_email(&first_name, &last_name, &self.defaults.org_domain),
        };

        let institution = match source.non_empty("school")? {
            Some(school) => Some(school),
            None => source.non_empty("institution")?,
        };

        let state = source
            .non_empty("state")?
            .unwrap_or_else(|| self.defaults.default_state.clone());

        let member = Member {
            first_name,
            last_name,
            email: email.clone(),
            institution,
            board_position: None,
            past_president_term: None,
            membership_type: MembershipType::Professional,
            join_date: source
                .date_field("joined")?
                .unwrap_or(self.defaults.join_date),
            renewal_date: Some(
                source
                    .date_field("renewal")?
                    .unwrap_or(self.defaults.renewal_epoch),
            ),
            address: Some(Address {
                city: source.non_empty("city")?,
                state: Some(state),
            }),
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

/// V1 导出数据导入（目标版本 0.4.0）
pub struct V1ImportMigration {
    store: Arc<DocumentStore>,
    config: Arc<AppConfig>,
}

impl V1ImportMigration {
    pub fn new(store: Arc<DocumentStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl Migration for V1ImportMigration {
    fn id(&self) -> &str {
        "v1_import"
    }

    fn name(&self) -> &str {
        "V1 导出数据导入"
    }

    fn target_version(&self) -> &str {
        "0.4.0"
    }

    async fn execute(&self) -> Result<MigrationResult> {
        tracing::info!("开始执行 V1 导出数据导入");

        let sources: Vec<SourceRecord> = self
            .store
            .read_all(SOURCE_COLLECTION)?
            .into_iter()
            .map(|(id, doc)| SourceRecord::from_document(id, doc))
            .collect();

        let mapper = V1RowMapper::new(MapperDefaults::from_config(&self.config));
        let guard = StoreGuard::new(&self.store, TARGET_COLLECTION);
        let writer = StoreWriter::new(&self.store);

        let report = BatchMigrator::new(&mapper, &guard, &writer)
            .with_policy(self.config.lookup_policy)
            .run(&sources);

        Ok(MigrationResult::from_report(self.id(), &report))
    }
}
