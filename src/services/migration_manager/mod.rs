// Migration Manager Module
//
// 统一迁移管理系统

mod manager;
mod migration_trait;
mod migrations;
pub mod pipeline;

#[cfg(test)]
mod scenario_tests;

pub use manager::{MigrationInfo, MigrationManager};
pub use migration_trait::{compare_versions, Migration, MigrationResult};
pub use migrations::{
    BoardMemberMigration, PastPresidentMigration, SiteSettingsMigration, V1ImportMigration,
};

use crate::data::DocumentStore;
use crate::models::AppConfig;
use std::sync::Arc;

/// 创建并初始化迁移管理器
///
/// 自动注册所有迁移（按版本号执行）：
/// - BoardMemberMigration (0.2.0) - 旧理事会文档 → 会员集合
/// - PastPresidentMigration (0.3.0) - 历任会长 → 会员集合
/// - V1ImportMigration (0.4.0) - V1 导出数据导入
/// - SiteSettingsMigration (0.5.0) - 站点设置整合
pub fn create_migration_manager(
    store: Arc<DocumentStore>,
    config: Arc<AppConfig>,
) -> MigrationManager {
    let mut manager = MigrationManager::new(store.clone());

    // 注册所有迁移（按目标版本号自动排序执行）
    manager.register(Arc::new(BoardMemberMigration::new(
        store.clone(),
        config.clone(),
    )));
    manager.register(Arc::new(PastPresidentMigration::new(
        store.clone(),
        config.clone(),
    )));
    manager.register(Arc::new(V1ImportMigration::new(
        store.clone(),
        config.clone(),
    )));
    manager.register(Arc::new(SiteSettingsMigration::new(store, config)));

    tracing::debug!(
        "迁移管理器初始化完成，已注册 {} 个迁移",
        manager.list_migrations().len()
    );

    manager
}
