// lib.rs - 暴露数据层与服务层给迁移入口使用

pub mod data;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;

pub use models::*;
// 数据层
pub use data::{DataError, DocumentStore, QueryMonitor};
// 服务层
pub use services::awards::AwardsService;
pub use services::conference::ConferenceService;
pub use services::directory::MemberDirectory;
pub use services::newsletter::{NewsletterService, SubscribeResult};
// 迁移系统
pub use services::migration_manager::{
    create_migration_manager, Migration, MigrationManager, MigrationResult,
};
// 日志系统
pub use logging::{LogLevel, LogManager, LoggingConfig};

// 重新导出常用类型
pub use anyhow::{Context, Result};
