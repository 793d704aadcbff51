// Migrations - 所有迁移实现
//
// 每个迁移定义目标版本号，按版本号顺序执行

mod board_members;
mod past_presidents;
mod site_settings;
mod v1_import;

pub use board_members::{BoardMemberMapper, BoardMemberMigration};
pub use past_presidents::{PastPresidentMapper, PastPresidentMigration};
pub use site_settings::{SettingsSectionMapper, SiteSettingsMigration};
pub use v1_import::{V1ImportMigration, V1RowMapper};
