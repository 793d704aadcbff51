// 应用配置结构，放在 models 以便在库和二进制之间共享

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 幂等检查失败时的处理策略
///
/// 查找失败意味着"存在性未知"，两种策略：
/// - `Conservative`: 跳过该记录（默认），宁可漏迁不可重复
/// - `Optimistic`: 继续写入，依赖目标存储的唯一约束兜底
///
/// 一次迁移运行内只使用一种策略，不混用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupPolicy {
    Conservative,
    Optimistic,
}

impl Default for LookupPolicy {
    fn default() -> Self {
        LookupPolicy::Conservative
    }
}

/// 应用配置
///
/// 所有原先散落在脚本里的硬编码标识（数据目录、机构域名、缺省州）
/// 都收拢到这里，由入口统一构造并传入。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 文档存储根目录
    pub data_dir: PathBuf,
    /// 机构邮箱域名，用于合成缺失的会员邮箱
    #[serde(default = "default_org_domain")]
    pub org_domain: String,
    /// 地址缺省州缩写
    #[serde(default = "default_state")]
    pub default_state: String,
    /// 慢查询阈值（毫秒）
    #[serde(default = "default_slow_query_millis")]
    pub slow_query_millis: u64,
    /// 幂等查找失败策略
    #[serde(default)]
    pub lookup_policy: LookupPolicy,
}

fn default_org_domain() -> String {
    "gsbea.org".to_string()
}

fn default_state() -> String {
    "NH".to_string()
}

fn default_slow_query_millis() -> u64 {
    250
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            org_domain: default_org_domain(),
            default_state: default_state(),
            slow_query_millis: default_slow_query_millis(),
            lookup_policy: LookupPolicy::default(),
        }
    }
}

/// 默认数据目录：`~/.gsbea`，无法获取主目录时退回临时目录
pub fn default_data_dir() -> PathBuf {
    if let Some(home_dir) = dirs::home_dir() {
        home_dir.join(".gsbea")
    } else {
        std::env::temp_dir().join("gsbea")
    }
}
