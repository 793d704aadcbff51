//! 字段映射：源记录 → 目标记录的纯转换
//!
//! 每种迁移实现一个 [`FieldMapper`]。映射是纯函数，不做任何 I/O，
//! 便于单独做单元测试。缺失字段按 [`MapperDefaults`] 的缺省表补齐，
//! 只有"字段存在但类型不符"才报错。

use super::source::{MapError, SourceRecord};
use crate::models::AppConfig;
use crate::utils::text::slugify;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// 每种迁移的静态缺省表
///
/// 日期缺省的不对称是有意为之：入会日期缺失补"本次运行开始时间"，
/// 续费日期缺失补固定纪元（1970-01-01T00:00:00Z），
/// 这样缺失的续费日期在业务上立即表现为"早已过期"。
#[derive(Debug, Clone)]
pub struct MapperDefaults {
    /// 机构邮箱域名，用于合成缺失邮箱
    pub org_domain: String,
    /// 地址缺省州缩写
    pub default_state: String,
    /// 入会日期缺省值（本次运行开始时间）
    pub join_date: DateTime<Utc>,
    /// 续费日期缺省值（固定纪元）
    pub renewal_epoch: DateTime<Utc>,
}

impl MapperDefaults {
    /// 按配置构造，入会日期缺省取当前时间
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            org_domain: config.org_domain.clone(),
            default_state: config.default_state.clone(),
            join_date: Utc::now(),
            renewal_epoch: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// 把整名按空白拆成（名, 姓）
///
/// 第一个词是名，其余合并为姓；缺失部分用空串占位。
pub fn split_name(full_name: &str) -> (String, String) {
    let mut parts = full_name.split_whitespace();
    let first = parts.next().unwrap_or("").to_string();
    let rest: Vec<&str> = parts.collect();
    (first, rest.join(" "))
}

/// 用姓名合成邮箱
///
/// 非空的名、姓小写后用 `.` 连接，再拼上机构域名。
/// 姓名全空时得到 `"@<域名>"`，这是已知的弱边界情形，保留原样。
pub fn synthesize_email(first_name: &str, last_name: &str, org_domain: &str) -> String {
    let local: Vec<String> = [first_name, last_name]
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| part.to_lowercase())
        .collect();
    format!("{}@{}", local.join("."), org_domain)
}

/// 幂等查找键
///
/// 一组目标集合上的等值过滤条件，由目标记录派生。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupKey {
    filters: Vec<(String, String)>,
}

impl LookupKey {
    /// 单字段键（如邮箱）
    pub fn single(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            filters: vec![(field.into(), value.into())],
        }
    }

    /// 复合键（如姓名 + 会员类别）
    pub fn composite(filters: Vec<(String, String)>) -> Self {
        Self { filters }
    }

    /// 过滤条件，借用形式（供存储查找使用）
    pub fn filters(&self) -> Vec<(&str, &str)> {
        self.filters
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
            .collect()
    }

    /// 首个过滤值（作为简单键语义使用时的取值）
    pub fn primary_value(&self) -> &str {
        self.filters
            .first()
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// 人类可读描述，用于日志与跳过原因
    pub fn describe(&self) -> String {
        self.filters
            .iter()
            .map(|(field, value)| format!("{field}={value}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// 由键值派生确定性的文档 ID
    ///
    /// 同一逻辑实体在多次运行中得到同一个 ID，配合存储的
    /// create 唯一约束兜住幂等检查的漏判。
    pub fn derive_doc_id(&self) -> String {
        let joined = self
            .filters
            .iter()
            .map(|(_, value)| value.as_str())
            .collect::<Vec<_>>()
            .join("-");
        slugify(&joined)
    }
}

/// 目标记录：满足目标模式的待写入文档
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRecord {
    /// 目标集合
    pub collection: String,
    /// 文档 ID（由查找键确定性派生）
    pub doc_id: String,
    /// 幂等查找键
    pub lookup: LookupKey,
    /// 文档内容
    pub fields: Value,
}

impl TargetRecord {
    /// 构造目标记录，文档 ID 由查找键派生
    pub fn new(collection: impl Into<String>, lookup: LookupKey, fields: Value) -> Self {
        let doc_id = lookup.derive_doc_id();
        Self {
            collection: collection.into(),
            doc_id,
            lookup,
            fields,
        }
    }

    /// 构造指定文档 ID 的目标记录（合并型迁移使用）
    pub fn with_doc_id(
        collection: impl Into<String>,
        doc_id: impl Into<String>,
        lookup: LookupKey,
        fields: Value,
    ) -> Self {
        Self {
            collection: collection.into(),
            doc_id: doc_id.into(),
            lookup,
            fields,
        }
    }
}

/// 单种迁移的字段映射器
pub trait FieldMapper: Send + Sync {
    /// 迁移种类标识（如 "board_members"）
    fn kind(&self) -> &str;

    /// 纯转换：一条源记录 → 一条目标记录
    fn map(&self, source: &SourceRecord) -> Result<TargetRecord, MapError>;
}
