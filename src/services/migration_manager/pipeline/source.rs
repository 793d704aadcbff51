//! 源记录：迁移前集合中的松散文档
//!
//! 旧集合的文档没有静态模式，任何字段都可能缺失或类型不符。
//! 这里用显式的可选字段访问器取代散落各处的鸭子类型取值：
//! - 字段缺失（或为 null）→ `None` / 缺省值，永不报错
//! - 字段存在但类型不符 → [`MapError`]，由调用方记为该记录的失败

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

/// 字段映射错误
///
/// 只在"字段存在但无法按期望类型解读"时出现，字段缺失不算错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// 字段类型不符
    #[error("字段 {field} 类型不符: 期望 {expected}，实际为 {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// 日期字符串无法解析
    #[error("字段 {field} 的日期无法解析: {value}")]
    UnparsableDate { field: String, value: String },

    /// 目标记录序列化失败
    #[error("目标记录序列化失败: {0}")]
    Serialize(String),
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 迁移源记录
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    id: String,
    fields: Map<String, Value>,
}

impl SourceRecord {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// 从存储读出的 `(ID, 文档)` 构造
    ///
    /// 非对象文档（数组、标量）视为没有任何字段的记录。
    pub fn from_document(id: impl Into<String>, value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(id, fields)
    }

    /// 源文档 ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// 整条记录的字段表，作为 JSON 对象返回
    ///
    /// 供整体搬运型迁移使用（不逐字段重塑，原样并入目标文档）。
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// 原始字段值（null 视为缺失）
    pub fn raw(&self, key: &str) -> Option<&Value> {
        match self.fields.get(key) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    /// 字符串字段
    ///
    /// - 缺失 → `Ok(None)`
    /// - 存在且为字符串 → `Ok(Some(&str))`
    /// - 存在但不是字符串 → `Err(TypeMismatch)`
    pub fn str_field(&self, key: &str) -> Result<Option<&str>, MapError> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(MapError::TypeMismatch {
                field: key.to_string(),
                expected: "string",
                actual: type_name(other),
            }),
        }
    }

    /// 字符串字段，缺失时返回缺省值
    pub fn string_or(&self, key: &str, default: &str) -> Result<String, MapError> {
        Ok(self.str_field(key)?.unwrap_or(default).to_string())
    }

    /// 去掉首尾空白的字符串字段，缺失时返回空串
    pub fn trimmed_or_empty(&self, key: &str) -> Result<String, MapError> {
        Ok(self.str_field(key)?.unwrap_or("").trim().to_string())
    }

    /// 非空字符串字段：缺失或空白都返回 `None`
    pub fn non_empty(&self, key: &str) -> Result<Option<String>, MapError> {
        let trimmed = self.trimmed_or_empty(key)?;
        Ok(if trimmed.is_empty() { None } else { Some(trimmed) })
    }

    /// 布尔字段，缺失时返回缺省值
    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, MapError> {
        match self.raw(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(MapError::TypeMismatch {
                field: key.to_string(),
                expected: "bool",
                actual: type_name(other),
            }),
        }
    }

    /// 日期字段
    ///
    /// 接受 RFC 3339（`2024-09-01T00:00:00Z`）或纯日期（`2024-09-01`，
    /// 按 UTC 零点处理）。存在但不是字符串 → 类型不符；
    /// 是字符串但两种格式都解析不了 → 日期不可解析。
    pub fn date_field(&self, key: &str) -> Result<Option<DateTime<Utc>>, MapError> {
        let text = match self.raw(key) {
            None => return Ok(None),
            Some(Value::String(s)) => s,
            Some(other) => {
                return Err(MapError::TypeMismatch {
                    field: key.to_string(),
                    expected: "日期字符串",
                    actual: type_name(other),
                })
            }
        };

        if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
            return Ok(Some(parsed.with_timezone(&Utc)));
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(Some(midnight.and_utc()));
            }
        }

        Err(MapError::UnparsableDate {
            field: key.to_string(),
            value: text.clone(),
        })
    }
}
