// 奖项提名数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 奖项提名文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardNomination {
    /// 奖项标识（如 "educator-of-the-year"）
    pub award: String,
    pub nominee_name: String,
    #[serde(default)]
    pub nominee_email: Option<String>,
    pub nominator_name: String,
    pub nominator_email: String,
    /// 提名理由
    pub statement: String,
    pub submitted_at: DateTime<Utc>,
}

impl AwardNomination {
    pub fn to_document(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    pub fn from_document(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}
