// 通讯订阅数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 通讯订阅者文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterSubscriber {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub subscribed_at: DateTime<Utc>,
    /// 是否已确认（双重确认流程）
    #[serde(default)]
    pub confirmed: bool,
}

impl NewsletterSubscriber {
    pub fn to_document(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    pub fn from_document(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}
