// 年会报名数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 缴费状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentStatus {
    /// 待缴费
    Pending,
    /// 已缴费
    Paid,
    /// 免缴（受邀嘉宾等）
    Waived,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

/// 年会报名文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceRegistration {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub institution: Option<String>,
    /// 年会年份（如 2026）
    pub conference_year: i32,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// 应缴金额（美元）
    pub amount_due: f64,
    pub registered_at: DateTime<Utc>,
    /// 缴费完成时间
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

impl ConferenceRegistration {
    pub fn to_document(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    pub fn from_document(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}
