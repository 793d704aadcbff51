// 会员数据模型
//
// 字段名与存储中的文档保持一致（camelCase）

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 会员类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MembershipType {
    /// 普通专业会员
    Professional,
    /// 现任理事会成员
    Board,
    /// 历任会长
    PastPresident,
    /// 荣誉会员（名人堂）
    Honorary,
    /// 学生会员
    Student,
}

impl Default for MembershipType {
    fn default() -> Self {
        MembershipType::Professional
    }
}

impl MembershipType {
    /// 存储中使用的字符串表示（与 serde camelCase 一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipType::Professional => "professional",
            MembershipType::Board => "board",
            MembershipType::PastPresident => "pastPresident",
            MembershipType::Honorary => "honorary",
            MembershipType::Student => "student",
        }
    }
}

/// 通讯地址
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub city: Option<String>,
    /// 州/地区缩写，缺省时由配置决定（如 "NH"）
    #[serde(default)]
    pub state: Option<String>,
}

/// 会员文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub institution: Option<String>,
    /// 理事会职务（如 "Treasurer"），非理事为 None
    #[serde(default)]
    pub board_position: Option<String>,
    /// 历任会长任期（如 "2018-2019"）
    #[serde(default)]
    pub past_president_term: Option<String>,
    #[serde(default)]
    pub membership_type: MembershipType,
    pub join_date: DateTime<Utc>,
    #[serde(default)]
    pub renewal_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Member {
    /// 展示用全名
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// 序列化为存储文档
    pub fn to_document(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// 从存储文档反序列化
    pub fn from_document(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}
