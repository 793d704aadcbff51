// 年会报名服务

use crate::data::{DocumentStore, QueryMonitor};
use crate::models::{ConferenceRegistration, PaymentStatus};
use crate::services::validation::schemas;
use crate::utils::text::slugify;
use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{json, Map};
use std::sync::Arc;

const COLLECTION: &str = "conferenceRegistrations";

/// 年会报名服务
pub struct ConferenceService {
    store: Arc<DocumentStore>,
    monitor: Arc<QueryMonitor>,
}

impl ConferenceService {
    pub fn new(store: Arc<DocumentStore>, monitor: Arc<QueryMonitor>) -> Self {
        Self { store, monitor }
    }

    /// 提交一条报名（先过报名表校验）
    ///
    /// 文档 ID 由邮箱 + 年份派生，同一人同一年重复报名会冲突。
    pub fn register(&self, registration: &ConferenceRegistration) -> Result<String> {
        let doc = registration.to_document().context("报名记录序列化失败")?;

        if let Err(issues) = schemas::conference_registration().validate(&doc) {
            let joined = issues
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            anyhow::bail!("报名信息校验失败: {joined}");
        }

        let id = slugify(&format!(
            "{}-{}",
            registration.email, registration.conference_year
        ));
        self.store
            .create(COLLECTION, &id, &doc)
            .with_context(|| format!("创建报名 {} 失败", registration.email))?;

        tracing::info!(
            "{} 报名 {} 年会，应缴 {:.2} 美元",
            registration.email,
            registration.conference_year,
            registration.amount_due
        );
        Ok(id)
    }

    /// 标记缴费完成
    pub fn mark_paid(&self, id: &str) -> Result<()> {
        if !self.store.exists(COLLECTION, id)? {
            anyhow::bail!("报名记录 {id} 不存在");
        }

        let mut fields = Map::new();
        fields.insert(
            "paymentStatus".to_string(),
            serde_json::to_value(PaymentStatus::Paid).context("缴费状态序列化失败")?,
        );
        fields.insert("paidAt".to_string(), json!(Utc::now()));

        self.store
            .update_fields(COLLECTION, id, &fields)
            .with_context(|| format!("更新报名 {id} 缴费状态失败"))?;

        tracing::info!("报名 {} 已标记缴费完成", id);
        Ok(())
    }

    /// 某一年的全部报名
    pub fn list_for_year(&self, year: i32) -> Result<Vec<ConferenceRegistration>> {
        let docs = self
            .monitor
            .observe("conferenceRegistrations.read_all", || {
                self.store.read_all(COLLECTION)
            })
            .context("读取报名集合失败")?;

        let mut registrations = Vec::new();
        for (id, doc) in docs {
            match ConferenceRegistration::from_document(doc) {
                Ok(reg) if reg.conference_year == year => registrations.push(reg),
                Ok(_) => {}
                Err(e) => tracing::warn!("报名文档 {} 无法解析，已跳过: {}", id, e),
            }
        }

        Ok(registrations)
    }
}
