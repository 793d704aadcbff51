// 通讯订阅服务

use crate::data::{DocumentStore, QueryMonitor};
use crate::models::NewsletterSubscriber;
use crate::services::validation::schemas;
use crate::utils::text::slugify;
use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{json, Map};
use std::sync::Arc;

const COLLECTION: &str = "newsletterSubscribers";

/// 订阅结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeResult {
    /// 新建订阅
    Subscribed(String),
    /// 该邮箱已订阅过，返回已有文档 ID
    AlreadySubscribed(String),
}

/// 通讯订阅服务
pub struct NewsletterService {
    store: Arc<DocumentStore>,
    monitor: Arc<QueryMonitor>,
}

impl NewsletterService {
    pub fn new(store: Arc<DocumentStore>, monitor: Arc<QueryMonitor>) -> Self {
        Self { store, monitor }
    }

    /// 订阅（按邮箱幂等）
    pub fn subscribe(&self, email: &str, name: Option<&str>) -> Result<SubscribeResult> {
        let form = json!({ "email": email, "name": name });
        if let Err(issues) = schemas::newsletter_signup().validate(&form) {
            let joined = issues
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            anyhow::bail!("订阅信息校验失败: {joined}");
        }

        // 已有订阅直接返回，不重复写入
        if let Some(existing) = self
            .monitor
            .observe("newsletterSubscribers.find", || {
                self.store.find_matching(COLLECTION, &[("email", email)])
            })
            .context("查找订阅记录失败")?
        {
            tracing::debug!("{} 已订阅过通讯（{}）", email, existing);
            return Ok(SubscribeResult::AlreadySubscribed(existing));
        }

        let subscriber = NewsletterSubscriber {
            email: email.to_string(),
            name: name.map(|n| n.to_string()),
            subscribed_at: Utc::now(),
            confirmed: false,
        };
        let doc = subscriber.to_document().context("订阅记录序列化失败")?;

        let id = slugify(email);
        self.store
            .create(COLLECTION, &id, &doc)
            .with_context(|| format!("创建订阅 {email} 失败"))?;

        tracing::info!("{} 订阅了通讯", email);
        Ok(SubscribeResult::Subscribed(id))
    }

    /// 确认订阅（双重确认流程的第二步）
    pub fn confirm(&self, id: &str) -> Result<()> {
        if !self.store.exists(COLLECTION, id)? {
            anyhow::bail!("订阅记录 {id} 不存在");
        }

        let mut fields = Map::new();
        fields.insert("confirmed".to_string(), json!(true));
        self.store
            .update_fields(COLLECTION, id, &fields)
            .with_context(|| format!("确认订阅 {id} 失败"))?;
        Ok(())
    }
}
