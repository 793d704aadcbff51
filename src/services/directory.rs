// 会员名录服务
//
// 名录页面的读路径走缓存 + 查询监控，写路径做表单校验后直写存储。

use crate::data::{DocumentStore, QueryMonitor};
use crate::models::Member;
use crate::services::validation::schemas;
use crate::utils::text::slugify;
use anyhow::{Context, Result};
use serde_json::Map;
use std::sync::Arc;

const COLLECTION: &str = "members";

/// 会员名录服务
pub struct MemberDirectory {
    store: Arc<DocumentStore>,
    monitor: Arc<QueryMonitor>,
}

impl MemberDirectory {
    pub fn new(store: Arc<DocumentStore>, monitor: Arc<QueryMonitor>) -> Self {
        Self { store, monitor }
    }

    /// 名录展示用的活跃会员列表，按姓、名排序
    ///
    /// 无法解析的旧文档跳过并记日志，不让单个坏文档拖垮整页名录。
    pub fn list_active(&self) -> Result<Vec<Member>> {
        let docs = self
            .monitor
            .observe("members.read_all", || self.store.read_all(COLLECTION))
            .context("读取会员集合失败")?;

        let mut members = Vec::new();
        for (id, doc) in docs {
            match Member::from_document(doc) {
                Ok(member) if member.active => members.push(member),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("会员文档 {} 无法解析，已跳过: {}", id, e);
                }
            }
        }

        members.sort_by(|a, b| {
            (a.last_name.to_lowercase(), a.first_name.to_lowercase())
                .cmp(&(b.last_name.to_lowercase(), b.first_name.to_lowercase()))
        });

        Ok(members)
    }

    /// 按文档 ID 读取会员
    pub fn get(&self, id: &str) -> Result<Option<Member>> {
        let doc = self
            .monitor
            .observe("members.read", || self.store.read(COLLECTION, id))
            .context("读取会员文档失败")?;

        match doc {
            Some(doc) => Ok(Some(
                Member::from_document(doc).with_context(|| format!("会员文档 {id} 无法解析"))?,
            )),
            None => Ok(None),
        }
    }

    /// 按邮箱查找会员，返回 `(文档 ID, 会员)`
    pub fn find_by_email(&self, email: &str) -> Result<Option<(String, Member)>> {
        let found = self
            .monitor
            .observe("members.find_by_email", || {
                self.store.find_matching(COLLECTION, &[("email", email)])
            })
            .context("按邮箱查找会员失败")?;

        match found {
            Some(id) => {
                let member = self.get(&id)?;
                Ok(member.map(|m| (id, m)))
            }
            None => Ok(None),
        }
    }

    /// 新增会员（先过会员申请表校验）
    ///
    /// 文档 ID 由邮箱派生，同一邮箱重复添加会得到唯一约束冲突。
    pub fn add(&self, member: &Member) -> Result<String> {
        let doc = member.to_document().context("会员序列化失败")?;

        if let Err(issues) = schemas::membership_application().validate(&doc) {
            let joined = issues
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            anyhow::bail!("会员资料校验失败: {joined}");
        }

        let id = slugify(&member.email);
        self.store
            .create(COLLECTION, &id, &doc)
            .with_context(|| format!("创建会员 {} 失败", member.display_name()))?;

        tracing::info!("新增会员 {}（{}）", member.display_name(), id);
        Ok(id)
    }

    /// 更新会员的部分字段
    pub fn update_fields(&self, id: &str, fields: Map<String, serde_json::Value>) -> Result<()> {
        if !self.store.exists(COLLECTION, id)? {
            anyhow::bail!("会员 {id} 不存在");
        }
        self.store
            .update_fields(COLLECTION, id, &fields)
            .with_context(|| format!("更新会员 {id} 失败"))?;
        Ok(())
    }
}
