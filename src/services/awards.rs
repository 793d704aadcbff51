// 奖项提名服务

use crate::data::{DocumentStore, QueryMonitor};
use crate::models::AwardNomination;
use crate::services::validation::schemas;
use crate::utils::text::slugify;
use anyhow::{Context, Result};
use std::sync::Arc;

const COLLECTION: &str = "awardNominations";

/// 奖项提名服务
pub struct AwardsService {
    store: Arc<DocumentStore>,
    monitor: Arc<QueryMonitor>,
}

impl AwardsService {
    pub fn new(store: Arc<DocumentStore>, monitor: Arc<QueryMonitor>) -> Self {
        Self { store, monitor }
    }

    /// 提交一条提名（先过提名表校验）
    ///
    /// 文档 ID 由奖项 + 被提名人 + 提名人邮箱派生，
    /// 同一提名人对同一人重复提交同一奖项会冲突。
    pub fn submit(&self, nomination: &AwardNomination) -> Result<String> {
        let doc = nomination.to_document().context("提名序列化失败")?;

        if let Err(issues) = schemas::award_nomination().validate(&doc) {
            let joined = issues
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            anyhow::bail!("提名信息校验失败: {joined}");
        }

        let id = slugify(&format!(
            "{}-{}-{}",
            nomination.award, nomination.nominee_name, nomination.nominator_email
        ));
        self.store
            .create(COLLECTION, &id, &doc)
            .with_context(|| format!("创建提名 {} 失败", nomination.nominee_name))?;

        tracing::info!(
            "{} 提名 {} 参评 {}",
            nomination.nominator_name,
            nomination.nominee_name,
            nomination.award
        );
        Ok(id)
    }

    /// 某个奖项的全部提名
    pub fn list_for_award(&self, award: &str) -> Result<Vec<AwardNomination>> {
        let docs = self
            .monitor
            .observe("awardNominations.read_all", || self.store.read_all(COLLECTION))
            .context("读取提名集合失败")?;

        let mut nominations = Vec::new();
        for (id, doc) in docs {
            match AwardNomination::from_document(doc) {
                Ok(n) if n.award == award => nominations.push(n),
                Ok(_) => {}
                Err(e) => tracing::warn!("提名文档 {} 无法解析，已跳过: {}", id, e),
            }
        }

        Ok(nominations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service(temp: &TempDir) -> AwardsService {
        AwardsService::new(
            Arc::new(DocumentStore::new(temp.path())),
            Arc::new(QueryMonitor::default()),
        )
    }

    fn nomination(award: &str, nominee: &str) -> AwardNomination {
        AwardNomination {
            award: award.to_string(),
            nominee_name: nominee.to_string(),
            nominee_email: None,
            nominator_name: "John Roe".to_string(),
            nominator_email: "john.roe@example.com".to_string(),
            statement: "多年深耕商科教学。".to_string(),
            submitted_at: "2026-02-10T00:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_submit_and_list() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        service.submit(&nomination("educator-of-the-year", "Jane Doe")).unwrap();
        service.submit(&nomination("educator-of-the-year", "Ann Bright")).unwrap();
        service.submit(&nomination("lifetime-achievement", "Mary Smith")).unwrap();

        assert_eq!(service.list_for_award("educator-of-the-year").unwrap().len(), 2);
        assert_eq!(service.list_for_award("lifetime-achievement").unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_nomination_conflicts() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        service.submit(&nomination("educator-of-the-year", "Jane Doe")).unwrap();
        assert!(service
            .submit(&nomination("educator-of-the-year", "Jane Doe"))
            .is_err());
    }

    #[test]
    fn test_submit_validates_form() {
        let temp = TempDir::new().unwrap();
        let service = service(&temp);

        let mut bad = nomination("educator-of-the-year", "Jane Doe");
        bad.statement = String::new();
        bad.nominator_email = "无效".to_string();

        let err = service.submit(&bad).unwrap_err();
        assert!(err.to_string().contains("校验失败"));
    }
}
