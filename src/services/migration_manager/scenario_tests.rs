//! 迁移场景测试
//!
//! 模拟真实存储上的完整迁移流程，覆盖幂等重跑、部分失败重试、
//! 空集合等端到端场景。所有测试使用 tempfile::TempDir 隔离，
//! 不修改真实文件。

use super::create_migration_manager;
use crate::data::DocumentStore;
use crate::models::AppConfig;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn setup(temp: &TempDir) -> (Arc<DocumentStore>, Arc<AppConfig>) {
    let store = Arc::new(DocumentStore::new(temp.path()));
    let config = Arc::new(AppConfig {
        data_dir: temp.path().to_path_buf(),
        ..AppConfig::default()
    });
    (store, config)
}

mod full_run {
    use super::*;

    /// 综合场景：四种迁移在同一个存储上按版本顺序全部执行
    #[tokio::test]
    async fn test_run_all_over_seeded_store() {
        let temp = TempDir::new().unwrap();
        let (store, config) = setup(&temp);

        store
            .create("boardMembers", "bm-1", &json!({"name": "Jane Doe", "title": "Treasurer"}))
            .unwrap();
        store
            .create("pastPresidents", "pp-1", &json!({"name": "Mary Smith", "term": "2018-2019"}))
            .unwrap();
        store
            .create(
                "v1Members",
                "row-1",
                &json!({"first_name": "John", "last_name": "Roe", "email": "jroe@school.edu"}),
            )
            .unwrap();
        store
            .create("settings", "homepage", &json!({"banner": "欢迎"}))
            .unwrap();

        let manager = create_migration_manager(store.clone(), config);
        let results = manager.run_all().await.unwrap();

        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.success), "全部迁移应该成功");
        let total_created: usize = results.iter().map(|r| r.records_created).sum();
        assert_eq!(total_created, 4);

        // 会员集合收到三条记录（理事、历任会长、V1 导入）
        assert_eq!(store.read_all("members").unwrap().len(), 3);
        // 设置整合进单个文档
        let settings = store.read("siteSettings", "main").unwrap().unwrap();
        assert_eq!(settings["homepage"]["banner"], json!("欢迎"));

        // 模式版本推进后，再次 run_all 无待执行迁移
        let second = manager.run_all().await.unwrap();
        assert!(second.is_empty());
    }

    /// 空存储：没有任何源集合也能顺利跑完，计数全零
    #[tokio::test]
    async fn test_run_all_over_empty_store() {
        let temp = TempDir::new().unwrap();
        let (store, config) = setup(&temp);

        let manager = create_migration_manager(store.clone(), config);
        let results = manager.run_all().await.unwrap();

        assert_eq!(results.len(), 4);
        for result in &results {
            assert!(result.success);
            assert_eq!(result.records_created, 0);
            assert_eq!(result.records_skipped, 0);
            assert_eq!(result.records_failed, 0);
        }
    }
}

mod idempotency {
    use super::*;

    /// 记录级幂等：同一迁移手动重跑，第二次全部跳过
    #[tokio::test]
    async fn test_rerun_skips_created_records() {
        let temp = TempDir::new().unwrap();
        let (store, config) = setup(&temp);

        for (id, name) in [("bm-1", "Jane Doe"), ("bm-2", "John Roe")] {
            store
                .create("boardMembers", id, &json!({"name": name, "title": "Director"}))
                .unwrap();
        }

        let manager = create_migration_manager(store.clone(), config);

        let first = manager.run_single("board_members").await.unwrap();
        assert_eq!(first.records_created, 2);

        let second = manager.run_single("board_members").await.unwrap();
        assert_eq!(second.records_created, 0);
        assert_eq!(second.records_skipped, 2, "第一次创建的记录重跑时应该全部跳过");
        assert_eq!(store.read_all("members").unwrap().len(), 2);
    }

    /// 部分失败后重跑：只有之前失败的记录被重试，其余跳过
    #[tokio::test]
    async fn test_rerun_retries_only_failed_record() {
        let temp = TempDir::new().unwrap();
        let (store, config) = setup(&temp);

        store
            .create("v1Members", "row-1", &json!({"name": "Jane Doe", "email": "a@x.org"}))
            .unwrap();
        // 这一行的续费日期无法解析，第一次运行会失败
        store
            .create(
                "v1Members",
                "row-2",
                &json!({"name": "Bad Row", "email": "b@x.org", "renewal": "没有日期"}),
            )
            .unwrap();
        store
            .create("v1Members", "row-3", &json!({"name": "John Roe", "email": "c@x.org"}))
            .unwrap();

        let manager = create_migration_manager(store.clone(), config);

        let first = manager.run_single("v1_import").await.unwrap();
        assert!(!first.success);
        assert_eq!(first.records_created, 2);
        assert_eq!(first.records_failed, 1);
        assert_eq!(first.failures.len(), 1);
        assert!(first.failures[0].contains("row-2"));

        // 人工修正出错的行后重跑
        store
            .upsert(
                "v1Members",
                "row-2",
                &json!({"name": "Bad Row", "email": "b@x.org", "renewal": "2026-01-01"}),
            )
            .unwrap();

        let second = manager.run_single("v1_import").await.unwrap();
        assert!(second.success);
        assert_eq!(second.records_created, 1, "只有之前失败的记录被重新创建");
        assert_eq!(second.records_skipped, 2, "之前创建成功的记录全部跳过");
        assert_eq!(store.read_all("members").unwrap().len(), 3);
    }
}

mod failure_semantics {
    use super::*;

    /// 记录级失败不影响模式版本推进逻辑：
    /// 失败的迁移保持版本不动，后续迁移照常执行
    #[tokio::test]
    async fn test_failed_migration_keeps_version_for_retry() {
        let temp = TempDir::new().unwrap();
        let (store, config) = setup(&temp);

        store
            .create("v1Members", "row-1", &json!({"name": "Bad", "renewal": "???"}))
            .unwrap();
        store
            .create("settings", "contact", &json!({"email": "info@gsbea.org"}))
            .unwrap();

        let manager = create_migration_manager(store.clone(), config);
        let results = manager.run_all().await.unwrap();

        let v1 = results.iter().find(|r| r.migration_id == "v1_import").unwrap();
        assert!(!v1.success);
        let settings = results
            .iter()
            .find(|r| r.migration_id == "site_settings")
            .unwrap();
        assert!(settings.success, "失败的迁移不应该阻断后续迁移");

        // 版本停在失败前的位置（0.3.0），
        // 下次 run_all 仍会把失败的迁移列为待执行
        let version = store.read("_meta", "schema").unwrap().unwrap();
        assert_eq!(version["version"], json!("0.3.0"));
    }
}
