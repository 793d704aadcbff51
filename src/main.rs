// 迁移入口
//
// 不接受命令行参数：读取配置，注册全部迁移，按版本顺序执行待执行的
// 迁移，把进度和汇总打到控制台。退出码 0 表示没有任何失败记录。

use gsbea::utils::config::read_app_config;
use gsbea::{create_migration_manager, DocumentStore, LogManager, MigrationResult};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// 打印单个迁移的结果行
fn print_result(result: &MigrationResult) {
    let status = if result.success { "成功" } else { "失败" };
    println!(
        "  [{}] {} - {}（{:.2}s）",
        status, result.migration_id, result.message, result.duration_secs
    );
    for failure in &result.failures {
        println!("      失败记录: {failure}");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _log_manager = match LogManager::init() {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("日志系统初始化失败: {e:?}");
            return ExitCode::FAILURE;
        }
    };

    let config = match read_app_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!("读取配置失败: {e:?}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("数据目录: {:?}", config.data_dir);

    let store = Arc::new(DocumentStore::with_cache(
        &config.data_dir,
        50,
        Duration::from_secs(300),
    ));

    let manager = create_migration_manager(store, config);

    match manager.run_all().await {
        Ok(results) => {
            if results.is_empty() {
                println!("没有待执行的迁移。");
                return ExitCode::SUCCESS;
            }

            println!("迁移汇总:");
            for result in &results {
                print_result(result);
            }

            let failed_records: usize = results.iter().map(|r| r.records_failed).sum();
            let failed_migrations = results.iter().filter(|r| !r.success).count();

            if failed_migrations == 0 && failed_records == 0 {
                println!("全部迁移执行成功。");
                ExitCode::SUCCESS
            } else {
                println!("有 {failed_migrations} 个迁移未成功（{failed_records} 条失败记录），请检查日志后重新运行。");
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            // 源集合读不出来等灾难性错误：没有报告可言，直接失败退出
            tracing::error!("迁移运行中止: {e:?}");
            ExitCode::FAILURE
        }
    }
}
