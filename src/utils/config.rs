// 应用配置的读写
//
// 配置文件位于数据目录下的 config.json；数据目录可用
// GSBEA_DATA_DIR 环境变量覆盖（测试与多环境部署用）。

use crate::models::AppConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// 数据目录（~/.gsbea，或 GSBEA_DATA_DIR 指定），若不存在则创建
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var("GSBEA_DATA_DIR") {
        Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => crate::models::default_data_dir(),
    };

    if !dir.exists() {
        fs::create_dir_all(&dir).with_context(|| format!("无法创建数据目录: {:?}", dir))?;
    }
    Ok(dir)
}

/// 配置文件路径
pub fn app_config_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("config.json"))
}

/// 读取应用配置
///
/// 配置文件不存在时返回指向当前数据目录的默认配置。
pub fn read_app_config() -> Result<AppConfig> {
    let dir = data_dir()?;
    let config_path = dir.join("config.json");

    if !config_path.exists() {
        return Ok(AppConfig {
            data_dir: dir,
            ..AppConfig::default()
        });
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("读取配置文件失败: {:?}", config_path))?;
    let mut config: AppConfig =
        serde_json::from_str(&content).with_context(|| format!("解析配置文件失败: {:?}", config_path))?;

    // 数据目录以实际使用的目录为准（环境变量优先于文件内容）
    config.data_dir = dir;
    Ok(config)
}

/// 写入应用配置
pub fn write_app_config(config: &AppConfig) -> Result<()> {
    let config_path = app_config_path()?;
    let json = serde_json::to_string_pretty(config).context("配置序列化失败")?;
    fs::write(&config_path, json).with_context(|| format!("写入配置文件失败: {:?}", config_path))?;
    Ok(())
}
