//! 日志系统模块
//!
//! 提供结构化、可配置的日志功能，支持：
//! - 控制台和文件输出
//! - JSON 格式可选
//! - 环境变量覆盖（RUST_LOG、GSBEA_LOG_*）
//! - 非阻塞文件写入

pub mod config;
pub mod logger;

// 重新导出公共接口
pub use config::{LogLevel, LoggingConfig};
pub use logger::LogManager;
