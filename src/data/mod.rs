//! 文档存储模块
//!
//! 把一个目录树当作不透明的键值文档库使用，并提供读取缓存与查询监控。
//!
//! # 模块组织
//!
//! - `error`: 统一错误类型定义
//! - `cache`: 缓存层实现（LRU + 文件校验和）
//! - `store`: JSON 文档存储（集合/文档的四个基本操作）
//! - `monitor`: 查询性能监控（计时 + 慢查询告警）
//!
//! # 使用示例
//!
//! ```rust
//! use std::time::Duration;
//! use crate::data::{DocumentStore, QueryMonitor};
//!
//! let store = DocumentStore::with_cache("/var/lib/gsbea", 50, Duration::from_secs(300));
//! let monitor = QueryMonitor::default();
//!
//! let members = monitor.observe("members.read_all", || store.read_all("members"))?;
//! ```

pub mod cache;
pub mod error;
pub mod monitor;
pub mod store;

pub use error::{DataError, Result};
pub use monitor::{QueryMonitor, QuerySummary};
pub use store::DocumentStore;
