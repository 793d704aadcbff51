//! 统一错误类型定义
//!
//! 使用 `thiserror` 定义文档存储模块的所有错误类型，并提供与 `anyhow` 的兼容层。

use std::path::PathBuf;
use thiserror::Error;

/// 文档存储模块的统一错误类型
#[derive(Error, Debug)]
pub enum DataError {
    /// 文件 I/O 错误
    #[error("文件 I/O 错误: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON 序列化/反序列化错误
    #[error("JSON 序列化错误: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// 文档已存在（create 的唯一性约束冲突）
    #[error("文档已存在: {collection}/{doc_id}")]
    AlreadyExists { collection: String, doc_id: String },

    /// 资源未找到
    #[error("未找到资源: {0}")]
    NotFound(String),

    /// 无效的文档 ID（含路径分隔符等非法字符）
    #[error("无效的文档 ID: {0}")]
    InvalidId(String),

    /// 文档内容不是 JSON 对象（字段合并要求对象）
    #[error("文档内容必须是对象: {0}")]
    NotAnObject(String),

    /// 并发错误
    #[error("并发错误: {0}")]
    Concurrency(String),
}

/// 便于与现有代码集成的类型别名
pub type Result<T> = std::result::Result<T, DataError>;

// 注意：DataError 已通过 thiserror 实现了 std::error::Error trait，
// anyhow 会自动提供 From<DataError> for anyhow::Error 的实现，
// 因此无需手动实现，避免冲突。

/// 便捷的 I/O 错误构造器
impl DataError {
    /// 从 `std::io::Error` 和路径创建 I/O 错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// 判断是否为唯一性约束冲突
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}
