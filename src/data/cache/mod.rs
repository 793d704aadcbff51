//! 缓存层实现
//!
//! 提供文档存储的读取缓存：
//! - `lru`: 通用 LRU 缓存（支持容量限制 + TTL 过期）
//! - `document_cache`: 文档读取缓存（文件校验和验证）

pub mod document_cache;
pub mod lru;

pub use document_cache::{compute_checksum, DocumentCache};
pub use lru::LruCache;
