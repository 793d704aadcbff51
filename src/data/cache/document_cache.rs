//! 文档缓存实现
//!
//! 提供基于文档文件路径的读取缓存，支持：
//! - 文件校验和验证（SHA-256），外部修改后自动失效
//! - TTL 过期与 LRU 淘汰
//! - 线程安全访问

use super::LruCache;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// 文档读取缓存
///
/// 使用 LRU 缓存存储已解析的文档，并通过 SHA-256 校验和验证文件是否变更。
/// 键为文档文件路径，值为解析后的 JSON 文档。
#[derive(Debug, Clone)]
pub struct DocumentCache {
    /// LRU 缓存，键为文档路径，值为 JSON Value
    cache: Arc<RwLock<LruCache<PathBuf, serde_json::Value>>>,
    /// 文件校验和映射，用于检测文件变更
    checksums: Arc<RwLock<HashMap<PathBuf, String>>>,
}

impl DocumentCache {
    /// 创建新的文档缓存
    ///
    /// # 参数
    ///
    /// - `capacity`: 缓存容量（最大文档数）
    /// - `ttl`: 缓存项的生存时间
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(LruCache::new(capacity, ttl))),
            checksums: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 获取缓存的文档
    ///
    /// 自动校验文件是否变更，如果文件内容变更或已删除则使缓存失效。
    ///
    /// # 返回
    ///
    /// - `Some(Value)`: 缓存命中且未过期
    /// - `None`: 缓存未命中、已过期或文件已变更
    pub fn get(&self, path: &Path) -> Option<serde_json::Value> {
        let cached_value = {
            let mut cache = self.cache.write().ok()?;
            cache.get(&path.to_path_buf()).cloned()
        }?;

        // 检查文件是否变更
        match compute_checksum(path) {
            Ok(current) => {
                let checksums = self.checksums.read().ok()?;
                match checksums.get(&path.to_path_buf()) {
                    Some(stored) if stored == &current => {}
                    _ => {
                        // 校验和缺失或不匹配，缓存无效
                        drop(checksums);
                        self.invalidate(path);
                        return None;
                    }
                }
            }
            Err(_) => {
                // 无法计算校验和（文件可能已删除），使缓存失效
                self.invalidate(path);
                return None;
            }
        }

        Some(cached_value)
    }

    /// 插入缓存
    ///
    /// # 参数
    ///
    /// - `path`: 文档路径
    /// - `value`: 解析后的文档
    /// - `checksum`: 文件校验和
    pub fn insert(&self, path: PathBuf, value: serde_json::Value, checksum: String) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(path.clone(), value);
        }

        if let Ok(mut checksums) = self.checksums.write() {
            checksums.insert(path, checksum);
        }
    }

    /// 使指定路径的缓存失效
    pub fn invalidate(&self, path: &Path) {
        let path_buf = path.to_path_buf();

        if let Ok(mut cache) = self.cache.write() {
            cache.remove(&path_buf);
        }

        if let Ok(mut checksums) = self.checksums.write() {
            checksums.remove(&path_buf);
        }
    }

    /// 清空所有缓存
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }

        if let Ok(mut checksums) = self.checksums.write() {
            checksums.clear();
        }
    }

    /// 获取当前缓存项数量
    pub fn len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    /// 检查缓存是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 计算文件的 SHA-256 校验和（十六进制格式）
pub fn compute_checksum(path: &Path) -> std::io::Result<String> {
    let content = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_basic_insert_and_get() {
        let cache = DocumentCache::new(10, Duration::from_secs(60));
        let temp_dir = TempDir::new().unwrap();
        let doc_path = temp_dir.path().join("jane-doe.json");

        let content = serde_json::json!({"firstName": "Jane"});
        fs::write(&doc_path, content.to_string()).unwrap();
        let checksum = compute_checksum(&doc_path).unwrap();

        cache.insert(doc_path.clone(), content.clone(), checksum);
        assert_eq!(cache.get(&doc_path).unwrap(), content);
    }

    #[test]
    fn test_cache_miss() {
        let cache = DocumentCache::new(10, Duration::from_secs(60));
        let temp_dir = TempDir::new().unwrap();
        let doc_path = temp_dir.path().join("nonexistent.json");

        assert!(cache.get(&doc_path).is_none());
    }

    #[test]
    fn test_file_change_detection() {
        let cache = DocumentCache::new(10, Duration::from_secs(60));
        let temp_dir = TempDir::new().unwrap();
        let doc_path = temp_dir.path().join("settings.json");

        let v1 = serde_json::json!({"version": 1});
        fs::write(&doc_path, v1.to_string()).unwrap();
        let checksum = compute_checksum(&doc_path).unwrap();
        cache.insert(doc_path.clone(), v1.clone(), checksum);
        assert_eq!(cache.get(&doc_path).unwrap(), v1);

        // 外部修改文件内容后，缓存应该失效
        let v2 = serde_json::json!({"version": 2});
        fs::write(&doc_path, v2.to_string()).unwrap();
        assert!(cache.get(&doc_path).is_none());
    }

    #[test]
    fn test_deleted_file_invalidation() {
        let cache = DocumentCache::new(10, Duration::from_secs(60));
        let temp_dir = TempDir::new().unwrap();
        let doc_path = temp_dir.path().join("member.json");

        let content = serde_json::json!({"email": "a@gsbea.org"});
        fs::write(&doc_path, content.to_string()).unwrap();
        let checksum = compute_checksum(&doc_path).unwrap();
        cache.insert(doc_path.clone(), content, checksum);
        assert!(cache.get(&doc_path).is_some());

        // 删除文件后无法计算校验和，缓存应该失效
        fs::remove_file(&doc_path).unwrap();
        assert!(cache.get(&doc_path).is_none());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = DocumentCache::new(10, Duration::from_secs(60));
        let temp_dir = TempDir::new().unwrap();

        for i in 0..3 {
            let doc_path = temp_dir.path().join(format!("doc{}.json", i));
            let content = serde_json::json!({"id": i});
            fs::write(&doc_path, content.to_string()).unwrap();
            let checksum = compute_checksum(&doc_path).unwrap();
            cache.insert(doc_path, content, checksum);
        }
        assert_eq!(cache.len(), 3);

        cache.invalidate(&temp_dir.path().join("doc0.json"));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_ttl_expiration() {
        let cache = DocumentCache::new(10, Duration::from_millis(100));
        let temp_dir = TempDir::new().unwrap();
        let doc_path = temp_dir.path().join("doc.json");

        let content = serde_json::json!({"key": "value"});
        fs::write(&doc_path, content.to_string()).unwrap();
        let checksum = compute_checksum(&doc_path).unwrap();
        cache.insert(doc_path.clone(), content, checksum);
        assert!(cache.get(&doc_path).is_some());

        thread::sleep(Duration::from_millis(150));
        assert!(cache.get(&doc_path).is_none());
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(DocumentCache::new(100, Duration::from_secs(60)));
        let temp_dir = Arc::new(TempDir::new().unwrap());
        let mut handles = vec![];

        // 10 个线程并发插入
        for i in 0..10 {
            let cache_clone = Arc::clone(&cache);
            let temp_dir_clone = Arc::clone(&temp_dir);

            let handle = thread::spawn(move || {
                for j in 0..10 {
                    let doc_path = temp_dir_clone.path().join(format!("doc-{}-{}.json", i, j));
                    let content = serde_json::json!({"thread": i, "id": j});
                    fs::write(&doc_path, content.to_string()).unwrap();
                    let checksum = compute_checksum(&doc_path).unwrap();
                    cache_clone.insert(doc_path, content, checksum);
                }
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 100);
    }
}
