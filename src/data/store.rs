//! JSON 文档存储
//!
//! 把文件系统当作一个不透明的键值文档库使用：
//! - 集合 = 目录，文档 = `{id}.json`
//! - 四个基本操作：读取整个集合、按键读取单个文档、写入单个文档、更新文档字段
//! - `create` 借助 `create_new` 打开模式提供硬性唯一约束，冲突时返回
//!   [`DataError::AlreadyExists`]
//! - 等值查找（`find_matching`）基于整集合扫描，不做索引
//!
//! # 使用示例
//!
//! ```rust
//! use std::time::Duration;
//! use crate::data::DocumentStore;
//!
//! let store = DocumentStore::with_cache("/var/lib/gsbea", 50, Duration::from_secs(300));
//! store.create("members", "jane-doe", &serde_json::json!({"firstName": "Jane"}))?;
//! let doc = store.read("members", "jane-doe")?;
//! ```

use crate::data::cache::{compute_checksum, DocumentCache};
use crate::data::{DataError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// JSON 文档存储
///
/// 支持带缓存和无缓存两种模式。
pub struct DocumentStore {
    /// 存储根目录，每个集合是其下的一个子目录
    root: PathBuf,
    /// 文档读取缓存（None 表示无缓存模式）
    cache: Option<DocumentCache>,
}

impl DocumentStore {
    /// 创建无缓存的存储
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: None,
        }
    }

    /// 创建带读取缓存的存储
    ///
    /// # 参数
    ///
    /// - `root`: 存储根目录
    /// - `capacity`: 缓存容量（最大文档数）
    /// - `ttl`: 缓存 TTL
    pub fn with_cache(root: impl Into<PathBuf>, capacity: usize, ttl: Duration) -> Self {
        Self {
            root: root.into(),
            cache: Some(DocumentCache::new(capacity, ttl)),
        }
    }

    /// 存储根目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 读取集合中的全部文档，返回 `(文档 ID, 文档)` 列表
    ///
    /// 不存在的集合目录视为空集合。目录本身无法枚举（权限、I/O 故障）
    /// 时返回错误，由调用方决定是否中止。
    ///
    /// 返回结果按文档 ID 排序，调用方不应依赖其他顺序语义。
    pub fn read_all(&self, collection: &str) -> Result<Vec<(String, Value)>> {
        let dir = self.collection_dir(collection)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut docs = Vec::new();
        let entries = fs::read_dir(&dir).map_err(|e| DataError::io(dir.clone(), e))?;
        for entry in entries {
            let entry = entry.map_err(|e| DataError::io(dir.clone(), e))?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let id = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };
            let value = self.read_document_file(&path)?;
            docs.push((id, value));
        }

        docs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(docs)
    }

    /// 按键读取单个文档
    ///
    /// # 返回
    ///
    /// - `Ok(Some(Value))`: 文档存在
    /// - `Ok(None)`: 文档不存在
    pub fn read(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let path = self.doc_path(collection, id)?;
        if !path.exists() {
            return Ok(None);
        }
        self.read_document_file(&path).map(Some)
    }

    /// 检查文档是否存在
    pub fn exists(&self, collection: &str, id: &str) -> Result<bool> {
        Ok(self.doc_path(collection, id)?.exists())
    }

    /// 创建新文档，文档已存在时返回 [`DataError::AlreadyExists`]
    ///
    /// 通过 `create_new` 打开模式在文件系统层面保证唯一性，
    /// 而不是"先查后写"。
    pub fn create(&self, collection: &str, id: &str, value: &Value) -> Result<()> {
        let path = self.doc_path(collection, id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| DataError::io(parent.to_path_buf(), e))?;
        }

        let content = serde_json::to_string_pretty(value)?;
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(DataError::AlreadyExists {
                    collection: collection.to_string(),
                    doc_id: id.to_string(),
                });
            }
            Err(e) => return Err(DataError::io(path.clone(), e)),
        };
        file.write_all(content.as_bytes())
            .map_err(|e| DataError::io(path.clone(), e))?;

        set_permissions(&path)?;
        self.invalidate(&path);
        Ok(())
    }

    /// 写入文档（存在则整体覆盖）
    pub fn upsert(&self, collection: &str, id: &str, value: &Value) -> Result<()> {
        let path = self.doc_path(collection, id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| DataError::io(parent.to_path_buf(), e))?;
        }

        let content = serde_json::to_string_pretty(value)?;
        fs::write(&path, content).map_err(|e| DataError::io(path.clone(), e))?;

        set_permissions(&path)?;
        self.invalidate(&path);
        Ok(())
    }

    /// 更新文档的顶层字段（文档不存在时创建）
    ///
    /// 只合并 `fields` 中给出的键，其余字段保持不变。
    pub fn update_fields(&self, collection: &str, id: &str, fields: &Map<String, Value>) -> Result<()> {
        let mut doc = match self.read(collection, id)? {
            Some(Value::Object(map)) => map,
            Some(_) | None => Map::new(),
        };

        for (key, value) in fields {
            doc.insert(key.clone(), value.clone());
        }

        self.upsert(collection, id, &Value::Object(doc))
    }

    /// 等值查找：返回第一个所有过滤条件都匹配的文档 ID
    ///
    /// 过滤条件是 `(顶层字段名, 期望字符串值)` 列表。字段缺失或
    /// 不是字符串都视为不匹配。
    pub fn find_matching(&self, collection: &str, filters: &[(&str, &str)]) -> Result<Option<String>> {
        for (id, doc) in self.read_all(collection)? {
            let matched = filters.iter().all(|(field, expected)| {
                doc.get(*field).and_then(|v| v.as_str()) == Some(*expected)
            });
            if matched {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    /// 清空读取缓存
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// 读取并解析单个文档文件（经过缓存）
    fn read_document_file(&self, path: &Path) -> Result<Value> {
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(path) {
                return Ok(cached);
            }
        }

        let content = fs::read_to_string(path).map_err(|e| DataError::io(path.to_path_buf(), e))?;
        let value: Value = serde_json::from_str(&content)?;

        if let Some(cache) = &self.cache {
            let checksum = compute_checksum(path).map_err(|e| DataError::io(path.to_path_buf(), e))?;
            cache.insert(path.to_path_buf(), value.clone(), checksum);
        }

        Ok(value)
    }

    fn invalidate(&self, path: &Path) {
        if let Some(cache) = &self.cache {
            cache.invalidate(path);
        }
    }

    fn collection_dir(&self, collection: &str) -> Result<PathBuf> {
        validate_segment(collection)?;
        Ok(self.root.join(collection))
    }

    fn doc_path(&self, collection: &str, id: &str) -> Result<PathBuf> {
        validate_segment(id)?;
        Ok(self.collection_dir(collection)?.join(format!("{id}.json")))
    }
}

/// 校验集合名/文档 ID 不含路径穿越字符
fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty()
        || segment.contains('/')
        || segment.contains('\\')
        || segment.contains("..")
    {
        return Err(DataError::InvalidId(segment.to_string()));
    }
    Ok(())
}

/// 设置文档文件权限（Unix 平台 0o600）
fn set_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| DataError::io(path.to_path_buf(), e))?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}
