//! 通用 LRU 缓存实现
//!
//! 提供基于 LRU (Least Recently Used) 淘汰策略的缓存，支持：
//! - 容量限制：超过容量自动淘汰最久未使用的项
//! - TTL 过期：基于时间的自动失效
//!
//! 本身不做锁保护，线程安全由调用方（如 [`super::DocumentCache`]）负责。

use linked_hash_map::LinkedHashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// 缓存条目，包含值和插入时间
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    /// 检查是否已过期
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() > ttl
    }
}

/// LRU 缓存
///
/// 使用 `LinkedHashMap` 保证插入顺序，实现 LRU 淘汰策略。
///
/// # 泛型参数
///
/// - `K`: 键类型，必须实现 `Eq + Hash`
/// - `V`: 值类型
#[derive(Debug)]
pub struct LruCache<K: Eq + Hash, V> {
    entries: LinkedHashMap<K, CacheEntry<V>>,
    capacity: usize,
    ttl: Duration,
}

impl<K: Eq + Hash, V> LruCache<K, V> {
    /// 创建新的 LRU 缓存
    ///
    /// # 参数
    ///
    /// - `capacity`: 缓存容量（最大条目数）
    /// - `ttl`: 缓存项的生存时间
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: LinkedHashMap::new(),
            capacity,
            ttl,
        }
    }

    /// 获取缓存值
    ///
    /// 如果键存在且未过期，返回 `Some(&V)` 并将该项移至最近使用位置。
    /// 如果键不存在或已过期，返回 `None`。
    pub fn get(&mut self, key: &K) -> Option<&V> {
        // 过期检查先于 LRU 刷新，过期项直接删除
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired(self.ttl) {
                self.entries.remove(key);
                return None;
            }
        } else {
            return None;
        }

        // 未过期，刷新 LRU 位置（移至末尾）
        self.entries.get_refresh(key).map(|entry| &entry.value)
    }

    /// 插入缓存值
    ///
    /// 如果键已存在，更新其值和插入时间。
    /// 如果超过容量限制，自动淘汰最久未使用的项。
    pub fn insert(&mut self, key: K, value: V) {
        // 如果键已存在，先删除旧值
        if self.entries.contains_key(&key) {
            self.entries.remove(&key);
        }

        // 检查容量，超过则淘汰最旧的项
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }

        // 插入新值（自动放在末尾）
        self.entries.insert(key, CacheEntry::new(value));
    }

    /// 删除指定键
    ///
    /// 返回被删除的值（如果存在）。
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    /// 清空所有缓存
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// 获取当前缓存项数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 检查缓存是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 获取缓存容量
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
