//! Playlist Catalog - 对外暴露的播放列表目录
//!
//! 配置中 `key → { rating_key, visible }` 的只读视图

use std::collections::BTreeMap;

/// 目录中的一个播放列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub key: String,
    /// 媒体服务器上的播放列表 rating key
    pub rating_key: u64,
    /// 是否出现在首页列表中
    pub visible: bool,
}

/// 播放列表目录
///
/// 以 key 排序存储，迭代顺序即首页展示顺序。
#[derive(Debug, Clone, Default)]
pub struct PlaylistCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl PlaylistCatalog {
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.key.clone(), entry))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.get(key)
    }

    /// 所有播放列表（包括隐藏的），按 key 排序
    pub fn all(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// 首页可见的播放列表，按 key 排序
    pub fn visible(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values().filter(|entry| entry.visible)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
