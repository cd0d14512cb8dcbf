//! Playlist Query Handlers

use std::sync::Arc;

use futures_util::future::try_join_all;

use crate::application::catalog::{CatalogEntry, PlaylistCatalog};
use crate::application::error::ApplicationError;
use crate::application::ports::{KeyCachePort, MediaServerPort};
use crate::application::queries::{GetPlaylistPage, ListPlaylists};
use crate::domain::playlist::{pair_positionally, PlaylistOverview, PlaylistSummary, TrackRecord};

// ============================================================================
// PlaylistMerger
// ============================================================================

/// 播放列表数据合并
///
/// 1. 获取播放列表条目
/// 2. 一次批量请求全部条目的元数据
/// 3. 按位置配对，并为暴露给客户端的标识生成混淆 token
///
/// 任一远程请求失败都整体失败，不重试，不返回部分结果。
pub struct PlaylistMerger {
    media_server: Arc<dyn MediaServerPort>,
    key_cache: Arc<dyn KeyCachePort>,
}

impl PlaylistMerger {
    pub fn new(media_server: Arc<dyn MediaServerPort>, key_cache: Arc<dyn KeyCachePort>) -> Self {
        Self {
            media_server,
            key_cache,
        }
    }

    pub async fn merge(&self, entry: &CatalogEntry) -> Result<PlaylistSummary, ApplicationError> {
        let listing = self
            .media_server
            .playlist_items(entry.rating_key)
            .await
            .map_err(|e| {
                tracing::warn!(rating_key = entry.rating_key, error = %e, "Could not find playlist");
                ApplicationError::from(e)
            })?;

        let rating_keys: Vec<String> = listing
            .items
            .iter()
            .map(|item| item.rating_key.clone())
            .collect();

        let metadata = if rating_keys.is_empty() {
            Vec::new()
        } else {
            self.media_server.metadata(&rating_keys).await.map_err(|e| {
                tracing::warn!(
                    rating_key = entry.rating_key,
                    tracks = rating_keys.len(),
                    error = %e,
                    "Could not find track metadata"
                );
                ApplicationError::from(e)
            })?
        };

        let tracks = pair_positionally(listing.items, metadata)
            .map_err(|e| {
                tracing::warn!(rating_key = entry.rating_key, error = %e, "Could not merge track metadata");
                ApplicationError::from(e)
            })?
            .into_iter()
            .enumerate()
            .map(|(position, (metadata, media_metadata))| TrackRecord {
                position,
                obfuscated_key: self.key_cache.obfuscate(&metadata.key),
                obfuscated_thumb: metadata
                    .thumb_path()
                    .map(|thumb| self.key_cache.obfuscate(thumb)),
                metadata,
                media_metadata,
            })
            .collect();

        Ok(PlaylistSummary {
            key: entry.key.clone(),
            rating_key: listing.playlist.rating_key,
            title: listing.playlist.title,
            size: listing.playlist.size,
            duration_ms: listing.playlist.duration_ms,
            tracks,
        })
    }
}

// ============================================================================
// GetPlaylistPage
// ============================================================================

/// GetPlaylistPage Handler
pub struct GetPlaylistPageHandler {
    catalog: Arc<PlaylistCatalog>,
    merger: PlaylistMerger,
}

impl GetPlaylistPageHandler {
    pub fn new(
        catalog: Arc<PlaylistCatalog>,
        media_server: Arc<dyn MediaServerPort>,
        key_cache: Arc<dyn KeyCachePort>,
    ) -> Self {
        Self {
            catalog,
            merger: PlaylistMerger::new(media_server, key_cache),
        }
    }

    pub async fn handle(&self, query: GetPlaylistPage) -> Result<PlaylistSummary, ApplicationError> {
        let entry = self
            .catalog
            .get(&query.key)
            .ok_or_else(|| ApplicationError::PlaylistNotConfigured(query.key.clone()))?;

        let summary = self.merger.merge(entry).await?;

        tracing::debug!(
            key = %summary.key,
            rating_key = %summary.rating_key,
            tracks = summary.tracks.len(),
            "Playlist merged"
        );

        Ok(summary)
    }
}

// ============================================================================
// ListPlaylists
// ============================================================================

/// ListPlaylists Handler
///
/// 并发获取所有可见播放列表的概要，任一失败则整体失败。
pub struct ListPlaylistsHandler {
    catalog: Arc<PlaylistCatalog>,
    media_server: Arc<dyn MediaServerPort>,
}

impl ListPlaylistsHandler {
    pub fn new(catalog: Arc<PlaylistCatalog>, media_server: Arc<dyn MediaServerPort>) -> Self {
        Self {
            catalog,
            media_server,
        }
    }

    pub async fn handle(&self, _query: ListPlaylists) -> Result<Vec<PlaylistOverview>, ApplicationError> {
        let fetches = self.catalog.visible().map(|entry| async move {
            let playlist = self.media_server.playlist(entry.rating_key).await.map_err(|e| {
                tracing::warn!(rating_key = entry.rating_key, error = %e, "Could not find playlist");
                ApplicationError::from(e)
            })?;

            Ok::<_, ApplicationError>(PlaylistOverview {
                key: entry.key.clone(),
                title: playlist.title,
                size: playlist.size,
                duration_ms: playlist.duration_ms,
            })
        });

        let mut overviews = try_join_all(fetches).await?;
        overviews.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(overviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::playlist::TrackMetadata;
    use crate::infrastructure::adapters::{FakeCall, FakeMediaServer};
    use crate::infrastructure::memory::InMemoryKeyCache;

    fn episode(rating_key: &str, season: u32, episode: u32) -> TrackMetadata {
        TrackMetadata {
            rating_key: rating_key.to_string(),
            key: format!("/library/metadata/{}", rating_key),
            title: format!("Episode {}", rating_key),
            grandparent_title: Some("Show".to_string()),
            parent_index: season,
            index: episode,
            duration_ms: 1_800_000,
            thumb: Some(format!("/library/metadata/{}/thumb/1705219286", rating_key)),
            ..Default::default()
        }
    }

    fn catalog() -> Arc<PlaylistCatalog> {
        Arc::new(PlaylistCatalog::new(vec![
            CatalogEntry {
                key: "comfort".to_string(),
                rating_key: 100,
                visible: true,
            },
            CatalogEntry {
                key: "archive".to_string(),
                rating_key: 200,
                visible: true,
            },
            CatalogEntry {
                key: "secret".to_string(),
                rating_key: 300,
                visible: false,
            },
        ]))
    }

    fn page_handler(server: Arc<FakeMediaServer>, cache: Arc<InMemoryKeyCache>) -> GetPlaylistPageHandler {
        GetPlaylistPageHandler::new(catalog(), server, cache)
    }

    #[tokio::test]
    async fn test_merge_keeps_order_and_obfuscates_thumbs() {
        let mut imdb = episode("12", 1, 2);
        imdb.guids = vec!["imdb://tt0000012".to_string()];
        let mut no_thumb = episode("13", 1, 3);
        no_thumb.thumb = None;

        let server = Arc::new(
            FakeMediaServer::new()
                .with_playlist(100, "Comfort", vec![episode("11", 1, 1), episode("12", 1, 2), no_thumb])
                .with_metadata("12", Some(imdb)),
        );
        let cache = InMemoryKeyCache::new(None).arc();
        let handler = page_handler(server.clone(), cache.clone());

        let summary = handler
            .handle(GetPlaylistPage {
                key: "comfort".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(summary.title, "Comfort");
        assert_eq!(summary.tracks.len(), 3);
        let keys: Vec<_> = summary.tracks.iter().map(|t| t.metadata.rating_key.as_str()).collect();
        assert_eq!(keys, vec!["11", "12", "13"]);

        let first = &summary.tracks[0];
        let token = first.obfuscated_thumb.as_deref().unwrap();
        assert_eq!(
            cache.resolve(token).as_deref(),
            Some("/library/metadata/11/thumb/1705219286")
        );
        assert_eq!(cache.resolve(&first.obfuscated_key).as_deref(), Some("/library/metadata/11"));
        assert_eq!(summary.tracks[1].imdb_url(), "https://www.imdb.com/title/tt0000012");
        assert_eq!(summary.tracks[2].obfuscated_thumb, None);

        assert_eq!(
            server.calls(),
            vec![
                FakeCall::PlaylistItems(100),
                FakeCall::Metadata(vec!["11".to_string(), "12".to_string(), "13".to_string()]),
            ]
        );
    }

    #[tokio::test]
    async fn test_merge_is_stable_across_requests() {
        let server = Arc::new(FakeMediaServer::new().with_playlist(100, "Comfort", vec![episode("11", 1, 1)]));
        let cache = InMemoryKeyCache::new(Some("salt".to_string())).arc();
        let handler = page_handler(server, cache.clone());
        let query = GetPlaylistPage {
            key: "comfort".to_string(),
        };

        let first = handler.handle(query.clone()).await.unwrap();
        let second = handler.handle(query).await.unwrap();

        assert_eq!(first.tracks[0].obfuscated_thumb, second.tracks[0].obfuscated_thumb);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_metadata_count_mismatch_fails_whole_page() {
        let server = Arc::new(
            FakeMediaServer::new()
                .with_playlist(100, "Comfort", vec![episode("11", 1, 1), episode("12", 1, 2)])
                .with_metadata("12", None),
        );
        let cache = InMemoryKeyCache::new(None).arc();
        let handler = page_handler(server, cache.clone());

        let err = handler
            .handle(GetPlaylistPage {
                key: "comfort".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::RemoteNotFound(_)));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_metadata_order_mismatch_fails() {
        let server = Arc::new(
            FakeMediaServer::new()
                .with_playlist(100, "Comfort", vec![episode("11", 1, 1), episode("12", 1, 2)])
                .with_metadata("12", Some(episode("99", 9, 9))),
        );
        let handler = page_handler(server, InMemoryKeyCache::new(None).arc());

        let err = handler
            .handle(GetPlaylistPage {
                key: "comfort".to_string(),
            })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("order mismatch"));
    }

    #[tokio::test]
    async fn test_empty_playlist_skips_metadata_lookup() {
        let server = Arc::new(FakeMediaServer::new().with_playlist(100, "Empty", vec![]));
        let handler = page_handler(server.clone(), InMemoryKeyCache::new(None).arc());

        let summary = handler
            .handle(GetPlaylistPage {
                key: "comfort".to_string(),
            })
            .await
            .unwrap();

        assert!(summary.tracks.is_empty());
        assert_eq!(server.calls(), vec![FakeCall::PlaylistItems(100)]);
    }

    #[tokio::test]
    async fn test_remote_playlist_missing() {
        let server = Arc::new(FakeMediaServer::new());
        let handler = page_handler(server, InMemoryKeyCache::new(None).arc());

        let err = handler
            .handle(GetPlaylistPage {
                key: "comfort".to_string(),
            })
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("playlist 100"));
    }

    #[tokio::test]
    async fn test_unconfigured_playlist() {
        let server = Arc::new(FakeMediaServer::new());
        let handler = page_handler(server.clone(), InMemoryKeyCache::new(None).arc());

        let err = handler
            .handle(GetPlaylistPage {
                key: "nope".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::PlaylistNotConfigured(_)));
        assert_eq!(server.call_count(), 0);
    }

    #[tokio::test]
    async fn test_list_visible_sorted() {
        let server = Arc::new(
            FakeMediaServer::new()
                .with_playlist(100, "Comfort", vec![episode("11", 1, 1)])
                .with_playlist(200, "Archive", vec![episode("21", 2, 1), episode("22", 2, 2)])
                .with_playlist(300, "Secret", vec![]),
        );
        let handler = ListPlaylistsHandler::new(catalog(), server.clone());

        let overviews = handler.handle(ListPlaylists).await.unwrap();

        let keys: Vec<_> = overviews.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["archive", "comfort"]);
        assert_eq!(overviews[0].size, 2);
        assert!(!server.calls().contains(&FakeCall::Playlist(300)));
    }

    #[tokio::test]
    async fn test_list_fails_if_any_playlist_missing() {
        let server = Arc::new(FakeMediaServer::new().with_playlist(100, "Comfort", vec![]));
        let handler = ListPlaylistsHandler::new(catalog(), server);

        let err = handler.handle(ListPlaylists).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
