//! Playlist Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaylistError {
    #[error("metadata count mismatch: playlist has {items} items, metadata lookup returned {metadata}")]
    MetadataCountMismatch { items: usize, metadata: usize },

    #[error("metadata order mismatch at position {position}: expected {expected}, got {actual}")]
    MetadataOrderMismatch {
        position: usize,
        expected: String,
        actual: String,
    },
}
