//! Domain Layer - 领域层
//!
//! 只有一个限界上下文:
//! - Playlist Context: 播放列表、曲目记录与展示格式化

pub mod playlist;
