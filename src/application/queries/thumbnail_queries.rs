//! Thumbnail Queries - 缩略图代理查询

use crate::application::ports::Thumbnail;

/// 通过混淆 token 获取缩略图
#[derive(Debug, Clone)]
pub struct GetThumbnail {
    pub token: String,
}

/// 获取缩略图响应
#[derive(Debug)]
pub struct GetThumbnailResponse {
    pub rating_key: String,
    pub thumb_id: String,
    pub thumbnail: Thumbnail,
}
