//! 应用层错误定义
//!
//! 统一的查询错误类型

use thiserror::Error;

use crate::application::ports::MediaServerError;
use crate::domain::playlist::PlaylistError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 远程播放列表/元数据/缩略图不存在或请求失败
    #[error("{0}")]
    RemoteNotFound(String),

    /// 缓存中的真实 key 无法拆解为预期的路径结构
    #[error("Malformed cached reference: {0}")]
    MalformedReference(String),

    /// 未知的混淆 token
    #[error("Unknown token: {0}")]
    UnknownToken(String),

    /// 配置中不存在的播放列表
    #[error("Playlist not configured: {0}")]
    PlaylistNotConfigured(String),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 外部服务错误（网络层失败，而非远程明确拒绝）
    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 是否属于"资源不存在"一类（对应 HTTP 404）
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RemoteNotFound(_)
                | Self::MalformedReference(_)
                | Self::UnknownToken(_)
                | Self::PlaylistNotConfigured(_)
        )
    }
}

impl From<MediaServerError> for ApplicationError {
    fn from(err: MediaServerError) -> Self {
        Self::RemoteNotFound(err.to_string())
    }
}

impl From<PlaylistError> for ApplicationError {
    fn from(err: PlaylistError) -> Self {
        Self::RemoteNotFound(err.to_string())
    }
}
