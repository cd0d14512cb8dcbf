//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod playlist_handlers;
mod thumbnail_handlers;

pub use playlist_handlers::*;
pub use thumbnail_handlers::*;
