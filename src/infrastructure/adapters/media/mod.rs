//! Media Adapter - 媒体服务器客户端实现

mod fake_media_server;
mod plex_client;

pub use fake_media_server::{FakeCall, FakeMediaServer};
pub use plex_client::*;
