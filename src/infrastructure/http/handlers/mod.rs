//! HTTP Handlers

mod pages;
mod ping;
mod thumbnail;

pub use pages::*;
pub use ping::*;
pub use thumbnail::*;
