//! Memory Layer - In-Memory State Management
//!
//! 实现 KeyCache，进程内维护真实 key 与混淆 token 的映射

mod key_cache;

pub use key_cache::{fnv1a32, InMemoryKeyCache, TokenHasher};
