//! In-Memory Key Cache Implementation
//!
//! 两个 HashMap（真实 key → token、token → 真实 key）由同一把读写锁保护

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::application::ports::KeyCachePort;

/// token 派生用的 32 位哈希函数
pub type TokenHasher = fn(&[u8]) -> u32;

const FNV32_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;

/// 32 位 FNV-1a
pub fn fnv1a32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV32_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV32_PRIME)
    })
}

#[derive(Default)]
struct KeyMaps {
    real_to_token: HashMap<String, String>,
    token_to_real: HashMap<String, String>,
}

/// 内存 Key Cache
///
/// - token = 十进制的 `fnv1a32(salt ++ real)`
/// - 只增不删，无淘汰
/// - token 冲突时追加尝试序号重新派生（`salt ++ real ++ "#n"`），保证双向映射始终一一对应
pub struct InMemoryKeyCache {
    salt: String,
    hasher: TokenHasher,
    maps: RwLock<KeyMaps>,
}

impl InMemoryKeyCache {
    /// 创建 Key Cache，salt 为空时不加盐
    pub fn new(salt: Option<String>) -> Self {
        Self::with_hasher(salt, fnv1a32)
    }

    pub fn with_hasher(salt: Option<String>, hasher: TokenHasher) -> Self {
        Self {
            salt: salt.unwrap_or_default(),
            hasher,
            maps: RwLock::new(KeyMaps::default()),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 派生一个尚未被其他真实 key 占用的 token，调用方需持有写锁
    fn derive_token(&self, real: &str, maps: &KeyMaps) -> String {
        let mut attempt: u32 = 0;
        loop {
            let input = if attempt == 0 {
                format!("{}{}", self.salt, real)
            } else {
                format!("{}{}#{}", self.salt, real, attempt)
            };
            let token = (self.hasher)(input.as_bytes()).to_string();

            match maps.token_to_real.get(&token) {
                None => return token,
                Some(existing) => {
                    tracing::warn!(
                        token = %token,
                        attempt = attempt,
                        existing_len = existing.len(),
                        "Key cache token collision, re-deriving"
                    );
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for InMemoryKeyCache {
    fn default() -> Self {
        Self::new(None)
    }
}

impl KeyCachePort for InMemoryKeyCache {
    fn obfuscate(&self, real: &str) -> String {
        if let Some(token) = self.maps.read().real_to_token.get(real) {
            return token.clone();
        }

        let mut maps = self.maps.write();
        // 拿到写锁前可能已被其他请求插入
        if let Some(token) = maps.real_to_token.get(real) {
            return token.clone();
        }

        let token = self.derive_token(real, &maps);
        maps.token_to_real.insert(token.clone(), real.to_string());
        maps.real_to_token.insert(real.to_string(), token.clone());
        tracing::debug!(token = %token, "Key cache entry created");
        token
    }

    fn resolve(&self, token: &str) -> Option<String> {
        self.maps.read().token_to_real.get(token).cloned()
    }

    fn len(&self) -> usize {
        self.maps.read().real_to_token.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THUMB: &str = "/library/metadata/10122/thumb/1705219286";

    #[test]
    fn test_fnv1a32_known_values() {
        assert_eq!(fnv1a32(b""), 2_166_136_261);
        assert_eq!(fnv1a32(b"a"), 0xe40c_292c);
        assert_eq!(fnv1a32(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn test_round_trip() {
        let cache = InMemoryKeyCache::new(None);
        let token = cache.obfuscate(THUMB);

        assert!(token.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(cache.resolve(&token).as_deref(), Some(THUMB));
    }

    #[test]
    fn test_unsalted_token_is_plain_fnv() {
        let cache = InMemoryKeyCache::new(None);
        assert_eq!(cache.obfuscate(THUMB), fnv1a32(THUMB.as_bytes()).to_string());
    }

    #[test]
    fn test_salt_changes_token() {
        let plain = InMemoryKeyCache::new(None).obfuscate(THUMB);
        let salted = InMemoryKeyCache::new(Some("pepper".to_string())).obfuscate(THUMB);

        assert_ne!(plain, salted);
        assert_eq!(salted, fnv1a32(format!("pepper{}", THUMB).as_bytes()).to_string());
    }

    #[test]
    fn test_obfuscate_is_idempotent() {
        let cache = InMemoryKeyCache::new(Some("salt".to_string()));
        let other = cache.obfuscate("/library/metadata/1/thumb/1");

        let first = cache.obfuscate(THUMB);
        let second = cache.obfuscate(THUMB);

        assert_eq!(first, second);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.resolve(&other).as_deref(), Some("/library/metadata/1/thumb/1"));
    }

    #[test]
    fn test_resolve_unknown_token() {
        let cache = InMemoryKeyCache::new(None);
        cache.obfuscate(THUMB);

        assert_eq!(cache.resolve("12345"), None);
        assert_eq!(cache.resolve(""), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_empty_key_is_cached() {
        let cache = InMemoryKeyCache::new(None);
        let token = cache.obfuscate("");
        assert_eq!(cache.resolve(&token).as_deref(), Some(""));
    }

    #[test]
    fn test_collision_rederives_token() {
        fn colliding(bytes: &[u8]) -> u32 {
            if bytes.ends_with(b"#1") {
                8
            } else {
                7
            }
        }

        let cache = InMemoryKeyCache::with_hasher(None, colliding);
        let a = cache.obfuscate("a");
        let b = cache.obfuscate("b");

        assert_eq!(a, "7");
        assert_eq!(b, "8");
        assert_eq!(cache.resolve("7").as_deref(), Some("a"));
        assert_eq!(cache.resolve("8").as_deref(), Some("b"));
        assert_eq!(cache.obfuscate("b"), "8");
    }

    #[test]
    fn test_concurrent_obfuscate_no_lost_updates() {
        const THREADS: usize = 8;
        const KEYS: usize = 500;

        let cache = InMemoryKeyCache::new(Some("stress".to_string())).arc();
        let keys: Vec<String> = (0..KEYS)
            .map(|i| format!("/library/metadata/{}/thumb/{}", i, 1_700_000_000 + i))
            .collect();

        let tokens: Vec<Vec<String>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|t| {
                    let cache = cache.clone();
                    let keys = &keys;
                    scope.spawn(move || {
                        // 每个线程以不同的起点遍历同一批 key，制造竞争
                        (0..KEYS)
                            .map(|i| cache.obfuscate(&keys[(i + t * 37) % KEYS]))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(cache.len(), KEYS);
        for (t, thread_tokens) in tokens.iter().enumerate() {
            for (i, token) in thread_tokens.iter().enumerate() {
                let key = &keys[(i + t * 37) % KEYS];
                assert_eq!(cache.resolve(token).as_ref(), Some(key));
                assert_eq!(&cache.obfuscate(key), token);
            }
        }
    }
}
