//! Key Cache Port - 内部标识混淆
//!
//! 真实 key（如缩略图路径）与对外暴露的混淆 token 之间的双向映射

/// Key Cache Port
///
/// 进程生命周期内只增不删：同一个真实 key 永远对应同一个 token，反之亦然。
pub trait KeyCachePort: Send + Sync {
    /// 获取真实 key 的混淆 token，首次调用时生成并缓存
    fn obfuscate(&self, real: &str) -> String;

    /// 根据混淆 token 找回真实 key，未知 token 返回 None
    fn resolve(&self, token: &str) -> Option<String>;

    /// 已缓存的映射条数
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
