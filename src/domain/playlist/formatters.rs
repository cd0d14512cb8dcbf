//! Playlist Context - 展示格式化

/// IMDB 外部标识前缀
pub const IMDB_SCHEME: &str = "imdb://";

const IMDB_TITLE_URL: &str = "https://www.imdb.com/title/";

/// 格式化集数编码（如 `S01.E02`）
///
/// 季、集都为 0 时返回空字符串（多半不是真正的 S0E0）。
/// 季、集最少两位，不足补零。
pub fn format_episode_code(season: u32, episode: u32) -> String {
    if season == 0 && episode == 0 {
        return String::new();
    }
    format!("S{:02}.E{:02}", season, episode)
}

/// 从外部标识列表中取第一个 IMDB id，拼出 IMDB 页面 URL
///
/// 没有 IMDB id 时返回空字符串。
pub fn format_imdb_url(guids: &[String]) -> String {
    guids
        .iter()
        .find_map(|guid| guid.strip_prefix(IMDB_SCHEME))
        .map(|id| format!("{}{}", IMDB_TITLE_URL, id))
        .unwrap_or_default()
}

/// 毫秒时长格式化为 `1h 05m` / `42m`
pub fn format_duration(duration_ms: u64) -> String {
    let total_minutes = duration_ms / 60_000;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
