//! HTML Views
//!
//! 首页与播放列表页面的渲染。每个页面都经过 `render_page`：
//! 写入 LICENSE 注释头，渲染失败映射为 500，不输出半成品页面。

use std::fmt::{self, Write};

use axum::response::Html;
use htmlescape::{encode_attribute, encode_minimal};

use super::error::ApiError;
use crate::domain::playlist::{PlaylistOverview, PlaylistSummary, TrackRecord};

const STYLESHEET: &str = "/static/style.css";

/// 渲染完整页面
pub fn render_page<F>(license: Option<&str>, body: F) -> Result<Html<String>, ApiError>
where
    F: FnOnce(&mut String) -> fmt::Result,
{
    let mut page = String::new();
    if let Some(license) = license {
        // 注释中不能出现 "-->"
        write!(page, "<!--\n{}-->\n\n", license.replace("-->", "--&gt;"))?;
    }
    body(&mut page)?;
    Ok(Html(page))
}

fn write_head(out: &mut String, title: &str) -> fmt::Result {
    write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n\
         <link rel=\"stylesheet\" href=\"{}\">\n\
         </head>\n<body>\n",
        encode_minimal(title),
        STYLESHEET
    )
}

fn write_foot(out: &mut String) -> fmt::Result {
    out.write_str("</body>\n</html>\n")
}

/// 首页：播放列表列表
pub fn write_index(out: &mut String, playlists: &[PlaylistOverview]) -> fmt::Result {
    write_head(out, "Playlists")?;
    out.write_str("<main class=\"index\">\n<h1>Playlists</h1>\n<ul class=\"playlists\">\n")?;
    for playlist in playlists {
        write!(
            out,
            "<li><a href=\"/playlist/{}\">{}</a> <span class=\"meta\">{} items &middot; {}</span></li>\n",
            encode_attribute(&playlist.key),
            encode_minimal(&playlist.title),
            playlist.size,
            playlist.duration()
        )?;
    }
    out.write_str("</ul>\n</main>\n")?;
    write_foot(out)
}

/// 播放列表页面
pub fn write_playlist(out: &mut String, playlist: &PlaylistSummary) -> fmt::Result {
    write_head(out, &playlist.title)?;
    write!(
        out,
        "<main class=\"playlist\" data-playlist=\"{}\">\n<header>\n<h1>{}</h1>\n\
         <p class=\"meta\">{} items &middot; {}</p>\n</header>\n<ol class=\"tracks\">\n",
        encode_attribute(&playlist.key),
        encode_minimal(&playlist.title),
        playlist.size,
        playlist.duration()
    )?;
    for track in &playlist.tracks {
        write_track(out, track)?;
    }
    out.write_str("</ol>\n</main>\n")?;
    write_foot(out)
}

fn write_track(out: &mut String, track: &TrackRecord) -> fmt::Result {
    write!(
        out,
        "<li class=\"track\" id=\"t{}\">\n<span class=\"number\">{}</span>\n",
        encode_attribute(&track.obfuscated_key),
        track.number()
    )?;

    if let Some(thumb) = &track.obfuscated_thumb {
        write!(
            out,
            "<img class=\"thumb\" loading=\"lazy\" src=\"/playlist/thumb/{}\" alt=\"\">\n",
            encode_attribute(thumb)
        )?;
    }

    out.write_str("<div class=\"details\">\n")?;
    if let Some(show) = &track.metadata.grandparent_title {
        write!(out, "<span class=\"show\">{}</span>\n", encode_minimal(show))?;
    }
    write!(
        out,
        "<span class=\"title\">{}</span>\n",
        encode_minimal(&track.metadata.title)
    )?;

    let episode_code = track.episode_code();
    if !episode_code.is_empty() {
        write!(out, "<span class=\"episode\">{}</span>\n", episode_code)?;
    }
    if let Some(year) = track.metadata.year {
        write!(out, "<span class=\"year\">{}</span>\n", year)?;
    }
    write!(out, "<span class=\"duration\">{}</span>\n", track.duration())?;

    let imdb_url = track.imdb_url();
    if !imdb_url.is_empty() {
        write!(
            out,
            "<a class=\"imdb\" href=\"{}\" rel=\"noopener\">IMDb</a>\n",
            encode_attribute(&imdb_url)
        )?;
    }
    out.write_str("</div>\n</li>\n")
}
