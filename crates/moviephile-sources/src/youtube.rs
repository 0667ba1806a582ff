//! The embedded trailer player.
//!
//! Reels host a YouTube iframe and steer it with cross-document messages. Nothing
//! comes back: a command may arrive late or be ignored entirely.

use reqwest::Url;
use serde_json::json;
use std::fmt;

const EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// Command sent to the embedded player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerCommand {
    Play,
    Pause,
    Stop,
}

impl PlayerCommand {
    /// IFrame API function name
    pub fn func_name(&self) -> &'static str {
        match self {
            PlayerCommand::Play => "playVideo",
            PlayerCommand::Pause => "pauseVideo",
            PlayerCommand::Stop => "stopVideo",
        }
    }

    /// postMessage payload understood by the IFrame API
    pub fn to_message(&self) -> String {
        json!({
            "event": "command",
            "func": self.func_name(),
            "args": [],
        })
        .to_string()
    }
}

impl fmt::Display for PlayerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.func_name())
    }
}

/// Embed URL with player chrome hidden, looping, and the JS API enabled
pub fn embed_url(video_key: &str, autoplay: bool, origin: Option<&str>) -> String {
    let mut params: Vec<(&str, &str)> = vec![
        ("autoplay", if autoplay { "1" } else { "0" }),
        ("controls", "0"),
        ("disablekb", "1"),
        ("fs", "0"),
        ("modestbranding", "1"),
        ("rel", "0"),
        ("showinfo", "0"),
        ("cc_load_policy", "0"),
        ("iv_load_policy", "3"),
        ("mute", "0"),
        ("loop", "1"),
        ("playlist", video_key),
        ("enablejsapi", "1"),
    ];
    if let Some(origin) = origin {
        params.push(("origin", origin));
    }

    let raw = format!("{}{}", EMBED_BASE, video_key);
    match Url::parse_with_params(&raw, &params) {
        Ok(url) => url.to_string(),
        // Keys are plain ids; fall back to the bare embed path
        Err(_) => raw,
    }
}

/// Regular watch page, for hosts without an embedded surface
pub fn watch_url(video_key: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_key)
}
