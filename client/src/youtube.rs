use once_cell::sync::Lazy;
use regex::Regex;

// Watch links carry the id in the `v` query parameter, short links in the path.
static VIDEO_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"https://(?:www\.youtube\.com/watch\?(?:[^\s#]*&)?v=|youtu\.be/)([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
    )
    .expect("video link pattern is valid")
});

/// Check if a chat message carries a video share link
pub fn is_youtube_url(text: &str) -> bool {
    extract_video_id(text).is_some()
}

/// Extract the 11-character video ID from the first share link in `text`
pub fn extract_video_id(text: &str) -> Option<String> {
    VIDEO_LINK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}
