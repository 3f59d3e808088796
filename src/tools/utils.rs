/// Normalize a user-typed address into a full URL.
///
/// Bare Deezer paths such as `playlist/123` are expanded against
/// `https://www.deezer.com`.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();

    if trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
        || trimmed.starts_with("file://")
        || trimmed.starts_with("data:")
        || trimmed.starts_with("about:")
    {
        return trimmed.to_string();
    }

    if let Some(path) = trimmed.strip_prefix('/') {
        return format!("https://www.deezer.com/{}", path);
    }

    if ["playlist/", "album/", "artist/"].iter().any(|p| trimmed.starts_with(p)) {
        return format!("https://www.deezer.com/{}", trimmed);
    }

    if trimmed.starts_with("localhost") || trimmed.starts_with("127.0.0.1") {
        return format!("http://{}", trimmed);
    }

    format!("https://{}", trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url_complete() {
        assert_eq!(normalize_url("https://www.deezer.com/fr/playlist/1"), "https://www.deezer.com/fr/playlist/1");
        assert_eq!(normalize_url("  about:blank "), "about:blank");
    }

    #[test]
    fn test_normalize_url_deezer_paths() {
        assert_eq!(normalize_url("/en/album/302127"), "https://www.deezer.com/en/album/302127");
        assert_eq!(normalize_url("playlist/908622995"), "https://www.deezer.com/playlist/908622995");
    }

    #[test]
    fn test_normalize_url_missing_protocol() {
        assert_eq!(normalize_url("www.deezer.com/playlist/1"), "https://www.deezer.com/playlist/1");
        assert_eq!(normalize_url("localhost:3000"), "http://localhost:3000");
    }
}
