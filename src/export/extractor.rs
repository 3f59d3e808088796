use crate::dom::{self, contains, first_attr, first_text};
use crate::error::{BrowserError, Result};
use crate::export::record::TrackRecord;
use scraper::{Html, Selector};
use url::Url;

/// Attribute holding the stable row position
pub const ROW_INDEX_ATTRIBUTE: &str = "aria-rowindex";

/// Rendered track rows of the Deezer list
pub const ROW_SELECTOR: &str = r#"div[role="row"][aria-rowindex]"#;

/// Selectors of the Deezer track list layout
#[derive(Debug, Clone)]
pub struct RowSelectors {
    /// CSS of `row`, handed to the page to find rendered rows
    pub row_css: String,
    pub row: Selector,
    pub title: Selector,
    pub artist: Selector,
    pub album: Selector,
    pub duration: Selector,
    pub date: Selector,
    pub popularity: Selector,
    pub favorited: Selector,
    pub lyrics: Selector,
    pub cover: Selector,
}

impl RowSelectors {
    pub fn deezer() -> Result<Self> {
        Ok(Self {
            row_css: ROW_SELECTOR.to_string(),
            row: dom::parse_selector(ROW_SELECTOR)?,
            title: dom::parse_selector(r#"[data-testid="title"]"#)?,
            artist: dom::parse_selector(r#"[data-testid="artist"]"#)?,
            album: dom::parse_selector(r#"[data-testid="album"]"#)?,
            duration: dom::parse_selector(r#"[data-testid="duration"]"#)?,
            date: dom::parse_selector(".xogtX")?,
            popularity: dom::parse_selector(r#"[data-testid="popularity"]"#)?,
            favorited: dom::parse_selector(r#"[data-testid="HeartFilledIcon"]"#)?,
            lyrics: dom::parse_selector(r#"[data-testid="MicrophoneIcon"]"#)?,
            cover: dom::parse_selector(r#"[data-testid="cover"]"#)?,
        })
    }
}

/// Turns the HTML of one rendered row into at most one [`TrackRecord`]
#[derive(Debug, Clone)]
pub struct RowExtractor {
    selectors: RowSelectors,
    origin: Url,
    source_context: String,
}

impl RowExtractor {
    pub fn new(selectors: RowSelectors, origin: &str, source_context: impl Into<String>) -> Result<Self> {
        let origin = Url::parse(origin).map_err(|e| BrowserError::InvalidArgument(format!("Invalid page origin '{}': {}", origin, e)))?;

        Ok(Self { selectors, origin, source_context: source_context.into() })
    }

    pub fn selectors(&self) -> &RowSelectors {
        &self.selectors
    }

    /// Extract a record from a row's `outerHTML`.
    ///
    /// `Ok(None)` means the row is not usable yet: it is not a track row, has
    /// no row index or its title has not rendered. Missing optional fields
    /// become empty strings or `false`. Only a malformed row index is an error.
    pub fn extract(&self, row_html: &str) -> Result<Option<TrackRecord>> {
        let fragment = Html::parse_fragment(row_html);
        let s = &self.selectors;

        let Some(row) = fragment.select(&s.row).next() else {
            return Ok(None);
        };

        let Some(raw_index) = row.value().attr(ROW_INDEX_ATTRIBUTE).map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(None);
        };

        let row_index = raw_index.parse::<u32>().map_err(|e| BrowserError::RowExtraction {
            row_index: raw_index.to_string(),
            reason: format!("row index is not a number: {}", e),
        })?;

        let title = first_text(row, &s.title);
        if title.is_empty() {
            return Ok(None);
        }

        Ok(Some(TrackRecord {
            row_index,
            title,
            artist: first_text(row, &s.artist),
            album: first_text(row, &s.album),
            duration: first_text(row, &s.duration),
            date: first_text(row, &s.date),
            popularity: first_attr(row, &s.popularity, "aria-label"),
            favorited: contains(row, &s.favorited),
            has_lyrics: contains(row, &s.lyrics),
            artist_link: self.absolute(&first_attr(row, &s.artist, "href")),
            album_link: self.absolute(&first_attr(row, &s.album, "href")),
            cover_url: self.absolute(&first_attr(row, &s.cover, "src")),
            source_context: self.source_context.clone(),
        }))
    }

    fn absolute(&self, link: &str) -> String {
        resolve_link(&self.origin, link)
    }
}

/// Resolve a possibly relative link against the page origin.
/// Values that already start with `http` are kept as they are.
pub fn resolve_link(origin: &Url, link: &str) -> String {
    let link = link.trim();
    if link.is_empty() || link.starts_with("http") {
        return link.to_string();
    }

    match origin.join(link) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", origin.as_str().trim_end_matches('/'), link),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> RowExtractor {
        RowExtractor::new(RowSelectors::deezer().unwrap(), "https://www.deezer.com", "Road Trip").unwrap()
    }

    fn row(index: &str, cells: &str) -> String {
        format!(r#"<div role="row" aria-rowindex="{}">{}</div>"#, index, cells)
    }

    fn full_row(index: &str, extra: &str) -> String {
        row(
            index,
            &format!(
                r#"<img data-testid="cover" src="https://e-cdns/cover.jpg">
                <span data-testid="title"> Midnight City </span>
                <a data-testid="artist" href="/en/artist/6">M83</a>
                <a data-testid="album" href="https://www.deezer.com/en/album/9">Hurry Up, We&#39;re Dreaming</a>
                <span data-testid="duration">04:03</span>
                <div class="xogtX">2011-10-18</div>
                <div data-testid="popularity" aria-label="Popularity 8/10"></div>
                <button><svg data-testid="HeartFilledIcon"></svg></button>{}"#,
                extra
            ),
        )
    }

    #[test]
    fn test_extract_full_row() {
        let record = extractor().extract(&full_row("12", "")).unwrap().unwrap();

        assert_eq!(record.row_index, 12);
        assert_eq!(record.title, "Midnight City");
        assert_eq!(record.artist, "M83");
        assert_eq!(record.album, "Hurry Up, We're Dreaming");
        assert_eq!(record.duration, "04:03");
        assert_eq!(record.date, "2011-10-18");
        assert_eq!(record.popularity, "Popularity 8/10");
        assert!(record.favorited);
        assert!(!record.has_lyrics);
        assert_eq!(record.artist_link, "https://www.deezer.com/en/artist/6");
        assert_eq!(record.album_link, "https://www.deezer.com/en/album/9");
        assert_eq!(record.cover_url, "https://e-cdns/cover.jpg");
        assert_eq!(record.source_context, "Road Trip");
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let html = row("1", r#"<span data-testid="title">Solo</span>"#);
        let record = extractor().extract(&html).unwrap().unwrap();

        assert_eq!(record.artist, "");
        assert_eq!(record.popularity, "");
        assert_eq!(record.artist_link, "");
        assert_eq!(record.cover_url, "");
        assert!(!record.favorited);
        assert!(!record.has_lyrics);
    }

    #[test]
    fn test_row_without_title_is_skipped() {
        let html = row("3", r#"<span data-testid="title">   </span>"#);
        assert_eq!(extractor().extract(&html).unwrap(), None);

        assert_eq!(extractor().extract(&row("3", "")).unwrap(), None);
    }

    #[test]
    fn test_row_without_index_is_skipped() {
        let html = r#"<div role="row"><span data-testid="title">Orphan</span></div>"#;
        assert_eq!(extractor().extract(html).unwrap(), None);

        assert_eq!(extractor().extract(&row("  ", r#"<span data-testid="title">Blank</span>"#)).unwrap(), None);
    }

    #[test]
    fn test_non_row_html_is_skipped() {
        assert_eq!(extractor().extract(r#"<span data-testid="title">Loose</span>"#).unwrap(), None);
        assert_eq!(extractor().extract("").unwrap(), None);
    }

    #[test]
    fn test_non_numeric_index_is_an_error() {
        let html = row("x7", r#"<span data-testid="title">Bad</span>"#);
        let err = extractor().extract(&html).unwrap_err();
        assert!(matches!(err, BrowserError::RowExtraction { ref row_index, .. } if row_index == "x7"));
    }

    #[test]
    fn test_lyrics_marker() {
        let html = full_row("2", r#"<svg data-testid="MicrophoneIcon"></svg>"#);
        assert!(extractor().extract(&html).unwrap().unwrap().has_lyrics);
    }

    #[test]
    fn test_first_match_wins() {
        let html = row(
            "4",
            r#"<span data-testid="title">First</span><span data-testid="title">Second</span>"#,
        );
        assert_eq!(extractor().extract(&html).unwrap().unwrap().title, "First");
    }

    #[test]
    fn test_resolve_link() {
        let origin = Url::parse("https://www.deezer.com").unwrap();
        assert_eq!(resolve_link(&origin, "/fr/artist/1"), "https://www.deezer.com/fr/artist/1");
        assert_eq!(resolve_link(&origin, "album/2"), "https://www.deezer.com/album/2");
        assert_eq!(resolve_link(&origin, "http://other.com/x"), "http://other.com/x");
        assert_eq!(resolve_link(&origin, ""), "");
    }

    #[test]
    fn test_invalid_origin() {
        assert!(RowExtractor::new(RowSelectors::deezer().unwrap(), "nope", "x").is_err());
    }
}
