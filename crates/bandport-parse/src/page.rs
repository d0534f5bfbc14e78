// Markup queries over a rendered release page.
//
// Used both as the primary source when the page has no embedded album
// data and to backfill fields the embedded data left empty.

use bandport_model::Track;
use scraper::{ElementRef, Html, Selector};

/// Separator between title and artist in page titles ("Songs, by The Band").
pub const BY_SEPARATOR: &str = ", by ";

pub struct ReleasePage {
    document: Html,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

fn trimmed_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Split "Title, by Artist" into its parts.
///
/// Only the segment directly after the first separator is the artist.
/// Without a separator the whole (trimmed) input is the title.
pub fn split_title_artist(text: &str) -> (String, Option<String>) {
    match text.split_once(BY_SEPARATOR) {
        Some((title, rest)) => {
            let artist = rest.split(BY_SEPARATOR).next().unwrap_or("").trim();
            (
                title.trim().to_string(),
                (!artist.is_empty()).then(|| artist.to_string()),
            )
        }
        None => (text.trim().to_string(), None),
    }
}

impl ReleasePage {
    /// Parse markup into a queryable page. Never fails: html5ever recovers
    /// from any input, producing at worst an empty document.
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    fn first(&self, css: &str) -> Option<ElementRef<'_>> {
        self.document.select(&selector(css)).next()
    }

    fn first_text(&self, css: &str) -> Option<String> {
        self.first(css).map(trimmed_text)
    }

    fn meta_content(&self, property: &str) -> Option<String> {
        self.first(&format!(r#"meta[property="{property}"]"#))
            .and_then(|meta| meta.value().attr("content"))
            .filter(|content| !content.is_empty())
            .map(str::to_string)
    }

    /// About text, else credits text. Both live on `.tralbumData` elements.
    pub fn description(&self) -> Option<String> {
        if let Some(about) = self.first_text(".tralbumData.tralbum-about") {
            tracing::debug!(len = about.len(), "Description from about element");
            return Some(about);
        }
        if let Some(credits) = self.first_text(".tralbumData.tralbum-credits") {
            tracing::debug!(len = credits.len(), "Description from credits element");
            return Some(credits);
        }
        tracing::debug!("No description element in markup");
        None
    }

    /// Artist derived from the album title display element.
    ///
    /// "Title, by Artist" yields the part after the separator; otherwise a
    /// nested `.artist` element is used. `None` when neither gives a name.
    pub fn album_title_artist(&self) -> Option<String> {
        let album_title = self.first_text(".albumTitle").unwrap_or_default();
        if album_title.contains(BY_SEPARATOR) {
            if let (_, Some(artist)) = split_title_artist(&album_title) {
                tracing::debug!(artist = %artist, "Artist from album title separator");
                return Some(artist);
            }
        }

        let nested = self
            .first_text(".albumTitle .artist")
            .filter(|artist| !artist.is_empty());
        if let Some(artist) = &nested {
            tracing::debug!(artist = %artist, "Artist from nested album title element");
        }
        nested
    }

    /// Social-preview title, else the track title heading.
    pub fn heading(&self) -> Option<String> {
        self.meta_content("og:title")
            .or_else(|| self.first_text("h2.trackTitle").filter(|t| !t.is_empty()))
    }

    pub fn cover_image(&self) -> Option<String> {
        self.meta_content("og:image")
    }

    /// Text of the first name-your-price or fixed digital price element.
    pub fn price(&self) -> Option<String> {
        self.first_text(".buyItem .buyItemNyp, .buyItem .buyItemDigital")
    }

    pub fn tags(&self) -> Vec<String> {
        self.document
            .select(&selector(".tralbum-tags a"))
            .map(trimmed_text)
            .collect()
    }

    /// Track titles from the track table; blank cells stay blank.
    pub fn tracks(&self) -> Vec<Track> {
        self.document
            .select(&selector("#track_table .track-title"))
            .map(|cell| Track::new(trimmed_text(cell)))
            .collect()
    }
}
