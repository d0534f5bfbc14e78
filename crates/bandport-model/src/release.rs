use serde::{Deserialize, Serialize};

/// Title used when neither the embedded data nor the markup names the release.
pub const UNTITLED: &str = "Untitled";

/// Artist used when no extraction strategy yields a name.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Price used when the page carries no digital price at all.
pub const NO_PRICE: &str = "N/A";

/// Normalized metadata for a single release (album) page.
///
/// Built fresh per parse and never mutated afterwards. Field order and
/// names follow the JSON shape returned to import callers:
/// `{ title, artist, coverArt, price, description, tags, tracks }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRecord {
    pub title: String,
    pub artist: String,
    /// Absolute URL of the cover image, or empty when unknown.
    pub cover_art: String,
    /// Either the storefront's textual price or a number rendered as text.
    pub price: String,
    pub description: String,
    pub tags: Vec<String>,
    /// Tracks in on-page order.
    pub tracks: Vec<Track>,
}

impl Default for ReleaseRecord {
    fn default() -> Self {
        Self {
            title: UNTITLED.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
            cover_art: String::new(),
            price: NO_PRICE.to_string(),
            description: String::new(),
            tags: Vec::new(),
            tracks: Vec::new(),
        }
    }
}

impl ReleaseRecord {
    /// True when the artist is still the sentinel or blank.
    pub fn artist_unresolved(&self) -> bool {
        self.artist.is_empty() || self.artist == UNKNOWN_ARTIST
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
}

impl Track {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_sentinels() {
        let record = ReleaseRecord::default();
        assert_eq!(record.title, "Untitled");
        assert_eq!(record.artist, "Unknown Artist");
        assert_eq!(record.price, "N/A");
        assert!(record.cover_art.is_empty());
        assert!(record.artist_unresolved());
    }

    #[test]
    fn test_wire_shape() {
        let record = ReleaseRecord {
            title: "Songs".into(),
            artist: "The Band".into(),
            cover_art: "https://f4.bcbits.com/img/a42_10.jpg".into(),
            price: "7".into(),
            description: "Liner notes".into(),
            tags: vec!["folk".into()],
            tracks: vec![Track::new("Opener")],
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["coverArt"], "https://f4.bcbits.com/img/a42_10.jpg");
        assert_eq!(value["tracks"][0]["title"], "Opener");
        assert_eq!(value["tags"][0], "folk");
        assert!(value.get("cover_art").is_none());

        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 7);
    }
}
