use bandport_model::{ReleaseRecord, NO_PRICE, UNKNOWN_ARTIST, UNTITLED};

pub mod embedded;
pub mod page;
pub mod tralbum;

use embedded::EmbeddedAssignment;
use page::{split_title_artist, ReleasePage};
use tralbum::TralbumData;

/// Extract a normalized release record from one release page.
///
/// Prefers the embedded album data object and backfills its gaps from
/// the markup; pages without usable embedded data are read from markup
/// alone. Never fails: anything missing degrades to sentinels or empties.
pub fn parse_release(html: &str) -> ReleaseRecord {
    let page = ReleasePage::parse(html);

    let record = match EmbeddedAssignment::tralbum().scan::<TralbumData>(page.document()) {
        Some(data) => {
            tracing::debug!("Using embedded album data");
            from_embedded(&data, &page)
        }
        None => {
            tracing::debug!("No embedded album data; reading markup");
            from_markup(&page)
        }
    };

    tracing::info!(
        title = %record.title,
        artist = %record.artist,
        price = %record.price,
        description_len = record.description.len(),
        tags = record.tags.len(),
        tracks = record.tracks.len(),
        "Parsed release"
    );

    record
}

/// Build a record from embedded album data, backfilling from markup.
fn from_embedded(data: &TralbumData, page: &ReleasePage) -> ReleaseRecord {
    let mut record = ReleaseRecord {
        title: data.title().unwrap_or(UNTITLED).to_string(),
        artist: data.artist().unwrap_or(UNKNOWN_ARTIST).to_string(),
        cover_art: data.cover_art().unwrap_or_default(),
        price: data.price().unwrap_or_else(|| NO_PRICE.to_string()),
        description: data.about().unwrap_or_default().to_string(),
        tags: data.tags(),
        tracks: data.tracks(),
    };

    if record.description.is_empty() {
        record.description = page.description().unwrap_or_default();
    }

    if record.artist_unresolved() {
        if let Some(artist) = page.album_title_artist() {
            record.artist = artist;
        }
    }

    record
}

/// Build a record purely from rendered markup.
fn from_markup(page: &ReleasePage) -> ReleaseRecord {
    let heading = page.heading().unwrap_or_else(|| UNTITLED.to_string());
    let (title, artist) = split_title_artist(&heading);

    let artist = artist
        .or_else(|| page.album_title_artist())
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

    ReleaseRecord {
        title,
        artist,
        cover_art: page.cover_image().unwrap_or_default(),
        price: page.price().unwrap_or_else(|| NO_PRICE.to_string()),
        description: page.description().unwrap_or_default(),
        tags: page.tags(),
        tracks: page.tracks(),
    }
}
