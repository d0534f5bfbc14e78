use crate::client::{FetchRequest, HttpFetcher};
use crate::error::ImportError;
use bandport_model::SessionToken;
use scraper::{Html, Selector};

/// Path every individual release page lives under.
pub const RELEASE_PATH_PREFIX: &str = "/album/";

/// Fetch `{base_url}/music` and return the release page URLs it links to.
///
/// URLs keep document order and are not deduplicated. An empty listing is
/// not an error.
#[tracing::instrument(name = "enumerate", skip(fetcher, session))]
pub async fn enumerate_release_urls(
    fetcher: &dyn HttpFetcher,
    base_url: &str,
    session: &SessionToken,
) -> Result<Vec<String>, ImportError> {
    let url = format!("{base_url}/music");
    tracing::info!(url = %url, "Fetching catalog listing");

    let response = fetcher
        .fetch(FetchRequest::get(&url).with_cookie(session.as_str()))
        .await
        .map_err(|err| ImportError::transport(&url, err))?;

    if !response.is_success() {
        return Err(ImportError::Fetch {
            url,
            status: response.status,
        });
    }

    let urls = release_urls(&response.body, base_url);
    if urls.is_empty() {
        tracing::warn!(url = %url, "No release links found on listing page");
    } else {
        tracing::info!(releases = urls.len(), "Found release links");
    }
    Ok(urls)
}

/// Extract absolute release URLs from catalog grid anchors.
pub fn release_urls(html: &str, base_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let anchor_sel = Selector::parse(".music-grid-item a").expect("valid selector");

    document
        .select(&anchor_sel)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter(|href| href.starts_with(RELEASE_PATH_PREFIX))
        .map(|href| format!("{base_url}{href}"))
        .collect()
}
