use crate::client::{FetchRequest, HttpFetcher};
use crate::error::ImportError;
use crate::listing::enumerate_release_urls;
use crate::session::{acquire_session, base_url};
use bandport_model::{ReleaseRecord, SessionToken};
use tracing::Instrument;

/// What to do when one release page cannot be fetched mid-batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Abort the import and return the first release fetch error.
    #[default]
    FailFast,
    /// Record the failure and continue with the next release.
    SkipFailed,
}

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub policy: BatchPolicy,
}

/// A release URL that was skipped under `BatchPolicy::SkipFailed`.
#[derive(Debug, Clone)]
pub struct ReleaseFailure {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Parsed releases in listing order.
    pub releases: Vec<ReleaseRecord>,
    /// Always empty under `BatchPolicy::FailFast`.
    pub failures: Vec<ReleaseFailure>,
}

/// Log in, list the storefront's releases, and parse each one in turn.
///
/// Login and listing failures abort the import. Release pages are
/// fetched one at a time in listing order; a failed release fetch is
/// handled per `options.policy`.
#[tracing::instrument(name = "import", skip(fetcher, identifier, secret, options))]
pub async fn import_catalog(
    fetcher: &dyn HttpFetcher,
    identifier: &str,
    secret: &str,
    site_host: &str,
    options: &ImportOptions,
) -> Result<ImportReport, ImportError> {
    let session = acquire_session(fetcher, identifier, secret, site_host).await?;
    let base = base_url(site_host);
    let urls = enumerate_release_urls(fetcher, &base, &session).await?;

    let mut report = ImportReport::default();
    for url in urls {
        let span = tracing::info_span!("parse", url = %url);
        match fetch_release(fetcher, &url, &session).instrument(span).await {
            Ok(record) => report.releases.push(record),
            Err(err) => match options.policy {
                BatchPolicy::FailFast => return Err(err),
                BatchPolicy::SkipFailed => {
                    tracing::warn!(url = %url, error = %err, "Skipping release");
                    report.failures.push(ReleaseFailure {
                        url,
                        error: err.to_string(),
                    });
                }
            },
        }
    }

    tracing::info!(
        releases = report.releases.len(),
        failures = report.failures.len(),
        "Import finished"
    );
    Ok(report)
}

/// Fetch one release page and parse it.
pub async fn fetch_release(
    fetcher: &dyn HttpFetcher,
    url: &str,
    session: &SessionToken,
) -> Result<ReleaseRecord, ImportError> {
    tracing::info!("Fetching release page");
    let response = fetcher
        .fetch(FetchRequest::get(url).with_cookie(session.as_str()))
        .await
        .map_err(|err| ImportError::transport(url, err))?;

    if !response.is_success() {
        return Err(ImportError::Fetch {
            url: url.to_string(),
            status: response.status,
        });
    }

    Ok(bandport_parse::parse_release(&response.body))
}
