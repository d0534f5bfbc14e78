use crate::client::{FetchRequest, HttpFetcher};
use crate::error::ImportError;
use bandport_model::SessionToken;

/// Strip a leading `http://` or `https://` from a storefront host.
pub fn normalize_host(site_host: &str) -> &str {
    let host = site_host.trim();
    host.strip_prefix("https://")
        .or_else(|| host.strip_prefix("http://"))
        .unwrap_or(host)
}

/// Canonical `https://{host}` base URL for a storefront.
pub fn base_url(site_host: &str) -> String {
    format!("https://{}", normalize_host(site_host))
}

/// Log in to a storefront and return the session cookies it sets.
///
/// A 2xx answer without any `Set-Cookie` directive counts as a failed
/// login: the platform serves its error page with 200.
#[tracing::instrument(name = "authenticate", skip(fetcher, identifier, secret))]
pub async fn acquire_session(
    fetcher: &dyn HttpFetcher,
    identifier: &str,
    secret: &str,
    site_host: &str,
) -> Result<SessionToken, ImportError> {
    let login_url = format!("{}/login", base_url(site_host));
    tracing::info!(url = %login_url, "Attempting login");

    let form = vec![
        ("username".to_string(), identifier.to_string()),
        ("password".to_string(), secret.to_string()),
    ];
    let response = fetcher
        .fetch(FetchRequest::post_form(&login_url, form))
        .await
        .map_err(|err| ImportError::transport(&login_url, err))?;

    if !response.is_success() {
        tracing::warn!(status = response.status, "Login rejected");
        return Err(ImportError::Authentication(format!(
            "login failed with status {}",
            response.status
        )));
    }

    if response.set_cookies.is_empty() {
        tracing::warn!(status = response.status, "Login returned no session cookies");
        return Err(ImportError::Authentication(
            "no Set-Cookie header returned; login might have failed".to_string(),
        ));
    }

    let token = SessionToken::from_set_cookies(&response.set_cookies);
    if token.is_empty() {
        tracing::warn!(status = response.status, "Login returned only blank cookies");
        return Err(ImportError::Authentication(
            "Set-Cookie header carried no cookies; login might have failed".to_string(),
        ));
    }
    tracing::info!(cookies = token.cookie_count(), "Session acquired");
    Ok(token)
}
